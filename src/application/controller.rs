use crate::domain::form::{PaymentFormState, SubmissionStatus};
use crate::domain::money::Money;
use crate::domain::payment::{Field, FieldErrors, PaymentMethod};
use crate::domain::ports::{Confirmation, PaymentGatewayBox, PaymentRequest};
use crate::domain::validation::{self, ValidationPolicy};
use crate::error::{CheckoutError, Result};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Message reported when the gateway does not answer within the timeout.
pub const TIMEOUT_MESSAGE: &str = "timeout";

/// Tunables of the submission state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmissionConfig {
    /// How long a success stays on screen before the form returns to idle.
    pub success_reset_delay: Duration,
    /// Upper bound on a gateway call. `None` waits for as long as it takes.
    pub timeout: Option<Duration>,
    pub require_matching_confirmation: bool,
}

impl Default for SubmissionConfig {
    fn default() -> Self {
        Self {
            success_reset_delay: Duration::from_secs(5),
            timeout: None,
            require_matching_confirmation: false,
        }
    }
}

impl SubmissionConfig {
    fn policy(&self) -> ValidationPolicy {
        ValidationPolicy {
            require_matching_confirmation: self.require_matching_confirmation,
        }
    }
}

/// What a submit request ended up doing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "detail", rename_all = "lowercase")]
pub enum SubmitOutcome {
    /// Another attempt was already being validated or sent.
    Ignored,
    /// Some fields failed validation; nothing was sent.
    Rejected(FieldErrors),
    Succeeded(Confirmation),
    Failed(String),
}

struct Inner {
    form: PaymentFormState,
    reset_timer: Option<JoinHandle<()>>,
}

impl Inner {
    fn cancel_reset_timer(&mut self) {
        if let Some(timer) = self.reset_timer.take() {
            timer.abort();
        }
    }
}

/// Drives one payment form through idle, validating, submitting and the
/// final outcome.
///
/// Handles are cheap to clone and all clones share the same form. The form
/// lock is never held while the gateway call is outstanding, so edits can be
/// buffered during a submission while further submits are ignored.
#[derive(Clone)]
pub struct PaymentController {
    gateway: PaymentGatewayBox,
    config: SubmissionConfig,
    inner: Arc<Mutex<Inner>>,
}

impl PaymentController {
    pub fn new(gateway: PaymentGatewayBox, method: PaymentMethod, config: SubmissionConfig) -> Self {
        Self {
            gateway,
            config,
            inner: Arc::new(Mutex::new(Inner {
                form: PaymentFormState::new(method),
                reset_timer: None,
            })),
        }
    }

    /// A copy of the form for rendering.
    pub async fn snapshot(&self) -> PaymentFormState {
        self.inner.lock().await.form.clone()
    }

    pub async fn status(&self) -> SubmissionStatus {
        self.inner.lock().await.form.status.clone()
    }

    pub async fn method(&self) -> PaymentMethod {
        self.inner.lock().await.form.method
    }

    pub async fn set_field(&self, field: Field, value: impl Into<String>) -> Result<()> {
        self.inner.lock().await.form.set_field(field, value)
    }

    /// Switches the form to another payment method, discarding what was
    /// entered for the previous one. Not allowed while a payment is in flight.
    pub async fn switch_method(&self, method: PaymentMethod) -> Result<()> {
        let mut inner = self.inner.lock().await;
        if inner.form.status.is_busy() {
            return Err(CheckoutError::InvalidAction(
                "cannot change payment method while a payment is in progress".to_string(),
            ));
        }
        inner.cancel_reset_timer();
        inner.form.switch_method(method);
        debug!(method = %method, "payment method switched");
        Ok(())
    }

    /// Leaves the success screen right away ("make another payment").
    pub async fn dismiss_success(&self) -> bool {
        let mut inner = self.inner.lock().await;
        if inner.form.status != SubmissionStatus::Succeeded {
            return false;
        }
        inner.cancel_reset_timer();
        inner.form.advance_epoch();
        inner.form.status = SubmissionStatus::Idle;
        true
    }

    /// Hides the failure banner. Entered values are kept.
    pub async fn dismiss_error(&self) -> bool {
        let mut inner = self.inner.lock().await;
        if !matches!(inner.form.status, SubmissionStatus::Failed(_)) {
            return false;
        }
        inner.form.status = SubmissionStatus::Idle;
        true
    }

    /// Validates the form and, if it passes, charges `amount` through the
    /// gateway.
    ///
    /// A submit while another one is validating or in flight is a no-op. A
    /// submit while the success screen is showing cancels its pending reset.
    /// Dropping the returned future does not abandon a payment already sent:
    /// the form still moves to its final status.
    pub async fn submit(&self, amount: Money) -> SubmitOutcome {
        let request = {
            let mut inner = self.inner.lock().await;
            if inner.form.status.is_busy() {
                debug!("submit ignored, payment already in progress");
                return SubmitOutcome::Ignored;
            }
            inner.cancel_reset_timer();
            inner.form.advance_epoch();
            inner.form.status = SubmissionStatus::Validating;

            let method = inner.form.method;
            if method == PaymentMethod::RedirectWallet
                && !self.config.require_matching_confirmation
                && !validation::confirmation_matches(&inner.form.values)
            {
                warn!("confirmation email differs from email; mismatch is not enforced");
            }

            match validation::validate(method, &inner.form.values, self.config.policy()) {
                Err(errors) => {
                    info!(method = %method, invalid = errors.len(), "payment form rejected");
                    inner.form.errors = errors.clone();
                    inner.form.status = SubmissionStatus::Idle;
                    return SubmitOutcome::Rejected(errors);
                }
                Ok(fields) => {
                    inner.form.errors.clear();
                    inner.form.status = SubmissionStatus::Submitting;
                    PaymentRequest::new(amount, fields)
                }
            }
        };

        info!(
            method = %request.method,
            provider = request.provider,
            amount = %request.amount,
            "submitting payment"
        );

        // The round trip runs on its own task so the form always leaves
        // `Submitting`, even if the caller stops polling this future.
        let controller = self.clone();
        let round_trip = tokio::spawn(async move {
            let result = controller.call_gateway(request).await;
            controller.finish(result).await
        });
        match round_trip.await {
            Ok(outcome) => outcome,
            Err(err) => {
                let message = format!("payment task failed: {err}");
                warn!(error = %message, "payment failed");
                let mut inner = self.inner.lock().await;
                inner.form.status = SubmissionStatus::Failed(message.clone());
                SubmitOutcome::Failed(message)
            }
        }
    }

    async fn finish(&self, result: Result<Confirmation>) -> SubmitOutcome {
        let mut inner = self.inner.lock().await;
        match result {
            Ok(confirmation) => {
                info!(reference = %confirmation.reference, "payment succeeded");
                inner.form.status = SubmissionStatus::Succeeded;
                inner.form.reset_values();
                let epoch = inner.form.advance_epoch();
                inner.reset_timer = Some(self.schedule_reset(epoch));
                SubmitOutcome::Succeeded(confirmation)
            }
            Err(err) => {
                let message = err.to_string();
                warn!(error = %message, "payment failed");
                inner.form.status = SubmissionStatus::Failed(message.clone());
                SubmitOutcome::Failed(message)
            }
        }
    }

    async fn call_gateway(&self, request: PaymentRequest) -> Result<Confirmation> {
        let call = self.gateway.submit_payment(request);
        match self.config.timeout {
            Some(limit) => tokio::time::timeout(limit, call)
                .await
                .unwrap_or_else(|_| Err(CheckoutError::SubmissionError(TIMEOUT_MESSAGE.to_string()))),
            None => call.await,
        }
    }

    /// Arms the success-to-idle timer. It only fires if nothing else has
    /// happened to the form since it was armed.
    fn schedule_reset(&self, epoch: u64) -> JoinHandle<()> {
        let inner = Arc::clone(&self.inner);
        let delay = self.config.success_reset_delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let mut inner = inner.lock().await;
            if inner.form.epoch == epoch && inner.form.status == SubmissionStatus::Succeeded {
                inner.form.status = SubmissionStatus::Idle;
                inner.reset_timer = None;
                debug!("success cleared, form is idle again");
            }
        })
    }
}
