use super::controller::{PaymentController, SubmissionConfig, SubmitOutcome};
use crate::domain::catalog::{Catalog, PlanId};
use crate::domain::form::PaymentFormState;
use crate::domain::payment::{Field, PaymentMethod};
use crate::domain::ports::PaymentGatewayBox;
use crate::domain::pricing::{self, Quote};
use crate::domain::purchase::PurchaseMode;
use crate::domain::summary::{self, SummaryView};
use crate::error::{CheckoutError, Result};
use std::sync::Arc;
use tracing::debug;

/// One customer's checkout: the purchase selection plus its payment form.
///
/// The session is the entry point for the rendering layer. It reprices on
/// every request, so the quote always reflects the current mode and plan.
pub struct CheckoutSession {
    catalog: Arc<Catalog>,
    mode: PurchaseMode,
    payments: PaymentController,
}

impl CheckoutSession {
    /// Creates a new `CheckoutSession`.
    ///
    /// # Arguments
    ///
    /// * `catalog` - The shared plans and one-time items.
    /// * `gateway` - The payment collaborator.
    /// * `method` - The payment method the form starts with.
    /// * `config` - Submission timing and validation switches.
    pub fn new(
        catalog: Arc<Catalog>,
        gateway: PaymentGatewayBox,
        method: PaymentMethod,
        config: SubmissionConfig,
    ) -> Self {
        Self {
            catalog,
            mode: PurchaseMode::default(),
            payments: PaymentController::new(gateway, method, config),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn mode(&self) -> PurchaseMode {
        self.mode
    }

    pub fn payments(&self) -> &PaymentController {
        &self.payments
    }

    pub fn choose_one_time(&mut self) {
        self.mode.choose_one_time();
        debug!("purchase mode: one-time");
    }

    pub fn choose_subscription(&mut self) {
        self.mode.choose_subscription();
        debug!("purchase mode: subscription");
    }

    /// Selects a plan. The plan must exist in the catalog and the session must
    /// be in subscription mode.
    pub fn select_plan(&mut self, id: PlanId) -> Result<()> {
        self.catalog.plan(id)?;
        self.mode.select_plan(id)?;
        debug!(plan = %id, "plan selected");
        Ok(())
    }

    pub fn quote(&self) -> Result<Quote> {
        pricing::compute_totals(&self.mode, &self.catalog)
    }

    pub fn summary(&self) -> Result<SummaryView> {
        summary::summarize(&self.mode, &self.catalog)
    }

    pub async fn select_payment_method(&self, method: PaymentMethod) -> Result<()> {
        self.payments.switch_method(method).await
    }

    pub async fn edit_field(&self, field: Field, value: impl Into<String>) -> Result<()> {
        self.payments.set_field(field, value).await
    }

    pub async fn form(&self) -> PaymentFormState {
        self.payments.snapshot().await
    }

    /// Charges the current total. Rejected while the quote is still pending.
    pub async fn submit(&self) -> Result<SubmitOutcome> {
        let totals = match self.quote()? {
            Quote::Priced(totals) => totals,
            Quote::Pending => {
                return Err(CheckoutError::InvalidAction(
                    "choose a plan before paying".to_string(),
                ));
            }
        };
        Ok(self.payments.submit(totals.total).await)
    }

    pub async fn dismiss_success(&self) -> bool {
        self.payments.dismiss_success().await
    }

    pub async fn dismiss_error(&self) -> bool {
        self.payments.dismiss_error().await
    }
}
