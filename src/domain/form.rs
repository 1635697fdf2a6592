use super::payment::{Field, FieldErrors, FieldValues, PaymentMethod};
use crate::error::{CheckoutError, Result};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "message", rename_all = "lowercase")]
pub enum SubmissionStatus {
    Idle,
    Validating,
    Submitting,
    Succeeded,
    Failed(String),
}

impl SubmissionStatus {
    /// Submit is disabled while a payment attempt is being checked or sent.
    pub fn is_busy(&self) -> bool {
        matches!(self, SubmissionStatus::Validating | SubmissionStatus::Submitting)
    }
}

/// State of one payment form: entered values, inline errors and the status of
/// the current attempt.
///
/// `epoch` is bumped on every transition that supersedes a scheduled timer, so
/// a timer armed under an older epoch knows it is stale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentFormState {
    pub method: PaymentMethod,
    pub values: FieldValues,
    pub errors: FieldErrors,
    pub status: SubmissionStatus,
    #[serde(skip)]
    pub(crate) epoch: u64,
}

impl PaymentFormState {
    pub fn new(method: PaymentMethod) -> Self {
        Self {
            method,
            values: FieldValues::new(),
            errors: FieldErrors::new(),
            status: SubmissionStatus::Idle,
            epoch: 0,
        }
    }

    /// Stores a value for a field of the active method.
    pub fn set_field(&mut self, field: Field, value: impl Into<String>) -> Result<()> {
        if !self.method.accepts(field) {
            return Err(CheckoutError::ValidationError(format!(
                "field '{}' is not part of the {} form",
                field, self.method
            )));
        }
        self.values.insert(field, value.into());
        Ok(())
    }

    pub fn value(&self, field: Field) -> Option<&str> {
        self.values.get(&field).map(String::as_str)
    }

    pub fn error(&self, field: Field) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    /// Switches to another payment method. Values and errors of the previous
    /// form are dropped.
    pub fn switch_method(&mut self, method: PaymentMethod) {
        self.method = method;
        self.values.clear();
        self.errors.clear();
        self.status = SubmissionStatus::Idle;
        self.advance_epoch();
    }

    /// Clears entered values after a successful payment.
    pub fn reset_values(&mut self) {
        self.values.clear();
        self.errors.clear();
    }

    pub(crate) fn advance_epoch(&mut self) -> u64 {
        self.epoch = self.epoch.wrapping_add(1);
        self.epoch
    }
}
