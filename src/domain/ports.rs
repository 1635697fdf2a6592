use super::money::Money;
use super::payment::{PaymentMethod, ValidatedFields};
use crate::error::Result;
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;

/// What the payment collaborator is asked to charge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentRequest {
    pub method: PaymentMethod,
    pub provider: &'static str,
    pub amount: Money,
    pub fields: ValidatedFields,
}

impl PaymentRequest {
    pub fn new(amount: Money, fields: ValidatedFields) -> Self {
        let method = fields.method();
        Self {
            method,
            provider: method.provider(),
            amount,
            fields,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Confirmation {
    pub reference: String,
    pub amount: Money,
}

/// The external collaborator that actually takes the payment.
///
/// Each call resolves exactly once. A failure carries a message meant for the
/// customer, usually as `CheckoutError::SubmissionError`.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn submit_payment(&self, request: PaymentRequest) -> Result<Confirmation>;
}

pub type PaymentGatewayBox = Arc<dyn PaymentGateway>;
