use super::catalog::PlanId;
use crate::error::{CheckoutError, Result};
use serde::{Deserialize, Serialize};

/// Whether the checkout is a single charge or a recurring subscription.
///
/// `Subscription { plan: None }` is a valid pending state: the customer picked
/// the subscription tab but has not chosen a tier yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum PurchaseMode {
    #[default]
    OneTime,
    Subscription { plan: Option<PlanId> },
}

impl PurchaseMode {
    pub fn is_subscription(&self) -> bool {
        matches!(self, PurchaseMode::Subscription { .. })
    }

    pub fn selected_plan(&self) -> Option<PlanId> {
        match self {
            PurchaseMode::OneTime => None,
            PurchaseMode::Subscription { plan } => *plan,
        }
    }

    /// Switches to a one-time purchase, dropping any selected plan.
    pub fn choose_one_time(&mut self) {
        *self = PurchaseMode::OneTime;
    }

    /// Switches to subscription mode. An already selected plan is kept.
    pub fn choose_subscription(&mut self) {
        if !self.is_subscription() {
            *self = PurchaseMode::Subscription { plan: None };
        }
    }

    /// Selects a plan. Only allowed in subscription mode.
    pub fn select_plan(&mut self, id: PlanId) -> Result<()> {
        match self {
            PurchaseMode::Subscription { plan } => {
                *plan = Some(id);
                Ok(())
            }
            PurchaseMode::OneTime => Err(CheckoutError::InvalidAction(format!(
                "cannot select plan '{id}' for a one-time purchase"
            ))),
        }
    }
}
