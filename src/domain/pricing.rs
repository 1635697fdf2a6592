use super::catalog::Catalog;
use super::money::Money;
use super::purchase::PurchaseMode;
use crate::error::Result;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Flat tax applied to every order.
pub const TAX_RATE: Decimal = dec!(0.10);

/// Label of the synthesized tax line in the itemization.
pub const TAX_LINE_LABEL: &str = "Tax (10%)";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillingFrequency {
    Monthly,
    Once,
}

impl BillingFrequency {
    /// Human label, e.g. "per month". A single charge has none.
    pub fn label(&self) -> Option<&'static str> {
        match self {
            BillingFrequency::Monthly => Some("per month"),
            BillingFrequency::Once => None,
        }
    }

    /// Suffix appended to a displayed total, e.g. "$32.99/month".
    pub fn suffix(&self) -> &'static str {
        match self {
            BillingFrequency::Monthly => "/month",
            BillingFrequency::Once => "",
        }
    }
}

/// Derived amounts for the active purchase. Never entered, only computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderTotals {
    pub subtotal: Money,
    pub tax: Money,
    pub total: Money,
    pub frequency: BillingFrequency,
}

impl OrderTotals {
    /// Applies tax to a subtotal.
    ///
    /// Tax is rounded to cents first, then the sum is rounded again. This is
    /// not the same as rounding only the final sum and must stay that way for
    /// totals to be reproducible.
    pub fn from_subtotal(subtotal: Money, frequency: BillingFrequency) -> Self {
        let tax = (subtotal * TAX_RATE).round_to_cents();
        let total = (subtotal + tax).round_to_cents();
        Self {
            subtotal,
            tax,
            total,
            frequency,
        }
    }
}

/// Result of pricing the current selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum Quote {
    Priced(OrderTotals),
    /// Subscription chosen but no plan yet; there is no amount to show.
    Pending,
}

impl Quote {
    pub fn totals(&self) -> Option<&OrderTotals> {
        match self {
            Quote::Priced(totals) => Some(totals),
            Quote::Pending => None,
        }
    }
}

/// Prices the given purchase mode against the catalog.
///
/// Pure and deterministic. A plan id that the catalog does not know is
/// rejected instead of being priced with some default.
pub fn compute_totals(mode: &PurchaseMode, catalog: &Catalog) -> Result<Quote> {
    let quote = match mode {
        PurchaseMode::Subscription { plan: None } => Quote::Pending,
        PurchaseMode::Subscription { plan: Some(id) } => {
            let plan = catalog.plan(*id)?;
            Quote::Priced(OrderTotals::from_subtotal(
                plan.monthly_price,
                BillingFrequency::Monthly,
            ))
        }
        PurchaseMode::OneTime => {
            let subtotal = catalog.one_time_items().iter().map(|item| item.price).sum();
            Quote::Priced(OrderTotals::from_subtotal(subtotal, BillingFrequency::Once))
        }
    };
    Ok(quote)
}
