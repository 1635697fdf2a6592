//! Read-only projection of the pricing result for the order summary panel.

use super::catalog::Catalog;
use super::money::Money;
use super::pricing::{BillingFrequency, OrderTotals, Quote, TAX_LINE_LABEL, compute_totals};
use super::purchase::PurchaseMode;
use crate::error::Result;
use serde::Serialize;

pub const CHOOSE_PLAN_PROMPT: &str = "Choose a plan to see your total";
pub const REFUND_POLICY: &str = "30-day money-back guarantee";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryLine {
    pub label: String,
    pub value: String,
}

impl SummaryLine {
    fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderSummary {
    /// Catalog lines in catalog order, followed by the tax line.
    pub items: Vec<SummaryLine>,
    pub totals: OrderTotals,
    pub payment_schedule: &'static str,
    pub auto_renewal: bool,
    /// Shown for both purchase modes.
    pub refund_policy: &'static str,
}

impl OrderSummary {
    /// Every row in display order: itemization, then Subtotal, Tax and Total.
    pub fn rows(&self) -> Vec<SummaryLine> {
        let frequency = self.totals.frequency;
        let mut rows = self.items.clone();
        rows.push(SummaryLine::new("Subtotal", self.totals.subtotal.to_string()));
        rows.push(SummaryLine::new("Tax", self.totals.tax.to_string()));
        rows.push(SummaryLine::new(
            "Total",
            format!("{}{}", self.totals.total, frequency.suffix()),
        ));
        rows
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum SummaryView {
    Ready(OrderSummary),
    Pending { prompt: &'static str },
}

/// Builds the summary for the current selection. Has no effect on pricing.
pub fn summarize(mode: &PurchaseMode, catalog: &Catalog) -> Result<SummaryView> {
    let totals = match compute_totals(mode, catalog)? {
        Quote::Priced(totals) => totals,
        Quote::Pending => {
            return Ok(SummaryView::Pending {
                prompt: CHOOSE_PLAN_PROMPT,
            });
        }
    };

    let mut items: Vec<SummaryLine> = match mode.selected_plan() {
        Some(id) => {
            let plan = catalog.plan(id)?;
            vec![SummaryLine::new(&plan.name, plan.monthly_price.to_string())]
        }
        None => catalog
            .one_time_items()
            .iter()
            .map(|item| SummaryLine::new(&item.name, item.price.to_string()))
            .collect(),
    };
    items.push(SummaryLine::new(TAX_LINE_LABEL, totals.tax.to_string()));

    Ok(SummaryView::Ready(OrderSummary {
        items,
        totals,
        payment_schedule: payment_schedule(totals.frequency),
        auto_renewal: totals.frequency == BillingFrequency::Monthly,
        refund_policy: REFUND_POLICY,
    }))
}

fn payment_schedule(frequency: BillingFrequency) -> &'static str {
    match frequency {
        BillingFrequency::Monthly => "Monthly on the 1st",
        BillingFrequency::Once => "One-time charge",
    }
}

/// The amount to display in the summary, if any.
pub fn displayed_total(view: &SummaryView) -> Option<Money> {
    match view {
        SummaryView::Ready(summary) => Some(summary.totals.total),
        SummaryView::Pending { .. } => None,
    }
}
