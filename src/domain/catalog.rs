use super::money::Money;
use crate::error::{CheckoutError, Result};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// Identifier of a subscription tier. The set of tiers is fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanId {
    Starter,
    Pro,
    Enterprise,
}

impl PlanId {
    pub const ALL: [PlanId; 3] = [PlanId::Starter, PlanId::Pro, PlanId::Enterprise];

    pub fn as_str(&self) -> &'static str {
        match self {
            PlanId::Starter => "starter",
            PlanId::Pro => "pro",
            PlanId::Enterprise => "enterprise",
        }
    }
}

impl fmt::Display for PlanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlanId {
    type Err = CheckoutError;

    fn from_str(s: &str) -> Result<Self> {
        PlanId::ALL
            .into_iter()
            .find(|id| id.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CheckoutError::UnknownPlan(s.to_string()))
    }
}

/// A recurring subscription tier with a fixed monthly price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub id: PlanId,
    pub name: String,
    pub monthly_price: Money,
    #[serde(default)]
    pub description: Option<String>,
}

/// One priced component of a one-time purchase. A zero price marks a waived fee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub name: String,
    pub price: Money,
}

/// The process-wide, read-only set of plans and one-time line items.
///
/// Built once at startup and shared by reference with the pricing engine and
/// the summary projection, so both always see the same prices.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Catalog {
    plans: Vec<Plan>,
    one_time_items: Vec<LineItem>,
}

impl Catalog {
    /// Builds a catalog, rejecting duplicate plan ids.
    pub fn new(plans: Vec<Plan>, one_time_items: Vec<LineItem>) -> Result<Self> {
        let mut seen = HashSet::new();
        for plan in &plans {
            if !seen.insert(plan.id) {
                return Err(CheckoutError::ConfigurationError(format!(
                    "duplicate plan id '{}'",
                    plan.id
                )));
            }
        }
        Ok(Self {
            plans,
            one_time_items,
        })
    }

    /// The reference catalog the checkout page ships with.
    pub fn standard() -> Self {
        let plan = |id, name: &str, price, description: &str| Plan {
            id,
            name: name.to_string(),
            monthly_price: Money(price),
            description: Some(description.to_string()),
        };
        let item = |name: &str, price| LineItem {
            name: name.to_string(),
            price: Money(price),
        };

        Self {
            plans: vec![
                plan(PlanId::Starter, "Starter Plan", dec!(9.99), "For individuals"),
                plan(PlanId::Pro, "Professional Plan", dec!(29.99), "For teams"),
                plan(
                    PlanId::Enterprise,
                    "Enterprise Plan",
                    dec!(99.99),
                    "For enterprises",
                ),
            ],
            one_time_items: vec![
                item("Premium Product", dec!(49.99)),
                item("Setup Fee", dec!(0)),
                item("Processing Fee", dec!(2.5)),
            ],
        }
    }

    pub fn plans(&self) -> &[Plan] {
        &self.plans
    }

    pub fn one_time_items(&self) -> &[LineItem] {
        &self.one_time_items
    }

    /// Looks up a plan. A plan missing from the catalog is a data error and is
    /// never replaced with a default price.
    pub fn plan(&self, id: PlanId) -> Result<&Plan> {
        self.plans
            .iter()
            .find(|plan| plan.id == id)
            .ok_or_else(|| CheckoutError::UnknownPlan(id.to_string()))
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_catalog_contents() {
        let catalog = Catalog::standard();
        assert_eq!(catalog.plans().len(), 3);
        assert_eq!(
            catalog.plan(PlanId::Pro).unwrap().monthly_price,
            Money(dec!(29.99))
        );

        let names: Vec<&str> = catalog
            .one_time_items()
            .iter()
            .map(|item| item.name.as_str())
            .collect();
        assert_eq!(names, ["Premium Product", "Setup Fee", "Processing Fee"]);
    }

    #[test]
    fn test_plan_id_parsing() {
        assert_eq!("pro".parse::<PlanId>().unwrap(), PlanId::Pro);
        assert_eq!(" Enterprise ".parse::<PlanId>().unwrap(), PlanId::Enterprise);
        assert!(matches!(
            "platinum".parse::<PlanId>(),
            Err(CheckoutError::UnknownPlan(_))
        ));
    }

    #[test]
    fn test_missing_plan_is_an_error() {
        let catalog = Catalog::new(Vec::new(), Vec::new()).unwrap();
        assert!(matches!(
            catalog.plan(PlanId::Starter),
            Err(CheckoutError::UnknownPlan(_))
        ));
    }

    #[test]
    fn test_duplicate_plan_ids_rejected() {
        let starter = Catalog::standard().plans()[0].clone();
        let result = Catalog::new(vec![starter.clone(), starter], Vec::new());
        assert!(matches!(result, Err(CheckoutError::ConfigurationError(_))));
    }
}
