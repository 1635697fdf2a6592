use crate::domain::catalog::{Catalog, LineItem, Plan, PlanId};
use crate::domain::money::Money;
use crate::error::{CheckoutError, Result};
use serde::Deserialize;
use std::io::Read;

#[derive(Debug, Deserialize, PartialEq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Plan,
    Item,
}

/// One row of a catalog file.
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct CatalogRecord {
    pub kind: EntryKind,
    pub id: Option<PlanId>,
    pub name: String,
    pub price: Money,
    pub description: Option<String>,
}

/// Reads a catalog from a CSV source.
///
/// Expects the header `kind, id, name, price, description`. Whitespace is
/// trimmed and trailing empty columns may be left out.
pub struct CatalogReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> CatalogReader<R> {
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Lazily deserializes the rows.
    pub fn records(self) -> impl Iterator<Item = Result<CatalogRecord>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(CheckoutError::from))
    }

    /// Reads every row and builds the catalog. Any bad row fails the whole
    /// catalog, since prices must never be guessed.
    pub fn read_catalog(self) -> Result<Catalog> {
        let mut plans = Vec::new();
        let mut items = Vec::new();

        for (index, record) in self.records().enumerate() {
            let record = record.map_err(|e| {
                CheckoutError::ConfigurationError(format!("catalog row {}: {e}", index + 1))
            })?;
            match record.kind {
                EntryKind::Plan => {
                    let id = record.id.ok_or_else(|| {
                        CheckoutError::ConfigurationError(format!(
                            "catalog row {}: plan '{}' has no id",
                            index + 1,
                            record.name
                        ))
                    })?;
                    plans.push(Plan {
                        id,
                        name: record.name,
                        monthly_price: record.price,
                        description: record.description.filter(|d| !d.is_empty()),
                    });
                }
                EntryKind::Item => items.push(LineItem {
                    name: record.name,
                    price: record.price,
                }),
            }
        }

        Catalog::new(plans, items)
    }
}
