use super::money::Money;
use crate::error::{CheckoutError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// The checkout variant the customer pays with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Card,
    /// Redirects the customer to a wallet provider (PayPal-style).
    RedirectWallet,
}

impl PaymentMethod {
    /// Tag the payment collaborator receives.
    pub fn provider(&self) -> &'static str {
        match self {
            PaymentMethod::Card => "stripe",
            PaymentMethod::RedirectWallet => "paypal",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            PaymentMethod::Card => "Card",
            PaymentMethod::RedirectWallet => "PayPal",
        }
    }

    /// Fields of this method's form, in display order.
    pub fn fields(&self) -> &'static [Field] {
        match self {
            PaymentMethod::Card => &[
                Field::Email,
                Field::CardholderName,
                Field::CardNumber,
                Field::Expiry,
                Field::Cvc,
            ],
            PaymentMethod::RedirectWallet => &[Field::Email, Field::ConfirmEmail],
        }
    }

    pub fn accepts(&self, field: Field) -> bool {
        self.fields().contains(&field)
    }

    /// Submit button caption, e.g. "Pay $57.74 with Card".
    pub fn pay_label(&self, amount: Money) -> String {
        format!("Pay {} with {}", amount, self.display_name())
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for PaymentMethod {
    type Err = CheckoutError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "card" | "stripe" => Ok(PaymentMethod::Card),
            "paypal" | "wallet" | "redirect_wallet" => Ok(PaymentMethod::RedirectWallet),
            other => Err(CheckoutError::ValidationError(format!(
                "unknown payment method '{other}'"
            ))),
        }
    }
}

/// A form field across both payment methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    #[serde(rename = "cardName")]
    CardholderName,
    CardNumber,
    #[serde(rename = "expiryDate")]
    Expiry,
    Cvc,
    Email,
    ConfirmEmail,
}

impl Field {
    pub const ALL: [Field; 6] = [
        Field::CardholderName,
        Field::CardNumber,
        Field::Expiry,
        Field::Cvc,
        Field::Email,
        Field::ConfirmEmail,
    ];

    /// Wire name of the field.
    pub fn name(&self) -> &'static str {
        match self {
            Field::CardholderName => "cardName",
            Field::CardNumber => "cardNumber",
            Field::Expiry => "expiryDate",
            Field::Cvc => "cvc",
            Field::Email => "email",
            Field::ConfirmEmail => "confirmEmail",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Field {
    type Err = CheckoutError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        Field::ALL
            .into_iter()
            .find(|field| field.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| CheckoutError::ValidationError(format!("unknown field '{wanted}'")))
    }
}

/// Entered values, keyed by field.
pub type FieldValues = BTreeMap<Field, String>;

/// Validation messages, keyed by field. Empty when the form is valid.
pub type FieldErrors = BTreeMap<Field, String>;

/// Values that passed the schema of their payment method.
///
/// Only the validation module can build one, so holding a `ValidatedFields`
/// means the schema has been checked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidatedFields {
    method: PaymentMethod,
    values: FieldValues,
}

impl ValidatedFields {
    pub(crate) fn new(method: PaymentMethod, values: FieldValues) -> Self {
        Self { method, values }
    }

    pub fn method(&self) -> PaymentMethod {
        self.method
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.values.get(&field).map(String::as_str)
    }

    pub fn values(&self) -> &FieldValues {
        &self.values
    }
}
