//! Field schemas for each payment method.
//!
//! Every field of the active schema is checked and every failure is reported;
//! validation never stops at the first bad field.

use super::payment::{Field, FieldErrors, FieldValues, PaymentMethod, ValidatedFields};
use once_cell::sync::Lazy;
use regex::Regex;

pub const MISMATCHED_EMAIL_MESSAGE: &str = "Emails do not match";

static CARD_NUMBER_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{16}$").expect("Invalid card number regex"));
static EXPIRY_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{2}/[0-9]{2}$").expect("Invalid expiry regex"));
static CVC_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{3,4}$").expect("Invalid CVC regex"));
static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("Invalid email regex")
});

/// A single field constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Non-empty, reported with the given message.
    Required(&'static str),
    CardNumber,
    Expiry,
    Cvc,
    Email,
}

impl Rule {
    /// Message shown next to the field when the rule fails.
    pub fn message(&self) -> &'static str {
        match self {
            Rule::Required(message) => *message,
            Rule::CardNumber => "Card number must be 16 digits",
            Rule::Expiry => "Format: MM/YY",
            Rule::Cvc => "CVC must be 3-4 digits",
            Rule::Email => "Invalid email address",
        }
    }

    /// Returns the error message if `value` breaks the rule.
    pub fn check(&self, value: &str) -> Option<&'static str> {
        let passed = match self {
            Rule::Required(_) => !value.is_empty(),
            Rule::CardNumber => CARD_NUMBER_PATTERN.is_match(value),
            Rule::Expiry => EXPIRY_PATTERN.is_match(value),
            Rule::Cvc => CVC_PATTERN.is_match(value),
            Rule::Email => EMAIL_PATTERN.is_match(value),
        };
        (!passed).then(|| self.message())
    }
}

const CARD_SCHEMA: &[(Field, Rule)] = &[
    (Field::CardholderName, Rule::Required("Cardholder name is required")),
    (Field::CardNumber, Rule::CardNumber),
    (Field::Expiry, Rule::Expiry),
    (Field::Cvc, Rule::Cvc),
    (Field::Email, Rule::Email),
];

const WALLET_SCHEMA: &[(Field, Rule)] = &[
    (Field::Email, Rule::Email),
    (Field::ConfirmEmail, Rule::Email),
];

/// The schema of a payment method.
pub fn schema(method: PaymentMethod) -> &'static [(Field, Rule)] {
    match method {
        PaymentMethod::Card => CARD_SCHEMA,
        PaymentMethod::RedirectWallet => WALLET_SCHEMA,
    }
}

/// Optional checks on top of the per-field schema.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidationPolicy {
    /// Reject a wallet form whose confirmation email differs from the email.
    pub require_matching_confirmation: bool,
}

/// Validates `values` against the schema of `method`.
///
/// Missing fields are checked as empty strings. Values of fields outside the
/// schema are ignored and not carried into the result.
pub fn validate(
    method: PaymentMethod,
    values: &FieldValues,
    policy: ValidationPolicy,
) -> Result<ValidatedFields, FieldErrors> {
    let mut errors = FieldErrors::new();
    let mut accepted = FieldValues::new();

    for (field, rule) in schema(method) {
        let value = values.get(field).map(String::as_str).unwrap_or_default();
        match rule.check(value) {
            Some(message) => {
                errors.insert(*field, message.to_string());
            }
            None => {
                accepted.insert(*field, value.to_string());
            }
        }
    }

    if method == PaymentMethod::RedirectWallet
        && policy.require_matching_confirmation
        && !errors.contains_key(&Field::ConfirmEmail)
        && !confirmation_matches(values)
    {
        errors.insert(Field::ConfirmEmail, MISMATCHED_EMAIL_MESSAGE.to_string());
    }

    if errors.is_empty() {
        Ok(ValidatedFields::new(method, accepted))
    } else {
        Err(errors)
    }
}

/// Whether the wallet email and its confirmation are identical.
pub fn confirmation_matches(values: &FieldValues) -> bool {
    values.get(&Field::Email) == values.get(&Field::ConfirmEmail)
}
