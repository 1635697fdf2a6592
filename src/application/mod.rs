//! Application layer orchestrating the checkout.
//!
//! `PaymentController` owns the submission state machine of one payment form.
//! `CheckoutSession` ties it to the purchase selection and the pricing engine.

pub mod checkout;
pub mod controller;
