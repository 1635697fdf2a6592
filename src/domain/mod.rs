//! Checkout domain: money, catalog, pricing, payment forms and their schemas.
//!
//! Everything here is synchronous and free of I/O. The only outward seam is
//! the `PaymentGateway` port.

pub mod catalog;
pub mod form;
pub mod money;
pub mod payment;
pub mod ports;
pub mod pricing;
pub mod purchase;
pub mod summary;
pub mod validation;
