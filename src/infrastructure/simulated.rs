use crate::domain::ports::{Confirmation, PaymentGateway, PaymentRequest};
use crate::error::{CheckoutError, Result};
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::debug;

/// Round trip of the simulated payment provider.
pub const DEFAULT_LATENCY: Duration = Duration::from_millis(1_500);

/// A stand-in payment provider: waits for a fixed delay, then either accepts
/// every payment or declines every payment with the same message.
///
/// No money moves. Confirmation references are sequential per gateway.
#[derive(Debug)]
pub struct SimulatedGateway {
    latency: Duration,
    decline: Option<String>,
    issued: AtomicU64,
}

impl SimulatedGateway {
    /// A gateway that approves after `latency`.
    pub fn new(latency: Duration) -> Self {
        Self {
            latency,
            decline: None,
            issued: AtomicU64::new(0),
        }
    }

    /// A gateway that approves without any delay.
    pub fn instant() -> Self {
        Self::new(Duration::ZERO)
    }

    /// A gateway that declines every payment with `message`, without delay.
    pub fn declining(message: impl Into<String>) -> Self {
        Self::instant().with_decline(message)
    }

    pub fn with_decline(mut self, message: impl Into<String>) -> Self {
        self.decline = Some(message.into());
        self
    }

    /// Number of payments this gateway has been asked to take.
    pub fn calls(&self) -> u64 {
        self.issued.load(Ordering::SeqCst)
    }
}

impl Default for SimulatedGateway {
    fn default() -> Self {
        Self::new(DEFAULT_LATENCY)
    }
}

#[async_trait]
impl PaymentGateway for SimulatedGateway {
    async fn submit_payment(&self, request: PaymentRequest) -> Result<Confirmation> {
        let sequence = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(
            provider = request.provider,
            amount = %request.amount,
            sequence,
            "simulated gateway received payment"
        );

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        match &self.decline {
            Some(message) => Err(CheckoutError::SubmissionError(message.clone())),
            None => Ok(Confirmation {
                reference: format!("{}-{:06}", request.provider, sequence),
                amount: request.amount,
            }),
        }
    }
}
