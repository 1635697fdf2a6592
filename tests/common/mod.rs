#![allow(dead_code)]

use async_trait::async_trait;
use checkout::domain::payment::{Field, FieldValues};
use checkout::domain::ports::{Confirmation, PaymentGateway, PaymentRequest};
use checkout::error::{CheckoutError, Result};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Gateway that records every request and answers from a script.
///
/// Unscripted calls succeed.
pub struct ScriptedGateway {
    latency: Duration,
    invocations: AtomicUsize,
    script: Mutex<VecDeque<std::result::Result<(), String>>>,
    requests: Mutex<Vec<PaymentRequest>>,
}

impl ScriptedGateway {
    pub fn new(latency: Duration) -> Self {
        Self {
            latency,
            invocations: AtomicUsize::new(0),
            script: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn then_decline(self, message: &str) -> Self {
        self.script
            .lock()
            .unwrap()
            .push_back(Err(message.to_string()));
        self
    }

    pub fn then_approve(self) -> Self {
        self.script.lock().unwrap().push_back(Ok(()));
        self
    }

    pub fn invocations(&self) -> usize {
        self.invocations.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<PaymentRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl PaymentGateway for ScriptedGateway {
    async fn submit_payment(&self, request: PaymentRequest) -> Result<Confirmation> {
        let call = self.invocations.fetch_add(1, Ordering::SeqCst) + 1;
        self.requests.lock().unwrap().push(request.clone());
        tokio::time::sleep(self.latency).await;

        let next = self.script.lock().unwrap().pop_front().unwrap_or(Ok(()));
        match next {
            Ok(()) => Ok(Confirmation {
                reference: format!("test-{call}"),
                amount: request.amount,
            }),
            Err(message) => Err(CheckoutError::SubmissionError(message)),
        }
    }
}

pub fn valid_card() -> FieldValues {
    FieldValues::from([
        (Field::CardholderName, "John Doe".to_string()),
        (Field::CardNumber, "4242424242424242".to_string()),
        (Field::Expiry, "08/28".to_string()),
        (Field::Cvc, "123".to_string()),
        (Field::Email, "john@example.com".to_string()),
    ])
}

pub fn valid_wallet() -> FieldValues {
    FieldValues::from([
        (Field::Email, "buyer@example.com".to_string()),
        (Field::ConfirmEmail, "buyer@example.com".to_string()),
    ])
}
