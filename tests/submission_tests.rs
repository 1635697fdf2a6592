mod common;

use checkout::application::controller::{PaymentController, SubmissionConfig, SubmitOutcome};
use checkout::domain::form::SubmissionStatus;
use checkout::domain::money::Money;
use checkout::domain::payment::{Field, FieldValues, PaymentMethod};
use common::ScriptedGateway;
use rust_decimal_macros::dec;
use std::sync::Arc;
use std::time::Duration;

fn amount() -> Money {
    Money::new(dec!(57.74)).unwrap()
}

async fn fill(controller: &PaymentController, values: FieldValues) {
    for (field, value) in values {
        controller.set_field(field, value).await.unwrap();
    }
}

#[tokio::test(start_paused = true)]
async fn test_rapid_resubmits_invoke_gateway_once() {
    let gateway = Arc::new(ScriptedGateway::new(Duration::from_millis(1_500)));
    let controller = PaymentController::new(
        gateway.clone(),
        PaymentMethod::Card,
        SubmissionConfig::default(),
    );
    fill(&controller, common::valid_card()).await;

    let handles: Vec<_> = (0..5)
        .map(|_| {
            let controller = controller.clone();
            tokio::spawn(async move { controller.submit(amount()).await })
        })
        .collect();

    let mut succeeded = 0;
    let mut ignored = 0;
    for handle in handles {
        match handle.await.unwrap() {
            SubmitOutcome::Succeeded(_) => succeeded += 1,
            SubmitOutcome::Ignored => ignored += 1,
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    assert_eq!(gateway.invocations(), 1);
    assert_eq!(succeeded, 1);
    assert_eq!(ignored, 4);
}

#[tokio::test(start_paused = true)]
async fn test_request_carries_amount_provider_and_fields() {
    let gateway = Arc::new(ScriptedGateway::new(Duration::ZERO));
    let controller = PaymentController::new(
        gateway.clone(),
        PaymentMethod::RedirectWallet,
        SubmissionConfig::default(),
    );
    fill(&controller, common::valid_wallet()).await;

    controller.submit(amount()).await;

    let requests = gateway.requests();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.provider, "paypal");
    assert_eq!(request.method, PaymentMethod::RedirectWallet);
    assert_eq!(request.amount, amount());
    assert_eq!(request.fields.get(Field::Email), Some("buyer@example.com"));
}

#[tokio::test(start_paused = true)]
async fn test_invalid_form_never_reaches_gateway() {
    let gateway = Arc::new(ScriptedGateway::new(Duration::ZERO));
    let controller = PaymentController::new(
        gateway.clone(),
        PaymentMethod::RedirectWallet,
        SubmissionConfig::default(),
    );
    controller.set_field(Field::Email, "not-an-email").await.unwrap();
    controller
        .set_field(Field::ConfirmEmail, "buyer@example.com")
        .await
        .unwrap();

    let outcome = controller.submit(amount()).await;
    let SubmitOutcome::Rejected(errors) = &outcome else {
        panic!("expected rejection, got {outcome:?}");
    };
    assert_eq!(
        errors.get(&Field::Email).map(String::as_str),
        Some("Invalid email address")
    );
    assert!(!errors.contains_key(&Field::ConfirmEmail));
    assert_eq!(gateway.invocations(), 0);
    assert_eq!(controller.status().await, SubmissionStatus::Idle);
}

#[tokio::test(start_paused = true)]
async fn test_errors_clear_after_fix() {
    let gateway = Arc::new(ScriptedGateway::new(Duration::ZERO));
    let controller = PaymentController::new(
        gateway.clone(),
        PaymentMethod::Card,
        SubmissionConfig::default(),
    );
    let mut values = common::valid_card();
    values.insert(Field::Cvc, "12".to_string());
    fill(&controller, values).await;

    controller.submit(amount()).await;
    assert_eq!(
        controller.snapshot().await.error(Field::Cvc),
        Some("CVC must be 3-4 digits")
    );

    controller.set_field(Field::Cvc, "1234").await.unwrap();
    let outcome = controller.submit(amount()).await;
    assert!(matches!(outcome, SubmitOutcome::Succeeded(_)));
    assert!(controller.snapshot().await.errors.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_decline_then_retry_succeeds() {
    let gateway = Arc::new(
        ScriptedGateway::new(Duration::from_millis(1_500))
            .then_decline("Payment failed. Please try again.")
            .then_approve(),
    );
    let controller = PaymentController::new(
        gateway.clone(),
        PaymentMethod::Card,
        SubmissionConfig::default(),
    );
    fill(&controller, common::valid_card()).await;

    let first = controller.submit(amount()).await;
    assert_eq!(
        first,
        SubmitOutcome::Failed("Payment failed. Please try again.".to_string())
    );
    let form = controller.snapshot().await;
    assert_eq!(form.values, common::valid_card());

    let second = controller.submit(amount()).await;
    assert!(matches!(second, SubmitOutcome::Succeeded(_)));
    assert_eq!(gateway.invocations(), 2);
    assert!(controller.snapshot().await.values.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_success_reverts_to_idle_without_user_action() {
    let gateway = Arc::new(ScriptedGateway::new(Duration::from_millis(1_500)));
    let controller = PaymentController::new(
        gateway,
        PaymentMethod::RedirectWallet,
        SubmissionConfig::default(),
    );
    fill(&controller, common::valid_wallet()).await;

    assert!(matches!(
        controller.submit(amount()).await,
        SubmitOutcome::Succeeded(_)
    ));
    let form = controller.snapshot().await;
    assert_eq!(form.status, SubmissionStatus::Succeeded);
    assert!(form.values.is_empty());

    tokio::time::sleep(Duration::from_secs(5) + Duration::from_millis(10)).await;
    assert_eq!(controller.status().await, SubmissionStatus::Idle);
}

#[tokio::test(start_paused = true)]
async fn test_new_submit_cancels_pending_reset() {
    let gateway = Arc::new(ScriptedGateway::new(Duration::from_secs(1)));
    let controller = PaymentController::new(
        gateway.clone(),
        PaymentMethod::RedirectWallet,
        SubmissionConfig::default(),
    );

    // First payment succeeds at t=1s; its reset is due at t=6s.
    fill(&controller, common::valid_wallet()).await;
    controller.submit(amount()).await;

    // The customer pays again from the success screen; that succeeds at t=5s.
    tokio::time::sleep(Duration::from_secs(3)).await;
    fill(&controller, common::valid_wallet()).await;
    assert!(matches!(
        controller.submit(amount()).await,
        SubmitOutcome::Succeeded(_)
    ));

    // The stale reset must not cut the second success short.
    tokio::time::sleep(Duration::from_secs(2)).await;
    assert_eq!(controller.status().await, SubmissionStatus::Succeeded);

    tokio::time::sleep(Duration::from_millis(3_100)).await;
    assert_eq!(controller.status().await, SubmissionStatus::Idle);
    assert_eq!(gateway.invocations(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_edits_during_submission_are_buffered() {
    let gateway = Arc::new(ScriptedGateway::new(Duration::from_millis(1_500)).then_decline("no"));
    let controller = PaymentController::new(
        gateway,
        PaymentMethod::RedirectWallet,
        SubmissionConfig::default(),
    );
    fill(&controller, common::valid_wallet()).await;

    let in_flight = {
        let controller = controller.clone();
        tokio::spawn(async move { controller.submit(amount()).await })
    };
    tokio::time::sleep(Duration::from_millis(10)).await;
    controller
        .set_field(Field::Email, "other@example.com")
        .await
        .unwrap();

    assert_eq!(in_flight.await.unwrap(), SubmitOutcome::Failed("no".to_string()));
    assert_eq!(
        controller.snapshot().await.value(Field::Email),
        Some("other@example.com")
    );
}

#[tokio::test(start_paused = true)]
async fn test_matching_confirmation_enforced_when_configured() {
    let gateway = Arc::new(ScriptedGateway::new(Duration::ZERO));
    let config = SubmissionConfig {
        require_matching_confirmation: true,
        ..SubmissionConfig::default()
    };
    let controller = PaymentController::new(gateway.clone(), PaymentMethod::RedirectWallet, config);
    controller.set_field(Field::Email, "a@example.com").await.unwrap();
    controller
        .set_field(Field::ConfirmEmail, "b@example.com")
        .await
        .unwrap();

    let outcome = controller.submit(amount()).await;
    assert!(matches!(outcome, SubmitOutcome::Rejected(_)));
    assert_eq!(
        controller.snapshot().await.error(Field::ConfirmEmail),
        Some("Emails do not match")
    );
    assert_eq!(gateway.invocations(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_abandoned_submit_still_settles() {
    let gateway = Arc::new(ScriptedGateway::new(Duration::from_secs(2)));
    let controller = PaymentController::new(
        gateway.clone(),
        PaymentMethod::RedirectWallet,
        SubmissionConfig::default(),
    );
    fill(&controller, common::valid_wallet()).await;

    let caller = tokio::time::timeout(Duration::from_millis(100), controller.submit(amount())).await;
    assert!(caller.is_err());
    assert_eq!(controller.status().await, SubmissionStatus::Submitting);

    // The payment was already sent, so it completes without the caller.
    tokio::time::sleep(Duration::from_secs(2)).await;
    assert_eq!(controller.status().await, SubmissionStatus::Succeeded);
    assert_eq!(gateway.invocations(), 1);

    tokio::time::sleep(Duration::from_secs(60)).await;
    assert_eq!(controller.status().await, SubmissionStatus::Idle);

    fill(&controller, common::valid_wallet()).await;
    assert!(matches!(
        controller.submit(amount()).await,
        SubmitOutcome::Succeeded(_)
    ));
    assert_eq!(gateway.invocations(), 2);
}
