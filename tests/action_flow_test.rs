//! Purchase/tip/transfer through the marketplace service and the app state

mod common;

use common::{listing, marketplace, resource_json, InvokeOutcome, StubChain, StubInvoker};
use nftmart::app::App;
use nftmart::domain::{ActionKind, ActionPhase, ValidationError};
use nftmart::infrastructure::aptos::{ActionError, ChainError};

#[tokio::test]
async fn test_tip_rejected_locally_without_invoke() {
    let invoker = StubInvoker::new(Some("0xme"), InvokeOutcome::Confirm);
    let market = marketplace(StubChain::serving(resource_json(&[])), invoker.clone());

    for bad in ["0", "-5"] {
        let err = market.tip("0xcreator", bad).await.unwrap_err();
        assert!(matches!(
            err,
            ActionError::Validation(ValidationError::NonPositiveAmount)
        ));
    }
    let err = market.tip("0xcreator", "lots").await.unwrap_err();
    assert!(matches!(err, ActionError::Validation(ValidationError::InvalidAmount)));
    assert_eq!(invoker.calls(), 0);
}

#[test]
fn test_tip_inline_message_in_app() {
    let mut app = App::new();
    app.apply_listings(vec![listing(1, 2, 1)]);
    app.open_tip();
    app.modal_push('0');
    app.confirm_modal();

    assert!(app.take_action_request().is_none());
    assert_eq!(
        app.modal.as_ref().and_then(|m| m.error.as_deref()),
        Some("Please enter a valid amount greater than zero.")
    );
}

#[tokio::test]
async fn test_tip_requires_connected_wallet() {
    let invoker = StubInvoker::new(None, InvokeOutcome::Confirm);
    let market = marketplace(StubChain::serving(resource_json(&[])), invoker.clone());

    let err = market.tip("0xcreator", "1").await.unwrap_err();
    assert!(matches!(err, ActionError::NotConnected));
    assert!(err.is_local());
    assert_eq!(invoker.calls(), 0);
}

#[tokio::test]
async fn test_purchase_timeout_keeps_listings() {
    let invoker = StubInvoker::new(Some("0xme"), InvokeOutcome::Timeout);
    let market = marketplace(
        StubChain::serving(resource_json(&[(1, 2, 1, true), (2, 3, 1, true)])),
        invoker.clone(),
    );

    let mut app = App::new();
    app.apply_listings(market.fetch_listings().await.unwrap());
    let before = app.listings.clone();

    app.open_purchase();
    app.confirm_modal();
    let request = app.take_action_request().expect("purchase queued");
    assert!(app.action_phase.is_submitting());

    let err = market.submit(request).await.unwrap_err();
    assert!(matches!(err, ActionError::Confirmation(ChainError::Timeout { .. })));
    app.apply_action_failed(ActionKind::Purchase, err.to_string());

    assert_eq!(invoker.calls(), 1);
    assert_eq!(app.listings, before);
    assert!(!app.take_fetch_request());
    assert!(matches!(app.action_phase, ActionPhase::Failed { .. }));
    let feedback = app.feedback.as_ref().unwrap();
    assert!(!feedback.success);
    assert_eq!(feedback.message, "Failed to purchase NFT.");
}

#[tokio::test]
async fn test_purchase_payload_uses_exact_price() {
    let invoker = StubInvoker::new(Some("0xme"), InvokeOutcome::Confirm);
    let market = marketplace(StubChain::serving(resource_json(&[])), invoker.clone());

    let outcome = market.purchase(&listing(7, 3, 2)).await.unwrap();
    assert_eq!(outcome.kind, ActionKind::Purchase);

    let payloads = invoker.payloads.lock().unwrap();
    assert_eq!(payloads[0].function, "0xmodule::NFTMarketplace::purchase_nft");
    assert_eq!(payloads[0].arguments, vec!["0xmarket", "7", "300000000"]);
    assert!(payloads[0].type_arguments.is_empty());
}

#[tokio::test]
async fn test_transfer_validation_and_rejection() {
    let invoker = StubInvoker::new(Some("0xme"), InvokeOutcome::Reject);
    let market = marketplace(StubChain::serving(resource_json(&[])), invoker.clone());

    let err = market.transfer(1, "   ").await.unwrap_err();
    assert!(matches!(err, ActionError::Validation(ValidationError::EmptyRecipient)));
    assert_eq!(invoker.calls(), 0);

    let err = market.transfer(1, " 0xfriend ").await.unwrap_err();
    assert!(matches!(err, ActionError::Confirmation(ChainError::Rejected { .. })));
    assert_eq!(
        invoker.payloads.lock().unwrap()[0].arguments,
        vec!["0xmarket", "1", "0xfriend"]
    );
}

#[test]
fn test_confirmed_action_requests_refetch() {
    let mut app = App::new();
    app.apply_listings(vec![listing(1, 2, 1)]);
    app.open_transfer();
    for ch in "0xfriend".chars() {
        app.modal_push(ch);
    }
    app.confirm_modal();
    assert!(app.take_action_request().is_some());

    app.apply_action_confirmed(ActionKind::Transfer, "0xhash".to_string());
    assert!(app.take_fetch_request());
    assert_eq!(app.listings.len(), 1);
    assert!(app.feedback.as_ref().unwrap().success);
}
