mod common;

use common::{payout_json, TestConsole};
use ledger_console::models::PayoutStatus;
use ledger_console::utils::IdempotencyKey;
use ledger_console::workflows::{
    Activate, CreatePayoutForm, PayoutAction, PayoutManagement, PayoutRequestForm, RequestPayout,
    VendorPayouts,
};
use serde_json::json;
use uuid::Uuid;
use wiremock::matchers::{body_partial_json, header, header_regex, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn confirming_a_processing_payout_reloads_the_list() {
    let console = TestConsole::spawn().await;
    console.sign_in_admin();
    let processing = Uuid::new_v4();
    let settled = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/api/v1/payouts"))
        .and(query_param("size", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::page_json(vec![
            payout_json(processing, "PROCESSING", 250.0),
            payout_json(settled, "SETTLED", 75.0),
        ])))
        .up_to_n_times(1)
        .mount(&console.payout)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/payouts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::page_json(vec![
            payout_json(processing, "SETTLED", 250.0),
            payout_json(settled, "SETTLED", 75.0),
        ])))
        .expect(1)
        .mount(&console.payout)
        .await;

    Mock::given(method("POST"))
        .and(path(format!("/api/v1/payouts/{}/confirm", processing)))
        .and(header_regex("Idempotency-Key", "^confirm-.+"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(payout_json(processing, "SETTLED", 250.0)),
        )
        .expect(1)
        .mount(&console.payout)
        .await;

    let mut view = PayoutManagement::new(console.state.gateway.clone());
    view.activate().await;
    assert_eq!(view.payouts[0].status, PayoutStatus::Processing);

    let payout = view.confirm(processing).await.expect("confirm should succeed");

    assert_eq!(payout.status, PayoutStatus::Settled);
    assert!(view.payouts.iter().all(|p| p.status == PayoutStatus::Settled));
    assert!(view.error.is_empty());
}

#[tokio::test]
async fn settled_payout_cannot_be_reversed() {
    let console = TestConsole::spawn().await;
    console.sign_in_admin();
    let settled = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/api/v1/payouts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::page_json(vec![
            payout_json(settled, "SETTLED", 75.0),
        ])))
        .mount(&console.payout)
        .await;

    Mock::given(method("POST"))
        .and(path(format!("/api/v1/payouts/{}/reverse", settled)))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&console.payout)
        .await;

    let mut view = PayoutManagement::new(console.state.gateway.clone());
    view.activate().await;

    let err = view.reverse(settled).await.unwrap_err();
    assert!(err.user_message().starts_with("Payout cannot be reversed"));
    assert_eq!(view.error.get(), Some(err.user_message().as_str()));
}

#[tokio::test]
async fn resubmission_reuses_the_operator_supplied_key() {
    let console = TestConsole::spawn().await;
    console.sign_in_admin();
    let processing = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/api/v1/payouts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::page_json(vec![
            payout_json(processing, "PROCESSING", 40.0),
        ])))
        .mount(&console.payout)
        .await;

    Mock::given(method("POST"))
        .and(path(format!("/api/v1/payouts/{}/reverse", processing)))
        .and(header("Idempotency-Key", "reverse-retry-7"))
        .respond_with(
            ResponseTemplate::new(409).set_body_json(json!({ "message": "Duplicate request" })),
        )
        .expect(1)
        .mount(&console.payout)
        .await;

    let mut view = PayoutManagement::new(console.state.gateway.clone());
    view.load().await;

    let err = view
        .apply(
            processing,
            PayoutAction::Reverse,
            Some(IdempotencyKey::reuse("reverse-retry-7")),
        )
        .await
        .unwrap_err();

    assert_eq!(
        err.user_message(),
        "Duplicate request (idempotency). Please do not retry."
    );
}

#[tokio::test]
async fn vendor_sees_only_their_own_payouts() {
    let console = TestConsole::spawn().await;
    console.sign_in_vendor();
    let vendor_user = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/api/v1/users/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": vendor_user,
            "username": "vendor1",
            "roles": ["VENDOR"]
        })))
        .mount(&console.ledger)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/payouts"))
        .and(query_param("vendorId", vendor_user.to_string().as_str()))
        .and(query_param("size", "50"))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::page_json(vec![
            payout_json(Uuid::new_v4(), "CREATED", 20.0),
        ])))
        .expect(1)
        .mount(&console.payout)
        .await;

    let mut view = VendorPayouts::new(console.state.gateway.clone());
    view.activate().await;

    assert!(view.error.is_empty());
    assert_eq!(view.vendor_id, Some(vendor_user));
    assert_eq!(view.total_elements, 1);
}

#[tokio::test]
async fn payout_request_gets_a_fresh_scoped_key() {
    let console = TestConsole::spawn().await;
    console.sign_in_vendor();
    let payout_id = Uuid::new_v4();

    Mock::given(method("POST"))
        .and(path("/api/v1/payouts/request"))
        .and(header_regex("Idempotency-Key", "^payout-[0-9]+-[0-9]+-[A-Za-z0-9]+$"))
        .and(body_partial_json(json!({ "amount": 500.0, "currencyCode": "INR" })))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(payout_json(payout_id, "CREATED", 500.0)),
        )
        .expect(1)
        .mount(&console.payout)
        .await;

    let mut view = RequestPayout::new(console.state.gateway.clone());
    let form = PayoutRequestForm {
        amount: "500".to_string(),
        currency_code: None,
    };
    let payout = view.submit(&form, None).await.expect("payout request should succeed");

    assert_eq!(payout.id, payout_id);
    assert_eq!(view.result.as_ref().map(|p| p.status), Some(PayoutStatus::Created));
}

#[tokio::test]
async fn payout_request_below_minimum_sends_nothing() {
    let console = TestConsole::spawn().await;
    console.sign_in_vendor();

    Mock::given(method("POST"))
        .and(path("/api/v1/payouts/request"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&console.payout)
        .await;

    let mut view = RequestPayout::new(console.state.gateway.clone());
    let form = PayoutRequestForm {
        amount: "abc".to_string(),
        currency_code: Some("INR".to_string()),
    };

    let err = view.submit(&form, None).await.unwrap_err();
    assert_eq!(err.user_message(), "Amount must be at least 0.01");
    assert!(view.result.is_none());
}

#[tokio::test]
async fn admin_payout_for_a_vendor_is_keyed_and_reloads_the_list() {
    let console = TestConsole::spawn().await;
    console.sign_in_admin();
    let vendor = Uuid::new_v4();
    let vendor_wallet = Uuid::new_v4();
    let payout_id = Uuid::new_v4();

    Mock::given(method("POST"))
        .and(path("/api/v1/payouts"))
        .and(header_regex("Idempotency-Key", "^payout-[0-9]+-[0-9]+-[A-Za-z0-9]+$"))
        .and(body_partial_json(json!({
            "merchantId": common::MERCHANT_ID,
            "vendorId": vendor,
            "vendorWalletId": vendor_wallet,
            "amount": 75.5,
            "currencyCode": "INR"
        })))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(payout_json(payout_id, "CREATED", 75.5)),
        )
        .expect(1)
        .mount(&console.payout)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/payouts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::page_json(vec![
            payout_json(payout_id, "CREATED", 75.5),
        ])))
        .expect(1)
        .mount(&console.payout)
        .await;

    let mut view = PayoutManagement::new(console.state.gateway.clone());
    let form = CreatePayoutForm {
        merchant_id: Some(common::merchant_id()),
        vendor_id: Some(vendor),
        vendor_wallet_id: Some(vendor_wallet),
        amount: "75.50".to_string(),
        currency_code: None,
    };
    let payout = view.create(&form, None).await.expect("payout should be created");

    assert_eq!(payout.id, payout_id);
    assert_eq!(view.payouts.len(), 1);
    assert!(view.error.is_empty());
}

#[tokio::test]
async fn admin_payout_without_a_vendor_wallet_sends_nothing() {
    let console = TestConsole::spawn().await;
    console.sign_in_admin();

    let mut view = PayoutManagement::new(console.state.gateway.clone());
    let form = CreatePayoutForm {
        merchant_id: Some(common::merchant_id()),
        vendor_id: Some(Uuid::new_v4()),
        vendor_wallet_id: None,
        amount: "10".to_string(),
        currency_code: None,
    };
    let err = view.create(&form, None).await.unwrap_err();

    assert_eq!(
        err.user_message(),
        "Merchant, vendor and vendor wallet required"
    );
    assert!(console.payout.received_requests().await.unwrap_or_default().is_empty());
}
