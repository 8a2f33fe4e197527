mod common;

use common::{merchant_id, wallet_json, TestConsole};
use ledger_console::models::CommissionType;
use ledger_console::workflows::{
    Activate, CommissionEarnings, EscrowBalance, MerchantList, VendorWallets,
};
use rust_decimal::Decimal;
use serde_json::json;
use uuid::Uuid;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn commission_not_configured_shows_no_rate_and_no_error() {
    let console = TestConsole::spawn().await;
    let (_, identity) = console.sign_in_merchant();

    Mock::given(method("GET"))
        .and(path(format!("/api/v1/merchants/{}/commission", merchant_id())))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&console.payout)
        .await;

    let mut view = CommissionEarnings::new(console.state.gateway.clone(), &identity);
    view.activate().await;

    assert!(view.rate().is_none());
    assert!(view.error.is_empty());
}

#[tokio::test]
async fn setting_a_rate_sends_a_percentage_in_inr() {
    let console = TestConsole::spawn().await;
    let (_, identity) = console.sign_in_merchant();

    Mock::given(method("PUT"))
        .and(path(format!("/api/v1/merchants/{}/commission", merchant_id())))
        .and(body_partial_json(json!({
            "commissionType": "PERCENTAGE",
            "percentageValue": 12.5,
            "currencyCode": "INR"
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&console.payout)
        .await;

    let mut view = CommissionEarnings::new(console.state.gateway.clone(), &identity);
    let rate = view.set_rate(" 12.5 ").await.expect("rate should be saved");

    assert_eq!(rate, Decimal::new(125, 1));
    assert_eq!(view.rate(), Some(Decimal::new(125, 1)));
    assert_eq!(
        view.commission.as_ref().map(|c| c.commission_type),
        Some(CommissionType::Percentage)
    );
}

#[tokio::test]
async fn out_of_range_rate_is_rejected_before_any_call() {
    let console = TestConsole::spawn().await;
    let (_, identity) = console.sign_in_merchant();

    let mut view = CommissionEarnings::new(console.state.gateway.clone(), &identity);
    let err = view.set_rate("150").await.unwrap_err();

    assert_eq!(err.user_message(), "Enter a valid rate 0-100");
    assert_eq!(view.error.get(), Some("Enter a valid rate 0-100"));
    assert!(console.payout.received_requests().await.unwrap_or_default().is_empty());
}

#[tokio::test]
async fn escrow_balance_reads_the_inr_escrow_wallet() {
    let console = TestConsole::spawn().await;
    let (_, identity) = console.sign_in_merchant();
    let escrow = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path(format!("/api/v1/merchants/{}/wallets/by-type", merchant_id())))
        .and(query_param("walletType", "ESCROW"))
        .and(query_param("currencyCode", "INR"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(wallet_json(escrow, "ESCROW", "ACTIVE", 1250.0)),
        )
        .expect(1)
        .mount(&console.ledger)
        .await;

    let mut view = EscrowBalance::new(console.state.gateway.clone(), &identity);
    view.activate().await;

    let wallet = view.wallet.as_ref().expect("escrow wallet shown");
    assert_eq!(wallet.id, Some(escrow));
    assert_eq!(wallet.balance, Decimal::from(1250));
    assert!(view.error.is_empty());
}

#[tokio::test]
async fn vendor_wallets_keep_rows_whose_wallet_failed_to_load() {
    let console = TestConsole::spawn().await;
    let (_, identity) = console.sign_in_merchant();
    let healthy = Uuid::new_v4();
    let missing = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path(format!("/api/v1/merchants/{}/vendors", merchant_id())))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "userId": Uuid::new_v4(), "username": "vendor1", "vendorWalletId": healthy },
            { "userId": Uuid::new_v4(), "username": "vendor2", "vendorWalletId": missing },
            { "userId": Uuid::new_v4(), "username": "vendor3" }
        ])))
        .mount(&console.ledger)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("/api/v1/wallets/{}", healthy)))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(wallet_json(healthy, "VENDOR", "ACTIVE", 80.0)),
        )
        .mount(&console.ledger)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("/api/v1/wallets/{}", missing)))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({ "message": "Wallet not found" })),
        )
        .mount(&console.ledger)
        .await;

    let mut view = VendorWallets::new(console.state.gateway.clone(), &identity);
    view.activate().await;

    assert_eq!(view.rows.len(), 3);
    assert_eq!(view.rows[0].vendor.username, "vendor1");
    assert_eq!(
        view.rows[0].wallet.as_ref().map(|w| w.balance),
        Some(Decimal::from(80))
    );
    assert!(view.rows[1].wallet.is_none());
    assert!(view.rows[2].wallet.is_none());
    assert_eq!(view.error.get(), Some("Wallet not found"));
}

#[tokio::test]
async fn merchant_list_pages_forward_until_the_last_page() {
    let console = TestConsole::spawn().await;
    console.sign_in_admin();

    for (page, username) in [("0", "merchant1"), ("1", "merchant21")] {
        Mock::given(method("GET"))
            .and(path("/api/v1/merchants"))
            .and(query_param("page", page))
            .and(query_param("size", "20"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "content": [{
                    "id": Uuid::new_v4(),
                    "username": username,
                    "roles": ["MERCHANT"],
                    "merchantId": Uuid::new_v4()
                }],
                "totalElements": 21,
                "totalPages": 2,
                "number": page.parse::<u32>().unwrap(),
                "size": 20
            })))
            .expect(1)
            .mount(&console.ledger)
            .await;
    }

    let mut view = MerchantList::new(console.state.gateway.clone());
    view.activate().await;
    assert_eq!(view.merchants[0].username, "merchant1");
    assert!(!view.has_previous());

    assert!(view.next_page().await);
    assert_eq!(view.page, 1);
    assert_eq!(view.merchants[0].username, "merchant21");
    assert_eq!(view.total_elements, 21);

    // Already on the last page: no request is sent.
    assert!(!view.next_page().await);
    assert!(view.error.is_empty());
}
