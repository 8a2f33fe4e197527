//! Payout orchestrator projections.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Payout lifecycle as owned by the orchestrator:
/// `CREATED -> PROCESSING -> SETTLED | FAILED`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PayoutStatus {
    Created,
    Processing,
    Settled,
    Failed,
}

impl PayoutStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "CREATED",
            Self::Processing => "PROCESSING",
            Self::Settled => "SETTLED",
            Self::Failed => "FAILED",
        }
    }
}

impl std::fmt::Display for PayoutStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payout {
    pub id: Uuid,
    pub merchant_id: Uuid,
    pub vendor_id: Uuid,
    pub vendor_wallet_id: Option<Uuid>,
    pub amount: Decimal,
    pub currency_code: String,
    pub status: PayoutStatus,
    pub ledger_entry_id: Option<Uuid>,
    pub created_at: Option<DateTime<Utc>>,
}

/// An order whose payment succeeded but whose escrow split has not run yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingOrder {
    pub order_id: String,
    pub amount: Decimal,
    #[serde(default)]
    pub currency_code: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayoutStats {
    pub total_payouts: u64,
    pub created_count: u64,
    pub processing_count: u64,
    pub settled_count: u64,
    pub failed_count: u64,
    pub total_settled_amount: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CommissionType {
    /// Platform share = order amount * percentage / 100.
    Percentage,
    /// Platform share = fixed amount + order amount * percentage / 100.
    FixedPlusPercentage,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Commission {
    pub merchant_id: Option<Uuid>,
    pub commission_type: CommissionType,
    pub percentage_value: Option<Decimal>,
    pub fixed_amount: Option<Decimal>,
    pub currency_code: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommissionUpdate {
    pub commission_type: CommissionType,
    #[serde(with = "rust_decimal::serde::float")]
    pub percentage_value: Decimal,
    #[serde(
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub fixed_amount: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency_code: Option<String>,
}

/// Body for `POST /payouts/request`; the backend takes the vendor and wallet
/// from the caller's session.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorPayoutRequest {
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub currency_code: String,
}

/// Body for `POST /payouts` (merchant/admin on behalf of a vendor).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePayoutRequest {
    pub merchant_id: Uuid,
    pub vendor_id: Uuid,
    pub vendor_wallet_id: Uuid,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub currency_code: String,
}

/// Filter for `GET /payouts`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayoutQuery {
    pub vendor_id: Option<Uuid>,
    pub merchant_id: Option<Uuid>,
    pub page: u32,
    pub size: u32,
}

impl Default for PayoutQuery {
    fn default() -> Self {
        Self {
            vendor_id: None,
            merchant_id: None,
            page: 0,
            size: 20,
        }
    }
}

impl PayoutQuery {
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = vec![("page", self.page.to_string()), ("size", self.size.to_string())];
        if let Some(vendor_id) = self.vendor_id {
            query.push(("vendorId", vendor_id.to_string()));
        }
        if let Some(merchant_id) = self.merchant_id {
            query.push(("merchantId", merchant_id.to_string()));
        }
        query
    }
}

/// Payload of the payment-success webhook: credits the merchant escrow for one order.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSuccessEvent {
    pub merchant_id: Uuid,
    pub vendor_id: Uuid,
    pub order_id: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub currency_code: String,
    pub escrow_wallet_id: Uuid,
}

/// Payload of the order-complete webhook: splits escrow into main and vendor wallets.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCompleteEvent {
    pub merchant_id: Uuid,
    pub order_id: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub currency_code: String,
    pub vendor_id: Uuid,
    pub escrow_wallet_id: Uuid,
    pub main_wallet_id: Uuid,
    pub vendor_wallet_id: Uuid,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct WebhookAck {
    #[serde(default)]
    pub message: Option<String>,
}
