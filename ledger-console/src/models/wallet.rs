//! Wallet and ledger projections returned by the wallet/ledger service.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum WalletType {
    Main,
    Escrow,
    Vendor,
}

impl WalletType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Main => "MAIN",
            Self::Escrow => "ESCROW",
            Self::Vendor => "VENDOR",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum WalletStatus {
    Active,
    /// Admin freeze; no debit/credit until unfrozen.
    Frozen,
    Suspended,
    Closed,
}

impl std::fmt::Display for WalletStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Active => "ACTIVE",
            Self::Frozen => "FROZEN",
            Self::Suspended => "SUSPENDED",
            Self::Closed => "CLOSED",
        };
        write!(f, "{}", s)
    }
}

/// Wallet as reported by the ledger service. `balance` is derived from the
/// ledger server-side and only ever displayed here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wallet {
    #[serde(default)]
    pub id: Option<Uuid>,
    #[serde(default)]
    pub merchant_id: Option<Uuid>,
    #[serde(default)]
    pub wallet_type: Option<WalletType>,
    #[serde(default)]
    pub vendor_user_id: Option<Uuid>,
    pub currency_code: String,
    pub status: WalletStatus,
    pub balance: Decimal,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EntryType {
    Credit,
    Debit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReferenceType {
    Order,
    Payout,
    Refund,
    Reversal,
}

impl ReferenceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Order => "ORDER",
            Self::Payout => "PAYOUT",
            Self::Refund => "REFUND",
            Self::Reversal => "REVERSAL",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EntryStatus {
    Pending,
    Confirmed,
    Reversed,
}

impl EntryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Confirmed => "CONFIRMED",
            Self::Reversed => "REVERSED",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEntry {
    pub id: Uuid,
    pub wallet_id: Uuid,
    #[serde(rename = "type")]
    pub entry_type: EntryType,
    pub amount: Decimal,
    pub currency_code: String,
    pub reference_type: Option<ReferenceType>,
    pub reference_id: Option<String>,
    pub status: EntryStatus,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Query for `GET /entries`. Unset filters are omitted from the query string.
#[derive(Debug, Clone, PartialEq)]
pub struct EntriesFilter {
    pub wallet_id: Option<Uuid>,
    pub merchant_id: Option<Uuid>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub min_amount: Option<Decimal>,
    pub max_amount: Option<Decimal>,
    pub reference_type: Option<ReferenceType>,
    pub status: Option<EntryStatus>,
    pub page: u32,
    pub size: u32,
    pub sort: String,
}

impl Default for EntriesFilter {
    fn default() -> Self {
        Self {
            wallet_id: None,
            merchant_id: None,
            from: None,
            to: None,
            min_amount: None,
            max_amount: None,
            reference_type: None,
            status: None,
            page: 0,
            size: 20,
            sort: "createdAt,desc".to_string(),
        }
    }
}

impl EntriesFilter {
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("page", self.page.to_string()),
            ("size", self.size.to_string()),
            ("sort", self.sort.clone()),
        ];
        if let Some(wallet_id) = self.wallet_id {
            query.push(("walletId", wallet_id.to_string()));
        }
        if let Some(merchant_id) = self.merchant_id {
            query.push(("merchantId", merchant_id.to_string()));
        }
        if let Some(from) = self.from {
            query.push(("from", from.to_rfc3339()));
        }
        if let Some(to) = self.to {
            query.push(("to", to.to_rfc3339()));
        }
        if let Some(min) = self.min_amount {
            query.push(("minAmount", min.to_string()));
        }
        if let Some(max) = self.max_amount {
            query.push(("maxAmount", max.to_string()));
        }
        if let Some(reference_type) = self.reference_type {
            query.push(("referenceType", reference_type.as_str().to_string()));
        }
        if let Some(status) = self.status {
            query.push(("status", status.as_str().to_string()));
        }
        query
    }
}

/// Escrow reconciliation computed by the ledger service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settlement {
    pub merchant_id: Uuid,
    pub currency_code: String,
    pub escrow_wallet_id: Option<Uuid>,
    pub total_confirmed_escrow_credits: Decimal,
    pub total_payout_debits: Decimal,
    pub total_refund_debits: Decimal,
    pub expected_balance: Decimal,
    pub ledger_net_balance: Decimal,
    pub reconciled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminStats {
    pub total_merchants: u64,
    pub total_vendors: u64,
    pub total_wallets: u64,
    pub frozen_wallets: u64,
    pub total_ledger_entries: u64,
}
