use super::{read_failure, Activate, ErrorSlot};
use crate::error::WorkflowError;
use crate::models::{EntriesFilter, Identity, LedgerEntry, Wallet, WalletType};
use crate::services::Gateway;
use crate::utils::amount::{normalize_currency, DEFAULT_CURRENCY};
use async_trait::async_trait;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalletChange {
    Frozen,
    Unfrozen,
}

impl std::fmt::Display for WalletChange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Frozen => f.write_str("Frozen"),
            Self::Unfrozen => f.write_str("Unfrozen"),
        }
    }
}

/// Admin wallet tools: freeze/unfreeze and lookup by type.
pub struct WalletAdmin {
    gateway: Gateway,
    /// Last wallet returned by a freeze/unfreeze or lookup, with what happened to it.
    pub result: Option<(Option<WalletChange>, Wallet)>,
    pub error: ErrorSlot,
}

impl WalletAdmin {
    pub fn new(gateway: Gateway) -> Self {
        Self {
            gateway,
            result: None,
            error: ErrorSlot::default(),
        }
    }

    pub async fn freeze(&mut self, wallet_id: Option<Uuid>) -> Result<&Wallet, WorkflowError> {
        self.change(wallet_id, WalletChange::Frozen).await
    }

    pub async fn unfreeze(&mut self, wallet_id: Option<Uuid>) -> Result<&Wallet, WorkflowError> {
        self.change(wallet_id, WalletChange::Unfrozen).await
    }

    /// Single call; the wallet shown afterwards is the one in the response
    /// body, status and balance included. Nothing is re-read.
    #[tracing::instrument(name = "wallet_admin.change", skip(self))]
    async fn change(
        &mut self,
        wallet_id: Option<Uuid>,
        change: WalletChange,
    ) -> Result<&Wallet, WorkflowError> {
        self.error.clear();
        self.result = None;

        let Some(wallet_id) = wallet_id else {
            let err = WorkflowError::precondition("Wallet ID required");
            self.error.record(err.user_message());
            return Err(err);
        };

        let response = match change {
            WalletChange::Frozen => self.gateway.ledger.freeze(wallet_id).await,
            WalletChange::Unfrozen => self.gateway.ledger.unfreeze(wallet_id).await,
        };

        match response {
            Ok(wallet) => {
                tracing::info!(%wallet_id, status = %wallet.status, "Wallet {}", change);
                let stored = self.result.insert((Some(change), wallet));
                Ok(&stored.1)
            }
            Err(e) => {
                let fallback = match change {
                    WalletChange::Frozen => "Failed to freeze",
                    WalletChange::Unfrozen => "Failed to unfreeze",
                };
                self.error.record(read_failure(&e, fallback));
                Err(e.into())
            }
        }
    }

    /// Resolve a merchant's MAIN or ESCROW wallet.
    #[tracing::instrument(name = "wallet_admin.lookup", skip(self))]
    pub async fn lookup(
        &mut self,
        merchant_id: Option<Uuid>,
        currency_code: Option<&str>,
        wallet_type: WalletType,
    ) -> Result<&Wallet, WorkflowError> {
        self.error.clear();
        self.result = None;

        let Some(merchant_id) = merchant_id else {
            let err = WorkflowError::precondition("Merchant ID required");
            self.error.record(err.user_message());
            return Err(err);
        };
        let currency_code = normalize_currency(currency_code);

        match self
            .gateway
            .ledger
            .wallet_by_type(merchant_id, &currency_code, wallet_type, None)
            .await
        {
            Ok(wallet) => {
                let stored = self.result.insert((None, wallet));
                Ok(&stored.1)
            }
            Err(e) => {
                self.error.record(read_failure(&e, "Failed to fetch wallet"));
                Err(e.into())
            }
        }
    }
}

/// Ledger entries for any role; the backend scopes results to the caller.
pub struct LedgerExplorer {
    gateway: Gateway,
    pub entries: Vec<LedgerEntry>,
    pub total_entries: u64,
    pub error: ErrorSlot,
}

impl LedgerExplorer {
    pub fn new(gateway: Gateway) -> Self {
        Self {
            gateway,
            entries: Vec::new(),
            total_entries: 0,
            error: ErrorSlot::default(),
        }
    }

    /// One page of ledger entries. A failed read leaves an empty table.
    #[tracing::instrument(name = "ledger_explorer.load", skip(self, filter))]
    pub async fn load(&mut self, filter: &EntriesFilter) {
        self.error.clear();
        match self.gateway.ledger.entries(filter).await {
            Ok(page) => {
                self.total_entries = page.total_elements;
                self.entries = page.content;
            }
            Err(e) => {
                self.entries.clear();
                self.total_entries = 0;
                self.error.record(read_failure(&e, "Failed to load entries"));
            }
        }
    }
}

/// The signed-in merchant's INR escrow wallet.
pub struct EscrowBalance {
    gateway: Gateway,
    merchant_id: Option<Uuid>,
    pub wallet: Option<Wallet>,
    pub error: ErrorSlot,
}

impl EscrowBalance {
    pub fn new(gateway: Gateway, identity: &Identity) -> Self {
        Self {
            gateway,
            merchant_id: identity.merchant_affiliation,
            wallet: None,
            error: ErrorSlot::default(),
        }
    }

    #[tracing::instrument(name = "escrow_balance.load", skip(self))]
    pub async fn load(&mut self) {
        self.error.clear();
        self.wallet = None;
        let Some(merchant_id) = self.merchant_id else {
            self.error.record("Merchant ID not found.");
            return;
        };

        match self
            .gateway
            .ledger
            .wallet_by_type(merchant_id, DEFAULT_CURRENCY, WalletType::Escrow, None)
            .await
        {
            Ok(wallet) => self.wallet = Some(wallet),
            Err(e) => self
                .error
                .record(read_failure(&e, "Failed to load escrow wallet")),
        }
    }
}

#[async_trait]
impl Activate for EscrowBalance {
    async fn activate(&mut self) {
        self.load().await;
    }
}
