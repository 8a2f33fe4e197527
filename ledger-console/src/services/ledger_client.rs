use super::api_client::ApiClient;
use crate::config::ServiceSettings;
use crate::error::ApiError;
use crate::models::{
    AddVendorRequest, AdminStats, BankDetails, BankDetailsUpdate, EntriesFilter, LedgerEntry,
    LoginRequest, LoginResponse, Page, Settlement, UserProfile, VendorSummary, Wallet, WalletType,
};
use crate::session::SessionStore;
use std::sync::Arc;
use uuid::Uuid;

/// Client for the wallet/ledger service.
pub struct LedgerClient {
    api: ApiClient,
}

impl LedgerClient {
    pub fn new(settings: ServiceSettings, session: Arc<SessionStore>) -> Self {
        Self {
            api: ApiClient::new("ledger", settings, session),
        }
    }

    pub fn base_url(&self) -> &str {
        self.api.base_url()
    }

    /// `POST /auth/login`. Sent without a bearer.
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, ApiError> {
        self.api
            .post_anonymous("/auth/login", &LoginRequest { username, password })
            .await
    }

    pub async fn me(&self) -> Result<UserProfile, ApiError> {
        self.api.get("/users/me", &[]).await
    }

    /// `None` when the user has not saved any yet (204).
    pub async fn bank_details(&self) -> Result<Option<BankDetails>, ApiError> {
        self.api.get("/users/me/bank-details", &[]).await
    }

    pub async fn update_bank_details(
        &self,
        update: &BankDetailsUpdate,
    ) -> Result<BankDetails, ApiError> {
        self.api.put("/users/me/bank-details", update).await
    }

    pub async fn wallet(&self, wallet_id: Uuid) -> Result<Wallet, ApiError> {
        self.api.get(&format!("/wallets/{}", wallet_id), &[]).await
    }

    /// Resolve a merchant wallet by type. `vendor_user_id` is required for VENDOR wallets.
    pub async fn wallet_by_type(
        &self,
        merchant_id: Uuid,
        currency_code: &str,
        wallet_type: WalletType,
        vendor_user_id: Option<Uuid>,
    ) -> Result<Wallet, ApiError> {
        let mut query = vec![
            ("currencyCode", currency_code.to_string()),
            ("walletType", wallet_type.as_str().to_string()),
        ];
        if let Some(vendor_user_id) = vendor_user_id {
            query.push(("vendorUserId", vendor_user_id.to_string()));
        }
        self.api
            .get(&format!("/merchants/{}/wallets/by-type", merchant_id), &query)
            .await
    }

    pub async fn settlement(
        &self,
        merchant_id: Uuid,
        currency_code: &str,
    ) -> Result<Settlement, ApiError> {
        self.api
            .get(
                &format!("/merchants/{}/settlement", merchant_id),
                &[("currencyCode", currency_code.to_string())],
            )
            .await
    }

    pub async fn freeze(&self, wallet_id: Uuid) -> Result<Wallet, ApiError> {
        self.api
            .post_empty(&format!("/wallets/{}/freeze", wallet_id), None)
            .await
    }

    pub async fn unfreeze(&self, wallet_id: Uuid) -> Result<Wallet, ApiError> {
        self.api
            .post_empty(&format!("/wallets/{}/unfreeze", wallet_id), None)
            .await
    }

    pub async fn entries(&self, filter: &EntriesFilter) -> Result<Page<LedgerEntry>, ApiError> {
        self.api.get("/entries", &filter.to_query()).await
    }

    pub async fn merchants(&self, page: u32, size: u32) -> Result<Page<UserProfile>, ApiError> {
        self.api
            .get(
                "/merchants",
                &[("page", page.to_string()), ("size", size.to_string())],
            )
            .await
    }

    pub async fn vendors(&self, merchant_id: Uuid) -> Result<Vec<VendorSummary>, ApiError> {
        self.api
            .get(&format!("/merchants/{}/vendors", merchant_id), &[])
            .await
    }

    pub async fn add_vendor(
        &self,
        merchant_id: Uuid,
        request: &AddVendorRequest,
    ) -> Result<UserProfile, ApiError> {
        self.api
            .post(&format!("/merchants/{}/vendors", merchant_id), request, None)
            .await
    }

    pub async fn admin_stats(&self) -> Result<AdminStats, ApiError> {
        self.api.get("/admin/stats", &[]).await
    }
}
