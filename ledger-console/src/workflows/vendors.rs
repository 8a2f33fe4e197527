use super::{read_failure, Activate, ErrorSlot};
use crate::error::WorkflowError;
use crate::error::ApiError;
use crate::models::{AddVendorRequest, Identity, UserProfile, VendorSummary, Wallet};
use crate::services::Gateway;
use crate::utils::amount::normalize_currency;
use async_trait::async_trait;
use futures::future::join_all;
use secrecy::{ExposeSecret, Secret};
use uuid::Uuid;

const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Clone)]
pub struct AddVendorForm {
    pub username: String,
    pub password: Secret<String>,
    pub currency_code: Option<String>,
}

/// Vendors under the signed-in merchant, and onboarding of new ones.
pub struct VendorManagement {
    gateway: Gateway,
    merchant_id: Option<Uuid>,
    pub vendors: Vec<VendorSummary>,
    pub message: Option<String>,
    pub error: ErrorSlot,
}

impl VendorManagement {
    pub fn new(gateway: Gateway, identity: &Identity) -> Self {
        Self {
            gateway,
            merchant_id: identity.merchant_affiliation,
            vendors: Vec::new(),
            message: None,
            error: ErrorSlot::default(),
        }
    }

    #[tracing::instrument(name = "vendor_management.load", skip(self))]
    pub async fn load(&mut self) {
        self.error.clear();
        let Some(merchant_id) = self.merchant_id else {
            self.error.record("Merchant ID not found.");
            return;
        };
        match self.gateway.ledger.vendors(merchant_id).await {
            Ok(vendors) => self.vendors = vendors,
            Err(e) => {
                self.vendors.clear();
                self.error.record(read_failure(&e, "Failed to load vendors"));
            }
        }
    }

    /// Create a vendor user under this merchant, then re-read the vendor list.
    #[tracing::instrument(
        name = "vendor_management.add",
        skip(self, form),
        fields(username = %form.username.trim())
    )]
    pub async fn add_vendor(&mut self, form: &AddVendorForm) -> Result<UserProfile, WorkflowError> {
        self.error.clear();
        self.message = None;

        let request = match self.validate(form) {
            Ok(request) => request,
            Err(err) => {
                self.error.record(err.user_message());
                return Err(err);
            }
        };
        let merchant_id = self
            .merchant_id
            .ok_or_else(|| WorkflowError::precondition("Merchant ID not found."))?;

        match self.gateway.ledger.add_vendor(merchant_id, &request).await {
            Ok(vendor) => {
                tracing::info!(vendor_id = %vendor.id, "Vendor created");
                self.message = Some(format!(
                    "Vendor \"{}\" created. They can log in with this username and password.",
                    request.username
                ));
                self.load().await;
                Ok(vendor)
            }
            Err(e) => {
                let err = WorkflowError::from(e);
                self.error.record(err.user_message());
                Err(err)
            }
        }
    }

    fn validate(&self, form: &AddVendorForm) -> Result<AddVendorRequest, WorkflowError> {
        if self.merchant_id.is_none() {
            return Err(WorkflowError::precondition("Merchant ID not found."));
        }
        let username = form.username.trim();
        let password = form.password.expose_secret();
        if username.is_empty() || password.chars().count() < MIN_PASSWORD_LEN {
            return Err(WorkflowError::precondition(
                "Username required; password at least 8 characters.",
            ));
        }
        Ok(AddVendorRequest {
            username: username.to_string(),
            password: password.clone(),
            currency_code: normalize_currency(form.currency_code.as_deref()),
        })
    }
}

#[async_trait]
impl Activate for VendorManagement {
    async fn activate(&mut self) {
        self.load().await;
    }
}

/// One vendor with its wallet, when that wallet could be read.
#[derive(Debug, Clone, PartialEq)]
pub struct VendorWalletRow {
    pub vendor: VendorSummary,
    pub wallet: Option<Wallet>,
}

/// Vendor wallets under the signed-in merchant: vendor list first, then every
/// listed wallet at once.
pub struct VendorWallets {
    gateway: Gateway,
    merchant_id: Option<Uuid>,
    pub rows: Vec<VendorWalletRow>,
    pub error: ErrorSlot,
}

impl VendorWallets {
    pub fn new(gateway: Gateway, identity: &Identity) -> Self {
        Self {
            gateway,
            merchant_id: identity.merchant_affiliation,
            rows: Vec::new(),
            error: ErrorSlot::default(),
        }
    }

    /// A wallet that fails to load leaves its row without a balance; the other
    /// rows are still shown.
    #[tracing::instrument(name = "vendor_wallets.load", skip(self))]
    pub async fn load(&mut self) {
        self.error.clear();
        self.rows.clear();
        let Some(merchant_id) = self.merchant_id else {
            self.error.record("Merchant ID not found.");
            return;
        };

        let vendors = match self.gateway.ledger.vendors(merchant_id).await {
            Ok(vendors) => vendors,
            Err(e) => {
                self.error.record(read_failure(&e, "Failed to load vendors"));
                return;
            }
        };

        let ledger = &self.gateway.ledger;
        let wallets: Vec<Option<Result<Wallet, ApiError>>> =
            join_all(vendors.iter().map(|vendor| async move {
                match vendor.vendor_wallet_id {
                    Some(wallet_id) => Some(ledger.wallet(wallet_id).await),
                    None => None,
                }
            }))
            .await;

        for (vendor, wallet) in vendors.into_iter().zip(wallets) {
            let wallet = match wallet {
                Some(Ok(wallet)) => Some(wallet),
                Some(Err(e)) => {
                    self.error.record(read_failure(&e, "Failed to load wallets"));
                    None
                }
                None => None,
            };
            self.rows.push(VendorWalletRow { vendor, wallet });
        }
    }
}

#[async_trait]
impl Activate for VendorWallets {
    async fn activate(&mut self) {
        self.load().await;
    }
}
