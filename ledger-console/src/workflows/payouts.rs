use super::{read_failure, Activate, ErrorSlot};
use crate::error::WorkflowError;
use crate::models::{CreatePayoutRequest, Payout, PayoutQuery, PayoutStatus, VendorPayoutRequest};
use crate::services::Gateway;
use crate::utils::amount::{normalize_currency, parse_amount};
use crate::utils::IdempotencyKey;
use async_trait::async_trait;
use uuid::Uuid;

const MANAGEMENT_PAGE_SIZE: u32 = 100;
const VENDOR_PAGE_SIZE: u32 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayoutAction {
    /// Mark the payout as paid out.
    Confirm,
    /// Mark the payout as failed and return the funds.
    Reverse,
}

impl PayoutAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Confirm => "confirm",
            Self::Reverse => "reverse",
        }
    }

    fn past_tense(&self) -> &'static str {
        match self {
            Self::Confirm => "confirmed",
            Self::Reverse => "reversed",
        }
    }
}

/// Actions offered for a payout in the given status. Only a payout that is
/// `PROCESSING` can be confirmed or reversed; the backend enforces the same
/// transitions regardless of what is offered here.
pub fn available_actions(status: PayoutStatus) -> &'static [PayoutAction] {
    match status {
        PayoutStatus::Processing => &[PayoutAction::Confirm, PayoutAction::Reverse],
        PayoutStatus::Created | PayoutStatus::Settled | PayoutStatus::Failed => &[],
    }
}

/// Admin payout table with confirm/reverse.
pub struct PayoutManagement {
    gateway: Gateway,
    pub payouts: Vec<Payout>,
    pub total_elements: u64,
    pub error: ErrorSlot,
}

impl PayoutManagement {
    pub fn new(gateway: Gateway) -> Self {
        Self {
            gateway,
            payouts: Vec::new(),
            total_elements: 0,
            error: ErrorSlot::default(),
        }
    }

    #[tracing::instrument(name = "payout_management.load", skip(self))]
    pub async fn load(&mut self) {
        self.error.clear();
        let query = PayoutQuery {
            size: MANAGEMENT_PAGE_SIZE,
            ..Default::default()
        };
        match self.gateway.payout.payouts(&query).await {
            Ok(page) => {
                self.total_elements = page.total_elements;
                self.payouts = page.content;
            }
            Err(e) => {
                self.payouts.clear();
                self.total_elements = 0;
                self.error.record(read_failure(&e, "Failed to load payouts"));
            }
        }
    }

    pub async fn confirm(&mut self, payout_id: Uuid) -> Result<Payout, WorkflowError> {
        self.apply(payout_id, PayoutAction::Confirm, None).await
    }

    pub async fn reverse(&mut self, payout_id: Uuid) -> Result<Payout, WorkflowError> {
        self.apply(payout_id, PayoutAction::Reverse, None).await
    }

    /// Run `action` on a listed payout. Pass the key of an earlier attempt to
    /// resubmit the same invocation; `None` starts a new one. The whole list
    /// is re-read after a success since balances moved server-side.
    #[tracing::instrument(
        name = "payout_management.apply",
        skip(self, key),
        fields(action = action.as_str())
    )]
    pub async fn apply(
        &mut self,
        payout_id: Uuid,
        action: PayoutAction,
        key: Option<IdempotencyKey>,
    ) -> Result<Payout, WorkflowError> {
        self.error.clear();

        let offered = self
            .payouts
            .iter()
            .find(|p| p.id == payout_id)
            .map(|p| available_actions(p.status).contains(&action))
            .unwrap_or(false);
        if !offered {
            let err = WorkflowError::precondition(format!(
                "Payout cannot be {}; only PROCESSING payouts accept this action.",
                action.past_tense()
            ));
            self.error.record(err.user_message());
            return Err(err);
        }

        let key = key.unwrap_or_else(|| IdempotencyKey::for_target(action.as_str(), payout_id));
        let result = match action {
            PayoutAction::Confirm => self.gateway.payout.confirm_payout(payout_id, &key).await,
            PayoutAction::Reverse => self.gateway.payout.reverse_payout(payout_id, &key).await,
        };

        match result {
            Ok(payout) => {
                tracing::info!(
                    %payout_id,
                    status = %payout.status,
                    "Payout {}",
                    action.past_tense()
                );
                self.load().await;
                Ok(payout)
            }
            Err(e) => {
                let err = WorkflowError::from(e);
                self.error.record(err.user_message());
                Err(err)
            }
        }
    }

    /// Open a payout for a vendor's wallet. `key` resubmits an earlier attempt;
    /// `None` issues a fresh `payout-` key. The list is re-read on success.
    #[tracing::instrument(name = "payout_management.create", skip(self, form, key))]
    pub async fn create(
        &mut self,
        form: &CreatePayoutForm,
        key: Option<IdempotencyKey>,
    ) -> Result<Payout, WorkflowError> {
        self.error.clear();

        let request = match form.validate() {
            Ok(request) => request,
            Err(err) => {
                self.error.record(err.user_message());
                return Err(err);
            }
        };
        let key = key.unwrap_or_else(|| IdempotencyKey::generate(Some("payout")));

        match self.gateway.payout.create_payout(&request, &key).await {
            Ok(payout) => {
                tracing::info!(payout_id = %payout.id, idempotency_key = %key, "Payout created");
                self.load().await;
                Ok(payout)
            }
            Err(e) => {
                let err = WorkflowError::from(e);
                self.error.record(err.user_message());
                Err(err)
            }
        }
    }
}

/// Admin payout on behalf of a vendor.
#[derive(Debug, Clone, Default)]
pub struct CreatePayoutForm {
    pub merchant_id: Option<Uuid>,
    pub vendor_id: Option<Uuid>,
    pub vendor_wallet_id: Option<Uuid>,
    pub amount: String,
    pub currency_code: Option<String>,
}

impl CreatePayoutForm {
    fn validate(&self) -> Result<CreatePayoutRequest, WorkflowError> {
        let (Some(merchant_id), Some(vendor_id), Some(vendor_wallet_id)) =
            (self.merchant_id, self.vendor_id, self.vendor_wallet_id)
        else {
            return Err(WorkflowError::precondition(
                "Merchant, vendor and vendor wallet required",
            ));
        };
        let amount = parse_amount(&self.amount)
            .ok_or_else(|| WorkflowError::precondition("Amount must be at least 0.01"))?;
        Ok(CreatePayoutRequest {
            merchant_id,
            vendor_id,
            vendor_wallet_id,
            amount,
            currency_code: normalize_currency(self.currency_code.as_deref()),
        })
    }
}

#[async_trait]
impl Activate for PayoutManagement {
    async fn activate(&mut self) {
        self.load().await;
    }
}

/// A vendor's own payouts, read-only.
pub struct VendorPayouts {
    gateway: Gateway,
    pub vendor_id: Option<Uuid>,
    pub payouts: Vec<Payout>,
    pub total_elements: u64,
    pub error: ErrorSlot,
}

impl VendorPayouts {
    pub fn new(gateway: Gateway) -> Self {
        Self {
            gateway,
            vendor_id: None,
            payouts: Vec::new(),
            total_elements: 0,
            error: ErrorSlot::default(),
        }
    }

    /// Profile first for the vendor's user id, then that vendor's payouts.
    #[tracing::instrument(name = "vendor_payouts.load", skip(self))]
    pub async fn load(&mut self) {
        self.error.clear();
        self.payouts.clear();
        self.total_elements = 0;

        let vendor_id = match self.gateway.ledger.me().await {
            Ok(profile) => profile.id,
            Err(e) => {
                self.error.record(read_failure(&e, "Failed to load payouts"));
                return;
            }
        };
        self.vendor_id = Some(vendor_id);

        let query = PayoutQuery {
            vendor_id: Some(vendor_id),
            size: VENDOR_PAGE_SIZE,
            ..Default::default()
        };
        match self.gateway.payout.payouts(&query).await {
            Ok(page) => {
                self.total_elements = page.total_elements;
                self.payouts = page.content;
            }
            Err(e) => self.error.record(read_failure(&e, "Failed to load payouts")),
        }
    }
}

#[async_trait]
impl Activate for VendorPayouts {
    async fn activate(&mut self) {
        self.load().await;
    }
}

#[derive(Debug, Clone, Default)]
pub struct PayoutRequestForm {
    pub amount: String,
    pub currency_code: Option<String>,
}

/// Vendor payout request from the vendor wallet.
pub struct RequestPayout {
    gateway: Gateway,
    pub result: Option<Payout>,
    pub error: ErrorSlot,
}

impl RequestPayout {
    pub fn new(gateway: Gateway) -> Self {
        Self {
            gateway,
            result: None,
            error: ErrorSlot::default(),
        }
    }

    /// `key` resubmits an earlier attempt; `None` issues a fresh `payout-` key.
    #[tracing::instrument(name = "request_payout.submit", skip(self, form, key))]
    pub async fn submit(
        &mut self,
        form: &PayoutRequestForm,
        key: Option<IdempotencyKey>,
    ) -> Result<Payout, WorkflowError> {
        self.error.clear();
        self.result = None;

        let Some(amount) = parse_amount(&form.amount) else {
            let err = WorkflowError::precondition("Amount must be at least 0.01");
            self.error.record(err.user_message());
            return Err(err);
        };
        let request = VendorPayoutRequest {
            amount,
            currency_code: normalize_currency(form.currency_code.as_deref()),
        };
        let key = key.unwrap_or_else(|| IdempotencyKey::generate(Some("payout")));

        match self.gateway.payout.request_payout(&request, &key).await {
            Ok(payout) => {
                tracing::info!(payout_id = %payout.id, idempotency_key = %key, "Payout requested");
                self.result = Some(payout.clone());
                Ok(payout)
            }
            Err(e) => {
                let err = WorkflowError::from(e);
                self.error.record(err.user_message());
                Err(err)
            }
        }
    }
}
