use super::{read_failure, Activate, ErrorSlot};
use crate::models::{AdminStats, PayoutStats, UserProfile, Wallet};
use crate::services::Gateway;
use async_trait::async_trait;
use uuid::Uuid;

const RECENT_MERCHANTS: u32 = 5;

/// Platform overview: ledger stats, payout stats and the newest merchants.
pub struct AdminDashboard {
    gateway: Gateway,
    pub platform_stats: Option<AdminStats>,
    pub payout_stats: Option<PayoutStats>,
    pub recent_merchants: Vec<UserProfile>,
    pub error: ErrorSlot,
}

impl AdminDashboard {
    pub fn new(gateway: Gateway) -> Self {
        Self {
            gateway,
            platform_stats: None,
            payout_stats: None,
            recent_merchants: Vec::new(),
            error: ErrorSlot::default(),
        }
    }

    /// The three reads are independent; each one that succeeds is shown even
    /// when a sibling fails.
    #[tracing::instrument(name = "admin_dashboard.load", skip(self))]
    pub async fn load(&mut self) {
        self.error.clear();

        let (stats, payout_stats, merchants) = futures::join!(
            self.gateway.ledger.admin_stats(),
            self.gateway.payout.stats(),
            self.gateway.ledger.merchants(0, RECENT_MERCHANTS),
        );

        match stats {
            Ok(stats) => self.platform_stats = Some(stats),
            Err(e) => {
                self.platform_stats = None;
                self.error.record(read_failure(&e, "Failed to load platform stats"));
            }
        }
        match payout_stats {
            Ok(stats) => self.payout_stats = Some(stats),
            Err(e) => {
                self.payout_stats = None;
                self.error.record(read_failure(&e, "Failed to load payout stats"));
            }
        }
        match merchants {
            Ok(page) => self.recent_merchants = page.content,
            Err(e) => {
                self.recent_merchants.clear();
                self.error.record(read_failure(&e, "Failed to load merchants"));
            }
        }
    }
}

#[async_trait]
impl Activate for AdminDashboard {
    async fn activate(&mut self) {
        self.load().await;
    }
}

/// Merchant home: profile first, then the main and escrow wallets it names.
pub struct MerchantDashboard {
    gateway: Gateway,
    pub profile: Option<UserProfile>,
    pub main_wallet: Option<Wallet>,
    pub escrow_wallet: Option<Wallet>,
    pub error: ErrorSlot,
}

impl MerchantDashboard {
    pub fn new(gateway: Gateway) -> Self {
        Self {
            gateway,
            profile: None,
            main_wallet: None,
            escrow_wallet: None,
            error: ErrorSlot::default(),
        }
    }

    #[tracing::instrument(name = "merchant_dashboard.load", skip(self))]
    pub async fn load(&mut self) {
        self.error.clear();

        let profile = match self.gateway.ledger.me().await {
            Ok(profile) => profile,
            Err(e) => {
                self.profile = None;
                self.main_wallet = None;
                self.escrow_wallet = None;
                self.error.record(read_failure(&e, "Failed to load wallets"));
                return;
            }
        };

        let (main, escrow) = futures::join!(
            fetch_wallet(&self.gateway, profile.main_wallet_id),
            fetch_wallet(&self.gateway, profile.escrow_wallet_id),
        );
        self.main_wallet = self.settle(main);
        self.escrow_wallet = self.settle(escrow);
        self.profile = Some(profile);
    }

    fn settle(&mut self, result: Option<Result<Wallet, crate::error::ApiError>>) -> Option<Wallet> {
        match result {
            Some(Ok(wallet)) => Some(wallet),
            Some(Err(e)) => {
                self.error.record(read_failure(&e, "Failed to load wallets"));
                None
            }
            None => None,
        }
    }
}

/// Balances change outside this view (escrow credits, order splits), so
/// every activation reloads.
#[async_trait]
impl Activate for MerchantDashboard {
    async fn activate(&mut self) {
        self.load().await;
    }
}

/// Vendor home: profile, then the vendor wallet.
pub struct VendorDashboard {
    gateway: Gateway,
    pub profile: Option<UserProfile>,
    pub wallet: Option<Wallet>,
    pub error: ErrorSlot,
}

impl VendorDashboard {
    pub fn new(gateway: Gateway) -> Self {
        Self {
            gateway,
            profile: None,
            wallet: None,
            error: ErrorSlot::default(),
        }
    }

    #[tracing::instrument(name = "vendor_dashboard.load", skip(self))]
    pub async fn load(&mut self) {
        self.error.clear();
        self.wallet = None;

        let profile = match self.gateway.ledger.me().await {
            Ok(profile) => profile,
            Err(e) => {
                self.profile = None;
                self.error.record(read_failure(&e, "Failed to load wallet"));
                return;
            }
        };

        match fetch_wallet(&self.gateway, profile.vendor_wallet_id).await {
            Some(Ok(wallet)) => self.wallet = Some(wallet),
            Some(Err(e)) => self.error.record(read_failure(&e, "Failed to load wallet")),
            None => tracing::debug!("No vendor wallet on profile"),
        }
        self.profile = Some(profile);
    }
}

#[async_trait]
impl Activate for VendorDashboard {
    async fn activate(&mut self) {
        self.load().await;
    }
}

async fn fetch_wallet(
    gateway: &Gateway,
    wallet_id: Option<Uuid>,
) -> Option<Result<Wallet, crate::error::ApiError>> {
    match wallet_id {
        Some(id) => Some(gateway.ledger.wallet(id).await),
        None => None,
    }
}
