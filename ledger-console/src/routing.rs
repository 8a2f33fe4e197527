//! Which workflows each role may open.
//!
//! The table is static. A decision is made from the session's identity alone,
//! so it is only as trustworthy as that identity: it decides what the console
//! offers, never what the backends permit.

use crate::models::{Identity, Role};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryPoint {
    AdminDashboard,
    MerchantList,
    WalletSearch,
    AdminTransactions,
    FreezeWallet,
    SettlementReport,
    PayoutManagement,

    MerchantDashboard,
    VendorManagement,
    VendorWallets,
    OrderSettlement,
    CommissionEarnings,
    EscrowBalance,
    MerchantTransactions,
    OrderCompletion,
    PaymentRecords,

    VendorDashboard,
    VendorTransactions,
    RequestPayout,
    PayoutStatus,
    BankDetails,
}

const ROUTES: &[(EntryPoint, Role, &str)] = &[
    (EntryPoint::AdminDashboard, Role::Admin, "/admin"),
    (EntryPoint::MerchantList, Role::Admin, "/admin/merchants"),
    (EntryPoint::WalletSearch, Role::Admin, "/admin/wallets"),
    (EntryPoint::AdminTransactions, Role::Admin, "/admin/transactions"),
    (EntryPoint::FreezeWallet, Role::Admin, "/admin/freeze"),
    (EntryPoint::SettlementReport, Role::Admin, "/admin/settlement"),
    (EntryPoint::PayoutManagement, Role::Admin, "/admin/payouts"),
    (EntryPoint::MerchantDashboard, Role::Merchant, "/merchant"),
    (EntryPoint::VendorManagement, Role::Merchant, "/merchant/vendors"),
    (EntryPoint::VendorWallets, Role::Merchant, "/merchant/vendor-wallets"),
    (EntryPoint::OrderSettlement, Role::Merchant, "/merchant/order-settlement"),
    (EntryPoint::CommissionEarnings, Role::Merchant, "/merchant/commission"),
    (EntryPoint::EscrowBalance, Role::Merchant, "/merchant/escrow"),
    (EntryPoint::MerchantTransactions, Role::Merchant, "/merchant/transactions"),
    (EntryPoint::OrderCompletion, Role::Merchant, "/merchant/order-complete"),
    (EntryPoint::PaymentRecords, Role::Merchant, "/merchant/payments"),
    (EntryPoint::VendorDashboard, Role::Vendor, "/vendor"),
    (EntryPoint::VendorTransactions, Role::Vendor, "/vendor/transactions"),
    (EntryPoint::RequestPayout, Role::Vendor, "/vendor/payout"),
    (EntryPoint::PayoutStatus, Role::Vendor, "/vendor/payout-status"),
    (EntryPoint::BankDetails, Role::Vendor, "/vendor/bank"),
];

impl EntryPoint {
    fn route(&self) -> (Role, &'static str) {
        ROUTES
            .iter()
            .find(|(entry, _, _)| entry == self)
            .map(|(_, role, path)| (*role, *path))
            // Every variant has a row; the table test keeps it that way.
            .unwrap_or((Role::Admin, "/unauthorized"))
    }

    pub fn required_role(&self) -> Role {
        self.route().0
    }

    pub fn path(&self) -> &'static str {
        self.route().1
    }

    /// The one landing view for a role.
    pub fn landing(role: Role) -> Self {
        match role {
            Role::Admin => Self::AdminDashboard,
            Role::Merchant => Self::MerchantDashboard,
            Role::Vendor => Self::VendorDashboard,
        }
    }

    pub fn permitted_for(role: Role) -> impl Iterator<Item = EntryPoint> {
        ROUTES
            .iter()
            .filter(move |(_, r, _)| *r == role)
            .map(|(entry, _, _)| *entry)
    }
}

impl std::fmt::Display for EntryPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    Allow(EntryPoint),
    /// No identity: authenticate first.
    Login,
    /// Identity present but lacking the required role.
    AccessDenied,
}

pub fn resolve(identity: Option<&Identity>, entry: EntryPoint) -> RouteDecision {
    match identity {
        None => RouteDecision::Login,
        Some(identity) if identity.has_role(entry.required_role()) => RouteDecision::Allow(entry),
        Some(_) => RouteDecision::AccessDenied,
    }
}

/// Where to go right after login. Admin outranks merchant outranks vendor.
pub fn landing_for(identity: Option<&Identity>) -> RouteDecision {
    match identity {
        None => RouteDecision::Login,
        Some(identity) => identity
            .routable_roles()
            .first()
            .map(|role| RouteDecision::Allow(EntryPoint::landing(*role)))
            .unwrap_or(RouteDecision::AccessDenied),
    }
}
