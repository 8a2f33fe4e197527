pub mod identity;
pub mod payout;
pub mod user;
pub mod wallet;

pub use identity::{Identity, Role};
pub use payout::{
    Commission, CommissionType, CommissionUpdate, CreatePayoutRequest, OrderCompleteEvent,
    PaymentSuccessEvent, Payout, PayoutQuery, PayoutStats, PayoutStatus, PendingOrder,
    VendorPayoutRequest, WebhookAck,
};
pub use user::{
    AddVendorRequest, BankDetails, BankDetailsUpdate, LoginRequest, LoginResponse, Page,
    UserProfile, VendorSummary,
};
pub use wallet::{
    AdminStats, EntriesFilter, EntryStatus, EntryType, LedgerEntry, ReferenceType, Settlement,
    Wallet, WalletStatus, WalletType,
};
