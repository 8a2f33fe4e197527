//! Multi-step financial workflows on top of the [`Gateway`](crate::services::Gateway).
//!
//! Each view owns its transient state. Reads that do not depend on each other
//! are joined and settle independently; dependent reads run in sequence. A
//! mutation checks its preconditions before any request is built and touches
//! local state only after the backend confirms.

pub mod bank_details;
pub mod commission;
pub mod dashboard;
pub mod merchants;
pub mod order_completion;
pub mod payouts;
pub mod settlement;
pub mod vendors;
pub mod wallets;

use crate::error::ApiError;
use async_trait::async_trait;

pub use bank_details::{BankDetailsEditor, BankDetailsForm};
pub use commission::CommissionEarnings;
pub use dashboard::{AdminDashboard, MerchantDashboard, VendorDashboard};
pub use merchants::MerchantList;
pub use order_completion::{OrderCompletion, PaymentSuccessForm, PendingOrdersTicket};
pub use payouts::{
    available_actions, CreatePayoutForm, PayoutAction, PayoutManagement, PayoutRequestForm,
    RequestPayout, VendorPayouts,
};
pub use settlement::{OrderSettlement, SettlementReport};
pub use vendors::{AddVendorForm, VendorManagement, VendorWalletRow, VendorWallets};
pub use wallets::{EscrowBalance, LedgerExplorer, WalletAdmin, WalletChange};

/// A view became active (again). Views re-issue their reads here rather than
/// reusing anything loaded on a previous visit.
#[async_trait]
pub trait Activate {
    async fn activate(&mut self);
}

/// Single visible error for a view. The first error recorded since the last
/// `clear` wins; later ones are logged only.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ErrorSlot(Option<String>);

impl ErrorSlot {
    pub fn clear(&mut self) {
        self.0 = None;
    }

    pub fn record(&mut self, message: impl Into<String>) {
        let message = message.into();
        match &self.0 {
            Some(shown) => tracing::debug!(shown = %shown, "Suppressed error: {}", message),
            None => self.0 = Some(message),
        }
    }

    pub fn get(&self) -> Option<&str> {
        self.0.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }
}

/// Backend message when there is one, otherwise the view's own fallback.
pub(crate) fn read_failure(err: &ApiError, fallback: &str) -> String {
    match err.backend_message() {
        Some(message) if !message.trim().is_empty() => message.to_string(),
        _ => fallback.to_string(),
    }
}
