//! Escrow credit and escrow split for a merchant's orders.
//!
//! Two flows share one view:
//! - payment success: credit the merchant escrow for an order placed with a vendor;
//! - order completion: pick a vendor, pick one of that vendor's pending orders,
//!   split its escrow amount into the main and vendor wallets.
//!
//! The pending orders always belong to the selected vendor. Choosing another
//! vendor drops the list and the selected order at once; a list that arrives
//! for a vendor that is no longer selected is thrown away.

use super::{read_failure, Activate, ErrorSlot};
use crate::error::{ApiError, WorkflowError};
use crate::models::{
    Identity, OrderCompleteEvent, PaymentSuccessEvent, PendingOrder, UserProfile, VendorSummary,
};
use crate::services::payout_client::PayoutClient;
use crate::services::Gateway;
use crate::utils::amount::{normalize_currency, parse_amount, DEFAULT_CURRENCY};
use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

/// Operator input for a payment-success event.
#[derive(Debug, Clone, Default)]
pub struct PaymentSuccessForm {
    pub vendor_id: Option<Uuid>,
    pub order_id: String,
    pub amount: String,
    pub currency_code: Option<String>,
}

/// A pending-orders read issued for one vendor selection. Its result is only
/// applied if that selection is still current.
#[derive(Clone)]
pub struct PendingOrdersTicket {
    generation: u64,
    merchant_id: Uuid,
    vendor_id: Uuid,
    payout: Arc<PayoutClient>,
}

impl PendingOrdersTicket {
    pub fn vendor_id(&self) -> Uuid {
        self.vendor_id
    }

    pub async fn fetch(&self) -> Result<Vec<PendingOrder>, ApiError> {
        self.payout
            .pending_orders(self.merchant_id, self.vendor_id)
            .await
    }
}

pub struct OrderCompletion {
    gateway: Gateway,
    merchant_id: Option<Uuid>,
    pub profile: Option<UserProfile>,
    pub vendors: Vec<VendorSummary>,
    /// Profile or vendor list failed to load.
    pub load_error: ErrorSlot,
    selected_vendor: Option<Uuid>,
    pending_orders: Vec<PendingOrder>,
    selected_order: Option<String>,
    generation: u64,
    pub message: Option<String>,
    pub error: ErrorSlot,
}

impl OrderCompletion {
    pub fn new(gateway: Gateway, identity: &Identity) -> Self {
        Self {
            gateway,
            merchant_id: identity.merchant_affiliation,
            profile: None,
            vendors: Vec::new(),
            load_error: ErrorSlot::default(),
            selected_vendor: None,
            pending_orders: Vec::new(),
            selected_order: None,
            generation: 0,
            message: None,
            error: ErrorSlot::default(),
        }
    }

    pub fn merchant_id(&self) -> Option<Uuid> {
        self.merchant_id
    }

    /// Profile (for the wallet ids) and vendor list, in parallel.
    #[tracing::instrument(name = "order_completion.load", skip(self))]
    pub async fn load(&mut self) {
        self.load_error.clear();
        let Some(merchant_id) = self.merchant_id else {
            self.load_error.record("Merchant ID not found.");
            return;
        };

        let (profile, vendors) = futures::join!(
            self.gateway.ledger.me(),
            self.gateway.ledger.vendors(merchant_id),
        );

        match profile {
            Ok(profile) => self.profile = Some(profile),
            Err(e) => {
                self.profile = None;
                self.load_error.record(read_failure(&e, "Failed to load"));
            }
        }
        match vendors {
            Ok(vendors) => self.vendors = vendors,
            Err(e) => {
                self.vendors.clear();
                self.load_error.record(read_failure(&e, "Failed to load vendors"));
            }
        }
    }

    pub fn selected_vendor(&self) -> Option<&VendorSummary> {
        let vendor_id = self.selected_vendor?;
        self.vendors.iter().find(|v| v.user_id == vendor_id)
    }

    pub fn selected_vendor_id(&self) -> Option<Uuid> {
        self.selected_vendor
    }

    pub fn pending_orders(&self) -> &[PendingOrder] {
        &self.pending_orders
    }

    pub fn selected_order(&self) -> Option<&PendingOrder> {
        let order_id = self.selected_order.as_deref()?;
        self.pending_orders.iter().find(|o| o.order_id == order_id)
    }

    /// Switch the vendor whose pending orders are shown. The old list and the
    /// selected order are cleared before this returns; the returned ticket is
    /// the read for the new vendor, if there is one to issue.
    pub fn begin_vendor_selection(
        &mut self,
        vendor_id: Option<Uuid>,
    ) -> Option<PendingOrdersTicket> {
        self.generation += 1;
        self.selected_vendor = vendor_id;
        self.pending_orders.clear();
        self.selected_order = None;

        let merchant_id = self.merchant_id?;
        let vendor_id = vendor_id?;
        Some(PendingOrdersTicket {
            generation: self.generation,
            merchant_id,
            vendor_id,
            payout: self.gateway.payout.clone(),
        })
    }

    /// Apply a pending-orders result. Returns false, leaving state alone, when
    /// the vendor selection moved on after the ticket was issued.
    pub fn apply_pending_orders(
        &mut self,
        ticket: &PendingOrdersTicket,
        result: Result<Vec<PendingOrder>, ApiError>,
    ) -> bool {
        if ticket.generation != self.generation {
            tracing::debug!(
                vendor_id = %ticket.vendor_id,
                "Discarding pending orders for a vendor no longer selected"
            );
            return false;
        }

        match result {
            Ok(orders) => self.pending_orders = orders,
            Err(e) => {
                self.pending_orders.clear();
                self.error
                    .record(read_failure(&e, "Failed to load pending orders"));
            }
        }
        true
    }

    /// Select a vendor and load its pending orders.
    pub async fn select_vendor(&mut self, vendor_id: Option<Uuid>) {
        if let Some(ticket) = self.begin_vendor_selection(vendor_id) {
            let result = ticket.fetch().await;
            self.apply_pending_orders(&ticket, result);
        }
    }

    /// Only an order from the current vendor's pending list can be selected.
    pub fn select_order(&mut self, order_id: &str) -> Result<&PendingOrder, WorkflowError> {
        if !self.pending_orders.iter().any(|o| o.order_id == order_id) {
            return Err(WorkflowError::precondition(
                "Please select an order to complete.",
            ));
        }
        self.selected_order = Some(order_id.to_string());
        self.selected_order()
            .ok_or_else(|| WorkflowError::precondition("Please select an order to complete."))
    }

    fn begin_mutation(&mut self) {
        self.message = None;
        self.error.clear();
    }

    fn fail(&mut self, err: WorkflowError) -> WorkflowError {
        self.error.record(err.user_message());
        err
    }

    /// Credit the merchant escrow for one order. The backend dedupes by
    /// order id; calling this twice for the same order is safe.
    #[tracing::instrument(
        name = "order_completion.payment_success",
        skip(self, form),
        fields(order_id = %form.order_id.trim())
    )]
    pub async fn record_payment_success(
        &mut self,
        form: &PaymentSuccessForm,
    ) -> Result<String, WorkflowError> {
        self.begin_mutation();

        let event = match self.payment_success_event(form) {
            Ok(event) => event,
            Err(e) => return Err(self.fail(e)),
        };

        match self.gateway.payout.payment_success(&event).await {
            Ok(ack) => {
                let message = ack.message.unwrap_or_else(|| "Escrow credited.".to_string());
                tracing::info!(order_id = %event.order_id, "Escrow credited");
                self.message = Some(message.clone());
                Ok(message)
            }
            Err(e) => Err(self.fail(e.into())),
        }
    }

    fn payment_success_event(
        &self,
        form: &PaymentSuccessForm,
    ) -> Result<PaymentSuccessEvent, WorkflowError> {
        let (merchant_id, escrow_wallet_id) = match (
            self.merchant_id,
            self.profile.as_ref().and_then(|p| p.escrow_wallet_id),
        ) {
            (Some(merchant_id), Some(escrow)) => (merchant_id, escrow),
            _ => {
                return Err(WorkflowError::precondition(
                    "Escrow wallet not found. Refresh the page.",
                ))
            }
        };
        let vendor_id = form
            .vendor_id
            .ok_or_else(|| WorkflowError::precondition("Please select a vendor."))?;
        let order_id = form.order_id.trim();
        if order_id.is_empty() {
            return Err(WorkflowError::precondition("Order ID is required."));
        }
        let amount = parse_amount(&form.amount)
            .ok_or_else(|| WorkflowError::precondition("Amount must be at least 0.01"))?;

        Ok(PaymentSuccessEvent {
            merchant_id,
            vendor_id,
            order_id: order_id.to_string(),
            amount,
            currency_code: normalize_currency(form.currency_code.as_deref()),
            escrow_wallet_id,
        })
    }

    /// Split the selected order's escrow amount. On success the order leaves
    /// the local pending list without a re-read; on failure nothing changes.
    #[tracing::instrument(name = "order_completion.complete", skip(self))]
    pub async fn complete_selected_order(&mut self) -> Result<String, WorkflowError> {
        self.begin_mutation();

        let event = match self.order_complete_event() {
            Ok(event) => event,
            Err(e) => return Err(self.fail(e)),
        };

        match self.gateway.payout.order_complete(&event).await {
            Ok(ack) => {
                let message = ack
                    .message
                    .unwrap_or_else(|| "Order distributed.".to_string());
                tracing::info!(order_id = %event.order_id, "Order distributed");
                self.selected_order = None;
                self.pending_orders.retain(|o| o.order_id != event.order_id);
                self.message = Some(message.clone());
                Ok(message)
            }
            Err(e) => Err(self.fail(e.into())),
        }
    }

    fn order_complete_event(&self) -> Result<OrderCompleteEvent, WorkflowError> {
        let wallets_missing =
            || WorkflowError::precondition("Wallet IDs not found. Refresh the page.");
        let merchant_id = self.merchant_id.ok_or_else(wallets_missing)?;
        let profile = self.profile.as_ref().ok_or_else(wallets_missing)?;
        let escrow_wallet_id = profile.escrow_wallet_id.ok_or_else(wallets_missing)?;
        let main_wallet_id = profile.main_wallet_id.ok_or_else(wallets_missing)?;

        let vendor = self
            .selected_vendor()
            .ok_or_else(|| WorkflowError::precondition("Please select a vendor."))?;
        let order = self
            .selected_order()
            .ok_or_else(|| WorkflowError::precondition("Please select an order to complete."))?;
        let vendor_wallet_id = vendor.vendor_wallet_id.ok_or_else(|| {
            WorkflowError::precondition("Vendor wallet not found. Refresh the page.")
        })?;

        // Amount and currency come from the pending order as the backend reported them.
        Ok(OrderCompleteEvent {
            merchant_id,
            order_id: order.order_id.clone(),
            amount: order.amount,
            currency_code: order
                .currency_code
                .clone()
                .unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
            vendor_id: vendor.user_id,
            escrow_wallet_id,
            main_wallet_id,
            vendor_wallet_id,
        })
    }
}

#[async_trait]
impl Activate for OrderCompletion {
    async fn activate(&mut self) {
        self.load().await;
        let vendor = self.selected_vendor;
        self.select_vendor(vendor).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ServiceSettings, Settings};
    use crate::session::SessionStore;
    use rust_decimal::Decimal;

    fn gateway() -> Gateway {
        let settings = Settings {
            ledger_service: ServiceSettings::new("http://127.0.0.1:9"),
            payout_service: ServiceSettings::new("http://127.0.0.1:9"),
            session: Default::default(),
            telemetry: Default::default(),
        };
        Gateway::new(&settings, Arc::new(SessionStore::in_memory()))
    }

    fn merchant() -> Identity {
        Identity {
            subject: "merchant1".into(),
            roles: ["MERCHANT".to_string()].into_iter().collect(),
            merchant_affiliation: Some(Uuid::new_v4()),
        }
    }

    fn order(id: &str, amount: i64) -> PendingOrder {
        PendingOrder {
            order_id: id.into(),
            amount: Decimal::from(amount),
            currency_code: Some("INR".into()),
            created_at: None,
        }
    }

    #[test]
    fn switching_vendor_clears_list_and_selection_before_next_read() {
        let mut view = OrderCompletion::new(gateway(), &merchant());
        let vendor_a = Uuid::new_v4();
        let vendor_b = Uuid::new_v4();

        let ticket_a = view.begin_vendor_selection(Some(vendor_a)).unwrap();
        assert!(view.apply_pending_orders(&ticket_a, Ok(vec![order("o1", 100)])));
        view.select_order("o1").unwrap();
        assert!(view.selected_order().is_some());

        let ticket_b = view.begin_vendor_selection(Some(vendor_b)).unwrap();
        assert!(view.pending_orders().is_empty());
        assert!(view.selected_order().is_none());
        assert_eq!(ticket_b.vendor_id(), vendor_b);
    }

    #[test]
    fn late_result_for_previous_vendor_is_discarded() {
        let mut view = OrderCompletion::new(gateway(), &merchant());
        let ticket_a = view.begin_vendor_selection(Some(Uuid::new_v4())).unwrap();
        let ticket_b = view.begin_vendor_selection(Some(Uuid::new_v4())).unwrap();

        assert!(view.apply_pending_orders(&ticket_b, Ok(vec![order("b1", 50)])));
        assert!(!view.apply_pending_orders(&ticket_a, Ok(vec![order("a1", 70)])));
        assert_eq!(view.pending_orders().len(), 1);
        assert_eq!(view.pending_orders()[0].order_id, "b1");
    }

    #[test]
    fn clearing_vendor_issues_no_read() {
        let mut view = OrderCompletion::new(gateway(), &merchant());
        let ticket = view.begin_vendor_selection(Some(Uuid::new_v4())).unwrap();
        view.apply_pending_orders(&ticket, Ok(vec![order("o1", 100)]));

        assert!(view.begin_vendor_selection(None).is_none());
        assert!(view.pending_orders().is_empty());
    }

    #[test]
    fn order_outside_pending_set_cannot_be_selected() {
        let mut view = OrderCompletion::new(gateway(), &merchant());
        let ticket = view.begin_vendor_selection(Some(Uuid::new_v4())).unwrap();
        view.apply_pending_orders(&ticket, Ok(vec![order("o1", 100)]));

        let err = view.select_order("o2").unwrap_err();
        assert_eq!(err.user_message(), "Please select an order to complete.");
        assert!(view.selected_order().is_none());
    }

    #[tokio::test]
    async fn payment_success_preconditions_run_in_order() {
        let mut view = OrderCompletion::new(gateway(), &merchant());
        let form = PaymentSuccessForm::default();

        let err = view.record_payment_success(&form).await.unwrap_err();
        assert_eq!(err.user_message(), "Escrow wallet not found. Refresh the page.");

        view.profile = Some(UserProfile {
            id: Uuid::new_v4(),
            username: "merchant1".into(),
            roles: Default::default(),
            merchant_id: view.merchant_id(),
            status: None,
            created_at: None,
            updated_at: None,
            main_wallet_id: Some(Uuid::new_v4()),
            escrow_wallet_id: Some(Uuid::new_v4()),
            vendor_wallet_id: None,
        });
        let err = view.record_payment_success(&form).await.unwrap_err();
        assert_eq!(err.user_message(), "Please select a vendor.");

        let form = PaymentSuccessForm {
            vendor_id: Some(Uuid::new_v4()),
            ..Default::default()
        };
        let err = view.record_payment_success(&form).await.unwrap_err();
        assert_eq!(err.user_message(), "Order ID is required.");

        let form = PaymentSuccessForm {
            vendor_id: Some(Uuid::new_v4()),
            order_id: "o1".into(),
            amount: "0.001".into(),
            currency_code: None,
        };
        let err = view.record_payment_success(&form).await.unwrap_err();
        assert_eq!(err.user_message(), "Amount must be at least 0.01");
        assert_eq!(view.error.get(), Some("Amount must be at least 0.01"));
    }

    #[tokio::test]
    async fn completion_without_selection_is_rejected_locally() {
        let mut view = OrderCompletion::new(gateway(), &merchant());
        let err = view.complete_selected_order().await.unwrap_err();
        assert!(matches!(err, WorkflowError::Precondition(_)));
        assert_eq!(err.user_message(), "Wallet IDs not found. Refresh the page.");
    }
}
