//! Escrow reconciliation as computed by the ledger service. Display only.

use super::{read_failure, Activate, ErrorSlot};
use crate::error::WorkflowError;
use crate::models::{Commission, Identity, Settlement};
use crate::services::Gateway;
use crate::utils::amount::{normalize_currency, DEFAULT_CURRENCY};
use async_trait::async_trait;
use uuid::Uuid;

/// A merchant's own settlement alongside its commission terms.
pub struct OrderSettlement {
    gateway: Gateway,
    merchant_id: Option<Uuid>,
    pub settlement: Option<Settlement>,
    /// `None` when no commission is configured or it could not be read.
    pub commission: Option<Commission>,
    pub error: ErrorSlot,
}

impl OrderSettlement {
    pub fn new(gateway: Gateway, identity: &Identity) -> Self {
        Self {
            gateway,
            merchant_id: identity.merchant_affiliation,
            settlement: None,
            commission: None,
            error: ErrorSlot::default(),
        }
    }

    #[tracing::instrument(name = "order_settlement.load", skip(self))]
    pub async fn load(&mut self) {
        self.error.clear();
        let Some(merchant_id) = self.merchant_id else {
            self.error.record("Merchant ID not found.");
            return;
        };

        let (settlement, commission) = futures::join!(
            self.gateway.ledger.settlement(merchant_id, DEFAULT_CURRENCY),
            self.gateway.payout.commission(merchant_id),
        );

        match settlement {
            Ok(settlement) => self.settlement = Some(settlement),
            Err(e) => {
                self.settlement = None;
                self.error.record(read_failure(&e, "Failed to load"));
            }
        }
        // Missing commission terms are normal for a new merchant.
        self.commission = match commission {
            Ok(commission) => Some(commission),
            Err(e) => {
                tracing::debug!(%merchant_id, "No commission shown: {}", e);
                None
            }
        };
    }
}

#[async_trait]
impl Activate for OrderSettlement {
    async fn activate(&mut self) {
        self.load().await;
    }
}

/// Admin lookup of any merchant's settlement.
pub struct SettlementReport {
    gateway: Gateway,
    pub settlement: Option<Settlement>,
    pub error: ErrorSlot,
}

impl SettlementReport {
    pub fn new(gateway: Gateway) -> Self {
        Self {
            gateway,
            settlement: None,
            error: ErrorSlot::default(),
        }
    }

    #[tracing::instrument(name = "settlement_report.lookup", skip(self))]
    pub async fn lookup(
        &mut self,
        merchant_id: Option<Uuid>,
        currency_code: Option<&str>,
    ) -> Result<&Settlement, WorkflowError> {
        self.error.clear();
        self.settlement = None;

        let Some(merchant_id) = merchant_id else {
            let err = WorkflowError::precondition("Merchant ID required");
            self.error.record(err.user_message());
            return Err(err);
        };
        let currency_code = normalize_currency(currency_code);

        match self.gateway.ledger.settlement(merchant_id, &currency_code).await {
            Ok(settlement) => Ok(&*self.settlement.insert(settlement)),
            Err(e) => {
                self.error
                    .record(read_failure(&e, "Failed to load settlement"));
                Err(e.into())
            }
        }
    }
}
