//! The merchant's commission terms, as read from and written to the payout
//! orchestrator. The platform share itself is computed server-side.

use super::{read_failure, Activate, ErrorSlot};
use crate::error::WorkflowError;
use crate::models::{Commission, CommissionType, CommissionUpdate, Identity};
use crate::services::Gateway;
use crate::utils::amount::DEFAULT_CURRENCY;
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::str::FromStr;
use uuid::Uuid;

pub struct CommissionEarnings {
    gateway: Gateway,
    merchant_id: Option<Uuid>,
    /// `None` until a rate has been set for this merchant.
    pub commission: Option<Commission>,
    pub error: ErrorSlot,
}

impl CommissionEarnings {
    pub fn new(gateway: Gateway, identity: &Identity) -> Self {
        Self {
            gateway,
            merchant_id: identity.merchant_affiliation,
            commission: None,
            error: ErrorSlot::default(),
        }
    }

    /// Current rate shown as a percentage, if any.
    pub fn rate(&self) -> Option<Decimal> {
        self.commission.as_ref().and_then(|c| c.percentage_value)
    }

    #[tracing::instrument(name = "commission.load", skip(self))]
    pub async fn load(&mut self) {
        self.error.clear();
        let Some(merchant_id) = self.merchant_id else {
            self.error.record("Merchant ID not found.");
            return;
        };

        match self.gateway.payout.commission(merchant_id).await {
            Ok(commission) => self.commission = Some(commission),
            // Not configured yet.
            Err(e) if e.status() == Some(404) => self.commission = None,
            Err(e) => {
                self.commission = None;
                self.error.record(read_failure(&e, "Failed to load commission"));
            }
        }
    }

    /// Set a flat percentage rate in INR. The rate must lie in 0..=100.
    #[tracing::instrument(name = "commission.set_rate", skip(self))]
    pub async fn set_rate(&mut self, rate_input: &str) -> Result<Decimal, WorkflowError> {
        self.error.clear();

        let merchant_id = match self.merchant_id {
            Some(id) => id,
            None => return Err(self.reject("Merchant ID not found.")),
        };
        let rate = match parse_rate(rate_input) {
            Some(rate) => rate,
            None => return Err(self.reject("Enter a valid rate 0-100")),
        };

        let update = CommissionUpdate {
            commission_type: CommissionType::Percentage,
            percentage_value: rate,
            fixed_amount: None,
            currency_code: Some(DEFAULT_CURRENCY.to_string()),
        };

        match self
            .gateway
            .payout
            .update_commission(merchant_id, &update)
            .await
        {
            Ok(returned) => {
                tracing::info!(%merchant_id, %rate, "Commission rate updated");
                let commission = returned.unwrap_or_else(|| self.with_rate(rate));
                self.commission = Some(commission);
                Ok(rate)
            }
            Err(e) => {
                self.error.record(read_failure(&e, "Failed to update"));
                Err(e.into())
            }
        }
    }

    /// Local view of the terms after a write whose response carried no body.
    fn with_rate(&self, rate: Decimal) -> Commission {
        match &self.commission {
            Some(existing) => Commission {
                percentage_value: Some(rate),
                ..existing.clone()
            },
            None => Commission {
                merchant_id: self.merchant_id,
                commission_type: CommissionType::Percentage,
                percentage_value: Some(rate),
                fixed_amount: None,
                currency_code: Some(DEFAULT_CURRENCY.to_string()),
            },
        }
    }

    fn reject(&mut self, message: &str) -> WorkflowError {
        let err = WorkflowError::precondition(message);
        self.error.record(err.user_message());
        err
    }
}

#[async_trait]
impl Activate for CommissionEarnings {
    async fn activate(&mut self) {
        self.load().await;
    }
}

fn parse_rate(input: &str) -> Option<Decimal> {
    Decimal::from_str(input.trim())
        .ok()
        .filter(|rate| *rate >= Decimal::ZERO && *rate <= Decimal::ONE_HUNDRED)
}
