use super::{read_failure, Activate, ErrorSlot};
use crate::error::WorkflowError;
use crate::models::{BankDetails, BankDetailsUpdate};
use crate::services::Gateway;
use async_trait::async_trait;

#[derive(Debug, Clone, Default)]
pub struct BankDetailsForm {
    pub account_number: String,
    pub ifsc_code: Option<String>,
    pub beneficiary_name: String,
}

/// The vendor's payout bank account.
pub struct BankDetailsEditor {
    gateway: Gateway,
    /// `None` until the vendor saves an account.
    pub details: Option<BankDetails>,
    pub error: ErrorSlot,
}

impl BankDetailsEditor {
    pub fn new(gateway: Gateway) -> Self {
        Self {
            gateway,
            details: None,
            error: ErrorSlot::default(),
        }
    }

    #[tracing::instrument(name = "bank_details.load", skip(self))]
    pub async fn load(&mut self) {
        self.error.clear();
        match self.gateway.ledger.bank_details().await {
            Ok(details) => self.details = details,
            Err(e) => {
                self.details = None;
                self.error.record(read_failure(&e, "Failed to load"));
            }
        }
    }

    /// Replace the saved account. What is shown afterwards is the response body.
    #[tracing::instrument(name = "bank_details.save", skip(self, form))]
    pub async fn save(&mut self, form: &BankDetailsForm) -> Result<&BankDetails, WorkflowError> {
        self.error.clear();

        let account_number = form.account_number.trim();
        let beneficiary_name = form.beneficiary_name.trim();
        if account_number.is_empty() || beneficiary_name.is_empty() {
            let err =
                WorkflowError::precondition("Account number and beneficiary name required");
            self.error.record(err.user_message());
            return Err(err);
        }
        let update = BankDetailsUpdate {
            account_number: account_number.to_string(),
            ifsc_code: form
                .ifsc_code
                .as_deref()
                .map(str::trim)
                .filter(|code| !code.is_empty())
                .map(str::to_string),
            beneficiary_name: beneficiary_name.to_string(),
        };

        match self.gateway.ledger.update_bank_details(&update).await {
            Ok(details) => {
                tracing::info!("Bank details saved");
                Ok(&*self.details.insert(details))
            }
            Err(e) => {
                self.error.record(read_failure(&e, "Failed to save"));
                Err(e.into())
            }
        }
    }
}

#[async_trait]
impl Activate for BankDetailsEditor {
    async fn activate(&mut self) {
        self.load().await;
    }
}
