pub mod api_client;
pub mod ledger_client;
pub mod payout_client;

use crate::config::Settings;
use crate::session::SessionStore;
use ledger_client::LedgerClient;
use payout_client::PayoutClient;
use std::sync::Arc;

/// The two backend clients. Both read the bearer from the same session, so a
/// credential change is seen by each on its next request.
#[derive(Clone)]
pub struct Gateway {
    pub ledger: Arc<LedgerClient>,
    pub payout: Arc<PayoutClient>,
}

impl Gateway {
    pub fn new(settings: &Settings, session: Arc<SessionStore>) -> Self {
        Self {
            ledger: Arc::new(LedgerClient::new(
                settings.ledger_service.clone(),
                session.clone(),
            )),
            payout: Arc::new(PayoutClient::new(settings.payout_service.clone(), session)),
        }
    }
}
