#![allow(dead_code)]

use base64::{engine::general_purpose, Engine as _};
use ledger_console::config::{ServiceSettings, SessionSettings, Settings, TelemetrySettings};
use ledger_console::models::Identity;
use ledger_console::session::{MemorySessionStorage, SessionStorage};
use ledger_console::AppState;
use std::sync::Arc;
use uuid::Uuid;
use wiremock::MockServer;

pub const MERCHANT_ID: &str = "3f1c2d4e-5a6b-4c7d-8e9f-0a1b2c3d4e5f";

/// Unsigned three-segment token carrying the given claims. Signatures are
/// the backends' concern; the console only reads the payload.
pub fn credential(sub: &str, roles: &[&str], merchant_id: Option<Uuid>) -> String {
    let header = general_purpose::URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let mut claims = serde_json::json!({ "sub": sub, "roles": roles });
    if let Some(merchant_id) = merchant_id {
        claims["merchantId"] = serde_json::json!(merchant_id.to_string());
    }
    let body = general_purpose::URL_SAFE_NO_PAD.encode(claims.to_string());
    format!("{}.{}.test-signature", header, body)
}

pub fn merchant_id() -> Uuid {
    Uuid::parse_str(MERCHANT_ID).expect("valid merchant id")
}

/// Console wired to two mock backends: one standing in for the wallet ledger
/// service and one for the payout orchestrator.
pub struct TestConsole {
    pub ledger: MockServer,
    pub payout: MockServer,
    pub state: AppState,
}

impl TestConsole {
    pub async fn spawn() -> Self {
        Self::spawn_with_storage(Arc::new(MemorySessionStorage::new())).await
    }

    pub async fn spawn_with_storage(storage: Arc<dyn SessionStorage>) -> Self {
        let ledger = MockServer::start().await;
        let payout = MockServer::start().await;

        let settings = Settings {
            ledger_service: ServiceSettings::new(ledger.uri()),
            payout_service: ServiceSettings::new(payout.uri()),
            session: SessionSettings::default(),
            telemetry: TelemetrySettings::default(),
        };
        let state = AppState::new(&settings, storage);
        state.session.init().expect("Failed to init session");

        Self {
            ledger,
            payout,
            state,
        }
    }

    /// Install a credential directly, skipping the login call.
    pub fn sign_in(&self, sub: &str, roles: &[&str], merchant_id: Option<Uuid>) -> String {
        let token = credential(sub, roles, merchant_id);
        self.state
            .session
            .set_credential(Some(token.clone()))
            .expect("Failed to set credential");
        token
    }

    pub fn sign_in_merchant(&self) -> (String, Identity) {
        let token = self.sign_in("merchant1", &["MERCHANT"], Some(merchant_id()));
        let identity = self.state.session.identity().expect("merchant identity");
        (token, identity)
    }

    pub fn sign_in_admin(&self) -> String {
        self.sign_in("admin", &["ADMIN"], None)
    }

    pub fn sign_in_vendor(&self) -> String {
        self.sign_in("vendor1", &["VENDOR"], Some(merchant_id()))
    }
}

pub fn wallet_json(id: Uuid, wallet_type: &str, status: &str, balance: f64) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "merchantId": MERCHANT_ID,
        "walletType": wallet_type,
        "currencyCode": "INR",
        "status": status,
        "balance": balance
    })
}

pub fn payout_json(id: Uuid, status: &str, amount: f64) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "merchantId": MERCHANT_ID,
        "vendorId": Uuid::new_v4(),
        "vendorWalletId": Uuid::new_v4(),
        "amount": amount,
        "currencyCode": "INR",
        "status": status
    })
}

pub fn page_json(content: Vec<serde_json::Value>) -> serde_json::Value {
    let total = content.len();
    serde_json::json!({
        "content": content,
        "totalElements": total,
        "totalPages": 1,
        "number": 0,
        "size": 20
    })
}
