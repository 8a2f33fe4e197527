pub mod config;
pub mod error;
pub mod models;
pub mod observability;
pub mod routing;
pub mod services;
pub mod session;
pub mod utils;
pub mod workflows;

use config::Settings;
use error::SessionError;
use routing::{EntryPoint, RouteDecision};
use secrecy::Secret;
use services::Gateway;
use session::{FileSessionStorage, MemorySessionStorage, SessionStorage, SessionStore};
use std::sync::Arc;

/// Shared application state: the session and the two backend clients reading from it.
#[derive(Clone)]
pub struct AppState {
    pub session: Arc<SessionStore>,
    pub gateway: Gateway,
}

impl AppState {
    pub fn new(settings: &Settings, storage: Arc<dyn SessionStorage>) -> Self {
        let session = Arc::new(SessionStore::new(storage));
        let gateway = Gateway::new(settings, session.clone());
        Self { session, gateway }
    }

    /// File-backed session when a storage path is configured, in-memory otherwise.
    pub fn from_settings(settings: &Settings) -> Self {
        let storage: Arc<dyn SessionStorage> = match &settings.session.storage_path {
            Some(path) => Arc::new(FileSessionStorage::new(path.clone())),
            None => Arc::new(MemorySessionStorage::new()),
        };
        Self::new(settings, storage)
    }

    /// Sign in and pick the landing view for the returned identity.
    pub async fn login(
        &self,
        username: &str,
        password: &Secret<String>,
    ) -> Result<RouteDecision, SessionError> {
        let identity = self
            .session
            .login(&self.gateway.ledger, username, password)
            .await?;
        Ok(routing::landing_for(Some(&identity)))
    }

    pub fn route(&self, entry: EntryPoint) -> RouteDecision {
        routing::resolve(self.session.identity().as_ref(), entry)
    }
}
