//! Session store: the one owner of the bearer credential.
//!
//! The credential and the identity decoded from it live behind a single lock
//! and change together. Both API clients read the bearer from here on every
//! request, so a credential change reaches them at the same instant.

pub mod storage;

use crate::error::SessionError;
use crate::models::Identity;
use crate::services::ledger_client::LedgerClient;
use crate::utils::decode_identity;
use secrecy::{ExposeSecret, Secret};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::sync::watch;

pub use storage::{FileSessionStorage, MemorySessionStorage, PersistedSession, SessionStorage};

/// Lifecycle of the session as seen by views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Storage not yet read.
    Initializing,
    Authenticated,
    Unauthenticated,
}

/// Single-fire guard for the "session expired" escape hatch.
///
/// `Active -> Expiring -> Redirected`; only the first authorization-denied
/// response moves it out of `Active`. A new login puts it back to `Active`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpiryGuard {
    Active,
    Expiring,
    Redirected,
}

/// Published on every session transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    Started,
    SignedIn(Identity),
    SignedOut,
    /// A backend rejected the credential; views must route to login.
    LoginRequired,
}

/// Bearer as seen by one outgoing request. `epoch` identifies which credential
/// was sent so a late rejection of an old credential cannot expire a newer one.
#[derive(Clone)]
pub struct AuthSnapshot {
    pub bearer: Option<Secret<String>>,
    pub epoch: u64,
}

struct SessionState {
    credential: Option<Secret<String>>,
    identity: Option<Identity>,
    phase: SessionPhase,
    guard: ExpiryGuard,
    epoch: u64,
}

pub struct SessionStore {
    state: RwLock<SessionState>,
    storage: Arc<dyn SessionStorage>,
    events: watch::Sender<SessionEvent>,
}

impl SessionStore {
    pub fn new(storage: Arc<dyn SessionStorage>) -> Self {
        let (events, _) = watch::channel(SessionEvent::Started);
        Self {
            state: RwLock::new(SessionState {
                credential: None,
                identity: None,
                phase: SessionPhase::Initializing,
                guard: ExpiryGuard::Active,
                epoch: 0,
            }),
            storage,
            events,
        }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemorySessionStorage::new()))
    }

    fn read(&self) -> RwLockReadGuard<'_, SessionState> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, SessionState> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Rehydrate from storage. The stored identity is ignored and recomputed
    /// from the stored credential.
    pub fn init(&self) -> Result<Option<Identity>, SessionError> {
        match self.storage.load()? {
            Some(persisted) => {
                tracing::debug!("Rehydrating session from storage");
                self.set_credential(Some(persisted.credential))
            }
            None => {
                self.write().phase = SessionPhase::Unauthenticated;
                Ok(None)
            }
        }
    }

    /// Replace the credential and its identity in one step and persist both.
    ///
    /// A credential that does not decode is treated as no credential at all.
    /// Storage is written first; if that fails nothing in memory changes.
    pub fn set_credential(
        &self,
        credential: Option<String>,
    ) -> Result<Option<Identity>, SessionError> {
        let identity = credential.as_deref().and_then(decode_identity);
        if credential.is_some() && identity.is_none() {
            tracing::warn!("Discarding credential without a readable identity");
        }

        let mut state = self.write();
        match (credential, identity.clone()) {
            (Some(credential), Some(identity)) => {
                self.storage.save(&PersistedSession {
                    credential: credential.clone(),
                    identity: Some(identity.clone()),
                })?;
                state.epoch += 1;
                state.credential = Some(Secret::new(credential));
                state.identity = Some(identity.clone());
                state.phase = SessionPhase::Authenticated;
                state.guard = ExpiryGuard::Active;
                self.events.send_replace(SessionEvent::SignedIn(identity));
            }
            _ => {
                self.storage.clear()?;
                state.epoch += 1;
                state.credential = None;
                state.identity = None;
                state.phase = SessionPhase::Unauthenticated;
                self.events.send_replace(SessionEvent::SignedOut);
            }
        }

        Ok(identity)
    }

    /// Exchange username and password for a credential at the ledger service.
    /// Returns the identity so the caller can route by role straight away.
    pub async fn login(
        &self,
        ledger: &LedgerClient,
        username: &str,
        password: &Secret<String>,
    ) -> Result<Identity, SessionError> {
        let response = ledger.login(username, password.expose_secret()).await?;

        match self.set_credential(Some(response.access_token))? {
            Some(identity) => {
                tracing::info!(
                    subject = %identity.subject,
                    roles = ?identity.roles,
                    "User logged in successfully"
                );
                Ok(identity)
            }
            None => Err(SessionError::InvalidCredential),
        }
    }

    pub fn logout(&self) -> Result<(), SessionError> {
        self.set_credential(None)?;
        tracing::info!("User logged out");
        Ok(())
    }

    /// Recompute the identity from the current credential; logs out if it no
    /// longer decodes.
    pub fn refresh_identity(&self) -> Result<Option<Identity>, SessionError> {
        let credential = self
            .read()
            .credential
            .as_ref()
            .map(|c| c.expose_secret().clone());

        match credential {
            Some(credential) => self.set_credential(Some(credential)),
            None => Ok(None),
        }
    }

    /// Called by the gateway on a 401/403. Clears the session and requests
    /// navigation to login at most once per expiry, however many in-flight
    /// requests fail. Returns whether this call performed the expiry.
    ///
    /// The whole transition runs under the write lock, so a login racing the
    /// expiry lands either before it (and is expired) or after it.
    pub fn expire(&self, epoch: u64) -> bool {
        let mut state = self.write();
        if state.epoch != epoch || state.credential.is_none() {
            return false;
        }
        if state.guard != ExpiryGuard::Active {
            return false;
        }

        state.guard = ExpiryGuard::Expiring;
        state.credential = None;
        state.identity = None;
        state.phase = SessionPhase::Unauthenticated;
        state.epoch += 1;

        if let Err(e) = self.storage.clear() {
            tracing::error!("Failed to clear expired session from storage: {}", e);
        }

        state.guard = ExpiryGuard::Redirected;
        tracing::warn!("Session expired; login required");
        self.events.send_replace(SessionEvent::LoginRequired);
        true
    }

    pub fn authorization(&self) -> AuthSnapshot {
        let state = self.read();
        AuthSnapshot {
            bearer: state.credential.clone(),
            epoch: state.epoch,
        }
    }

    pub fn identity(&self) -> Option<Identity> {
        self.read().identity.clone()
    }

    pub fn phase(&self) -> SessionPhase {
        self.read().phase
    }

    pub fn expiry_guard(&self) -> ExpiryGuard {
        self.read().guard
    }

    pub fn is_authenticated(&self) -> bool {
        self.phase() == SessionPhase::Authenticated
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionEvent> {
        self.events.subscribe()
    }
}
