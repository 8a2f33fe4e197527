//! Client-side identity derived from the bearer credential.
//!
//! The identity is advisory. It decides which console workflows are offered;
//! both backends re-authorize every call independently.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

/// Roles the console knows how to route. Tokens may carry others (e.g.
/// `SYSTEM`); those are kept in [`Identity::roles`] but never grant a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Admin,
    Merchant,
    Vendor,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::Merchant => "MERCHANT",
            Self::Vendor => "VENDOR",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub subject: String,
    pub roles: BTreeSet<String>,
    pub merchant_affiliation: Option<Uuid>,
}

impl Identity {
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(role.as_str())
    }

    /// Routable roles in a stable order (admin, merchant, vendor).
    pub fn routable_roles(&self) -> Vec<Role> {
        [Role::Admin, Role::Merchant, Role::Vendor]
            .into_iter()
            .filter(|role| self.has_role(*role))
            .collect()
    }
}
