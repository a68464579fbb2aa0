//! Principals, capabilities and request context
//!
//! The set of roles that grant emergency access is configuration, not code:
//! callers build a [`RolePrincipal`] from the user's role membership and the
//! configured [`CapabilityPolicy`], and services only ever ask
//! `has_capability`.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Capabilities a principal can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// May issue emergency overrides
    EmergencyAccess,
}

/// An acting user as seen by the access-control core
pub trait Principal: Send + Sync {
    /// Stable user reference for audit attribution
    fn user_ref(&self) -> &str;

    /// Whether the principal holds the given capability
    fn has_capability(&self, capability: Capability) -> bool;
}

/// Maps role names onto capabilities
///
/// Built from the `[emergency]` config section; the default role set matches
/// the deployments this core grew out of.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilityPolicy {
    /// Roles that grant [`Capability::EmergencyAccess`]
    pub emergency_access_roles: Vec<String>,
}

impl Default for CapabilityPolicy {
    fn default() -> Self {
        Self {
            emergency_access_roles: vec![
                "Emergency Doctor".to_string(),
                "Emergency Nurse".to_string(),
                "System Administrator".to_string(),
            ],
        }
    }
}

impl CapabilityPolicy {
    /// Capabilities granted by the given role names
    pub fn capabilities_for(&self, roles: &[String]) -> HashSet<Capability> {
        let mut capabilities = HashSet::new();
        if roles.iter().any(|r| self.emergency_access_roles.contains(r)) {
            capabilities.insert(Capability::EmergencyAccess);
        }
        capabilities
    }
}

/// Principal whose capabilities derive from role membership
#[derive(Debug, Clone)]
pub struct RolePrincipal {
    user_ref: String,
    capabilities: HashSet<Capability>,
}

impl RolePrincipal {
    /// Builds a principal from role membership under the given policy
    pub fn from_roles(
        user_ref: impl Into<String>,
        roles: &[String],
        policy: &CapabilityPolicy,
    ) -> Self {
        Self {
            user_ref: user_ref.into(),
            capabilities: policy.capabilities_for(roles),
        }
    }

    /// Builds a principal holding the given capabilities directly
    pub fn with_capabilities(
        user_ref: impl Into<String>,
        capabilities: impl IntoIterator<Item = Capability>,
    ) -> Self {
        Self {
            user_ref: user_ref.into(),
            capabilities: capabilities.into_iter().collect(),
        }
    }
}

impl Principal for RolePrincipal {
    fn user_ref(&self) -> &str {
        &self.user_ref
    }

    fn has_capability(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }
}

/// Per-request client context captured into override and audit records
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessContext {
    /// Requesting client IP address
    pub ip_address: String,

    /// Requesting client user agent
    pub user_agent: String,
}

impl AccessContext {
    /// Creates a new context
    pub fn new(ip_address: impl Into<String>, user_agent: impl Into<String>) -> Self {
        Self {
            ip_address: ip_address.into(),
            user_agent: user_agent.into(),
        }
    }
}
