//! Audit log entry model
//!
//! One immutable record per access event. Entries are append-only: there is
//! no mutation API anywhere in the crate, and corrections require a new entry
//! referencing the old one.

use crate::domain::actor::AccessContext;
use crate::domain::ids::PatientRef;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Channel through which a record was accessed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AccessType {
    /// Ordinary privileged view
    Regular,
    /// Role-gated emergency override
    Emergency,
    /// Patient-authorized consent token
    Consent,
    /// Access recorded by the external registry sync collaborator
    CrossHospital,
}

impl AccessType {
    /// Stable wire name, used for storage and log fields
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessType::Regular => "regular",
            AccessType::Emergency => "emergency",
            AccessType::Consent => "consent",
            AccessType::CrossHospital => "cross-hospital",
        }
    }
}

impl fmt::Display for AccessType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AccessType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "regular" => Ok(AccessType::Regular),
            "emergency" => Ok(AccessType::Emergency),
            "consent" => Ok(AccessType::Consent),
            "cross-hospital" => Ok(AccessType::CrossHospital),
            other => Err(format!("Unknown access type: {other}")),
        }
    }
}

/// What was done to the record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditAction {
    View,
    Create,
    Update,
    Delete,
}

impl AuditAction {
    /// Stable wire name, used for storage and log fields
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::View => "view",
            AuditAction::Create => "create",
            AuditAction::Update => "update",
            AuditAction::Delete => "delete",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AuditAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "view" => Ok(AuditAction::View),
            "create" => Ok(AuditAction::Create),
            "update" => Ok(AuditAction::Update),
            "delete" => Ok(AuditAction::Delete),
            other => Err(format!("Unknown audit action: {other}")),
        }
    }
}

/// Immutable record of one access event
///
/// `access_time` is assigned by the ledger at write time, never by the
/// caller, so entries cannot be backdated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditLogEntry {
    /// Entry identifier
    pub id: Uuid,

    /// User reference of the acting user
    pub user_ref: String,

    /// Patient whose record was accessed
    pub patient_ref: PatientRef,

    /// Channel through which the record was accessed
    pub access_type: AccessType,

    /// What was done
    pub action: AuditAction,

    /// Free-text detail (never contains plaintext consent codes)
    pub details: String,

    /// Ledger-assigned write time
    pub access_time: DateTime<Utc>,

    /// Requesting client IP address
    pub ip_address: String,

    /// Requesting client user agent
    pub user_agent: String,
}

impl AuditLogEntry {
    /// Creates a new entry stamped at `access_time`
    pub fn new(
        user_ref: impl Into<String>,
        patient_ref: PatientRef,
        access_type: AccessType,
        action: AuditAction,
        details: impl Into<String>,
        ctx: &AccessContext,
        access_time: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_ref: user_ref.into(),
            patient_ref,
            access_type,
            action,
            details: details.into(),
            access_time,
            ip_address: ctx.ip_address.clone(),
            user_agent: ctx.user_agent.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(AccessType::Regular, "regular")]
    #[test_case(AccessType::Emergency, "emergency")]
    #[test_case(AccessType::Consent, "consent")]
    #[test_case(AccessType::CrossHospital, "cross-hospital")]
    fn test_access_type_wire_names(access_type: AccessType, expected: &str) {
        assert_eq!(access_type.as_str(), expected);
        assert_eq!(expected.parse::<AccessType>().unwrap(), access_type);
    }

    #[test_case(AuditAction::View, "view")]
    #[test_case(AuditAction::Create, "create")]
    #[test_case(AuditAction::Update, "update")]
    #[test_case(AuditAction::Delete, "delete")]
    fn test_audit_action_wire_names(action: AuditAction, expected: &str) {
        assert_eq!(action.as_str(), expected);
        assert_eq!(expected.parse::<AuditAction>().unwrap(), action);
    }

    #[test]
    fn test_unknown_access_type_rejected() {
        assert!("root".parse::<AccessType>().is_err());
    }

    #[test]
    fn test_access_type_serde_uses_kebab_case() {
        let json = serde_json::to_string(&AccessType::CrossHospital).unwrap();
        assert_eq!(json, "\"cross-hospital\"");
    }
}
