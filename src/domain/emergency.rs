//! Emergency override record

use crate::domain::actor::AccessContext;
use crate::domain::ids::PatientRef;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One justified, always-audited emergency access grant
///
/// Access is per-call, not session-based: every emergency read produces its
/// own override record paired with exactly one audit entry, keeping the trail
/// strictly one-record-per-access. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmergencyOverride {
    /// Override identifier
    pub id: Uuid,

    /// User reference of the requesting clinician
    pub requesting_user: String,

    /// Patient whose record the override opens
    pub patient_ref: PatientRef,

    /// Required, non-empty clinical justification
    pub justification: String,

    /// Requesting client IP address
    pub ip_address: String,

    /// Requesting client user agent
    pub user_agent: String,

    /// When the override was granted
    pub access_time: DateTime<Utc>,
}

impl EmergencyOverride {
    /// Creates a new override record
    pub fn new(
        requesting_user: impl Into<String>,
        patient_ref: PatientRef,
        justification: impl Into<String>,
        ctx: &AccessContext,
        access_time: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            requesting_user: requesting_user.into(),
            patient_ref,
            justification: justification.into(),
            ip_address: ctx.ip_address.clone(),
            user_agent: ctx.user_agent.clone(),
            access_time,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_override_captures_context() {
        let ctx = AccessContext::new("10.0.0.7", "emr-client/2.1");
        let override_ = EmergencyOverride::new(
            "dr-house",
            PatientRef::new("mrn-99").unwrap(),
            "unconscious patient, unknown allergies",
            &ctx,
            Utc::now(),
        );

        assert_eq!(override_.ip_address, "10.0.0.7");
        assert_eq!(override_.user_agent, "emr-client/2.1");
        assert_eq!(override_.requesting_user, "dr-house");
    }
}
