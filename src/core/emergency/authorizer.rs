//! Emergency access authorizer
//!
//! Role-gated override issuance. Access is per-call, not session-based: every
//! emergency read requires a fresh `authorize` call, and each call persists
//! its own override+audit pair in one transaction, keeping the trail strictly
//! one-record-per-access.

use crate::adapters::store::traits::OverrideStore;
use crate::core::audit::AccessAuditLedger;
use crate::domain::actor::{AccessContext, Capability, Principal};
use crate::domain::audit::{AccessType, AuditAction, AuditLogEntry};
use crate::domain::emergency::EmergencyOverride;
use crate::domain::ids::PatientRef;
use crate::domain::{PassportError, Result};
use std::sync::Arc;

/// Issues audited emergency overrides
pub struct EmergencyAccessAuthorizer {
    overrides: Arc<dyn OverrideStore>,
    ledger: Arc<AccessAuditLedger>,
}

impl EmergencyAccessAuthorizer {
    /// Create a new authorizer
    pub fn new(overrides: Arc<dyn OverrideStore>, ledger: Arc<AccessAuditLedger>) -> Self {
        Self { overrides, ledger }
    }

    /// Grant one emergency access, producing an override and its audit entry
    ///
    /// The override and the entry are written in a single transaction: if
    /// either persistence step fails the whole call fails and no partial
    /// record remains observable.
    ///
    /// # Errors
    ///
    /// - [`PassportError::Validation`] if the justification is empty.
    /// - [`PassportError::PermissionDenied`] if the principal does not hold
    ///   the emergency-access capability.
    pub async fn authorize(
        &self,
        principal: &dyn Principal,
        patient_ref: &PatientRef,
        justification: &str,
        ctx: &AccessContext,
    ) -> Result<EmergencyOverride> {
        let (override_record, _) = self
            .authorize_with_entry(principal, patient_ref, justification, ctx)
            .await?;
        Ok(override_record)
    }

    /// [`authorize`](Self::authorize), also returning the audit entry
    ///
    /// The facade uses this to hand the caller the attributable entry.
    pub async fn authorize_with_entry(
        &self,
        principal: &dyn Principal,
        patient_ref: &PatientRef,
        justification: &str,
        ctx: &AccessContext,
    ) -> Result<(EmergencyOverride, AuditLogEntry)> {
        if justification.trim().is_empty() {
            return Err(PassportError::Validation(
                "Emergency override requires a non-empty justification".to_string(),
            ));
        }

        if !principal.has_capability(Capability::EmergencyAccess) {
            return Err(PassportError::PermissionDenied(format!(
                "User {} does not hold the emergency-access capability",
                principal.user_ref()
            )));
        }

        let entry = self.ledger.stamp_entry(
            principal.user_ref(),
            patient_ref.clone(),
            AccessType::Emergency,
            AuditAction::View,
            format!("Emergency override: {justification}"),
            ctx,
        );

        let override_record = EmergencyOverride::new(
            principal.user_ref(),
            patient_ref.clone(),
            justification,
            ctx,
            entry.access_time,
        );

        self.overrides
            .insert_override_with_entry(&override_record, &entry)
            .await?;

        tracing::warn!(
            user_ref = %principal.user_ref(),
            patient_ref = %patient_ref,
            override_id = %override_record.id,
            "Emergency override granted"
        );

        Ok((override_record, entry))
    }

    /// Pure capability check: no side effect, no audit entry
    pub fn has_emergency_access(&self, principal: &dyn Principal) -> bool {
        principal.has_capability(Capability::EmergencyAccess)
    }
}
