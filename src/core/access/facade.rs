//! Access control facade
//!
//! Single entry point the outer layers (web/admin, REST/FHIR gateway) call to
//! open a record through any of the three channels. Every successful call
//! produces exactly one attributable audit entry.

use crate::config::schema::ConsentConfig;
use crate::core::audit::AccessAuditLedger;
use crate::core::consent::ConsentTokenManager;
use crate::core::emergency::EmergencyAccessAuthorizer;
use crate::core::identity::IdentityRegistry;
use crate::domain::actor::{AccessContext, Principal};
use crate::domain::audit::{AccessType, AuditAction, AuditLogEntry};
use crate::domain::emergency::EmergencyOverride;
use crate::domain::ids::{ConsentCode, PatientRef, TokenId};
use crate::domain::{PassportError, Result};
use std::sync::Arc;

/// One access request through a specific channel
#[derive(Debug, Clone)]
pub enum AccessRequest {
    /// Ordinary privileged view; the caller's generic view privilege is
    /// checked externally
    Regular,
    /// Role-gated emergency override
    Emergency {
        /// Required, non-empty clinical justification
        justification: String,
    },
    /// Patient-authorized consent code
    Consent {
        /// The 6-digit code the patient handed over
        code: ConsentCode,
    },
}

/// Outcome of a granted access request
#[derive(Debug, Clone)]
pub struct AccessGrant {
    /// Channel the access went through
    pub access_type: AccessType,

    /// The one attributable audit entry for this access
    pub audit_entry: AuditLogEntry,

    /// The override record, for emergency access
    pub emergency_override: Option<EmergencyOverride>,

    /// The token the access was attributed to, for consent access
    pub consent_token_id: Option<TokenId>,
}

/// Composes the registry, consent manager, authorizer and ledger behind one
/// entry point
pub struct AccessControlFacade {
    registry: Arc<IdentityRegistry>,
    consents: Arc<ConsentTokenManager>,
    emergency: Arc<EmergencyAccessAuthorizer>,
    ledger: Arc<AccessAuditLedger>,
    consent_policy: ConsentConfig,
}

impl AccessControlFacade {
    /// Create a new facade
    pub fn new(
        registry: Arc<IdentityRegistry>,
        consents: Arc<ConsentTokenManager>,
        emergency: Arc<EmergencyAccessAuthorizer>,
        ledger: Arc<AccessAuditLedger>,
        consent_policy: ConsentConfig,
    ) -> Self {
        Self {
            registry,
            consents,
            emergency,
            ledger,
            consent_policy,
        }
    }

    /// Request access to a patient record
    ///
    /// # Errors
    ///
    /// - Regular: [`PassportError::Storage`] if the audit entry cannot be
    ///   written; no entry means no access.
    /// - Emergency: validation and permission errors from the authorizer; the
    ///   override+audit pair is transactional.
    /// - Consent: [`PassportError::NotFound`] if the patient has no universal
    ///   id, [`PassportError::InvalidConsentToken`] if the code matches no
    ///   active unexpired token, [`PassportError::AuditingFailed`] if the code
    ///   verified but the audit entry could not be written.
    pub async fn request_access(
        &self,
        principal: &dyn Principal,
        patient_ref: &PatientRef,
        request: AccessRequest,
        ctx: &AccessContext,
    ) -> Result<AccessGrant> {
        match request {
            AccessRequest::Regular => self.regular_access(principal, patient_ref, ctx).await,
            AccessRequest::Emergency { justification } => {
                self.emergency_access(principal, patient_ref, &justification, ctx)
                    .await
            }
            AccessRequest::Consent { code } => {
                self.consent_access(principal, patient_ref, &code, ctx).await
            }
        }
    }

    /// Pure capability check passthrough, no side effect
    pub fn has_emergency_access(&self, principal: &dyn Principal) -> bool {
        self.emergency.has_emergency_access(principal)
    }

    async fn regular_access(
        &self,
        principal: &dyn Principal,
        patient_ref: &PatientRef,
        ctx: &AccessContext,
    ) -> Result<AccessGrant> {
        let entry = self
            .ledger
            .record(
                principal.user_ref(),
                patient_ref.clone(),
                AccessType::Regular,
                AuditAction::View,
                "Privileged record view",
                ctx,
            )
            .await?;

        Ok(AccessGrant {
            access_type: AccessType::Regular,
            audit_entry: entry,
            emergency_override: None,
            consent_token_id: None,
        })
    }

    async fn emergency_access(
        &self,
        principal: &dyn Principal,
        patient_ref: &PatientRef,
        justification: &str,
        ctx: &AccessContext,
    ) -> Result<AccessGrant> {
        let (override_record, entry) = self
            .emergency
            .authorize_with_entry(principal, patient_ref, justification, ctx)
            .await?;

        Ok(AccessGrant {
            access_type: AccessType::Emergency,
            audit_entry: entry,
            emergency_override: Some(override_record),
            consent_token_id: None,
        })
    }

    async fn consent_access(
        &self,
        principal: &dyn Principal,
        patient_ref: &PatientRef,
        code: &ConsentCode,
        ctx: &AccessContext,
    ) -> Result<AccessGrant> {
        let identity = self.registry.lookup_by_patient_ref(patient_ref).await?;

        let Some(token) = self
            .consents
            .find_valid(&identity.universal_id, code)
            .await?
        else {
            if self.consent_policy.log_denied_attempts {
                // Best-effort: a failed write here must not mask the denial.
                let denied_details =
                    format!("Consent access denied (code digest {})", code.digest());
                if let Err(e) = self
                    .ledger
                    .record(
                        principal.user_ref(),
                        patient_ref.clone(),
                        AccessType::Consent,
                        AuditAction::View,
                        denied_details,
                        ctx,
                    )
                    .await
                {
                    tracing::error!(error = %e, "Failed to record denied consent attempt");
                }
            }

            return Err(PassportError::InvalidConsentToken(
                "No active, unexpired consent token matches the provided code".to_string(),
            ));
        };

        let entry = self
            .ledger
            .record(
                principal.user_ref(),
                patient_ref.clone(),
                AccessType::Consent,
                AuditAction::View,
                format!("Consent access using token {}", token.token_id),
                ctx,
            )
            .await
            .map_err(|e| {
                PassportError::AuditingFailed(format!(
                    "consent code verified but audit write failed: {e}"
                ))
            })?;

        Ok(AccessGrant {
            access_type: AccessType::Consent,
            audit_entry: entry,
            emergency_override: None,
            consent_token_id: Some(token.token_id),
        })
    }
}
