//! Universal identity registry
//!
//! Assigns federation-wide patient ids and looks up existing bindings.
//! Candidate ids are drawn from the OS CSPRNG; uniqueness is enforced by the
//! store's native conflict detection, never by pre-checking, so concurrent
//! registrations cannot race past each other.

use crate::adapters::store::traits::{IdentityInsert, IdentityStore};
use crate::core::audit::AccessAuditLedger;
use crate::domain::actor::{AccessContext, Principal};
use crate::domain::audit::{AccessType, AuditAction};
use crate::domain::clock::Clock;
use crate::domain::identity::UniversalIdentity;
use crate::domain::ids::{PatientRef, UniversalId};
use crate::domain::{PassportError, Result};
use rand::rngs::OsRng;
use rand::RngCore;
use std::sync::Arc;

/// Draw a candidate universal id from the OS CSPRNG
///
/// 6 random bytes rendered as 12 uppercase hex characters behind the fixed
/// `PP` prefix.
fn generate_universal_id() -> Result<UniversalId> {
    let mut bytes = [0u8; 6];
    OsRng.fill_bytes(&mut bytes);

    let mut hex = String::with_capacity(12);
    for byte in bytes {
        hex.push_str(&format!("{byte:02X}"));
    }

    UniversalId::new(format!("PP{hex}")).map_err(PassportError::Validation)
}

/// Assigns and resolves universal patient identifiers
pub struct IdentityRegistry {
    store: Arc<dyn IdentityStore>,
    ledger: Arc<AccessAuditLedger>,
    clock: Arc<dyn Clock>,
}

impl IdentityRegistry {
    /// Create a new registry
    pub fn new(
        store: Arc<dyn IdentityStore>,
        ledger: Arc<AccessAuditLedger>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            ledger,
            clock,
        }
    }

    /// Return the existing binding for a local patient, creating one if absent
    ///
    /// Idempotent: repeated calls for the same patient return the same
    /// identity. A fresh binding triggers exactly one audit entry
    /// (regular/create); the idempotent path triggers none.
    ///
    /// # Errors
    ///
    /// - [`PassportError::Storage`] on backing-store failure. An id collision
    ///   is not an error: it triggers a fresh candidate draw.
    /// - [`PassportError::AuditingFailed`] if the binding was written but the
    ///   audit entry could not be.
    pub async fn assign_or_get(
        &self,
        principal: &dyn Principal,
        patient_ref: &PatientRef,
        ctx: &AccessContext,
    ) -> Result<UniversalIdentity> {
        if let Some(existing) = self.store.find_by_patient_ref(patient_ref).await? {
            return Ok(existing);
        }

        loop {
            let candidate = generate_universal_id()?;
            let identity =
                UniversalIdentity::new(candidate, patient_ref.clone(), self.clock.now());

            match self.store.insert_identity(&identity).await? {
                IdentityInsert::Inserted => {
                    tracing::info!(
                        universal_id = %identity.universal_id,
                        patient_ref = %identity.patient_ref,
                        "Universal patient id assigned"
                    );

                    self.ledger
                        .record(
                            principal.user_ref(),
                            patient_ref.clone(),
                            AccessType::Regular,
                            AuditAction::Create,
                            "Universal patient id assigned",
                            ctx,
                        )
                        .await
                        .map_err(|e| {
                            PassportError::AuditingFailed(format!(
                                "identity {} created but audit write failed: {e}",
                                identity.universal_id
                            ))
                        })?;

                    return Ok(identity);
                }
                IdentityInsert::UniversalIdTaken => {
                    tracing::debug!("Candidate universal id collision, redrawing");
                    continue;
                }
                IdentityInsert::PatientAlreadyBound => {
                    // A concurrent registration won the race; return its binding.
                    return self.store.find_by_patient_ref(patient_ref).await?.ok_or_else(|| {
                        PassportError::NotFound(format!(
                            "Identity binding for patient {patient_ref} disappeared during registration"
                        ))
                    });
                }
            }
        }
    }

    /// Resolve a universal id to its binding
    ///
    /// # Errors
    ///
    /// [`PassportError::NotFound`] if the id is unknown.
    pub async fn lookup_by_universal_id(
        &self,
        universal_id: &UniversalId,
    ) -> Result<UniversalIdentity> {
        self.store
            .find_by_universal_id(universal_id)
            .await?
            .ok_or_else(|| {
                PassportError::NotFound(format!("No identity bound to universal id {universal_id}"))
            })
    }

    /// Resolve a local patient to its binding
    ///
    /// # Errors
    ///
    /// [`PassportError::NotFound`] if the patient has no binding yet.
    pub async fn lookup_by_patient_ref(
        &self,
        patient_ref: &PatientRef,
    ) -> Result<UniversalIdentity> {
        self.store
            .find_by_patient_ref(patient_ref)
            .await?
            .ok_or_else(|| {
                PassportError::NotFound(format!(
                    "No universal id assigned to patient {patient_ref}"
                ))
            })
    }
}
