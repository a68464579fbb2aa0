//! Append-only access audit ledger
//!
//! Every access event in the system lands here as one immutable entry. The
//! ledger stamps `access_time` itself at write time so callers cannot
//! backdate entries, and it exposes no mutation beyond append.

use crate::adapters::store::traits::{AuditStore, OverrideStore};
use crate::domain::actor::AccessContext;
use crate::domain::audit::{AccessType, AuditAction, AuditLogEntry};
use crate::domain::clock::Clock;
use crate::domain::emergency::EmergencyOverride;
use crate::domain::ids::PatientRef;
use crate::domain::Result;
use std::sync::Arc;

/// Append-only log of access events
pub struct AccessAuditLedger {
    audit: Arc<dyn AuditStore>,
    overrides: Arc<dyn OverrideStore>,
    clock: Arc<dyn Clock>,
}

impl AccessAuditLedger {
    /// Create a new ledger over the given stores
    pub fn new(
        audit: Arc<dyn AuditStore>,
        overrides: Arc<dyn OverrideStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            audit,
            overrides,
            clock,
        }
    }

    /// Build an entry stamped with the ledger's current time
    ///
    /// Used directly where the entry must be written inside someone else's
    /// transaction (the emergency override pair); everyone else goes through
    /// [`record`](Self::record).
    pub fn stamp_entry(
        &self,
        user_ref: &str,
        patient_ref: PatientRef,
        access_type: AccessType,
        action: AuditAction,
        details: impl Into<String>,
        ctx: &AccessContext,
    ) -> AuditLogEntry {
        AuditLogEntry::new(
            user_ref,
            patient_ref,
            access_type,
            action,
            details,
            ctx,
            self.clock.now(),
        )
    }

    /// Append one entry and return it
    ///
    /// # Errors
    ///
    /// Fails only on store failure; there is no validation to fail.
    pub async fn record(
        &self,
        user_ref: &str,
        patient_ref: PatientRef,
        access_type: AccessType,
        action: AuditAction,
        details: impl Into<String>,
        ctx: &AccessContext,
    ) -> Result<AuditLogEntry> {
        let entry = self.stamp_entry(user_ref, patient_ref, access_type, action, details, ctx);

        self.audit.append_entry(&entry).await?;

        tracing::info!(
            user_ref = %entry.user_ref,
            patient_ref = %entry.patient_ref,
            access_type = %entry.access_type,
            action = %entry.action,
            "Access recorded"
        );

        Ok(entry)
    }

    /// Entries for a patient, most recent first, unbounded
    ///
    /// Pagination, if needed, is layered by callers.
    pub async fn query_for_patient(&self, patient_ref: &PatientRef) -> Result<Vec<AuditLogEntry>> {
        self.audit.entries_for_patient(patient_ref).await
    }

    /// All emergency overrides, most recent first
    pub async fn query_emergency_overrides(&self) -> Result<Vec<EmergencyOverride>> {
        self.overrides.all_overrides().await
    }

    /// Emergency overrides for a patient, most recent first
    pub async fn query_emergency_overrides_for_patient(
        &self,
        patient_ref: &PatientRef,
    ) -> Result<Vec<EmergencyOverride>> {
        self.overrides.overrides_for_patient(patient_ref).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::MemoryStore;
    use crate::domain::clock::ManualClock;
    use chrono::{Duration, Utc};

    fn ledger_with_clock(clock: Arc<ManualClock>) -> AccessAuditLedger {
        let store = Arc::new(MemoryStore::new());
        AccessAuditLedger::new(store.clone(), store, clock)
    }

    #[tokio::test]
    async fn test_record_stamps_ledger_time() {
        let start = Utc::now();
        let clock = Arc::new(ManualClock::starting_at(start));
        let ledger = ledger_with_clock(clock.clone());

        clock.advance(Duration::seconds(30));

        let entry = ledger
            .record(
                "dr-a",
                PatientRef::new("mrn-1").unwrap(),
                AccessType::Regular,
                AuditAction::View,
                "chart review",
                &AccessContext::default(),
            )
            .await
            .unwrap();

        assert_eq!(entry.access_time, start + Duration::seconds(30));
    }

    #[tokio::test]
    async fn test_query_for_patient_orders_most_recent_first() {
        let clock = Arc::new(ManualClock::starting_at(Utc::now()));
        let ledger = ledger_with_clock(clock.clone());
        let patient = PatientRef::new("mrn-1").unwrap();

        for details in ["first", "second", "third"] {
            ledger
                .record(
                    "dr-a",
                    patient.clone(),
                    AccessType::Regular,
                    AuditAction::View,
                    details,
                    &AccessContext::default(),
                )
                .await
                .unwrap();
            clock.advance(Duration::seconds(1));
        }

        let entries = ledger.query_for_patient(&patient).await.unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].details, "third");
        assert_eq!(entries[2].details, "first");
    }
}
