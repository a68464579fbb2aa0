//! In-memory store backend
//!
//! Backs `store_target = "memory"` and the test suite. All maps live behind
//! one RwLock so the same atomicity contracts hold as for the transactional
//! backends: identity insert checks and writes under a single write lock, and
//! the override+audit pair lands in one critical section.

use crate::adapters::store::traits::{
    AuditStore, ConsentStore, IdentityInsert, IdentityStore, OverrideStore, StoreLifecycle,
};
use crate::domain::audit::AuditLogEntry;
use crate::domain::consent::ConsentToken;
use crate::domain::emergency::EmergencyOverride;
use crate::domain::identity::UniversalIdentity;
use crate::domain::ids::{PatientRef, TokenId, UniversalId};
use crate::domain::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Default)]
struct Inner {
    /// Keyed by universal id
    identities: HashMap<UniversalId, UniversalIdentity>,
    /// Reverse index: local patient -> universal id
    by_patient: HashMap<PatientRef, UniversalId>,
    /// Keyed by token id
    tokens: HashMap<TokenId, ConsentToken>,
    /// Insertion order; queries sort by access_time
    overrides: Vec<EmergencyOverride>,
    audit: Vec<AuditLogEntry>,
}

/// In-memory implementation of all store traits
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StoreLifecycle for MemoryStore {
    async fn test_connection(&self) -> Result<()> {
        Ok(())
    }

    async fn ensure_schema(&self) -> Result<()> {
        Ok(())
    }

    fn backend_name(&self) -> &str {
        "memory"
    }
}

#[async_trait]
impl IdentityStore for MemoryStore {
    async fn insert_identity(&self, identity: &UniversalIdentity) -> Result<IdentityInsert> {
        let mut inner = self.inner.write().await;

        if inner.by_patient.contains_key(&identity.patient_ref) {
            return Ok(IdentityInsert::PatientAlreadyBound);
        }
        if inner.identities.contains_key(&identity.universal_id) {
            return Ok(IdentityInsert::UniversalIdTaken);
        }

        inner
            .by_patient
            .insert(identity.patient_ref.clone(), identity.universal_id.clone());
        inner
            .identities
            .insert(identity.universal_id.clone(), identity.clone());
        Ok(IdentityInsert::Inserted)
    }

    async fn find_by_patient_ref(
        &self,
        patient_ref: &PatientRef,
    ) -> Result<Option<UniversalIdentity>> {
        let inner = self.inner.read().await;
        Ok(inner
            .by_patient
            .get(patient_ref)
            .and_then(|id| inner.identities.get(id))
            .cloned())
    }

    async fn find_by_universal_id(
        &self,
        universal_id: &UniversalId,
    ) -> Result<Option<UniversalIdentity>> {
        let inner = self.inner.read().await;
        Ok(inner.identities.get(universal_id).cloned())
    }

    async fn count_identities(&self) -> Result<u64> {
        let inner = self.inner.read().await;
        Ok(inner.identities.len() as u64)
    }
}

#[async_trait]
impl ConsentStore for MemoryStore {
    async fn insert_token(&self, token: &ConsentToken) -> Result<()> {
        let mut inner = self.inner.write().await;
        inner.tokens.insert(token.token_id.clone(), token.clone());
        Ok(())
    }

    async fn find_token(&self, token_id: &TokenId) -> Result<Option<ConsentToken>> {
        let inner = self.inner.read().await;
        Ok(inner.tokens.get(token_id).cloned())
    }

    async fn tokens_for_identity(&self, universal_id: &UniversalId) -> Result<Vec<ConsentToken>> {
        let inner = self.inner.read().await;
        let mut tokens: Vec<ConsentToken> = inner
            .tokens
            .values()
            .filter(|t| &t.universal_id == universal_id)
            .cloned()
            .collect();
        tokens.sort_by(|a, b| b.issued_at.cmp(&a.issued_at));
        Ok(tokens)
    }

    async fn deactivate_token(&self, token_id: &TokenId) -> Result<bool> {
        let mut inner = self.inner.write().await;
        match inner.tokens.get_mut(token_id) {
            Some(token) => {
                token.active = false;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn count_tokens(&self) -> Result<u64> {
        let inner = self.inner.read().await;
        Ok(inner.tokens.len() as u64)
    }
}

#[async_trait]
impl AuditStore for MemoryStore {
    async fn append_entry(&self, entry: &AuditLogEntry) -> Result<()> {
        let mut inner = self.inner.write().await;
        inner.audit.push(entry.clone());
        Ok(())
    }

    async fn entries_for_patient(&self, patient_ref: &PatientRef) -> Result<Vec<AuditLogEntry>> {
        let inner = self.inner.read().await;
        let mut entries: Vec<AuditLogEntry> = inner
            .audit
            .iter()
            .filter(|e| &e.patient_ref == patient_ref)
            .cloned()
            .collect();
        entries.sort_by(|a, b| b.access_time.cmp(&a.access_time));
        Ok(entries)
    }

    async fn count_entries(&self) -> Result<u64> {
        let inner = self.inner.read().await;
        Ok(inner.audit.len() as u64)
    }
}

#[async_trait]
impl OverrideStore for MemoryStore {
    async fn insert_override_with_entry(
        &self,
        override_record: &EmergencyOverride,
        entry: &AuditLogEntry,
    ) -> Result<()> {
        // Single critical section stands in for the transaction boundary.
        let mut inner = self.inner.write().await;
        inner.overrides.push(override_record.clone());
        inner.audit.push(entry.clone());
        Ok(())
    }

    async fn all_overrides(&self) -> Result<Vec<EmergencyOverride>> {
        let inner = self.inner.read().await;
        let mut overrides = inner.overrides.clone();
        overrides.sort_by(|a, b| b.access_time.cmp(&a.access_time));
        Ok(overrides)
    }

    async fn overrides_for_patient(
        &self,
        patient_ref: &PatientRef,
    ) -> Result<Vec<EmergencyOverride>> {
        let inner = self.inner.read().await;
        let mut overrides: Vec<EmergencyOverride> = inner
            .overrides
            .iter()
            .filter(|o| &o.patient_ref == patient_ref)
            .cloned()
            .collect();
        overrides.sort_by(|a, b| b.access_time.cmp(&a.access_time));
        Ok(overrides)
    }

    async fn count_overrides(&self) -> Result<u64> {
        let inner = self.inner.read().await;
        Ok(inner.overrides.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::actor::AccessContext;
    use crate::domain::audit::{AccessType, AuditAction};
    use crate::domain::ids::ConsentCode;
    use chrono::{Duration, Utc};

    fn identity(universal_id: &str, patient_ref: &str) -> UniversalIdentity {
        UniversalIdentity::new(
            UniversalId::new(universal_id).unwrap(),
            PatientRef::new(patient_ref).unwrap(),
            Utc::now(),
        )
    }

    #[tokio::test]
    async fn test_insert_identity_detects_taken_universal_id() {
        let store = MemoryStore::new();
        let first = identity("PP000000000001", "mrn-1");
        assert_eq!(
            store.insert_identity(&first).await.unwrap(),
            IdentityInsert::Inserted
        );

        let clash = identity("PP000000000001", "mrn-2");
        assert_eq!(
            store.insert_identity(&clash).await.unwrap(),
            IdentityInsert::UniversalIdTaken
        );
    }

    #[tokio::test]
    async fn test_insert_identity_detects_bound_patient() {
        let store = MemoryStore::new();
        let first = identity("PP000000000001", "mrn-1");
        store.insert_identity(&first).await.unwrap();

        let rebind = identity("PP000000000002", "mrn-1");
        assert_eq!(
            store.insert_identity(&rebind).await.unwrap(),
            IdentityInsert::PatientAlreadyBound
        );
        assert_eq!(store.count_identities().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_deactivate_token_is_idempotent() {
        let store = MemoryStore::new();
        let token = ConsentToken::new(
            UniversalId::new("PP000000000001").unwrap(),
            ConsentCode::new("123456").unwrap(),
            Utc::now(),
            5,
            "dr-a",
        );
        store.insert_token(&token).await.unwrap();

        assert!(store.deactivate_token(&token.token_id).await.unwrap());
        assert!(store.deactivate_token(&token.token_id).await.unwrap());
        assert!(!store
            .find_token(&token.token_id)
            .await
            .unwrap()
            .unwrap()
            .active);

        let unknown = TokenId::generate();
        assert!(!store.deactivate_token(&unknown).await.unwrap());
    }

    #[tokio::test]
    async fn test_audit_entries_most_recent_first() {
        let store = MemoryStore::new();
        let patient = PatientRef::new("mrn-1").unwrap();
        let ctx = AccessContext::default();
        let base = Utc::now();

        for offset in [0, 2, 1] {
            let entry = AuditLogEntry::new(
                "dr-a",
                patient.clone(),
                AccessType::Regular,
                AuditAction::View,
                format!("entry {offset}"),
                &ctx,
                base + Duration::seconds(offset),
            );
            store.append_entry(&entry).await.unwrap();
        }

        let entries = store.entries_for_patient(&patient).await.unwrap();
        assert_eq!(entries.len(), 3);
        assert!(entries[0].access_time >= entries[1].access_time);
        assert!(entries[1].access_time >= entries[2].access_time);
    }

    #[tokio::test]
    async fn test_override_pair_lands_together() {
        let store = MemoryStore::new();
        let patient = PatientRef::new("mrn-1").unwrap();
        let ctx = AccessContext::default();
        let now = Utc::now();

        let override_record =
            EmergencyOverride::new("dr-a", patient.clone(), "crash cart", &ctx, now);
        let entry = AuditLogEntry::new(
            "dr-a",
            patient.clone(),
            AccessType::Emergency,
            AuditAction::View,
            "Emergency override: crash cart",
            &ctx,
            now,
        );

        store
            .insert_override_with_entry(&override_record, &entry)
            .await
            .unwrap();

        assert_eq!(store.count_overrides().await.unwrap(), 1);
        assert_eq!(store.count_entries().await.unwrap(), 1);
        assert_eq!(
            store.overrides_for_patient(&patient).await.unwrap().len(),
            1
        );
    }
}
