//! Store abstraction traits
//!
//! This module defines the traits that store backends must implement. The
//! services never see a concrete backend: everything is injected as an Arc'd
//! trait object built by the factory, and the lifecycle (schema bootstrap,
//! connectivity probe) is owned by the composing process.

use crate::domain::audit::AuditLogEntry;
use crate::domain::consent::ConsentToken;
use crate::domain::emergency::EmergencyOverride;
use crate::domain::identity::UniversalIdentity;
use crate::domain::ids::{PatientRef, TokenId, UniversalId};
use crate::domain::Result;
use async_trait::async_trait;

/// Outcome of attempting to persist a new identity binding
///
/// The registry's generation loop decides what to do from this value alone:
/// a taken universal id means redraw, an already-bound patient means another
/// caller won the race and the existing binding should be returned. Backends
/// report conflicts through their native uniqueness constraints, never by
/// pre-checking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityInsert {
    /// The binding was written
    Inserted,
    /// The candidate universal id is already in use
    UniversalIdTaken,
    /// The local patient already has a binding
    PatientAlreadyBound,
}

/// Store lifecycle operations
///
/// Owned by the composing process (CLI, service host); the core services
/// assume the schema exists.
#[async_trait]
pub trait StoreLifecycle: Send + Sync {
    /// Test connectivity to the backing store
    ///
    /// # Errors
    ///
    /// Returns an error if the connection test fails.
    async fn test_connection(&self) -> Result<()>;

    /// Ensure the schema exists, creating it if necessary
    ///
    /// # Errors
    ///
    /// Returns an error if the schema cannot be created or accessed.
    async fn ensure_schema(&self) -> Result<()>;

    /// Short backend name for logs and the status command
    fn backend_name(&self) -> &str;
}

/// Universal identity storage
#[async_trait]
pub trait IdentityStore: Send + Sync {
    /// Attempt to persist a new binding
    ///
    /// The uniqueness check and the write must be one atomically-applied
    /// unit against the backing store: two concurrent inserts for distinct
    /// patients must never both succeed with the same universal id.
    ///
    /// # Errors
    ///
    /// Returns an error only on store failure; conflicts are reported
    /// through [`IdentityInsert`], not as errors.
    async fn insert_identity(&self, identity: &UniversalIdentity) -> Result<IdentityInsert>;

    /// Look up the binding for a local patient
    async fn find_by_patient_ref(
        &self,
        patient_ref: &PatientRef,
    ) -> Result<Option<UniversalIdentity>>;

    /// Look up the binding for a universal id
    async fn find_by_universal_id(
        &self,
        universal_id: &UniversalId,
    ) -> Result<Option<UniversalIdentity>>;

    /// Number of bindings in the store
    async fn count_identities(&self) -> Result<u64>;
}

/// Consent token storage
#[async_trait]
pub trait ConsentStore: Send + Sync {
    /// Persist a newly issued token
    async fn insert_token(&self, token: &ConsentToken) -> Result<()>;

    /// Look up a token by id
    async fn find_token(&self, token_id: &TokenId) -> Result<Option<ConsentToken>>;

    /// All tokens issued for a universal id, newest first
    ///
    /// Includes expired and revoked tokens; validity is the manager's call.
    async fn tokens_for_identity(&self, universal_id: &UniversalId) -> Result<Vec<ConsentToken>>;

    /// Set a token inactive
    ///
    /// Idempotent. Returns whether a token with that id exists.
    async fn deactivate_token(&self, token_id: &TokenId) -> Result<bool>;

    /// Number of tokens in the store
    async fn count_tokens(&self) -> Result<u64>;
}

/// Append-only audit entry storage
///
/// There is deliberately no update or delete operation on this trait.
#[async_trait]
pub trait AuditStore: Send + Sync {
    /// Append one entry
    async fn append_entry(&self, entry: &AuditLogEntry) -> Result<()>;

    /// Entries for a patient, most recent first, unbounded
    async fn entries_for_patient(&self, patient_ref: &PatientRef) -> Result<Vec<AuditLogEntry>>;

    /// Number of entries in the store
    async fn count_entries(&self) -> Result<u64>;
}

/// Emergency override storage
#[async_trait]
pub trait OverrideStore: Send + Sync {
    /// Persist an override together with its audit entry
    ///
    /// Both writes share one transaction boundary: a failure between them
    /// must never leave a partial record observable. An unaudited emergency
    /// access must not occur.
    async fn insert_override_with_entry(
        &self,
        override_record: &EmergencyOverride,
        entry: &AuditLogEntry,
    ) -> Result<()>;

    /// All overrides, most recent first
    async fn all_overrides(&self) -> Result<Vec<EmergencyOverride>>;

    /// Overrides for a patient, most recent first
    async fn overrides_for_patient(
        &self,
        patient_ref: &PatientRef,
    ) -> Result<Vec<EmergencyOverride>>;

    /// Number of overrides in the store
    async fn count_overrides(&self) -> Result<u64>;
}
