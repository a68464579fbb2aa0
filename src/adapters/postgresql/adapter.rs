//! PostgreSQL adapter implementing the store traits

use crate::adapters::postgresql::client::{map_pg_error, PostgreSQLClient};
use crate::adapters::postgresql::models::{
    entry_from_row, identity_from_row, override_from_row, token_from_row,
};
use crate::adapters::store::traits::{
    AuditStore, ConsentStore, IdentityInsert, IdentityStore, OverrideStore, StoreLifecycle,
};
use crate::domain::audit::AuditLogEntry;
use crate::domain::consent::ConsentToken;
use crate::domain::emergency::EmergencyOverride;
use crate::domain::identity::UniversalIdentity;
use crate::domain::ids::{PatientRef, TokenId, UniversalId};
use crate::domain::{PassportError, Result, StoreError};
use async_trait::async_trait;
use std::sync::Arc;

/// PostgreSQL implementation of the store traits
///
/// Wraps the pooled client; one adapter instance backs all trait handles so
/// every service shares the same pool.
pub struct PostgreSQLStore {
    client: Arc<PostgreSQLClient>,
}

impl PostgreSQLStore {
    /// Create a new adapter
    pub fn new(client: PostgreSQLClient) -> Self {
        Self {
            client: Arc::new(client),
        }
    }

    /// Create a new adapter with an Arc-wrapped client
    pub fn new_with_arc(client: Arc<PostgreSQLClient>) -> Self {
        Self { client }
    }

    async fn count(&self, table: &str) -> Result<u64> {
        // Table names come from the fixed call sites below, never from input.
        let rows = self
            .client
            .query(&format!("SELECT COUNT(*) FROM {table}"), &[])
            .await?;
        let count: i64 = rows
            .first()
            .map(|row| row.get(0))
            .ok_or_else(|| StoreError::QueryFailed(format!("COUNT returned no rows for {table}")))?;
        Ok(count as u64)
    }
}

#[async_trait]
impl StoreLifecycle for PostgreSQLStore {
    async fn test_connection(&self) -> Result<()> {
        self.client.test_connection().await
    }

    async fn ensure_schema(&self) -> Result<()> {
        self.client.ensure_schema().await
    }

    fn backend_name(&self) -> &str {
        "postgresql"
    }
}

#[async_trait]
impl IdentityStore for PostgreSQLStore {
    async fn insert_identity(&self, identity: &UniversalIdentity) -> Result<IdentityInsert> {
        let insert = r#"
            INSERT INTO universal_identities (universal_id, patient_ref, created_at)
            VALUES ($1, $2, $3)
        "#;

        let result = self
            .client
            .execute(
                insert,
                &[
                    &identity.universal_id.as_str(),
                    &identity.patient_ref.as_str(),
                    &identity.created_at,
                ],
            )
            .await;

        match result {
            Ok(_) => Ok(IdentityInsert::Inserted),
            Err(PassportError::Storage(StoreError::UniqueViolation(constraint))) => {
                if constraint.contains("patient_ref") {
                    Ok(IdentityInsert::PatientAlreadyBound)
                } else {
                    Ok(IdentityInsert::UniversalIdTaken)
                }
            }
            Err(e) => Err(e),
        }
    }

    async fn find_by_patient_ref(
        &self,
        patient_ref: &PatientRef,
    ) -> Result<Option<UniversalIdentity>> {
        let rows = self
            .client
            .query(
                "SELECT * FROM universal_identities WHERE patient_ref = $1",
                &[&patient_ref.as_str()],
            )
            .await?;

        rows.first().map(identity_from_row).transpose()
    }

    async fn find_by_universal_id(
        &self,
        universal_id: &UniversalId,
    ) -> Result<Option<UniversalIdentity>> {
        let rows = self
            .client
            .query(
                "SELECT * FROM universal_identities WHERE universal_id = $1",
                &[&universal_id.as_str()],
            )
            .await?;

        rows.first().map(identity_from_row).transpose()
    }

    async fn count_identities(&self) -> Result<u64> {
        self.count("universal_identities").await
    }
}

#[async_trait]
impl ConsentStore for PostgreSQLStore {
    async fn insert_token(&self, token: &ConsentToken) -> Result<()> {
        let insert = r#"
            INSERT INTO consent_tokens (
                token_id, universal_id, code, issued_at, expires_at, active, issued_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
        "#;

        self.client
            .execute(
                insert,
                &[
                    &token.token_id.as_str(),
                    &token.universal_id.as_str(),
                    &token.code.as_str(),
                    &token.issued_at,
                    &token.expires_at,
                    &token.active,
                    &token.issued_by,
                ],
            )
            .await?;

        Ok(())
    }

    async fn find_token(&self, token_id: &TokenId) -> Result<Option<ConsentToken>> {
        let rows = self
            .client
            .query(
                "SELECT * FROM consent_tokens WHERE token_id = $1",
                &[&token_id.as_str()],
            )
            .await?;

        rows.first().map(token_from_row).transpose()
    }

    async fn tokens_for_identity(&self, universal_id: &UniversalId) -> Result<Vec<ConsentToken>> {
        let rows = self
            .client
            .query(
                "SELECT * FROM consent_tokens WHERE universal_id = $1 ORDER BY issued_at DESC",
                &[&universal_id.as_str()],
            )
            .await?;

        rows.iter().map(token_from_row).collect()
    }

    async fn deactivate_token(&self, token_id: &TokenId) -> Result<bool> {
        let affected = self
            .client
            .execute(
                "UPDATE consent_tokens SET active = FALSE WHERE token_id = $1",
                &[&token_id.as_str()],
            )
            .await?;

        Ok(affected > 0)
    }

    async fn count_tokens(&self) -> Result<u64> {
        self.count("consent_tokens").await
    }
}

#[async_trait]
impl AuditStore for PostgreSQLStore {
    async fn append_entry(&self, entry: &AuditLogEntry) -> Result<()> {
        let insert = r#"
            INSERT INTO audit_log (
                id, user_ref, patient_ref, access_type, action, details,
                access_time, ip_address, user_agent
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        "#;

        self.client
            .execute(
                insert,
                &[
                    &entry.id,
                    &entry.user_ref,
                    &entry.patient_ref.as_str(),
                    &entry.access_type.as_str(),
                    &entry.action.as_str(),
                    &entry.details,
                    &entry.access_time,
                    &entry.ip_address,
                    &entry.user_agent,
                ],
            )
            .await?;

        Ok(())
    }

    async fn entries_for_patient(&self, patient_ref: &PatientRef) -> Result<Vec<AuditLogEntry>> {
        let rows = self
            .client
            .query(
                "SELECT * FROM audit_log WHERE patient_ref = $1 ORDER BY access_time DESC",
                &[&patient_ref.as_str()],
            )
            .await?;

        rows.iter().map(entry_from_row).collect()
    }

    async fn count_entries(&self) -> Result<u64> {
        self.count("audit_log").await
    }
}

#[async_trait]
impl OverrideStore for PostgreSQLStore {
    async fn insert_override_with_entry(
        &self,
        override_record: &EmergencyOverride,
        entry: &AuditLogEntry,
    ) -> Result<()> {
        let mut conn = self.client.get_connection().await?;
        let tx = conn.transaction().await.map_err(map_pg_error)?;

        let insert_override = r#"
            INSERT INTO emergency_overrides (
                id, requesting_user, patient_ref, justification,
                ip_address, user_agent, access_time
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
        "#;

        tx.execute(
            insert_override,
            &[
                &override_record.id,
                &override_record.requesting_user,
                &override_record.patient_ref.as_str(),
                &override_record.justification,
                &override_record.ip_address,
                &override_record.user_agent,
                &override_record.access_time,
            ],
        )
        .await
        .map_err(map_pg_error)?;

        let insert_entry = r#"
            INSERT INTO audit_log (
                id, user_ref, patient_ref, access_type, action, details,
                access_time, ip_address, user_agent
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        "#;

        tx.execute(
            insert_entry,
            &[
                &entry.id,
                &entry.user_ref,
                &entry.patient_ref.as_str(),
                &entry.access_type.as_str(),
                &entry.action.as_str(),
                &entry.details,
                &entry.access_time,
                &entry.ip_address,
                &entry.user_agent,
            ],
        )
        .await
        .map_err(map_pg_error)?;

        tx.commit()
            .await
            .map_err(|e| StoreError::TransactionFailed(e.to_string()))?;

        Ok(())
    }

    async fn all_overrides(&self) -> Result<Vec<EmergencyOverride>> {
        let rows = self
            .client
            .query(
                "SELECT * FROM emergency_overrides ORDER BY access_time DESC",
                &[],
            )
            .await?;

        rows.iter().map(override_from_row).collect()
    }

    async fn overrides_for_patient(
        &self,
        patient_ref: &PatientRef,
    ) -> Result<Vec<EmergencyOverride>> {
        let rows = self
            .client
            .query(
                "SELECT * FROM emergency_overrides WHERE patient_ref = $1 ORDER BY access_time DESC",
                &[&patient_ref.as_str()],
            )
            .await?;

        rows.iter().map(override_from_row).collect()
    }

    async fn count_overrides(&self) -> Result<u64> {
        self.count("emergency_overrides").await
    }
}
