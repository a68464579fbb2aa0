//! Row mapping between PostgreSQL and domain types

use crate::domain::audit::{AccessType, AuditAction, AuditLogEntry};
use crate::domain::consent::ConsentToken;
use crate::domain::emergency::EmergencyOverride;
use crate::domain::identity::UniversalIdentity;
use crate::domain::ids::{ConsentCode, PatientRef, TokenId, UniversalId};
use crate::domain::{Result, StoreError};
use chrono::{DateTime, Utc};
use tokio_postgres::Row;
use uuid::Uuid;

fn decode<T>(value: std::result::Result<T, String>, column: &str) -> Result<T> {
    value.map_err(|e| StoreError::DecodeFailed(format!("column {column}: {e}")).into())
}

/// Decode a `universal_identities` row
pub fn identity_from_row(row: &Row) -> Result<UniversalIdentity> {
    let universal_id: String = row.get("universal_id");
    let patient_ref: String = row.get("patient_ref");
    let created_at: DateTime<Utc> = row.get("created_at");

    Ok(UniversalIdentity {
        universal_id: decode(UniversalId::new(universal_id), "universal_id")?,
        patient_ref: decode(PatientRef::new(patient_ref), "patient_ref")?,
        created_at,
    })
}

/// Decode a `consent_tokens` row
pub fn token_from_row(row: &Row) -> Result<ConsentToken> {
    let token_id: String = row.get("token_id");
    let universal_id: String = row.get("universal_id");
    let code: String = row.get("code");
    let issued_at: DateTime<Utc> = row.get("issued_at");
    let expires_at: DateTime<Utc> = row.get("expires_at");
    let active: bool = row.get("active");
    let issued_by: String = row.get("issued_by");

    Ok(ConsentToken {
        token_id: decode(TokenId::new(token_id), "token_id")?,
        universal_id: decode(UniversalId::new(universal_id), "universal_id")?,
        code: decode(ConsentCode::new(code), "code")?,
        issued_at,
        expires_at,
        active,
        issued_by,
    })
}

/// Decode an `emergency_overrides` row
pub fn override_from_row(row: &Row) -> Result<EmergencyOverride> {
    let id: Uuid = row.get("id");
    let requesting_user: String = row.get("requesting_user");
    let patient_ref: String = row.get("patient_ref");
    let justification: String = row.get("justification");
    let ip_address: String = row.get("ip_address");
    let user_agent: String = row.get("user_agent");
    let access_time: DateTime<Utc> = row.get("access_time");

    Ok(EmergencyOverride {
        id,
        requesting_user,
        patient_ref: decode(PatientRef::new(patient_ref), "patient_ref")?,
        justification,
        ip_address,
        user_agent,
        access_time,
    })
}

/// Decode an `audit_log` row
pub fn entry_from_row(row: &Row) -> Result<AuditLogEntry> {
    let id: Uuid = row.get("id");
    let user_ref: String = row.get("user_ref");
    let patient_ref: String = row.get("patient_ref");
    let access_type: String = row.get("access_type");
    let action: String = row.get("action");
    let details: String = row.get("details");
    let access_time: DateTime<Utc> = row.get("access_time");
    let ip_address: String = row.get("ip_address");
    let user_agent: String = row.get("user_agent");

    Ok(AuditLogEntry {
        id,
        user_ref,
        patient_ref: decode(PatientRef::new(patient_ref), "patient_ref")?,
        access_type: decode(access_type.parse::<AccessType>(), "access_type")?,
        action: decode(action.parse::<AuditAction>(), "action")?,
        details,
        access_time,
        ip_address,
        user_agent,
    })
}
