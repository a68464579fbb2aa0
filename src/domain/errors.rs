//! Domain error types
//!
//! This module defines the error hierarchy for the access-control core.
//! All errors are domain-specific and don't expose third-party types.

use thiserror::Error;

/// Main passport error type
///
/// This is the primary error type used throughout the crate. Validation and
/// permission failures always propagate unchanged to the caller; storage
/// failures are wrapped but never silently swallowed.
#[derive(Debug, Error)]
pub enum PassportError {
    /// Input validation errors (empty justification, non-positive duration)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Capability/role check failure
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// Unknown identifier
    #[error("Not found: {0}")]
    NotFound(String),

    /// Consent code did not match any active, unexpired token
    #[error("Invalid consent token: {0}")]
    InvalidConsentToken(String),

    /// Backing-store failure
    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),

    /// Audit-write failure after an already-succeeded sensitive action.
    ///
    /// An unaudited access is a compliance violation; this variant makes the
    /// condition visible to the caller instead of reporting plain success.
    #[error("Auditing failed: {0}")]
    AuditingFailed(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),
}

/// Backing-store errors
///
/// Errors surfaced by store adapters. These don't expose driver types; the
/// PostgreSQL adapter maps SQLSTATE values onto these variants.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Failed to connect to the backing store
    #[error("Failed to connect to store: {0}")]
    ConnectionFailed(String),

    /// Query failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Write failed
    #[error("Write failed: {0}")]
    WriteFailed(String),

    /// Unique constraint violated
    ///
    /// Only the identity registry's generation loop treats this as retryable;
    /// everywhere else it propagates.
    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),

    /// A multi-statement transaction could not be committed
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// Request timeout
    #[error("Request timeout: {0}")]
    Timeout(String),

    /// A stored row could not be decoded into a domain value
    #[error("Failed to decode stored row: {0}")]
    DecodeFailed(String),
}

// Conversion from std::io::Error
impl From<std::io::Error> for PassportError {
    fn from(err: std::io::Error) -> Self {
        PassportError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for PassportError {
    fn from(err: serde_json::Error) -> Self {
        PassportError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for PassportError {
    fn from(err: toml::de::Error) -> Self {
        PassportError::Configuration(format!("TOML parse error: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_passport_error_display() {
        let err = PassportError::Validation("Duration must be positive".to_string());
        assert_eq!(
            err.to_string(),
            "Validation error: Duration must be positive"
        );
    }

    #[test]
    fn test_store_error_conversion() {
        let store_err = StoreError::UniqueViolation("universal_identities_pkey".to_string());
        let err: PassportError = store_err.into();
        assert!(matches!(err, PassportError::Storage(_)));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let err: PassportError = io_err.into();
        assert!(matches!(err, PassportError::Io(_)));
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let err: PassportError = json_err.into();
        assert!(matches!(err, PassportError::Serialization(_)));
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_err = toml::from_str::<toml::Value>("invalid = toml = syntax").unwrap_err();
        let err: PassportError = toml_err.into();
        assert!(matches!(err, PassportError::Configuration(_)));
        assert!(err.to_string().contains("TOML parse error"));
    }

    #[test]
    fn test_errors_implement_std_error() {
        let err = PassportError::PermissionDenied("no emergency capability".to_string());
        let _: &dyn std::error::Error = &err;

        let err = StoreError::Timeout("5 seconds".to_string());
        let _: &dyn std::error::Error = &err;
    }
}
