//! Domain models and types for the access-control core.
//!
//! This module contains the data model, strongly-typed identifiers, the
//! capability model, and the error hierarchy shared by every service in the
//! crate.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`UniversalId`], [`PatientRef`],
//!   [`TokenId`], [`ConsentCode`])
//! - **Records** ([`UniversalIdentity`], [`ConsentToken`],
//!   [`EmergencyOverride`], [`AuditLogEntry`])
//! - **Capability model** ([`Principal`], [`Capability`], [`CapabilityPolicy`])
//! - **Error types** ([`PassportError`], [`StoreError`]) and the [`Result`]
//!   alias
//!
//! # Type Safety
//!
//! Identifiers use the newtype pattern so hospital-local references and
//! federation-wide ids cannot be mixed up:
//!
//! ```rust
//! use passport::domain::{PatientRef, UniversalId};
//!
//! # fn example() -> Result<(), String> {
//! let universal_id = UniversalId::new("PP0123456789AB")?;
//! let patient_ref = PatientRef::new("mrn-000123")?;
//!
//! // This won't compile - type safety prevents mixing ids
//! // let wrong: UniversalId = patient_ref;  // Compile error!
//! # Ok(())
//! # }
//! ```

pub mod actor;
pub mod audit;
pub mod clock;
pub mod consent;
pub mod emergency;
pub mod errors;
pub mod identity;
pub mod ids;
pub mod result;

// Re-export commonly used types for convenience
pub use actor::{AccessContext, Capability, CapabilityPolicy, Principal, RolePrincipal};
pub use audit::{AccessType, AuditAction, AuditLogEntry};
pub use clock::{Clock, ManualClock, SystemClock};
pub use consent::ConsentToken;
pub use emergency::EmergencyOverride;
pub use errors::{PassportError, StoreError};
pub use identity::UniversalIdentity;
pub use ids::{ConsentCode, PatientRef, TokenId, UniversalId};
pub use result::Result;
