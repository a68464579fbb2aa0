//! Universal identity binding

use crate::domain::ids::{PatientRef, UniversalId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Binding between a universal patient id and one hospital-local patient
///
/// Created once on first registration and immutable thereafter: there is at
/// most one binding per local patient, and each universal id is unique across
/// the federation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UniversalIdentity {
    /// Federation-wide patient identifier
    pub universal_id: UniversalId,

    /// Hospital-local patient reference this id is bound to
    pub patient_ref: PatientRef,

    /// When the binding was created
    pub created_at: DateTime<Utc>,
}

impl UniversalIdentity {
    /// Creates a new identity binding
    pub fn new(universal_id: UniversalId, patient_ref: PatientRef, created_at: DateTime<Utc>) -> Self {
        Self {
            universal_id,
            patient_ref,
            created_at,
        }
    }
}
