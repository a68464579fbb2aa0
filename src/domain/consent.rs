//! Consent token model
//!
//! A consent token grants time-boxed, patient-authorized access to a
//! federated record. Tokens start ACTIVE and become EXPIRED (a pure function
//! of time) or REVOKED (explicit); both end states are terminal and there is
//! no reactivation.

use crate::domain::ids::{ConsentCode, TokenId, UniversalId};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// A time-boxed consent token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsentToken {
    /// Token identifier (distinct from the code the patient hands over)
    pub token_id: TokenId,

    /// Universal patient id the token authorizes access to
    pub universal_id: UniversalId,

    /// 6-digit numeric code
    pub code: ConsentCode,

    /// When the token was issued
    pub issued_at: DateTime<Utc>,

    /// When the token expires
    pub expires_at: DateTime<Utc>,

    /// Whether the token is still active (false once revoked or consumed)
    pub active: bool,

    /// User reference of the issuer
    pub issued_by: String,
}

impl ConsentToken {
    /// Creates a new active token expiring `duration_minutes` after `issued_at`
    pub fn new(
        universal_id: UniversalId,
        code: ConsentCode,
        issued_at: DateTime<Utc>,
        duration_minutes: i64,
        issued_by: impl Into<String>,
    ) -> Self {
        Self {
            token_id: TokenId::generate(),
            universal_id,
            code,
            issued_at,
            expires_at: issued_at + Duration::minutes(duration_minutes),
            active: true,
            issued_by: issued_by.into(),
        }
    }

    /// Whether the token has passed its expiry at the given instant
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Whether the token is valid at the given instant
    ///
    /// Valid iff still active and not yet expired. Revocation wins over any
    /// remaining lifetime.
    pub fn is_valid(&self, now: DateTime<Utc>) -> bool {
        self.active && !self.is_expired(now)
    }
}
