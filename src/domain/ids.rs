//! Domain identifier types with validation
//!
//! Newtype wrappers for the identifiers that flow through the access-control
//! core. Each type validates its format on construction so malformed ids
//! cannot cross module boundaries.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

static UNIVERSAL_ID_RE: OnceLock<Regex> = OnceLock::new();

fn universal_id_re() -> &'static Regex {
    UNIVERSAL_ID_RE.get_or_init(|| Regex::new(r"^PP[0-9A-F]{12}$").unwrap())
}

/// Universal patient identifier newtype wrapper
///
/// A federation-wide patient id, stable across hospitals and distinct from any
/// hospital-local id. Format: `PP` followed by 12 uppercase hex characters.
///
/// # Examples
///
/// ```
/// use passport::domain::ids::UniversalId;
/// use std::str::FromStr;
///
/// let id = UniversalId::from_str("PP0123456789AB").unwrap();
/// assert_eq!(id.as_str(), "PP0123456789AB");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UniversalId(String);

impl UniversalId {
    /// Creates a new UniversalId from a string
    ///
    /// # Returns
    ///
    /// Returns `Ok(UniversalId)` if the id matches `PP` + 12 uppercase hex
    /// characters, `Err` otherwise
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if !universal_id_re().is_match(&id) {
            return Err(format!(
                "Invalid universal patient id '{}'. Expected format: PP followed by 12 uppercase hex characters",
                id
            ));
        }
        Ok(Self(id))
    }

    /// Returns the id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for UniversalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for UniversalId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for UniversalId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Hospital-local patient reference newtype wrapper
///
/// Identifies a patient within one hospital's own record system (an MRN, a
/// UUID, whatever the local system uses). Opaque to the federation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PatientRef(String);

impl PatientRef {
    /// Creates a new PatientRef from a string
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err("Patient reference cannot be empty".to_string());
        }
        Ok(Self(id))
    }

    /// Returns the reference as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for PatientRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PatientRef {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for PatientRef {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Consent token identifier newtype wrapper
///
/// Identifies one issued consent token, independent of the numeric code the
/// patient hands over. UUID format.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TokenId(String);

impl TokenId {
    /// Creates a new TokenId from a string
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err("Token id cannot be empty".to_string());
        }
        Ok(Self(id))
    }

    /// Generates a fresh random token id
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Returns the id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TokenId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for TokenId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Consent code newtype wrapper
///
/// The 6-digit zero-padded numeric code a patient reads out to authorize
/// access. Treated as a credential: no Display impl, redacted Debug, and only
/// the SHA-256 digest ever reaches audit details or log output.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConsentCode(String);

impl ConsentCode {
    /// Creates a new ConsentCode from a string
    ///
    /// # Returns
    ///
    /// Returns `Ok(ConsentCode)` if the code is exactly 6 ASCII digits,
    /// `Err` otherwise
    pub fn new(code: impl Into<String>) -> Result<Self, String> {
        let code = code.into();
        if code.len() != 6 || !code.chars().all(|c| c.is_ascii_digit()) {
            return Err("Consent code must be exactly 6 digits".to_string());
        }
        Ok(Self(code))
    }

    /// Returns the code as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// SHA-256 digest of the code for audit details and logs
    pub fn digest(&self) -> String {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(self.0.as_bytes());
        format!("{:x}", hasher.finalize())
    }
}

impl fmt::Debug for ConsentCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ConsentCode(REDACTED)")
    }
}

impl FromStr for ConsentCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}
