//! Consent code generation
//!
//! Codes come from the OS CSPRNG. A predictable consent code is a real
//! security defect, not a style choice, so a general-purpose generator is
//! never acceptable here.

use crate::domain::ids::ConsentCode;
use crate::domain::{PassportError, Result};
use rand::rngs::OsRng;
use rand::Rng;

/// Draw a uniformly distributed 6-digit zero-padded code
pub fn generate_consent_code() -> Result<ConsentCode> {
    let n: u32 = OsRng.gen_range(0..1_000_000);
    ConsentCode::new(format!("{n:06}")).map_err(PassportError::Validation)
}
