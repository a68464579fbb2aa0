//! Result type alias for passport operations

use crate::domain::errors::PassportError;

/// Result type used throughout the crate
pub type Result<T> = std::result::Result<T, PassportError>;
