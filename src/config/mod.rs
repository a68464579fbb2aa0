//! Configuration management.
//!
//! TOML-based configuration loading, parsing and validation, with environment
//! variable substitution (`${VAR_NAME}`), PASSPORT_*-prefixed overrides, and
//! secret protection for credentials.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use passport::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("passport.toml")?;
//! println!("Store backend: {:?}", config.store_target);
//! # Ok(())
//! # }
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

pub use loader::load_config;
pub use schema::{
    ApplicationConfig, ConsentConfig, EmergencyConfig, Environment, LoggingConfig, PassportConfig,
    PostgreSQLConfig, StoreTarget,
};
pub use secret::{secret_string, SecretString, SecretValue};
