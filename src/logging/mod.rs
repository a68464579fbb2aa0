//! Logging and observability
//!
//! Structured logging via the `tracing` crate: console output always, JSON
//! file logging with rotation when enabled. Consent codes never appear in log
//! output; where a code must be referenced it is logged as a SHA-256 digest.
//!
//! # Example
//!
//! ```no_run
//! use passport::logging::init_logging;
//! use passport::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Service started");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};
