//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for passport using clap.
//! The CLI is the reference composing surface for the core: a web or FHIR
//! gateway wires the same services through [`crate::core::PassportCore`].

pub mod commands;

use clap::{Parser, Subcommand};

/// Passport - federated patient identity and access control
#[derive(Parser, Debug)]
#[command(name = "passport")]
#[command(version, about, long_about = None)]
#[command(author = "Passport Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "passport.toml", env = "PASSPORT_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "PASSPORT_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a new configuration file
    Init(commands::init::InitArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Show store connectivity and record counts
    Status(commands::status::StatusArgs),

    /// Assign (or return) the universal id for a local patient
    Register(commands::register::RegisterArgs),

    /// Issue a consent token for a universal id
    GrantConsent(commands::consent::GrantConsentArgs),

    /// Revoke a consent token
    RevokeConsent(commands::consent::RevokeConsentArgs),

    /// Query the audit trail for a patient
    Audit(commands::audit::AuditArgs),
}
