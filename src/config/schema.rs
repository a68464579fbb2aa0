//! Configuration schema types
//!
//! This module defines the configuration structure mapped from the TOML file.

use crate::config::SecretString;
use crate::domain::actor::CapabilityPolicy;
use serde::{Deserialize, Serialize};

/// Store backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreTarget {
    /// PostgreSQL database
    PostgreSQL,
    /// In-memory store (development and tests)
    Memory,
}

/// Runtime environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Development environment
    #[default]
    Development,
    /// Staging environment
    Staging,
    /// Production environment
    Production,
}

/// Main passport configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PassportConfig {
    /// Application-level settings
    pub application: ApplicationConfig,

    /// Runtime environment (development, staging, production)
    #[serde(default)]
    pub environment: Environment,

    /// Store backend (postgresql or memory)
    pub store_target: StoreTarget,

    /// PostgreSQL configuration (required if store_target = postgresql)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postgresql: Option<PostgreSQLConfig>,

    /// Consent token policy
    #[serde(default)]
    pub consent: ConsentConfig,

    /// Emergency access policy
    #[serde(default)]
    pub emergency: EmergencyConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl PassportConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;

        match self.store_target {
            StoreTarget::PostgreSQL => {
                if let Some(ref config) = self.postgresql {
                    config.validate()?;
                } else {
                    return Err(
                        "postgresql configuration is required when store_target = 'postgresql'"
                            .to_string(),
                    );
                }
            }
            StoreTarget::Memory => {
                if self.environment == Environment::Production {
                    return Err(
                        "store_target = 'memory' is not valid in the production environment"
                            .to_string(),
                    );
                }
            }
        }

        self.consent.validate()?;
        self.emergency.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Consent token policy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsentConfig {
    /// Deactivate a token after its first successful verification
    #[serde(default)]
    pub single_use: bool,

    /// Record an audit entry for failed consent verifications
    #[serde(default)]
    pub log_denied_attempts: bool,

    /// Upper bound on requested token lifetime
    #[serde(default = "default_max_duration_minutes")]
    pub max_duration_minutes: i64,
}

impl ConsentConfig {
    fn validate(&self) -> Result<(), String> {
        if self.max_duration_minutes <= 0 {
            return Err(format!(
                "consent.max_duration_minutes must be positive, got {}",
                self.max_duration_minutes
            ));
        }
        Ok(())
    }
}

impl Default for ConsentConfig {
    fn default() -> Self {
        Self {
            single_use: false,
            log_denied_attempts: false,
            max_duration_minutes: default_max_duration_minutes(),
        }
    }
}

/// Emergency access policy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmergencyConfig {
    /// Roles that grant the emergency-access capability
    #[serde(default = "default_emergency_roles")]
    pub roles: Vec<String>,
}

impl EmergencyConfig {
    fn validate(&self) -> Result<(), String> {
        if self.roles.is_empty() {
            return Err("emergency.roles must not be empty".to_string());
        }
        Ok(())
    }

    /// The capability policy configured by this section
    pub fn capability_policy(&self) -> CapabilityPolicy {
        CapabilityPolicy {
            emergency_access_roles: self.roles.clone(),
        }
    }
}

impl Default for EmergencyConfig {
    fn default() -> Self {
        Self {
            roles: default_emergency_roles(),
        }
    }
}

/// PostgreSQL configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostgreSQLConfig {
    /// Connection string (protected; use ${VAR} substitution for the password)
    pub connection_string: SecretString,

    /// Maximum connections in the pool
    #[serde(default = "default_max_connections")]
    pub max_connections: usize,

    /// Timeout for acquiring a connection
    #[serde(default = "default_connection_timeout")]
    pub connection_timeout_seconds: u64,

    /// Timeout for SQL statement execution
    #[serde(default = "default_statement_timeout")]
    pub statement_timeout_seconds: u64,

    /// SSL mode: disable | require
    #[serde(default = "default_ssl_mode")]
    pub ssl_mode: String,
}

impl PostgreSQLConfig {
    fn validate(&self) -> Result<(), String> {
        use secrecy::ExposeSecret;

        if self.connection_string.expose_secret().is_empty() {
            return Err("postgresql.connection_string must not be empty".to_string());
        }
        if self.max_connections == 0 || self.max_connections > 100 {
            return Err(format!(
                "postgresql.max_connections must be between 1 and 100, got {}",
                self.max_connections
            ));
        }
        let valid_modes = ["disable", "require"];
        if !valid_modes.contains(&self.ssl_mode.as_str()) {
            return Err(format!(
                "Invalid postgresql.ssl_mode '{}'. Must be one of: {}",
                self.ssl_mode,
                valid_modes.join(", ")
            ));
        }
        Ok(())
    }

    /// Whether connections must use TLS
    pub fn tls_required(&self) -> bool {
        self.ssl_mode == "require"
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Local log directory
    #[serde(default = "default_log_path")]
    pub local_path: String,

    /// Log rotation (daily or hourly)
    #[serde(default = "default_log_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_log_path(),
            local_rotation: default_log_rotation(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_duration_minutes() -> i64 {
    1440
}

fn default_emergency_roles() -> Vec<String> {
    vec![
        "Emergency Doctor".to_string(),
        "Emergency Nurse".to_string(),
        "System Administrator".to_string(),
    ]
}

fn default_max_connections() -> usize {
    16
}

fn default_connection_timeout() -> u64 {
    30
}

fn default_statement_timeout() -> u64 {
    60
}

fn default_ssl_mode() -> String {
    "disable".to_string()
}

fn default_log_path() -> String {
    "logs".to_string()
}

fn default_log_rotation() -> String {
    "daily".to_string()
}
