//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::{PassportConfig, StoreTarget};
use crate::config::secret_string;
use crate::domain::errors::PassportError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (`${VAR}` syntax)
/// 3. Parses the TOML into PassportConfig
/// 4. Applies environment variable overrides (PASSPORT_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if the file cannot be read, TOML parsing fails, a
/// referenced environment variable is missing, or validation fails.
///
/// # Examples
///
/// ```no_run
/// use passport::config::load_config;
///
/// let config = load_config("passport.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<PassportConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(PassportError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        PassportError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config: PassportConfig = toml::from_str(&contents)
        .map_err(|e| PassportError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    apply_env_overrides(&mut config);

    config.validate().map_err(|e| {
        PassportError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are left untouched. Missing variables are collected and
/// reported together.
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").unwrap();
    let mut result = String::new();
    let mut missing_vars = Vec::new();

    for line in input.lines() {
        let trimmed = line.trim_start();

        if trimmed.starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{}}}", var_name);
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.contains(&var_name.to_string()) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(PassportError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using the PASSPORT_* prefix
///
/// Variables follow the pattern PASSPORT_<SECTION>_<KEY>, for example
/// PASSPORT_APPLICATION_LOG_LEVEL or PASSPORT_CONSENT_SINGLE_USE.
fn apply_env_overrides(config: &mut PassportConfig) {
    // Application overrides
    if let Ok(val) = std::env::var("PASSPORT_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    // Store target override
    if let Ok(val) = std::env::var("PASSPORT_STORE_TARGET") {
        match val.as_str() {
            "postgresql" => config.store_target = StoreTarget::PostgreSQL,
            "memory" => config.store_target = StoreTarget::Memory,
            other => {
                tracing::warn!(value = other, "Ignoring unknown PASSPORT_STORE_TARGET");
            }
        }
    }

    // PostgreSQL overrides (only if the section is configured)
    if let Some(ref mut pg_config) = config.postgresql {
        if let Ok(val) = std::env::var("PASSPORT_POSTGRESQL_CONNECTION_STRING") {
            pg_config.connection_string = secret_string(val);
        }
        if let Ok(val) = std::env::var("PASSPORT_POSTGRESQL_MAX_CONNECTIONS") {
            if let Ok(size) = val.parse() {
                pg_config.max_connections = size;
            }
        }
        if let Ok(val) = std::env::var("PASSPORT_POSTGRESQL_SSL_MODE") {
            pg_config.ssl_mode = val;
        }
    }

    // Consent overrides
    if let Ok(val) = std::env::var("PASSPORT_CONSENT_SINGLE_USE") {
        config.consent.single_use = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("PASSPORT_CONSENT_LOG_DENIED_ATTEMPTS") {
        config.consent.log_denied_attempts = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("PASSPORT_CONSENT_MAX_DURATION_MINUTES") {
        if let Ok(minutes) = val.parse() {
            config.consent.max_duration_minutes = minutes;
        }
    }

    // Emergency overrides (comma-separated role list)
    if let Ok(val) = std::env::var("PASSPORT_EMERGENCY_ROLES") {
        let roles: Vec<String> = val
            .split(',')
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty())
            .collect();
        if !roles.is_empty() {
            config.emergency.roles = roles;
        }
    }

    // Logging overrides
    if let Ok(val) = std::env::var("PASSPORT_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("PASSPORT_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
}
