//! Store factory
//!
//! Builds the backend selected by configuration and hands out Arc'd trait
//! objects that all share one underlying adapter (and, for PostgreSQL, one
//! connection pool).

use crate::adapters::memory::MemoryStore;
use crate::adapters::postgresql::{PostgreSQLClient, PostgreSQLStore};
use crate::adapters::store::traits::{
    AuditStore, ConsentStore, IdentityStore, OverrideStore, StoreLifecycle,
};
use crate::config::schema::{PassportConfig, StoreTarget};
use crate::domain::{PassportError, Result};
use std::sync::Arc;

/// Trait-object handles over one store backend
///
/// Every handle points at the same adapter instance; services take only the
/// traits they need.
#[derive(Clone)]
pub struct StoreHandles {
    pub identities: Arc<dyn IdentityStore>,
    pub consents: Arc<dyn ConsentStore>,
    pub audit: Arc<dyn AuditStore>,
    pub overrides: Arc<dyn OverrideStore>,
    pub lifecycle: Arc<dyn StoreLifecycle>,
}

impl StoreHandles {
    fn from_postgresql(adapter: Arc<PostgreSQLStore>) -> Self {
        Self {
            identities: adapter.clone(),
            consents: adapter.clone(),
            audit: adapter.clone(),
            overrides: adapter.clone(),
            lifecycle: adapter,
        }
    }

    /// Handles over an in-memory store, for tests and embedded use
    pub fn in_memory() -> Self {
        let adapter = Arc::new(MemoryStore::new());
        Self {
            identities: adapter.clone(),
            consents: adapter.clone(),
            audit: adapter.clone(),
            overrides: adapter.clone(),
            lifecycle: adapter,
        }
    }
}

/// Create the store backend selected by the configuration
///
/// # Errors
///
/// Returns an error if the backend cannot be created.
pub async fn create_store(config: &PassportConfig) -> Result<StoreHandles> {
    match config.store_target {
        StoreTarget::PostgreSQL => {
            let pg_config = config.postgresql.as_ref().ok_or_else(|| {
                PassportError::Configuration(
                    "postgresql configuration is required when store_target = 'postgresql'"
                        .to_string(),
                )
            })?;

            tracing::info!("Creating PostgreSQL store");
            let client = Arc::new(PostgreSQLClient::new(pg_config.clone()).await?);
            let adapter = Arc::new(PostgreSQLStore::new_with_arc(client));

            Ok(StoreHandles::from_postgresql(adapter))
        }
        StoreTarget::Memory => {
            tracing::info!("Creating in-memory store");
            Ok(StoreHandles::in_memory())
        }
    }
}
