//! PostgreSQL client
//!
//! Connection pooling and low-level query helpers for the PostgreSQL store
//! backend. Driver errors never leave this module as third-party types.

use crate::config::schema::PostgreSQLConfig;
use crate::domain::{PassportError, Result, StoreError};
use deadpool_postgres::{Manager, ManagerConfig, Pool, RecyclingMethod};
use native_tls::TlsConnector;
use postgres_native_tls::MakeTlsConnector;
use secrecy::ExposeSecret;
use std::time::Duration;
use tokio_postgres::error::SqlState;
use tokio_postgres::{NoTls, Row};

/// Map a driver error onto the store error vocabulary
///
/// Unique-constraint violations carry the constraint name so callers can tell
/// which uniqueness rule fired without parsing message text.
pub(crate) fn map_pg_error(err: tokio_postgres::Error) -> StoreError {
    if let Some(db_err) = err.as_db_error() {
        if db_err.code() == &SqlState::UNIQUE_VIOLATION {
            return StoreError::UniqueViolation(
                db_err.constraint().unwrap_or("unknown").to_string(),
            );
        }
    }
    if err.is_closed() {
        return StoreError::ConnectionFailed(err.to_string());
    }
    StoreError::QueryFailed(err.to_string())
}

/// PostgreSQL client with connection pooling
pub struct PostgreSQLClient {
    /// Connection pool
    pool: Pool,

    /// Configuration
    config: PostgreSQLConfig,
}

impl PostgreSQLClient {
    /// Create a new PostgreSQL client
    ///
    /// # Errors
    ///
    /// Returns an error if the connection string is invalid or the pool
    /// cannot be created.
    pub async fn new(config: PostgreSQLConfig) -> Result<Self> {
        let pg_config: tokio_postgres::Config = config
            .connection_string
            .expose_secret()
            .as_ref()
            .parse()
            .map_err(|e| {
                PassportError::Configuration(format!("Invalid PostgreSQL connection string: {e}"))
            })?;

        let manager_config = ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        };

        let manager = if config.tls_required() {
            let connector = TlsConnector::builder().build().map_err(|e| {
                PassportError::Configuration(format!("Failed to build TLS connector: {e}"))
            })?;
            Manager::from_config(
                pg_config,
                MakeTlsConnector::new(connector),
                manager_config,
            )
        } else {
            Manager::from_config(pg_config, NoTls, manager_config)
        };

        let pool = Pool::builder(manager)
            .max_size(config.max_connections)
            .wait_timeout(Some(Duration::from_secs(config.connection_timeout_seconds)))
            .create_timeout(Some(Duration::from_secs(config.connection_timeout_seconds)))
            .recycle_timeout(Some(Duration::from_secs(config.connection_timeout_seconds)))
            .build()
            .map_err(|e| StoreError::ConnectionFailed(format!("Failed to create pool: {e}")))?;

        Ok(Self { pool, config })
    }

    /// Test the connection to PostgreSQL
    pub async fn test_connection(&self) -> Result<()> {
        let client = self.get_connection().await?;

        client
            .query_one("SELECT 1", &[])
            .await
            .map_err(map_pg_error)?;

        tracing::info!("PostgreSQL connection test successful");
        Ok(())
    }

    /// Ensure the schema exists
    ///
    /// Runs the bootstrap SQL, which creates tables and indexes only if they
    /// are missing.
    pub async fn ensure_schema(&self) -> Result<()> {
        let client = self.get_connection().await?;

        let migration_sql = include_str!("../../../migrations/001_initial_schema.sql");

        client
            .batch_execute(migration_sql)
            .await
            .map_err(map_pg_error)?;

        tracing::info!("PostgreSQL schema initialized");
        Ok(())
    }

    /// Get a connection from the pool
    ///
    /// # Errors
    ///
    /// Returns an error if a connection cannot be obtained.
    pub async fn get_connection(&self) -> Result<deadpool_postgres::Object> {
        self.pool.get().await.map_err(|e| {
            StoreError::ConnectionFailed(format!("Failed to get connection from pool: {e}")).into()
        })
    }

    /// Execute a query and return rows
    pub async fn query(
        &self,
        query: &str,
        params: &[&(dyn tokio_postgres::types::ToSql + Sync)],
    ) -> Result<Vec<Row>> {
        let client = self.get_connection().await?;
        self.apply_statement_timeout(&client).await?;

        client
            .query(query, params)
            .await
            .map_err(|e| map_pg_error(e).into())
    }

    /// Execute a statement and return the number of affected rows
    pub async fn execute(
        &self,
        statement: &str,
        params: &[&(dyn tokio_postgres::types::ToSql + Sync)],
    ) -> Result<u64> {
        let client = self.get_connection().await?;
        self.apply_statement_timeout(&client).await?;

        client
            .execute(statement, params)
            .await
            .map_err(|e| map_pg_error(e).into())
    }

    async fn apply_statement_timeout(&self, client: &deadpool_postgres::Object) -> Result<()> {
        let timeout_query = format!(
            "SET statement_timeout = {}",
            self.config.statement_timeout_seconds * 1000
        );
        client
            .batch_execute(&timeout_query)
            .await
            .map_err(|e| map_pg_error(e).into())
    }
}
