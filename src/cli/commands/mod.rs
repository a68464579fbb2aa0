//! Command implementations

pub mod audit;
pub mod consent;
pub mod init;
pub mod register;
pub mod status;
pub mod validate;

use crate::adapters::store::{create_store, StoreHandles};
use crate::config::{load_config, PassportConfig};
use crate::core::PassportCore;
use crate::domain::actor::AccessContext;
use crate::domain::clock::SystemClock;
use std::sync::Arc;

/// Load configuration and build the store for a command
pub(crate) async fn open_store(config_path: &str) -> anyhow::Result<(PassportConfig, StoreHandles)> {
    let config = load_config(config_path)?;
    let handles = create_store(&config).await?;
    Ok((config, handles))
}

/// Load configuration and wire the full service stack for a command
pub(crate) async fn open_core(config_path: &str) -> anyhow::Result<(PassportConfig, PassportCore)> {
    let (config, handles) = open_store(config_path).await?;
    let core = PassportCore::new(&config, handles, Arc::new(SystemClock));
    Ok((config, core))
}

/// Request context describing this CLI process
pub(crate) fn cli_context() -> AccessContext {
    AccessContext::new(
        "127.0.0.1",
        format!("passport-cli/{}", env!("CARGO_PKG_VERSION")),
    )
}
