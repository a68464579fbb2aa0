//! Store backends
//!
//! The core services talk to storage only through the traits in
//! [`store::traits`]; the concrete backends here are selected by
//! configuration and built by the factory.

pub mod memory;
pub mod postgresql;
pub mod store;
