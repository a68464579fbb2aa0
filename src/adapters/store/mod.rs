//! Store abstraction
//!
//! Traits the backends implement, plus the factory that builds the configured
//! backend and hands out trait-object handles.

pub mod factory;
pub mod traits;

pub use factory::{create_store, StoreHandles};
pub use traits::{
    AuditStore, ConsentStore, IdentityInsert, IdentityStore, OverrideStore, StoreLifecycle,
};
