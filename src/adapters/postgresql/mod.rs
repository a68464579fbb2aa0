//! PostgreSQL store backend

pub mod adapter;
pub mod client;
pub mod models;

pub use adapter::PostgreSQLStore;
pub use client::PostgreSQLClient;
