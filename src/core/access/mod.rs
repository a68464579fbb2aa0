//! Access control facade

pub mod facade;

pub use facade::{AccessControlFacade, AccessGrant, AccessRequest};
