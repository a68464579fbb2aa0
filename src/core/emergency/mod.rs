//! Emergency override issuance

pub mod authorizer;

pub use authorizer::EmergencyAccessAuthorizer;
