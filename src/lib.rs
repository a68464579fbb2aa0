// Passport - Federated Patient Identity & Access Control Core
// Copyright (c) 2026 Passport Contributors
// Licensed under the MIT License

//! # Passport - Federated Patient Identity & Access Control
//!
//! Passport federates patient records across hospitals under a universal
//! patient identifier and gates access to those records through three
//! channels, every access producing an immutable audit trail:
//!
//! - **Regular** - ordinary privileged view
//! - **Consent** - patient-authorized, time-boxed numeric codes
//! - **Emergency** - role-gated override with mandatory justification
//!
//! ## Architecture
//!
//! Passport follows a layered architecture:
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Business logic (identity, consent, emergency, audit, facade)
//! - [`adapters`] - Store backends behind injected traits
//! - [`domain`] - Core domain types and models
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging and observability
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use passport::adapters::store::create_store;
//! use passport::config::load_config;
//! use passport::core::PassportCore;
//! use passport::domain::clock::SystemClock;
//! use passport::domain::{AccessContext, RolePrincipal};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("passport.toml")?;
//!     let handles = create_store(&config).await?;
//!     handles.lifecycle.ensure_schema().await?;
//!
//!     let core = PassportCore::new(&config, handles, Arc::new(SystemClock));
//!
//!     let clerk = RolePrincipal::with_capabilities("clerk-1", []);
//!     let patient = passport::domain::PatientRef::new("mrn-000123")?;
//!     let identity = core
//!         .registry
//!         .assign_or_get(&clerk, &patient, &AccessContext::default())
//!         .await?;
//!
//!     println!("Universal id: {}", identity.universal_id);
//!     Ok(())
//! }
//! ```
//!
//! ## Access Channels
//!
//! All three channels go through one entry point,
//! [`core::AccessControlFacade::request_access`], and every successful call
//! produces exactly one attributable [`domain::AuditLogEntry`]:
//!
//! ```rust,no_run
//! use passport::core::AccessRequest;
//! # async fn example(
//! #     facade: &passport::core::AccessControlFacade,
//! #     doctor: &passport::domain::RolePrincipal,
//! #     patient: &passport::domain::PatientRef,
//! #     ctx: &passport::domain::AccessContext,
//! # ) -> passport::domain::Result<()> {
//! let grant = facade
//!     .request_access(
//!         doctor,
//!         patient,
//!         AccessRequest::Emergency {
//!             justification: "unconscious patient, unknown allergies".into(),
//!         },
//!         ctx,
//!     )
//!     .await?;
//!
//! println!("audited as entry {}", grant.audit_entry.id);
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! All fallible operations return [`domain::Result<T>`] with
//! [`domain::PassportError`]. Validation and permission failures propagate
//! unchanged; an audit-write failure after an already-succeeded sensitive
//! action surfaces as [`domain::PassportError::AuditingFailed`], never as a
//! silent success.
//!
//! ## Logging
//!
//! Structured logging via the `tracing` crate:
//!
//! ```rust,no_run
//! use tracing::{info, warn};
//!
//! info!(universal_id = "PP0123456789AB", "Identity assigned");
//! warn!(user_ref = "dr-house", "Emergency override granted");
//! ```
//!
//! Consent codes never appear in log output or audit details; where a code
//! must be referenced it is logged as a SHA-256 digest.

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
