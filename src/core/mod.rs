//! Core services
//!
//! The business logic of the access-control core: identity assignment,
//! consent tokens, emergency overrides, the audit ledger, and the facade that
//! composes them for outer layers.

pub mod access;
pub mod audit;
pub mod consent;
pub mod emergency;
pub mod identity;

pub use access::{AccessControlFacade, AccessGrant, AccessRequest};
pub use audit::AccessAuditLedger;
pub use consent::ConsentTokenManager;
pub use emergency::EmergencyAccessAuthorizer;
pub use identity::IdentityRegistry;

use crate::adapters::store::StoreHandles;
use crate::config::schema::PassportConfig;
use crate::domain::clock::Clock;
use std::sync::Arc;

/// Fully wired core services over one store
///
/// The composing process builds this once and hands the pieces to whatever
/// surface it exposes (CLI commands here; a web or FHIR gateway elsewhere).
pub struct PassportCore {
    pub registry: Arc<IdentityRegistry>,
    pub consents: Arc<ConsentTokenManager>,
    pub emergency: Arc<EmergencyAccessAuthorizer>,
    pub ledger: Arc<AccessAuditLedger>,
    pub facade: AccessControlFacade,
}

impl PassportCore {
    /// Wire the services from configuration, store handles and a clock
    pub fn new(config: &PassportConfig, handles: StoreHandles, clock: Arc<dyn Clock>) -> Self {
        let ledger = Arc::new(AccessAuditLedger::new(
            handles.audit.clone(),
            handles.overrides.clone(),
            clock.clone(),
        ));

        let registry = Arc::new(IdentityRegistry::new(
            handles.identities.clone(),
            ledger.clone(),
            clock.clone(),
        ));

        let consents = Arc::new(ConsentTokenManager::new(
            handles.consents.clone(),
            handles.identities.clone(),
            clock,
            config.consent.clone(),
        ));

        let emergency = Arc::new(EmergencyAccessAuthorizer::new(
            handles.overrides.clone(),
            ledger.clone(),
        ));

        let facade = AccessControlFacade::new(
            registry.clone(),
            consents.clone(),
            emergency.clone(),
            ledger.clone(),
            config.consent.clone(),
        );

        Self {
            registry,
            consents,
            emergency,
            ledger,
            facade,
        }
    }
}
