//! Integration tests for universal identity assignment

use fake::faker::number::en::NumberWithFormat;
use fake::Fake;
use passport::adapters::store::{IdentityStore, StoreHandles};
use passport::config::{
    ApplicationConfig, ConsentConfig, EmergencyConfig, Environment, LoggingConfig, PassportConfig,
    StoreTarget,
};
use passport::core::PassportCore;
use passport::domain::clock::SystemClock;
use passport::domain::{AccessContext, PassportError, PatientRef, RolePrincipal, UniversalId};
use regex::Regex;
use std::collections::HashSet;
use std::sync::Arc;

fn memory_config() -> PassportConfig {
    PassportConfig {
        application: ApplicationConfig::default(),
        environment: Environment::Development,
        store_target: StoreTarget::Memory,
        postgresql: None,
        consent: ConsentConfig::default(),
        emergency: EmergencyConfig::default(),
        logging: LoggingConfig::default(),
    }
}

fn core_with_handles() -> (PassportCore, StoreHandles) {
    let handles = StoreHandles::in_memory();
    let core = PassportCore::new(&memory_config(), handles.clone(), Arc::new(SystemClock));
    (core, handles)
}

fn clerk() -> RolePrincipal {
    RolePrincipal::with_capabilities("registration-clerk", [])
}

#[tokio::test]
async fn assign_or_get_is_idempotent() {
    let (core, handles) = core_with_handles();
    let patient = PatientRef::new("mrn-000123").unwrap();
    let ctx = AccessContext::default();

    let first = core
        .registry
        .assign_or_get(&clerk(), &patient, &ctx)
        .await
        .unwrap();
    let second = core
        .registry
        .assign_or_get(&clerk(), &patient, &ctx)
        .await
        .unwrap();

    assert_eq!(first.universal_id, second.universal_id);
    assert_eq!(handles.identities.count_identities().await.unwrap(), 1);
}

#[tokio::test]
async fn generated_ids_match_format() {
    let (core, _) = core_with_handles();
    let ctx = AccessContext::default();
    let format = Regex::new(r"^PP[0-9A-F]{12}$").unwrap();

    for _ in 0..16 {
        let mrn: String = NumberWithFormat("MRN-########").fake();
        let patient = PatientRef::new(mrn).unwrap();
        let identity = core
            .registry
            .assign_or_get(&clerk(), &patient, &ctx)
            .await
            .unwrap();
        assert!(
            format.is_match(identity.universal_id.as_str()),
            "id {} does not match the expected format",
            identity.universal_id
        );
    }
}

#[tokio::test]
async fn concurrent_registrations_yield_distinct_ids() {
    let (core, handles) = core_with_handles();
    let registry = core.registry.clone();

    let tasks: Vec<_> = (0..32)
        .map(|i| {
            let registry = registry.clone();
            tokio::spawn(async move {
                let patient = PatientRef::new(format!("mrn-{i}")).unwrap();
                registry
                    .assign_or_get(
                        &RolePrincipal::with_capabilities("clerk", []),
                        &patient,
                        &AccessContext::default(),
                    )
                    .await
                    .unwrap()
            })
        })
        .collect();

    let mut ids = HashSet::new();
    for task in tasks {
        let identity = task.await.unwrap();
        ids.insert(identity.universal_id.clone());
    }

    assert_eq!(ids.len(), 32);
    assert_eq!(handles.identities.count_identities().await.unwrap(), 32);
}

#[tokio::test]
async fn concurrent_registrations_of_one_patient_converge() {
    let (core, handles) = core_with_handles();
    let registry = core.registry.clone();

    let tasks: Vec<_> = (0..8)
        .map(|_| {
            let registry = registry.clone();
            tokio::spawn(async move {
                let patient = PatientRef::new("mrn-shared").unwrap();
                registry
                    .assign_or_get(
                        &RolePrincipal::with_capabilities("clerk", []),
                        &patient,
                        &AccessContext::default(),
                    )
                    .await
                    .unwrap()
            })
        })
        .collect();

    let mut ids = HashSet::new();
    for task in tasks {
        ids.insert(task.await.unwrap().universal_id.clone());
    }

    // Every caller got the same identity and exactly one record exists.
    assert_eq!(ids.len(), 1);
    assert_eq!(handles.identities.count_identities().await.unwrap(), 1);
}

#[tokio::test]
async fn first_assignment_writes_one_creation_audit_entry() {
    let (core, _) = core_with_handles();
    let patient = PatientRef::new("mrn-1").unwrap();
    let ctx = AccessContext::new("10.1.2.3", "registration-desk/1.0");

    core.registry
        .assign_or_get(&clerk(), &patient, &ctx)
        .await
        .unwrap();
    core.registry
        .assign_or_get(&clerk(), &patient, &ctx)
        .await
        .unwrap();

    let entries = core.ledger.query_for_patient(&patient).await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].access_type.as_str(), "regular");
    assert_eq!(entries[0].action.as_str(), "create");
    assert_eq!(entries[0].user_ref, "registration-clerk");
    assert_eq!(entries[0].ip_address, "10.1.2.3");
}

#[tokio::test]
async fn lookups_resolve_both_directions() {
    let (core, _) = core_with_handles();
    let patient = PatientRef::new("mrn-1").unwrap();

    let identity = core
        .registry
        .assign_or_get(&clerk(), &patient, &AccessContext::default())
        .await
        .unwrap();

    let by_universal = core
        .registry
        .lookup_by_universal_id(&identity.universal_id)
        .await
        .unwrap();
    assert_eq!(by_universal.patient_ref, patient);

    let by_patient = core.registry.lookup_by_patient_ref(&patient).await.unwrap();
    assert_eq!(by_patient.universal_id, identity.universal_id);
}

#[tokio::test]
async fn unknown_lookups_are_not_found() {
    let (core, _) = core_with_handles();

    let result = core
        .registry
        .lookup_by_universal_id(&UniversalId::new("PPABCDEF012345").unwrap())
        .await;
    assert!(matches!(result, Err(PassportError::NotFound(_))));

    let result = core
        .registry
        .lookup_by_patient_ref(&PatientRef::new("mrn-nobody").unwrap())
        .await;
    assert!(matches!(result, Err(PassportError::NotFound(_))));
}
