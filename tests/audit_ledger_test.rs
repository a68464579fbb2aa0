//! Integration tests for the audit ledger

use chrono::{Duration, Utc};
use passport::adapters::store::StoreHandles;
use passport::config::{
    ApplicationConfig, ConsentConfig, EmergencyConfig, Environment, LoggingConfig, PassportConfig,
    StoreTarget,
};
use passport::core::PassportCore;
use passport::domain::clock::ManualClock;
use passport::domain::{AccessContext, AccessType, AuditAction, Clock, PatientRef};
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

fn core_with_clock() -> (PassportCore, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::starting_at(Utc::now()));
    let core = PassportCore::new(&memory_config(), StoreHandles::in_memory(), clock.clone());
    (core, clock)
}

#[tokio::test]
async fn access_time_is_assigned_by_the_ledger() {
    let (core, clock) = core_with_clock();
    let start = clock.now();
    clock.advance(Duration::minutes(10));

    let entry = core
        .ledger
        .record(
            "dr-a",
            PatientRef::new("mrn-1").unwrap(),
            AccessType::Regular,
            AuditAction::View,
            "chart review",
            &AccessContext::default(),
        )
        .await
        .unwrap();

    // Stamped at write time, not at some caller-chosen instant.
    assert_eq!(entry.access_time, start + Duration::minutes(10));
}

#[tokio::test]
async fn entries_come_back_most_recent_first() {
    let (core, clock) = core_with_clock();
    let patient = PatientRef::new("mrn-1").unwrap();

    for (details, seconds) in [("first", 1), ("second", 1), ("third", 1)] {
        core.ledger
            .record(
                "dr-a",
                patient.clone(),
                AccessType::Regular,
                AuditAction::View,
                details,
                &AccessContext::default(),
            )
            .await
            .unwrap();
        clock.advance(Duration::seconds(seconds));
    }

    let entries = core.ledger.query_for_patient(&patient).await.unwrap();
    let details: Vec<&str> = entries.iter().map(|e| e.details.as_str()).collect();
    assert_eq!(details, vec!["third", "second", "first"]);
}

#[tokio::test]
async fn queries_are_scoped_to_the_patient() {
    let (core, _) = core_with_clock();
    let patient_a = PatientRef::new("mrn-a").unwrap();
    let patient_b = PatientRef::new("mrn-b").unwrap();

    for patient in [&patient_a, &patient_a, &patient_b] {
        core.ledger
            .record(
                "dr-a",
                patient.clone(),
                AccessType::Regular,
                AuditAction::View,
                "round",
                &AccessContext::default(),
            )
            .await
            .unwrap();
    }

    assert_eq!(core.ledger.query_for_patient(&patient_a).await.unwrap().len(), 2);
    assert_eq!(core.ledger.query_for_patient(&patient_b).await.unwrap().len(), 1);
}

#[tokio::test]
async fn all_access_types_and_actions_are_recordable() {
    let (core, _) = core_with_clock();
    let patient = PatientRef::new("mrn-1").unwrap();

    let cases = [
        (AccessType::Regular, AuditAction::View),
        (AccessType::Regular, AuditAction::Create),
        (AccessType::Consent, AuditAction::View),
        (AccessType::Emergency, AuditAction::View),
        (AccessType::CrossHospital, AuditAction::Update),
        (AccessType::CrossHospital, AuditAction::Delete),
    ];

    for (access_type, action) in cases {
        let entry = core
            .ledger
            .record(
                "dr-a",
                patient.clone(),
                access_type,
                action,
                "case",
                &AccessContext::default(),
            )
            .await
            .unwrap();
        assert_eq!(entry.access_type, access_type);
        assert_eq!(entry.action, action);
    }

    let entries = core.ledger.query_for_patient(&patient).await.unwrap();
    assert_eq!(entries.len(), cases.len());
}

#[tokio::test]
async fn context_is_captured_into_entries() {
    let (core, _) = core_with_clock();

    let entry = core
        .ledger
        .record(
            "sync-service",
            PatientRef::new("mrn-1").unwrap(),
            AccessType::CrossHospital,
            AuditAction::Update,
            "Record pushed to hospital general-north",
            &AccessContext::new("172.16.0.8", "registry-sync/1.4"),
        )
        .await
        .unwrap();

    assert_eq!(entry.ip_address, "172.16.0.8");
    assert_eq!(entry.user_agent, "registry-sync/1.4");
    assert_eq!(entry.user_ref, "sync-service");
}
