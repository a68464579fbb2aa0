//! Integration tests for the consent token lifecycle

use chrono::{Duration, Utc};
use passport::adapters::store::StoreHandles;
use passport::config::{
    ApplicationConfig, ConsentConfig, EmergencyConfig, Environment, LoggingConfig, PassportConfig,
    StoreTarget,
};
use passport::core::PassportCore;
use passport::domain::clock::ManualClock;
use passport::domain::{AccessContext, PassportError, PatientRef, RolePrincipal, UniversalId};
use std::sync::Arc;

fn config_with_consent(consent: ConsentConfig) -> PassportConfig {
    PassportConfig {
        application: ApplicationConfig::default(),
        environment: Environment::Development,
        store_target: StoreTarget::Memory,
        postgresql: None,
        consent,
        emergency: EmergencyConfig::default(),
        logging: LoggingConfig::default(),
    }
}

/// Wire a core over a manual clock and register one patient
async fn core_with_patient(consent: ConsentConfig) -> (PassportCore, Arc<ManualClock>, UniversalId) {
    let clock = Arc::new(ManualClock::starting_at(Utc::now()));
    let core = PassportCore::new(
        &config_with_consent(consent),
        StoreHandles::in_memory(),
        clock.clone(),
    );

    let identity = core
        .registry
        .assign_or_get(
            &RolePrincipal::with_capabilities("clerk", []),
            &PatientRef::new("mrn-1").unwrap(),
            &AccessContext::default(),
        )
        .await
        .unwrap();

    (core, clock, identity.universal_id)
}

#[tokio::test]
async fn verify_true_immediately_false_after_expiry() {
    let (core, clock, universal_id) = core_with_patient(ConsentConfig::default()).await;

    // One-minute token, checked immediately and 61 seconds later.
    let token = core.consents.issue(&universal_id, 1, "dr-a").await.unwrap();
    assert!(core.consents.verify(&universal_id, &token.code).await.unwrap());

    clock.advance(Duration::seconds(61));
    assert!(!core.consents.verify(&universal_id, &token.code).await.unwrap());
}

#[tokio::test]
async fn five_minute_token_survives_four_minutes() {
    let (core, clock, universal_id) = core_with_patient(ConsentConfig::default()).await;

    let token = core.consents.issue(&universal_id, 5, "dr-a").await.unwrap();

    clock.advance(Duration::minutes(4));
    assert!(core.consents.verify(&universal_id, &token.code).await.unwrap());

    clock.advance(Duration::minutes(1));
    assert!(!core.consents.verify(&universal_id, &token.code).await.unwrap());
}

#[tokio::test]
async fn issue_rejects_bad_durations() {
    let (core, _, universal_id) = core_with_patient(ConsentConfig::default()).await;

    for bad in [0, -1, -60] {
        let result = core.consents.issue(&universal_id, bad, "dr-a").await;
        assert!(matches!(result, Err(PassportError::Validation(_))));
    }

    // Over the configured maximum is rejected the same way.
    let result = core.consents.issue(&universal_id, 10_000, "dr-a").await;
    assert!(matches!(result, Err(PassportError::Validation(_))));
}

#[tokio::test]
async fn issue_for_unknown_identity_is_not_found() {
    let (core, _, _) = core_with_patient(ConsentConfig::default()).await;
    let unknown = UniversalId::new("PPFFFFFFFFFFFF").unwrap();

    let result = core.consents.issue(&unknown, 5, "dr-a").await;
    assert!(matches!(result, Err(PassportError::NotFound(_))));
}

#[tokio::test]
async fn revoked_token_fails_verification_before_expiry() {
    let (core, _, universal_id) = core_with_patient(ConsentConfig::default()).await;

    let token = core.consents.issue(&universal_id, 60, "dr-a").await.unwrap();
    assert!(core.consents.verify(&universal_id, &token.code).await.unwrap());

    assert!(core.consents.revoke(&token.token_id).await.unwrap());
    assert!(!core.consents.verify(&universal_id, &token.code).await.unwrap());

    // Revocation is terminal and idempotent.
    assert!(core.consents.revoke(&token.token_id).await.unwrap());
    assert!(!core.consents.verify(&universal_id, &token.code).await.unwrap());
}

#[tokio::test]
async fn tokens_are_independent() {
    let (core, _, universal_id) = core_with_patient(ConsentConfig::default()).await;

    let kept = core.consents.issue(&universal_id, 30, "dr-a").await.unwrap();
    let revoked = core.consents.issue(&universal_id, 30, "dr-b").await.unwrap();

    core.consents.revoke(&revoked.token_id).await.unwrap();

    assert!(core.consents.verify(&universal_id, &kept.code).await.unwrap());
    assert!(!core.consents.verify(&universal_id, &revoked.code).await.unwrap());
}

#[tokio::test]
async fn multi_use_is_the_default_policy() {
    let (core, _, universal_id) = core_with_patient(ConsentConfig::default()).await;

    let token = core.consents.issue(&universal_id, 5, "dr-a").await.unwrap();
    for _ in 0..3 {
        assert!(core.consents.verify(&universal_id, &token.code).await.unwrap());
    }
}

#[tokio::test]
async fn single_use_policy_consumes_on_first_verify() {
    let consent = ConsentConfig {
        single_use: true,
        ..ConsentConfig::default()
    };
    let (core, _, universal_id) = core_with_patient(consent).await;

    let token = core.consents.issue(&universal_id, 5, "dr-a").await.unwrap();
    assert!(core.consents.verify(&universal_id, &token.code).await.unwrap());
    assert!(!core.consents.verify(&universal_id, &token.code).await.unwrap());

    let stored = core.consents.get_by_id(&token.token_id).await.unwrap();
    assert!(!stored.active);
}

#[tokio::test]
async fn get_by_id_returns_issued_token() {
    let (core, _, universal_id) = core_with_patient(ConsentConfig::default()).await;

    let issued = core.consents.issue(&universal_id, 5, "dr-a").await.unwrap();
    let fetched = core.consents.get_by_id(&issued.token_id).await.unwrap();

    assert_eq!(fetched, issued);
    assert_eq!(fetched.issued_by, "dr-a");
}
