//! End-to-end scenarios through the submission pipeline, using nullable
//! infrastructure only (no network, no disk).

use std::sync::Arc;
use std::time::Duration;

use worktrust_nullables::{NullClock, NullResolver, NullStore};
use worktrust_store::{EvidenceStore, SubmissionRecord};
use worktrust_types::{
    EvidenceBundle, NetworkLocation, SensorReadings, SubmitterId, TimestampMs, VerificationParams,
};
use worktrust_verification::{EvidencePipeline, Orchestrator, VerificationError};

const BENGALURU: (f64, f64) = (12.9716, 77.5946);
const CAPTURED_AT: i64 = 1_717_000_000_000;
const KM_PER_DEGREE_LAT: f64 = 111.195;

struct Harness {
    store: Arc<NullStore>,
    resolver: Arc<NullResolver>,
    pipeline: EvidencePipeline,
}

impl Harness {
    fn new(resolver: NullResolver) -> Self {
        let store = Arc::new(NullStore::new());
        let resolver = Arc::new(resolver);
        let orchestrator = Orchestrator::new(
            store.clone(),
            resolver.clone(),
            VerificationParams::default(),
        )
        .with_timeouts(Duration::from_millis(200), Duration::from_millis(200));
        let pipeline = EvidencePipeline::new(
            orchestrator,
            store.clone(),
            Arc::new(NullClock::new(CAPTURED_AT + 5_000)),
        );
        Self {
            store,
            resolver,
            pipeline,
        }
    }

    fn offline() -> Self {
        Self::new(NullResolver::unavailable())
    }

    /// Seed a prior record directly, as if persisted by an earlier run.
    fn seed(&self, submitter: &SubmitterId, latitude: f64, longitude: f64, at: i64) {
        self.store
            .append(&SubmissionRecord {
                submitter: submitter.clone(),
                latitude,
                longitude,
                captured_at: TimestampMs::new(at),
                recorded_at: TimestampMs::new(at + 1_000),
                client_hash: "seed".into(),
                photo_reference: "seed.jpg".into(),
                trust_score: 100,
                passed: true,
                warnings: vec![],
            })
            .unwrap();
    }
}

fn worker() -> SubmitterId {
    SubmitterId::new("worker-42").unwrap()
}

fn evidence_at(latitude: f64, longitude: f64) -> EvidenceBundle {
    EvidenceBundle {
        latitude,
        longitude,
        timestamp: TimestampMs::new(CAPTURED_AT),
        accuracy: 6.5,
        is_mocked: false,
        network_location: None,
        sensors: None,
        client_hash: "9f2c...e1".into(),
        photo_reference: "uploads/worker-42/site.jpg".into(),
    }
}

fn bengaluru() -> EvidenceBundle {
    evidence_at(BENGALURU.0, BENGALURU.1)
}

// ── Scenario A ──────────────────────────────────────────────────────────

#[tokio::test]
async fn first_submission_from_private_origin_passes_everything() {
    let h = Harness::offline();
    let verdict = h
        .pipeline
        .submit(&worker(), &bengaluru(), "192.168.1.14")
        .await
        .unwrap();

    assert!(verdict.passed);
    assert_eq!(verdict.trust_score, 100);
    assert!(verdict.warnings.is_empty());
    for (kind, outcome) in verdict.checks.iter() {
        assert!(outcome.passed, "{kind} failed: {}", outcome.message);
        assert!(!outcome.message.is_empty());
    }
    assert!(verdict.checks.ip_geolocation.message.contains("skipped"));
    assert_eq!(verdict.checks.velocity_check.message, "First location recorded");
    assert_eq!(h.resolver.calls(), 0);
    assert_eq!(h.store.records_for(&worker()).len(), 1);
}

// ── Scenario B ──────────────────────────────────────────────────────────

#[tokio::test]
async fn fifty_km_in_thirty_seconds_is_rejected() {
    let h = Harness::offline();
    let prior_lat = BENGALURU.0 - 50.0 / KM_PER_DEGREE_LAT;
    h.seed(&worker(), prior_lat, BENGALURU.1, CAPTURED_AT - 30_000);

    let verdict = h
        .pipeline
        .submit(&worker(), &bengaluru(), "10.0.0.7")
        .await
        .unwrap();

    let velocity = &verdict.checks.velocity_check;
    assert!(!velocity.passed);
    assert!(velocity.message.contains("teleportation"));
    assert!(
        velocity.message.contains("6000 km/h") || velocity.message.contains("5999 km/h"),
        "{}",
        velocity.message
    );
    assert!(verdict.trust_score <= 60);
    assert!(!verdict.passed);
    assert_eq!(verdict.warnings, vec![velocity.message.clone()]);
}

// ── Scenario C ──────────────────────────────────────────────────────────

#[tokio::test]
async fn network_location_fifteen_km_away_costs_twenty_five() {
    let h = Harness::offline();
    let mut evidence = bengaluru();
    evidence.network_location = Some(NetworkLocation {
        latitude: BENGALURU.0 + 15.0 / KM_PER_DEGREE_LAT,
        longitude: BENGALURU.1,
        accuracy: 800.0,
    });

    let verdict = h
        .pipeline
        .submit(&worker(), &evidence, "127.0.0.1")
        .await
        .unwrap();

    assert!(!verdict.checks.network_gps_match.passed);
    assert!(verdict.checks.ip_geolocation.passed);
    assert!(verdict.checks.velocity_check.passed);
    assert!(verdict.checks.sensors.passed);
    assert_eq!(verdict.trust_score, 75);
    assert!(verdict.passed);
}

// ── Scenario D ──────────────────────────────────────────────────────────

#[tokio::test]
async fn impossible_sensor_readings_cost_fifteen() {
    let h = Harness::offline();
    let mut evidence = bengaluru();
    evidence.sensors = Some(SensorReadings {
        altitude: Some(12000.0),
        heading: Some(180.0),
        speed: Some(-5.0),
    });

    let verdict = h
        .pipeline
        .submit(&worker(), &evidence, "")
        .await
        .unwrap();

    let sensors = &verdict.checks.sensors;
    assert!(!sensors.passed);
    assert!(sensors.message.contains("altitude"));
    assert!(sensors.message.contains("speed"));
    assert_eq!(verdict.trust_score, 85);
    assert!(verdict.passed);
}

// ── Edge cases ──────────────────────────────────────────────────────────

#[tokio::test]
async fn far_ip_alone_is_advisory() {
    let h = Harness::new(NullResolver::located(51.5072, -0.1276, "London", "United Kingdom"));
    let verdict = h
        .pipeline
        .submit(&worker(), &bengaluru(), "81.2.69.160")
        .await
        .unwrap();

    assert!(!verdict.checks.ip_geolocation.passed);
    assert_eq!(verdict.trust_score, 70);
    assert!(verdict.passed);
    assert_eq!(h.resolver.calls(), 1);
}

#[tokio::test]
async fn far_ip_and_network_mismatch_fall_below_threshold() {
    let h = Harness::new(NullResolver::located(51.5072, -0.1276, "London", "United Kingdom"));
    let mut evidence = bengaluru();
    evidence.network_location = Some(NetworkLocation {
        latitude: BENGALURU.0 + 0.5,
        longitude: BENGALURU.1,
        accuracy: 1500.0,
    });

    let verdict = h
        .pipeline
        .submit(&worker(), &evidence, "81.2.69.160")
        .await
        .unwrap();
    assert_eq!(verdict.trust_score, 45);
    assert!(!verdict.passed);
    assert_eq!(verdict.warnings.len(), 2);
}

#[tokio::test]
async fn unreachable_geolocation_never_fails_a_submission() {
    let h = Harness::new(NullResolver::hanging());
    let verdict = h
        .pipeline
        .submit(&worker(), &bengaluru(), "8.8.8.8")
        .await
        .unwrap();

    assert!(verdict.checks.ip_geolocation.passed);
    assert!(verdict.checks.ip_geolocation.message.contains("unavailable"));
    assert_eq!(verdict.trust_score, 100);
}

#[tokio::test]
async fn history_outage_degrades_velocity_but_write_still_lands() {
    let h = Harness::offline();
    h.store.fail_reads(true);

    let verdict = h
        .pipeline
        .submit(&worker(), &bengaluru(), "")
        .await
        .unwrap();
    assert!(verdict.checks.velocity_check.passed);
    assert!(verdict.checks.velocity_check.message.contains("unavailable"));
    assert_eq!(h.store.records_for(&worker()).len(), 1);
}

#[tokio::test]
async fn velocity_compares_against_previous_submission_not_itself() {
    let h = Harness::offline();
    h.pipeline
        .submit(&worker(), &bengaluru(), "")
        .await
        .unwrap();

    // Next day, 300 km north: plausible.
    let mut next = evidence_at(BENGALURU.0 + 300.0 / KM_PER_DEGREE_LAT, BENGALURU.1);
    next.timestamp = TimestampMs::new(CAPTURED_AT + 24 * 3_600_000);
    let verdict = h.pipeline.submit(&worker(), &next, "").await.unwrap();

    assert!(verdict.passed);
    assert!(verdict.checks.velocity_check.message.starts_with("Realistic"));
}

#[tokio::test]
async fn submitters_do_not_share_history() {
    let h = Harness::offline();
    let other = SubmitterId::new("worker-43").unwrap();
    h.seed(&other, 40.7128, -74.0060, CAPTURED_AT - 1_000);

    let verdict = h
        .pipeline
        .submit(&worker(), &bengaluru(), "")
        .await
        .unwrap();
    assert_eq!(verdict.checks.velocity_check.message, "First location recorded");
}

#[tokio::test]
async fn mocked_provider_is_flagged_last() {
    let h = Harness::offline();
    let mut evidence = bengaluru();
    evidence.is_mocked = true;
    evidence.sensors = Some(SensorReadings {
        altitude: Some(-900.0),
        heading: None,
        speed: None,
    });

    let verdict = h.pipeline.submit(&worker(), &evidence, "").await.unwrap();
    assert_eq!(verdict.trust_score, 85);
    assert_eq!(
        verdict.warnings.last().map(String::as_str),
        Some("location provider flagged as mock")
    );
}

#[tokio::test]
async fn malformed_evidence_is_rejected_before_checks() {
    let h = Harness::new(NullResolver::located(0.0, 0.0, "x", "y"));
    let mut evidence = bengaluru();
    evidence.client_hash = "  ".into();

    let err = h
        .pipeline
        .submit(&worker(), &evidence, "8.8.8.8")
        .await
        .unwrap_err();
    assert!(matches!(err, VerificationError::InvalidEvidence(_)));
    assert_eq!(h.resolver.calls(), 0);
    assert_eq!(h.store.record_count().unwrap(), 0);
}
