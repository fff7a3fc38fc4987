//! Verification orchestrator: fans the four checks out, folds them into a
//! verdict.
//!
//! The IP lookup and the history read are the only suspension points; both
//! run concurrently and are individually bounded by timeouts. The velocity
//! check consumes the history result. Network and sensor checks are pure.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::Instrument;
use worktrust_geoip::OriginResolver;
use worktrust_store::EvidenceStore;
use worktrust_types::{
    CheckKind, CheckSet, EvidenceBundle, SubmitterId, VerificationParams, VerificationVerdict,
};

use crate::tracing_spans::verify_span;
use crate::{
    check_ip_geolocation, check_network_gps_match, check_sensors, check_velocity, score,
    HistoryLookup, VerificationError, VerificationMetrics, DEFAULT_GEOIP_TIMEOUT,
    DEFAULT_HISTORY_TIMEOUT, MOCK_PROVIDER_WARNING,
};

pub struct Orchestrator {
    resolver: Arc<dyn OriginResolver>,
    history: HistoryLookup,
    params: VerificationParams,
    geoip_timeout: Duration,
    metrics: Option<Arc<VerificationMetrics>>,
}

impl Orchestrator {
    pub fn new(
        store: Arc<dyn EvidenceStore>,
        resolver: Arc<dyn OriginResolver>,
        params: VerificationParams,
    ) -> Self {
        Self {
            resolver,
            history: HistoryLookup::new(store, DEFAULT_HISTORY_TIMEOUT),
            params,
            geoip_timeout: DEFAULT_GEOIP_TIMEOUT,
            metrics: None,
        }
    }

    /// Override the IP lookup and history read bounds.
    pub fn with_timeouts(mut self, geoip: Duration, history: Duration) -> Self {
        self.geoip_timeout = geoip;
        self.history = HistoryLookup::new(self.history_store(), history);
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<VerificationMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn metrics(&self) -> Option<&Arc<VerificationMetrics>> {
        self.metrics.as_ref()
    }

    fn history_store(&self) -> Arc<dyn EvidenceStore> {
        self.history.store()
    }

    /// Run every check against `evidence` and compose the verdict.
    ///
    /// Malformed evidence is rejected before any check runs. Otherwise this
    /// never fails: unavailable dependencies degrade their check to a pass.
    pub async fn verify(
        &self,
        submitter: &SubmitterId,
        evidence: &EvidenceBundle,
        origin: &str,
    ) -> Result<VerificationVerdict, VerificationError> {
        evidence.validate().map_err(|e| {
            tracing::info!(submitter = %submitter, error = %e, "rejected malformed evidence");
            VerificationError::from(e)
        })?;

        Ok(self
            .run_checks(submitter, evidence, origin)
            .instrument(verify_span(submitter))
            .await)
    }

    async fn run_checks(
        &self,
        submitter: &SubmitterId,
        evidence: &EvidenceBundle,
        origin: &str,
    ) -> VerificationVerdict {
        let started = Instant::now();
        let point = evidence.point();

        let (ip, velocity) = tokio::join!(
            check_ip_geolocation(
                self.resolver.as_ref(),
                point,
                origin,
                self.geoip_timeout,
                &self.params,
            ),
            check_velocity(
                &self.history,
                submitter,
                point,
                evidence.timestamp,
                &self.params,
            ),
        );
        let network_gps_match = check_network_gps_match(evidence, &self.params);
        let sensors = check_sensors(evidence.sensors.as_ref(), &self.params);

        if let Some(metrics) = &self.metrics {
            if ip.degraded {
                metrics.record_degraded(CheckKind::IpGeolocation);
            }
            if velocity.degraded {
                metrics.record_degraded(CheckKind::Velocity);
            }
        }

        let checks = CheckSet {
            ip_geolocation: ip.outcome,
            velocity_check: velocity.outcome,
            network_gps_match,
            sensors,
        };
        let mut verdict = score(checks, &self.params);
        if evidence.is_mocked {
            verdict.warnings.push(MOCK_PROVIDER_WARNING.to_string());
        }

        let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
        if let Some(metrics) = &self.metrics {
            metrics.observe_verdict(&verdict, elapsed_ms);
        }
        tracing::info!(
            trust_score = verdict.trust_score,
            passed = verdict.passed,
            warnings = verdict.warnings.len(),
            elapsed_ms,
            "verification complete"
        );

        verdict
    }
}
