//! Prometheus metrics for the verification pipeline.
//!
//! [`VerificationMetrics`] owns a dedicated [`Registry`] so several
//! pipelines (or tests) in one process never collide on metric names.

use prometheus::{
    register_histogram_with_registry, register_int_counter_vec_with_registry,
    register_int_counter_with_registry, Histogram, HistogramOpts, IntCounter, IntCounterVec,
    Opts, Registry, TextEncoder,
};
use worktrust_types::{CheckKind, VerificationVerdict};

pub struct VerificationMetrics {
    /// The Prometheus registry that owns every metric below.
    pub registry: Registry,

    // ── Counters ────────────────────────────────────────────────────────
    /// Submissions that reached scoring.
    pub submissions: IntCounter,
    pub accepted: IntCounter,
    pub rejected: IntCounter,
    /// Failed checks, labelled by `check`.
    pub check_failures: IntCounterVec,
    /// Checks that passed by default because a dependency was unavailable.
    pub degraded_checks: IntCounterVec,

    // ── Histograms ──────────────────────────────────────────────────────
    /// Wall time from fan-out to verdict, in milliseconds.
    pub verify_duration_ms: Histogram,
}

impl VerificationMetrics {
    pub fn new() -> Self {
        let registry = Registry::new();

        let submissions = register_int_counter_with_registry!(
            Opts::new(
                "worktrust_submissions_total",
                "Total submissions verified"
            ),
            registry
        )
        .expect("failed to register submissions counter");

        let accepted = register_int_counter_with_registry!(
            Opts::new(
                "worktrust_submissions_accepted_total",
                "Total submissions with a passing verdict"
            ),
            registry
        )
        .expect("failed to register accepted counter");

        let rejected = register_int_counter_with_registry!(
            Opts::new(
                "worktrust_submissions_rejected_total",
                "Total submissions with a failing verdict"
            ),
            registry
        )
        .expect("failed to register rejected counter");

        let check_failures = register_int_counter_vec_with_registry!(
            Opts::new(
                "worktrust_check_failures_total",
                "Total failed checks by check kind"
            ),
            &["check"],
            registry
        )
        .expect("failed to register check_failures counter");

        let degraded_checks = register_int_counter_vec_with_registry!(
            Opts::new(
                "worktrust_degraded_checks_total",
                "Total checks that passed because a dependency was unavailable"
            ),
            &["check"],
            registry
        )
        .expect("failed to register degraded_checks counter");

        // 0.5 ms → ~8 s.
        let verify_duration_ms = register_histogram_with_registry!(
            HistogramOpts::new(
                "worktrust_verify_duration_ms",
                "Verification time in milliseconds"
            )
            .buckets(prometheus::exponential_buckets(0.5, 2.0, 15).expect("valid bucket layout")),
            registry
        )
        .expect("failed to register verify_duration_ms histogram");

        Self {
            registry,
            submissions,
            accepted,
            rejected,
            check_failures,
            degraded_checks,
            verify_duration_ms,
        }
    }

    /// Record a finished verification.
    pub fn observe_verdict(&self, verdict: &VerificationVerdict, elapsed_ms: f64) {
        self.submissions.inc();
        if verdict.passed {
            self.accepted.inc();
        } else {
            self.rejected.inc();
        }
        for kind in verdict.checks.failed() {
            self.check_failures.with_label_values(&[kind.as_str()]).inc();
        }
        self.verify_duration_ms.observe(elapsed_ms);
    }

    pub fn record_degraded(&self, kind: CheckKind) {
        self.degraded_checks.with_label_values(&[kind.as_str()]).inc();
    }

    /// Render every metric in the Prometheus text exposition format.
    pub fn encode(&self) -> String {
        TextEncoder::new()
            .encode_to_string(&self.registry.gather())
            .unwrap_or_default()
    }
}

impl Default for VerificationMetrics {
    fn default() -> Self {
        Self::new()
    }
}
