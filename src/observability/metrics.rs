//! # Metrics
//!
//! Prometheus metrics for monitoring the controller.
//!
//! ## Metrics Exposed
//!
//! - `provider_github_reconciliations_total{kind}` - Total number of reconciliations
//! - `provider_github_reconciliation_errors_total{kind}` - Total number of failed reconciliations
//! - `provider_github_reconciliation_duration_seconds{kind}` - Duration of reconciliations
//! - `provider_github_requeues_total{reason}` - Requeues scheduled by the controller
//! - `provider_github_external_operations_total{kind,operation}` - Observe/create/update/delete calls
//! - `provider_github_external_operation_errors_total{kind,operation}` - Failed external calls
//! - `provider_github_api_requests_total{method,status}` - GitHub REST requests by response status
//! - `provider_github_api_request_duration_seconds{method}` - GitHub REST request latency

use anyhow::Result;
use prometheus::{HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry};
use std::sync::LazyLock;

pub(crate) static REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::new);

static RECONCILIATIONS_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        Opts::new(
            "provider_github_reconciliations_total",
            "Total number of reconciliations by resource kind",
        ),
        &["kind"],
    )
    .expect("Failed to create RECONCILIATIONS_TOTAL metric - this should never happen")
});

static RECONCILIATION_ERRORS_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        Opts::new(
            "provider_github_reconciliation_errors_total",
            "Total number of reconciliation errors by resource kind",
        ),
        &["kind"],
    )
    .expect("Failed to create RECONCILIATION_ERRORS_TOTAL metric - this should never happen")
});

static RECONCILIATION_DURATION: LazyLock<HistogramVec> = LazyLock::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "provider_github_reconciliation_duration_seconds",
            "Duration of reconciliation in seconds",
        )
        .buckets(vec![0.05, 0.1, 0.5, 1.0, 2.0, 5.0, 10.0]),
        &["kind"],
    )
    .expect("Failed to create RECONCILIATION_DURATION metric - this should never happen")
});

static REQUEUES_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        Opts::new(
            "provider_github_requeues_total",
            "Total number of requeues by reason",
        ),
        &["reason"],
    )
    .expect("Failed to create REQUEUES_TOTAL metric - this should never happen")
});

static EXTERNAL_OPERATIONS_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        Opts::new(
            "provider_github_external_operations_total",
            "Total number of external resource operations",
        ),
        &["kind", "operation"],
    )
    .expect("Failed to create EXTERNAL_OPERATIONS_TOTAL metric - this should never happen")
});

static EXTERNAL_OPERATION_ERRORS_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        Opts::new(
            "provider_github_external_operation_errors_total",
            "Total number of failed external resource operations",
        ),
        &["kind", "operation"],
    )
    .expect("Failed to create EXTERNAL_OPERATION_ERRORS_TOTAL metric - this should never happen")
});

static GITHUB_REQUESTS_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        Opts::new(
            "provider_github_api_requests_total",
            "Total number of GitHub API requests by method and response status",
        ),
        &["method", "status"],
    )
    .expect("Failed to create GITHUB_REQUESTS_TOTAL metric - this should never happen")
});

static GITHUB_REQUEST_DURATION: LazyLock<HistogramVec> = LazyLock::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "provider_github_api_request_duration_seconds",
            "Duration of GitHub API requests in seconds",
        )
        .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0]),
        &["method"],
    )
    .expect("Failed to create GITHUB_REQUEST_DURATION metric - this should never happen")
});

pub fn register_metrics() -> Result<()> {
    REGISTRY.register(Box::new(RECONCILIATIONS_TOTAL.clone()))?;
    REGISTRY.register(Box::new(RECONCILIATION_ERRORS_TOTAL.clone()))?;
    REGISTRY.register(Box::new(RECONCILIATION_DURATION.clone()))?;
    REGISTRY.register(Box::new(REQUEUES_TOTAL.clone()))?;
    REGISTRY.register(Box::new(EXTERNAL_OPERATIONS_TOTAL.clone()))?;
    REGISTRY.register(Box::new(EXTERNAL_OPERATION_ERRORS_TOTAL.clone()))?;
    REGISTRY.register(Box::new(GITHUB_REQUESTS_TOTAL.clone()))?;
    REGISTRY.register(Box::new(GITHUB_REQUEST_DURATION.clone()))?;

    Ok(())
}

pub fn increment_reconciliations(kind: &str) {
    RECONCILIATIONS_TOTAL.with_label_values(&[kind]).inc();
}

pub fn increment_reconciliation_errors(kind: &str) {
    RECONCILIATION_ERRORS_TOTAL.with_label_values(&[kind]).inc();
}

pub fn observe_reconciliation_duration(kind: &str, duration: f64) {
    RECONCILIATION_DURATION
        .with_label_values(&[kind])
        .observe(duration);
}

pub fn increment_requeues_total(reason: &str) {
    REQUEUES_TOTAL.with_label_values(&[reason]).inc();
}

/// Record an observe/create/update/delete call against GitHub
pub fn record_external_operation(kind: &str, operation: &str, success: bool) {
    EXTERNAL_OPERATIONS_TOTAL
        .with_label_values(&[kind, operation])
        .inc();
    if !success {
        EXTERNAL_OPERATION_ERRORS_TOTAL
            .with_label_values(&[kind, operation])
            .inc();
    }
}

/// Record a GitHub REST request; `status` is the HTTP status or `error` for transport failures
pub fn record_github_request(method: &str, status: &str, duration: f64) {
    GITHUB_REQUESTS_TOTAL
        .with_label_values(&[method, status])
        .inc();
    GITHUB_REQUEST_DURATION
        .with_label_values(&[method])
        .observe(duration);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labelled_counters_accumulate() {
        let before = EXTERNAL_OPERATION_ERRORS_TOTAL
            .with_label_values(&["Team", "observe"])
            .get();
        record_external_operation("Team", "observe", true);
        record_external_operation("Team", "observe", false);

        assert_eq!(
            EXTERNAL_OPERATION_ERRORS_TOTAL
                .with_label_values(&["Team", "observe"])
                .get(),
            before + 1
        );
    }
}
