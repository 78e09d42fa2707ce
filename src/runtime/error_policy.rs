//! # Error Policy
//!
//! Decides when a resource whose reconcile failed is retried.
//!
//! Backoff is tracked per resource so one failing resource never delays
//! the others.

use crate::managed::{error_chain, BackoffState, Context, Managed, ReconcilerError};
use crate::observability::metrics;
use kube::ResourceExt;
use kube_runtime::controller::Action;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

/// Requeue a failed resource after its next Fibonacci backoff
pub fn error_policy<R: Managed>(
    obj: Arc<R>,
    error: &ReconcilerError,
    ctx: Arc<Context<R>>,
) -> Action {
    let kind = R::kind(&()).to_string();
    let name = obj.name_any();

    let error_span = tracing::span!(
        tracing::Level::ERROR,
        "controller.reconciliation_error",
        resource.kind = %kind,
        resource.name = %name
    );
    let _error_guard = error_span.enter();

    error!("Reconciliation error for {}: {}", name, error_chain(error));
    metrics::increment_reconciliation_errors(&kind);

    let (backoff_seconds, error_count) = match ctx.backoff_states.lock() {
        Ok(mut states) => {
            let state = states.entry(Context::<R>::backoff_key(&name)).or_insert_with(|| {
                BackoffState::new(ctx.config.backoff_min_secs, ctx.config.backoff_max_secs)
            });
            state.increment_error();
            (state.backoff.next_backoff_seconds(), state.error_count)
        }
        Err(e) => {
            warn!("Failed to lock backoff_states: {}, using maximum backoff", e);
            (ctx.config.backoff_max_secs, 0)
        }
    };

    let next_trigger_time = chrono::Utc::now()
        + chrono::Duration::seconds(i64::try_from(backoff_seconds).unwrap_or(i64::MAX));
    info!(
        "Retrying {} in {}s (error count: {}, next attempt at {})",
        name,
        backoff_seconds,
        error_count,
        next_trigger_time.to_rfc3339()
    );

    metrics::increment_requeues_total("error-backoff");
    Action::requeue(Duration::from_secs(backoff_seconds))
}
