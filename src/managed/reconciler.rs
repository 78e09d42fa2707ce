//! # Reconciler
//!
//! Finalizer-driven reconcile flow shared by every managed resource kind.
//!
//! Apply: initialize the external name, connect, observe, then create or
//! update. Cleanup: connect, observe, delete, and release the finalizer.
//! Every pass records `Ready` and `Synced` conditions in the status.

use super::error::{error_chain, ManagedError, ReconcilerError};
use super::status::{persist_status, KubeResourceWriter, ResourceWriter};
use super::{Connector, Managed};
use crate::config::ControllerConfig;
use crate::constants::MANAGED_FINALIZER;
use crate::controller::backoff::FibonacciBackoff;
use crate::crd::{external_name, get_external_name, set_external_name, Condition, ConditionedStatus, DeletionPolicy};
use crate::observability::metrics;
use kube::api::Api;
use kube::{Client, ResourceExt};
use kube_runtime::controller::Action;
use kube_runtime::finalizer::{finalizer, Event};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Per-resource error backoff
#[derive(Debug, Clone)]
pub struct BackoffState {
    pub backoff: FibonacciBackoff,
    pub error_count: u32,
}

impl BackoffState {
    #[must_use]
    pub fn new(min_secs: u64, max_secs: u64) -> Self {
        Self {
            backoff: FibonacciBackoff::new(min_secs, max_secs),
            error_count: 0,
        }
    }

    pub fn increment_error(&mut self) {
        self.error_count = self.error_count.saturating_add(1);
    }
}

/// Shared state handed to every reconcile of one kind
pub struct Context<R: Managed> {
    pub client: Client,
    pub connector: Arc<dyn Connector<R>>,
    pub config: Arc<ControllerConfig>,
    /// Keyed by [`Context::backoff_key`]
    pub backoff_states: Arc<Mutex<HashMap<String, BackoffState>>>,
}

impl<R: Managed> std::fmt::Debug for Context<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("kind", &R::kind(&()))
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<R: Managed> Context<R> {
    #[must_use]
    pub fn new(client: Client, connector: Arc<dyn Connector<R>>, config: Arc<ControllerConfig>) -> Self {
        Self {
            client,
            connector,
            config,
            backoff_states: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    fn writer(&self) -> KubeResourceWriter<R> {
        KubeResourceWriter::new(Api::all(self.client.clone()))
    }

    /// `<kind>/<name>`
    #[must_use]
    pub fn backoff_key(name: &str) -> String {
        format!("{}/{name}", R::kind(&()))
    }

    /// Forget the error backoff of a resource after it reconciled cleanly
    pub fn reset_backoff(&self, name: &str) {
        if let Ok(mut states) = self.backoff_states.lock() {
            states.remove(&Self::backoff_key(name));
        }
    }
}

/// Outcome of a successful apply pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncOutcome {
    pub requeue_after: Duration,
    pub created: bool,
}

/// Reconcile one managed resource
///
/// # Errors
/// Returns the failing step; the error policy decides when to retry.
pub async fn reconcile<R: Managed>(
    obj: Arc<R>,
    ctx: Arc<Context<R>>,
) -> Result<Action, ReconcilerError> {
    let kind = R::kind(&()).to_string();
    let start = Instant::now();
    metrics::increment_reconciliations(&kind);

    let api: Api<R> = Api::all(ctx.client.clone());
    let writer = ctx.writer();
    let (writer_ref, ctx_ref) = (&writer, ctx.as_ref());
    let result = finalizer(&api, MANAGED_FINALIZER, obj, |event| async move {
        match event {
            Event::Apply(mr) => {
                apply(writer_ref, ctx_ref.connector.as_ref(), &ctx_ref.config, &mr).await
            }
            Event::Cleanup(mr) => cleanup(writer_ref, ctx_ref.connector.as_ref(), &mr).await,
        }
    })
    .await
    .map_err(ReconcilerError::from);

    metrics::observe_reconciliation_duration(&kind, start.elapsed().as_secs_f64());
    result
}

/// External name to write when the annotation is missing
fn initial_external_name<R: Managed>(mr: &R) -> Option<String> {
    external_name(mr).is_none().then(|| mr.name_any())
}

/// Whether deleting the resource leaves the GitHub object in place
fn is_orphaned<R: Managed>(mr: &R) -> bool {
    mr.resource_spec().deletion_policy == DeletionPolicy::Orphan
}

pub(crate) async fn apply<R: Managed>(
    writer: &dyn ResourceWriter<R>,
    connector: &dyn Connector<R>,
    config: &ControllerConfig,
    obj: &R,
) -> Result<Action, ManagedError> {
    let mut mr = obj.clone();
    let previous = obj.managed_status().cloned();

    if let Some(name) = initial_external_name(&mr) {
        set_external_name(&mut mr, &name);
        writer
            .patch_external_name(&mr, &name)
            .await
            .map_err(ManagedError::ExternalName)?;
        debug!(resource.name = %name, "external_name.initialized");
    }

    match converge(writer, connector, config, &mut mr).await {
        Ok(outcome) => {
            mr.managed_status_mut()
                .set_condition(Condition::reconcile_success());
            persist_status(writer, &mr, previous.as_ref())
                .await
                .map_err(ManagedError::Status)?;
            Ok(Action::requeue(outcome.requeue_after))
        }
        Err(error) => {
            record_failure(writer, &mut mr, previous.as_ref(), &error).await;
            Err(error)
        }
    }
}

/// Sync the external object and persist an external name assigned on create
async fn converge<R: Managed>(
    writer: &dyn ResourceWriter<R>,
    connector: &dyn Connector<R>,
    config: &ControllerConfig,
    mr: &mut R,
) -> Result<SyncOutcome, ManagedError> {
    let requested_name = get_external_name(mr);
    let outcome = sync_external(connector, mr, config).await?;

    let current_name = get_external_name(mr);
    if current_name != requested_name {
        writer
            .patch_external_name(mr, &current_name)
            .await
            .map_err(ManagedError::ExternalName)?;
        info!(
            resource.name = %mr.name_any(),
            external_name = %current_name,
            "external name updated"
        );
    }
    Ok(outcome)
}

pub(crate) async fn cleanup<R: Managed>(
    writer: &dyn ResourceWriter<R>,
    connector: &dyn Connector<R>,
    obj: &R,
) -> Result<Action, ManagedError> {
    let mut mr = obj.clone();
    let previous = obj.managed_status().cloned();
    mr.managed_status_mut().set_condition(Condition::deleting());

    if is_orphaned(&mr) {
        info!(
            resource.kind = %R::kind(&()),
            resource.name = %mr.name_any(),
            "deletion policy is Orphan, leaving external resource in place"
        );
    } else if let Err(error) = delete_external(connector, &mut mr).await {
        record_failure(writer, &mut mr, previous.as_ref(), &error).await;
        return Err(error);
    }

    // The object is about to go away, a failed status write must not block it
    if let Err(e) = persist_status(writer, &mr, previous.as_ref()).await {
        debug!(resource.name = %mr.name_any(), error = %e, "status.patch_skipped");
    }
    Ok(Action::await_change())
}

/// Best-effort `Synced=False` with the full error chain
///
/// Observed fields recorded before the failure are persisted too.
async fn record_failure<R: Managed>(
    writer: &dyn ResourceWriter<R>,
    mr: &mut R,
    previous: Option<&R::Status>,
    error: &ManagedError,
) {
    mr.managed_status_mut()
        .set_condition(Condition::reconcile_error(error_chain(error)));
    if let Err(e) = persist_status(writer, mr, previous).await {
        warn!(
            resource.name = %mr.name_any(),
            error = %e,
            "Failed to record reconcile error in status"
        );
    }
}

fn tracked<T>(kind: &str, operation: &str, result: anyhow::Result<T>) -> anyhow::Result<T> {
    metrics::record_external_operation(kind, operation, result.is_ok());
    result
}

/// Connect, observe, then create or update the external object
///
/// Status conditions and the external name are updated on `mr` in memory.
///
/// # Errors
/// Returns the first step that failed.
pub async fn sync_external<R: Managed>(
    connector: &dyn Connector<R>,
    mr: &mut R,
    config: &ControllerConfig,
) -> Result<SyncOutcome, ManagedError> {
    let kind = R::kind(&()).to_string();
    let external = connector.connect(mr).await?;

    let observation =
        tracked(&kind, "observe", external.observe(mr).await).map_err(ManagedError::Observe)?;

    if !observation.resource_exists {
        let creation =
            tracked(&kind, "create", external.create(mr).await).map_err(ManagedError::Create)?;
        info!(
            resource.kind = %kind,
            resource.name = %mr.name_any(),
            external_name = %get_external_name(mr),
            "external resource created"
        );
        if let Some(name) = creation.external_name {
            set_external_name(mr, &name);
        }
        mr.managed_status_mut().set_condition(Condition::creating());
        return Ok(SyncOutcome {
            requeue_after: config.short_wait_duration(),
            created: true,
        });
    }

    mr.managed_status_mut().set_condition(Condition::available());

    if !observation.resource_up_to_date {
        tracked(&kind, "update", external.update(mr).await).map_err(ManagedError::Update)?;
        info!(
            resource.kind = %kind,
            resource.name = %mr.name_any(),
            "external resource updated"
        );
    }

    Ok(SyncOutcome {
        requeue_after: config.poll_interval_duration(),
        created: false,
    })
}

/// Connect, observe, and delete the external object if it still exists
///
/// # Errors
/// Returns the first step that failed.
pub async fn delete_external<R: Managed>(
    connector: &dyn Connector<R>,
    mr: &mut R,
) -> Result<(), ManagedError> {
    let kind = R::kind(&()).to_string();
    let external = connector.connect(mr).await?;

    let observation =
        tracked(&kind, "observe", external.observe(mr).await).map_err(ManagedError::Observe)?;
    if !observation.resource_exists {
        debug!(resource.name = %mr.name_any(), "external resource already gone");
        return Ok(());
    }

    tracked(&kind, "delete", external.delete(mr).await).map_err(ManagedError::Delete)?;
    info!(
        resource.kind = %kind,
        resource.name = %mr.name_any(),
        "external resource deleted"
    );
    Ok(())
}
