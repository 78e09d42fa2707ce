//! Persistence of status and external-name changes.

use super::Managed;
use crate::constants::{EXTERNAL_NAME_ANNOTATION, FIELD_MANAGER};
use async_trait::async_trait;
use kube::api::{Api, Patch, PatchParams};
use kube::ResourceExt;
use serde_json::json;
use tracing::debug;

/// Writes managed resource changes back to the cluster
#[async_trait]
pub trait ResourceWriter<R: Managed>: Send + Sync {
    /// Persist the external-name annotation
    async fn patch_external_name(&self, mr: &R, external_name: &str) -> Result<(), kube::Error>;

    /// Persist the status subresource
    async fn patch_status(&self, mr: &R) -> Result<(), kube::Error>;
}

/// [`ResourceWriter`] using merge patches against the Kubernetes API
pub struct KubeResourceWriter<R: Managed> {
    api: Api<R>,
}

impl<R: Managed> std::fmt::Debug for KubeResourceWriter<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KubeResourceWriter")
            .field("kind", &R::kind(&()))
            .finish_non_exhaustive()
    }
}

impl<R: Managed> KubeResourceWriter<R> {
    #[must_use]
    pub fn new(api: Api<R>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl<R: Managed> ResourceWriter<R> for KubeResourceWriter<R> {
    async fn patch_external_name(&self, mr: &R, external_name: &str) -> Result<(), kube::Error> {
        let patch = json!({
            "metadata": {
                "annotations": {
                    EXTERNAL_NAME_ANNOTATION: external_name
                }
            }
        });
        self.api
            .patch(&mr.name_any(), &PatchParams::default(), &Patch::Merge(&patch))
            .await
            .map(|_| ())
    }

    async fn patch_status(&self, mr: &R) -> Result<(), kube::Error> {
        let patch = json!({ "status": mr.managed_status() });
        self.api
            .patch_status(
                &mr.name_any(),
                &PatchParams::apply(FIELD_MANAGER),
                &Patch::Merge(&patch),
            )
            .await
            .map(|_| ())
    }
}

/// Whether the status of `mr` differs from `previous`
pub(crate) fn status_changed<R: Managed>(mr: &R, previous: Option<&R::Status>) -> bool {
    match mr.managed_status() {
        Some(status) => previous != Some(status),
        None => false,
    }
}

/// Patch the status when it differs from `previous`
///
/// Returns whether a patch was sent.
pub(crate) async fn persist_status<R: Managed>(
    writer: &dyn ResourceWriter<R>,
    mr: &R,
    previous: Option<&R::Status>,
) -> Result<bool, kube::Error> {
    if !status_changed(mr, previous) {
        debug!(resource.name = %mr.name_any(), "status.unchanged");
        return Ok(false);
    }
    writer.patch_status(mr).await?;
    Ok(true)
}
