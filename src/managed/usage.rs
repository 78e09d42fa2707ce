//! # ProviderConfig Usage
//!
//! Records which managed resources depend on which ProviderConfig.

use super::Managed;
use crate::constants::FIELD_MANAGER;
use crate::crd::{ProviderConfigReference, ProviderConfigUsage, ProviderConfigUsageSpec, TypedReference};
use async_trait::async_trait;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::OwnerReference;
use kube::api::{Api, Patch, PatchParams};
use kube::{Client, ResourceExt};
use std::collections::BTreeMap;

/// Label carrying the ProviderConfig name on every usage
pub const PROVIDER_CONFIG_LABEL: &str = "crossplane.io/provider-config";

#[async_trait]
pub trait UsageTracker: Send + Sync {
    /// Create or refresh the usage record
    async fn track(&self, usage: &ProviderConfigUsage) -> Result<(), kube::Error>;
}

/// Applies ProviderConfigUsage objects with server-side apply
#[derive(Clone)]
pub struct ProviderConfigUsageTracker {
    api: Api<ProviderConfigUsage>,
}

impl std::fmt::Debug for ProviderConfigUsageTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfigUsageTracker").finish_non_exhaustive()
    }
}

impl ProviderConfigUsageTracker {
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self {
            api: Api::all(client),
        }
    }
}

#[async_trait]
impl UsageTracker for ProviderConfigUsageTracker {
    async fn track(&self, usage: &ProviderConfigUsage) -> Result<(), kube::Error> {
        let params = PatchParams::apply(FIELD_MANAGER).force();
        self.api
            .patch(&usage.name_any(), &params, &Patch::Apply(usage))
            .await
            .map(|_| ())
    }
}

/// Usage record for `mr`, named after its UID and owned by it
pub fn usage_for<R: Managed>(mr: &R) -> ProviderConfigUsage {
    let kind = R::kind(&()).to_string();
    let name = mr.name_any();
    let uid = mr.meta().uid.clone();
    let pc_name = mr.resource_spec().provider_config_name().to_string();

    let usage_name = uid
        .clone()
        .unwrap_or_else(|| format!("{}-{}", kind.to_lowercase(), name));

    let mut usage = ProviderConfigUsage::new(
        &usage_name,
        ProviderConfigUsageSpec {
            provider_config_ref: ProviderConfigReference {
                name: pc_name.clone(),
            },
            resource_ref: TypedReference {
                api_version: R::api_version(&()).to_string(),
                kind: kind.clone(),
                name: name.clone(),
                uid: uid.clone(),
            },
        },
    );
    usage.metadata.labels = Some(BTreeMap::from([(
        PROVIDER_CONFIG_LABEL.to_string(),
        pc_name,
    )]));
    // Garbage-collected with the managed resource
    if let Some(uid) = uid {
        usage.metadata.owner_references = Some(vec![OwnerReference {
            api_version: R::api_version(&()).to_string(),
            kind,
            name,
            uid,
            controller: Some(true),
            block_owner_deletion: Some(true),
        }]);
    }
    usage
}
