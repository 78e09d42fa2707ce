//! # ProviderConfig
//!
//! Cluster-scoped configuration telling the controller how to reach GitHub,
//! and the usage records linking managed resources to it.

use crate::crd::ProviderConfigReference;
use serde::{Deserialize, Serialize};

/// ProviderConfig Custom Resource Definition
///
/// # Example
///
/// ```yaml
/// apiVersion: github.crossplane.io/v1alpha1
/// kind: ProviderConfig
/// metadata:
///   name: default
/// spec:
///   credentials:
///     source: Secret
///     secretRef:
///       namespace: crossplane-system
///       name: github-credentials
///       key: token
/// ```
#[derive(kube::CustomResource, Debug, Clone, Deserialize, Serialize, schemars::JsonSchema)]
#[kube(
    kind = "ProviderConfig",
    group = "github.crossplane.io",
    version = "v1alpha1",
    shortname = "ghpc",
    printcolumn = r#"{"name":"Source", "type":"string", "jsonPath":".spec.credentials.source"}, {"name":"Secret", "type":"string", "jsonPath":".spec.credentials.secretRef.name", "priority": 1}"#
)]
#[serde(rename_all = "camelCase")]
pub struct ProviderConfigSpec {
    /// Credentials used to authenticate against the GitHub API
    pub credentials: ProviderCredentials,
    /// GitHub API base URL, for GitHub Enterprise Server
    /// Defaults to the controller-wide `GITHUB_API_URL`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProviderCredentials {
    #[serde(default)]
    pub source: CredentialsSource,
    /// Secret key holding a GitHub personal access token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_ref: Option<SecretKeySelector>,
}

/// Where credentials are read from
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, schemars::JsonSchema,
)]
pub enum CredentialsSource {
    #[default]
    Secret,
    None,
}

/// A key within a namespaced Secret
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SecretKeySelector {
    pub namespace: String,
    pub name: String,
    pub key: String,
}

impl ProviderConfigSpec {
    /// Secret reference, when credentials come from a Secret
    #[must_use]
    pub fn credentials_secret(&self) -> Option<&SecretKeySelector> {
        match self.credentials.source {
            CredentialsSource::Secret => self.credentials.secret_ref.as_ref(),
            CredentialsSource::None => None,
        }
    }
}

/// ProviderConfigUsage Custom Resource Definition
///
/// Records that a managed resource depends on a ProviderConfig. Owned by the
/// managed resource so it disappears with it.
#[derive(kube::CustomResource, Debug, Clone, PartialEq, Deserialize, Serialize, schemars::JsonSchema)]
#[kube(
    kind = "ProviderConfigUsage",
    group = "github.crossplane.io",
    version = "v1alpha1",
    printcolumn = r#"{"name":"Config", "type":"string", "jsonPath":".spec.providerConfigRef.name"}, {"name":"Resource-Kind", "type":"string", "jsonPath":".spec.resourceRef.kind"}, {"name":"Resource-Name", "type":"string", "jsonPath":".spec.resourceRef.name"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct ProviderConfigUsageSpec {
    pub provider_config_ref: ProviderConfigReference,
    pub resource_ref: TypedReference,
}

/// Reference to an object of a specific kind
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TypedReference {
    pub api_version: String,
    pub kind: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
}
