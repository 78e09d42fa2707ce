//! # Connector
//!
//! Resolves the GitHub token for a managed resource:
//! ProviderConfig → credentials Secret → [`TeamsService`].

use super::usage::{usage_for, UsageTracker};
use super::Managed;
use crate::crd::{ProviderConfig, SecretKeySelector};
use crate::github::{GitHubClient, GitHubError, TeamsService};
use async_trait::async_trait;
use k8s_openapi::api::core::v1::Secret;
use kube::api::Api;
use kube::Client;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;
use zeroize::Zeroizing;

/// Connect failures, one per step
#[derive(Debug, Error)]
pub enum ConnectError {
    #[error("cannot track ProviderConfig usage")]
    TrackUsage(#[source] kube::Error),

    #[error("cannot get ProviderConfig")]
    GetProviderConfig(#[source] kube::Error),

    #[error("ProviderConfig does not reference a credentials Secret")]
    NoSecretRef,

    #[error("cannot get credentials Secret")]
    GetSecret(#[source] kube::Error),

    #[error("cannot create new Service")]
    NewService(#[source] GitHubError),
}

/// Read access to the objects holding credentials
#[async_trait]
pub trait CredentialsReader: Send + Sync {
    async fn get_provider_config(&self, name: &str) -> Result<ProviderConfig, kube::Error>;

    async fn get_secret(&self, namespace: &str, name: &str) -> Result<Secret, kube::Error>;
}

/// [`CredentialsReader`] backed by the Kubernetes API
#[derive(Clone)]
pub struct KubeCredentials {
    client: Client,
}

impl std::fmt::Debug for KubeCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KubeCredentials").finish_non_exhaustive()
    }
}

impl KubeCredentials {
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CredentialsReader for KubeCredentials {
    async fn get_provider_config(&self, name: &str) -> Result<ProviderConfig, kube::Error> {
        let api: Api<ProviderConfig> = Api::all(self.client.clone());
        api.get(name).await
    }

    async fn get_secret(&self, namespace: &str, name: &str) -> Result<Secret, kube::Error> {
        let api: Api<Secret> = Api::namespaced(self.client.clone(), namespace);
        api.get(name).await
    }
}

/// Builds a GitHub service from a token and an API base URL
pub type ServiceFactory =
    Arc<dyn Fn(&str, &str) -> Result<Arc<dyn TeamsService>, GitHubError> + Send + Sync>;

fn new_github_service(token: &str, base_url: &str) -> Result<Arc<dyn TeamsService>, GitHubError> {
    Ok(Arc::new(GitHubClient::new(token, base_url)?))
}

/// Connects managed resources to GitHub using the credentials of their ProviderConfig
pub struct GitHubConnector {
    credentials: Arc<dyn CredentialsReader>,
    usage: Arc<dyn UsageTracker>,
    default_base_url: String,
    new_service: ServiceFactory,
}

impl std::fmt::Debug for GitHubConnector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubConnector")
            .field("default_base_url", &self.default_base_url)
            .finish_non_exhaustive()
    }
}

impl GitHubConnector {
    /// Connector reading credentials from the cluster and talking to GitHub over REST
    #[must_use]
    pub fn new(client: Client, default_base_url: &str) -> Self {
        Self::with_parts(
            Arc::new(KubeCredentials::new(client.clone())),
            Arc::new(super::ProviderConfigUsageTracker::new(client)),
            default_base_url,
            Arc::new(new_github_service),
        )
    }

    #[must_use]
    pub fn with_parts(
        credentials: Arc<dyn CredentialsReader>,
        usage: Arc<dyn UsageTracker>,
        default_base_url: &str,
        new_service: ServiceFactory,
    ) -> Self {
        Self {
            credentials,
            usage,
            default_base_url: default_base_url.to_string(),
            new_service,
        }
    }

    /// Resolve credentials for `mr` and build a GitHub service
    ///
    /// # Errors
    /// Returns the [`ConnectError`] of the first step that failed.
    pub async fn connect_service<R: Managed>(
        &self,
        mr: &R,
    ) -> Result<Arc<dyn TeamsService>, ConnectError> {
        self.usage
            .track(&usage_for(mr))
            .await
            .map_err(ConnectError::TrackUsage)?;

        let pc_name = mr.resource_spec().provider_config_name();
        let pc = self
            .credentials
            .get_provider_config(pc_name)
            .await
            .map_err(ConnectError::GetProviderConfig)?;

        let secret_ref = pc
            .spec
            .credentials_secret()
            .ok_or(ConnectError::NoSecretRef)?;

        let secret = self
            .credentials
            .get_secret(&secret_ref.namespace, &secret_ref.name)
            .await
            .map_err(ConnectError::GetSecret)?;

        let token = secret_value(&secret, secret_ref);
        let base_url = pc
            .spec
            .base_url
            .as_deref()
            .unwrap_or(&self.default_base_url);

        debug!(
            provider_config = pc_name,
            secret.namespace = %secret_ref.namespace,
            secret.name = %secret_ref.name,
            base_url = base_url,
            "connector.credentials_resolved"
        );

        (self.new_service)(token.as_str(), base_url).map_err(ConnectError::NewService)
    }
}

/// Value of the referenced key
///
/// A missing key or a value that is not UTF-8 yields an empty token.
fn secret_value(secret: &Secret, selector: &SecretKeySelector) -> Zeroizing<String> {
    let token = secret
        .data
        .as_ref()
        .and_then(|data| data.get(&selector.key))
        .and_then(|value| std::str::from_utf8(&value.0).ok())
        .unwrap_or_default();
    Zeroizing::new(token.to_string())
}
