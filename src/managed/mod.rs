//! # Managed Resources
//!
//! The contract between the generic reconcile flow and the per-kind GitHub
//! adapters.
//!
//! A managed resource is a custom resource describing desired state of an
//! object that lives outside the cluster. For every kind the flow is:
//!
//! 1. [`Connector::connect`] resolves credentials and returns an [`ExternalClient`]
//! 2. [`ExternalClient::observe`] reports whether the external object exists and matches the spec
//! 3. [`ExternalClient::create`] / [`ExternalClient::update`] converge it
//! 4. on deletion, [`ExternalClient::delete`] removes it before the finalizer is released
//!
//! ## Module Structure
//!
//! - `connector.rs` - Credential resolution from ProviderConfig and Secret
//! - `usage.rs` - ProviderConfigUsage tracking
//! - `reconciler.rs` - Finalizer-driven reconcile flow shared by all kinds
//! - `status.rs` - Status and annotation persistence behind [`ResourceWriter`]
//! - `error.rs` - Error types surfaced to the controller runtime

pub(crate) mod connector;
mod error;
mod reconciler;
mod status;
mod usage;

pub use connector::{
    ConnectError, CredentialsReader, GitHubConnector, KubeCredentials, ServiceFactory,
};
pub use error::{error_chain, ManagedError, ReconcilerError};
pub use reconciler::{delete_external, reconcile, sync_external, BackoffState, Context, SyncOutcome};
pub use status::{KubeResourceWriter, ResourceWriter};
pub use usage::{usage_for, ProviderConfigUsageTracker, UsageTracker};

use crate::crd::{ConditionedStatus, ResourceSpec};
use async_trait::async_trait;
use kube::Resource;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// A custom resource reconciled against an external system
pub trait Managed:
    Resource<DynamicType = ()>
    + Clone
    + std::fmt::Debug
    + Serialize
    + DeserializeOwned
    + Send
    + Sync
    + 'static
{
    type Status: ConditionedStatus
        + Default
        + Clone
        + PartialEq
        + std::fmt::Debug
        + Serialize
        + Send
        + Sync;

    fn resource_spec(&self) -> &ResourceSpec;

    fn managed_status(&self) -> Option<&Self::Status>;

    /// Status, created empty when missing
    fn managed_status_mut(&mut self) -> &mut Self::Status;
}

/// Result of observing the external object
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExternalObservation {
    pub resource_exists: bool,
    pub resource_up_to_date: bool,
}

impl ExternalObservation {
    /// The external object does not exist
    #[must_use]
    pub fn missing() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn exists(up_to_date: bool) -> Self {
        Self {
            resource_exists: true,
            resource_up_to_date: up_to_date,
        }
    }
}

/// Result of creating the external object
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExternalCreation {
    /// Identifier assigned by the external system, when it differs from the requested one
    pub external_name: Option<String>,
}

/// Operations on one external object, bound to a set of credentials
#[async_trait]
pub trait ExternalClient<R: Managed>: Send + Sync {
    /// Look the object up and record observed fields in the resource status
    ///
    /// A missing object is reported through [`ExternalObservation::missing`], not as an error.
    async fn observe(&self, mr: &mut R) -> anyhow::Result<ExternalObservation>;

    /// Create the object, recording what GitHub returned in the resource status
    async fn create(&self, mr: &mut R) -> anyhow::Result<ExternalCreation>;

    async fn update(&self, mr: &R) -> anyhow::Result<()>;

    async fn delete(&self, mr: &R) -> anyhow::Result<()>;
}

/// Produces an [`ExternalClient`] for a managed resource
#[async_trait]
pub trait Connector<R: Managed>: Send + Sync {
    async fn connect(&self, mr: &R) -> Result<Box<dyn ExternalClient<R>>, ConnectError>;
}
