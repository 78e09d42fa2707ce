//! Errors surfaced by the reconcile flow.

use super::ConnectError;
use kube_runtime::finalizer;
use thiserror::Error;

/// Failure of one reconcile step
///
/// Adapter errors keep their own static message, so they are transparent here.
#[derive(Debug, Error)]
pub enum ManagedError {
    #[error("cannot update managed resource external name")]
    ExternalName(#[source] kube::Error),

    #[error(transparent)]
    Connect(#[from] ConnectError),

    #[error(transparent)]
    Observe(anyhow::Error),

    #[error(transparent)]
    Create(anyhow::Error),

    #[error(transparent)]
    Update(anyhow::Error),

    #[error(transparent)]
    Delete(anyhow::Error),

    #[error("cannot update managed resource status")]
    Status(#[source] kube::Error),
}

impl ManagedError {
    /// Reconcile step that failed, for logs and metrics
    #[must_use]
    pub fn step(&self) -> &'static str {
        match self {
            Self::ExternalName(_) => "external-name",
            Self::Connect(_) => "connect",
            Self::Observe(_) => "observe",
            Self::Create(_) => "create",
            Self::Update(_) => "update",
            Self::Delete(_) => "delete",
            Self::Status(_) => "status",
        }
    }
}

/// Error returned to the controller runtime
#[derive(Debug, Error)]
pub enum ReconcilerError {
    #[error(transparent)]
    Managed(#[from] ManagedError),

    #[error("finalizer error")]
    Finalizer(#[source] Box<finalizer::Error<ManagedError>>),
}

impl From<finalizer::Error<ManagedError>> for ReconcilerError {
    fn from(error: finalizer::Error<ManagedError>) -> Self {
        match error {
            finalizer::Error::ApplyFailed(e) | finalizer::Error::CleanupFailed(e) => {
                Self::Managed(e)
            }
            other => Self::Finalizer(Box::new(other)),
        }
    }
}

/// Render an error and all its sources as `outer: inner: root`
pub fn error_chain(error: &(dyn std::error::Error + 'static)) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.ends_with(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context as _;

    #[test]
    fn test_error_chain_joins_sources() {
        let inner: anyhow::Result<()> = Err(anyhow::anyhow!("GitHub API returned 500: boom"));
        let err = ManagedError::Observe(inner.context("cannot get Team").unwrap_err());
        assert_eq!(
            error_chain(&err),
            "cannot get Team: GitHub API returned 500: boom"
        );
        assert_eq!(err.step(), "observe");
    }

    #[test]
    fn test_connect_error_keeps_fixed_message() {
        let err = ManagedError::from(ConnectError::NoSecretRef);
        assert_eq!(
            err.to_string(),
            "ProviderConfig does not reference a credentials Secret"
        );
        assert_eq!(err.step(), "connect");
    }

    #[test]
    fn test_finalizer_apply_failure_unwraps() {
        let err = ReconcilerError::from(finalizer::Error::ApplyFailed(ManagedError::from(
            ConnectError::NoSecretRef,
        )));
        assert!(matches!(err, ReconcilerError::Managed(_)));

        let err = ReconcilerError::from(finalizer::Error::<ManagedError>::UnnamedObject);
        assert!(matches!(err, ReconcilerError::Finalizer(_)));
    }
}
