//! # Prelude
//!
//! Re-exports commonly used types and traits.
//!
//! ```rust
//! use provider_github::prelude::*;
//! ```

// CRD types
pub use crate::crd::*;

// Managed resource contract and reconcile flow
pub use crate::managed::{
    reconcile, Connector, Context, ExternalClient, ExternalCreation, ExternalObservation,
    GitHubConnector, Managed, ManagedError, ReconcilerError,
};

// GitHub client
pub use crate::github::{GitHubClient, GitHubError, TeamsService};

pub use crate::config::ControllerConfig;
