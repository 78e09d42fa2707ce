//! # Constants
//!
//! Shared constants used throughout the controller.
//!
//! These values represent reasonable defaults and can be overridden via
//! environment variables or command-line flags where applicable.

/// Default HTTP server port for metrics and health probes
pub const DEFAULT_METRICS_PORT: u16 = 8080;

/// Default HTTP server startup timeout (how long to wait for server to be ready)
pub const DEFAULT_SERVER_STARTUP_TIMEOUT_SECS: u64 = 10;

/// Default HTTP server readiness poll interval
pub const DEFAULT_SERVER_POLL_INTERVAL_MS: u64 = 50;

/// How often an in-sync resource is observed again (seconds)
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 60;

/// Requeue delay after an external resource was just created (seconds)
pub const DEFAULT_SHORT_WAIT_SECS: u64 = 30;

/// Maximum reconciles per controller in flight at once
pub const DEFAULT_MAX_RECONCILE_RATE: usize = 10;

/// Fibonacci backoff floor for failed reconciles (seconds)
pub const DEFAULT_BACKOFF_MIN_SECS: u64 = 1;

/// Fibonacci backoff ceiling for failed reconciles (seconds)
pub const DEFAULT_BACKOFF_MAX_SECS: u64 = 60;

/// Public GitHub REST API endpoint
pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";

/// GitHub REST API version pinned in every request
pub const GITHUB_API_VERSION: &str = "2022-11-28";

/// User agent sent to GitHub (required by the API)
pub const GITHUB_USER_AGENT: &str = concat!("provider-github/", env!("CARGO_PKG_VERSION"));

/// Annotation holding the identifier of the external object
pub const EXTERNAL_NAME_ANNOTATION: &str = "crossplane.io/external-name";

/// Finalizer guarding deletion of the external object
pub const MANAGED_FINALIZER: &str = "finalizer.managedresource.crossplane.io";

/// ProviderConfig used when a resource does not reference one
pub const DEFAULT_PROVIDER_CONFIG_NAME: &str = "default";

/// Field manager used for server-side apply and status patches
pub const FIELD_MANAGER: &str = "provider-github";
