//! # Controller Configuration
//!
//! Controller-level settings loaded from environment variables.

use super::duration::parse_kubernetes_duration;
use std::time::Duration;

/// Controller-level configuration
///
/// All settings have defaults and can be overridden via environment variables.
/// Command-line flags take precedence, see [`super::Cli`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerConfig {
    /// How often an in-sync resource is observed again (seconds)
    /// Env: `POLL_INTERVAL` as a duration string, e.g. `1m`
    pub poll_interval_secs: u64,
    /// Requeue delay after creating an external resource (seconds)
    pub short_wait_secs: u64,
    /// Maximum concurrent reconciles per resource kind
    pub max_reconcile_rate: usize,
    /// Fibonacci backoff floor for failed reconciles (seconds)
    pub backoff_min_secs: u64,
    /// Fibonacci backoff ceiling for failed reconciles (seconds)
    pub backoff_max_secs: u64,
    /// Port of the metrics and probe server
    pub metrics_port: u16,
    pub server_startup_timeout_secs: u64,
    pub server_poll_interval_ms: u64,
    /// GitHub API base URL used when a ProviderConfig does not set one
    pub github_api_url: String,
    /// Default log level when `RUST_LOG` is unset (error, warn, info, debug, trace)
    pub log_level: String,
    /// Log format (json, text)
    pub log_format: String,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        use crate::constants::*;
        Self {
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
            short_wait_secs: DEFAULT_SHORT_WAIT_SECS,
            max_reconcile_rate: DEFAULT_MAX_RECONCILE_RATE,
            backoff_min_secs: DEFAULT_BACKOFF_MIN_SECS,
            backoff_max_secs: DEFAULT_BACKOFF_MAX_SECS,
            metrics_port: DEFAULT_METRICS_PORT,
            server_startup_timeout_secs: DEFAULT_SERVER_STARTUP_TIMEOUT_SECS,
            server_poll_interval_ms: DEFAULT_SERVER_POLL_INTERVAL_MS,
            github_api_url: DEFAULT_GITHUB_API_URL.to_string(),
            log_level: "info".to_string(),
            log_format: "text".to_string(),
        }
    }
}

impl ControllerConfig {
    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Self {
        use crate::constants::*;
        Self {
            poll_interval_secs: env_var_or_default_duration(
                "POLL_INTERVAL",
                DEFAULT_POLL_INTERVAL_SECS,
            ),
            short_wait_secs: env_var_or_default("SHORT_WAIT_SECS", DEFAULT_SHORT_WAIT_SECS),
            max_reconcile_rate: env_var_or_default(
                "MAX_RECONCILE_RATE",
                DEFAULT_MAX_RECONCILE_RATE,
            ),
            backoff_min_secs: env_var_or_default("BACKOFF_MIN_SECS", DEFAULT_BACKOFF_MIN_SECS),
            backoff_max_secs: env_var_or_default("BACKOFF_MAX_SECS", DEFAULT_BACKOFF_MAX_SECS),
            metrics_port: env_var_or_default("METRICS_PORT", DEFAULT_METRICS_PORT),
            server_startup_timeout_secs: env_var_or_default(
                "SERVER_STARTUP_TIMEOUT_SECS",
                DEFAULT_SERVER_STARTUP_TIMEOUT_SECS,
            ),
            server_poll_interval_ms: env_var_or_default(
                "SERVER_POLL_INTERVAL_MS",
                DEFAULT_SERVER_POLL_INTERVAL_MS,
            ),
            github_api_url: env_var_or_default_str("GITHUB_API_URL", DEFAULT_GITHUB_API_URL),
            log_level: env_var_or_default_str("LOG_LEVEL", "info"),
            log_format: env_var_or_default_str("LOG_FORMAT", "text"),
        }
    }

    /// Get poll interval duration
    pub fn poll_interval_duration(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    /// Get short wait duration
    pub fn short_wait_duration(&self) -> Duration {
        Duration::from_secs(self.short_wait_secs)
    }

    pub fn server_startup_timeout_duration(&self) -> Duration {
        Duration::from_secs(self.server_startup_timeout_secs)
    }

    pub fn server_poll_interval_duration(&self) -> Duration {
        Duration::from_millis(self.server_poll_interval_ms)
    }

    /// Whether logs are emitted as JSON
    pub fn json_logs(&self) -> bool {
        self.log_format.eq_ignore_ascii_case("json")
    }
}

/// Read environment variable or return default value
fn env_var_or_default<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// Read a Kubernetes duration string as seconds or return default
fn env_var_or_default_duration(key: &str, default_secs: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| parse_kubernetes_duration(&v).ok())
        .map_or(default_secs, |d| d.as_secs())
}

/// Read environment variable as string or return default
fn env_var_or_default_str(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}
