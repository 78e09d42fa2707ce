//! # Initialization
//!
//! Controller startup: rustls crypto provider, tracing, metrics, the HTTP
//! server, and the Kubernetes client.

use crate::config::ControllerConfig;
use crate::controller::server::{start_server, ServerState};
use crate::observability;
use anyhow::{Context, Result};
use kube::Client;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Everything the controller loops need
pub struct InitializationResult {
    pub client: Client,
    pub config: Arc<ControllerConfig>,
    /// Server state for health checks
    pub server_state: Arc<ServerState>,
}

impl std::fmt::Debug for InitializationResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InitializationResult")
            .field("config", &self.config)
            .field(
                "server_ready",
                &self.server_state.is_ready.load(Ordering::Relaxed),
            )
            .finish_non_exhaustive()
    }
}

/// Initialize the controller runtime
///
/// # Errors
/// Fails when the HTTP server does not come up or no Kubernetes client can be built.
pub async fn initialize(config: ControllerConfig) -> Result<InitializationResult> {
    // Must run before anything opens a TLS connection
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        return Err(anyhow::anyhow!("Failed to install rustls crypto provider"));
    }

    init_tracing(&config);

    info!("Starting GitHub provider controller");
    info!(
        "Build info: timestamp={}, datetime={}, git_hash={}",
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_DATETIME"),
        env!("BUILD_GIT_HASH")
    );
    info!(
        poll_interval_secs = config.poll_interval_secs,
        max_reconcile_rate = config.max_reconcile_rate,
        github_api_url = %config.github_api_url,
        "controller.config"
    );

    observability::metrics::register_metrics()?;

    let server_state = Arc::new(ServerState::default());
    let server_state_clone = Arc::clone(&server_state);
    let server_port = config.metrics_port;
    let server_handle = tokio::spawn(async move {
        if let Err(e) = start_server(server_port, server_state_clone).await {
            error!("HTTP server error: {}", e);
        }
    });

    wait_for_server_ready(
        &server_state,
        &server_handle,
        config.server_startup_timeout_duration(),
        config.server_poll_interval_duration(),
    )
    .await?;

    let client = Client::try_default()
        .await
        .context("Failed to create Kubernetes client")?;

    info!("Controller initialized, starting watch loops...");

    Ok(InitializationResult {
        client,
        config: Arc::new(config),
        server_state,
    })
}

/// `RUST_LOG` wins over the configured level
fn init_tracing(config: &ControllerConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("provider_github={}", config.log_level)));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let result = if config.json_logs() {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    if let Err(e) = result {
        eprintln!("Tracing subscriber already initialized: {e}");
    }
}

/// Wait for the HTTP server to become ready
async fn wait_for_server_ready(
    server_state: &Arc<ServerState>,
    server_handle: &tokio::task::JoinHandle<()>,
    startup_timeout: Duration,
    poll_interval: Duration,
) -> Result<()> {
    let start_time = Instant::now();

    loop {
        if server_state.is_ready.load(Ordering::Relaxed) {
            info!("HTTP server is ready and accepting connections");
            return Ok(());
        }

        if server_handle.is_finished() {
            return Err(anyhow::anyhow!("HTTP server failed to start"));
        }

        if start_time.elapsed() > startup_timeout {
            return Err(anyhow::anyhow!(
                "HTTP server failed to become ready within {} seconds",
                startup_timeout.as_secs()
            ));
        }

        tokio::time::sleep(poll_interval).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_wait_for_server_ready_returns_once_ready() {
        let state = Arc::new(ServerState::default());
        let flag = Arc::clone(&state.is_ready);
        let handle = tokio::spawn(async move {
            flag.store(true, Ordering::Relaxed);
            std::future::pending::<()>().await;
        });

        wait_for_server_ready(
            &state,
            &handle,
            Duration::from_secs(5),
            Duration::from_millis(5),
        )
        .await
        .expect("server should become ready");
        handle.abort();
    }

    #[tokio::test]
    async fn test_wait_for_server_ready_fails_when_server_exits() {
        let state = Arc::new(ServerState::default());
        let handle = tokio::spawn(async {});
        while !handle.is_finished() {
            tokio::task::yield_now().await;
        }

        let err = wait_for_server_ready(
            &state,
            &handle,
            Duration::from_secs(5),
            Duration::from_millis(5),
        )
        .await
        .unwrap_err();

        assert_eq!(err.to_string(), "HTTP server failed to start");
    }

    #[tokio::test]
    async fn test_wait_for_server_ready_times_out() {
        let state = Arc::new(ServerState::default());
        let handle = tokio::spawn(std::future::pending::<()>());

        let err = wait_for_server_ready(
            &state,
            &handle,
            Duration::from_millis(20),
            Duration::from_millis(5),
        )
        .await
        .unwrap_err();

        assert!(err.to_string().starts_with("HTTP server failed to become ready"));
        handle.abort();
    }
}
