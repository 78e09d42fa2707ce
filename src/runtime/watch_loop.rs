//! # Watch Loop
//!
//! One `kube-runtime` controller per managed resource kind, run side by side
//! until a shutdown signal arrives.

use crate::config::ControllerConfig;
use crate::controller::server::ServerState;
use crate::crd::{Membership, Team};
use crate::managed::{reconcile, Connector, Context, GitHubConnector, Managed};
use crate::runtime::error_policy::error_policy;
use crate::runtime::initialization::InitializationResult;
use anyhow::Context as _;
use futures::StreamExt;
use kube::api::Api;
use kube::Client;
use kube_runtime::{controller, watcher, Controller};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::signal::unix::{signal, SignalKind};
use tracing::{debug, info, warn};

/// Run the Team and Membership controllers until shutdown
///
/// # Errors
/// Returns an error if the shutdown signal handler cannot be installed.
pub async fn run(init: InitializationResult) -> Result<(), anyhow::Error> {
    let InitializationResult {
        client,
        config,
        server_state,
    } = init;

    spawn_shutdown_handler(Arc::clone(&server_state))
        .context("Failed to install shutdown signal handler")?;

    let connector = Arc::new(GitHubConnector::new(client.clone(), &config.github_api_url));
    let (team_connector, membership_connector) = connectors(connector);

    tokio::join!(
        run_controller(client.clone(), team_connector, Arc::clone(&config)),
        run_controller(client, membership_connector, config),
    );

    info!("Controller stopped gracefully");
    Ok(())
}

/// One connector shared by both kinds
fn connectors(
    connector: Arc<GitHubConnector>,
) -> (Arc<dyn Connector<Team>>, Arc<dyn Connector<Membership>>) {
    let team: Arc<dyn Connector<Team>> = Arc::<GitHubConnector>::clone(&connector);
    (team, connector)
}

/// Mark the server not ready on SIGINT/SIGTERM
///
/// The controllers stop on the same signal through `shutdown_on_signal`.
/// SIGTERM is registered before this returns, so no signal is missed.
fn spawn_shutdown_handler(server_state: Arc<ServerState>) -> std::io::Result<JoinHandle<()>> {
    let mut terminate = signal(SignalKind::terminate())?;

    Ok(tokio::spawn(async move {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {}
            _ = terminate.recv() => {}
        }
        info!("Received shutdown signal, initiating graceful shutdown...");
        server_state.is_ready.store(false, Ordering::Relaxed);
    }))
}

/// Watch every resource of kind `R` across the cluster and reconcile it
pub async fn run_controller<R: Managed>(
    client: Client,
    connector: Arc<dyn Connector<R>>,
    config: Arc<ControllerConfig>,
) {
    let kind = R::kind(&()).to_string();
    let concurrency = u16::try_from(config.max_reconcile_rate).unwrap_or(u16::MAX);
    let ctx = Arc::new(Context::new(client.clone(), connector, config));
    let api: Api<R> = Api::all(client);

    info!(resource.kind = %kind, concurrency, "Starting controller watch loop...");

    let ctx_for_events = Arc::clone(&ctx);
    Controller::new(api, watcher::Config::default().any_semantic())
        .with_config(controller::Config::default().concurrency(concurrency))
        .shutdown_on_signal()
        .run(reconcile::<R>, error_policy::<R>, ctx)
        .for_each(move |result| {
            let ctx = Arc::clone(&ctx_for_events);
            async move {
                match result {
                    Ok((object, action)) => {
                        ctx.reset_backoff(&object.name);
                        debug!(resource.name = %object.name, ?action, "reconciliation.success");
                    }
                    Err(controller::Error::ReconcilerFailed(_, object)) => {
                        debug!(resource.name = %object.name, "reconciliation.failed");
                    }
                    Err(e) => warn!("Controller stream error: {}", e),
                }
            }
        })
        .await;

    info!(resource.kind = %kind, "Controller watch loop stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crd::{MembershipParameters, MembershipSpec, ResourceSpec, TeamParameters, TeamSpec};
    use crate::github::fake::FakeTeams;
    use crate::github::{GitHubError, TeamsService};
    use crate::managed::connector::tests::{FakeCredentials, FakeUsage};
    use std::time::Duration;

    fn github_connector() -> Arc<GitHubConnector> {
        Arc::new(GitHubConnector::with_parts(
            Arc::new(FakeCredentials::with_token("ghp_test")),
            Arc::new(FakeUsage::default()),
            "https://api.github.com",
            Arc::new(|_token: &str, _base_url: &str| {
                Ok::<_, GitHubError>(Arc::new(FakeTeams::default()) as Arc<dyn TeamsService>)
            }),
        ))
    }

    #[tokio::test]
    async fn test_connectors_serve_both_kinds() {
        let (team_connector, membership_connector) = connectors(github_connector());
        let team = Team::new(
            "platform",
            TeamSpec {
                resource_spec: ResourceSpec::default(),
                for_provider: TeamParameters {
                    org: "acme".to_string(),
                    description: None,
                    privacy: None,
                },
            },
        );
        let membership = Membership::new(
            "platform-octocat",
            MembershipSpec {
                resource_spec: ResourceSpec::default(),
                for_provider: MembershipParameters {
                    org: "acme".to_string(),
                    team: "platform".to_string(),
                    user: "octocat".to_string(),
                    role: None,
                },
            },
        );

        let _team_client = team_connector.connect(&team).await.expect("team client");
        let _membership_client = membership_connector
            .connect(&membership)
            .await
            .expect("membership client");
    }

    #[tokio::test]
    async fn test_sigterm_marks_server_not_ready() {
        let state = Arc::new(ServerState::default());
        state.is_ready.store(true, Ordering::Relaxed);

        let handle = spawn_shutdown_handler(Arc::clone(&state)).expect("signal handler");
        let status = std::process::Command::new("kill")
            .args(["-TERM", &std::process::id().to_string()])
            .status()
            .expect("kill");
        assert!(status.success());

        tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("handler finished")
            .expect("handler task");
        assert!(!state.is_ready.load(Ordering::Relaxed));
    }
}
