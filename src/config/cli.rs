//! # Command-Line Flags
//!
//! Flags override the matching environment variables.

use super::duration::parse_kubernetes_duration;
use super::ControllerConfig;
use clap::Parser;
use std::time::Duration;

/// GitHub provider controller for Team and Membership resources
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "provider-github", version, about, long_about = None)]
pub struct Cli {
    /// Run with debug logging
    #[arg(short, long)]
    pub debug: bool,

    /// How often an in-sync resource is observed again (e.g. 30s, 1m, 1h)
    #[arg(long, value_parser = parse_poll)]
    pub poll: Option<Duration>,

    /// Maximum concurrent reconciles per resource kind
    #[arg(long)]
    pub max_reconcile_rate: Option<usize>,

    /// Port of the metrics and health probe server
    #[arg(long)]
    pub metrics_port: Option<u16>,

    /// GitHub API base URL used when a ProviderConfig does not set one
    #[arg(long)]
    pub github_api_url: Option<String>,
}

fn parse_poll(value: &str) -> Result<Duration, String> {
    parse_kubernetes_duration(value).map_err(|e| e.to_string())
}

impl Cli {
    /// Overlay the flags that were given onto `config`
    pub fn apply(&self, config: &mut ControllerConfig) {
        if self.debug {
            config.log_level = "debug".to_string();
        }
        if let Some(poll) = self.poll {
            config.poll_interval_secs = poll.as_secs();
        }
        if let Some(rate) = self.max_reconcile_rate {
            config.max_reconcile_rate = rate;
        }
        if let Some(port) = self.metrics_port {
            config.metrics_port = port;
        }
        if let Some(url) = &self.github_api_url {
            config.github_api_url.clone_from(url);
        }
    }
}
