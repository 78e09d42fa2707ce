//! # GitHub Provider
//!
//! Kubernetes controller managing GitHub organization teams and team
//! memberships declared as `Team` and `Membership` custom resources.
//!
//! Credentials come from a `ProviderConfig` referencing a Secret that holds a
//! GitHub token. Each resource is reconciled on change and again every poll
//! interval.

use anyhow::Result;
use clap::Parser;
use provider_github::config::{Cli, ControllerConfig};
use provider_github::runtime::{initialization, watch_loop};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = ControllerConfig::from_env();
    cli.apply(&mut config);

    let init = initialization::initialize(config).await?;
    watch_loop::run(init).await
}
