//! # Configuration
//!
//! Controller configuration from environment variables and command-line flags.
//!
//! - `controller.rs` - [`ControllerConfig`] loaded from the environment
//! - `cli.rs` - Command-line flags overriding the environment
//! - `duration.rs` - Kubernetes-style duration strings (`30s`, `1m`, `1h`)

mod cli;
mod controller;
mod duration;

pub use cli::Cli;
pub use controller::ControllerConfig;
pub use duration::parse_kubernetes_duration;
