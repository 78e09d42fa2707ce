//! # Runtime
//!
//! Process startup and the controller loops.
//!
//! - `initialization.rs` - rustls, tracing, metrics, HTTP server, Kubernetes client
//! - `watch_loop.rs` - One `kube-runtime` controller per managed resource kind
//! - `error_policy.rs` - Per-resource Fibonacci backoff after failed reconciles

pub mod error_policy;
pub mod initialization;
pub mod watch_loop;
