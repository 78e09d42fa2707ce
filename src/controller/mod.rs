//! # Controller
//!
//! GitHub adapters and the supporting pieces of the controller process.
//!
//! - `backoff`: Fibonacci backoff for failed reconciles
//! - `membership`: Team membership adapter
//! - `server`: HTTP server for metrics and health checks
//! - `team`: Team adapter

pub mod backoff;
pub mod membership;
pub mod server;
pub mod team;

pub use membership::MembershipExternal;
pub use team::TeamExternal;
