//! GitHub Provider Library
//!
//! Kubernetes controllers that keep GitHub teams and team memberships in
//! line with `Team` and `Membership` custom resources.
//!
//! ## Quick Start
//!
//! ```rust
//! use provider_github::prelude::*;
//! ```
//!
//! This brings commonly used types and traits into scope. For more specific imports,
//! use the individual modules.

pub mod config;
pub mod constants;
pub mod controller;
pub mod crd;
pub mod github;
pub mod managed;
pub mod observability;
pub mod prelude;
pub mod runtime;
