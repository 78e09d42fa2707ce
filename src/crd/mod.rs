//! # Custom Resource Definitions
//!
//! CRD types served by the controller.
//!
//! ## Module Structure
//!
//! - `common.rs` - Fields, conditions and annotations shared by managed resources
//! - `provider_config.rs` - ProviderConfig and ProviderConfigUsage (`github.crossplane.io`)
//! - `team.rs` - Team managed resource (`org.github.crossplane.io`)
//! - `membership.rs` - Membership managed resource (`org.github.crossplane.io`)

mod common;
mod membership;
mod provider_config;
mod team;

pub use common::{
    external_name, get_external_name, set_external_name, Condition, ConditionedStatus,
    DeletionPolicy, ProviderConfigReference, ResourceSpec, CONDITION_READY, CONDITION_SYNCED,
};
pub use membership::{
    Membership, MembershipObservation, MembershipParameters, MembershipSpec, MembershipStatus,
};
pub use provider_config::{
    CredentialsSource, ProviderConfig, ProviderConfigSpec, ProviderConfigUsage,
    ProviderConfigUsageSpec, ProviderCredentials, SecretKeySelector, TypedReference,
};
pub use team::{Team, TeamObservation, TeamParameters, TeamSpec, TeamStatus};
