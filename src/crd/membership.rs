//! # Membership
//!
//! Managed resource describing a user's membership in a GitHub team.

use crate::crd::{Condition, ConditionedStatus, ResourceSpec};
use crate::managed::Managed;
use serde::{Deserialize, Serialize};

/// Membership Custom Resource Definition
///
/// # Example
///
/// ```yaml
/// apiVersion: org.github.crossplane.io/v1alpha1
/// kind: Membership
/// metadata:
///   name: platform-octocat
/// spec:
///   forProvider:
///     org: my-org
///     team: platform
///     user: octocat
///     role: maintainer
/// ```
#[derive(kube::CustomResource, Debug, Clone, Deserialize, Serialize, schemars::JsonSchema)]
#[kube(
    kind = "Membership",
    group = "org.github.crossplane.io",
    version = "v1alpha1",
    status = "MembershipStatus",
    shortname = "ghmember",
    category = "github",
    printcolumn = r#"{"name":"Ready", "type":"string", "jsonPath":".status.conditions[?(@.type==\"Ready\")].status"}, {"name":"Synced", "type":"string", "jsonPath":".status.conditions[?(@.type==\"Synced\")].status"}, {"name":"Team", "type":"string", "jsonPath":".spec.forProvider.team"}, {"name":"User", "type":"string", "jsonPath":".spec.forProvider.user"}, {"name":"State", "type":"string", "jsonPath":".status.atProvider.state"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct MembershipSpec {
    #[serde(flatten)]
    pub resource_spec: ResourceSpec,
    pub for_provider: MembershipParameters,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MembershipParameters {
    pub org: String,
    /// Team slug
    pub team: String,
    /// GitHub login of the member
    pub user: String,
    /// `member` or `maintainer`; GitHub defaults to `member` when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MembershipStatus {
    #[serde(default)]
    pub at_provider: MembershipObservation,
    #[serde(default)]
    pub conditions: Vec<Condition>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MembershipObservation {
    /// `active` or `pending`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl ConditionedStatus for MembershipStatus {
    fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    fn conditions_mut(&mut self) -> &mut Vec<Condition> {
        &mut self.conditions
    }
}

impl Managed for Membership {
    type Status = MembershipStatus;

    fn resource_spec(&self) -> &ResourceSpec {
        &self.spec.resource_spec
    }

    fn managed_status(&self) -> Option<&MembershipStatus> {
        self.status.as_ref()
    }

    fn managed_status_mut(&mut self) -> &mut MembershipStatus {
        self.status.get_or_insert_with(MembershipStatus::default)
    }
}
