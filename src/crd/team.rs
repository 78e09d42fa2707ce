//! # Team
//!
//! Managed resource describing a team in a GitHub organization.

use crate::crd::{Condition, ConditionedStatus, ResourceSpec};
use crate::managed::Managed;
use serde::{Deserialize, Serialize};

/// Team Custom Resource Definition
///
/// The external-name annotation holds the team slug. When absent it is
/// initialized from `metadata.name`, which is then also used as the team name.
///
/// # Example
///
/// ```yaml
/// apiVersion: org.github.crossplane.io/v1alpha1
/// kind: Team
/// metadata:
///   name: platform
/// spec:
///   forProvider:
///     org: my-org
///     description: Platform engineering
///     privacy: closed
///   providerConfigRef:
///     name: default
/// ```
#[derive(kube::CustomResource, Debug, Clone, Deserialize, Serialize, schemars::JsonSchema)]
#[kube(
    kind = "Team",
    group = "org.github.crossplane.io",
    version = "v1alpha1",
    status = "TeamStatus",
    shortname = "ghteam",
    category = "github",
    printcolumn = r#"{"name":"Ready", "type":"string", "jsonPath":".status.conditions[?(@.type==\"Ready\")].status"}, {"name":"Synced", "type":"string", "jsonPath":".status.conditions[?(@.type==\"Synced\")].status"}, {"name":"External-Name", "type":"string", "jsonPath":".metadata.annotations.crossplane\\.io/external-name"}, {"name":"Org", "type":"string", "jsonPath":".spec.forProvider.org"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct TeamSpec {
    #[serde(flatten)]
    pub resource_spec: ResourceSpec,
    pub for_provider: TeamParameters,
}

/// Desired state of the GitHub team
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TeamParameters {
    /// Organization the team belongs to
    pub org: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// `secret` or `closed`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub privacy: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TeamStatus {
    #[serde(default)]
    pub at_provider: TeamObservation,
    #[serde(default)]
    pub conditions: Vec<Condition>,
}

/// Observed state of the GitHub team
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TeamObservation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
}

impl ConditionedStatus for TeamStatus {
    fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    fn conditions_mut(&mut self) -> &mut Vec<Condition> {
        &mut self.conditions
    }
}

impl Managed for Team {
    type Status = TeamStatus;

    fn resource_spec(&self) -> &ResourceSpec {
        &self.spec.resource_spec
    }

    fn managed_status(&self) -> Option<&TeamStatus> {
        self.status.as_ref()
    }

    fn managed_status_mut(&mut self) -> &mut TeamStatus {
        self.status.get_or_insert_with(TeamStatus::default)
    }
}
