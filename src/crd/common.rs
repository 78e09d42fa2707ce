//! # Common Managed Resource Types
//!
//! Types shared by every managed resource: provider configuration reference,
//! deletion policy, status conditions and the external-name annotation.

use crate::constants::{DEFAULT_PROVIDER_CONFIG_NAME, EXTERNAL_NAME_ANNOTATION};
use kube::Resource;
use serde::{Deserialize, Serialize};

/// Condition type reporting whether the external object is usable
pub const CONDITION_READY: &str = "Ready";
/// Condition type reporting whether the last reconcile succeeded
pub const CONDITION_SYNCED: &str = "Synced";

/// Fields embedded in the spec of every managed resource
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResourceSpec {
    /// ProviderConfig holding the GitHub credentials
    /// Defaults to the ProviderConfig named `default`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_config_ref: Option<ProviderConfigReference>,
    /// What happens to the GitHub object when this resource is deleted
    #[serde(default)]
    pub deletion_policy: DeletionPolicy,
}

impl ResourceSpec {
    /// Name of the referenced ProviderConfig, falling back to `default`
    #[must_use]
    pub fn provider_config_name(&self) -> &str {
        self.provider_config_ref
            .as_ref()
            .map_or(DEFAULT_PROVIDER_CONFIG_NAME, |r| r.name.as_str())
    }
}

/// Reference to a cluster-scoped ProviderConfig
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProviderConfigReference {
    pub name: String,
}

/// Deletion policy for the external object
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, schemars::JsonSchema,
)]
pub enum DeletionPolicy {
    /// Delete the GitHub object together with the custom resource
    #[default]
    Delete,
    /// Leave the GitHub object in place
    Orphan,
}

/// Kubernetes-style status condition
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    pub r#type: String,
    /// `True`, `False` or `Unknown`
    pub status: String,
    #[serde(default)]
    pub last_transition_time: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl Condition {
    fn new(type_: &str, status: &str, reason: &str, message: Option<String>) -> Self {
        Self {
            r#type: type_.to_string(),
            status: status.to_string(),
            last_transition_time: Some(chrono::Utc::now().to_rfc3339()),
            reason: Some(reason.to_string()),
            message,
        }
    }

    /// The external object exists and is usable
    #[must_use]
    pub fn available() -> Self {
        Self::new(CONDITION_READY, "True", "Available", None)
    }

    /// The external object is being created
    #[must_use]
    pub fn creating() -> Self {
        Self::new(CONDITION_READY, "False", "Creating", None)
    }

    /// The external object is being deleted
    #[must_use]
    pub fn deleting() -> Self {
        Self::new(CONDITION_READY, "False", "Deleting", None)
    }

    #[must_use]
    pub fn reconcile_success() -> Self {
        Self::new(CONDITION_SYNCED, "True", "ReconcileSuccess", None)
    }

    #[must_use]
    pub fn reconcile_error(message: impl Into<String>) -> Self {
        Self::new(
            CONDITION_SYNCED,
            "False",
            "ReconcileError",
            Some(message.into()),
        )
    }

    /// True when both conditions carry the same observation, ignoring the transition time
    #[must_use]
    pub fn equivalent(&self, other: &Self) -> bool {
        self.r#type == other.r#type
            && self.status == other.status
            && self.reason == other.reason
            && self.message == other.message
    }
}

/// Status types carrying a list of conditions
pub trait ConditionedStatus {
    fn conditions(&self) -> &[Condition];

    fn conditions_mut(&mut self) -> &mut Vec<Condition>;

    /// Upsert a condition by type
    ///
    /// An equivalent existing condition is left untouched so its
    /// `lastTransitionTime` survives. Returns whether anything changed.
    fn set_condition(&mut self, condition: Condition) -> bool {
        let conditions = self.conditions_mut();
        match conditions.iter_mut().find(|c| c.r#type == condition.r#type) {
            Some(existing) if existing.equivalent(&condition) => false,
            Some(existing) => {
                *existing = condition;
                true
            }
            None => {
                conditions.push(condition);
                true
            }
        }
    }

    fn get_condition(&self, type_: &str) -> Option<&Condition> {
        self.conditions().iter().find(|c| c.r#type == type_)
    }
}

/// Value of the external-name annotation, if set
pub fn external_name<K: Resource>(obj: &K) -> Option<&str> {
    obj.meta()
        .annotations
        .as_ref()
        .and_then(|a| a.get(EXTERNAL_NAME_ANNOTATION))
        .map(String::as_str)
        .filter(|name| !name.is_empty())
}

/// External name, falling back to `metadata.name`
pub fn get_external_name<K: Resource>(obj: &K) -> String {
    external_name(obj)
        .map(str::to_string)
        .or_else(|| obj.meta().name.clone())
        .unwrap_or_default()
}

/// Write the external-name annotation
pub fn set_external_name<K: Resource>(obj: &mut K, name: &str) {
    obj.meta_mut()
        .annotations
        .get_or_insert_with(Default::default)
        .insert(EXTERNAL_NAME_ANNOTATION.to_string(), name.to_string());
}
