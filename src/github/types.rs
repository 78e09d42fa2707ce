//! GitHub REST API request and response payloads for teams and team memberships.
//!
//! API Reference: <https://docs.github.com/en/rest/teams>

use serde::{Deserialize, Serialize};

/// Team as returned by `GET /orgs/{org}/teams/{team_slug}`
///
/// Only the fields the controller reads are modelled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Team {
    pub id: u64,
    pub node_id: String,
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub privacy: Option<String>,
}

/// Body for creating or editing a team
///
/// Unset fields are omitted so an edit leaves them untouched on GitHub.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NewTeam {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub privacy: Option<String>,
}

/// Membership as returned by `GET /orgs/{org}/teams/{team_slug}/memberships/{username}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct TeamMembership {
    #[serde(default)]
    pub url: Option<String>,
    /// `member` or `maintainer`
    #[serde(default)]
    pub role: String,
    /// `active` or `pending`
    #[serde(default)]
    pub state: String,
}

/// Body for `PUT /orgs/{org}/teams/{team_slug}/memberships/{username}`
#[derive(Debug, Clone, Serialize)]
pub(crate) struct MembershipRequest<'a> {
    pub role: &'a str,
}

/// GitHub API error body
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorResponse {
    pub message: String,
    #[serde(default)]
    #[allow(dead_code, reason = "Kept for Debug output")]
    pub documentation_url: Option<String>,
}
