//! GitHub REST Client
//!
//! Native REST implementation of [`TeamsService`] for the teams and team
//! membership endpoints. Uses reqwest with rustls and a personal access token.
//!
//! References:
//! - [Teams](https://docs.github.com/en/rest/teams/teams)
//! - [Team members](https://docs.github.com/en/rest/teams/members)

use super::types::{ErrorResponse, MembershipRequest, NewTeam, Team, TeamMembership};
use super::{GitHubError, TeamsService};
use crate::constants::{GITHUB_API_VERSION, GITHUB_USER_AGENT};
use crate::observability::metrics;
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::time::Instant;
use tracing::{debug, info_span, Instrument};
use zeroize::Zeroizing;

/// GitHub REST client authenticated with a personal access token
pub struct GitHubClient {
    http_client: Client,
    base_url: String,
    token: Zeroizing<String>,
}

impl std::fmt::Debug for GitHubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl GitHubClient {
    /// Create a client for `base_url` (e.g. `https://api.github.com`)
    ///
    /// # Errors
    /// Returns an error if the token is empty, the base URL is not an HTTP(S)
    /// URL, or the HTTP client cannot be built.
    pub fn new(token: &str, base_url: &str) -> Result<Self, GitHubError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(GitHubError::EmptyToken);
        }

        let base_url = base_url.trim().trim_end_matches('/');
        if !(base_url.starts_with("https://") || base_url.starts_with("http://")) {
            return Err(GitHubError::InvalidBaseUrl(base_url.to_string()));
        }

        let http_client = Client::builder()
            .user_agent(GITHUB_USER_AGENT)
            .build()
            .map_err(GitHubError::Client)?;

        Ok(Self {
            http_client,
            base_url: base_url.to_string(),
            token: Zeroizing::new(token.to_string()),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build a request with authentication and API version headers
    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http_client
            .request(method, format!("{}{}", self.base_url, path))
            .bearer_auth(self.token.as_str())
            .header(ACCEPT, "application/vnd.github+json")
            .header("X-GitHub-Api-Version", GITHUB_API_VERSION)
    }

    /// Send a request, recording metrics and turning non-2xx responses into errors
    async fn execute(&self, method: &Method, request: RequestBuilder) -> Result<Response, GitHubError> {
        let start = Instant::now();
        let result = request.send().await;
        let elapsed = start.elapsed().as_secs_f64();

        let response = match result {
            Ok(response) => response,
            Err(e) => {
                metrics::record_github_request(method.as_str(), "error", elapsed);
                return Err(GitHubError::Request(e));
            }
        };

        let status = response.status();
        metrics::record_github_request(method.as_str(), status.as_str(), elapsed);

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(Self::handle_error_response(status, &body))
    }

    /// Map a GitHub error body to [`GitHubError::Api`]
    fn handle_error_response(status: reqwest::StatusCode, body: &str) -> GitHubError {
        let message = serde_json::from_str::<ErrorResponse>(body)
            .map(|e| e.message)
            .unwrap_or_else(|_| {
                if body.is_empty() {
                    status
                        .canonical_reason()
                        .unwrap_or("unknown error")
                        .to_string()
                } else {
                    body.to_string()
                }
            });
        debug!(status = status.as_u16(), message = %message, "github.api.error");
        GitHubError::Api {
            status: status.as_u16(),
            message,
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, GitHubError> {
        let method = Method::GET;
        let response = self.execute(&method, self.request(method.clone(), path)).await?;
        response.json().await.map_err(GitHubError::Decode)
    }

    async fn delete(&self, path: &str) -> Result<(), GitHubError> {
        let method = Method::DELETE;
        self.execute(&method, self.request(method.clone(), path))
            .await
            .map(|_| ())
    }
}

fn team_path(org: &str, slug: &str) -> String {
    format!("/orgs/{org}/teams/{slug}")
}

fn membership_path(org: &str, team_slug: &str, user: &str) -> String {
    format!("/orgs/{org}/teams/{team_slug}/memberships/{user}")
}

#[async_trait]
impl TeamsService for GitHubClient {
    async fn get_team_by_slug(&self, org: &str, slug: &str) -> Result<Team, GitHubError> {
        let span = info_span!("github.teams.get", org = org, team.slug = slug);
        self.get_json(&team_path(org, slug)).instrument(span).await
    }

    async fn create_team(&self, org: &str, team: &NewTeam) -> Result<Team, GitHubError> {
        let span = info_span!("github.teams.create", org = org, team.name = %team.name);
        async {
            let method = Method::POST;
            let request = self
                .request(method.clone(), &format!("/orgs/{org}/teams"))
                .json(team);
            let response = self.execute(&method, request).await?;
            response.json().await.map_err(GitHubError::Decode)
        }
        .instrument(span)
        .await
    }

    async fn edit_team_by_slug(
        &self,
        org: &str,
        slug: &str,
        team: &NewTeam,
    ) -> Result<Team, GitHubError> {
        let span = info_span!("github.teams.edit", org = org, team.slug = slug);
        async {
            let method = Method::PATCH;
            let request = self.request(method.clone(), &team_path(org, slug)).json(team);
            let response = self.execute(&method, request).await?;
            response.json().await.map_err(GitHubError::Decode)
        }
        .instrument(span)
        .await
    }

    async fn delete_team_by_slug(&self, org: &str, slug: &str) -> Result<(), GitHubError> {
        let span = info_span!("github.teams.delete", org = org, team.slug = slug);
        self.delete(&team_path(org, slug)).instrument(span).await
    }

    async fn get_team_membership_by_slug(
        &self,
        org: &str,
        team_slug: &str,
        user: &str,
    ) -> Result<TeamMembership, GitHubError> {
        let span = info_span!("github.memberships.get", org = org, team.slug = team_slug, user = user);
        self.get_json(&membership_path(org, team_slug, user))
            .instrument(span)
            .await
    }

    async fn add_team_membership_by_slug(
        &self,
        org: &str,
        team_slug: &str,
        user: &str,
        role: Option<&str>,
    ) -> Result<TeamMembership, GitHubError> {
        let span = info_span!("github.memberships.add", org = org, team.slug = team_slug, user = user);
        async {
            let method = Method::PUT;
            let mut request = self.request(method.clone(), &membership_path(org, team_slug, user));
            // Without a body GitHub keeps an existing role and defaults new members to `member`
            if let Some(role) = role {
                request = request.json(&MembershipRequest { role });
            }
            let response = self.execute(&method, request).await?;
            response.json().await.map_err(GitHubError::Decode)
        }
        .instrument(span)
        .await
    }

    async fn remove_team_membership_by_slug(
        &self,
        org: &str,
        team_slug: &str,
        user: &str,
    ) -> Result<(), GitHubError> {
        let span = info_span!("github.memberships.remove", org = org, team.slug = team_slug, user = user);
        self.delete(&membership_path(org, team_slug, user))
            .instrument(span)
            .await
    }
}
