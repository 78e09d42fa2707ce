//! # GitHub
//!
//! Access to the GitHub teams API.
//!
//! [`TeamsService`] is the seam between the external resource adapters and
//! GitHub. [`GitHubClient`] implements it over REST; tests substitute an
//! in-memory fake.

mod client;
mod error;
mod types;

pub use client::GitHubClient;
pub use error::GitHubError;
pub use types::{NewTeam, Team, TeamMembership};

use async_trait::async_trait;

/// Team and team-membership operations addressed by organization and team slug
#[async_trait]
pub trait TeamsService: Send + Sync + std::fmt::Debug {
    async fn get_team_by_slug(&self, org: &str, slug: &str) -> Result<Team, GitHubError>;

    async fn create_team(&self, org: &str, team: &NewTeam) -> Result<Team, GitHubError>;

    /// Edit a team; the parent team is left unchanged
    async fn edit_team_by_slug(
        &self,
        org: &str,
        slug: &str,
        team: &NewTeam,
    ) -> Result<Team, GitHubError>;

    async fn delete_team_by_slug(&self, org: &str, slug: &str) -> Result<(), GitHubError>;

    async fn get_team_membership_by_slug(
        &self,
        org: &str,
        team_slug: &str,
        user: &str,
    ) -> Result<TeamMembership, GitHubError>;

    /// Add or update a membership; `None` keeps GitHub's default role
    async fn add_team_membership_by_slug(
        &self,
        org: &str,
        team_slug: &str,
        user: &str,
        role: Option<&str>,
    ) -> Result<TeamMembership, GitHubError>;

    async fn remove_team_membership_by_slug(
        &self,
        org: &str,
        team_slug: &str,
        user: &str,
    ) -> Result<(), GitHubError>;
}

#[cfg(test)]
pub(crate) mod fake {
    //! In-memory [`TeamsService`] keyed by `org/slug` and `org/slug/user`.

    use super::{GitHubError, NewTeam, Team, TeamMembership, TeamsService};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Debug, Default)]
    pub struct FakeTeams {
        pub teams: Mutex<HashMap<String, Team>>,
        pub memberships: Mutex<HashMap<String, TeamMembership>>,
        /// Returned by every call when set
        pub fail_with: Mutex<Option<u16>>,
        pub calls: Mutex<Vec<String>>,
    }

    impl FakeTeams {
        pub fn with_team(org: &str, team: Team) -> Self {
            let fake = Self::default();
            fake.teams
                .lock()
                .unwrap()
                .insert(format!("{org}/{}", team.slug), team);
            fake
        }

        pub fn with_membership(org: &str, team_slug: &str, user: &str, m: TeamMembership) -> Self {
            let fake = Self::default();
            fake.memberships
                .lock()
                .unwrap()
                .insert(format!("{org}/{team_slug}/{user}"), m);
            fake
        }

        pub fn failing(status: u16) -> Self {
            let fake = Self::default();
            *fake.fail_with.lock().unwrap() = Some(status);
            fake
        }

        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, call: String) -> Result<(), GitHubError> {
            self.calls.lock().unwrap().push(call);
            match *self.fail_with.lock().unwrap() {
                Some(status) => Err(GitHubError::Api {
                    status,
                    message: "injected".to_string(),
                }),
                None => Ok(()),
            }
        }

        fn not_found() -> GitHubError {
            GitHubError::Api {
                status: 404,
                message: "Not Found".to_string(),
            }
        }
    }

    fn slugify(name: &str) -> String {
        name.to_lowercase().replace(' ', "-")
    }

    #[async_trait]
    impl TeamsService for FakeTeams {
        async fn get_team_by_slug(&self, org: &str, slug: &str) -> Result<Team, GitHubError> {
            self.record(format!("get_team {org}/{slug}"))?;
            self.teams
                .lock()
                .unwrap()
                .get(&format!("{org}/{slug}"))
                .cloned()
                .ok_or_else(Self::not_found)
        }

        async fn create_team(&self, org: &str, team: &NewTeam) -> Result<Team, GitHubError> {
            self.record(format!("create_team {org}/{}", team.name))?;
            let slug = slugify(&team.name);
            let created = Team {
                id: 42,
                node_id: "MDQ6VGVhbTQy".to_string(),
                slug: slug.clone(),
                name: team.name.clone(),
                description: team.description.clone(),
                privacy: Some(team.privacy.clone().unwrap_or_else(|| "secret".to_string())),
            };
            self.teams
                .lock()
                .unwrap()
                .insert(format!("{org}/{slug}"), created.clone());
            Ok(created)
        }

        async fn edit_team_by_slug(
            &self,
            org: &str,
            slug: &str,
            team: &NewTeam,
        ) -> Result<Team, GitHubError> {
            self.record(format!("edit_team {org}/{slug}"))?;
            let mut teams = self.teams.lock().unwrap();
            let existing = teams
                .get_mut(&format!("{org}/{slug}"))
                .ok_or_else(Self::not_found)?;
            if team.description.is_some() {
                existing.description.clone_from(&team.description);
            }
            if team.privacy.is_some() {
                existing.privacy.clone_from(&team.privacy);
            }
            Ok(existing.clone())
        }

        async fn delete_team_by_slug(&self, org: &str, slug: &str) -> Result<(), GitHubError> {
            self.record(format!("delete_team {org}/{slug}"))?;
            self.teams
                .lock()
                .unwrap()
                .remove(&format!("{org}/{slug}"))
                .map(|_| ())
                .ok_or_else(Self::not_found)
        }

        async fn get_team_membership_by_slug(
            &self,
            org: &str,
            team_slug: &str,
            user: &str,
        ) -> Result<TeamMembership, GitHubError> {
            self.record(format!("get_membership {org}/{team_slug}/{user}"))?;
            self.memberships
                .lock()
                .unwrap()
                .get(&format!("{org}/{team_slug}/{user}"))
                .cloned()
                .ok_or_else(Self::not_found)
        }

        async fn add_team_membership_by_slug(
            &self,
            org: &str,
            team_slug: &str,
            user: &str,
            role: Option<&str>,
        ) -> Result<TeamMembership, GitHubError> {
            self.record(format!(
                "add_membership {org}/{team_slug}/{user} role={}",
                role.unwrap_or("-")
            ))?;
            let membership = TeamMembership {
                url: None,
                role: role.unwrap_or("member").to_string(),
                state: "active".to_string(),
            };
            self.memberships
                .lock()
                .unwrap()
                .insert(format!("{org}/{team_slug}/{user}"), membership.clone());
            Ok(membership)
        }

        async fn remove_team_membership_by_slug(
            &self,
            org: &str,
            team_slug: &str,
            user: &str,
        ) -> Result<(), GitHubError> {
            self.record(format!("remove_membership {org}/{team_slug}/{user}"))?;
            self.memberships
                .lock()
                .unwrap()
                .remove(&format!("{org}/{team_slug}/{user}"))
                .map(|_| ())
                .ok_or_else(Self::not_found)
        }
    }
}
