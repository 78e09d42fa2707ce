//! # Team Adapter
//!
//! Observe, create, update, and delete GitHub teams for [`Team`] resources.
//!
//! Teams are addressed by organization and the external-name annotation,
//! which holds the team slug.

use crate::crd::{get_external_name, set_external_name, Team, TeamParameters};
use crate::github::{NewTeam, Team as GitHubTeam, TeamsService};
use crate::managed::{
    ConnectError, Connector, ExternalClient, ExternalCreation, ExternalObservation, GitHubConnector,
    Managed,
};
use anyhow::Context as _;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};

/// GitHub team operations for one set of credentials
#[derive(Debug, Clone)]
pub struct TeamExternal {
    service: Arc<dyn TeamsService>,
}

impl TeamExternal {
    #[must_use]
    pub fn new(service: Arc<dyn TeamsService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Connector<Team> for GitHubConnector {
    async fn connect(&self, mr: &Team) -> Result<Box<dyn ExternalClient<Team>>, ConnectError> {
        let service = self.connect_service(mr).await?;
        Ok(Box::new(TeamExternal::new(service)))
    }
}

fn new_team(mr: &Team) -> NewTeam {
    NewTeam {
        name: get_external_name(mr),
        description: mr.spec.for_provider.description.clone(),
        privacy: mr.spec.for_provider.privacy.clone(),
    }
}

/// A field is satisfied when it is unset or equal to what GitHub reports
fn field_matches(desired: Option<&str>, observed: Option<&str>) -> bool {
    desired.is_none() || desired == observed
}

fn is_up_to_date(params: &TeamParameters, observed: &GitHubTeam) -> bool {
    field_matches(params.description.as_deref(), observed.description.as_deref())
        && field_matches(params.privacy.as_deref(), observed.privacy.as_deref())
}

fn record_observation(mr: &mut Team, observed: &GitHubTeam) {
    let at_provider = &mut mr.managed_status_mut().at_provider;
    at_provider.node_id = Some(observed.node_id.clone());
    at_provider.id = Some(observed.id);
    at_provider.slug = Some(observed.slug.clone());
}

impl TeamExternal {
    /// Team by slug, `None` when GitHub answers 404
    async fn find(&self, org: &str, slug: &str) -> anyhow::Result<Option<GitHubTeam>> {
        match self.service.get_team_by_slug(org, slug).await {
            Ok(team) => Ok(Some(team)),
            Err(e) if e.is_not_found() => {
                debug!(org = %org, slug = %slug, "team.not_found");
                Ok(None)
            }
            Err(e) => Err(anyhow::Error::new(e).context("cannot get Team")),
        }
    }
}

#[async_trait]
impl ExternalClient<Team> for TeamExternal {
    async fn observe(&self, mr: &mut Team) -> anyhow::Result<ExternalObservation> {
        let org = mr.spec.for_provider.org.clone();
        let slug = get_external_name(mr);

        let observed = match self.find(&org, &slug).await? {
            Some(team) => team,
            None => {
                // The slug recorded on create is used when the external name never caught up
                let recorded = mr
                    .managed_status()
                    .and_then(|s| s.at_provider.slug.clone())
                    .filter(|recorded| *recorded != slug);
                let Some(recorded) = recorded else {
                    return Ok(ExternalObservation::missing());
                };
                let Some(team) = self.find(&org, &recorded).await? else {
                    return Ok(ExternalObservation::missing());
                };
                info!(org = %org, slug = %team.slug, "team found by recorded slug");
                set_external_name(mr, &team.slug);
                team
            }
        };

        record_observation(mr, &observed);

        Ok(ExternalObservation::exists(is_up_to_date(
            &mr.spec.for_provider,
            &observed,
        )))
    }

    async fn create(&self, mr: &mut Team) -> anyhow::Result<ExternalCreation> {
        let body = new_team(mr);
        let created = self
            .service
            .create_team(&mr.spec.for_provider.org, &body)
            .await
            .context("cannot create Team")?;
        record_observation(mr, &created);

        if created.slug == body.name {
            return Ok(ExternalCreation::default());
        }
        debug!(name = %body.name, slug = %created.slug, "team.slug_differs_from_name");
        Ok(ExternalCreation {
            external_name: Some(created.slug),
        })
    }

    async fn update(&self, mr: &Team) -> anyhow::Result<()> {
        self.service
            .edit_team_by_slug(&mr.spec.for_provider.org, &get_external_name(mr), &new_team(mr))
            .await
            .context("cannot update Team")?;
        Ok(())
    }

    async fn delete(&self, mr: &Team) -> anyhow::Result<()> {
        match self
            .service
            .delete_team_by_slug(&mr.spec.for_provider.org, &get_external_name(mr))
            .await
        {
            Ok(()) => Ok(()),
            Err(e) if e.is_not_found() => Ok(()),
            Err(e) => Err(anyhow::Error::new(e).context("cannot delete Team")),
        }
    }
}
