//! # Membership Adapter
//!
//! Observe, add, and remove GitHub team memberships for [`Membership`] resources.
//!
//! Memberships are addressed by organization, team slug, and user login.
//! Adding a membership is idempotent on GitHub, so update reuses it.

use crate::crd::{Membership, MembershipParameters};
use crate::github::{GitHubError, TeamMembership, TeamsService};
use crate::managed::{
    ConnectError, Connector, ExternalClient, ExternalCreation, ExternalObservation, GitHubConnector,
    Managed,
};
use anyhow::Context as _;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct MembershipExternal {
    service: Arc<dyn TeamsService>,
}

impl MembershipExternal {
    #[must_use]
    pub fn new(service: Arc<dyn TeamsService>) -> Self {
        Self { service }
    }

    async fn put(&self, params: &MembershipParameters) -> Result<TeamMembership, GitHubError> {
        self.service
            .add_team_membership_by_slug(
                &params.org,
                &params.team,
                &params.user,
                params.role.as_deref(),
            )
            .await
    }
}

#[async_trait]
impl Connector<Membership> for GitHubConnector {
    async fn connect(
        &self,
        mr: &Membership,
    ) -> Result<Box<dyn ExternalClient<Membership>>, ConnectError> {
        let service = self.connect_service(mr).await?;
        Ok(Box::new(MembershipExternal::new(service)))
    }
}

#[async_trait]
impl ExternalClient<Membership> for MembershipExternal {
    async fn observe(&self, mr: &mut Membership) -> anyhow::Result<ExternalObservation> {
        let params = &mr.spec.for_provider;
        let observed = match self
            .service
            .get_team_membership_by_slug(&params.org, &params.team, &params.user)
            .await
        {
            Ok(membership) => membership,
            Err(e) if e.is_not_found() => {
                debug!(org = %params.org, team = %params.team, user = %params.user, "membership.not_found");
                return Ok(ExternalObservation::missing());
            }
            Err(e) => return Err(anyhow::Error::new(e).context("cannot get Membership")),
        };

        let up_to_date = params
            .role
            .as_deref()
            .is_none_or(|role| role == observed.role);

        let at_provider = &mut mr.managed_status_mut().at_provider;
        at_provider.state = Some(observed.state);
        at_provider.role = Some(observed.role);

        Ok(ExternalObservation::exists(up_to_date))
    }

    async fn create(&self, mr: &mut Membership) -> anyhow::Result<ExternalCreation> {
        let membership = self
            .put(&mr.spec.for_provider)
            .await
            .context("cannot create Membership")?;
        debug!(state = %membership.state, role = %membership.role, "membership.added");

        let at_provider = &mut mr.managed_status_mut().at_provider;
        at_provider.state = Some(membership.state);
        at_provider.role = Some(membership.role);
        Ok(ExternalCreation::default())
    }

    async fn update(&self, mr: &Membership) -> anyhow::Result<()> {
        if mr.spec.for_provider.role.is_none() {
            return Ok(());
        }
        self.put(&mr.spec.for_provider)
            .await
            .context("cannot update Membership")?;
        Ok(())
    }

    async fn delete(&self, mr: &Membership) -> anyhow::Result<()> {
        let params = &mr.spec.for_provider;
        match self
            .service
            .remove_team_membership_by_slug(&params.org, &params.team, &params.user)
            .await
        {
            Ok(()) => Ok(()),
            Err(e) if e.is_not_found() => Ok(()),
            Err(e) => Err(anyhow::Error::new(e).context("cannot delete Membership")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crd::{MembershipSpec, ResourceSpec};
    use crate::github::fake::FakeTeams;

    fn membership(role: Option<&str>) -> Membership {
        Membership::new(
            "platform-octocat",
            MembershipSpec {
                resource_spec: ResourceSpec::default(),
                for_provider: MembershipParameters {
                    org: "acme".to_string(),
                    team: "platform".to_string(),
                    user: "octocat".to_string(),
                    role: role.map(str::to_string),
                },
            },
        )
    }

    fn existing(role: &str, state: &str) -> FakeTeams {
        FakeTeams::with_membership(
            "acme",
            "platform",
            "octocat",
            TeamMembership {
                url: None,
                role: role.to_string(),
                state: state.to_string(),
            },
        )
    }

    fn external(fake: FakeTeams) -> (MembershipExternal, Arc<FakeTeams>) {
        let fake = Arc::new(fake);
        (
            MembershipExternal::new(Arc::clone(&fake) as Arc<dyn TeamsService>),
            fake,
        )
    }

    #[tokio::test]
    async fn test_observe_missing_membership() {
        let (external, fake) = external(FakeTeams::default());
        let mut mr = membership(None);

        let observation = external.observe(&mut mr).await.unwrap();

        assert_eq!(observation, ExternalObservation::missing());
        assert_eq!(fake.calls(), vec!["get_membership acme/platform/octocat"]);
    }

    #[tokio::test]
    async fn test_observe_records_state_and_role() {
        let (external, _) = external(existing("maintainer", "pending"));
        let mut mr = membership(Some("maintainer"));

        let observation = external.observe(&mut mr).await.unwrap();

        assert_eq!(observation, ExternalObservation::exists(true));
        let at_provider = &mr.status.unwrap().at_provider;
        assert_eq!(at_provider.state.as_deref(), Some("pending"));
        assert_eq!(at_provider.role.as_deref(), Some("maintainer"));
    }

    #[tokio::test]
    async fn test_observe_role_mismatch_is_not_up_to_date() {
        let (external, _) = external(existing("member", "active"));
        let mut mr = membership(Some("maintainer"));

        let observation = external.observe(&mut mr).await.unwrap();

        assert_eq!(observation, ExternalObservation::exists(false));
    }

    #[tokio::test]
    async fn test_observe_unset_role_is_up_to_date() {
        let (external, _) = external(existing("maintainer", "active"));
        let mut mr = membership(None);

        let observation = external.observe(&mut mr).await.unwrap();

        assert!(observation.resource_up_to_date);
    }

    #[tokio::test]
    async fn test_observe_other_errors_are_returned() {
        let (external, _) = external(FakeTeams::failing(502));
        let mut mr = membership(None);

        let err = external.observe(&mut mr).await.unwrap_err();

        assert_eq!(err.to_string(), "cannot get Membership");
    }

    #[tokio::test]
    async fn test_create_sends_role_only_when_set() {
        let (external, fake) = external(FakeTeams::default());

        external.create(&mut membership(None)).await.unwrap();
        external.create(&mut membership(Some("maintainer"))).await.unwrap();

        assert_eq!(
            fake.calls(),
            vec![
                "add_membership acme/platform/octocat role=-",
                "add_membership acme/platform/octocat role=maintainer",
            ]
        );
    }

    #[tokio::test]
    async fn test_create_records_returned_state() {
        let (external, _) = external(FakeTeams::default());
        let mut mr = membership(Some("maintainer"));

        external.create(&mut mr).await.unwrap();

        let at_provider = &mr.status.unwrap().at_provider;
        assert_eq!(at_provider.state.as_deref(), Some("active"));
        assert_eq!(at_provider.role.as_deref(), Some("maintainer"));
    }

    #[tokio::test]
    async fn test_update_without_role_is_a_no_op() {
        let (external, fake) = external(existing("member", "active"));

        external.update(&membership(None)).await.unwrap();

        assert!(fake.calls().is_empty());
    }

    #[tokio::test]
    async fn test_update_puts_desired_role() {
        let (external, fake) = external(existing("member", "active"));

        external.update(&membership(Some("maintainer"))).await.unwrap();

        let memberships = fake.memberships.lock().unwrap();
        assert_eq!(memberships["acme/platform/octocat"].role, "maintainer");
    }

    #[tokio::test]
    async fn test_update_errors_are_wrapped() {
        let (external, _) = external(FakeTeams::failing(422));

        let err = external.update(&membership(Some("maintainer"))).await.unwrap_err();

        assert_eq!(err.to_string(), "cannot update Membership");
    }

    #[tokio::test]
    async fn test_delete_tolerates_not_found() {
        let (external, fake) = external(existing("member", "active"));
        let mr = membership(None);

        external.delete(&mr).await.unwrap();
        external.delete(&mr).await.unwrap();

        assert!(fake.memberships.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_errors_are_wrapped() {
        let (external, _) = external(FakeTeams::failing(500));

        let err = external.delete(&membership(None)).await.unwrap_err();

        assert_eq!(err.to_string(), "cannot delete Membership");
    }
}
