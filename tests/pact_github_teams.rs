//! Pact contract tests for the GitHub teams API
//!
//! Each test drives [`GitHubClient`] against a Pact mock server, so the
//! recorded contract is exactly what the controller sends.

mod common;

use common::{base_url, init_rustls};
use pact_consumer::prelude::*;
use provider_github::github::{GitHubClient, NewTeam, TeamsService};
use serde_json::json;

const CONSUMER: &str = "Provider-GitHub";
const PROVIDER: &str = "GitHub-Teams-API";

fn client_for(mock_url: impl std::fmt::Display) -> GitHubClient {
    GitHubClient::new("test-token", &base_url(mock_url))
        .expect("Failed to create GitHub client")
}

#[tokio::test]
async fn test_get_team_by_slug_contract() {
    init_rustls();
    let mut pact_builder = PactBuilder::new(CONSUMER, PROVIDER);

    pact_builder.interaction("get a team by slug", "", |mut i| {
        i.given("team platform exists in org acme");
        i.request
            .method("GET")
            .path("/orgs/acme/teams/platform")
            .header("authorization", "Bearer test-token")
            .header("accept", "application/vnd.github+json")
            .header("x-github-api-version", "2022-11-28");
        i.response
            .status(200)
            .header("content-type", "application/json")
            .json_body(json!({
                "id": 1,
                "node_id": "MDQ6VGVhbTE=",
                "slug": "platform",
                "name": "platform",
                "description": "Platform engineering",
                "privacy": "closed"
            }));
        i
    });

    let mock_server = pact_builder.start_mock_server(None, None);
    let client = client_for(mock_server.url());

    let team = client
        .get_team_by_slug("acme", "platform")
        .await
        .expect("Failed to get team");

    assert_eq!(team.node_id, "MDQ6VGVhbTE=");
    assert_eq!(team.description.as_deref(), Some("Platform engineering"));
    assert_eq!(team.privacy.as_deref(), Some("closed"));
}

#[tokio::test]
async fn test_get_missing_team_contract() {
    init_rustls();
    let mut pact_builder = PactBuilder::new(CONSUMER, PROVIDER);

    pact_builder.interaction("get a team that does not exist", "", |mut i| {
        i.given("team ghost does not exist in org acme");
        i.request.method("GET").path("/orgs/acme/teams/ghost");
        i.response
            .status(404)
            .header("content-type", "application/json")
            .json_body(json!({
                "message": "Not Found",
                "documentation_url": "https://docs.github.com/rest/teams/teams#get-a-team-by-name"
            }));
        i
    });

    let mock_server = pact_builder.start_mock_server(None, None);
    let client = client_for(mock_server.url());

    let err = client
        .get_team_by_slug("acme", "ghost")
        .await
        .expect_err("Missing team should be an error");

    assert!(err.is_not_found());
    assert_eq!(err.to_string(), "GitHub API returned 404: Not Found");
}

#[tokio::test]
async fn test_create_team_contract() {
    init_rustls();
    let mut pact_builder = PactBuilder::new(CONSUMER, PROVIDER);

    pact_builder.interaction("create a team", "", |mut i| {
        i.given("org acme exists");
        i.request
            .method("POST")
            .path("/orgs/acme/teams")
            .header("authorization", "Bearer test-token")
            .json_body(json!({
                "name": "Platform Team",
                "description": "Platform engineering",
                "privacy": "closed"
            }));
        i.response
            .status(201)
            .header("content-type", "application/json")
            .json_body(json!({
                "id": 2,
                "node_id": "MDQ6VGVhbTI=",
                "slug": "platform-team",
                "name": "Platform Team",
                "description": "Platform engineering",
                "privacy": "closed"
            }));
        i
    });

    let mock_server = pact_builder.start_mock_server(None, None);
    let client = client_for(mock_server.url());

    let team = client
        .create_team(
            "acme",
            &NewTeam {
                name: "Platform Team".to_string(),
                description: Some("Platform engineering".to_string()),
                privacy: Some("closed".to_string()),
            },
        )
        .await
        .expect("Failed to create team");

    assert_eq!(team.slug, "platform-team");
    assert_eq!(team.id, 2);
}

#[tokio::test]
async fn test_edit_team_contract() {
    init_rustls();
    let mut pact_builder = PactBuilder::new(CONSUMER, PROVIDER);

    pact_builder.interaction("edit a team by slug", "", |mut i| {
        i.given("team platform exists in org acme");
        i.request
            .method("PATCH")
            .path("/orgs/acme/teams/platform")
            .json_body(json!({
                "name": "platform",
                "privacy": "secret"
            }));
        i.response
            .status(200)
            .header("content-type", "application/json")
            .json_body(json!({
                "id": 1,
                "node_id": "MDQ6VGVhbTE=",
                "slug": "platform",
                "name": "platform",
                "description": null,
                "privacy": "secret"
            }));
        i
    });

    let mock_server = pact_builder.start_mock_server(None, None);
    let client = client_for(mock_server.url());

    let team = client
        .edit_team_by_slug(
            "acme",
            "platform",
            &NewTeam {
                name: "platform".to_string(),
                description: None,
                privacy: Some("secret".to_string()),
            },
        )
        .await
        .expect("Failed to edit team");

    assert_eq!(team.privacy.as_deref(), Some("secret"));
    assert_eq!(team.description, None);
}

#[tokio::test]
async fn test_delete_team_contract() {
    init_rustls();
    let mut pact_builder = PactBuilder::new(CONSUMER, PROVIDER);

    pact_builder.interaction("delete a team by slug", "", |mut i| {
        i.given("team platform exists in org acme");
        i.request
            .method("DELETE")
            .path("/orgs/acme/teams/platform")
            .header("authorization", "Bearer test-token");
        i.response.status(204);
        i
    });

    let mock_server = pact_builder.start_mock_server(None, None);
    let client = client_for(mock_server.url());

    client
        .delete_team_by_slug("acme", "platform")
        .await
        .expect("Failed to delete team");
}

#[tokio::test]
async fn test_forbidden_error_message_contract() {
    init_rustls();
    let mut pact_builder = PactBuilder::new(CONSUMER, PROVIDER);

    pact_builder.interaction("create a team without admin rights", "", |mut i| {
        i.given("the token cannot administer org acme");
        i.request.method("POST").path("/orgs/acme/teams");
        i.response
            .status(403)
            .header("content-type", "application/json")
            .json_body(json!({
                "message": "Must have admin rights to Repository."
            }));
        i
    });

    let mock_server = pact_builder.start_mock_server(None, None);
    let client = client_for(mock_server.url());

    let err = client
        .create_team(
            "acme",
            &NewTeam {
                name: "platform".to_string(),
                ..NewTeam::default()
            },
        )
        .await
        .expect_err("Forbidden create should fail");

    assert!(!err.is_not_found());
    assert_eq!(err.status(), Some(403));
    assert_eq!(
        err.to_string(),
        "GitHub API returned 403: Must have admin rights to Repository."
    );
}
