//! Errors returned by the GitHub client.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GitHubError {
    #[error("GitHub token is empty")]
    EmptyToken,

    #[error("invalid GitHub API base URL '{0}'")]
    InvalidBaseUrl(String),

    #[error("failed to build HTTP client")]
    Client(#[source] reqwest::Error),

    #[error("request to GitHub failed")]
    Request(#[from] reqwest::Error),

    #[error("GitHub API returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("failed to decode GitHub response")]
    Decode(#[source] reqwest::Error),
}

impl GitHubError {
    /// HTTP status of an API error
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The requested object does not exist
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}
