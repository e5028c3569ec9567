//! Error types for the GitHub provider

use bridge_traits::error::BridgeError;
use thiserror::Error;

/// GitHub provider errors
#[derive(Error, Debug)]
pub enum GitHubError {
    /// API request returned an unexpected status
    #[error("GitHub API error (status {status_code}): {message}")]
    ApiError { status_code: u16, message: String },

    /// No release carries the configured tag
    #[error("Release not found: {owner}/{repo}@{tag}")]
    ReleaseNotFound {
        owner: String,
        repo: String,
        tag: String,
    },

    /// Failed to parse API response
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Bridge error
    #[error(transparent)]
    BridgeError(#[from] BridgeError),
}

/// Result type for GitHub operations
pub type Result<T> = std::result::Result<T, GitHubError>;

impl From<GitHubError> for BridgeError {
    fn from(error: GitHubError) -> Self {
        match error {
            GitHubError::ApiError {
                status_code,
                message,
            } => BridgeError::OperationFailed(format!(
                "API error (status {}): {}",
                status_code, message
            )),
            GitHubError::ReleaseNotFound { owner, repo, tag } => BridgeError::OperationFailed(
                format!("Release not found: {}/{}@{}", owner, repo, tag),
            ),
            GitHubError::ParseError(msg) => {
                BridgeError::OperationFailed(format!("Parse error: {}", msg))
            }
            GitHubError::BridgeError(e) => e,
        }
    }
}
