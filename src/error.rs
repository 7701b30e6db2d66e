//! Error types for stackmq

use thiserror::Error;

/// Convenience alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// All errors surfaced by stackmq
#[derive(Debug, Error)]
pub enum Error {
    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("{0}")]
    Precondition(String),

    #[error(
        "remote head of '{branch}' moved since it was last observed; \
         fetch and restack, or pass --force to overwrite"
    )]
    StaleRef { branch: String },

    #[error("failed to submit '{branch}': {message}")]
    Submit { branch: String, message: String },

    #[error("GitHub API error: {0}")]
    GitHubApi(#[from] octocrab::Error),

    #[error("Platform error: {0}")]
    Platform(String),

    #[error("Git error: {0}")]
    Git(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Branch not found: {0}")]
    BranchNotFound(String),

    #[error("Remote not found: {0}")]
    RemoteNotFound(String),

    #[error("No supported remotes found (expected a GitHub remote)")]
    NoSupportedRemotes,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Best human-readable message for an error returned by the hosting
    /// API, unwrapping the server-provided message when there is one.
    pub fn remote_message(&self) -> String {
        match self {
            Self::GitHubApi(octocrab::Error::GitHub { source, .. }) => source.message.clone(),
            Self::Platform(msg) => msg.clone(),
            other => other.to_string(),
        }
    }
}
