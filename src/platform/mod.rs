//! Hosting platform services
//!
//! Provides a unified interface for the pull-request operations the
//! submission pipeline needs.

mod detection;
mod factory;
mod github;

pub use detection::{detect_platform, parse_repo_info};
pub use factory::create_platform_service;
pub use github::GitHubService;

use crate::error::Result;
use crate::types::{PlatformConfig, PrComment, PullRequest};
use async_trait::async_trait;

/// Fields for a create-pull-request call
#[derive(Debug, Clone)]
pub struct CreatePr {
    /// Head branch
    pub head: String,
    /// Base branch
    pub base: String,
    /// Title
    pub title: String,
    /// Body
    pub body: Option<String>,
    /// Open as draft
    pub draft: Option<bool>,
    /// Reviewer logins to request
    pub reviewers: Vec<String>,
}

/// Fields for a patch-pull-request call.
///
/// `None` fields are left untouched on the remote.
#[derive(Debug, Clone, Default)]
pub struct UpdatePr {
    /// New title
    pub title: Option<String>,
    /// New body
    pub body: Option<String>,
    /// New base branch
    pub base: Option<String>,
}

/// Platform service trait for pull-request operations
///
/// This trait abstracts the hosting API, letting the submission pipeline
/// and its tests share one call surface.
#[async_trait]
pub trait PlatformService: Send + Sync {
    /// Create a new PR
    async fn create_pr(&self, req: &CreatePr) -> Result<PullRequest>;

    /// Fetch a PR by number
    async fn get_pr(&self, number: u64) -> Result<PullRequest>;

    /// Find an existing open PR for a head branch
    async fn find_existing_pr(&self, head_branch: &str) -> Result<Option<PullRequest>>;

    /// Patch an existing PR; only `Some` fields are written
    async fn update_pr(&self, number: u64, update: &UpdatePr) -> Result<PullRequest>;

    /// List comments on a PR
    async fn list_pr_comments(&self, pr_number: u64) -> Result<Vec<PrComment>>;

    /// Create a comment on a PR
    async fn create_pr_comment(&self, pr_number: u64, body: &str) -> Result<()>;

    /// Update an existing comment on a PR
    async fn update_pr_comment(&self, pr_number: u64, comment_id: u64, body: &str) -> Result<()>;

    /// Get the platform configuration
    fn config(&self) -> &PlatformConfig;
}
