//! Core types for stackmq

use serde::{Deserialize, Serialize};

/// State of a remote pull request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrState {
    /// Open for review
    Open,
    /// Closed without merging
    Closed,
    /// Merged into its base
    Merged,
}

/// Aggregate review decision on a pull request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReviewDecision {
    /// At least one review is still required
    ReviewRequired,
    /// Approved by the required reviewers
    Approved,
    /// A reviewer requested changes
    ChangesRequested,
}

/// Remote pull-request metadata attached to a stack branch.
///
/// At most one `PrInfo` exists per branch. Absence means no pull request
/// has been opened for the branch yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrInfo {
    /// PR number
    pub number: u64,
    /// Web URL
    pub url: String,
    /// Remote base ref name (a derived `mq/` branch, not the local parent)
    pub base: String,
    /// PR title
    pub title: Option<String>,
    /// PR body
    pub body: Option<String>,
    /// Open/closed/merged
    pub state: PrState,
    /// Aggregate review decision, when known
    pub review_decision: Option<ReviewDecision>,
    /// Whether the PR is a draft
    pub is_draft: Option<bool>,
}

/// Whether a planned submission creates a new PR or updates an existing one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitAction {
    /// No pull request exists for the branch yet
    Create,
    /// A pull request exists and may need patching
    Update,
}

/// One branch's planned submission, produced fresh per invocation.
///
/// `head_sha` and `base_sha` are resolved by the planner before any push
/// phase runs; planning fails rather than producing an intent without them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionIntent {
    /// Create or update
    pub action: SubmitAction,
    /// Head branch name
    pub head: String,
    /// Tip commit of the head branch
    pub head_sha: String,
    /// Intended PR base ref (the derived protected base)
    pub base: String,
    /// Tip commit of the local parent branch
    pub base_sha: String,
    /// Title; always set for creates, optional for updates
    pub title: Option<String>,
    /// Body, when the caller supplied one
    pub body: Option<String>,
    /// Draft flag, when explicitly requested
    pub draft: Option<bool>,
    /// Reviewer logins to request on create
    pub reviewers: Vec<String>,
    /// Existing PR number; present iff `action` is `Update`
    pub pr_number: Option<u64>,
}

/// A single ref update inside a bulk push.
///
/// An empty `src` deletes `dest` on the remote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefPushOp {
    /// Commit-ish to push, or empty for deletion
    pub src: String,
    /// Fully-qualified destination ref (`refs/heads/<name>`)
    pub dest: String,
}

impl RefPushOp {
    /// Push `src` to `dest`
    pub fn update(src: impl Into<String>, dest: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            dest: dest.into(),
        }
    }

    /// Delete `dest` on the remote
    pub fn delete(dest: impl Into<String>) -> Self {
        Self {
            src: String::new(),
            dest: dest.into(),
        }
    }

    /// Whether this op deletes its destination ref
    pub fn is_delete(&self) -> bool {
        self.src.is_empty()
    }
}

/// A pull request as returned by the hosting platform
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequest {
    /// PR number
    pub number: u64,
    /// Web URL for the PR
    pub html_url: String,
    /// Base branch name
    pub base_ref: String,
    /// Head branch name
    pub head_ref: String,
    /// PR title
    pub title: String,
    /// PR body
    pub body: Option<String>,
    /// Open/closed/merged
    pub state: PrState,
    /// Aggregate review decision, when the platform reports one
    pub review_decision: Option<ReviewDecision>,
    /// Whether the PR is a draft
    pub is_draft: bool,
}

/// A comment on a pull request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrComment {
    /// Comment ID
    pub id: u64,
    /// Comment body text
    pub body: String,
}

/// Detected platform type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Platform {
    /// GitHub or GitHub Enterprise
    GitHub,
}

/// Platform configuration
#[derive(Debug, Clone)]
pub struct PlatformConfig {
    /// Platform type
    pub platform: Platform,
    /// Repository owner (user or organization)
    pub owner: String,
    /// Repository name
    pub repo: String,
    /// Custom host (None for github.com)
    pub host: Option<String>,
}
