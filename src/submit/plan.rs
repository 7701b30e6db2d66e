//! Submission planning
//!
//! Turns a set of candidate branches into one [`SubmissionIntent`] per
//! branch that needs a create or an update. Planning is pure: it reads the
//! stack graph and never touches the remote.

use crate::error::{Error, Result};
use crate::graph::StackGraph;
use crate::refs;
use crate::types::{SubmissionIntent, SubmitAction};

/// Options controlling a submission
#[derive(Debug, Clone, Default)]
pub struct SubmitOptions {
    /// Open new PRs as drafts
    pub draft: bool,
    /// Mark PRs ready for review
    pub publish: bool,
    /// Only update branches that already have PRs
    pub update_only: bool,
    /// Report the plan without pushing or calling the remote
    pub dry_run: bool,
    /// Use true force pushes, discarding concurrent remote changes
    pub force_push: bool,
    /// Reviewer logins to request on newly created PRs
    pub reviewers: Vec<String>,
}

impl SubmitOptions {
    /// Draft flag to carry on intents; `None` when neither `--draft` nor
    /// `--publish` was requested so existing PR state is left untouched.
    fn draft_flag(&self) -> Option<bool> {
        match (self.draft, self.publish) {
            (true, false) => Some(true),
            (false, true) => Some(false),
            _ => None,
        }
    }
}

/// Plan a submission for `branches` (already filtered to exclude the trunk).
///
/// Every branch with an existing PR becomes an `Update` intent carrying its
/// PR number; every other branch becomes a `Create` intent, unless
/// `update_only` skips it. A branch whose head or parent tip cannot be
/// resolved fails planning outright.
pub fn plan_submission(
    graph: &dyn StackGraph,
    branches: &[String],
    options: &SubmitOptions,
) -> Result<Vec<SubmissionIntent>> {
    if options.draft && options.publish {
        return Err(Error::Precondition(
            "can't use both --publish and --draft in one submit".to_string(),
        ));
    }

    let mut intents = Vec::with_capacity(branches.len());

    for branch in branches {
        if graph.is_trunk(branch) {
            return Err(Error::Precondition(format!(
                "trunk branch '{branch}' cannot be submitted"
            )));
        }
        if !graph.contains(branch) {
            return Err(Error::BranchNotFound(branch.clone()));
        }

        let existing = graph.pr_info(branch);
        if existing.is_none() && options.update_only {
            continue;
        }

        let head_sha = graph
            .head_sha(branch)
            .ok_or_else(|| {
                Error::Precondition(format!("cannot resolve head commit of '{branch}'"))
            })?
            .to_string();

        let parent = graph
            .parent(branch)
            .ok_or_else(|| Error::Internal(format!("non-trunk branch '{branch}' has no parent")))?
            .to_string();
        let base_sha = graph
            .head_sha(&parent)
            .ok_or_else(|| {
                Error::Precondition(format!(
                    "cannot resolve base commit of '{branch}' (parent '{parent}')"
                ))
            })?
            .to_string();

        let intent = match existing {
            Some(pr) => SubmissionIntent {
                action: SubmitAction::Update,
                head: branch.clone(),
                head_sha,
                base: refs::base_branch_name(branch),
                base_sha,
                title: None,
                body: None,
                draft: options.draft_flag(),
                reviewers: Vec::new(),
                pr_number: Some(pr.number),
            },
            None => SubmissionIntent {
                action: SubmitAction::Create,
                head: branch.clone(),
                head_sha,
                base: refs::base_branch_name(branch),
                base_sha,
                title: Some(
                    graph
                        .commit_summary(branch)
                        .unwrap_or(branch.as_str())
                        .to_string(),
                ),
                body: None,
                draft: options.draft_flag(),
                reviewers: options.reviewers.clone(),
                pr_number: None,
            },
        };
        intents.push(intent);
    }

    Ok(intents)
}
