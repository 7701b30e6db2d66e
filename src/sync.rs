//! Out-of-band PR metadata sync
//!
//! Refreshes the stored `PrInfo` for tracked branches from the remote,
//! outside a submission. The stored base is deliberately left untouched:
//! a PR's base is a derived `mq/` ref, not the branch's local parent, so
//! remote data must not clobber it.

use crate::error::Result;
use crate::graph::StackGraph;
use crate::platform::PlatformService;
use crate::types::{PrInfo, PullRequest};
use tracing::debug;

/// Result of syncing one branch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStatus {
    /// Metadata refreshed from the remote
    Refreshed,
    /// No pull request exists for the branch
    NoPr,
}

/// Refresh PR metadata for `branches` from the hosting platform.
///
/// Branches with a stored PR number are fetched by number; others are
/// looked up by head branch so PRs opened out-of-band get picked up.
pub async fn sync_pr_info(
    graph: &mut dyn StackGraph,
    platform: &dyn PlatformService,
    branches: &[String],
) -> Result<Vec<(String, SyncStatus)>> {
    let mut results = Vec::with_capacity(branches.len());

    for branch in branches {
        let known_number = graph.pr_info(branch).map(|pr| pr.number);

        let remote_pr = match known_number {
            Some(number) => Some(platform.get_pr(number).await?),
            None => platform.find_existing_pr(branch).await?,
        };

        let status = match remote_pr {
            Some(pr) => {
                debug!("refreshed PR #{} for '{branch}'", pr.number);
                upsert(graph, branch, &pr);
                SyncStatus::Refreshed
            }
            None => SyncStatus::NoPr,
        };
        results.push((branch.clone(), status));
    }

    Ok(results)
}

fn upsert(graph: &mut dyn StackGraph, branch: &str, pr: &PullRequest) {
    // Keep the stored base: the remote reports the mq/ base ref, and that
    // is exactly what the stored value already tracks, except mid-rewrite
    // when the remote may transiently name a temp-mq/ ref.
    let base = graph
        .pr_info(branch)
        .map_or_else(|| pr.base_ref.clone(), |prev| prev.base.clone());
    // Refresh the review decision when the platform reports one; not
    // every transport carries it.
    let review_decision = pr
        .review_decision
        .or_else(|| graph.pr_info(branch).and_then(|prev| prev.review_decision));

    graph.upsert_pr_info(
        branch,
        PrInfo {
            number: pr.number,
            url: pr.html_url.clone(),
            base,
            title: Some(pr.title.clone()),
            body: pr.body.clone(),
            state: pr.state,
            review_decision,
            is_draft: Some(pr.is_draft),
        },
    );
}
