//! Remote reconciliation
//!
//! Translates one [`SubmissionIntent`] into a create-or-patch call against
//! the hosting API, skipping the write when nothing changed, and folds the
//! confirmed response back into the stack graph's PR metadata.

use crate::error::{Error, Result};
use crate::graph::StackGraph;
use crate::platform::{CreatePr, PlatformService, UpdatePr};
use crate::types::{PrInfo, PrState, ReviewDecision, SubmissionIntent, SubmitAction};

/// What the reconciler did for one branch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitStatus {
    /// A new PR was opened
    Created,
    /// An existing PR was patched
    Updated,
    /// The existing PR already matched the intent; no write was issued
    Noop,
}

/// Per-branch reconciliation result
#[derive(Debug, Clone)]
pub struct SubmitOutcome {
    /// Head branch
    pub head: String,
    /// PR number
    pub number: u64,
    /// PR web URL
    pub url: String,
    /// Created, updated, or noop
    pub status: SubmitStatus,
}

/// Create or update the pull request described by `intent`.
///
/// Updates first fetch the remote PR and diff it against the intent; the
/// patch is only issued when the title or body provided by the intent
/// differs, or the remote base ref is not the intended base. Fields the
/// intent leaves unset are never overwritten.
pub async fn submit_pull_request(
    graph: &mut dyn StackGraph,
    platform: &dyn PlatformService,
    intent: &SubmissionIntent,
) -> Result<SubmitOutcome> {
    let outcome = reconcile_pull_request(platform, intent).await?;
    record_outcome(graph, intent, &outcome);
    Ok(outcome)
}

/// Like [`submit_pull_request`] but without the graph write-back.
///
/// Used while existing PRs are temporarily re-pointed at indirection
/// branches; the transient base must not be persisted as PR metadata.
pub async fn reconcile_pull_request(
    platform: &dyn PlatformService,
    intent: &SubmissionIntent,
) -> Result<SubmitOutcome> {
    match intent.action {
        SubmitAction::Create => create(platform, intent).await,
        SubmitAction::Update => update(platform, intent).await,
    }
    .map_err(|e| Error::Submit {
        branch: intent.head.clone(),
        message: e.remote_message(),
    })
}

async fn create(platform: &dyn PlatformService, intent: &SubmissionIntent) -> Result<SubmitOutcome> {
    let title = intent
        .title
        .clone()
        .ok_or_else(|| Error::Internal("create intent without a title".to_string()))?;

    let pr = platform
        .create_pr(&CreatePr {
            head: intent.head.clone(),
            base: intent.base.clone(),
            title,
            body: intent.body.clone(),
            draft: intent.draft,
            reviewers: intent.reviewers.clone(),
        })
        .await?;

    Ok(SubmitOutcome {
        head: intent.head.clone(),
        number: pr.number,
        url: pr.html_url,
        status: SubmitStatus::Created,
    })
}

async fn update(platform: &dyn PlatformService, intent: &SubmissionIntent) -> Result<SubmitOutcome> {
    let number = intent
        .pr_number
        .ok_or_else(|| Error::Internal("update intent without a PR number".to_string()))?;

    let existing = platform.get_pr(number).await?;

    let title_changed = intent
        .title
        .as_ref()
        .is_some_and(|t| *t != existing.title);
    let body_changed = intent
        .body
        .as_ref()
        .is_some_and(|b| existing.body.as_ref() != Some(b));
    let base_changed = existing.base_ref != intent.base;

    if !(title_changed || body_changed || base_changed) {
        return Ok(SubmitOutcome {
            head: intent.head.clone(),
            number,
            url: existing.html_url,
            status: SubmitStatus::Noop,
        });
    }

    let pr = platform
        .update_pr(
            number,
            &UpdatePr {
                title: intent.title.clone(),
                body: intent.body.clone(),
                base: Some(intent.base.clone()),
            },
        )
        .await?;

    Ok(SubmitOutcome {
        head: intent.head.clone(),
        number: pr.number,
        url: pr.html_url,
        status: SubmitStatus::Updated,
    })
}

/// Fold a confirmed create/update back into the graph's PR metadata.
///
/// The state is known to be open because the submit succeeded. Title, body
/// and review decision are only (re)written on create; the draft flag only
/// when the intent set it explicitly.
fn record_outcome(graph: &mut dyn StackGraph, intent: &SubmissionIntent, outcome: &SubmitOutcome) {
    let prev = graph.pr_info(&intent.head).cloned();

    let (title, body, review_decision) = if intent.action == SubmitAction::Create {
        (
            intent.title.clone(),
            intent.body.clone(),
            Some(ReviewDecision::ReviewRequired),
        )
    } else {
        (
            prev.as_ref().and_then(|p| p.title.clone()),
            prev.as_ref().and_then(|p| p.body.clone()),
            prev.as_ref().and_then(|p| p.review_decision),
        )
    };

    let is_draft = intent.draft.or(prev.as_ref().and_then(|p| p.is_draft));

    graph.upsert_pr_info(
        &intent.head,
        PrInfo {
            number: outcome.number,
            url: outcome.url.clone(),
            base: intent.base.clone(),
            title,
            body,
            state: PrState::Open,
            review_decision,
            is_draft,
        },
    );
}
