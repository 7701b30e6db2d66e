//! Submission pipeline
//!
//! Planner → ref choreography → remote reconciliation → stack comments.
//! Each stage consumes the previous stage's output; the only feedback edge
//! is the reconciler writing confirmed PR metadata back into the graph.

mod choreograph;
mod comment;
mod plan;
mod progress;
mod reconcile;

pub use choreograph::run_choreography;
pub use comment::{COMMENT_MARKER, THIS_PR_MARKER, comment_stack_on_prs, generate_stack_comment};
pub use plan::{SubmitOptions, plan_submission};
pub use progress::{NoopProgress, Phase, ProgressCallback};
pub use reconcile::{SubmitOutcome, SubmitStatus, reconcile_pull_request, submit_pull_request};

use crate::error::Result;
use crate::graph::StackGraph;
use crate::platform::PlatformService;
use crate::types::{SubmissionIntent, SubmitAction};

/// Result of a full stack submission
#[derive(Debug, Default)]
pub struct SubmissionReport {
    /// Per-branch outcomes, in submission order
    pub outcomes: Vec<SubmitOutcome>,
    /// Whether this was a dry run (nothing was pushed or created)
    pub dry_run: bool,
}

/// Submit `branches` of the stack as pull requests.
///
/// `branches` must exclude the trunk and be ordered parents-first (the
/// graph's [`StackGraph::stack_order`] gives this order). Any failure
/// aborts the remaining branches; work already confirmed by the remote
/// stays in place.
pub async fn submit_stack(
    graph: &mut dyn StackGraph,
    platform: &dyn PlatformService,
    branches: &[String],
    options: &SubmitOptions,
    progress: &dyn ProgressCallback,
) -> Result<SubmissionReport> {
    progress.on_phase(Phase::Planning).await;
    let intents = plan_submission(graph, branches, options)?;

    if intents.is_empty() {
        progress.on_message("All PRs up to date.").await;
        return Ok(SubmissionReport {
            outcomes: Vec::new(),
            dry_run: options.dry_run,
        });
    }

    if options.dry_run {
        report_dry_run(&intents, progress).await;
        return Ok(SubmissionReport {
            outcomes: Vec::new(),
            dry_run: true,
        });
    }

    let outcomes = match run_choreography(graph, platform, &intents, options, progress).await {
        Ok(outcomes) => outcomes,
        Err(e) => {
            progress.on_error(&e).await;
            return Err(e);
        }
    };

    progress.on_phase(Phase::Commenting).await;
    if let Err(e) = comment_stack_on_prs(graph, platform, branches).await {
        progress.on_error(&e).await;
        return Err(e);
    }

    progress.on_phase(Phase::Complete).await;
    Ok(SubmissionReport {
        outcomes,
        dry_run: false,
    })
}

/// Report what would be done without touching the remote
async fn report_dry_run(intents: &[SubmissionIntent], progress: &dyn ProgressCallback) {
    progress
        .on_message("Dry run - no branches will be pushed and no PRs will be opened or updated.")
        .await;
    for intent in intents {
        let line = match intent.action {
            SubmitAction::Create => format!(
                "  would create PR for {} (base: {})",
                intent.head, intent.base
            ),
            SubmitAction::Update => format!(
                "  would update PR #{} for {}",
                intent.pr_number.unwrap_or_default(),
                intent.head
            ),
        };
        progress.on_message(&line).await;
    }
}
