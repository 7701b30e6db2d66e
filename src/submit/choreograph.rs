//! Ref choreography for protected base branches
//!
//! The `mq/<branch>` bases are shielded by branch protection, so they can
//! only be rewritten by deleting and recreating them. The choreography
//! keeps every open PR pointed at a ref that exists throughout:
//!
//! 1. lease-checked dry-run push of the updated heads (conflict pre-flight)
//! 2. recreate `temp-mq/<head>` at the current remote base and re-point
//!    existing PRs at it
//! 3. delete every `mq/<head>`, then recreate it at the new base commit,
//!    recreating `temp-mq/<head>` at the same commit in the same bulk call
//!    and publishing the head commits
//! 4. create/patch the PRs against the real `mq/<head>`
//! 5. delete the `temp-mq/<head>` scaffolding
//!
//! Safety comes from the ordering of the bulk calls, not from cross-ref
//! atomicity. A failure after the pre-flight is surfaced as-is; leftover
//! `temp-mq/*` branches are an accepted residue the next run cleans up.

use crate::error::Result;
use crate::graph::{PushOptions, StackGraph};
use crate::platform::PlatformService;
use crate::refs;
use crate::submit::plan::SubmitOptions;
use crate::submit::progress::{Phase, ProgressCallback};
use crate::submit::reconcile::{SubmitOutcome, reconcile_pull_request, submit_pull_request};
use crate::types::{RefPushOp, SubmissionIntent, SubmitAction};
use tracing::debug;

/// Execute the full push-and-reconcile choreography for planned intents.
///
/// Returns the per-branch outcomes in intent order.
pub async fn run_choreography(
    graph: &mut dyn StackGraph,
    platform: &dyn PlatformService,
    intents: &[SubmissionIntent],
    options: &SubmitOptions,
    progress: &dyn ProgressCallback,
) -> Result<Vec<SubmitOutcome>> {
    let push_opts = PushOptions {
        dry_run: false,
        force_push: options.force_push,
    };

    progress.on_phase(Phase::Preflight).await;
    preflight(graph, intents, options).await?;

    progress.on_phase(Phase::PreparingBases).await;
    prepare_bases(graph, platform, intents, push_opts).await?;

    progress.on_phase(Phase::RewritingBases).await;
    rewrite_bases(graph, intents, push_opts).await?;

    progress.on_phase(Phase::Reconciling).await;
    let mut outcomes = Vec::with_capacity(intents.len());
    for intent in intents {
        let outcome = submit_pull_request(graph, platform, intent).await?;
        progress.on_pr_submitted(&intent.head, &outcome).await;
        outcomes.push(outcome);
    }

    progress.on_phase(Phase::CleaningUp).await;
    cleanup_temp_bases(graph, intents, push_opts).await?;

    Ok(outcomes)
}

fn updates(intents: &[SubmissionIntent]) -> impl Iterator<Item = &SubmissionIntent> {
    intents
        .iter()
        .filter(|i| i.action == SubmitAction::Update)
}

/// Lease-checked dry-run push of every updated head.
///
/// Rejects the whole submission before any destructive step if a remote
/// head moved since it was last observed (unless true force was requested).
async fn preflight(
    graph: &dyn StackGraph,
    intents: &[SubmissionIntent],
    options: &SubmitOptions,
) -> Result<()> {
    let ops: Vec<RefPushOp> = updates(intents)
        .map(|i| RefPushOp::update(i.head_sha.clone(), refs::remote_dest(&i.head)))
        .collect();
    if ops.is_empty() {
        return Ok(());
    }

    debug!("pre-flight dry-run push of {} head(s)", ops.len());
    graph
        .push_bulk(
            &ops,
            PushOptions {
                dry_run: true,
                force_push: options.force_push,
            },
        )
        .await
}

/// Point every existing PR at a fresh `temp-mq/<head>` indirection branch
/// so its base ref stays valid while the real base is rewritten.
async fn prepare_bases(
    graph: &mut dyn StackGraph,
    platform: &dyn PlatformService,
    intents: &[SubmissionIntent],
    push_opts: PushOptions,
) -> Result<()> {
    let stale_temps: Vec<RefPushOp> = updates(intents)
        .map(|i| RefPushOp::delete(refs::remote_dest(&refs::temp_base_branch_name(&i.head))))
        .collect();
    if stale_temps.is_empty() {
        return Ok(());
    }

    // Drop any scaffolding a previous failed run left behind
    graph.push_bulk(&stale_temps, push_opts).await?;

    // Copy the current remote base into the indirection branch
    let remote = graph.remote().to_string();
    let temp_copies: Vec<RefPushOp> = updates(intents)
        .map(|i| {
            RefPushOp::update(
                format!("{remote}/{}", refs::base_branch_name(&i.head)),
                refs::remote_dest(&refs::temp_base_branch_name(&i.head)),
            )
        })
        .collect();
    graph.push_bulk(&temp_copies, push_opts).await?;

    // Re-point the PRs; the transient base is deliberately not recorded
    // in the graph's PR metadata.
    for intent in updates(intents) {
        let mut temp_intent = intent.clone();
        temp_intent.base = refs::temp_base_branch_name(&intent.head);
        reconcile_pull_request(platform, &temp_intent).await?;
    }

    Ok(())
}

/// Delete and recreate the protected bases, publishing the new heads in the
/// same bulk call that recreates the bases.
async fn rewrite_bases(
    graph: &dyn StackGraph,
    intents: &[SubmissionIntent],
    push_opts: PushOptions,
) -> Result<()> {
    let deletions: Vec<RefPushOp> = intents
        .iter()
        .map(|i| RefPushOp::delete(refs::remote_dest(&refs::base_branch_name(&i.head))))
        .collect();
    graph.push_bulk(&deletions, push_opts).await?;

    // Recreating temp-mq at the same commit keeps any PR still pointed at
    // the indirection branch consistent with the final diff.
    let recreations: Vec<RefPushOp> = intents
        .iter()
        .flat_map(|i| {
            [
                RefPushOp::update(i.head_sha.clone(), refs::remote_dest(&i.head)),
                RefPushOp::update(
                    i.base_sha.clone(),
                    refs::remote_dest(&refs::base_branch_name(&i.head)),
                ),
                RefPushOp::update(
                    i.base_sha.clone(),
                    refs::remote_dest(&refs::temp_base_branch_name(&i.head)),
                ),
            ]
        })
        .collect();
    graph.push_bulk(&recreations, push_opts).await
}

/// Delete every `temp-mq/<head>` created by this submission
async fn cleanup_temp_bases(
    graph: &dyn StackGraph,
    intents: &[SubmissionIntent],
    push_opts: PushOptions,
) -> Result<()> {
    let deletions: Vec<RefPushOp> = intents
        .iter()
        .map(|i| RefPushOp::delete(refs::remote_dest(&refs::temp_base_branch_name(&i.head))))
        .collect();
    graph.push_bulk(&deletions, push_opts).await
}
