//! Submit command - submit the tracked stack as pull requests

use crate::cli::style::{Stylize, check, cross};
use async_trait::async_trait;
use stackmq::error::{Error, Result};
use stackmq::git::{GitRefPusher, GitRunner};
use stackmq::graph::{StackGraph, load_stack, save_stack};
use stackmq::platform::{create_platform_service, parse_repo_info};
use stackmq::submit::{
    Phase, ProgressCallback, SubmitOptions, SubmitOutcome, SubmitStatus, submit_stack,
};
use std::path::Path;
use std::sync::Arc;

/// CLI progress callback that prints to stdout
struct CliProgress;

#[async_trait]
impl ProgressCallback for CliProgress {
    async fn on_phase(&self, phase: Phase) {
        match phase {
            Phase::Planning => println!("Planning submission..."),
            Phase::Preflight => println!("Checking remote branches..."),
            Phase::PreparingBases => println!("Preparing base branches..."),
            Phase::RewritingBases => println!("Pushing branches and rewriting bases..."),
            Phase::Reconciling => println!("Creating/updating PRs..."),
            Phase::CleaningUp => println!("Cleaning up temporary branches..."),
            Phase::Commenting => println!("Updating stack comments..."),
            Phase::Complete => println!("{} Done", check()),
        }
    }

    async fn on_pr_submitted(&self, branch: &str, outcome: &SubmitOutcome) {
        let status = match outcome.status {
            SubmitStatus::Created => format!("{}", "created".success()),
            SubmitStatus::Updated => format!("{}", "updated".warn()),
            SubmitStatus::Noop => format!("{}", "noop".muted()),
        };
        println!("  {}: {} ({status})", branch.accent(), outcome.url);
    }

    async fn on_error(&self, error: &Error) {
        eprintln!("{} {}", cross(), error.to_string().error());
    }

    async fn on_message(&self, message: &str) {
        println!("{message}");
    }
}

/// Run the submit command
pub async fn run_submit(
    path: &Path,
    branches: &[String],
    options: &SubmitOptions,
) -> Result<()> {
    let git = GitRunner::discover(path).await?;
    let pusher = Arc::new(GitRefPusher::new(git.clone()));
    let mut graph = load_stack(&git, pusher).await?;

    // Detect the hosting platform from the stack's remote
    let remote_url = git.remote_url(graph.remote()).await?;
    let platform_config = parse_repo_info(&remote_url)?;
    let platform = create_platform_service(&platform_config).await?;

    // Default to the whole stack; explicit branches must be tracked
    let branches = if branches.is_empty() {
        graph.stack_order()
    } else {
        for branch in branches {
            if !graph.contains(branch) {
                return Err(Error::BranchNotFound(branch.clone()));
            }
        }
        branches.to_vec()
    };

    if branches.is_empty() {
        println!("No branches are tracked on top of {}", graph.trunk().accent());
        return Ok(());
    }

    println!(
        "Submitting {} branch{} stacked on {}:",
        branches.len().accent(),
        if branches.len() == 1 { "" } else { "es" },
        graph.trunk().accent()
    );
    for branch in &branches {
        println!("  - {}", branch.accent());
    }
    println!();

    let progress = CliProgress;
    let result = submit_stack(&mut graph, platform.as_ref(), &branches, options, &progress).await;

    // PR metadata confirmed before a failure is still worth keeping
    save_stack(&git, &graph).await?;

    let report = result?;
    if !report.dry_run && !report.outcomes.is_empty() {
        println!();
        println!(
            "{} Submitted {} branch{}",
            check(),
            report.outcomes.len(),
            if report.outcomes.len() == 1 { "" } else { "es" }
        );
    }

    Ok(())
}
