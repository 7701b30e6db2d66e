//! Sync command - refresh PR metadata from the remote

use crate::cli::style::{Stylize, check};
use stackmq::error::Result;
use stackmq::git::{GitRefPusher, GitRunner};
use stackmq::graph::{StackGraph, load_stack, save_stack};
use stackmq::platform::{create_platform_service, parse_repo_info};
use stackmq::sync::{SyncStatus, sync_pr_info};
use std::path::Path;
use std::sync::Arc;

/// Run the sync command
pub async fn run_sync(path: &Path) -> Result<()> {
    let git = GitRunner::discover(path).await?;
    let pusher = Arc::new(GitRefPusher::new(git.clone()));
    let mut graph = load_stack(&git, pusher).await?;

    let remote_url = git.remote_url(graph.remote()).await?;
    let platform_config = parse_repo_info(&remote_url)?;
    let platform = create_platform_service(&platform_config).await?;

    let branches = graph.stack_order();
    if branches.is_empty() {
        println!("No branches are tracked on top of {}", graph.trunk().accent());
        return Ok(());
    }

    println!("Syncing PR info for {} branch(es)...", branches.len().accent());
    let results = sync_pr_info(&mut graph, platform.as_ref(), &branches).await?;

    save_stack(&git, &graph).await?;

    for (branch, status) in results {
        match status {
            SyncStatus::Refreshed => {
                let number = graph.pr_info(&branch).map(|pr| pr.number).unwrap_or_default();
                println!("  {} {}: PR #{number}", check(), branch.accent());
            }
            SyncStatus::NoPr => println!("  - {}: {}", branch.accent(), "no PR".muted()),
        }
    }

    Ok(())
}
