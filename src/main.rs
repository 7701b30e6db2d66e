//! stackmq - stacked PRs behind protected merge-queue bases
//!
//! CLI binary for submitting stacked branches as pull requests.

use anyhow::Result;
use clap::{Parser, Subcommand};
use stackmq::submit::SubmitOptions;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod cli;

#[derive(Parser)]
#[command(name = "stackmq")]
#[command(about = "Stacked PRs behind protected merge-queue base branches")]
#[command(version)]
struct Cli {
    /// Path to the git repository (defaults to current directory)
    #[arg(short, long, global = true)]
    path: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Submit the tracked stack as pull requests
    Submit {
        /// Branches to submit (defaults to the whole stack)
        branches: Vec<String>,

        /// Open new PRs as drafts
        #[arg(long)]
        draft: bool,

        /// Mark PRs ready for review
        #[arg(long, conflicts_with = "draft")]
        publish: bool,

        /// Only update branches that already have PRs
        #[arg(long)]
        update_only: bool,

        /// Show what would be done without making changes
        #[arg(long)]
        dry_run: bool,

        /// Force-push, overwriting concurrent changes to remote branches
        #[arg(long)]
        force: bool,

        /// Request a reviewer on newly created PRs (repeatable)
        #[arg(long = "reviewer")]
        reviewers: Vec<String>,
    },

    /// Refresh stored PR metadata from the remote
    Sync,

    /// Authentication management
    Auth {
        #[command(subcommand)]
        action: AuthAction,
    },
}

#[derive(Subcommand)]
enum AuthAction {
    /// Test authentication
    Test,
    /// Show authentication setup instructions
    Setup,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let path = cli.path.unwrap_or_else(|| PathBuf::from("."));

    match cli.command {
        Commands::Submit {
            branches,
            draft,
            publish,
            update_only,
            dry_run,
            force,
            reviewers,
        } => {
            let options = SubmitOptions {
                draft,
                publish,
                update_only,
                dry_run,
                force_push: force,
                reviewers,
            };
            cli::run_submit(&path, &branches, &options).await?;
        }
        Commands::Sync => {
            cli::run_sync(&path).await?;
        }
        Commands::Auth { action } => {
            let action_str = match action {
                AuthAction::Test => "test",
                AuthAction::Setup => "setup",
            };
            cli::run_auth(action_str).await?;
        }
    }

    Ok(())
}
