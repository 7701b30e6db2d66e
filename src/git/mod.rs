//! Git plumbing: command runner and bulk ref pusher

use crate::error::{Error, Result};
use crate::graph::{PushOptions, RefPusher};
use crate::types::RefPushOp;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::debug;

/// Runs git commands inside one repository
#[derive(Debug, Clone)]
pub struct GitRunner {
    repo_root: PathBuf,
}

impl GitRunner {
    /// Use `root` as the repository working directory
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            repo_root: root.into(),
        }
    }

    /// Discover the repository containing `path`
    pub async fn discover(path: &Path) -> Result<Self> {
        let out = run_in(path, &["rev-parse", "--show-toplevel"]).await?;
        Ok(Self::new(out))
    }

    /// Run a git command, returning trimmed stdout
    pub async fn run(&self, args: &[&str]) -> Result<String> {
        run_in(&self.repo_root, args).await
    }

    /// Resolve a ref to a full commit SHA
    pub async fn rev_parse(&self, refname: &str) -> Result<String> {
        self.run(&["rev-parse", "--verify", "--quiet", &format!("{refname}^{{commit}}")])
            .await
    }

    /// First line of a commit's message
    pub async fn commit_summary(&self, refname: &str) -> Result<String> {
        self.run(&["log", "-1", "--format=%s", refname]).await
    }

    /// URL of a named remote
    pub async fn remote_url(&self, remote: &str) -> Result<String> {
        self.run(&["remote", "get-url", remote])
            .await
            .map_err(|_| Error::RemoteNotFound(remote.to_string()))
    }

    /// The repository's git directory
    pub async fn git_dir(&self) -> Result<PathBuf> {
        let out = self.run(&["rev-parse", "--absolute-git-dir"]).await?;
        Ok(PathBuf::from(out))
    }
}

async fn run_in(dir: &Path, args: &[&str]) -> Result<String> {
    debug!("git {}", args.join(" "));
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .await?;

    if output.status.success() {
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    } else {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        Err(Error::Git(format!("git {} failed: {stderr}", args.join(" "))))
    }
}

/// [`RefPusher`] that shells out to `git push`.
///
/// Every bulk call is one `git push` invocation with refspecs
/// `src:dest` (empty `src` deletes `dest`). Non-force pushes use
/// `--force-with-lease` so a remote ref that moved since the last fetch
/// rejects the push instead of being overwritten.
pub struct GitRefPusher {
    runner: GitRunner,
}

impl GitRefPusher {
    /// Push through the given runner's repository
    pub fn new(runner: GitRunner) -> Self {
        Self { runner }
    }
}

#[async_trait]
impl RefPusher for GitRefPusher {
    async fn push_bulk(&self, remote: &str, ops: &[RefPushOp], opts: PushOptions) -> Result<()> {
        if ops.is_empty() {
            return Ok(());
        }

        let force = if opts.force_push {
            "--force"
        } else {
            "--force-with-lease"
        };
        let refspecs: Vec<String> = ops.iter().map(|op| format!("{}:{}", op.src, op.dest)).collect();

        let mut args = vec!["push", remote, force];
        args.extend(refspecs.iter().map(String::as_str));
        if opts.dry_run {
            args.push("--dry-run");
        }

        match self.runner.run(&args).await {
            Ok(_) => Ok(()),
            Err(Error::Git(msg)) if msg.contains("stale info") => {
                Err(Error::StaleRef {
                    branch: rejected_branch(&msg, ops),
                })
            }
            Err(e) => Err(e),
        }
    }
}

/// Best-effort mapping of a lease rejection back to a branch name
fn rejected_branch(stderr: &str, ops: &[RefPushOp]) -> String {
    ops.iter()
        .find(|op| stderr.contains(&op.dest))
        .or_else(|| ops.first())
        .map(|op| {
            op.dest
                .strip_prefix("refs/heads/")
                .unwrap_or(&op.dest)
                .to_string()
        })
        .unwrap_or_default()
}
