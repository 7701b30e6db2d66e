//! TOML persistence for the branch stack
//!
//! The stack file lives inside `.git` so it follows the clone around
//! without being part of the committed tree. It records the trunk, the
//! remote, each branch's parent, and the last-known PR metadata.

use crate::error::{Error, Result};
use crate::git::GitRunner;
use crate::graph::{BranchArena, RefPusher, StackGraph};
use crate::types::PrInfo;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::warn;

const STORE_FILE: &str = "stackmq_store.toml";

/// One tracked branch in the store file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BranchEntry {
    /// Branch name
    pub name: String,
    /// Parent branch name
    pub parent: String,
    /// Last-known PR metadata
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pr: Option<PrInfo>,
}

/// Serialized form of the branch stack
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StackStore {
    /// Trunk branch name
    pub trunk: String,
    /// Remote the stack pushes to
    #[serde(default = "default_remote")]
    pub remote: String,
    /// Tracked branches
    #[serde(default, rename = "branch")]
    pub branches: Vec<BranchEntry>,
}

fn default_remote() -> String {
    "origin".to_string()
}

impl StackStore {
    /// Parse a store file
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        toml::from_str(&raw).map_err(|e| Error::Parse(format!("invalid stack store: {e}")))
    }

    /// Write the store file
    pub fn save(&self, path: &Path) -> Result<()> {
        let raw = toml::to_string_pretty(self)
            .map_err(|e| Error::Internal(format!("failed to serialize stack store: {e}")))?;
        std::fs::write(path, raw)?;
        Ok(())
    }

    /// Snapshot a graph back into its serialized form
    pub fn from_graph(graph: &BranchArena) -> Self {
        let branches = graph
            .stack_order()
            .into_iter()
            .map(|name| {
                let parent = graph
                    .parent(&name)
                    .unwrap_or_else(|| graph.trunk())
                    .to_string();
                let pr = graph.pr_info(&name).cloned();
                BranchEntry { name, parent, pr }
            })
            .collect();
        Self {
            trunk: graph.trunk().to_string(),
            remote: graph.remote().to_string(),
            branches,
        }
    }

    /// Build an arena from the store, resolving commit SHAs through git.
    ///
    /// Entries may appear in any order; passes repeat until every entry's
    /// parent is present. A branch whose tip no longer resolves is kept
    /// with no head SHA and rejected later by the planner if selected.
    pub async fn into_arena(
        self,
        git: &GitRunner,
        pusher: Arc<dyn RefPusher>,
    ) -> Result<BranchArena> {
        let mut arena = BranchArena::new(&self.trunk, &self.remote, pusher);

        let mut pending = self.branches;
        while !pending.is_empty() {
            let before = pending.len();
            let mut deferred = Vec::new();
            for entry in pending {
                if arena.contains(&entry.parent) {
                    arena.add_branch(&entry.name, &entry.parent)?;
                    if let Some(pr) = entry.pr {
                        arena.upsert_pr_info(&entry.name, pr);
                    }
                } else {
                    deferred.push(entry);
                }
            }
            if deferred.len() == before {
                let names: Vec<&str> = deferred.iter().map(|e| e.name.as_str()).collect();
                return Err(Error::Parse(format!(
                    "stack store has unreachable branches (missing or cyclic parents): {}",
                    names.join(", ")
                )));
            }
            pending = deferred;
        }

        let mut all = vec![arena.trunk().to_string()];
        all.extend(arena.stack_order());
        for branch in all {
            match git.rev_parse(&branch).await {
                Ok(sha) => arena.set_head_sha(&branch, &sha)?,
                Err(e) => warn!("cannot resolve tip of '{branch}': {e}"),
            }
            if let Ok(summary) = git.commit_summary(&branch).await {
                arena.set_commit_summary(&branch, &summary)?;
            }
        }

        Ok(arena)
    }
}

/// Path of the store file inside the repository's git dir
pub async fn store_path(git: &GitRunner) -> Result<PathBuf> {
    Ok(git.git_dir().await?.join(STORE_FILE))
}

/// Load the stack tracked in `git`'s repository
pub async fn load_stack(git: &GitRunner, pusher: Arc<dyn RefPusher>) -> Result<BranchArena> {
    let path = store_path(git).await?;
    if !path.exists() {
        return Err(Error::Precondition(format!(
            "no stack is tracked here yet; create {} first",
            path.display()
        )));
    }
    StackStore::load(&path)?.into_arena(git, pusher).await
}

/// Persist the stack (including refreshed PR metadata) back to disk
pub async fn save_stack(git: &GitRunner, graph: &BranchArena) -> Result<()> {
    let path = store_path(git).await?;
    StackStore::from_graph(graph).save(&path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PrState;

    #[test]
    fn store_round_trips_through_toml() {
        let store = StackStore {
            trunk: "main".to_string(),
            remote: "origin".to_string(),
            branches: vec![
                BranchEntry {
                    name: "feat-a".to_string(),
                    parent: "main".to_string(),
                    pr: Some(PrInfo {
                        number: 12,
                        url: "https://github.com/o/r/pull/12".to_string(),
                        base: "mq/feat-a".to_string(),
                        title: Some("Add feature A".to_string()),
                        body: None,
                        state: PrState::Open,
                        review_decision: None,
                        is_draft: Some(false),
                    }),
                },
                BranchEntry {
                    name: "feat-b".to_string(),
                    parent: "feat-a".to_string(),
                    pr: None,
                },
            ],
        };

        let raw = toml::to_string_pretty(&store).unwrap();
        let parsed: StackStore = toml::from_str(&raw).unwrap();
        assert_eq!(parsed.trunk, "main");
        assert_eq!(parsed.branches.len(), 2);
        assert_eq!(parsed.branches[0].pr.as_ref().unwrap().number, 12);
        assert!(parsed.branches[1].pr.is_none());
    }

    #[test]
    fn missing_remote_defaults_to_origin() {
        let parsed: StackStore = toml::from_str("trunk = \"main\"").unwrap();
        assert_eq!(parsed.remote, "origin");
        assert!(parsed.branches.is_empty());
    }

    #[test]
    fn save_and_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(STORE_FILE);
        let store = StackStore {
            trunk: "main".to_string(),
            remote: "origin".to_string(),
            branches: vec![],
        };
        store.save(&path).unwrap();
        let loaded = StackStore::load(&path).unwrap();
        assert_eq!(loaded.trunk, "main");
    }
}
