//! Arena-backed stack graph
//!
//! Branch records live in a flat arena with index-based parent/child links,
//! so the tree carries no reference cycles and lookups stay cheap.

use crate::error::{Error, Result};
use crate::graph::{PushOptions, RefPusher, StackGraph};
use crate::refs;
use crate::types::{PrInfo, RefPushOp};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

/// One branch in the arena
#[derive(Debug, Clone)]
struct BranchRecord {
    name: String,
    parent: Option<usize>,
    children: Vec<usize>,
    head_sha: Option<String>,
    commit_summary: Option<String>,
    pr: Option<PrInfo>,
}

/// In-memory [`StackGraph`] implementation.
///
/// Ref pushes are delegated to an injected [`RefPusher`], which keeps the
/// arena usable both in production (git-backed pusher) and in tests
/// (recording pusher).
pub struct BranchArena {
    records: Vec<BranchRecord>,
    index: HashMap<String, usize>,
    remote: String,
    pusher: Arc<dyn RefPusher>,
}

impl BranchArena {
    /// Create an arena containing only the trunk branch
    pub fn new(trunk: &str, remote: &str, pusher: Arc<dyn RefPusher>) -> Self {
        let record = BranchRecord {
            name: trunk.to_string(),
            parent: None,
            children: Vec::new(),
            head_sha: None,
            commit_summary: None,
            pr: None,
        };
        let mut index = HashMap::new();
        index.insert(trunk.to_string(), 0);
        Self {
            records: vec![record],
            index,
            remote: remote.to_string(),
            pusher,
        }
    }

    /// Track `branch` as a child of `parent`.
    ///
    /// Fails if the name is reserved, already tracked, or the parent is
    /// unknown.
    pub fn add_branch(&mut self, branch: &str, parent: &str) -> Result<()> {
        if refs::is_reserved(branch) {
            return Err(Error::Precondition(format!(
                "branch name '{branch}' uses a reserved prefix"
            )));
        }
        if self.index.contains_key(branch) {
            return Err(Error::Internal(format!(
                "branch '{branch}' is already tracked"
            )));
        }
        let parent_idx = *self
            .index
            .get(parent)
            .ok_or_else(|| Error::BranchNotFound(parent.to_string()))?;

        let idx = self.records.len();
        self.records.push(BranchRecord {
            name: branch.to_string(),
            parent: Some(parent_idx),
            children: Vec::new(),
            head_sha: None,
            commit_summary: None,
            pr: None,
        });
        self.records[parent_idx].children.push(idx);
        self.index.insert(branch.to_string(), idx);
        Ok(())
    }

    /// Record the tip commit of `branch`
    pub fn set_head_sha(&mut self, branch: &str, sha: &str) -> Result<()> {
        let idx = self.lookup(branch)?;
        self.records[idx].head_sha = Some(sha.to_string());
        Ok(())
    }

    /// Record the head commit's summary line for `branch`
    pub fn set_commit_summary(&mut self, branch: &str, summary: &str) -> Result<()> {
        let idx = self.lookup(branch)?;
        self.records[idx].commit_summary = Some(summary.to_string());
        Ok(())
    }

    fn lookup(&self, branch: &str) -> Result<usize> {
        self.index
            .get(branch)
            .copied()
            .ok_or_else(|| Error::BranchNotFound(branch.to_string()))
    }
}

#[async_trait]
impl StackGraph for BranchArena {
    fn trunk(&self) -> &str {
        &self.records[0].name
    }

    fn parent(&self, branch: &str) -> Option<&str> {
        let idx = *self.index.get(branch)?;
        let parent_idx = self.records[idx].parent?;
        Some(&self.records[parent_idx].name)
    }

    fn children(&self, branch: &str) -> Vec<String> {
        self.index
            .get(branch)
            .map(|&idx| {
                self.records[idx]
                    .children
                    .iter()
                    .map(|&c| self.records[c].name.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    fn contains(&self, branch: &str) -> bool {
        self.index.contains_key(branch)
    }

    fn stack_order(&self) -> Vec<String> {
        // Iterative preorder so parents always precede their children
        let mut order = Vec::with_capacity(self.records.len().saturating_sub(1));
        let mut stack: Vec<usize> = self.records[0].children.iter().rev().copied().collect();
        while let Some(idx) = stack.pop() {
            order.push(self.records[idx].name.clone());
            stack.extend(self.records[idx].children.iter().rev());
        }
        order
    }

    fn head_sha(&self, branch: &str) -> Option<&str> {
        let idx = *self.index.get(branch)?;
        self.records[idx].head_sha.as_deref()
    }

    fn commit_summary(&self, branch: &str) -> Option<&str> {
        let idx = *self.index.get(branch)?;
        self.records[idx].commit_summary.as_deref()
    }

    fn pr_info(&self, branch: &str) -> Option<&PrInfo> {
        let idx = *self.index.get(branch)?;
        self.records[idx].pr.as_ref()
    }

    fn upsert_pr_info(&mut self, branch: &str, info: PrInfo) {
        if let Some(&idx) = self.index.get(branch) {
            self.records[idx].pr = Some(info);
        }
    }

    fn remote(&self) -> &str {
        &self.remote
    }

    async fn push_bulk(&self, ops: &[RefPushOp], opts: PushOptions) -> Result<()> {
        self.pusher.push_bulk(&self.remote, ops, opts).await
    }
}
