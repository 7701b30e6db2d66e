//! Stack graph seam
//!
//! The submission pipeline reads branch topology and PR metadata through the
//! [`StackGraph`] trait and mutates remote refs through its bulk-push
//! primitive. How the underlying tree is persisted is a collaborator
//! concern; [`BranchArena`] is the in-memory implementation backed by the
//! TOML store.

mod arena;
mod store;

pub use arena::BranchArena;
pub use store::{BranchEntry, StackStore, load_stack, save_stack, store_path};

use crate::error::Result;
use crate::types::{PrInfo, RefPushOp};
use async_trait::async_trait;

/// Options for a bulk ref push
#[derive(Debug, Clone, Copy, Default)]
pub struct PushOptions {
    /// Validate the push without moving any refs
    pub dry_run: bool,
    /// Use true force instead of force-with-lease, discarding concurrent
    /// external changes to the pushed refs
    pub force_push: bool,
}

/// Executes bulk ref pushes against a remote.
///
/// All ref updates in one call are submitted as a single push; the remote
/// applies them independently. A non-force push that is rejected because a
/// remote ref moved since it was last fetched must surface as
/// [`crate::error::Error::StaleRef`].
#[async_trait]
pub trait RefPusher: Send + Sync {
    /// Push every op in `ops` to `remote` in one operation
    async fn push_bulk(&self, remote: &str, ops: &[RefPushOp], opts: PushOptions) -> Result<()>;
}

/// Read and mutate the branch stack.
///
/// Topology is a tree rooted at the trunk; a branch with more than one
/// child is a fan-out point. The pipeline never creates or destroys
/// branches through this trait, it only reads topology and commit SHAs,
/// upserts PR metadata, and pushes refs.
#[async_trait]
pub trait StackGraph: Send + Sync {
    /// Name of the trunk branch
    fn trunk(&self) -> &str;

    /// Whether `branch` is the trunk
    fn is_trunk(&self, branch: &str) -> bool {
        branch == self.trunk()
    }

    /// Parent of `branch`, if it has one (the trunk has none)
    fn parent(&self, branch: &str) -> Option<&str>;

    /// Children of `branch`, in insertion order
    fn children(&self, branch: &str) -> Vec<String>;

    /// Whether `branch` is tracked in the stack (including the trunk)
    fn contains(&self, branch: &str) -> bool;

    /// All non-trunk branches in submission order: preorder from the
    /// trunk, so every parent precedes its children.
    fn stack_order(&self) -> Vec<String>;

    /// Tip commit of `branch`, when resolvable
    fn head_sha(&self, branch: &str) -> Option<&str>;

    /// First line of the head commit's message, used for create titles
    fn commit_summary(&self, branch: &str) -> Option<&str>;

    /// PR metadata for `branch`, if a pull request exists
    fn pr_info(&self, branch: &str) -> Option<&PrInfo>;

    /// Record fresh PR metadata for `branch`
    fn upsert_pr_info(&mut self, branch: &str, info: PrInfo);

    /// Name of the git remote this stack pushes to
    fn remote(&self) -> &str;

    /// Execute one bulk ref push against the stack's remote
    async fn push_bulk(&self, ops: &[RefPushOp], opts: PushOptions) -> Result<()>;
}
