//! Test data factories and a recording ref pusher
//!
//! These are test utilities - not all may be used in current tests but are
//! available for future test development.

#![allow(dead_code)]

use async_trait::async_trait;
use stackmq::error::{Error, Result};
use stackmq::graph::{BranchArena, PushOptions, RefPusher};
use stackmq::types::{PrInfo, PrState, PullRequest, RefPushOp};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

/// One recorded bulk push
#[derive(Debug, Clone)]
pub struct PushCall {
    pub ops: Vec<RefPushOp>,
    pub dry_run: bool,
    pub force_push: bool,
}

#[derive(Default)]
struct PusherState {
    /// Simulated remote refs: dest -> pushed commit-ish
    refs: HashMap<String, String>,
    calls: Vec<PushCall>,
    /// Remote ref state after each recorded call
    snapshots: Vec<HashMap<String, String>>,
    /// Branches whose remote heads moved since last observed
    stale_branches: HashSet<String>,
}

/// [`RefPusher`] that applies bulk pushes to an in-memory ref table and
/// records every call plus a snapshot of the refs after it.
///
/// A branch marked stale rejects any lease-checked (non-force) push that
/// touches its head, like `--force-with-lease` against a moved remote ref.
#[derive(Default)]
pub struct RecordingPusher {
    state: Mutex<PusherState>,
}

impl RecordingPusher {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Pretend `dest` already exists on the remote at `src`
    pub fn seed_ref(&self, dest: &str, src: &str) {
        let mut state = self.state.lock().unwrap();
        state.refs.insert(dest.to_string(), src.to_string());
    }

    /// Make lease-checked pushes of `branch`'s head fail
    pub fn mark_stale(&self, branch: &str) {
        let mut state = self.state.lock().unwrap();
        state.stale_branches.insert(branch.to_string());
    }

    pub fn calls(&self) -> Vec<PushCall> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Ref tables captured after each bulk call
    pub fn snapshots(&self) -> Vec<HashMap<String, String>> {
        self.state.lock().unwrap().snapshots.clone()
    }

    /// Whether `dest` currently exists on the simulated remote
    pub fn has_ref(&self, dest: &str) -> bool {
        self.state.lock().unwrap().refs.contains_key(dest)
    }

    /// Commit-ish the simulated remote holds for `dest`
    pub fn ref_value(&self, dest: &str) -> Option<String> {
        self.state.lock().unwrap().refs.get(dest).cloned()
    }

    /// Indices of calls whose ops satisfy `pred`
    pub fn calls_matching(&self, pred: impl Fn(&PushCall) -> bool) -> Vec<usize> {
        self.calls()
            .iter()
            .enumerate()
            .filter(|(_, c)| pred(c))
            .map(|(i, _)| i)
            .collect()
    }
}

#[async_trait]
impl RefPusher for RecordingPusher {
    async fn push_bulk(&self, _remote: &str, ops: &[RefPushOp], opts: PushOptions) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(PushCall {
            ops: ops.to_vec(),
            dry_run: opts.dry_run,
            force_push: opts.force_push,
        });

        if !opts.force_push {
            for op in ops {
                let branch = op.dest.strip_prefix("refs/heads/").unwrap_or(&op.dest);
                if state.stale_branches.contains(branch) {
                    let snapshot = state.refs.clone();
                    state.snapshots.push(snapshot);
                    return Err(Error::StaleRef {
                        branch: branch.to_string(),
                    });
                }
            }
        }

        if !opts.dry_run {
            for op in ops {
                if op.is_delete() {
                    state.refs.remove(&op.dest);
                } else {
                    state.refs.insert(op.dest.clone(), op.src.clone());
                }
            }
        }

        let snapshot = state.refs.clone();
        state.snapshots.push(snapshot);
        Ok(())
    }
}

/// Create PR metadata with default values
pub fn make_pr_info(number: u64, base: &str) -> PrInfo {
    PrInfo {
        number,
        url: format!("https://github.com/testowner/testrepo/pull/{number}"),
        base: base.to_string(),
        title: Some(format!("PR #{number}")),
        body: None,
        state: PrState::Open,
        review_decision: None,
        is_draft: None,
    }
}

/// Create a platform pull request with default values
pub fn make_pull_request(number: u64, head: &str, base: &str) -> PullRequest {
    PullRequest {
        number,
        html_url: format!("https://github.com/testowner/testrepo/pull/{number}"),
        base_ref: base.to_string(),
        head_ref: head.to_string(),
        title: format!("PR #{number}"),
        body: None,
        state: PrState::Open,
        review_decision: None,
        is_draft: false,
    }
}

/// Build a linear stack: main <- names[0] <- names[1] <- ...
///
/// Every branch gets a head SHA `<name>-sha` and a commit summary
/// `Commit for <name>`; the trunk tip is `main-sha`.
pub fn make_linear_stack(names: &[&str], pusher: Arc<RecordingPusher>) -> BranchArena {
    let mut graph = BranchArena::new("main", "origin", pusher);
    graph.set_head_sha("main", "main-sha").unwrap();

    let mut parent = "main".to_string();
    for name in names {
        graph.add_branch(name, &parent).unwrap();
        graph.set_head_sha(name, &format!("{name}-sha")).unwrap();
        graph
            .set_commit_summary(name, &format!("Commit for {name}"))
            .unwrap();
        parent = (*name).to_string();
    }
    graph
}

/// Build a fan-out stack: main <- root <- {children...}
pub fn make_fan_out_stack(
    root: &str,
    children: &[&str],
    pusher: Arc<RecordingPusher>,
) -> BranchArena {
    let mut graph = BranchArena::new("main", "origin", pusher);
    graph.set_head_sha("main", "main-sha").unwrap();
    graph.add_branch(root, "main").unwrap();
    graph.set_head_sha(root, &format!("{root}-sha")).unwrap();
    graph
        .set_commit_summary(root, &format!("Commit for {root}"))
        .unwrap();

    for name in children {
        graph.add_branch(name, root).unwrap();
        graph.set_head_sha(name, &format!("{name}-sha")).unwrap();
        graph
            .set_commit_summary(name, &format!("Commit for {name}"))
            .unwrap();
    }
    graph
}
