//! Progress callback trait for interface-agnostic updates
//!
//! Lets different interfaces (CLI, tests) observe the submission pipeline
//! without the pipeline knowing how updates are rendered.

use crate::error::Error;
use crate::submit::reconcile::SubmitOutcome;
use async_trait::async_trait;

/// Submission phase, in pipeline order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Planning create/update intents
    Planning,
    /// Lease-checked dry-run push of updated heads
    Preflight,
    /// Creating indirection branches and re-pointing existing PR bases
    PreparingBases,
    /// Deleting and recreating the protected base branches
    RewritingBases,
    /// Creating and patching pull requests
    Reconciling,
    /// Deleting the temporary indirection branches
    CleaningUp,
    /// Writing stack comments on affected PRs
    Commenting,
    /// Submission complete
    Complete,
}

/// Progress callback trait
#[async_trait]
pub trait ProgressCallback: Send + Sync {
    /// Called when entering a new phase
    async fn on_phase(&self, phase: Phase);

    /// Called after one branch's PR was created, patched, or left as-is
    async fn on_pr_submitted(&self, branch: &str, outcome: &SubmitOutcome);

    /// Called with the failure before the submission aborts
    async fn on_error(&self, error: &Error);

    /// Called with a general status message
    async fn on_message(&self, message: &str);
}

/// No-op progress callback for testing or when progress isn't needed
pub struct NoopProgress;

#[async_trait]
impl ProgressCallback for NoopProgress {
    async fn on_phase(&self, _phase: Phase) {}
    async fn on_pr_submitted(&self, _branch: &str, _outcome: &SubmitOutcome) {}
    async fn on_error(&self, _error: &Error) {}
    async fn on_message(&self, _message: &str) {}
}
