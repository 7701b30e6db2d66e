//! stackmq - submit stacked git branches as pull requests
//!
//! Reconciles a locally tracked tree of stacked branches with pull
//! requests on the hosting platform: plans per-branch creates/updates,
//! rewrites the protected `mq/` base branches through a safe ref
//! choreography, and keeps a topology comment on every affected PR.

pub mod auth;
pub mod error;
pub mod git;
pub mod graph;
pub mod platform;
pub mod refs;
pub mod submit;
pub mod sync;
pub mod types;
