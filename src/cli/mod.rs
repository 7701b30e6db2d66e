//! CLI commands
//!
//! Command implementations for the `stackmq` binary.

mod auth;
mod style;
mod submit;
mod sync;

pub use auth::run_auth;
pub use submit::run_submit;
pub use sync::run_sync;
