//! Derived ref naming for protected bases and indirection branches
//!
//! The `mq/` and `temp-mq/` prefixes are reserved; stack branches must not
//! use them. Names are derived on demand and never stored.

/// Prefix of protected base branches
pub const BASE_PREFIX: &str = "mq/";

/// Prefix of transient indirection branches
pub const TEMP_BASE_PREFIX: &str = "temp-mq/";

/// Protected remote base branch for a stack branch
pub fn base_branch_name(branch: &str) -> String {
    format!("{BASE_PREFIX}{branch}")
}

/// Transient indirection branch for a stack branch
pub fn temp_base_branch_name(branch: &str) -> String {
    format!("{TEMP_BASE_PREFIX}{branch}")
}

/// Fully-qualified push destination for a branch name
pub fn remote_dest(branch: &str) -> String {
    format!("refs/heads/{branch}")
}

/// Whether a branch name collides with the reserved prefixes
pub fn is_reserved(branch: &str) -> bool {
    branch.starts_with(BASE_PREFIX) || branch.starts_with(TEMP_BASE_PREFIX)
}
