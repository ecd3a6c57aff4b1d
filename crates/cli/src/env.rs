// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access.
//!
//! All runtime environment variables used by the CLI are defined here
//! with typed accessor functions. The variable name constants are generated
//! by `build.rs` and live in the [`vars`] submodule.

/// Generated environment variable name constants.
pub mod vars {
    include!(concat!(env!("OUT_DIR"), "/env_vars.rs"));
}

fn non_empty(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Returns the raw value of `TERMINUS_BUILD_TOOLS_WORKFLOW_TIMEOUT` if set.
///
/// The value is parsed by the config layer so that a bad value is reported
/// with the variable's name.
pub fn workflow_timeout() -> Option<String> {
    non_empty(vars::WORKFLOW_TIMEOUT)
}

/// Returns the log filter directive from `PCEX_LOG` if set.
pub fn log_filter() -> Option<String> {
    non_empty(vars::PCEX_LOG)
}

/// Returns the platform CLI binary from `PCEX_TERMINUS` if set.
pub fn terminus() -> Option<String> {
    non_empty(vars::PCEX_TERMINUS)
}

/// Returns the ssh binary from `PCEX_SSH` if set.
pub fn ssh() -> Option<String> {
    non_empty(vars::PCEX_SSH)
}

/// Returns the rsync binary from `PCEX_RSYNC` if set.
pub fn rsync() -> Option<String> {
    non_empty(vars::PCEX_RSYNC)
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
