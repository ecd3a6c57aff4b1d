// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Resolved per-invocation options.

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_MESSAGE: &str = "Config export";
pub const DEFAULT_TIMEOUT_SECS: u64 = 180;
pub const DEFAULT_REMOTE_DESTINATION: &str = "config-export";
pub const DEFAULT_DOCROOT: &str = "web";
/// `{env}` is replaced with the environment id.
pub const DEFAULT_SYNC_DESCRIPTION: &str = "Sync code on {env}";

/// Options for both export commands, after CLI flags, environment and
/// config file have been merged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOptions {
    /// Commit message.
    pub message: String,
    /// Upper bound for each wait loop.
    pub timeout: Duration,
    /// Local destination for remote exports.
    pub destination: Option<PathBuf>,
    /// Remote destination, relative to the private files directory.
    pub remote_destination: String,
    /// Fail on transfer exit code 23 instead of accepting it.
    pub strict_transfer: bool,
    /// Skip the structural pre-check.
    pub force: bool,
    /// Local Drupal root used to resolve the platform's config directory.
    pub docroot: PathBuf,
    /// Expected description of the post-commit code sync workflow.
    pub sync_description: String,
}

impl Default for CommandOptions {
    fn default() -> Self {
        CommandOptions {
            message: DEFAULT_MESSAGE.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            destination: None,
            remote_destination: DEFAULT_REMOTE_DESTINATION.to_string(),
            strict_transfer: false,
            force: false,
            docroot: PathBuf::from(DEFAULT_DOCROOT),
            sync_description: DEFAULT_SYNC_DESCRIPTION.to_string(),
        }
    }
}

impl CommandOptions {
    /// Returns the sync workflow description for the given environment.
    pub fn sync_description_for(&self, env_id: &str) -> String {
        self.sync_description.replace("{env}", env_id)
    }
}
