// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Detection of configuration changes on an environment.

use std::time::Duration;
use tracing::{debug, error, info};

use crate::clock::Clock;
use crate::environment::Environment;
use crate::error::{Error, Result};
use crate::platform::{Platform, RemoteExecutor};

/// Poll interval while waiting for exported files to show up in the diffstat.
pub const DIFF_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Remote command listing configuration that differs between the database
/// and the sync directory. Prints nothing when they match.
pub fn config_status_command() -> Vec<String> {
    ["drush", "config:status", "--format=list"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

pub struct DiffDetector<'a> {
    platform: &'a dyn Platform,
    executor: &'a dyn RemoteExecutor,
    clock: &'a dyn Clock,
}

impl<'a> DiffDetector<'a> {
    pub fn new(
        platform: &'a dyn Platform,
        executor: &'a dyn RemoteExecutor,
        clock: &'a dyn Clock,
    ) -> Self {
        DiffDetector {
            platform,
            executor,
            clock,
        }
    }

    /// Returns true if the environment has uncommitted file changes.
    pub fn has_changes(&self, env: &Environment) -> Result<bool> {
        let diffstat = self
            .platform
            .diffstat(env)
            .map_err(|e| Error::remote("diffstat query", e))?;
        debug!("diffstat reports {} changed files", diffstat.len());
        Ok(!diffstat.is_empty())
    }

    /// Polls the diffstat until it is non-empty or `timeout` has elapsed.
    ///
    /// Returns false on timeout. The caller decides whether to abort.
    pub fn await_changes(&self, env: &Environment, timeout: Duration) -> Result<bool> {
        let begin = self.clock.now();
        loop {
            if self.has_changes(env)? {
                return Ok(true);
            }
            let elapsed = (self.clock.now() - begin).to_std().unwrap_or(Duration::ZERO);
            if elapsed >= timeout {
                error!(
                    "No changes appeared on {} after {} seconds",
                    env.id,
                    timeout.as_secs()
                );
                return Ok(false);
            }
            info!("Waiting for exported configuration to appear on {}", env.id);
            self.clock.sleep(DIFF_POLL_INTERVAL.min(timeout - elapsed))?;
        }
    }

    /// Asks the site itself whether active and exported configuration differ.
    pub fn has_structural_differences(&self, env: &Environment) -> Result<bool> {
        let output = self
            .executor
            .run(env, &config_status_command())
            .map_err(|e| Error::remote("config status", e))?;
        if !output.success() {
            return Err(Error::remote(
                "config status",
                format!("exit code {}: {}", output.code, output.stderr.trim()),
            ));
        }
        Ok(!output.stdout.trim().is_empty())
    }
}

#[cfg(test)]
#[path = "diff_tests.rs"]
mod tests;
