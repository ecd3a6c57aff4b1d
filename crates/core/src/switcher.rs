// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Connection mode switching between `sftp` and `git`.

use tracing::info;

use crate::environment::{ConnectionMode, Environment};
use crate::error::{Error, Result};
use crate::platform::{Platform, PlatformError};
use crate::workflow::Workflow;

/// Toggles an environment between write-enabled and version-controlled modes.
pub struct ModeSwitcher<'a> {
    platform: &'a dyn Platform,
}

impl<'a> ModeSwitcher<'a> {
    pub fn new(platform: &'a dyn Platform) -> Self {
        ModeSwitcher { platform }
    }

    /// Sets `env` to `target`.
    ///
    /// Returns the mode-change workflow, or `None` if the environment was
    /// already in `target`. Protected environments are rejected before the
    /// platform is contacted. On success the local mode is set to `target`
    /// regardless of what the platform's cached model reports.
    pub fn set_mode(
        &self,
        env: &mut Environment,
        target: ConnectionMode,
    ) -> Result<Option<Workflow>> {
        if env.is_protected() {
            return Err(Error::PolicyViolation {
                env: env.id.clone(),
            });
        }

        info!("Setting connection mode to {}", target);
        match self.platform.set_connection_mode(env, target) {
            Ok(workflow) => {
                env.connection_mode = target;
                if let Some(message) = workflow.message.as_deref() {
                    info!("{}", message);
                }
                Ok(Some(workflow))
            }
            Err(PlatformError::AlreadyInMode(mode)) if mode == target => {
                info!("The connection mode is already set to {}", target);
                env.connection_mode = target;
                Ok(None)
            }
            Err(e) => Err(Error::remote("connection mode change", e)),
        }
    }
}

#[cfg(test)]
#[path = "switcher_tests.rs"]
mod tests;
