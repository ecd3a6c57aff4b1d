// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Export, commit and lock down an environment's configuration.
//!
//! The sequence is strictly linear:
//!
//! 1. pre-check for structural differences (skipped with `force`)
//! 2. switch to `sftp` and wait for the mode change
//! 3. run the export remotely
//! 4. wait for the exported files to show up in the diffstat
//! 5. commit, wait for the commit workflow, then for the resulting code sync
//! 6. verify nothing is left uncommitted
//! 7. switch back to `git`
//!
//! Any error aborts the sequence. Nothing is rolled back: an abort after
//! step 2 leaves the environment in `sftp` mode.

use chrono::{DateTime, SubsecRound, Utc};
use tracing::{error, info, warn};

use crate::context::Context;
use crate::diff::DiffDetector;
use crate::environment::ConnectionMode;
use crate::error::{Error, Result};
use crate::switcher::ModeSwitcher;
use crate::waiter::{WaitOutcome, WorkflowWaiter};
use crate::workflow::Workflow;

/// Remote command that writes active configuration to the sync directory.
pub fn export_command() -> Vec<String> {
    ["drush", "config:export", "-y"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// How a commit run ended without error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportOutcome {
    /// The pre-check found nothing to export. No side effects.
    NoDifferences,
    /// The export produced no file changes within the timeout. The
    /// environment is left in `sftp` mode.
    NothingToCommit,
    /// Changes were committed and the environment is back in `git` mode.
    Committed,
}

/// A mode change together with how waiting for it ended.
struct ModeChange {
    workflow: Workflow,
    outcome: WaitOutcome,
}

pub struct CommitOrchestrator<'a> {
    ctx: Context<'a>,
}

impl<'a> CommitOrchestrator<'a> {
    pub fn new(ctx: Context<'a>) -> Self {
        CommitOrchestrator { ctx }
    }

    pub fn context(&self) -> &Context<'a> {
        &self.ctx
    }

    pub fn run(&mut self) -> Result<ExportOutcome> {
        let detector = DiffDetector::new(self.ctx.platform, self.ctx.executor, self.ctx.clock);

        if !self.ctx.options.force {
            let differs = crate::time_phase!("precheck", {
                detector.has_structural_differences(&self.ctx.env)?
            });
            if !differs {
                info!("No configuration differences on {}", self.ctx.env.id);
                return Ok(ExportOutcome::NoDifferences);
            }
        }

        let change = crate::time_phase!("enable_write", {
            self.switch_and_wait(ConnectionMode::Sftp)?
        });

        crate::time_phase!("export", { self.export(change.as_ref())? });

        let changed = crate::time_phase!("await_diff", {
            detector.await_changes(&self.ctx.env, self.ctx.options.timeout)?
        });
        if !changed {
            error!("There is no configuration to commit");
            warn!(
                "{} is left in sftp mode; inspect it or switch it back to git manually",
                self.ctx.env.site_env()
            );
            return Ok(ExportOutcome::NothingToCommit);
        }

        crate::time_phase!("commit", { self.commit()? });

        if detector.has_changes(&self.ctx.env)? {
            return Err(Error::remote("commit", "failed to commit changes"));
        }

        crate::time_phase!("disable_write", {
            self.switch_and_wait(ConnectionMode::Git)?
        });
        Ok(ExportOutcome::Committed)
    }

    fn switch_and_wait(&mut self, mode: ConnectionMode) -> Result<Option<ModeChange>> {
        let started = wait_start(self.ctx.clock.now());
        let switcher = ModeSwitcher::new(self.ctx.platform);
        let Some(workflow) = switcher.set_mode(&mut self.ctx.env, mode)? else {
            return Ok(None);
        };
        let outcome = self
            .waiter()
            .wait(&self.ctx.env, &workflow, started, self.ctx.options.timeout)?;
        Ok(Some(ModeChange { workflow, outcome }))
    }

    /// Runs the export, first waiting again on a mode change that timed out.
    /// The filesystem is only writable once that workflow has finished.
    fn export(&self, pending: Option<&ModeChange>) -> Result<()> {
        if let Some(change) = pending {
            if change.outcome == WaitOutcome::TimedOut {
                self.waiter().wait(
                    &self.ctx.env,
                    &change.workflow,
                    DateTime::<Utc>::MIN_UTC,
                    self.ctx.options.timeout,
                )?;
            }
        }

        info!("Exporting site configuration");
        let output = self
            .ctx
            .executor
            .run(&self.ctx.env, &export_command())
            .map_err(|e| Error::remote("config export", e))?;
        if !output.success() {
            return Err(Error::remote(
                "config export",
                format!("exit code {}: {}", output.code, output.stderr.trim()),
            ));
        }
        Ok(())
    }

    fn commit(&self) -> Result<()> {
        let started = wait_start(self.ctx.clock.now());
        info!("Committing site configuration to version control");
        let workflow = self
            .ctx
            .platform
            .commit(&self.ctx.env, &self.ctx.options.message)
            .map_err(|e| Error::remote("commit", e))?;
        if let Some(message) = workflow.message.as_deref() {
            info!("{}", message);
        }
        info!("Your code was committed");

        // The commit call hands back its own workflow, so it is never stale.
        self.waiter().wait(
            &self.ctx.env,
            &workflow,
            DateTime::<Utc>::MIN_UTC,
            self.ctx.options.timeout,
        )?;

        let expected = self.ctx.options.sync_description_for(&self.ctx.env.id);
        self.waiter().wait_for_latest(
            &self.ctx.env,
            started,
            &expected,
            self.ctx.options.timeout,
        )?;
        Ok(())
    }

    fn waiter(&self) -> WorkflowWaiter<'a> {
        WorkflowWaiter::new(self.ctx.platform, self.ctx.clock)
    }
}

/// Truncates to whole seconds, the resolution of platform timestamps.
fn wait_start(now: DateTime<Utc>) -> DateTime<Utc> {
    now.trunc_subsecs(0)
}

#[cfg(test)]
#[path = "commit_tests.rs"]
mod tests;
