// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Polling of asynchronous platform workflows.
//!
//! Waiting never fails hard. A timeout or a failed workflow is logged and
//! reported as a [`WaitOutcome`], and the caller detects real failures through
//! its own checks (e.g. the diffstat).

use chrono::{DateTime, Utc};
use std::time::Duration;
use tracing::{info, warn};

use crate::clock::Clock;
use crate::environment::Environment;
use crate::error::Result;
use crate::platform::{Platform, PlatformError};
use crate::workflow::Workflow;

/// Poll interval when re-fetching a known workflow.
pub const WORKFLOW_POLL_INTERVAL: Duration = Duration::from_secs(1);
/// Poll interval when watching the site's latest workflow.
pub const LATEST_WORKFLOW_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// How a wait loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    Succeeded,
    Failed,
    TimedOut,
}

/// Blocks until a workflow reaches a terminal state or a timeout elapses.
pub struct WorkflowWaiter<'a> {
    platform: &'a dyn Platform,
    clock: &'a dyn Clock,
}

impl<'a> WorkflowWaiter<'a> {
    pub fn new(platform: &'a dyn Platform, clock: &'a dyn Clock) -> Self {
        WorkflowWaiter { platform, clock }
    }

    /// Waits for `workflow`, re-fetching it by id.
    ///
    /// Observations of a workflow created at or before `started_after` are
    /// treated as stale.
    pub fn wait(
        &self,
        env: &Environment,
        workflow: &Workflow,
        started_after: DateTime<Utc>,
        max_wait: Duration,
    ) -> Result<WaitOutcome> {
        let mut current = workflow.clone();
        self.poll(max_wait, WORKFLOW_POLL_INTERVAL, |first| {
            if !first {
                current = self.platform.workflow(env, &current.id)?;
            }
            if current.created_at > started_after {
                Ok(Observation::Matched(current.clone()))
            } else {
                info!("Waiting for '{}'", current.description);
                Ok(Observation::Stale)
            }
        })
    }

    /// Waits for the site's latest workflow to be the expected one and finish.
    ///
    /// A workflow only counts if it was created after `started_after` and its
    /// description equals `expected_description` exactly.
    pub fn wait_for_latest(
        &self,
        env: &Environment,
        started_after: DateTime<Utc>,
        expected_description: &str,
        max_wait: Duration,
    ) -> Result<WaitOutcome> {
        self.poll(max_wait, LATEST_WORKFLOW_POLL_INTERVAL, |_| {
            match self.platform.latest_workflow(env)? {
                Some(wf)
                    if wf.created_at > started_after
                        && wf.description == expected_description =>
                {
                    Ok(Observation::Matched(wf))
                }
                Some(wf) => {
                    info!(
                        "Current workflow is '{}'; waiting for '{}'",
                        wf.description, expected_description
                    );
                    Ok(Observation::Stale)
                }
                None => {
                    info!("No workflows yet; waiting for '{}'", expected_description);
                    Ok(Observation::Stale)
                }
            }
        })
    }

    fn poll<F>(&self, max_wait: Duration, interval: Duration, mut observe: F) -> Result<WaitOutcome>
    where
        F: FnMut(bool) -> std::result::Result<Observation, PlatformError>,
    {
        let begin = self.clock.now();
        let mut first = true;
        loop {
            match observe(first) {
                Ok(Observation::Matched(wf)) => {
                    info!("Workflow '{}' {}.", wf.description, wf.status);
                    if wf.is_finished() {
                        if wf.is_successful() {
                            info!("Workflow succeeded");
                            return Ok(WaitOutcome::Succeeded);
                        }
                        warn!("Workflow '{}' failed", wf.description);
                        return Ok(WaitOutcome::Failed);
                    }
                }
                Ok(Observation::Stale) => {}
                Err(e) => warn!("Could not fetch workflow status: {}", e),
            }
            first = false;

            let elapsed = (self.clock.now() - begin).to_std().unwrap_or(Duration::ZERO);
            if elapsed >= max_wait {
                warn!(
                    "Waited '{}' seconds, giving up waiting for workflow to finish",
                    max_wait.as_secs()
                );
                return Ok(WaitOutcome::TimedOut);
            }
            self.clock.sleep(interval.min(max_wait - elapsed))?;
        }
    }
}

enum Observation {
    Matched(Workflow),
    Stale,
}

#[cfg(test)]
#[path = "waiter_tests.rs"]
mod tests;
