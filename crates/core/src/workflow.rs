// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Asynchronous platform jobs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Status of a platform workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkflowStatus {
    Pending,
    Running,
    Succeeded,
    Failed,
}

impl WorkflowStatus {
    /// Maps a platform status string onto a status.
    ///
    /// Unrecognized strings are treated as pending so that polling continues.
    pub fn from_platform(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "succeeded" | "success" | "complete" | "completed" => WorkflowStatus::Succeeded,
            "failed" | "failure" | "aborted" | "error" => WorkflowStatus::Failed,
            "running" | "in progress" | "in_progress" => WorkflowStatus::Running,
            _ => WorkflowStatus::Pending,
        }
    }

    /// Returns true for succeeded and failed.
    pub fn is_terminal(&self) -> bool {
        matches!(self, WorkflowStatus::Succeeded | WorkflowStatus::Failed)
    }
}

impl fmt::Display for WorkflowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            WorkflowStatus::Pending => "pending",
            WorkflowStatus::Running => "running",
            WorkflowStatus::Succeeded => "succeeded",
            WorkflowStatus::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// A platform job created in response to a mode change or commit request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workflow {
    pub id: String,
    /// Human readable description, e.g. "Sync code on dev".
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub status: WorkflowStatus,
    pub finished_at: Option<DateTime<Utc>>,
    /// Final message reported by the platform, if any.
    pub message: Option<String>,
}

impl Workflow {
    pub fn is_successful(&self) -> bool {
        self.status == WorkflowStatus::Succeeded
    }

    /// Returns true once the platform reports a terminal status or a finish time.
    pub fn is_finished(&self) -> bool {
        self.status.is_terminal() || self.finished_at.is_some()
    }
}

#[cfg(test)]
#[path = "workflow_tests.rs"]
mod tests;
