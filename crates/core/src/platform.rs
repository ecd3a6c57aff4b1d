// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Collaborator seams: the hosting platform, the remote execution channel,
//! and the local file transfer.
//!
//! The orchestration components only talk to the outside world through these
//! traits. The CLI crate provides the real implementations.

use thiserror::Error;

use crate::diffstat::Diffstat;
use crate::environment::{ConnectionMode, Environment, SiteEnv};
use crate::workflow::Workflow;

/// Errors reported by platform collaborators.
#[derive(Debug, Error)]
pub enum PlatformError {
    /// The environment is already in the requested connection mode.
    #[error("the connection mode is already set to {0}")]
    AlreadyInMode(ConnectionMode),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("{operation}: {message}")]
    Failed {
        operation: String,
        message: String,
    },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// SFTP/SSH connection parameters of an environment's application container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionInfo {
    pub user: String,
    pub host: String,
    pub port: u16,
}

impl ConnectionInfo {
    /// Returns `user@host`.
    pub fn address(&self) -> String {
        format!("{}@{}", self.user, self.host)
    }

    /// Returns `user@host:path`.
    pub fn remote_path(&self, path: &str) -> String {
        format!("{}:{}", self.address(), path)
    }
}

/// Captured result of a remote command.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandOutput {
    pub code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == 0
    }
}

/// A resolved file transfer request.
///
/// `source` and `destination` are final transfer arguments: the remote side
/// is already expanded to `user@host:path`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferRequest {
    pub source: String,
    pub destination: String,
    pub port: u16,
    pub excludes: Vec<String>,
}

/// Operations consumed from the hosting platform.
pub trait Platform {
    /// Resolves a `<site>.<env>` identifier into an environment.
    fn resolve(&self, site_env: &SiteEnv) -> Result<Environment, PlatformError>;

    /// Requests a connection mode change and returns the resulting workflow.
    ///
    /// Returns [`PlatformError::AlreadyInMode`] when nothing needs to change.
    fn set_connection_mode(
        &self,
        env: &Environment,
        mode: ConnectionMode,
    ) -> Result<Workflow, PlatformError>;

    /// Queries the environment's uncommitted file changes.
    fn diffstat(&self, env: &Environment) -> Result<Diffstat, PlatformError>;

    /// Commits the environment's uncommitted changes.
    fn commit(&self, env: &Environment, message: &str) -> Result<Workflow, PlatformError>;

    /// Returns the most recent workflow of the site, if any.
    fn latest_workflow(&self, env: &Environment) -> Result<Option<Workflow>, PlatformError>;

    /// Re-fetches a workflow by id.
    fn workflow(&self, env: &Environment, id: &str) -> Result<Workflow, PlatformError>;

    fn connection_info(&self, env: &Environment) -> Result<ConnectionInfo, PlatformError>;

    /// Returns the project's declared config directory, relative to the
    /// Drupal root, if it has one.
    fn config_directory(&self, env: &Environment) -> Result<Option<String>, PlatformError>;
}

/// Runs a program inside an environment's application container.
pub trait RemoteExecutor {
    fn run(&self, env: &Environment, command: &[String]) -> Result<CommandOutput, PlatformError>;
}

/// Copies files between the local machine and a remote address.
pub trait Transfer {
    /// Performs the transfer and returns the transfer program's exit code.
    fn sync(&self, request: &TransferRequest) -> std::io::Result<i32>;
}
