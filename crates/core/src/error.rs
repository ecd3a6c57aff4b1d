// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for pcex-core operations.

use thiserror::Error;

/// All possible errors that can occur while orchestrating an export.
#[derive(Debug, Error)]
pub enum Error {
    #[error("connection mode cannot be set on the {env} environment\n  hint: change the {env} connection mode manually if you really need to")]
    PolicyViolation { env: String },

    #[error("{operation} failed: {reason}")]
    RemoteOperationFailed {
        operation: &'static str,
        reason: String,
    },

    #[error("file transfer failed with exit code {code}")]
    TransferFailed { code: i32 },

    #[error("invalid site environment '{0}'\n  hint: use the form <site>.<env>, e.g. my-site.dev")]
    InvalidSiteEnv(String),

    #[error("invalid connection mode: '{0}'\n  hint: valid modes are: git, sftp")]
    InvalidConnectionMode(String),

    #[error("operation cancelled")]
    Cancelled,

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Builds a [`Error::RemoteOperationFailed`] from any displayable cause.
    pub fn remote(operation: &'static str, reason: impl std::fmt::Display) -> Self {
        Error::RemoteOperationFailed {
            operation,
            reason: reason.to_string(),
        }
    }
}

/// A specialized Result type for pcex-core operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
