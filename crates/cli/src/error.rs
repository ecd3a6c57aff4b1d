// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

/// All possible errors that can occur in the pcexrs library.
///
/// Errors provide user-friendly messages with hints for common issues.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] pcex_core::Error),

    #[error("site environment not found: {0}\n  hint: check the name with 'terminus env:list <site>'")]
    EnvironmentNotFound(String),

    #[error("platform error: {0}")]
    Platform(pcex_core::PlatformError),

    #[error("invalid value for {name}: '{value}'\n  hint: expected a number of seconds")]
    InvalidTimeout { name: &'static str, value: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config error: {0}")]
    Config(String),
}

/// A specialized Result type for pcexrs operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<pcex_core::PlatformError> for Error {
    fn from(e: pcex_core::PlatformError) -> Self {
        match e {
            pcex_core::PlatformError::NotFound(what) => Error::EnvironmentNotFound(what),
            other => Error::Platform(other),
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
