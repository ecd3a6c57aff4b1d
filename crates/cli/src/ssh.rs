// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Remote command execution over SSH.

use tracing::debug;

use pcex_core::{CommandOutput, ConnectionInfo, Environment, PlatformError, RemoteExecutor};

use crate::process;

/// Exit code ssh itself uses for connection and authentication failures.
const SSH_FAILURE_CODE: i32 = 255;

/// Runs commands in an environment's application container.
pub struct SshExecutor {
    program: String,
    connection: ConnectionInfo,
}

impl SshExecutor {
    pub fn new(program: impl Into<String>, connection: ConnectionInfo) -> Self {
        SshExecutor {
            program: program.into(),
            connection,
        }
    }
}

impl RemoteExecutor for SshExecutor {
    fn run(&self, env: &Environment, command: &[String]) -> Result<CommandOutput, PlatformError> {
        debug!("on {}: {}", env.site_env(), command.join(" "));
        let output = process::capture(&self.program, &ssh_args(&self.connection, command))?;
        if output.code == SSH_FAILURE_CODE {
            return Err(PlatformError::Failed {
                operation: "ssh".to_string(),
                message: output.stderr.trim().to_string(),
            });
        }
        Ok(output)
    }
}

/// Arguments for a non-interactive ssh call running `command` remotely.
pub fn ssh_args(connection: &ConnectionInfo, command: &[String]) -> Vec<String> {
    vec![
        "-T".to_string(),
        "-p".to_string(),
        connection.port.to_string(),
        "-o".to_string(),
        "StrictHostKeyChecking=no".to_string(),
        "-o".to_string(),
        "AddressFamily=inet".to_string(),
        connection.address(),
        shell_join(command),
    ]
}

/// Joins words into one remote shell command line.
pub fn shell_join(words: &[String]) -> String {
    words
        .iter()
        .map(|w| shell_quote(w))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Quotes `word` for a POSIX shell unless it is made of safe characters.
pub fn shell_quote(word: &str) -> String {
    let safe = !word.is_empty()
        && word
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./:=,@%+".contains(c));
    if safe {
        word.to_string()
    } else {
        format!("'{}'", word.replace('\'', r"'\''"))
    }
}

#[cfg(test)]
#[path = "ssh_tests.rs"]
mod tests;
