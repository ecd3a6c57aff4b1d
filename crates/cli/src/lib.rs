// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! pcexrs - configuration export automation for Pantheon-hosted Drupal sites.
//!
//! This crate provides the `pcex` CLI: argument parsing, configuration
//! loading, logging setup, and the real collaborators behind the
//! [`pcex_core`] orchestration traits.
//!
//! # Main Components
//!
//! - [`TerminusPlatform`] - the hosting platform, through the `terminus` CLI
//! - [`SshExecutor`] - remote commands in an environment's container
//! - [`RsyncTransfer`] - file transfer from the container to this machine
//! - [`Config`] - `pcex.toml` loading and option precedence
//! - [`Error`] - Error types for all operations

mod cli;
mod commands;
mod completions;
mod process;

pub mod config;
pub mod env;
pub mod error;
pub mod logging;
pub mod ssh;
pub mod terminus;
pub mod transfer;

pub use cli::{Cli, Command};
pub use config::{Config, Overrides, Tools};
pub use error::{Error, Result};
pub use ssh::SshExecutor;
pub use terminus::TerminusPlatform;
pub use transfer::RsyncTransfer;

use std::path::PathBuf;

use logging::Verbosity;

/// Execute a parsed command line. This is the main entry point for library
/// users and provides a testable way to run commands without process
/// execution.
pub fn run(cli: Cli) -> Result<()> {
    logging::init(Verbosity::from_flags(cli.verbose, cli.quiet));
    let working_dir = working_dir(cli.directory)?;

    match cli.command {
        Command::ConfigExport {
            site_env,
            message,
            timeout,
            force,
        } => commands::export::run(
            &site_env,
            Overrides {
                message,
                timeout,
                force,
                ..Overrides::default()
            },
            &working_dir,
        ),
        Command::ConfigExportRemote {
            site_env,
            destination,
            remote_destination,
            strict,
        } => commands::export_remote::run(
            &site_env,
            Overrides {
                destination,
                remote_destination,
                strict_transfer: strict,
                ..Overrides::default()
            },
            &working_dir,
        ),
        Command::Completion { shell } => {
            completions::write(shell, &mut std::io::stdout());
            Ok(())
        }
    }
}

/// Resolves `-C`, relative to the current directory.
fn working_dir(directory: Option<PathBuf>) -> Result<PathBuf> {
    let current = std::env::current_dir()?;
    let Some(dir) = directory else {
        return Ok(current);
    };
    let dir = current.join(dir);
    if !dir.is_dir() {
        return Err(Error::Config(format!(
            "cannot change to {}: not a directory",
            dir.display()
        )));
    }
    Ok(dir)
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
