// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pcex")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Export, commit and pull Drupal configuration on Pantheon environments")]
#[command(
    long_about = "Export, commit and pull Drupal configuration on Pantheon environments.\n\n\
    Switches an environment to SFTP mode, runs the configuration export, commits\n\
    the result and switches back to Git mode. The remote variant exports into a\n\
    private directory and pulls the files down instead of committing them."
)]
pub struct Cli {
    /// Run as if pcex was started in <path>
    #[arg(short = 'C', long = "directory", global = true, value_name = "path")]
    pub directory: Option<PathBuf>,

    /// Show debug output, including every external command
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only show warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Export configuration on an environment and commit it
    #[command(
        visible_alias = "cex",
        aliases = ["sex", "scex"],
        after_help = "\
Examples:
  pcex config-export my-site.dev                   Export and commit with the default message
  pcex cex my-site.feature-x -m \"Add views\"         Use a custom commit message
  pcex cex my-site.dev --force                     Export even if config:status is clean"
    )]
    ConfigExport {
        /// Target environment as <site>.<env>
        site_env: String,

        /// Commit message
        #[arg(long, short)]
        message: Option<String>,

        /// Seconds to wait for each platform workflow
        #[arg(long, value_name = "SECONDS")]
        timeout: Option<u64>,

        /// Skip the check for configuration differences
        #[arg(long)]
        force: bool,
    },

    /// Export configuration on an environment and copy it to this machine
    #[command(
        visible_alias = "cexr",
        aliases = ["sexr", "scexr"],
        after_help = "\
Examples:
  pcex config-export-remote my-site.dev                  Pull into the project's config directory
  pcex cexr my-site.dev --destination config/incoming    Pull into a specific directory
  pcex cexr my-site.dev --strict                         Fail on partial transfers"
    )]
    ConfigExportRemote {
        /// Target environment as <site>.<env>
        site_env: String,

        /// Local directory to copy the export into
        #[arg(long, value_name = "PATH")]
        destination: Option<PathBuf>,

        /// Directory under the environment's private files to export into
        #[arg(long, value_name = "PATH")]
        remote_destination: Option<String>,

        /// Treat a partial transfer (rsync exit code 23) as a failure
        #[arg(long)]
        strict: bool,
    },

    /// Generate shell completions
    Completion {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
