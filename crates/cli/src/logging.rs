// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Log output on stderr.
//!
//! Progress notices go through `tracing` and are rendered without timestamps
//! or targets. `PCEX_LOG` takes an `EnvFilter` directive; `-v` and `-q`
//! override it.

use tracing_subscriber::EnvFilter;

use crate::env;

/// Chosen by the global `-v`/`-q` flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    Quiet,
    #[default]
    Normal,
    Verbose,
}

impl Verbosity {
    pub fn from_flags(verbose: bool, quiet: bool) -> Self {
        match (verbose, quiet) {
            (true, _) => Verbosity::Verbose,
            (false, true) => Verbosity::Quiet,
            (false, false) => Verbosity::Normal,
        }
    }
}

/// Returns the filter directive for `verbosity` and the `PCEX_LOG` value.
pub fn directive(verbosity: Verbosity, from_env: Option<String>) -> String {
    match verbosity {
        Verbosity::Verbose => "debug".to_string(),
        Verbosity::Quiet => "warn".to_string(),
        Verbosity::Normal => from_env.unwrap_or_else(|| "info".to_string()),
    }
}

/// Installs the global subscriber. Calling it twice is harmless.
pub fn init(verbosity: Verbosity) {
    let directive = directive(verbosity, env::log_filter());
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}

#[cfg(test)]
#[path = "logging_tests.rs"]
mod tests;
