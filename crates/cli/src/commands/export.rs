// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::Path;

use pcex_core::{CommitOrchestrator, ExportOutcome, SystemClock};

use super::Session;
use crate::config::Overrides;
use crate::error::Result;

/// Exports configuration on the target environment and commits it.
pub fn run(site_env: &str, overrides: Overrides, working_dir: &Path) -> Result<()> {
    let session = Session::open(site_env, overrides, working_dir)?;
    let executor = session.executor();
    let clock = SystemClock::new();

    let outcome = CommitOrchestrator::new(session.context(&executor, &clock)).run()?;
    println!("{}", summary(outcome, &session.site_env.to_string()));
    Ok(())
}

fn summary(outcome: ExportOutcome, target: &str) -> String {
    match outcome {
        ExportOutcome::NoDifferences => format!("No configuration changes to export on {}", target),
        ExportOutcome::NothingToCommit => {
            format!("Nothing was committed on {}; it is still in sftp mode", target)
        }
        ExportOutcome::Committed => format!("Committed configuration changes on {}", target),
    }
}

#[cfg(test)]
#[path = "export_tests.rs"]
mod tests;
