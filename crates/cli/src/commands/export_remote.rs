// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::Path;

use pcex_core::{RemoteSyncOrchestrator, SystemClock};

use super::Session;
use crate::config::Overrides;
use crate::error::Result;
use crate::transfer::RsyncTransfer;

/// Exports configuration on the target environment into its private files
/// and copies the result to a local directory.
pub fn run(site_env: &str, overrides: Overrides, working_dir: &Path) -> Result<()> {
    let session = Session::open(site_env, overrides, working_dir)?;
    let executor = session.executor();
    let clock = SystemClock::new();
    let transfer = RsyncTransfer::new(session.tools.rsync.clone(), session.tools.ssh.clone());

    let report = RemoteSyncOrchestrator::new(
        session.context(&executor, &clock),
        &transfer,
        session.connection.clone(),
    )
    .run()?;

    println!(
        "Copied {} configuration files from {} to {}",
        report.files,
        session.site_env,
        report.destination.display()
    );
    Ok(())
}
