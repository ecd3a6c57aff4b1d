// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The explicit dependency bundle handed to each orchestrator.

use std::path::PathBuf;

use crate::clock::Clock;
use crate::environment::Environment;
use crate::options::CommandOptions;
use crate::platform::{Platform, RemoteExecutor};

/// Everything an orchestrator needs for one invocation.
pub struct Context<'a> {
    /// Resolved target. Its connection mode is kept current by the mode switcher.
    pub env: Environment,
    pub platform: &'a dyn Platform,
    pub executor: &'a dyn RemoteExecutor,
    pub clock: &'a dyn Clock,
    pub options: CommandOptions,
    /// Fallback destination for remote exports.
    pub working_dir: PathBuf,
}
