// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! pcex-core: orchestration of configuration exports on a hosting platform
//!
//! This crate provides the domain model, the collaborator traits at the
//! platform boundary, and the polling state machines that drive an export:
//! switching the connection mode, waiting on workflows, detecting changes,
//! committing, and syncing an export down to the local machine.

pub mod clock;
pub mod commit;
pub mod context;
pub mod diff;
pub mod diffstat;
pub mod environment;
pub mod error;
pub mod options;
pub mod platform;
pub mod remote_sync;
pub mod switcher;
pub mod timings;
pub mod waiter;
pub mod workflow;

#[cfg(test)]
#[path = "testing.rs"]
pub(crate) mod testing;

pub use clock::{CancelToken, Clock, SystemClock};
pub use commit::{CommitOrchestrator, ExportOutcome};
pub use context::Context;
pub use diff::DiffDetector;
pub use diffstat::{Diffstat, FileChange};
pub use environment::{ConnectionMode, Environment, SiteEnv};
pub use error::{Error, Result};
pub use options::CommandOptions;
pub use platform::{
    CommandOutput, ConnectionInfo, Platform, PlatformError, RemoteExecutor, Transfer,
    TransferRequest,
};
pub use remote_sync::{RemoteSyncOrchestrator, SyncReport};
pub use switcher::ModeSwitcher;
pub use waiter::{WaitOutcome, WorkflowWaiter};
pub use workflow::{Workflow, WorkflowStatus};
