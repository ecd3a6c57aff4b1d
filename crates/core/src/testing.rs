// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory collaborators shared by the unit tests.

#![allow(clippy::unwrap_used)]
#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;

use crate::clock::Clock;
use crate::context::Context;
use crate::diffstat::{Diffstat, FileChange};
use crate::environment::{ConnectionMode, Environment, SiteEnv};
use crate::error::Result;
use crate::options::CommandOptions;
use crate::platform::{
    CommandOutput, ConnectionInfo, Platform, PlatformError, RemoteExecutor, Transfer,
    TransferRequest,
};
use crate::workflow::{Workflow, WorkflowStatus};

/// Every collaborator call, in the order it happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Resolve,
    SetMode(ConnectionMode),
    Diffstat,
    Commit(String),
    LatestWorkflow,
    Workflow(String),
    ConnectionInfo,
    ConfigDirectory,
    Run(String),
    Transfer,
}

pub type Journal = Rc<RefCell<Vec<Call>>>;

pub fn t0() -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000, 0).unwrap()
}

pub fn dev_env() -> Environment {
    env_named("dev")
}

pub fn env_named(id: &str) -> Environment {
    Environment {
        site_id: "6c6b7a1e".to_string(),
        site_name: "my-site".to_string(),
        id: id.to_string(),
        connection_mode: ConnectionMode::Git,
    }
}

pub fn workflow_at(
    id: &str,
    description: &str,
    created_at: DateTime<Utc>,
    status: WorkflowStatus,
) -> Workflow {
    Workflow {
        id: id.to_string(),
        description: description.to_string(),
        created_at,
        status,
        finished_at: None,
        message: None,
    }
}

pub fn changed(paths: &[&str]) -> Diffstat {
    let mut diff = Diffstat::default();
    for path in paths {
        diff.insert(
            *path,
            FileChange {
                status: "M".to_string(),
                additions: 1,
                deletions: 0,
            },
        );
    }
    diff
}

/// Pops the next scripted value; the last one is repeated forever.
fn next_sticky<T: Clone>(queue: &RefCell<VecDeque<T>>, fallback: T) -> T {
    let mut queue = queue.borrow_mut();
    if queue.len() > 1 {
        queue.pop_front().unwrap_or(fallback)
    } else {
        queue.front().cloned().unwrap_or(fallback)
    }
}

/// A clock that only moves when slept on.
pub struct ManualClock {
    now: Cell<DateTime<Utc>>,
    pub sleeps: RefCell<Vec<Duration>>,
}

impl ManualClock {
    pub fn new() -> Self {
        ManualClock {
            now: Cell::new(t0()),
            sleeps: RefCell::new(Vec::new()),
        }
    }

    pub fn total_slept(&self) -> Duration {
        self.sleeps.borrow().iter().sum()
    }

    pub fn advance(&self, duration: Duration) {
        let step = chrono::Duration::from_std(duration).unwrap();
        self.now.set(self.now.get() + step);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.get()
    }

    fn sleep(&self, duration: Duration) -> Result<()> {
        self.sleeps.borrow_mut().push(duration);
        self.advance(duration);
        Ok(())
    }
}

/// A platform that records calls and answers from scripts.
///
/// Mode changes succeed with a workflow created one second after `t0()`
/// unless `already_in_mode` or `mode_failure` say otherwise.
pub struct FakePlatform {
    pub journal: Journal,
    pub mode: Cell<ConnectionMode>,
    /// Report `AlreadyInMode` when the requested mode equals the current one.
    pub already_in_mode: Cell<bool>,
    pub mode_failure: RefCell<Option<String>>,
    pub mode_message: RefCell<Option<String>>,
    pub diffstats: RefCell<VecDeque<Diffstat>>,
    pub diffstat_failure: RefCell<Option<String>>,
    /// Answers for `workflow(id)`; falls back to the mode-change workflow
    /// marked succeeded.
    pub polled: RefCell<VecDeque<Workflow>>,
    /// Answers for `latest_workflow`.
    pub latest: RefCell<VecDeque<Option<Workflow>>>,
    pub workflow_time: Cell<DateTime<Utc>>,
    pub commit_failure: RefCell<Option<String>>,
    /// Status of the workflow `commit` returns.
    pub commit_status: Cell<WorkflowStatus>,
    /// Leave the diffstat untouched on commit, as if some files were skipped.
    pub commit_keeps_changes: Cell<bool>,
    pub config_dir: RefCell<Option<String>>,
    pub poll_failures: Cell<usize>,
}

impl FakePlatform {
    pub fn new(journal: Journal) -> Self {
        FakePlatform {
            journal,
            mode: Cell::new(ConnectionMode::Git),
            already_in_mode: Cell::new(true),
            mode_failure: RefCell::new(None),
            mode_message: RefCell::new(None),
            diffstats: RefCell::new(VecDeque::from([changed(&["config/system.site.yml"])])),
            diffstat_failure: RefCell::new(None),
            polled: RefCell::new(VecDeque::new()),
            latest: RefCell::new(VecDeque::new()),
            workflow_time: Cell::new(t0() + chrono::Duration::seconds(1)),
            commit_failure: RefCell::new(None),
            commit_status: Cell::new(WorkflowStatus::Succeeded),
            commit_keeps_changes: Cell::new(false),
            config_dir: RefCell::new(None),
            poll_failures: Cell::new(0),
        }
    }

    pub fn script_diffstats(&self, diffs: Vec<Diffstat>) {
        *self.diffstats.borrow_mut() = diffs.into();
    }

    pub fn calls(&self) -> Vec<Call> {
        self.journal.borrow().clone()
    }

    fn record(&self, call: Call) {
        self.journal.borrow_mut().push(call);
    }

    fn mode_workflow(&self, mode: ConnectionMode) -> Workflow {
        let mut wf = workflow_at(
            &format!("wf-{}", mode),
            &format!("Change connection mode to {}", mode),
            self.workflow_time.get(),
            WorkflowStatus::Succeeded,
        );
        wf.message = self.mode_message.borrow().clone();
        wf
    }
}

impl Platform for FakePlatform {
    fn resolve(&self, site_env: &SiteEnv) -> std::result::Result<Environment, PlatformError> {
        self.record(Call::Resolve);
        let mut env = env_named(&site_env.env);
        env.connection_mode = self.mode.get();
        Ok(env)
    }

    fn set_connection_mode(
        &self,
        _env: &Environment,
        mode: ConnectionMode,
    ) -> std::result::Result<Workflow, PlatformError> {
        self.record(Call::SetMode(mode));
        if let Some(message) = self.mode_failure.borrow().clone() {
            return Err(PlatformError::Failed {
                operation: "connection:set".to_string(),
                message,
            });
        }
        if self.already_in_mode.get() && self.mode.get() == mode {
            return Err(PlatformError::AlreadyInMode(mode));
        }
        self.mode.set(mode);
        Ok(self.mode_workflow(mode))
    }

    fn diffstat(&self, _env: &Environment) -> std::result::Result<Diffstat, PlatformError> {
        self.record(Call::Diffstat);
        if let Some(message) = self.diffstat_failure.borrow().clone() {
            return Err(PlatformError::Failed {
                operation: "env:diffstat".to_string(),
                message,
            });
        }
        Ok(next_sticky(&self.diffstats, Diffstat::default()))
    }

    fn commit(
        &self,
        _env: &Environment,
        message: &str,
    ) -> std::result::Result<Workflow, PlatformError> {
        self.record(Call::Commit(message.to_string()));
        if let Some(message) = self.commit_failure.borrow().clone() {
            return Err(PlatformError::Failed {
                operation: "env:commit".to_string(),
                message,
            });
        }
        if !self.commit_keeps_changes.get() {
            self.diffstats.borrow_mut().clear();
        }
        Ok(workflow_at(
            "wf-commit",
            "Commit changes",
            self.workflow_time.get(),
            self.commit_status.get(),
        ))
    }

    fn latest_workflow(
        &self,
        env: &Environment,
    ) -> std::result::Result<Option<Workflow>, PlatformError> {
        self.record(Call::LatestWorkflow);
        let fallback = Some(workflow_at(
            "wf-sync",
            &format!("Sync code on {}", env.id),
            self.workflow_time.get(),
            WorkflowStatus::Succeeded,
        ));
        Ok(next_sticky(&self.latest, fallback))
    }

    fn workflow(
        &self,
        _env: &Environment,
        id: &str,
    ) -> std::result::Result<Workflow, PlatformError> {
        self.record(Call::Workflow(id.to_string()));
        if self.poll_failures.get() > 0 {
            self.poll_failures.set(self.poll_failures.get() - 1);
            return Err(PlatformError::NotFound(id.to_string()));
        }
        let fallback = self.mode_workflow(self.mode.get());
        Ok(next_sticky(&self.polled, fallback))
    }

    fn connection_info(
        &self,
        env: &Environment,
    ) -> std::result::Result<ConnectionInfo, PlatformError> {
        self.record(Call::ConnectionInfo);
        Ok(sftp_info(env))
    }

    fn config_directory(
        &self,
        _env: &Environment,
    ) -> std::result::Result<Option<String>, PlatformError> {
        self.record(Call::ConfigDirectory);
        Ok(self.config_dir.borrow().clone())
    }
}

pub fn sftp_info(env: &Environment) -> ConnectionInfo {
    ConnectionInfo {
        user: format!("{}.{}", env.id, env.site_id),
        host: format!("appserver.{}.{}.drush.in", env.id, env.site_id),
        port: 2222,
    }
}

/// An executor that records command lines and answers by substring match.
pub struct FakeExecutor {
    pub journal: Journal,
    pub responses: RefCell<Vec<(String, CommandOutput)>>,
    pub failures: RefCell<Vec<String>>,
}

impl FakeExecutor {
    pub fn new(journal: Journal) -> Self {
        FakeExecutor {
            journal,
            responses: RefCell::new(Vec::new()),
            failures: RefCell::new(Vec::new()),
        }
    }

    pub fn respond(&self, needle: &str, code: i32, stdout: &str) {
        self.responses.borrow_mut().push((
            needle.to_string(),
            CommandOutput {
                code,
                stdout: stdout.to_string(),
                stderr: String::new(),
            },
        ));
    }

    /// Makes commands containing `needle` fail at the transport level.
    pub fn fail(&self, needle: &str) {
        self.failures.borrow_mut().push(needle.to_string());
    }
}

impl RemoteExecutor for FakeExecutor {
    fn run(
        &self,
        _env: &Environment,
        command: &[String],
    ) -> std::result::Result<CommandOutput, PlatformError> {
        let line = command.join(" ");
        self.journal.borrow_mut().push(Call::Run(line.clone()));
        if self.failures.borrow().iter().any(|n| line.contains(n.as_str())) {
            return Err(PlatformError::Failed {
                operation: "ssh".to_string(),
                message: "connection refused".to_string(),
            });
        }
        let responses = self.responses.borrow();
        let output = responses
            .iter()
            .find(|(needle, _)| line.contains(needle.as_str()))
            .map(|(_, out)| out.clone())
            .unwrap_or_default();
        Ok(output)
    }
}

/// A transfer that records requests and returns a fixed exit code.
pub struct FakeTransfer {
    pub journal: Journal,
    pub code: Cell<i32>,
    pub requests: RefCell<Vec<TransferRequest>>,
    /// Files written into the local destination on sync, as (name, contents).
    pub files: RefCell<Vec<(String, String)>>,
}

impl FakeTransfer {
    pub fn new(journal: Journal) -> Self {
        FakeTransfer {
            journal,
            code: Cell::new(0),
            requests: RefCell::new(Vec::new()),
            files: RefCell::new(Vec::new()),
        }
    }
}

impl Transfer for FakeTransfer {
    fn sync(&self, request: &TransferRequest) -> std::io::Result<i32> {
        self.journal.borrow_mut().push(Call::Transfer);
        self.requests.borrow_mut().push(request.clone());
        let dir = PathBuf::from(&request.destination);
        for (name, contents) in self.files.borrow().iter() {
            std::fs::write(dir.join(name), contents)?;
        }
        Ok(self.code.get())
    }
}

/// A full set of fakes sharing one journal.
pub struct Fakes {
    pub journal: Journal,
    pub platform: FakePlatform,
    pub executor: FakeExecutor,
    pub transfer: FakeTransfer,
    pub clock: ManualClock,
}

impl Fakes {
    pub fn new() -> Self {
        let journal: Journal = Rc::new(RefCell::new(Vec::new()));
        let fakes = Fakes {
            platform: FakePlatform::new(journal.clone()),
            executor: FakeExecutor::new(journal.clone()),
            transfer: FakeTransfer::new(journal.clone()),
            clock: ManualClock::new(),
            journal,
        };
        fakes
            .executor
            .respond("config:status", 0, "system.site\n");
        fakes
    }

    pub fn context(&self, env: Environment, options: CommandOptions) -> Context<'_> {
        self.context_in(env, options, PathBuf::from("."))
    }

    pub fn context_in(
        &self,
        env: Environment,
        options: CommandOptions,
        working_dir: PathBuf,
    ) -> Context<'_> {
        Context {
            env,
            platform: &self.platform,
            executor: &self.executor,
            clock: &self.clock,
            options,
            working_dir,
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.journal.borrow().clone()
    }

    /// Calls that change state on the remote side, in order.
    pub fn side_effects(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|call| match call {
                Call::SetMode(_) | Call::Commit(_) => true,
                Call::Run(line) => line.contains("config:export"),
                _ => false,
            })
            .collect()
    }
}
