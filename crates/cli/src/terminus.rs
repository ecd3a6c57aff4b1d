// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The hosting platform, reached through its own CLI.
//!
//! Every query runs `terminus <command> ... --format=json` as a subprocess
//! and parses stdout with `serde_json`. Mutations (`connection:set`,
//! `env:commit`) print notices on stderr only, so the workflow they started
//! is read back from `workflow:list`.

use chrono::{DateTime, TimeZone, Utc};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::BTreeMap;
use tracing::debug;

use pcex_core::{
    CommandOutput, ConnectionInfo, ConnectionMode, Diffstat, Environment, FileChange, Platform,
    PlatformError, SiteEnv, Workflow, WorkflowStatus,
};

use crate::process;

/// Reads the sync directory from the site's settings.
const CONFIG_DIRECTORY_PHP: &str =
    r"echo \Drupal\Core\Site\Settings::get('config_sync_directory');";

pub struct TerminusPlatform {
    program: String,
}

impl TerminusPlatform {
    pub fn new(program: impl Into<String>) -> Self {
        TerminusPlatform {
            program: program.into(),
        }
    }

    /// Runs one terminus command and fails on a non-zero exit.
    fn call(&self, operation: &str, args: &[String]) -> Result<CommandOutput, PlatformError> {
        let mut argv = vec![operation.to_string()];
        argv.extend_from_slice(args);
        let output = process::capture(&self.program, &argv)?;
        if !output.success() {
            return Err(PlatformError::Failed {
                operation: operation.to_string(),
                message: clean_message(&output.stderr),
            });
        }
        Ok(output)
    }

    fn query<T: DeserializeOwned>(
        &self,
        operation: &str,
        args: &[String],
    ) -> Result<T, PlatformError> {
        let mut argv = args.to_vec();
        argv.push("--format=json".to_string());
        let output = self.call(operation, &argv)?;
        Ok(serde_json::from_str(&output.stdout)?)
    }

    fn current_mode(&self, env: &Environment) -> Result<ConnectionMode, PlatformError> {
        let info: EnvInfo = self.query("env:info", &[env.site_env().to_string()])?;
        parse_mode(&info.connection_mode)
    }

    fn workflows(&self, env: &Environment) -> Result<Vec<Workflow>, PlatformError> {
        let list: WorkflowList = self.query("workflow:list", &[env.site_name.clone()])?;
        list.into_records()
            .into_iter()
            .filter(|r| r.env.as_deref().is_none_or(|e| e == env.id))
            .map(WorkflowRecord::into_workflow)
            .collect()
    }

    /// The workflow started by a mutation that just returned, with the
    /// mutation's notice attached.
    fn started_workflow(
        &self,
        env: &Environment,
        operation: &str,
        output: &CommandOutput,
    ) -> Result<Workflow, PlatformError> {
        let mut workflow = self
            .latest_workflow(env)?
            .ok_or_else(|| PlatformError::NotFound(format!("workflow started by {}", operation)))?;
        let notice = clean_message(&output.stderr);
        if !notice.is_empty() {
            workflow.message = Some(notice);
        }
        Ok(workflow)
    }
}

impl Platform for TerminusPlatform {
    fn resolve(&self, site_env: &SiteEnv) -> Result<Environment, PlatformError> {
        let site: SiteInfo = self
            .query("site:info", &[site_env.site.clone()])
            .map_err(|e| not_found(e, &site_env.site))?;
        let info: EnvInfo = self
            .query("env:info", &[site_env.to_string()])
            .map_err(|e| not_found(e, &site_env.to_string()))?;
        Ok(Environment {
            site_id: site.id,
            site_name: site.name,
            id: info.id,
            connection_mode: parse_mode(&info.connection_mode)?,
        })
    }

    fn set_connection_mode(
        &self,
        env: &Environment,
        mode: ConnectionMode,
    ) -> Result<Workflow, PlatformError> {
        if self.current_mode(env)? == mode {
            return Err(PlatformError::AlreadyInMode(mode));
        }
        let output = self
            .call(
                "connection:set",
                &[env.site_env().to_string(), mode.to_string()],
            )
            .map_err(|e| match e {
                PlatformError::Failed { ref message, .. } if is_already_in_mode(message) => {
                    PlatformError::AlreadyInMode(mode)
                }
                other => other,
            })?;
        self.started_workflow(env, "connection:set", &output)
    }

    fn diffstat(&self, env: &Environment) -> Result<Diffstat, PlatformError> {
        let record: DiffstatRecord = self.query("env:diffstat", &[env.site_env().to_string()])?;
        Ok(record.into_diffstat())
    }

    fn commit(&self, env: &Environment, message: &str) -> Result<Workflow, PlatformError> {
        let output = self.call(
            "env:commit",
            &[env.site_env().to_string(), format!("--message={}", message)],
        )?;
        self.started_workflow(env, "env:commit", &output)
    }

    fn latest_workflow(&self, env: &Environment) -> Result<Option<Workflow>, PlatformError> {
        Ok(latest(self.workflows(env)?))
    }

    fn workflow(&self, env: &Environment, id: &str) -> Result<Workflow, PlatformError> {
        let record: WorkflowRecord = self.query(
            "workflow:info:status",
            &[env.site_name.clone(), format!("--id={}", id)],
        )?;
        record.into_workflow()
    }

    fn connection_info(&self, env: &Environment) -> Result<ConnectionInfo, PlatformError> {
        let info: ConnectionRecord =
            self.query("connection:info", &[env.site_env().to_string()])?;
        info.into_connection_info()
    }

    fn config_directory(&self, env: &Environment) -> Result<Option<String>, PlatformError> {
        let output = self.call(
            "remote:drush",
            &[
                env.site_env().to_string(),
                "--".to_string(),
                "php:eval".to_string(),
                CONFIG_DIRECTORY_PHP.to_string(),
            ],
        )?;
        let dir = output.stdout.trim();
        debug!("declared config directory: {:?}", dir);
        Ok((!dir.is_empty()).then(|| dir.to_string()))
    }
}

#[derive(Debug, Deserialize)]
struct SiteInfo {
    id: String,
    name: String,
}

#[derive(Debug, Deserialize)]
struct EnvInfo {
    id: String,
    connection_mode: String,
}

/// A number the platform may also render as a string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum Numeric {
    Int(i64),
    Float(f64),
    Text(String),
}

impl Numeric {
    fn as_f64(&self) -> Option<f64> {
        match self {
            Numeric::Int(n) => Some(*n as f64),
            Numeric::Float(f) => Some(*f),
            Numeric::Text(s) => s.trim().parse().ok(),
        }
    }

    fn as_u64(&self) -> Option<u64> {
        self.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64)
    }

    fn as_timestamp(&self) -> Option<DateTime<Utc>> {
        let secs = self.as_f64()?;
        let whole = secs.trunc() as i64;
        let nanos = ((secs - secs.trunc()) * 1e9) as u32;
        Utc.timestamp_opt(whole, nanos).single()
    }
}

#[derive(Debug, Deserialize)]
struct WorkflowRecord {
    id: String,
    #[serde(default)]
    env: Option<String>,
    #[serde(default)]
    workflow: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    status: String,
    #[serde(default)]
    created_at: Option<Numeric>,
    #[serde(default)]
    started_at: Option<Numeric>,
    #[serde(default)]
    finished_at: Option<Numeric>,
}

impl WorkflowRecord {
    fn into_workflow(self) -> Result<Workflow, PlatformError> {
        let created_at = self
            .created_at
            .as_ref()
            .or(self.started_at.as_ref())
            .and_then(Numeric::as_timestamp)
            .ok_or_else(|| PlatformError::Failed {
                operation: "workflow".to_string(),
                message: format!("workflow {} has no creation time", self.id),
            })?;
        Ok(Workflow {
            description: self.workflow.or(self.description).unwrap_or_default(),
            created_at,
            status: WorkflowStatus::from_platform(&self.status),
            finished_at: self.finished_at.as_ref().and_then(Numeric::as_timestamp),
            message: None,
            id: self.id,
        })
    }
}

/// `workflow:list` renders rows either as an array or keyed by id.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WorkflowList {
    Rows(Vec<WorkflowRecord>),
    Keyed(BTreeMap<String, WorkflowRecord>),
}

impl WorkflowList {
    fn into_records(self) -> Vec<WorkflowRecord> {
        match self {
            WorkflowList::Rows(rows) => rows,
            WorkflowList::Keyed(map) => map.into_values().collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct FileRecord {
    #[serde(default)]
    status: String,
    #[serde(default)]
    additions: Option<Numeric>,
    #[serde(default)]
    deletions: Option<Numeric>,
}

/// An empty diffstat comes back as `[]`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DiffstatRecord {
    Files(BTreeMap<String, FileRecord>),
    Empty(Vec<serde::de::IgnoredAny>),
}

impl DiffstatRecord {
    fn into_diffstat(self) -> Diffstat {
        let mut diff = Diffstat::default();
        if let DiffstatRecord::Files(files) = self {
            for (path, file) in files {
                diff.insert(
                    path,
                    FileChange {
                        status: file.status,
                        additions: file.additions.as_ref().and_then(Numeric::as_u64).unwrap_or(0),
                        deletions: file.deletions.as_ref().and_then(Numeric::as_u64).unwrap_or(0),
                    },
                );
            }
        }
        diff
    }
}

#[derive(Debug, Deserialize)]
struct ConnectionRecord {
    sftp_username: String,
    sftp_host: String,
    sftp_port: Numeric,
}

impl ConnectionRecord {
    fn into_connection_info(self) -> Result<ConnectionInfo, PlatformError> {
        let port = self
            .sftp_port
            .as_u64()
            .and_then(|p| u16::try_from(p).ok())
            .ok_or_else(|| PlatformError::Failed {
                operation: "connection:info".to_string(),
                message: format!("invalid sftp port {:?}", self.sftp_port),
            })?;
        Ok(ConnectionInfo {
            user: self.sftp_username,
            host: self.sftp_host,
            port,
        })
    }
}

fn parse_mode(s: &str) -> Result<ConnectionMode, PlatformError> {
    s.parse().map_err(|e: pcex_core::Error| PlatformError::Failed {
        operation: "env:info".to_string(),
        message: e.to_string(),
    })
}

fn latest(workflows: Vec<Workflow>) -> Option<Workflow> {
    workflows.into_iter().max_by_key(|wf| wf.created_at)
}

/// The platform's wording when a mode change is a no-op.
fn is_already_in_mode(message: &str) -> bool {
    message.to_lowercase().contains("already")
}

/// Lookup failures for a missing site or environment become `NotFound`.
fn not_found(e: PlatformError, what: &str) -> PlatformError {
    let missing = matches!(&e, PlatformError::Failed { message, .. } if mentions_missing(message));
    if missing {
        PlatformError::NotFound(what.to_string())
    } else {
        e
    }
}

fn mentions_missing(message: &str) -> bool {
    let lower = message.to_lowercase();
    lower.contains("could not") || lower.contains("not found")
}

/// Strips `[level]` prefixes and joins stderr notices into one line.
fn clean_message(stderr: &str) -> String {
    stderr
        .lines()
        .map(|line| {
            let line = line.trim();
            match line.strip_prefix('[').and_then(|rest| rest.split_once(']')) {
                Some((_, message)) => message.trim(),
                None => line,
            }
        })
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
#[path = "terminus_tests.rs"]
mod tests;
