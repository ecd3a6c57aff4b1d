// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Project configuration management.
//!
//! Configuration is read from the nearest `pcex.toml`, searching from the
//! current directory upwards and then in the user's config directory
//! (`~/.config/pcex/pcex.toml` on Linux). Every key is optional:
//!
//! ```toml
//! message = "Export config"
//! timeout = 300
//! destination = "config/sync"
//! remote_destination = "config-export"
//! docroot = "web"
//! strict_transfer = false
//! sync_description = "Sync code on {env}"
//!
//! [tools]
//! terminus = "terminus"
//! ssh = "ssh"
//! rsync = "rsync"
//! ```
//!
//! Per key, a CLI flag wins over an environment variable, which wins over
//! the file, which wins over the built-in default.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use pcex_core::CommandOptions;

use crate::env;
use crate::error::{Error, Result};

pub const CONFIG_FILE_NAME: &str = "pcex.toml";

/// Contents of a `pcex.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub message: Option<String>,
    /// Seconds.
    pub timeout: Option<u64>,
    /// Relative paths are resolved against the file's directory.
    pub destination: Option<PathBuf>,
    pub remote_destination: Option<String>,
    pub docroot: Option<PathBuf>,
    pub strict_transfer: Option<bool>,
    pub sync_description: Option<String>,
    #[serde(default)]
    pub tools: ToolsConfig,
}

/// External programs, by name or path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ToolsConfig {
    pub terminus: Option<String>,
    pub ssh: Option<String>,
    pub rsync: Option<String>,
}

/// Resolved program names for the adapters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tools {
    pub terminus: String,
    pub ssh: String,
    pub rsync: String,
}

/// Values given on the command line.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub message: Option<String>,
    pub timeout: Option<u64>,
    pub destination: Option<PathBuf>,
    pub remote_destination: Option<String>,
    pub strict_transfer: bool,
    pub force: bool,
}

impl Config {
    /// Loads a config file.
    pub fn load(path: &Path) -> Result<Config> {
        let content = fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        if let (Some(dir), Some(dest)) = (path.parent(), config.destination.as_ref()) {
            if dest.is_relative() {
                config.destination = Some(dir.join(dest));
            }
        }
        Ok(config)
    }

    /// Finds and loads the config that applies to `start`, or the default
    /// config if there is none.
    pub fn discover(start: &Path) -> Result<Config> {
        match find_config_file(start) {
            Some(path) => {
                debug!("using config {}", path.display());
                Config::load(&path)
            }
            None => Ok(Config::default()),
        }
    }

    /// Merges overrides, the environment and this file into the options for
    /// one invocation.
    pub fn resolve(&self, overrides: Overrides) -> Result<CommandOptions> {
        self.resolve_with(overrides, env::workflow_timeout())
    }

    /// Like [`Config::resolve`], with the timeout variable passed in.
    pub fn resolve_with(
        &self,
        overrides: Overrides,
        env_timeout: Option<String>,
    ) -> Result<CommandOptions> {
        let defaults = CommandOptions::default();

        // The variable is only consulted without an explicit flag.
        let env_timeout = match overrides.timeout {
            Some(_) => None,
            None => env_timeout
                .map(|value| {
                    value.parse::<u64>().map_err(|_| Error::InvalidTimeout {
                        name: env::vars::WORKFLOW_TIMEOUT,
                        value,
                    })
                })
                .transpose()?,
        };
        let timeout = overrides
            .timeout
            .or(env_timeout)
            .or(self.timeout)
            .map(Duration::from_secs)
            .unwrap_or(defaults.timeout);

        Ok(CommandOptions {
            message: overrides
                .message
                .or_else(|| self.message.clone())
                .unwrap_or(defaults.message),
            timeout,
            destination: overrides
                .destination
                .or_else(|| self.destination.clone()),
            remote_destination: overrides
                .remote_destination
                .or_else(|| self.remote_destination.clone())
                .unwrap_or(defaults.remote_destination),
            strict_transfer: overrides.strict_transfer || self.strict_transfer.unwrap_or(false),
            force: overrides.force,
            docroot: self.docroot.clone().unwrap_or(defaults.docroot),
            sync_description: self
                .sync_description
                .clone()
                .unwrap_or(defaults.sync_description),
        })
    }

    /// Program names, environment first.
    pub fn tools(&self) -> Tools {
        self.tools_with(env::terminus(), env::ssh(), env::rsync())
    }

    /// Like [`Config::tools`], with the environment values passed in.
    pub fn tools_with(
        &self,
        terminus: Option<String>,
        ssh: Option<String>,
        rsync: Option<String>,
    ) -> Tools {
        fn pick(from_env: Option<String>, from_file: &Option<String>, default: &str) -> String {
            from_env
                .or_else(|| from_file.clone())
                .unwrap_or_else(|| default.to_string())
        }
        Tools {
            terminus: pick(terminus, &self.tools.terminus, "terminus"),
            ssh: pick(ssh, &self.tools.ssh, "ssh"),
            rsync: pick(rsync, &self.tools.rsync, "rsync"),
        }
    }
}

/// Walks up from `start` looking for [`CONFIG_FILE_NAME`], then falls back
/// to the user config directory.
pub fn find_config_file(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        let candidate = current.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            return Some(candidate);
        }
        if !current.pop() {
            break;
        }
    }
    dirs::config_dir()
        .map(|dir| dir.join("pcex").join(CONFIG_FILE_NAME))
        .filter(|path| path.is_file())
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
