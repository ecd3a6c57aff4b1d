// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Deployment targets: `<site>.<env>` identifiers, environments and their
//! connection mode.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Environments whose connection mode is never changed by this tool.
pub const PROTECTED_ENVIRONMENTS: [&str; 2] = ["test", "live"];

/// A parsed `<site>.<env>` identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SiteEnv {
    /// Site UUID or machine name.
    pub site: String,
    /// Environment name (e.g. `dev`, `multidev-branch`).
    pub env: String,
}

impl SiteEnv {
    /// Parses a `<site>.<env>` identifier.
    pub fn parse(s: &str) -> Result<Self> {
        s.parse()
    }
}

impl FromStr for SiteEnv {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (site, env) = s
            .trim()
            .split_once('.')
            .ok_or_else(|| Error::InvalidSiteEnv(s.to_string()))?;
        if site.is_empty() || env.is_empty() {
            return Err(Error::InvalidSiteEnv(s.to_string()));
        }
        Ok(SiteEnv {
            site: site.to_string(),
            env: env.to_string(),
        })
    }
}

impl fmt::Display for SiteEnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.site, self.env)
    }
}

/// How an environment's code can be changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionMode {
    /// Version-control managed, filesystem read-only.
    Git,
    /// Direct filesystem write access.
    Sftp,
}

impl ConnectionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionMode::Git => "git",
            ConnectionMode::Sftp => "sftp",
        }
    }
}

impl fmt::Display for ConnectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConnectionMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "git" => Ok(ConnectionMode::Git),
            "sftp" => Ok(ConnectionMode::Sftp),
            _ => Err(Error::InvalidConnectionMode(s.to_string())),
        }
    }
}

/// A resolved deployment target on the hosting platform.
///
/// The platform owns the real state. `connection_mode` is a local view that
/// the mode switcher keeps current after each change, since the platform's
/// own cached model can lag behind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Environment {
    /// Site UUID as reported by the platform.
    pub site_id: String,
    /// Site machine name.
    pub site_name: String,
    /// Environment id (`dev`, `test`, `live`, or a multidev name).
    pub id: String,
    pub connection_mode: ConnectionMode,
}

impl Environment {
    /// Returns true for environments whose connection mode must not be changed.
    pub fn is_protected(&self) -> bool {
        PROTECTED_ENVIRONMENTS.contains(&self.id.as_str())
    }

    /// Returns the `<site>.<env>` identifier for this environment.
    pub fn site_env(&self) -> SiteEnv {
        SiteEnv {
            site: self.site_name.clone(),
            env: self.id.clone(),
        }
    }
}

#[cfg(test)]
#[path = "environment_tests.rs"]
mod tests;
