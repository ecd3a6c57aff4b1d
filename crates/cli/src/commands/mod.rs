// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

pub mod export;
pub mod export_remote;

use std::path::{Path, PathBuf};
use tracing::info;

use pcex_core::{
    Clock, CommandOptions, ConnectionInfo, Context, Environment, Platform, RemoteExecutor, SiteEnv,
};

use crate::config::{Config, Overrides, Tools};
use crate::error::Result;
use crate::ssh::SshExecutor;
use crate::terminus::TerminusPlatform;

/// A resolved target environment and the platform adapter that found it.
pub struct Session {
    pub site_env: SiteEnv,
    pub env: Environment,
    pub connection: ConnectionInfo,
    pub options: CommandOptions,
    pub tools: Tools,
    pub platform: TerminusPlatform,
    pub working_dir: PathBuf,
}

impl Session {
    /// Parses the target, merges configuration and resolves the environment.
    pub fn open(site_env: &str, overrides: Overrides, working_dir: &Path) -> Result<Session> {
        let site_env = SiteEnv::parse(site_env)?;
        let config = Config::discover(working_dir)?;
        let options = config.resolve(overrides)?;
        let tools = config.tools();
        let platform = TerminusPlatform::new(tools.terminus.clone());

        info!("Resolving {}", site_env);
        let env = pcex_core::time_phase!("resolve", { platform.resolve(&site_env)? });
        let connection = platform.connection_info(&env)?;

        Ok(Session {
            site_env,
            env,
            connection,
            options,
            tools,
            platform,
            working_dir: working_dir.to_path_buf(),
        })
    }

    pub fn executor(&self) -> SshExecutor {
        SshExecutor::new(self.tools.ssh.clone(), self.connection.clone())
    }

    pub fn context<'a>(
        &'a self,
        executor: &'a dyn RemoteExecutor,
        clock: &'a dyn Clock,
    ) -> Context<'a> {
        Context {
            env: self.env.clone(),
            platform: &self.platform as &dyn Platform,
            executor,
            clock,
            options: self.options.clone(),
            working_dir: self.working_dir.clone(),
        }
    }
}
