// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Export configuration to a private remote path and pull it down locally.

use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info, warn};

use crate::context::Context;
use crate::error::{Error, Result};
use crate::platform::{ConnectionInfo, Transfer, TransferRequest};

/// Marks a transfer argument as the remote side.
pub const REMOTE_MARKER: char = ':';
/// Transfer exit code for a partial transfer (some files vanished).
pub const PARTIAL_TRANSFER_CODE: i32 = 23;
/// Version control metadata never copied down.
pub const TRANSFER_EXCLUDES: [&str; 3] = [".git", ".svn", ".hg"];
/// Mode applied to transferred YAML files.
pub const CONFIG_FILE_MODE: u32 = 0o644;

/// Remote private files root, relative to the SSH/SFTP home directory.
const PRIVATE_FILES_DIR: &str = "files/private";

/// What a remote export produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub destination: PathBuf,
    /// Exit code of the transfer program.
    pub transfer_code: i32,
    /// Number of YAML files whose permissions were normalized.
    pub files: usize,
}

pub struct RemoteSyncOrchestrator<'a> {
    ctx: Context<'a>,
    transfer: &'a dyn Transfer,
    connection: ConnectionInfo,
}

impl<'a> RemoteSyncOrchestrator<'a> {
    pub fn new(ctx: Context<'a>, transfer: &'a dyn Transfer, connection: ConnectionInfo) -> Self {
        RemoteSyncOrchestrator {
            ctx,
            transfer,
            connection,
        }
    }

    /// Runs the export on the remote side and syncs the result to the local
    /// destination from the options.
    pub fn run(&self) -> Result<SyncReport> {
        self.export_remote(
            &self.ctx.options.remote_destination,
            self.ctx.options.destination.as_deref(),
        )
    }

    pub fn export_remote(
        &self,
        remote_destination: &str,
        local_destination: Option<&Path>,
    ) -> Result<SyncReport> {
        let remote_dir = format!(
            "{}/{}",
            PRIVATE_FILES_DIR,
            remote_destination.trim_matches('/')
        );

        self.ensure_remote_dir(&remote_dir);

        info!("Exporting site configuration to {}", remote_dir);
        let output = self
            .ctx
            .executor
            .run(&self.ctx.env, &export_to_command(&remote_dir))
            .map_err(|e| Error::remote("config export", e))?;
        if !output.success() {
            return Err(Error::remote(
                "config export",
                format!("exit code {}: {}", output.code, output.stderr.trim()),
            ));
        }

        let destination = self.resolve_destination(local_destination)?;
        fs::create_dir_all(&destination)?;

        let source = format!("{}{}/", REMOTE_MARKER, remote_dir);
        let target = format!("{}/", destination.display());
        info!("Syncing {} to {}", remote_dir, destination.display());
        let code = crate::time_phase!("transfer", { self.sync_paths(&source, &target)? });

        let files = normalize_permissions(&destination)?;
        info!("Synced {} configuration files", files);

        Ok(SyncReport {
            destination,
            transfer_code: code,
            files,
        })
    }

    /// Copies between `source` and `destination`. Whichever argument starts
    /// with [`REMOTE_MARKER`] is expanded to the environment's address.
    pub fn sync_paths(&self, source: &str, destination: &str) -> Result<i32> {
        let request = TransferRequest {
            source: self.expand(source),
            destination: self.expand(destination),
            port: self.connection.port,
            excludes: TRANSFER_EXCLUDES.iter().map(|s| s.to_string()).collect(),
        };
        let code = self.transfer.sync(&request)?;
        check_transfer_code(code, self.ctx.options.strict_transfer)?;
        if code == PARTIAL_TRANSFER_CODE {
            warn!("Transfer was partial (exit code {}), continuing", code);
        }
        Ok(code)
    }

    fn expand(&self, arg: &str) -> String {
        match arg.strip_prefix(REMOTE_MARKER) {
            Some(path) => self.connection.remote_path(path),
            None => arg.to_string(),
        }
    }

    fn ensure_remote_dir(&self, remote_dir: &str) {
        let command = vec![
            "mkdir".to_string(),
            "-p".to_string(),
            remote_dir.to_string(),
        ];
        match self.ctx.executor.run(&self.ctx.env, &command) {
            Ok(output) if output.success() => {}
            Ok(output) => debug!(
                "mkdir {} exited with {}: {}",
                remote_dir,
                output.code,
                output.stderr.trim()
            ),
            Err(e) => debug!("mkdir {} failed: {}", remote_dir, e),
        }
    }

    /// Explicit destination, else the project's relative config directory,
    /// else the working directory.
    fn resolve_destination(&self, explicit: Option<&Path>) -> Result<PathBuf> {
        if let Some(path) = explicit {
            return Ok(self.ctx.working_dir.join(path));
        }
        let declared = self
            .ctx
            .platform
            .config_directory(&self.ctx.env)
            .map_err(|e| Error::remote("config directory lookup", e))?;
        match declared.as_deref().map(str::trim) {
            Some(dir) if Path::new(dir).is_absolute() => {
                // An absolute remote path says nothing about the local checkout.
                debug!("ignoring absolute config directory {}", dir);
                Ok(self.ctx.working_dir.clone())
            }
            Some(dir) if !dir.is_empty() => {
                let relative = normalize(&self.ctx.options.docroot.join(dir));
                Ok(self.ctx.working_dir.join(relative))
            }
            _ => Ok(self.ctx.working_dir.clone()),
        }
    }
}

/// Remote command exporting configuration into `remote_dir`, relative to the
/// container's home directory.
pub fn export_to_command(remote_dir: &str) -> Vec<String> {
    vec![
        "drush".to_string(),
        "config:export".to_string(),
        "-y".to_string(),
        format!("--destination={}", remote_dir),
    ]
}

/// Accepts 0 and, unless `strict`, the partial transfer code.
pub fn check_transfer_code(code: i32, strict: bool) -> Result<()> {
    match code {
        0 => Ok(()),
        PARTIAL_TRANSFER_CODE if !strict => Ok(()),
        code => Err(Error::TransferFailed { code }),
    }
}

/// Lexically resolves `.` and `..` without touching the filesystem.
/// Leading `..` that cannot be resolved are kept.
fn normalize(path: &Path) -> PathBuf {
    let mut out: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.last() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(component),
            },
            c => out.push(c),
        }
    }
    out.iter().map(|c| c.as_os_str()).collect()
}

/// Sets [`CONFIG_FILE_MODE`] on every `*.yml` file directly in `dir`.
fn normalize_permissions(dir: &Path) -> Result<usize> {
    let mut count = 0;
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "yml") {
            set_mode(&path)?;
            count += 1;
        }
    }
    Ok(count)
}

#[cfg(unix)]
fn set_mode(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(CONFIG_FILE_MODE))
}

#[cfg(not(unix))]
fn set_mode(path: &Path) -> std::io::Result<()> {
    let mut perms = fs::metadata(path)?.permissions();
    perms.set_readonly(false);
    fs::set_permissions(path, perms)
}

#[cfg(test)]
#[path = "remote_sync_tests.rs"]
mod tests;
