// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

// Allow unused items: test helpers are shared across multiple test binaries,
// and not every test file uses every helper.
#![allow(dead_code)]
#![allow(unused_imports)]

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

pub use predicates::prelude::*;
pub use tempfile::TempDir;

/// Answers platform queries from files in `$FAKE_STATE` and logs each call.
const FAKE_TERMINUS: &str = r#"#!/bin/sh
state="$FAKE_STATE"
echo "$@" >> "$state/terminus.log"
now=$(date +%s)
case "$1" in
  site:info) echo '{"id": "6c6b7a1e", "name": "my-site"}' ;;
  env:info)
    case "$2" in
      *.qa) echo '[error] Could not find an environment identified by qa.' >&2; exit 1 ;;
    esac
    mode=$(cat "$state/mode" 2>/dev/null || echo git)
    echo "{\"id\": \"${2#*.}\", \"connection_mode\": \"$mode\"}" ;;
  connection:set)
    echo "$3" > "$state/mode"
    echo "[notice] Connection mode set to $3" >&2 ;;
  env:diffstat)
    if [ -f "$state/dirty" ]; then
      echo '{"config/system.site.yml": {"status": "M", "additions": "1", "deletions": "0"}}'
    else
      echo '[]'
    fi ;;
  env:commit)
    rm -f "$state/dirty"
    echo '[notice] Your code was committed.' >&2 ;;
  workflow:list)
    echo "[{\"id\": \"wf-1\", \"env\": \"dev\", \"workflow\": \"Sync code on dev\", \"status\": \"succeeded\", \"started_at\": $((now + 5))}]" ;;
  workflow:info:status)
    echo "{\"id\": \"wf-1\", \"env\": \"dev\", \"workflow\": \"Sync code on dev\", \"status\": \"succeeded\", \"started_at\": $((now + 5))}" ;;
  connection:info)
    echo '{"sftp_username": "dev.6c6b7a1e", "sftp_host": "appserver.dev.6c6b7a1e.drush.in", "sftp_port": 2222}' ;;
  remote:drush) echo '../config' ;;
  *) echo "[error] unexpected command $1" >&2; exit 1 ;;
esac
"#;

/// Runs nothing remotely: answers `config:status` from `$FAKE_STATUS` and
/// marks the environment dirty on export.
const FAKE_SSH: &str = r#"#!/bin/sh
state="$FAKE_STATE"
for last; do :; done
echo "$last" >> "$state/ssh.log"
case "$last" in
  *config:status*) printf '%s' "$FAKE_STATUS" ;;
  *config:export*) [ -n "$FAKE_EXPORT_NOOP" ] || touch "$state/dirty" ;;
esac
exit 0
"#;

/// Drops one YAML file into the destination and exits with
/// `$FAKE_RSYNC_CODE`.
const FAKE_RSYNC: &str = r#"#!/bin/sh
echo "$@" >> "$FAKE_STATE/rsync.log"
for last; do :; done
mkdir -p "$last"
echo 'name: Site' > "$last/system.site.yml"
exit "${FAKE_RSYNC_CODE:-0}"
"#;

/// A project directory with fake platform tools.
pub struct Fixture {
    pub project: TempDir,
    pub state: TempDir,
}

impl Fixture {
    pub fn new() -> Self {
        let fixture = Fixture {
            project: TempDir::new().unwrap(),
            state: TempDir::new().unwrap(),
        };
        fixture.install("terminus", FAKE_TERMINUS);
        fixture.install("ssh", FAKE_SSH);
        fixture.install("rsync", FAKE_RSYNC);
        fixture
    }

    fn install(&self, name: &str, script: &str) {
        let path = self.tool(name);
        fs::write(&path, script).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    }

    pub fn tool(&self, name: &str) -> PathBuf {
        self.state.path().join(format!("fake-{}", name))
    }

    /// `pcex` running in the project directory against the fakes.
    pub fn pcex(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("pcex");
        cmd.current_dir(self.project.path())
            .env("PCEX_TERMINUS", self.tool("terminus"))
            .env("PCEX_SSH", self.tool("ssh"))
            .env("PCEX_RSYNC", self.tool("rsync"))
            .env("FAKE_STATE", self.state.path())
            .env("FAKE_STATUS", "system.site\n")
            .env_remove("TERMINUS_BUILD_TOOLS_WORKFLOW_TIMEOUT")
            .env_remove("PCEX_LOG")
            .env_remove("PCEX_TIMINGS");
        cmd
    }

    pub fn set_mode(&self, mode: &str) {
        fs::write(self.state.path().join("mode"), format!("{}\n", mode)).unwrap();
    }

    pub fn mode(&self) -> String {
        fs::read_to_string(self.state.path().join("mode"))
            .map(|s| s.trim().to_string())
            .unwrap_or_else(|_| "git".to_string())
    }

    pub fn log(&self, tool: &str) -> String {
        fs::read_to_string(self.state.path().join(format!("{}.log", tool))).unwrap_or_default()
    }

    pub fn project_path(&self, rel: &str) -> PathBuf {
        self.project.path().join(rel)
    }
}

pub fn pcex() -> Command {
    cargo_bin_cmd!("pcex")
}
