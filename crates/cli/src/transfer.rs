// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! File transfer with rsync over ssh.

use std::io;

use pcex_core::{Transfer, TransferRequest};

use crate::process;

pub struct RsyncTransfer {
    program: String,
    ssh_program: String,
}

impl RsyncTransfer {
    pub fn new(program: impl Into<String>, ssh_program: impl Into<String>) -> Self {
        RsyncTransfer {
            program: program.into(),
            ssh_program: ssh_program.into(),
        }
    }
}

impl Transfer for RsyncTransfer {
    fn sync(&self, request: &TransferRequest) -> io::Result<i32> {
        process::status(&self.program, &rsync_args(request, &self.ssh_program))
    }
}

/// Recursive, symlink-preserving, always-copy transfer over IPv4.
pub fn rsync_args(request: &TransferRequest, ssh_program: &str) -> Vec<String> {
    let mut args = vec!["-rlIvz".to_string(), "--ipv4".to_string()];
    args.extend(request.excludes.iter().map(|e| format!("--exclude={}", e)));
    args.push("-e".to_string());
    args.push(format!("{} -p {}", ssh_program, request.port));
    args.push(request.source.clone());
    args.push(request.destination.clone());
    args
}

#[cfg(test)]
#[path = "transfer_tests.rs"]
mod tests;
