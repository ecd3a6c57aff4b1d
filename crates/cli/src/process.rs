// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Subprocess execution shared by the adapters.

use std::io;
use std::process::{Command, Stdio};
use tracing::debug;

use pcex_core::CommandOutput;

/// Runs `program` to completion with captured output and no stdin.
pub fn capture(program: &str, args: &[String]) -> io::Result<CommandOutput> {
    debug!("running {} {}", program, args.join(" "));
    let output = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .output()
        .map_err(|e| with_program(program, e))?;
    let result = CommandOutput {
        code: exit_code(output.status)?,
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    };
    debug!("{} exited with {}", program, result.code);
    Ok(result)
}

/// Runs `program` with inherited stdout/stderr and returns its exit code.
pub fn status(program: &str, args: &[String]) -> io::Result<i32> {
    debug!("running {} {}", program, args.join(" "));
    let status = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .status()
        .map_err(|e| with_program(program, e))?;
    exit_code(status)
}

fn exit_code(status: std::process::ExitStatus) -> io::Result<i32> {
    status
        .code()
        .ok_or_else(|| io::Error::other("process terminated by signal"))
}

fn with_program(program: &str, e: io::Error) -> io::Error {
    if e.kind() == io::ErrorKind::NotFound {
        io::Error::new(e.kind(), format!("{}: command not found", program))
    } else {
        io::Error::new(e.kind(), format!("{}: {}", program, e))
    }
}
