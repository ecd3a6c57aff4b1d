// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::io::Write;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let out_dir = std::env::var("OUT_DIR")?;
    let path = std::path::Path::new(&out_dir).join("env_vars.rs");
    let mut f = std::fs::File::create(path)?;

    let vars = [
        (
            "WORKFLOW_TIMEOUT",
            "TERMINUS_BUILD_TOOLS_WORKFLOW_TIMEOUT",
        ),
        ("PCEX_LOG", "PCEX_LOG"),
        ("PCEX_TIMINGS", "PCEX_TIMINGS"),
        ("PCEX_TERMINUS", "PCEX_TERMINUS"),
        ("PCEX_SSH", "PCEX_SSH"),
        ("PCEX_RSYNC", "PCEX_RSYNC"),
    ];

    for (const_name, env_name) in &vars {
        writeln!(f, "pub const {const_name}: &str = \"{env_name}\";")?;
    }

    println!("cargo:rerun-if-changed=build.rs");
    Ok(())
}
