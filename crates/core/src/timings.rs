// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Phase timing instrumentation for debugging slow exports.
//!
//! Enable with `PCEX_TIMINGS=1` environment variable.
//! Output goes to stderr in format: `[timings] phase XXms`

use std::time::Instant;

/// Name of the environment variable that enables timing output.
pub const TIMINGS_VAR: &str = "PCEX_TIMINGS";

/// Check if timings are enabled via PCEX_TIMINGS environment variable.
#[inline]
pub fn timings_enabled() -> bool {
    std::env::var(TIMINGS_VAR).is_ok()
}

/// Print a timing result to stderr if timings are enabled.
#[inline]
pub fn print_timing(phase: &str, start: Instant) {
    if timings_enabled() {
        let elapsed = start.elapsed();
        eprintln!("[timings] {} {}ms", phase, elapsed.as_millis());
    }
}

/// Macro for timing a block of code.
///
/// Usage:
/// ```rust,ignore
/// let changed = time_phase!("await_diff", {
///     detector.await_changes(&env, timeout)?
/// });
/// ```
#[macro_export]
macro_rules! time_phase {
    ($phase:expr, $block:expr) => {{
        let __start = std::time::Instant::now();
        let __result = $block;
        $crate::timings::print_timing($phase, __start);
        __result
    }};
}
