// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Files that differ between an environment's live filesystem and its
//! version-controlled state.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One changed file as reported by the platform.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FileChange {
    /// Short status code, e.g. `A`, `M`, `D`.
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub additions: u64,
    #[serde(default)]
    pub deletions: u64,
}

/// The change-set of an environment, keyed by path.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Diffstat {
    pub files: BTreeMap<String, FileChange>,
}

impl Diffstat {
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn insert(&mut self, path: impl Into<String>, change: FileChange) {
        self.files.insert(path.into(), change);
    }
}
