//! Report building and rendering for scan results.
//!
//! The engine yields every equivalence class, singletons included; the
//! report keeps only groups of two or more files, the ones a user cares
//! about. Two renderers are provided: a human-readable text listing and
//! machine-readable JSON.

pub mod json;
pub mod text;

pub use json::JsonOutput;

use std::path::PathBuf;

use serde::Serialize;

use crate::engine::{RunSummary, SearchEngine};

/// One group of byte-identical files.
#[derive(Debug, Clone, Serialize)]
pub struct GroupEntry {
    /// File size shared by every member, in bytes.
    pub size: u64,
    /// Members in discovery order.
    pub paths: Vec<PathBuf>,
}

impl GroupEntry {
    /// Bytes freed by keeping one copy of this group.
    #[must_use]
    pub fn reclaimable(&self) -> u64 {
        self.size * (self.paths.len() as u64 - 1)
    }
}

/// Full result of one scan: duplicate groups plus run counters.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    /// Groups with at least two members, smallest size first.
    pub groups: Vec<GroupEntry>,
    /// Run counters.
    pub summary: RunSummary,
}

impl Report {
    /// Collect the duplicate groups of the engine's last run.
    #[must_use]
    pub fn collect(engine: &SearchEngine, summary: RunSummary) -> Self {
        let groups = engine
            .groups()
            .filter(|class| class.len() > 1)
            .map(|class| GroupEntry {
                size: class.size(),
                paths: class.paths().to_vec(),
            })
            .collect();
        Self { groups, summary }
    }

    /// Whether any duplicates were found.
    #[must_use]
    pub fn has_duplicates(&self) -> bool {
        !self.groups.is_empty()
    }

    /// Total bytes freed by keeping one copy of every group.
    #[must_use]
    pub fn reclaimable(&self) -> u64 {
        self.groups.iter().map(GroupEntry::reclaimable).sum()
    }
}
