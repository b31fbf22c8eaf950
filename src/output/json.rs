//! JSON report rendering for scripting and automation.
//!
//! # Output Schema
//!
//! ```json
//! {
//!   "duplicates": [
//!     {
//!       "size": 1024,
//!       "paths": ["/path/to/file1.txt", "/path/to/file2.txt"]
//!     }
//!   ],
//!   "summary": {
//!     "duplicate_groups": 1,
//!     "reclaimable_bytes": 1024,
//!     "files_accepted": 10,
//!     "paths_skipped": 0,
//!     "digest_ops": 4
//!   }
//! }
//! ```

use serde::Serialize;

use super::Report;

/// Serializable view over a [`Report`].
#[derive(Debug, Serialize)]
pub struct JsonOutput<'a> {
    duplicates: &'a [super::GroupEntry],
    summary: JsonSummary,
}

#[derive(Debug, Serialize)]
struct JsonSummary {
    duplicate_groups: usize,
    reclaimable_bytes: u64,
    files_accepted: u64,
    paths_skipped: u64,
    digest_ops: u64,
}

impl<'a> JsonOutput<'a> {
    /// Build the JSON view of a report.
    #[must_use]
    pub fn new(report: &'a Report) -> Self {
        Self {
            duplicates: &report.groups,
            summary: JsonSummary {
                duplicate_groups: report.groups.len(),
                reclaimable_bytes: report.reclaimable(),
                files_accepted: report.summary.files_accepted,
                paths_skipped: report.summary.paths_skipped,
                digest_ops: report.summary.digest_ops,
            },
        }
    }

    /// Compact JSON string.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Pretty-printed JSON string.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
