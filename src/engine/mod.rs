//! The duplicate search engine.
//!
//! # Overview
//!
//! [`SearchEngine`] walks the configured scan roots, admits candidates
//! through the [`CandidateFilter`], and feeds them to the [`BlockTrie`],
//! which groups byte-identical files while hashing only the blocks needed
//! to tell files apart. After [`SearchEngine::run`] the equivalence classes
//! are read back through [`SearchEngine::groups`].
//!
//! The engine is single-threaded and synchronous: `run` returns when the
//! scan is complete, and the digest context and scratch block buffer are
//! owned by the engine and reused across every file and level of a run.
//! Per-path problems are logged and counted, never fatal to the run.
//!
//! # Example
//!
//! ```no_run
//! use dupetrie::engine::{InitParams, SearchEngine};
//! use std::path::PathBuf;
//!
//! let params = InitParams {
//!     paths_scan: vec![PathBuf::from("/home/user/Downloads")],
//!     ..Default::default()
//! };
//! let mut engine = SearchEngine::new(params).unwrap();
//! let summary = engine.run(true);
//!
//! for class in engine.groups().filter(|c| c.len() > 1) {
//!     println!("{} files of {} bytes:", class.len(), class.size());
//!     class.visit(|path| println!("  {}", path.display()));
//! }
//! println!("{} digest operations", summary.digest_ops);
//! ```

pub mod digest;
pub mod filter;
pub mod iter;
pub mod reader;
pub mod trie;
pub mod walker;

use std::path::{Path, PathBuf};

use regex::Regex;
use serde::Serialize;

pub use digest::{BlockHasher, BlockKey, HashAlgo};
pub use filter::CandidateFilter;
pub use iter::{Accessor, Groups};
pub use trie::{BlockTrie, InsertError, Node};

/// Engine configuration, immutable after construction.
#[derive(Debug)]
pub struct InitParams {
    /// Digest algorithm labelling trie edges.
    pub algo: HashAlgo,
    /// Block width in bytes. Must be positive.
    pub block_size: u64,
    /// Files smaller than this are not scanned.
    pub file_min_size: u64,
    /// Roots to scan, in order.
    pub paths_scan: Vec<PathBuf>,
    /// Paths excluded by root-relative subpath match.
    pub paths_exclude: Vec<PathBuf>,
    /// Filename patterns; empty accepts every filename.
    pub rxpatterns: Vec<Regex>,
}

impl Default for InitParams {
    fn default() -> Self {
        Self {
            algo: HashAlgo::Md5,
            block_size: 1024,
            file_min_size: 1,
            paths_scan: Vec::new(),
            paths_exclude: Vec::new(),
            rxpatterns: Vec::new(),
        }
    }
}

/// Rejected engine configuration.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// The block size was zero or does not fit in memory.
    #[error("block size must be a positive number of bytes that fits in memory")]
    InvalidBlockSize,
}

/// Counters for one completed run.
#[derive(Debug, Default, Clone, Copy, Serialize)]
pub struct RunSummary {
    /// Files admitted by the filter and placed in the trie.
    pub files_accepted: u64,
    /// Paths skipped on I/O errors or wrong file kinds.
    pub paths_skipped: u64,
    /// Digest operations performed.
    pub digest_ops: u64,
}

/// Duplicate search engine over a block-hash trie.
#[derive(Debug)]
pub struct SearchEngine {
    paths_scan: Vec<PathBuf>,
    filter: CandidateFilter,
    hasher: BlockHasher,
    block: Vec<u8>,
    trie: BlockTrie,
}

impl SearchEngine {
    /// Build an engine from validated parameters.
    pub fn new(params: InitParams) -> Result<Self, ConfigError> {
        if params.block_size == 0 {
            return Err(ConfigError::InvalidBlockSize);
        }
        let block_len =
            usize::try_from(params.block_size).map_err(|_| ConfigError::InvalidBlockSize)?;

        Ok(Self {
            paths_scan: params.paths_scan,
            filter: CandidateFilter::new(
                params.file_min_size,
                params.rxpatterns,
                params.paths_exclude,
            ),
            hasher: BlockHasher::new(params.algo),
            block: vec![0; block_len],
            trie: BlockTrie::new(),
        })
    }

    /// Clear the trie and rebuild it from the scan roots.
    ///
    /// `recursive` selects whole-tree or immediate-entries enumeration of
    /// directory roots. Problems with individual paths are warned and
    /// counted in the summary; they never fail the run.
    pub fn run(&mut self, recursive: bool) -> RunSummary {
        self.trie.clear();
        self.hasher.reset_operations();
        let mut summary = RunSummary::default();

        for root in self.paths_scan.clone() {
            self.scan_root(&root, recursive, &mut summary);
        }

        summary.digest_ops = self.hasher.operations();
        log::debug!(
            "scan complete: {} files accepted, {} paths skipped, {} digest ops",
            summary.files_accepted,
            summary.paths_skipped,
            summary.digest_ops
        );
        summary
    }

    /// Iterate the equivalence classes of the last run.
    #[must_use]
    pub fn groups(&self) -> Groups<'_> {
        Groups::new(&self.trie)
    }

    /// Digest operations performed by the last (or current) run.
    #[must_use]
    pub fn digest_count(&self) -> u64 {
        self.hasher.operations()
    }

    fn scan_root(&mut self, root: &Path, recursive: bool, summary: &mut RunSummary) {
        let metadata = match std::fs::metadata(root) {
            Ok(m) => m,
            Err(e) => {
                log::warn!("skipping {}: {}", root.display(), e);
                summary.paths_skipped += 1;
                return;
            }
        };

        // A root named directly as a file bypasses the exclude check.
        if metadata.is_file() {
            self.filter_and_insert(root, None, summary);
            return;
        }

        if !metadata.is_dir() {
            log::warn!(
                "skipping {}: not a regular file or directory",
                root.display()
            );
            summary.paths_skipped += 1;
            return;
        }

        for entry in walker::entries(root, recursive) {
            match entry {
                Ok(path) => self.filter_and_insert(&path, Some(root), summary),
                Err(e) => {
                    log::warn!("{e}");
                    summary.paths_skipped += 1;
                }
            }
        }
    }

    fn filter_and_insert(&mut self, path: &Path, root: Option<&Path>, summary: &mut RunSummary) {
        let admission = match root {
            Some(root) => self.filter.admit(path, root),
            None => self.filter.admit_root_file(path),
        };

        let size = match admission {
            Ok(Some(size)) => size,
            Ok(None) => return,
            Err(e) => {
                log::warn!("cannot stat {}: {}", path.display(), e);
                summary.paths_skipped += 1;
                return;
            }
        };

        match self
            .trie
            .insert(path, size, &mut self.hasher, &mut self.block)
        {
            Ok(()) => summary.files_accepted += 1,
            Err(e) => {
                log::warn!("{e}");
                summary.paths_skipped += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn engine_for(dir: &TempDir) -> SearchEngine {
        SearchEngine::new(InitParams {
            paths_scan: vec![dir.path().to_path_buf()],
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_rejects_zero_block_size() {
        let err = SearchEngine::new(InitParams {
            block_size: 0,
            ..Default::default()
        })
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBlockSize));
    }

    #[test]
    fn test_scan_groups_duplicates() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.txt"), b"same content").unwrap();
        fs::write(dir.path().join("b.txt"), b"same content").unwrap();
        fs::write(dir.path().join("c.txt"), b"other content!").unwrap();

        let mut engine = engine_for(&dir);
        let summary = engine.run(false);

        assert_eq!(summary.files_accepted, 3);
        assert_eq!(summary.paths_skipped, 0);

        let duplicates: Vec<usize> =
            engine.groups().filter(|c| c.len() > 1).map(|c| c.len()).collect();
        assert_eq!(duplicates, vec![2]);
    }

    #[test]
    fn test_flat_scan_ignores_subdirectories() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.txt"), b"same").unwrap();
        let sub = dir.path().join("sub");
        fs::create_dir(&sub).unwrap();
        fs::write(sub.join("b.txt"), b"same").unwrap();

        let mut engine = engine_for(&dir);
        engine.run(false);
        assert_eq!(engine.groups().count(), 1);

        let summary = engine.run(true);
        assert_eq!(summary.files_accepted, 2);
        assert_eq!(engine.groups().next().unwrap().len(), 2);
    }

    #[test]
    fn test_rerun_clears_previous_state() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.txt"), b"data").unwrap();

        let mut engine = engine_for(&dir);
        engine.run(false);
        engine.run(false);

        // One class, one member: nothing accumulated across runs.
        let classes: Vec<usize> = engine.groups().map(|c| c.len()).collect();
        assert_eq!(classes, vec![1]);
    }

    #[test]
    fn test_missing_root_is_counted_not_fatal() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.txt"), b"data").unwrap();

        let mut engine = SearchEngine::new(InitParams {
            paths_scan: vec![dir.path().join("missing"), dir.path().to_path_buf()],
            ..Default::default()
        })
        .unwrap();
        let summary = engine.run(false);

        assert_eq!(summary.paths_skipped, 1);
        assert_eq!(summary.files_accepted, 1);
    }

    #[test]
    fn test_file_named_as_root_is_scanned() {
        let dir = TempDir::new().unwrap();
        let direct = dir.path().join("direct.txt");
        fs::write(&direct, b"content").unwrap();

        let mut engine = SearchEngine::new(InitParams {
            paths_scan: vec![direct],
            ..Default::default()
        })
        .unwrap();
        let summary = engine.run(false);
        assert_eq!(summary.files_accepted, 1);
    }

    #[test]
    fn test_exclude_prunes_matching_paths() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("x.txt"), b"ten bytes!").unwrap();
        let sub = dir.path().join("sub");
        fs::create_dir(&sub).unwrap();
        fs::write(sub.join("x.txt"), b"ten bytes!").unwrap();

        let mut engine = SearchEngine::new(InitParams {
            paths_scan: vec![dir.path().to_path_buf()],
            paths_exclude: vec![PathBuf::from("sub")],
            ..Default::default()
        })
        .unwrap();
        let summary = engine.run(true);

        assert_eq!(summary.files_accepted, 1);
        let classes: Vec<usize> = engine.groups().map(|c| c.len()).collect();
        assert_eq!(classes, vec![1]);
    }

    #[test]
    fn test_unique_sizes_cost_zero_digests() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a"), b"1").unwrap();
        fs::write(dir.path().join("b"), b"22").unwrap();
        fs::write(dir.path().join("c"), b"333").unwrap();

        let mut engine = engine_for(&dir);
        let summary = engine.run(false);

        assert_eq!(summary.files_accepted, 3);
        assert_eq!(summary.digest_ops, 0);
        assert_eq!(engine.digest_count(), 0);
    }
}
