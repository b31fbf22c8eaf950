//! Candidate admission checks.
//!
//! A path yielded by enumeration must pass, in order: the exclude check
//! (root-relative contiguous subpath match), the regular-file check, the
//! filename pattern match, and the size floor. Paths named directly as scan
//! roots skip the exclude check since the user asked for them explicitly.
//! Each rejection is logged at trace level with the reason.

use std::path::{Component, Path, PathBuf};

use regex::Regex;

/// Admission filter applied to every candidate path.
#[derive(Debug)]
pub struct CandidateFilter {
    min_size: u64,
    patterns: Vec<Regex>,
    excludes: Vec<PathBuf>,
}

impl CandidateFilter {
    /// Create a filter. An empty `patterns` list accepts every filename;
    /// `excludes` are interpreted relative to each scan root.
    #[must_use]
    pub fn new(min_size: u64, patterns: Vec<Regex>, excludes: Vec<PathBuf>) -> Self {
        Self {
            min_size,
            patterns,
            excludes,
        }
    }

    /// Admission check for a path discovered under `root`.
    ///
    /// Returns the file size on acceptance, `Ok(None)` on a policy
    /// rejection, and the I/O error when the path cannot be examined.
    pub fn admit(&self, path: &Path, root: &Path) -> std::io::Result<Option<u64>> {
        if self.is_excluded(path, root) {
            log::trace!("excluded: {}", path.display());
            return Ok(None);
        }
        self.admit_unrooted(path)
    }

    /// Admission check for a path named directly as a scan root.
    pub fn admit_root_file(&self, path: &Path) -> std::io::Result<Option<u64>> {
        self.admit_unrooted(path)
    }

    fn admit_unrooted(&self, path: &Path) -> std::io::Result<Option<u64>> {
        // Metadata resolves symlinks; a link to a regular file counts.
        let metadata = std::fs::metadata(path)?;

        if !metadata.is_file() {
            log::trace!("not a regular file: {}", path.display());
            return Ok(None);
        }

        if !self.matches_any_pattern(path) {
            log::trace!("no pattern match: {}", path.display());
            return Ok(None);
        }

        let size = metadata.len();
        if size < self.min_size {
            log::trace!("below size floor ({} bytes): {}", size, path.display());
            return Ok(None);
        }

        Ok(Some(size))
    }

    /// True when any exclude appears as a contiguous subpath of the
    /// candidate's root-relative form.
    fn is_excluded(&self, path: &Path, root: &Path) -> bool {
        if self.excludes.is_empty() {
            return false;
        }

        let relative = path.strip_prefix(root).unwrap_or(path);
        let components: Vec<Component<'_>> = relative.components().collect();

        self.excludes.iter().any(|exclude| {
            let needle: Vec<Component<'_>> = exclude.components().collect();
            !needle.is_empty()
                && components
                    .windows(needle.len())
                    .any(|window| window == needle.as_slice())
        })
    }

    fn matches_any_pattern(&self, path: &Path) -> bool {
        if self.patterns.is_empty() {
            return true;
        }

        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();
        self.patterns.iter().any(|re| re.is_match(&filename))
    }
}
