//! Directory enumeration for the scan driver.
//!
//! Wraps [`jwalk`] pinned to serial traversal with sorted entries, so the
//! discovery order (and therefore the first member of every equivalence
//! class) is deterministic. The flat variant visits only the immediate
//! entries of the root; the recursive variant the whole tree. Directories
//! themselves are never yielded; the filter decides everything else.

use std::path::{Path, PathBuf};

use jwalk::{Parallelism, WalkDir};

/// Enumeration failure below a scan root.
#[derive(thiserror::Error, Debug)]
#[error("cannot enumerate {path}: {message}")]
pub struct WalkError {
    /// Path the walker was processing, or the root when unknown.
    pub path: PathBuf,
    /// Walker-reported failure.
    pub message: String,
}

/// Yield the non-directory entries under `root`.
pub fn entries(
    root: &Path,
    recursive: bool,
) -> impl Iterator<Item = Result<PathBuf, WalkError>> {
    let root = root.to_path_buf();
    let mut walk = WalkDir::new(&root)
        .parallelism(Parallelism::Serial)
        .sort(true)
        .skip_hidden(false)
        .follow_links(false);
    if !recursive {
        walk = walk.max_depth(1);
    }

    walk.into_iter().filter_map(move |entry| match entry {
        Ok(entry) => {
            // The root itself and every directory are structure, not
            // candidates.
            if entry.file_type().is_dir() {
                return None;
            }
            Some(Ok(entry.path()))
        }
        Err(e) => {
            let path = e
                .path()
                .map_or_else(|| root.clone(), Path::to_path_buf);
            Some(Err(WalkError {
                path,
                message: e.to_string(),
            }))
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn create_tree() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("b.txt"), b"b").unwrap();
        fs::write(dir.path().join("a.txt"), b"a").unwrap();
        let sub = dir.path().join("sub");
        fs::create_dir(&sub).unwrap();
        fs::write(sub.join("c.txt"), b"c").unwrap();
        dir
    }

    fn collect_names(root: &Path, recursive: bool) -> Vec<String> {
        entries(root, recursive)
            .map(|r| {
                r.unwrap()
                    .file_name()
                    .unwrap()
                    .to_string_lossy()
                    .into_owned()
            })
            .collect()
    }

    #[test]
    fn test_flat_walk_stays_at_the_top() {
        let dir = create_tree();
        assert_eq!(collect_names(dir.path(), false), vec!["a.txt", "b.txt"]);
    }

    #[test]
    fn test_recursive_walk_descends() {
        let dir = create_tree();
        assert_eq!(
            collect_names(dir.path(), true),
            vec!["a.txt", "b.txt", "c.txt"]
        );
    }

    #[test]
    fn test_hidden_files_are_yielded() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(".hidden"), b"x").unwrap();
        assert_eq!(collect_names(dir.path(), false), vec![".hidden"]);
    }

    #[test]
    fn test_symlinks_are_yielded_not_followed() {
        #[cfg(unix)]
        {
            let dir = create_tree();
            std::os::unix::fs::symlink(dir.path().join("sub"), dir.path().join("link")).unwrap();

            let names = collect_names(dir.path(), true);
            // The link itself shows up (the filter rejects or resolves it);
            // its target directory is not traversed twice.
            assert_eq!(names, vec!["a.txt", "b.txt", "link", "c.txt"]);
        }
    }

    #[test]
    fn test_order_is_deterministic() {
        let dir = create_tree();
        assert_eq!(
            collect_names(dir.path(), true),
            collect_names(dir.path(), true)
        );
    }
}
