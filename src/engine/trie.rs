//! The block-hash trie and its insertion algorithm.
//!
//! # Overview
//!
//! Files are partitioned by size at the top level, then discriminated block
//! by block: each edge below a size bucket is labelled with the digest of
//! one zero-padded block, so the path from a bucket root to a leaf spells
//! out a file's block-digest sequence. A leaf holds every admitted file
//! whose size and block digests agree, which is exactly one equivalence
//! class of byte-identical files.
//!
//! Hashing is lazy in both directions. The first file of a size lands in
//! its bucket without a single digest, and a file whose digest diverges
//! from every incumbent is parked as a leaf right there: its remaining
//! blocks are read only if a later file collides that deep. A scan where
//! every file has a unique size performs zero digest operations, and no
//! file is ever read past the block that distinguishes it.
//!
//! # Node invariant
//!
//! A node either holds files (a leaf, one equivalence class) or children
//! (an internal node), never both. A leaf with two or more files sits at
//! its size's final block depth, where members were confirmed identical
//! through end of file; a parked leaf holds a single file. Either way,
//! hashing one representative (the first entry) is enough to relocate the
//! whole list when the leaf must be pushed a level deeper.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::digest::{BlockHasher, BlockKey};
use super::reader::BlockSource;

/// One trie node: a leaf holding an equivalence class, or an internal node
/// holding digest-keyed children.
#[derive(Debug, Default)]
pub struct Node {
    files: Vec<PathBuf>,
    children: BTreeMap<BlockKey, Node>,
}

impl Node {
    fn singleton(path: &Path) -> Self {
        Self {
            files: vec![path.to_path_buf()],
            children: BTreeMap::new(),
        }
    }

    /// Whether this node holds an equivalence class.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        !self.files.is_empty()
    }

    /// The paths confirmed identical through the digests leading here.
    #[must_use]
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    /// Children keyed by the next block's digest, ascending.
    #[must_use]
    pub fn children(&self) -> &BTreeMap<BlockKey, Node> {
        &self.children
    }
}

/// A file dropped from the scan because a block could not be read.
#[derive(thiserror::Error, Debug)]
pub enum InsertError {
    /// The candidate file itself could not be opened or read.
    #[error("cannot read {path}: {source}")]
    Candidate {
        /// The candidate that was dropped.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Re-reading an incumbent during promotion failed. The incumbent stays
    /// at its pre-promotion level and the candidate is dropped.
    #[error("cannot re-read {incumbent} while placing {candidate}: {source}")]
    Incumbent {
        /// The incumbent whose block could not be re-read.
        incumbent: PathBuf,
        /// The candidate that was dropped as a consequence.
        candidate: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// The trie, keyed at the top by file size.
#[derive(Debug, Default)]
pub struct BlockTrie {
    buckets: BTreeMap<u64, Node>,
}

impl BlockTrie {
    /// Create an empty trie.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop all buckets.
    pub fn clear(&mut self) {
        self.buckets.clear();
    }

    /// Size buckets in ascending numeric order.
    #[must_use]
    pub fn buckets(&self) -> &BTreeMap<u64, Node> {
        &self.buckets
    }

    /// Insert one admitted file of the given size.
    ///
    /// `block` is the engine's scratch buffer and must be exactly one block
    /// long. On error the candidate is dropped and the trie is unchanged
    /// except that incumbents already promoted during this descent remain
    /// at their (still truthful) deeper level.
    pub fn insert(
        &mut self,
        path: &Path,
        size: u64,
        hasher: &mut BlockHasher,
        block: &mut [u8],
    ) -> Result<(), InsertError> {
        let bucket = match self.buckets.entry(size) {
            Entry::Vacant(vacant) => {
                // First file of this size: no hashing until a collision.
                vacant.insert(Node::singleton(path));
                return Ok(());
            }
            Entry::Occupied(occupied) => occupied.into_mut(),
        };

        let block_size = block.len() as u64;
        let mut source =
            BlockSource::open(path, size, block_size).map_err(|source| InsertError::Candidate {
                path: path.to_path_buf(),
                source,
            })?;

        let mut node = bucket;
        let mut level: u64 = 0;
        let (mut key, mut last) = next_key(&mut source, level, hasher, block, path)?;

        loop {
            if node.is_leaf() {
                promote(node, level, size, block_size, hasher, block, path)?;
            }

            if last {
                // The candidate's digest sequence ends here. Any files
                // already under this key reached end of file by the same
                // block, so the child is a leaf or brand new.
                let child = node.children.entry(key).or_default();
                debug_assert!(child.children.is_empty());
                child.files.push(path.to_path_buf());
                return Ok(());
            }

            node = match node.children.entry(key) {
                // No other file shares this digest prefix: park the
                // candidate here. Its remaining blocks are read only if a
                // later file collides this deep.
                Entry::Vacant(vacant) => {
                    vacant.insert(Node::singleton(path));
                    return Ok(());
                }
                Entry::Occupied(occupied) => occupied.into_mut(),
            };

            level += 1;
            (key, last) = next_key(&mut source, level, hasher, block, path)?;
        }
    }
}

/// Digest block `level` of the candidate.
fn next_key(
    source: &mut BlockSource,
    level: u64,
    hasher: &mut BlockHasher,
    block: &mut [u8],
    path: &Path,
) -> Result<(BlockKey, bool), InsertError> {
    let last = source
        .read_block(level, block)
        .map_err(|source| InsertError::Candidate {
            path: path.to_path_buf(),
            source,
        })?;
    Ok((hasher.key_for(block), last))
}

/// Push a leaf's files one level deeper so the candidate can be placed.
///
/// The first file stands in for the whole list: its siblings were confirmed
/// identical through every block up to and including their final one, so
/// they share the digest at `level` too.
fn promote(
    node: &mut Node,
    level: u64,
    size: u64,
    block_size: u64,
    hasher: &mut BlockHasher,
    block: &mut [u8],
    candidate: &Path,
) -> Result<(), InsertError> {
    let representative = node.files[0].clone();

    let mut source = BlockSource::open(&representative, size, block_size)
        .map_err(|source| incumbent_error(&representative, candidate, source))?;
    source
        .read_block(level, block)
        .map_err(|source| incumbent_error(&representative, candidate, source))?;

    let key = hasher.key_for(block);
    let moved = std::mem::take(&mut node.files);
    debug_assert!(node.children.is_empty());
    node.children.insert(
        key,
        Node {
            files: moved,
            children: BTreeMap::new(),
        },
    );
    Ok(())
}

fn incumbent_error(incumbent: &Path, candidate: &Path, source: std::io::Error) -> InsertError {
    InsertError::Incumbent {
        incumbent: incumbent.to_path_buf(),
        candidate: candidate.to_path_buf(),
        source,
    }
}
