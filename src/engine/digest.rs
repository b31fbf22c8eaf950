//! Block digest computation for trie edge labels.
//!
//! # Overview
//!
//! Every edge in the block-hash trie is labelled with the digest of one
//! fixed-width file block. This module provides [`BlockHasher`], a reusable
//! streaming hash context, and [`BlockKey`], the Base64-encoded digest used
//! as the child-map key.
//!
//! The algorithm is fixed at construction time and never changes for the
//! lifetime of an engine. MD5 is offered alongside SHA-256 because collision
//! resistance is not a security property here: a forged collision merely
//! produces a false "identical" classification, which this tool does not
//! defend against. Users scanning untrusted input should pick SHA-256.

use std::fmt;

use base64::engine::general_purpose::STANDARD_NO_PAD;
use base64::Engine as _;
use digest::Digest;
use md5::Md5;
use sha2::Sha256;

/// Hash algorithm used to label trie edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HashAlgo {
    /// MD5: cheap, fine for non-adversarial input.
    #[default]
    Md5,
    /// SHA-256: slower, collision-resistant.
    Sha256,
}

impl fmt::Display for HashAlgo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HashAlgo::Md5 => f.write_str("md5"),
            HashAlgo::Sha256 => f.write_str("sha256"),
        }
    }
}

/// Digest of one zero-padded file block, Base64-encoded without padding.
///
/// Two keys are equal iff the underlying digest bytes are equal; the `Ord`
/// impl is lexicographic over the encoding and exists to give the child map
/// a deterministic layout.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BlockKey(String);

impl BlockKey {
    /// The encoded form, suitable for display or map keying.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlockKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Reusable hash context producing [`BlockKey`]s.
///
/// One instance is owned by the engine and shared across all files and
/// levels of a run; each call resets the underlying context. The instance
/// also counts digest operations, which is how the engine observes that the
/// lazy-hashing guarantee holds (files with unique sizes cost zero digests).
#[derive(Debug)]
pub struct BlockHasher {
    algo: HashAlgo,
    state: State,
    ops: u64,
}

#[derive(Debug)]
enum State {
    Md5(Md5),
    Sha256(Sha256),
}

impl BlockHasher {
    /// Create a hasher for the given algorithm.
    #[must_use]
    pub fn new(algo: HashAlgo) -> Self {
        let state = match algo {
            HashAlgo::Md5 => State::Md5(Md5::new()),
            HashAlgo::Sha256 => State::Sha256(Sha256::new()),
        };
        Self {
            algo,
            state,
            ops: 0,
        }
    }

    /// The configured algorithm.
    #[must_use]
    pub fn algo(&self) -> HashAlgo {
        self.algo
    }

    /// Digest one block and return its trie key.
    ///
    /// The block must already be padded to the engine's block size; this
    /// function hashes exactly the bytes it is given.
    pub fn key_for(&mut self, block: &[u8]) -> BlockKey {
        self.ops += 1;
        let encoded = match &mut self.state {
            State::Md5(ctx) => {
                ctx.update(block);
                STANDARD_NO_PAD.encode(ctx.finalize_reset())
            }
            State::Sha256(ctx) => {
                ctx.update(block);
                STANDARD_NO_PAD.encode(ctx.finalize_reset())
            }
        };
        BlockKey(encoded)
    }

    /// Number of digest operations performed since the last reset.
    #[must_use]
    pub fn operations(&self) -> u64 {
        self.ops
    }

    /// Reset the operation counter (done at the start of each run).
    pub fn reset_operations(&mut self) {
        self.ops = 0;
    }
}
