//! Forward traversal over equivalence classes.
//!
//! [`Groups`] walks the trie yielding one [`Accessor`] per leaf: size
//! buckets ascending, then depth-first through each bucket in ascending
//! digest order. The iterator keeps an explicit stack of child-map cursors;
//! accessors borrow the trie independently of the iterator, so one may be
//! held across further iteration, and the borrow checker retires all of
//! them before the next mutating `run()`.

use std::collections::btree_map;
use std::path::{Path, PathBuf};

use super::digest::BlockKey;
use super::trie::{BlockTrie, Node};

/// Borrowed view of one equivalence class.
#[derive(Debug, Clone, Copy)]
pub struct Accessor<'a> {
    size: u64,
    node: &'a Node,
}

impl<'a> Accessor<'a> {
    /// Size in bytes shared by every member of the class.
    #[must_use]
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Number of files in the class.
    #[must_use]
    pub fn len(&self) -> usize {
        self.node.files().len()
    }

    /// A leaf always holds at least one file.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.node.files().is_empty()
    }

    /// Members in discovery order.
    #[must_use]
    pub fn paths(&self) -> &'a [PathBuf] {
        self.node.files()
    }

    /// Apply `visitor` to every member in discovery order.
    pub fn visit<F>(&self, mut visitor: F)
    where
        F: FnMut(&Path),
    {
        for path in self.node.files() {
            visitor(path);
        }
    }
}

/// Iterator over all equivalence classes in the trie.
#[derive(Debug)]
pub struct Groups<'a> {
    buckets: btree_map::Iter<'a, u64, Node>,
    size: u64,
    stack: Vec<btree_map::Iter<'a, BlockKey, Node>>,
}

impl<'a> Groups<'a> {
    pub(super) fn new(trie: &'a BlockTrie) -> Self {
        Self {
            buckets: trie.buckets().iter(),
            size: 0,
            stack: Vec::new(),
        }
    }
}

impl<'a> Iterator for Groups<'a> {
    type Item = Accessor<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            // Drain the current bucket depth-first, left to right.
            while let Some(cursor) = self.stack.last_mut() {
                match cursor.next() {
                    Some((_, child)) => {
                        if child.is_leaf() {
                            return Some(Accessor {
                                size: self.size,
                                node: child,
                            });
                        }
                        self.stack.push(child.children().iter());
                    }
                    None => {
                        self.stack.pop();
                    }
                }
            }

            // Advance to the next size bucket.
            let (&size, node) = self.buckets.next()?;
            self.size = size;
            if node.is_leaf() {
                return Some(Accessor { size, node });
            }
            self.stack.push(node.children().iter());
        }
    }
}
