//! Positioned block reads over one open file.
//!
//! A file of size `S` with block size `B` has `ceil(S / B)` blocks (one for
//! an empty file); the last one is zero-padded on the right to exactly `B`
//! bytes so every block hashes at the same width. The final block index is
//! derived from the size the file had when it was admitted, which keeps all
//! files in one size bucket at the same depth even if a file is mutated
//! mid-scan.

use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::Path;

/// An open file handle that serves fixed-width, zero-padded blocks.
#[derive(Debug)]
pub struct BlockSource {
    file: File,
    block_size: u64,
    final_level: u64,
    next_level: u64,
}

impl BlockSource {
    /// Open `path` for block reads, treating it as `size` bytes long.
    pub fn open(path: &Path, size: u64, block_size: u64) -> io::Result<Self> {
        debug_assert!(block_size > 0);
        let file = File::open(path)?;
        let final_level = match size {
            0 => 0,
            s => (s - 1) / block_size,
        };
        Ok(Self {
            file,
            block_size,
            final_level,
            next_level: 0,
        })
    }

    /// Read block `level` into `buf`, zero-filling anything past end of
    /// file. Returns `true` when this is the file's final block.
    ///
    /// `buf` must be exactly one block long. Sequential reads skip the seek.
    pub fn read_block(&mut self, level: u64, buf: &mut [u8]) -> io::Result<bool> {
        debug_assert_eq!(buf.len() as u64, self.block_size);

        if level != self.next_level {
            self.file
                .seek(SeekFrom::Start(level.saturating_mul(self.block_size)))?;
        }

        let mut filled = 0;
        while filled < buf.len() {
            match self.file.read(&mut buf[filled..])? {
                0 => break,
                n => filled += n,
            }
        }
        buf[filled..].fill(0);

        self.next_level = level + 1;
        Ok(level >= self.final_level)
    }
}
