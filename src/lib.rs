//! dupetrie - Duplicate File Finder
//!
//! A cross-platform Rust CLI tool for locating byte-identical duplicate
//! files. Candidates are partitioned by size and then discriminated block
//! by block in a hash trie, so a file is read only as far as needed to
//! tell it apart from others of the same size.

pub mod cli;
pub mod engine;
pub mod error;
pub mod logging;
pub mod output;
