//! Command-line interface definitions for dupetrie.
//!
//! All options are defined with the clap derive API. The engine consumes
//! already-compiled values; this module owns the translation from flag
//! strings to sizes, algorithms, and anchored case-insensitive regexes.
//!
//! # Example
//!
//! ```bash
//! # Flat scan of the current directory
//! dupetrie
//!
//! # Recursive scan of two trees, skipping a build directory
//! dupetrie -r --exclude-path target ~/src ~/backup
//!
//! # Only photos of at least 1 MiB, stronger hash, JSON report
//! dupetrie -r --patterns '.*\.jpe?g,.*\.png' --min-size 1MiB --hash sha256 --output json ~/Pictures
//! ```

use clap::{Parser, ValueEnum};
use regex::{Regex, RegexBuilder};
use std::path::PathBuf;

use crate::engine::HashAlgo;

/// Duplicate file finder built on an incremental block-hash trie.
///
/// Files are compared block by block, so a file is read only as far as
/// needed to distinguish it from others of the same size.
#[derive(Debug, Parser)]
#[command(name = "dupetrie")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Paths to scan (defaults to the current directory)
    #[arg(value_name = "PATH")]
    pub paths: Vec<PathBuf>,

    /// Path to be excluded from scanning, relative to each scan root
    ///
    /// Can be specified multiple times. Matches as a contiguous subpath:
    /// `--exclude-path cache/tmp` skips anything under a `cache/tmp`
    /// directory anywhere below a scan root.
    #[arg(
        short = 'E',
        long = "exclude-path",
        value_name = "PATH",
        help_heading = "Filtering Options"
    )]
    pub exclude_paths: Vec<PathBuf>,

    /// Patterns of files to be scanned (regexes, separated by , ; or :)
    ///
    /// A filename must match one pattern in full, case-insensitively.
    /// Example: --patterns '.*\.iso,.*\.img'
    #[arg(
        short = 'P',
        long = "patterns",
        value_name = "LIST",
        help_heading = "Filtering Options"
    )]
    pub patterns: Option<String>,

    /// Minimum file size to be scanned (e.g. 4096, 64KB, 1MiB)
    #[arg(
        short = 'S',
        long = "min-size",
        value_name = "SIZE",
        default_value = "1",
        value_parser = parse_size,
        help_heading = "Filtering Options"
    )]
    pub min_size: u64,

    /// Block size used for incremental comparison (e.g. 1024, 64KiB)
    #[arg(
        short = 'B',
        long = "block-size",
        value_name = "SIZE",
        default_value = "1024",
        value_parser = parse_size,
        help_heading = "Scanning Options"
    )]
    pub block_size: u64,

    /// Hash algorithm for block digests
    #[arg(
        short = 'H',
        long = "hash",
        value_enum,
        value_name = "ALGO",
        default_value_t = HashArg::Md5,
        help_heading = "Scanning Options"
    )]
    pub hash: HashArg,

    /// Scan directories recursively
    #[arg(short, long, help_heading = "Scanning Options")]
    pub recursive: bool,

    /// Report format
    #[arg(
        short,
        long,
        value_enum,
        value_name = "FORMAT",
        default_value_t = OutputFormat::Text,
        help_heading = "Output Options"
    )]
    pub output: OutputFormat,

    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors and the report
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Hash algorithm flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum HashArg {
    /// MD5: fast, fine for non-adversarial input
    Md5,
    /// SHA-256: slower, collision-resistant
    Sha256,
}

impl From<HashArg> for HashAlgo {
    fn from(arg: HashArg) -> Self {
        match arg {
            HashArg::Md5 => HashAlgo::Md5,
            HashArg::Sha256 => HashAlgo::Sha256,
        }
    }
}

/// Report format flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable group listing
    Text,
    /// Machine-readable JSON report
    Json,
}

/// Parse a size argument with optional binary or decimal suffix.
///
/// # Examples
///
/// ```
/// use dupetrie::cli::parse_size;
///
/// assert_eq!(parse_size("1024"), Ok(1024));
/// assert_eq!(parse_size("4KB"), Ok(4_000));
/// assert_eq!(parse_size("4KiB"), Ok(4_096));
/// assert!(parse_size("four").is_err());
/// ```
pub fn parse_size(s: &str) -> Result<u64, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("size cannot be empty".to_string());
    }

    let (num_str, suffix) = match s.find(|c: char| !c.is_ascii_digit() && c != '.') {
        Some(idx) => (&s[..idx], s[idx..].trim().to_uppercase()),
        None => (s, String::new()),
    };

    let num: f64 = num_str
        .parse()
        .map_err(|_| format!("invalid number: '{num_str}'"))?;

    let multiplier: u64 = match suffix.as_str() {
        "" | "B" => 1,
        "KB" | "K" => 1_000,
        "KIB" => 1_024,
        "MB" | "M" => 1_000_000,
        "MIB" => 1_048_576,
        "GB" | "G" => 1_000_000_000,
        "GIB" => 1_073_741_824,
        _ => return Err(format!("unknown size suffix: '{suffix}'")),
    };

    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    Ok((num * multiplier as f64) as u64)
}

/// Split a `--patterns` argument on its accepted separators.
#[must_use]
pub fn split_patterns(list: &str) -> Vec<String> {
    list.split([',', ';', ':'])
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Compile filename patterns: anchored (the filename must match in full)
/// and case-insensitive.
pub fn compile_patterns(patterns: &[String]) -> Result<Vec<Regex>, regex::Error> {
    patterns
        .iter()
        .map(|p| {
            RegexBuilder::new(&format!("^(?:{p})$"))
                .case_insensitive(true)
                .build()
        })
        .collect()
}
