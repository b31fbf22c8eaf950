//! Human-readable report rendering.

use std::io::{self, Write};

use super::Report;

/// Write the duplicate groups and a closing summary line.
///
/// Groups come out smallest size first, members in discovery order,
/// one path per line, matching the engine's deterministic traversal.
pub fn write_report<W: Write>(out: &mut W, report: &Report) -> io::Result<()> {
    for group in &report.groups {
        writeln!(
            out,
            "{} files, {} bytes each:",
            group.paths.len(),
            group.size
        )?;
        for path in &group.paths {
            writeln!(out, "  {}", path.display())?;
        }
        writeln!(out)?;
    }

    if report.groups.is_empty() {
        writeln!(out, "No duplicates found.")?;
    } else {
        writeln!(
            out,
            "{} duplicate group(s), {} bytes reclaimable.",
            report.groups.len(),
            report.reclaimable()
        )?;
    }
    writeln!(
        out,
        "{} file(s) scanned, {} path(s) skipped, {} block digest(s) computed.",
        report.summary.files_accepted,
        report.summary.paths_skipped,
        report.summary.digest_ops
    )?;
    Ok(())
}
