//! Human-readable scan report.
//!
//! Written to stdout after a scan. Groups are listed with the keeper first.

use std::io::Write;
use std::time::SystemTime;

use bytesize::ByteSize;
use chrono::{DateTime, Local};

use crate::duplicates::{DuplicateGroups, ScanSummary};

/// Timestamp format used for modification times.
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Formatter for the text report.
pub struct Report<'a> {
    /// Duplicate groups to list
    pub groups: &'a DuplicateGroups,
    /// Scan summary for the header
    pub summary: &'a ScanSummary,
}

impl<'a> Report<'a> {
    /// Create a new report formatter.
    #[must_use]
    pub fn new(groups: &'a DuplicateGroups, summary: &'a ScanSummary) -> Self {
        Self { groups, summary }
    }

    /// Write the report.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        if self.groups.is_empty() {
            writeln!(
                writer,
                "No duplicate files found ({} files scanned).",
                self.summary.total_files
            )?;
            return self.write_footer(writer);
        }

        let wasted: u64 = self.groups.values().map(|g| g.wasted_space()).sum();
        let duplicates: usize = self.groups.values().map(|g| g.duplicate_count()).sum();

        writeln!(
            writer,
            "Found {} duplicate group(s) with {} duplicate file(s)",
            self.groups.len(),
            duplicates
        )?;
        writeln!(writer, "Total wasted space: {}", ByteSize(wasted))?;

        for (i, group) in self.groups.values().enumerate() {
            writeln!(writer)?;
            writeln!(
                writer,
                "Group {}: {} files of {} ({} wasted) [{}]",
                i + 1,
                group.len(),
                ByteSize(group.size()),
                ByteSize(group.wasted_space()),
                group.digest()
            )?;
            for (j, file) in group.sorted_by_recency().into_iter().enumerate() {
                let marker = if j == 0 { "[keep]" } else { "      " };
                writeln!(
                    writer,
                    "  {} {}  {}  {}",
                    marker,
                    file.path.display(),
                    ByteSize(file.size),
                    format_time(file.modified)
                )?;
            }
        }

        writeln!(writer)?;
        self.write_footer(writer)
    }

    fn write_footer<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        if !self.summary.scan_errors.is_empty() {
            writeln!(
                writer,
                "{} path(s) skipped due to errors.",
                self.summary.scan_errors.len()
            )?;
        }
        writeln!(
            writer,
            "Scan took {:.2}s",
            self.summary.scan_duration.as_secs_f64()
        )
    }
}

/// Format a modification time in local time.
#[must_use]
pub fn format_time(time: SystemTime) -> String {
    DateTime::<Local>::from(time).format(TIME_FORMAT).to_string()
}
