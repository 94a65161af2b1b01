// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Row normalization
//!
//! Both result formats are reduced to the same canonical row text: fields
//! joined by [`FIELD_SEPARATOR`] with every space removed.
//!
//! ## Formats
//!
//! - **Engine** (`TQn.tab`): tab-separated fields, one row per line, followed
//!   by a single blank sentinel line.
//! - **Reference** (`TQn.tbl`): `psql` aligned output. Fields are padded with
//!   spaces and already separated by `|`. Two header lines (column names and
//!   the dashed rule) precede the rows; the `(N rows)` footer and a blank line
//!   follow them.
//!
//! The decorative line counts live in [`FileLayout`] so that a change in
//! either tool's output framing never touches the comparator.

use serde::{Deserialize, Serialize};

/// Separator used between fields of a normalized row
pub const FIELD_SEPARATOR: char = '|';

/// Which tool produced a line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceFormat {
    /// Engine under test, tab-separated
    Engine,
    /// Reference database, space padded
    Reference,
}

/// Decorative line counts of the two result file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileLayout {
    /// Lines before the first reference row
    pub reference_header_lines: usize,
    /// Lines after the last reference row
    pub reference_footer_lines: usize,
    /// Lines after the last engine row
    pub engine_trailer_lines: usize,
}

impl Default for FileLayout {
    fn default() -> Self {
        Self {
            reference_header_lines: 2,
            reference_footer_lines: 2,
            engine_trailer_lines: 1,
        }
    }
}

/// The two files disagree on the number of rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RowCountMismatch {
    pub engine_lines: usize,
    pub reference_lines: usize,
    pub engine_rows: usize,
    pub reference_rows: usize,
}

impl FileLayout {
    /// Number of lines the reference file carries beyond the engine file
    /// when both hold the same rows.
    ///
    /// Returns `None` if the engine format has more framing than the
    /// reference format.
    pub fn line_offset(&self) -> Option<usize> {
        (self.reference_header_lines + self.reference_footer_lines)
            .checked_sub(self.engine_trailer_lines)
    }

    /// Check that the raw line counts describe the same number of rows
    pub fn reconcile(
        &self,
        engine_lines: usize,
        reference_lines: usize,
    ) -> Result<(), RowCountMismatch> {
        let engine_side = engine_lines + self.reference_header_lines + self.reference_footer_lines;
        let reference_side = reference_lines + self.engine_trailer_lines;

        if engine_side == reference_side {
            Ok(())
        } else {
            Err(RowCountMismatch {
                engine_lines,
                reference_lines,
                engine_rows: engine_lines.saturating_sub(self.engine_trailer_lines),
                reference_rows: reference_lines
                    .saturating_sub(self.reference_header_lines + self.reference_footer_lines),
            })
        }
    }

    /// Data lines of an engine file
    pub fn engine_rows<'a, 'b>(&self, lines: &'a [&'b str]) -> &'a [&'b str] {
        &lines[..lines.len().saturating_sub(self.engine_trailer_lines)]
    }

    /// Data lines of a reference file
    pub fn reference_rows<'a, 'b>(&self, lines: &'a [&'b str]) -> &'a [&'b str] {
        let end = lines.len().saturating_sub(self.reference_footer_lines);
        let start = self.reference_header_lines.min(end);
        &lines[start..end]
    }
}

/// Split file contents into lines, keeping each terminator.
///
/// A final line without a terminator still counts as a line.
pub fn split_lines(text: &str) -> Vec<&str> {
    text.split_inclusive('\n').collect()
}

/// Reduce one raw line to canonical row text
pub fn normalize_line(line: &str, format: SourceFormat) -> String {
    let body = strip_terminator(line);

    match format {
        SourceFormat::Engine => body
            .chars()
            .filter(|c| *c != ' ')
            .map(|c| if c == '\t' { FIELD_SEPARATOR } else { c })
            .collect(),
        SourceFormat::Reference => body.chars().filter(|c| *c != ' ').collect(),
    }
}

fn strip_terminator(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}
