// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Comparison of one engine result file against one reference result file

use serde::Serialize;
use tracing::debug;

use crate::comparator::{RowMatch, RowMismatch, Tolerance, rows_match, sort_rows};
use crate::error::CompareResult;
use crate::normalize::{FileLayout, RowCountMismatch, SourceFormat, normalize_line, split_lines};
use crate::row::Row;

/// Outcome of comparing two result sets
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum Verdict {
    /// Every row pair matched
    Pass { rows: usize },
    /// The files hold a different number of rows
    RowCountMismatch(RowCountMismatch),
    /// The first row pair that did not match after sorting
    RowMismatch { rows: usize, mismatch: RowMismatch },
}

impl Verdict {
    pub fn is_pass(&self) -> bool {
        matches!(self, Verdict::Pass { .. })
    }

    /// Number of data rows, once the row counts agree
    pub fn rows(&self) -> Option<usize> {
        match self {
            Verdict::Pass { rows } | Verdict::RowMismatch { rows, .. } => Some(*rows),
            Verdict::RowCountMismatch(_) => None,
        }
    }
}

/// Normalize every data line of a file
pub fn normalize_rows(lines: &[&str], format: SourceFormat) -> Vec<Row> {
    lines
        .iter()
        .map(|line| Row::parse(normalize_line(line, format)))
        .collect()
}

/// Compare the full contents of an engine file and a reference file
///
/// Row order is ignored: both sets are sorted before being paired up.
/// Comparison stops at the first row pair that differs.
///
/// # Errors
///
/// Returns [`CompareError::MalformedNumber`](crate::CompareError::MalformedNumber)
/// if a decimal field cannot be parsed.
pub fn compare_texts(
    engine_text: &str,
    reference_text: &str,
    layout: &FileLayout,
    tolerance: Tolerance,
) -> CompareResult<Verdict> {
    let engine_lines = split_lines(engine_text);
    let reference_lines = split_lines(reference_text);

    if let Err(mismatch) = layout.reconcile(engine_lines.len(), reference_lines.len()) {
        debug!(
            engine_lines = mismatch.engine_lines,
            reference_lines = mismatch.reference_lines,
            "row count mismatch"
        );
        return Ok(Verdict::RowCountMismatch(mismatch));
    }

    let mut engine_rows = normalize_rows(layout.engine_rows(&engine_lines), SourceFormat::Engine);
    let mut reference_rows = normalize_rows(
        layout.reference_rows(&reference_lines),
        SourceFormat::Reference,
    );

    sort_rows(&mut engine_rows)?;
    sort_rows(&mut reference_rows)?;

    for (engine, reference) in engine_rows.iter().zip(&reference_rows) {
        if let RowMatch::Mismatch(mismatch) = rows_match(engine, reference, tolerance)? {
            debug!(field = mismatch.field, "row mismatch");
            return Ok(Verdict::RowMismatch {
                rows: reference_rows.len(),
                mismatch,
            });
        }
    }

    Ok(Verdict::Pass {
        rows: reference_rows.len(),
    })
}
