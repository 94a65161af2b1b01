// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Row ordering and tolerant equality
//!
//! Result sets are unordered, so both sides are sorted under the same key and
//! then compared position by position.
//!
//! ## Ordering
//!
//! Fields are compared left to right. A decimal field compares as `f64`, any
//! other field compares as text. When one side of a column is decimal and the
//! other is not, the decimal sorts first; this keeps the ordering total.
//!
//! ## Equality
//!
//! The engine field decides the kind of comparison. Decimal fields match when
//! `|engine - reference| / |reference|` does not exceed the tolerance. The
//! denominator is always the reference value, so `rows_match(a, b)` and
//! `rows_match(b, a)` can disagree.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::error::{CompareError, CompareResult};
use crate::row::{Row, is_decimal};

/// Maximum accepted relative error for decimal fields
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Tolerance(f64);

impl Tolerance {
    pub const DEFAULT: Tolerance = Tolerance(0.001);

    pub fn new(value: f64) -> CompareResult<Self> {
        if value.is_finite() && value >= 0.0 {
            Ok(Self(value))
        } else {
            Err(CompareError::InvalidTolerance(value))
        }
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<f64> for Tolerance {
    type Error = CompareError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Tolerance> for f64 {
    fn from(tolerance: Tolerance) -> Self {
        tolerance.0
    }
}

/// First difference between an engine row and a reference row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowMismatch {
    /// Index of the first differing field
    pub field: usize,
    /// Full engine row
    pub engine: String,
    /// Full reference row
    pub reference: String,
}

/// Outcome of comparing one row pair
#[derive(Debug, Clone, PartialEq)]
pub enum RowMatch {
    Equal,
    Mismatch(RowMismatch),
}

impl RowMatch {
    pub fn is_equal(&self) -> bool {
        matches!(self, RowMatch::Equal)
    }
}

#[derive(Debug, Clone, Copy)]
enum KeyField<'a> {
    Decimal(f64),
    Text(&'a str),
}

impl KeyField<'_> {
    fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (KeyField::Decimal(a), KeyField::Decimal(b)) => a.total_cmp(b),
            (KeyField::Text(a), KeyField::Text(b)) => a.cmp(b),
            (KeyField::Decimal(_), KeyField::Text(_)) => Ordering::Less,
            (KeyField::Text(_), KeyField::Decimal(_)) => Ordering::Greater,
        }
    }
}

fn sort_key(row: &Row) -> CompareResult<Vec<KeyField<'_>>> {
    row.fields()
        .map(|field| {
            if is_decimal(field) {
                row.decimal(field).map(KeyField::Decimal)
            } else {
                Ok(KeyField::Text(field))
            }
        })
        .collect()
}

fn cmp_keys(a: &[KeyField<'_>], b: &[KeyField<'_>]) -> Ordering {
    a.iter()
        .zip(b)
        .map(|(x, y)| x.compare(y))
        .find(|ordering| ordering.is_ne())
        .unwrap_or_else(|| a.len().cmp(&b.len()))
}

/// Order two rows under the sort key
///
/// A decimal field always sorts before a non-decimal one, even when the
/// non-decimal text is an integer. Columns that mix the two kinds can
/// therefore pair rows differently on each side: reference rows `10.5` and
/// `2` sort as `10.5, 2`, while engine rows `2.0` and `10.5` sort as
/// `2.0, 10.5`, and the comparison reports a mismatch on the first pair.
pub fn compare_rows(a: &Row, b: &Row) -> CompareResult<Ordering> {
    Ok(cmp_keys(&sort_key(a)?, &sort_key(b)?))
}

/// Sort a result set so that it can be paired with another sorted set
pub fn sort_rows(rows: &mut Vec<Row>) -> CompareResult<()> {
    let order = {
        let keys = rows.iter().map(sort_key).collect::<CompareResult<Vec<_>>>()?;
        let mut order: Vec<usize> = (0..rows.len()).collect();
        order.sort_by(|&a, &b| cmp_keys(&keys[a], &keys[b]));
        order
    };

    let mut slots: Vec<Option<Row>> = rows.drain(..).map(Some).collect();
    rows.extend(order.into_iter().filter_map(|index| slots[index].take()));
    Ok(())
}

/// Compare an engine row against a reference row
///
/// Rows with a different number of fields never match; the mismatch points at
/// the first field missing from the shorter row.
///
/// # Errors
///
/// Returns [`CompareError::MalformedNumber`] if the engine field is decimal and
/// either side does not parse as a number.
pub fn rows_match(engine: &Row, reference: &Row, tolerance: Tolerance) -> CompareResult<RowMatch> {
    let mismatch = |field: usize| {
        RowMatch::Mismatch(RowMismatch {
            field,
            engine: engine.as_str().to_string(),
            reference: reference.as_str().to_string(),
        })
    };

    let mut engine_fields = engine.fields();
    let mut reference_fields = reference.fields();
    let mut index = 0;

    loop {
        let (a, b) = match (engine_fields.next(), reference_fields.next()) {
            (Some(a), Some(b)) => (a, b),
            (None, None) => return Ok(RowMatch::Equal),
            _ => return Ok(mismatch(index)),
        };

        let equal = if is_decimal(a) {
            let expected = reference.decimal(b)?;
            let actual = engine.decimal(a)?;
            // 0/0 is NaN and must count as a match
            let exceeds = relative_error(actual, expected) > tolerance.value();
            !exceeds
        } else {
            a == b
        };

        if !equal {
            return Ok(mismatch(index));
        }
        index += 1;
    }
}

/// `|actual - expected| / |expected|`
fn relative_error(actual: f64, expected: f64) -> f64 {
    (actual - expected).abs() / expected.abs()
}
