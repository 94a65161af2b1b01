// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Normalized result rows
//!
//! A row carries no schema. The only type information is syntactic: a field
//! whose text contains a `.` is a decimal, everything else is opaque text.

use std::fmt;

use crate::error::{CompareError, CompareResult};
use crate::normalize::FIELD_SEPARATOR;

/// One normalized result row
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Row {
    text: String,
}

impl Row {
    /// Wrap canonical row text (see [`normalize_line`](crate::normalize_line))
    pub fn parse(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// The canonical text of the row
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Fields in column order
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.text.split(FIELD_SEPARATOR)
    }

    pub fn field_count(&self) -> usize {
        self.fields().count()
    }

    /// Parse a field of this row as `f64`
    pub(crate) fn decimal(&self, field: &str) -> CompareResult<f64> {
        field
            .parse::<f64>()
            .map_err(|_| CompareError::MalformedNumber {
                field: field.to_string(),
                row: self.text.clone(),
            })
    }
}

impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Whether a field is compared numerically
pub fn is_decimal(field: &str) -> bool {
    field.contains('.')
}
