// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Error types for result comparison
//!
//! Only conditions that make a comparison impossible are errors. A result set
//! that simply differs from the reference is reported through
//! [`Verdict`](crate::Verdict), not through [`CompareError`].

use thiserror::Error;

/// Result type alias for comparison operations
pub type CompareResult<T> = Result<T, CompareError>;

/// Errors that abort a comparison
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CompareError {
    /// A field classified as decimal (it contains a `.`) is not a number
    #[error("Malformed numeric field '{field}' in row '{row}'")]
    MalformedNumber { field: String, row: String },

    /// Tolerance must be a finite, non-negative relative error
    #[error("Invalid tolerance: {0}")]
    InvalidTolerance(f64),
}
