// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # AIMDB Check - Result Comparison
//!
//! This crate decides whether the result set produced by the engine under
//! test matches the reference result set produced by PostgreSQL.
//!
//! ## Pipeline
//!
//! 1. **Reconcile** the raw line counts of both files ([`FileLayout`])
//! 2. **Normalize** every data line into a canonical row ([`normalize_line`])
//! 3. **Sort** both sets under the same key ([`sort_rows`])
//! 4. **Compare** rows pairwise with a relative tolerance ([`rows_match`])
//!
//! ## Usage
//!
//! ```rust
//! use aimdb_check_compare::{FileLayout, Tolerance, Verdict, compare_texts};
//!
//! let engine = "1\t2.0\n3\t4.0\n\n";
//! let reference = " a | b\n---+---\n 3 | 4.0\n 1 | 2.0\n(2 rows)\n\n";
//!
//! let verdict = compare_texts(engine, reference, &FileLayout::default(), Tolerance::default())?;
//! assert_eq!(verdict, Verdict::Pass { rows: 2 });
//! # Ok::<(), aimdb_check_compare::CompareError>(())
//! ```

pub mod comparator;
pub mod error;
pub mod normalize;
pub mod result_set;
pub mod row;

pub use comparator::{RowMatch, RowMismatch, Tolerance, compare_rows, rows_match, sort_rows};
pub use error::{CompareError, CompareResult};
pub use normalize::{
    FIELD_SEPARATOR, FileLayout, RowCountMismatch, SourceFormat, normalize_line, split_lines,
};
pub use result_set::{Verdict, compare_texts, normalize_rows};
pub use row::{Row, is_decimal};
