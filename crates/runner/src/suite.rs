// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Suite Runner
//!
//! Checks every configured query in a single linear pass. Each case either
//! passes or fails; the console report mirrors the lab harness output:
//!
//! ```text
//! rows number: 25
//! TQ1 pass!
//! ----------------------------------
//! your rows: 3  standard rows: 4
//! error: number of total rows
//! TQ2 fail!
//! ----------------------------------
//! Pass : 1
//! Total: 22
//! ```
//!
//! `Total` counts every file in the reference directory, which can be more
//! than the number of queries checked.

use std::io::Write;
use std::path::Path;

use aimdb_check_compare::{Verdict, compare_texts};
use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::SuiteConfig;
use crate::process::StepStatus;

/// Separator printed after every case
pub const CASE_BANNER: &str = "----------------------------------";

/// Outcome of one test case
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CaseOutcome {
    /// The engine wrote no result file for this query
    MissingEngineOutput,
    /// Both files were compared
    Compared { verdict: Verdict },
}

/// Result of one test case
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaseResult {
    pub id: u32,
    pub name: String,
    pub outcome: CaseOutcome,
}

impl CaseResult {
    pub fn passed(&self) -> bool {
        matches!(&self.outcome, CaseOutcome::Compared { verdict } if verdict.is_pass())
    }
}

/// Results of a whole suite
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuiteReport {
    pub suite: String,
    pub build: Option<StepStatus>,
    pub run: Option<StepStatus>,
    pub cases: Vec<CaseResult>,
    /// Cases that passed
    pub passed: usize,
    /// Cases checked (the configured query list)
    pub checked: usize,
    /// Files present in the reference directory
    pub reference_total: usize,
}

impl SuiteReport {
    /// Print the final `Pass`/`Total` lines
    pub fn write_summary<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        writeln!(out, "Pass : {}", self.passed)?;
        writeln!(out, "Total: {}", self.reference_total)
    }
}

/// Count every entry of the reference output directory
pub fn count_reference_files(dir: &Path) -> Result<usize> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to list reference directory {}", dir.display()))?;

    let mut count = 0;
    for entry in entries {
        entry.with_context(|| format!("Failed to list reference directory {}", dir.display()))?;
        count += 1;
    }
    Ok(count)
}

/// Compares the engine output of every configured query with the reference
pub struct SuiteRunner<'a> {
    config: &'a SuiteConfig,
}

impl<'a> SuiteRunner<'a> {
    /// `config` must already be resolved
    pub fn new(config: &'a SuiteConfig) -> Self {
        Self { config }
    }

    /// Check one query and print its diagnostics and banner
    ///
    /// # Errors
    ///
    /// A malformed decimal field or an unreadable file aborts the whole run.
    /// A missing engine file is only a failed case.
    pub fn check_case<W: Write>(&self, id: u32, out: &mut W) -> Result<CaseResult> {
        let name = SuiteConfig::case_name(id);
        let engine_path = self.config.engine_output_path(id);
        let reference_path = self.config.reference_output_path(id);

        let outcome = if engine_path.exists() {
            let verdict = self.compare_files(&engine_path, &reference_path)?;
            write_verdict(&verdict, out)?;
            CaseOutcome::Compared { verdict }
        } else {
            debug!(path = %engine_path.display(), "engine output missing");
            CaseOutcome::MissingEngineOutput
        };

        let result = CaseResult { id, name, outcome };
        if result.passed() {
            writeln!(out, "{} pass!", result.name)?;
        } else {
            warn!(case = %result.name, "case failed");
            writeln!(out, "{} fail!", result.name)?;
        }
        writeln!(out, "{}", CASE_BANNER)?;

        Ok(result)
    }

    fn compare_files(&self, engine_path: &Path, reference_path: &Path) -> Result<Verdict> {
        let engine_text = read_result_file(engine_path)?;
        let reference_text = read_result_file(reference_path)?;

        let verdict = compare_texts(
            &engine_text,
            &reference_text,
            &self.config.layout,
            self.config.tolerance,
        )
        .with_context(|| {
            format!(
                "Failed to compare {} with {}",
                engine_path.display(),
                reference_path.display()
            )
        })?;
        Ok(verdict)
    }

    /// Check every configured query
    pub fn run<W: Write>(&self, out: &mut W) -> Result<SuiteReport> {
        let reference_total = count_reference_files(&self.config.reference_output_dir)?;
        info!(
            suite = %self.config.name,
            queries = self.config.query_ids.len(),
            reference_total,
            "Checking results"
        );

        let mut cases = Vec::with_capacity(self.config.query_ids.len());
        for &id in &self.config.query_ids {
            cases.push(self.check_case(id, out)?);
        }

        let passed = cases.iter().filter(|case| case.passed()).count();
        info!(passed, checked = cases.len(), "Suite finished");

        Ok(SuiteReport {
            suite: self.config.name.clone(),
            build: None,
            run: None,
            checked: cases.len(),
            cases,
            passed,
            reference_total,
        })
    }
}

/// Read a result file as text
///
/// Invalid UTF-8 is replaced rather than rejected, so garbage written by the
/// engine fails its own case as a row mismatch instead of aborting the run.
fn read_result_file(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => {
            warn!(path = %path.display(), "result file is not valid UTF-8");
            String::from_utf8_lossy(e.as_bytes()).into_owned()
        }
    })
}

fn write_verdict<W: Write>(verdict: &Verdict, out: &mut W) -> std::io::Result<()> {
    match verdict {
        Verdict::RowCountMismatch(mismatch) => {
            writeln!(
                out,
                "your rows: {}  standard rows: {}",
                mismatch.engine_rows, mismatch.reference_rows
            )?;
            writeln!(out, "error: number of total rows")
        }
        Verdict::Pass { rows } => writeln!(out, "rows number: {}", rows),
        Verdict::RowMismatch { rows, mismatch } => {
            writeln!(out, "rows number: {}", rows)?;
            writeln!(out, "your result: {}", mismatch.engine)?;
            writeln!(out, "standard result: {}", mismatch.reference)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_lines() {
        let report = SuiteReport {
            suite: "small".to_string(),
            build: None,
            run: None,
            cases: vec![],
            passed: 3,
            checked: 8,
            reference_total: 22,
        };
        let mut out = Vec::new();
        report.write_summary(&mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "Pass : 3\nTotal: 22\n");
    }

    #[test]
    fn test_missing_engine_output_is_not_a_pass() {
        let case = CaseResult {
            id: 1,
            name: "TQ1".to_string(),
            outcome: CaseOutcome::MissingEngineOutput,
        };
        assert!(!case.passed());
    }

    #[test]
    fn test_case_result_serialization() {
        let case = CaseResult {
            id: 7,
            name: "TQ7".to_string(),
            outcome: CaseOutcome::Compared {
                verdict: Verdict::Pass { rows: 4 },
            },
        };
        let json = serde_json::to_value(&case).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": 7,
                "name": "TQ7",
                "outcome": {
                    "status": "compared",
                    "verdict": { "verdict": "pass", "rows": 4 }
                }
            })
        );
    }

    #[test]
    fn test_read_result_file_replaces_invalid_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("TQ1.tab");
        std::fs::write(&path, b"1\t\xff\n").unwrap();

        assert_eq!(read_result_file(&path).unwrap(), "1\t\u{FFFD}\n");
    }

    #[test]
    fn test_count_reference_files_missing_dir() {
        assert!(count_reference_files(Path::new("/nonexistent/post_result")).is_err());
    }
}
