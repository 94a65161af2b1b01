// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Suite Configuration
//!
//! A suite describes where the engine sources live, which reference program
//! drives it, where both result directories are, and which queries to check.
//!
//! ## Presets
//!
//! - `small`: `Lab3_Test1`, small data set, queries 1, 2, 6, 7, 11, 16, 18, 21
//! - `normal`: `Lab3_Test2`, queries 3, 4, 5, 8, 9, 10, 12, 13, 14, 15, 17, 19, 20, 22
//!
//! ## Paths
//!
//! `lab_dir` and `engine_dir` are relative to the root directory given on the
//! command line. Every other path is relative to `lab_dir`, except
//! `staged_source` and `engine_binary` which are relative to `engine_dir`.
//! Call [`SuiteConfig::resolve`] to turn them into usable paths.
//!
//! ## Example
//!
//! ```yaml
//! name: tq-joins
//! lab_dir: Lab3_Test1
//! query_ids: [6, 7, 11]
//! tolerance: 0.001
//! layout:
//!   reference_footer_lines: 2
//! ```

use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use aimdb_check_compare::{FileLayout, Tolerance};
use serde::{Deserialize, Serialize};

/// Built-in suites
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SuitePreset {
    /// Small data set
    Small,
    /// Full data set
    Normal,
}

impl SuitePreset {
    pub fn config(&self) -> SuiteConfig {
        match self {
            SuitePreset::Small => SuiteConfig::small(),
            SuitePreset::Normal => SuiteConfig::normal(),
        }
    }
}

impl fmt::Display for SuitePreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SuitePreset::Small => write!(f, "small"),
            SuitePreset::Normal => write!(f, "normal"),
        }
    }
}

impl FromStr for SuitePreset {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "small" | "s" => Ok(SuitePreset::Small),
            "normal" | "n" => Ok(SuitePreset::Normal),
            _ => Err(ConfigError::UnknownPreset(s.to_string())),
        }
    }
}

/// Complete description of one check run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SuiteConfig {
    /// Name shown in logs and reports
    pub name: String,

    /// Lab directory; the engine runs with this as working directory
    pub lab_dir: PathBuf,

    /// Engine source tree, where `make` runs
    pub engine_dir: PathBuf,

    /// Reference driver program copied into the engine tree before building
    pub reference_source: PathBuf,

    /// Destination of `reference_source` inside `engine_dir`
    pub staged_source: PathBuf,

    /// Engine executable inside `engine_dir`
    pub engine_binary: PathBuf,

    pub schema_file: PathBuf,
    pub data_dir: PathBuf,

    /// Directory of `TQn.tab` files written by the engine
    pub engine_output_dir: PathBuf,

    /// Directory of `TQn.tbl` files produced by PostgreSQL
    pub reference_output_dir: PathBuf,

    /// Queries to check, in order
    pub query_ids: Vec<u32>,

    pub layout: FileLayout,
    pub tolerance: Tolerance,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self::small()
    }
}

impl SuiteConfig {
    /// Small data set suite (`Lab3_Test1`)
    pub fn small() -> Self {
        Self {
            name: SuitePreset::Small.to_string(),
            lab_dir: PathBuf::from("Lab3_Test1"),
            engine_dir: PathBuf::from("AIMDB"),
            reference_source: PathBuf::from("reference/runaimdb_s.cc"),
            staged_source: PathBuf::from("system/runaimdb.cc"),
            engine_binary: PathBuf::from("runaimdb"),
            schema_file: PathBuf::from("data/tpch_schema_small_r.txt"),
            data_dir: PathBuf::from("data/sf10Mt"),
            engine_output_dir: PathBuf::from("result/aimdb_result"),
            reference_output_dir: PathBuf::from("result/post_result"),
            query_ids: vec![1, 2, 6, 7, 11, 16, 18, 21],
            layout: FileLayout::default(),
            tolerance: Tolerance::default(),
        }
    }

    /// Full data set suite (`Lab3_Test2`)
    pub fn normal() -> Self {
        Self {
            name: SuitePreset::Normal.to_string(),
            lab_dir: PathBuf::from("Lab3_Test2"),
            reference_source: PathBuf::from("reference/runaimdb_n.cc"),
            query_ids: vec![3, 4, 5, 8, 9, 10, 12, 13, 14, 15, 17, 19, 20, 22],
            ..Self::small()
        }
    }

    /// Load a suite from a YAML file
    pub fn from_yaml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&content)
    }

    /// Load a suite from YAML text; missing fields take the `small` values
    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Anchor every relative path at `root`
    pub fn resolve(mut self, root: &Path) -> Self {
        self.lab_dir = root.join(&self.lab_dir);
        self.engine_dir = root.join(&self.engine_dir);

        self.reference_source = self.lab_dir.join(&self.reference_source);
        self.schema_file = self.lab_dir.join(&self.schema_file);
        self.data_dir = self.lab_dir.join(&self.data_dir);
        self.engine_output_dir = self.lab_dir.join(&self.engine_output_dir);
        self.reference_output_dir = self.lab_dir.join(&self.reference_output_dir);

        self.staged_source = self.engine_dir.join(&self.staged_source);
        self.engine_binary = self.engine_dir.join(&self.engine_binary);
        self
    }

    /// Name of a test case, e.g. `TQ6`
    pub fn case_name(id: u32) -> String {
        format!("TQ{}", id)
    }

    /// Engine result file of a query
    pub fn engine_output_path(&self, id: u32) -> PathBuf {
        self.engine_output_dir
            .join(format!("{}.tab", Self::case_name(id)))
    }

    /// Reference result file of a query
    pub fn reference_output_path(&self, id: u32) -> PathBuf {
        self.reference_output_dir
            .join(format!("{}.tbl", Self::case_name(id)))
    }

    /// Validate the configuration
    ///
    /// Checks that:
    /// - at least one query is listed
    /// - no query is listed twice
    /// - the reference format has at least as much framing as the engine format
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.query_ids.is_empty() {
            return Err(ConfigError::EmptyQueryList);
        }

        let mut seen = HashSet::new();
        for id in &self.query_ids {
            if !seen.insert(*id) {
                return Err(ConfigError::DuplicateQueryId(*id));
            }
        }

        if self.layout.line_offset().is_none() {
            return Err(ConfigError::InvalidLayout {
                reason: format!(
                    "engine trailer ({} lines) exceeds reference framing ({} lines)",
                    self.layout.engine_trailer_lines,
                    self.layout.reference_header_lines + self.layout.reference_footer_lines
                ),
            });
        }

        Ok(())
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("Failed to read config file {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Config file is not valid YAML for a suite
    #[error("Invalid suite config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Unknown suite preset '{0}' (expected 'small' or 'normal')")]
    UnknownPreset(String),

    #[error("Suite has no queries to check")]
    EmptyQueryList,

    #[error("Query TQ{0} is listed more than once")]
    DuplicateQueryId(u32),

    #[error("Invalid file layout: {reason}")]
    InvalidLayout { reason: String },
}
