// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # AIMDB Check - Suite Runner
//!
//! Rebuilds the engine under test with a reference driver, runs it against
//! the benchmark data, and checks every produced result file against the
//! PostgreSQL output with [`aimdb_check_compare`].
//!
//! ## Modules
//!
//! - [`config`]: suite presets and YAML configuration
//! - [`process`]: `Builder`/`Runner` collaborators for the external steps
//! - [`suite`]: per-case checks and the final report
//! - [`pipeline`]: build, run, check, summarize
//! - [`logging`]: tracing subscriber setup

pub mod config;
pub mod logging;
pub mod pipeline;
pub mod process;
pub mod suite;

pub use config::{ConfigError, SuiteConfig, SuitePreset};
pub use pipeline::Pipeline;
pub use process::{Builder, EngineRunner, MakeBuilder, Runner, StepStatus};
pub use suite::{CaseOutcome, CaseResult, SuiteReport, SuiteRunner, count_reference_files};
