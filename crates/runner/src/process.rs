// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # External process collaborators
//!
//! Building and running the engine are the only steps with side effects
//! outside the comparison. They sit behind the [`Builder`] and [`Runner`]
//! traits so the suite can be driven by test doubles.
//!
//! Each command gets its own working directory; the process-wide current
//! directory is never changed.

use std::path::{Path, PathBuf};
use std::process::ExitStatus;

use anyhow::{Context, Result};
use serde::Serialize;
use tokio::process::Command;
use tracing::{debug, info};

use crate::config::SuiteConfig;

/// Exit state of an external step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StepStatus {
    Succeeded,
    /// Non-zero exit; `code` is `None` when the process was killed by a signal
    /// or could not be started
    Failed { code: Option<i32> },
}

impl StepStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, StepStatus::Succeeded)
    }
}

impl From<ExitStatus> for StepStatus {
    fn from(status: ExitStatus) -> Self {
        if status.success() {
            StepStatus::Succeeded
        } else {
            StepStatus::Failed {
                code: status.code(),
            }
        }
    }
}

/// Builds the engine under test from a driver source file
#[async_trait::async_trait]
pub trait Builder: Send + Sync {
    /// Stage `source` into the engine tree and build the engine
    ///
    /// # Errors
    ///
    /// Returns an error when staging fails or the build tool cannot be started.
    /// A build that runs and fails is reported as [`StepStatus::Failed`].
    async fn build(&self, source: &Path) -> Result<StepStatus>;
}

/// Runs the engine under test, which writes one result file per query
#[async_trait::async_trait]
pub trait Runner: Send + Sync {
    /// Execute the engine against a schema file and a data directory
    async fn run(&self, schema: &Path, data_dir: &Path) -> Result<StepStatus>;
}

/// Copies the driver into the engine tree and runs `make` there
#[derive(Debug, Clone)]
pub struct MakeBuilder {
    engine_dir: PathBuf,
    staged_source: PathBuf,
    program: String,
}

impl MakeBuilder {
    pub fn new(engine_dir: impl Into<PathBuf>, staged_source: impl Into<PathBuf>) -> Self {
        Self {
            engine_dir: engine_dir.into(),
            staged_source: staged_source.into(),
            program: "make".to_string(),
        }
    }

    /// Builder for a resolved suite configuration
    pub fn from_config(config: &SuiteConfig) -> Self {
        Self::new(&config.engine_dir, &config.staged_source)
    }

    /// Use another build tool instead of `make`
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }
}

#[async_trait::async_trait]
impl Builder for MakeBuilder {
    async fn build(&self, source: &Path) -> Result<StepStatus> {
        info!(
            source = %source.display(),
            target = %self.staged_source.display(),
            "Staging driver source"
        );
        tokio::fs::copy(source, &self.staged_source)
            .await
            .with_context(|| {
                format!(
                    "Failed to copy {} to {}",
                    source.display(),
                    self.staged_source.display()
                )
            })?;

        info!(dir = %self.engine_dir.display(), program = %self.program, "Building engine");
        let status = Command::new(&self.program)
            .current_dir(&self.engine_dir)
            .status()
            .await
            .with_context(|| format!("Failed to start '{}'", self.program))?;

        debug!(?status, "Build finished");
        Ok(status.into())
    }
}

/// Runs the engine binary from the lab directory
#[derive(Debug, Clone)]
pub struct EngineRunner {
    binary: PathBuf,
    working_dir: PathBuf,
}

impl EngineRunner {
    pub fn new(binary: impl Into<PathBuf>, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            working_dir: working_dir.into(),
        }
    }

    /// Runner for a resolved suite configuration
    pub fn from_config(config: &SuiteConfig) -> Self {
        Self::new(&config.engine_binary, &config.lab_dir)
    }
}

#[async_trait::async_trait]
impl Runner for EngineRunner {
    async fn run(&self, schema: &Path, data_dir: &Path) -> Result<StepStatus> {
        info!(
            binary = %self.binary.display(),
            schema = %schema.display(),
            data = %data_dir.display(),
            "Running engine"
        );
        let status = Command::new(&self.binary)
            .arg(schema)
            .arg(data_dir)
            .current_dir(&self.working_dir)
            .status()
            .await
            .with_context(|| format!("Failed to start {}", self.binary.display()))?;

        debug!(?status, "Engine finished");
        Ok(status.into())
    }
}
