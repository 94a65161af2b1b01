// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! `aimdb-check` entry point
//!
//! With no arguments it behaves like the lab harness: run from inside the lab
//! directory, it rebuilds `../AIMDB`, runs the small suite and prints the
//! pass count.

use std::io::Write;
use std::path::PathBuf;

use aimdb_check_runner::{
    Builder, EngineRunner, MakeBuilder, Pipeline, Runner, SuiteConfig, SuitePreset, logging,
};
use anyhow::{Context, Result};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "aimdb-check")]
#[command(version)]
#[command(about = "Check AIMDB query results against PostgreSQL reference output")]
struct Args {
    /// Built-in suite to run (small, normal)
    #[arg(short, long, default_value = "small")]
    suite: SuitePreset,

    /// Directory holding AIMDB/ and the lab directories
    #[arg(short, long, value_name = "DIR", default_value = "..")]
    root: PathBuf,

    /// YAML suite file; replaces --suite
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Do not stage the driver or rebuild the engine
    #[arg(long)]
    skip_build: bool,

    /// Do not run the engine; compare existing result files
    #[arg(long)]
    skip_run: bool,

    /// Print the report as JSON after the summary
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    logging::init()?;

    // commands run with their own working directory, so every path must be absolute
    let root = std::path::absolute(&args.root)
        .with_context(|| format!("Invalid root directory {}", args.root.display()))?;

    let config = match &args.config {
        Some(path) => SuiteConfig::from_yaml_file(path)?,
        None => args.suite.config(),
    }
    .resolve(&root);
    config.validate()?;

    tracing::info!(
        suite = %config.name,
        lab = %config.lab_dir.display(),
        "Starting AIMDB result check"
    );

    let builder = (!args.skip_build)
        .then(|| Box::new(MakeBuilder::from_config(&config)) as Box<dyn Builder>);
    let runner = (!args.skip_run)
        .then(|| Box::new(EngineRunner::from_config(&config)) as Box<dyn Runner>);

    let mut out = std::io::stdout();
    let report = Pipeline::new(builder, runner)
        .execute(&config, &mut out)
        .await?;

    if args.json {
        serde_json::to_writer_pretty(&mut out, &report)?;
        writeln!(out)?;
    }

    Ok(())
}
