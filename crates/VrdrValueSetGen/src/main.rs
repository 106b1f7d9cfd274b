//! # ValueSet lookup generator CLI
//!
//! Reads the ValueSets and CodeSystems of a built VRDR Implementation Guide and
//! writes one static lookup class per ValueSet.
//!
//! ## Usage
//!
//! ```bash
//! # Generate Java classes into the default VRDR source directory
//! vrdr-valueset-gen ../vrdr-ig
//!
//! # Generate into another directory and package
//! vrdr-valueset-gen ../vrdr-ig -o gen/valueset --package org.example.valueset
//!
//! # Generate Rust modules instead
//! vrdr-valueset-gen ../vrdr-ig --target rust -o src/value_sets
//! ```
//!
//! ## Environment variables
//!
//! - `VSGEN_OUTPUT_DIR` / `--output-dir`
//! - `VSGEN_JAVA_PACKAGE` / `--package`
//! - `VSGEN_TARGET` / `--target`
//! - `VSGEN_LOG_LEVEL` / `--log-level` (`RUST_LOG` takes precedence)
//!
//! ## Exit Codes
//!
//! - `0`: Success
//! - `1`: Usage error, or any error while reading, resolving or writing

use anyhow::{Context, Result};
use clap::Parser;
use clap::error::ErrorKind;
use std::path::PathBuf;
use tracing::info;
use vrdr_valueset_gen::loader::{DEFAULT_CODE_SYSTEM_PATTERN, DEFAULT_VALUE_SET_PATTERN};
use vrdr_valueset_gen::emitter::DEFAULT_JAVA_PACKAGE;
use vrdr_valueset_gen::{DEFAULT_OUTPUT_DIR, EmitTarget, GeneratorConfig};

const USAGE: &str = "Usage: vrdr-valueset-gen <path_to_ig>";

#[derive(Parser, Debug)]
#[command(name = "vrdr-valueset-gen", version)]
#[command(about = "Generate static ValueSet lookup classes from a built FHIR Implementation Guide")]
struct Args {
    /// Root of the built Implementation Guide (contains fsh-generated/resources)
    ig_root: PathBuf,

    /// Directory that receives one file per ValueSet
    #[arg(long, short = 'o', env = "VSGEN_OUTPUT_DIR", default_value = DEFAULT_OUTPUT_DIR)]
    output_dir: PathBuf,

    /// Package declared by generated Java classes
    #[arg(long = "package", env = "VSGEN_JAVA_PACKAGE", default_value = DEFAULT_JAVA_PACKAGE)]
    java_package: String,

    /// Output language
    #[arg(long, short = 't', value_enum, env = "VSGEN_TARGET", default_value_t = EmitTarget::Java)]
    target: EmitTarget,

    /// File name pattern of ValueSet resources
    #[arg(long, default_value = DEFAULT_VALUE_SET_PATTERN)]
    value_set_pattern: String,

    /// File name pattern of CodeSystem resources
    #[arg(long, default_value = DEFAULT_CODE_SYSTEM_PATTERN)]
    code_system_pattern: String,

    /// Re-read CodeSystem files for every whole-system include instead of indexing them once
    #[arg(long)]
    no_cache: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(short, long, env = "VSGEN_LOG_LEVEL", default_value = "info")]
    log_level: String,
}

impl Args {
    fn into_config(self) -> GeneratorConfig {
        GeneratorConfig {
            ig_root: self.ig_root,
            output_dir: self.output_dir,
            java_package: self.java_package,
            target: self.target,
            value_set_pattern: self.value_set_pattern,
            code_system_pattern: self.code_system_pattern,
            cache_code_systems: !self.no_cache,
        }
    }
}

fn parse_args() -> Args {
    match Args::try_parse() {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(e) => {
            eprintln!("{}\n", USAGE);
            let _ = e.print();
            std::process::exit(1);
        }
    }
}

fn main() -> Result<()> {
    let args = parse_args();

    let filter = format!("vrdr_valueset_gen={}", args.log_level);
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .init();

    let config = args.into_config();
    info!("Configuration: {:?}", config);

    let report = vrdr_valueset_gen::generate(&config).with_context(|| {
        format!(
            "failed generating ValueSets from {}",
            config.ig_root.display()
        )
    })?;

    info!(
        "Done: {} ValueSets, {} codings",
        report.artifacts.len(),
        report.total_codings()
    );

    Ok(())
}
