///
/// This module implements the CLI interface for md-to-csv: argument parsing and
/// the async [`run`] entrypoint shared by `main()` and the integration tests.
///
/// All conversion logic lives in [`crate::convert`]; this module only turns
/// flags into a [`ConvertConfig`](crate::contract::ConvertConfig) (through
/// [`crate::load_config`]) and reports the outcome.
///
/// ## How To Use
/// - For command-line users: `md-to-csv -f docs -c docs.csv -r`, see `--help`.
/// - For programmatic/integration use: call [`run`] with a constructed [`Cli`].
use crate::contract::{ConvertError, ConvertReport, TextSource};
use crate::convert::convert;
use crate::load_config::{resolve_config, ConfigLayer};
use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

/// Generate a pipe-delimited file from markdown files.
#[derive(Parser, Debug, Default)]
#[clap(
    name = "md-to-csv",
    version,
    about = "Generate a CSV file from markdown files",
    long_about = "Generate a CSV file from markdown files. The file contains the title, \
                  the source and the text of each markdown file, separated by '|'.\n\n\
                  Example usage:\n  md-to-csv -f samples -c output.csv"
)]
pub struct Cli {
    /// Folder containing markdown files [default: .]
    #[clap(short = 'f', long)]
    pub folder: Option<PathBuf>,

    /// CSV file to generate [default: output.csv]
    #[clap(short = 'c', long)]
    pub csv: Option<PathBuf>,

    /// Build each source URL from the file location (MkDocs layout) instead of `site_url`
    #[clap(short = 'm', long, overrides_with = "no_ismkdoc")]
    pub ismkdoc: bool,

    /// Use `site_url` even if the config file enables --ismkdoc
    #[clap(long, overrides_with = "ismkdoc")]
    pub no_ismkdoc: bool,

    /// Base URL used with --ismkdoc [default: http://localhost:8000/]
    #[clap(short = 'u', long)]
    pub base: Option<String>,

    /// Walk sub-folders too
    #[clap(short = 'r', long, overrides_with = "no_recursive")]
    pub recursive: bool,

    /// Top-level files only, even if the config file enables --recursive
    #[clap(long, overrides_with = "recursive")]
    pub no_recursive: bool,

    /// Which text goes into the `text` column [default: body]
    #[clap(long, value_enum)]
    pub text: Option<TextSource>,

    /// YAML file with default values for the options above
    #[clap(long)]
    pub config: Option<PathBuf>,

    /// Log per-file details
    #[clap(short = 'v', long)]
    pub verbose: bool,
}

impl Cli {
    /// Values given explicitly on the command line.
    pub fn flags(&self) -> ConfigLayer {
        ConfigLayer {
            folder: self.folder.clone(),
            csv: self.csv.clone(),
            ismkdoc: switch(self.ismkdoc, self.no_ismkdoc),
            base: self.base.clone(),
            recursive: switch(self.recursive, self.no_recursive),
            text: self.text,
        }
    }
}

/// `Some` only when one of a `--x` / `--no-x` pair was given.
fn switch(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (false, true) => Some(false),
        (false, false) => None,
    }
}

/// Async CLI logic entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<ConvertReport> {
    // Emit a top-level 'trace_initialised' event at the very start
    tracing::info!("trace_initialised");

    let config = resolve_config(cli.config.as_deref(), cli.flags())?;

    // Conversion is blocking filesystem work.
    let report = tokio::task::spawn_blocking(move || convert(&config))
        .await
        .map_err(|e| ConvertError::Task(e.to_string()))??;

    tracing::info!(
        rows = report.rows_written,
        skipped = report.skipped.len(),
        output = %report.output.display(),
        "Conversion finished"
    );
    println!(
        "CSV file created: {} ({} rows, {} skipped)",
        report.output.display(),
        report.rows_written,
        report.skipped.len()
    );
    Ok(report)
}
