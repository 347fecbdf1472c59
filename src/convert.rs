//! High-level pipeline: enumerate → parse → (resolve URL) → write.
//!
//! # Responsibilities
//! - Runs every stage for one [`ConvertConfig`], sequentially and in
//!   enumeration order.
//! - Per-file problems ([`ParseError`]) are logged, recorded in the
//!   [`ConvertReport`] and never abort the run.
//! - Fatal problems ([`ConvertError`]: unreadable root, unwritable output)
//!   return immediately. Nothing is written when enumeration fails.
//!
//! # Navigation
//! - Main entrypoint: [`convert`]
//! - With a custom destination: [`convert_with_sink`]

use crate::contract::{
    ConvertConfig, ConvertError, ConvertReport, DocumentRecord, ParseError, RowSink, SkippedFile,
};
use crate::enumerate::enumerate;
use crate::parse::read_document;
use crate::resolve_url::resolve_url;
use crate::write::DelimitedWriter;
use std::path::Path;
use tracing::{debug, info, warn};

/// Convert the configured folder into the configured output file.
pub fn convert(config: &ConvertConfig) -> Result<ConvertReport, ConvertError> {
    let mut writer = DelimitedWriter::new(&config.output);
    convert_with_sink(config, &mut writer)
}

/// Same as [`convert`], writing rows to `sink` instead of `config.output`.
pub fn convert_with_sink<S>(config: &ConvertConfig, sink: &mut S) -> Result<ConvertReport, ConvertError>
where
    S: RowSink + ?Sized,
{
    info!(
        root = %config.root.display(),
        output = %config.output.display(),
        recursive = config.recursive,
        site_mode = config.site_mode,
        text_source = ?config.text_source,
        "Starting conversion"
    );

    let files = enumerate(&config.root, config.recursive)?;

    let mut records = Vec::with_capacity(files.len());
    let mut skipped = Vec::new();
    for path in files {
        match convert_file(config, &path) {
            Ok(record) => {
                debug!(path = %path.display(), title = %record.title, "Parsed document");
                records.push(record);
            }
            Err(reason) => {
                warn!(path = %path.display(), reason = %reason, "Skipping file");
                skipped.push(SkippedFile { path, reason });
            }
        }
    }

    let rows_written = sink.write_rows(&records)?;

    info!(
        rows = rows_written,
        skipped = skipped.len(),
        "Conversion complete"
    );
    Ok(ConvertReport {
        output: config.output.clone(),
        rows_written,
        skipped,
    })
}

fn convert_file(config: &ConvertConfig, path: &Path) -> Result<DocumentRecord, ParseError> {
    let mut record = read_document(path, config.text_source)?;
    if config.site_mode {
        record.source_url = resolve_url(&config.root, path, &config.base_url);
    }
    Ok(record)
}
