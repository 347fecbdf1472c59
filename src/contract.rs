//! # contract: Shared types and seams for the conversion pipeline
//!
//! This module holds the plain data types passed between the pipeline stages
//! (enumerate → parse → resolve URL → write), the two error families, and the
//! [`RowSink`] trait that the writer stage implements.
//!
//! ## Error families
//! - [`ParseError`]: per-file, recoverable. The pipeline records the file as
//!   skipped and continues.
//! - [`ConvertError`]: fatal. Aborts the run and surfaces at the CLI boundary.
//!
//! ## Mocking & Testing
//! - [`RowSink`] is annotated for `mockall` so tests can assert on the rows the
//!   pipeline hands to the writer without touching the filesystem.

use mockall::automock;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Header row written before any record.
pub const HEADER: [&str; 3] = ["title", "source", "text"];

/// One output row: a successfully parsed document.
///
/// Absent values are empty strings, never missing fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentRecord {
    pub title: String,
    pub source_url: String,
    pub text: String,
}

impl DocumentRecord {
    /// Fields in output order: (title, source, text).
    pub fn fields(&self) -> [&str; 3] {
        [&self.title, &self.source_url, &self.text]
    }
}

/// Which part of a document ends up in the `text` column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TextSource {
    /// Only the content after the closing front matter delimiter.
    #[default]
    Body,
    /// The raw file, front matter included.
    #[value(name = "document")]
    #[serde(rename = "document")]
    FullDocument,
}

/// Immutable run configuration handed to [`crate::convert::convert`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertConfig {
    /// Enumeration root.
    pub root: PathBuf,
    /// Destination of the delimited file.
    pub output: PathBuf,
    /// Walk the whole subtree instead of the immediate entries of `root`.
    pub recursive: bool,
    /// Derive `source_url` from the file location instead of `site_url`.
    pub site_mode: bool,
    pub base_url: String,
    pub text_source: TextSource,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from(DEFAULT_FOLDER),
            output: PathBuf::from(DEFAULT_OUTPUT),
            recursive: false,
            site_mode: false,
            base_url: DEFAULT_BASE_URL.to_string(),
            text_source: TextSource::default(),
        }
    }
}

pub const DEFAULT_FOLDER: &str = ".";
pub const DEFAULT_OUTPUT: &str = "output.csv";
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/";

/// A file left out of the output, with the reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: ParseError,
}

/// Outcome of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertReport {
    pub output: PathBuf,
    pub rows_written: usize,
    pub skipped: Vec<SkippedFile>,
}

/// Per-file problems. The file is skipped and the run continues.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// Fewer than two `---` delimiters in the file.
    #[error("malformed markdown file: missing front matter delimiter")]
    MissingDelimiter,
    #[error("invalid front matter: {0}")]
    FrontMatter(String),
    #[error("unreadable file: {0}")]
    Read(String),
}

/// Run-aborting failures.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("failed to read directory {}: {source}", .path.display())]
    Enumerate {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("conversion task failed: {0}")]
    Task(String),
}

impl ConvertError {
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        ConvertError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Destination for the output table.
///
/// Implementors write the header followed by `records` in the given order and
/// return the number of records written.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
pub trait RowSink {
    fn write_rows(&mut self, records: &[DocumentRecord]) -> Result<usize, ConvertError>;
}
