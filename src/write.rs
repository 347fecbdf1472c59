//! Row Writer: serialises the output table to a pipe-delimited file.
//!
//! Fields are quoted only when needed (RFC 4180 rules with `|` as the
//! delimiter), so a body containing `|` is written as `"a|b"` and still reads
//! back as a single field.

use crate::contract::{ConvertError, DocumentRecord, RowSink, HEADER};
use csv::{QuoteStyle, WriterBuilder};
use std::path::{Path, PathBuf};
use tracing::{error, info};

pub const FIELD_DELIMITER: u8 = b'|';

/// [`RowSink`] writing to a file on disk. The file is created or truncated
/// when rows are written, not when the writer is constructed.
#[derive(Debug, Clone)]
pub struct DelimitedWriter {
    destination: PathBuf,
}

impl DelimitedWriter {
    pub fn new(destination: impl Into<PathBuf>) -> Self {
        Self {
            destination: destination.into(),
        }
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }

    fn write_err(&self, source: csv::Error) -> ConvertError {
        error!(error = %source, path = %self.destination.display(), "Failed to write output file");
        ConvertError::Write {
            path: self.destination.clone(),
            source,
        }
    }
}

impl RowSink for DelimitedWriter {
    fn write_rows(&mut self, records: &[DocumentRecord]) -> Result<usize, ConvertError> {
        let mut writer = WriterBuilder::new()
            .delimiter(FIELD_DELIMITER)
            .quote_style(QuoteStyle::Necessary)
            .from_path(&self.destination)
            .map_err(|e| self.write_err(e))?;

        writer.write_record(HEADER).map_err(|e| self.write_err(e))?;
        for record in records {
            writer
                .write_record(record.fields())
                .map_err(|e| self.write_err(e))?;
        }
        writer
            .flush()
            .map_err(|e| self.write_err(csv::Error::from(e)))?;

        info!(
            rows = records.len(),
            path = %self.destination.display(),
            "Output file written"
        );
        Ok(records.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use csv::ReaderBuilder;
    use tempfile::tempdir;

    fn record(title: &str, source: &str, text: &str) -> DocumentRecord {
        DocumentRecord {
            title: title.to_string(),
            source_url: source.to_string(),
            text: text.to_string(),
        }
    }

    #[test]
    fn writes_header_then_rows_in_order() {
        let tmp = tempdir().unwrap();
        let out = tmp.path().join("out.csv");
        let mut writer = DelimitedWriter::new(&out);

        let written = writer
            .write_rows(&[record("One", "https://a/", "first"), record("Two", "", "second, with comma")])
            .unwrap();

        assert_eq!(written, 2);
        let content = std::fs::read_to_string(&out).unwrap();
        assert_eq!(
            content,
            "title|source|text\nOne|https://a/|first\nTwo||second, with comma\n"
        );
    }

    #[test]
    fn pipes_in_fields_keep_three_columns() {
        let tmp = tempdir().unwrap();
        let out = tmp.path().join("out.csv");
        DelimitedWriter::new(&out)
            .write_rows(&[record("a|b", "", "x | y | z"), record("say \"hi\"", "u", "plain")])
            .unwrap();

        let mut reader = ReaderBuilder::new()
            .delimiter(FIELD_DELIMITER)
            .has_headers(false)
            .from_path(&out)
            .unwrap();
        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|r| r.len() == 3));
        assert_eq!(&rows[1][0], "a|b");
        assert_eq!(&rows[1][2], "x | y | z");
        assert_eq!(&rows[2][0], "say \"hi\"");
    }

    #[test]
    fn empty_table_still_has_header() {
        let tmp = tempdir().unwrap();
        let out = tmp.path().join("out.csv");
        assert_eq!(DelimitedWriter::new(&out).write_rows(&[]).unwrap(), 0);
        assert_eq!(std::fs::read_to_string(&out).unwrap(), "title|source|text\n");
    }

    #[test]
    fn existing_file_is_truncated() {
        let tmp = tempdir().unwrap();
        let out = tmp.path().join("out.csv");
        std::fs::write(&out, "stale content that is much longer than the new table\n".repeat(10)).unwrap();
        DelimitedWriter::new(&out).write_rows(&[record("t", "s", "x")]).unwrap();
        assert_eq!(std::fs::read_to_string(&out).unwrap(), "title|source|text\nt|s|x\n");
    }

    #[test]
    fn uncreatable_destination_is_a_write_error() {
        let tmp = tempdir().unwrap();
        let out = tmp.path().join("missing-dir").join("out.csv");
        let err = DelimitedWriter::new(&out).write_rows(&[]).unwrap_err();
        match err {
            ConvertError::Write { path, .. } => assert_eq!(path, out),
            other => panic!("unexpected error {other:?}"),
        }
    }
}
