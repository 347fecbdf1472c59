//! Document Parser: splits front matter from body and builds a [`DocumentRecord`].
//!
//! A document looks like:
//!
//! ```text
//! ---
//! title: Getting Started
//! site_url: https://docs.example.org/start/
//! ---
//! # Getting Started
//! ...
//! ```
//!
//! The raw content is split on the literal `---` into at most three parts
//! (preamble, front matter, body). Anything that does not yield three parts is
//! rejected with [`ParseError::MissingDelimiter`]; the caller decides whether
//! that is fatal (the pipeline skips the file).

use crate::contract::{DocumentRecord, ParseError, TextSource};
use serde::{Deserialize, Deserializer};
use serde_yaml::Value;
use std::path::Path;
use tracing::debug;

pub const DELIMITER: &str = "---";

/// Recognised front matter keys. Everything else in the block is ignored.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FrontMatter {
    #[serde(deserialize_with = "scalar_string")]
    pub title: String,
    #[serde(deserialize_with = "scalar_string")]
    pub site_url: String,
}

/// Accept any YAML scalar for a string field; `null` becomes empty.
fn scalar_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(String::new()),
        Value::String(s) => Ok(s),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Sequence(_) => Err(serde::de::Error::custom("expected a scalar, found a sequence")),
        Value::Mapping(_) => Err(serde::de::Error::custom("expected a scalar, found a mapping")),
        Value::Tagged(_) => Err(serde::de::Error::custom("expected a scalar, found a tagged value")),
    }
}

/// Decode a front matter block. An empty block yields empty fields.
pub fn parse_front_matter(block: &str) -> Result<FrontMatter, ParseError> {
    if block.trim().is_empty() {
        return Ok(FrontMatter::default());
    }
    let value: Value =
        serde_yaml::from_str(block).map_err(|e| ParseError::FrontMatter(e.to_string()))?;
    match value {
        Value::Null => Ok(FrontMatter::default()),
        Value::Mapping(_) => {
            serde_yaml::from_value(value).map_err(|e| ParseError::FrontMatter(e.to_string()))
        }
        _ => Err(ParseError::FrontMatter(
            "front matter is not a key/value mapping".to_string(),
        )),
    }
}

/// Parse a whole document.
///
/// `source_url` is taken from `site_url`; site mode overrides it later.
pub fn parse_document(raw: &str, text_source: TextSource) -> Result<DocumentRecord, ParseError> {
    let mut parts = raw.splitn(3, DELIMITER);
    let (Some(preamble), Some(block), Some(body)) = (parts.next(), parts.next(), parts.next())
    else {
        return Err(ParseError::MissingDelimiter);
    };
    if !preamble.trim().is_empty() {
        debug!(len = preamble.len(), "Ignoring content before front matter");
    }

    let front = parse_front_matter(block)?;

    let title = single_line(&front.title);
    let title = if title.is_empty() {
        heading_title(body.lines()).unwrap_or_default()
    } else {
        title
    };

    let text = match text_source {
        TextSource::Body => normalize_text(body),
        TextSource::FullDocument => normalize_text(raw),
    };

    Ok(DocumentRecord {
        title,
        source_url: single_line(&front.site_url),
        text,
    })
}

/// Read and parse a file. Unreadable files map to [`ParseError::Read`].
pub fn read_document(path: &Path, text_source: TextSource) -> Result<DocumentRecord, ParseError> {
    let raw = std::fs::read_to_string(path).map_err(|e| ParseError::Read(e.to_string()))?;
    parse_document(&raw, text_source)
}

/// First level-1 or level-2 heading in `lines`, without its marker.
pub fn heading_title<'a, I>(lines: I) -> Option<String>
where
    I: IntoIterator<Item = &'a str>,
{
    for line in lines {
        let trimmed = line.trim();
        for marker in ["# ", "## "] {
            if let Some(rest) = trimmed.strip_prefix(marker) {
                return Some(rest.trim().to_string());
            }
        }
    }
    None
}

/// Trim and turn every line break into a single space.
///
/// Applied to `title` and `source_url`, which may come from YAML block scalars.
pub fn single_line(text: &str) -> String {
    text.trim().replace("\r\n", " ").replace(['\n', '\r'], " ")
}

/// [`single_line`], then every `"` becomes `'`.
///
/// The result contains no newline or double-quote characters, so applying it
/// again is a no-op.
pub fn normalize_text(text: &str) -> String {
    single_line(text).replace('"', "'")
}
