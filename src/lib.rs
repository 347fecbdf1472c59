//! md-to-csv: turn a folder of front-matter markdown files into one
//! pipe-delimited table (`title|source|text`) for search indexing or LLM
//! dataset preparation.
//!
//! The pipeline is enumerate → parse → (resolve URL) → write; see
//! [`convert::convert`] for the entrypoint and [`contract`] for the shared types.

pub mod cli;
pub mod contract;
pub mod convert;
pub mod enumerate;
pub mod load_config;
pub mod parse;
pub mod resolve_url;
pub mod write;

pub use cli::{run, Cli};
pub use contract::{ConvertConfig, ConvertError, ConvertReport, DocumentRecord, ParseError, TextSource};
pub use convert::{convert, convert_with_sink};
