//! Table definitions, their parsers, and the generator configuration.
//!
//! Table definitions come either as delimited text with a header row
//! (see [`HEADER`]) or as a JSON array of [`Table`]s.

// Miette's derive macro generates code that triggers these warnings
#![allow(unused_assignments)]

mod config;
mod delimited;
mod error;
mod model;
mod parse;

pub use config::{
    CONFIG_FILE, CommonColumns, Config, DeleteFlag, ExportConfig, FlagKind, FlagValue,
    PreviewConfig, RlsConfig, SqlConfig,
};
pub use delimited::{Delimiter, RawRow, tokenize};
pub use error::{Error, Result, RowError, SourceContext};
pub use model::{Column, INDEX_SLOTS, IndexMember, Table, index_key};
pub use parse::{
    HEADER, Record, SchemaFormat, build_tables, parse_file, parse_json_str,
    parse_json_str_with_filename, parse_str, parse_str_with_filename,
};
