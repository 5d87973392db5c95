use std::path::PathBuf;

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Result type for tablegen-schema operations (boxed to reduce size on stack)
pub type Result<T> = std::result::Result<T, Box<Error>>;

/// Source context for error reporting.
///
/// Encapsulates the source content and filename, reducing parameter passing
/// in error factory functions.
#[derive(Debug, Clone)]
pub struct SourceContext {
    src: String,
    filename: String,
}

impl SourceContext {
    /// Create a new source context.
    pub fn new(src: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            filename: filename.into(),
        }
    }

    /// Get the source content.
    pub fn src(&self) -> &str {
        &self.src
    }

    /// Get the filename.
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Create a NamedSource for miette error reporting.
    pub fn named_source(&self) -> NamedSource<String> {
        NamedSource::new(&self.filename, self.src.clone())
    }

    /// Collect row errors from a delimited file into one error.
    pub fn delimited_error(&self, errors: Vec<RowError>) -> Box<Error> {
        Box::new(Error::Delimited {
            src: self.named_source(),
            count: errors.len(),
            errors,
        })
    }

    /// Create a missing header column error.
    pub fn missing_header_error(
        &self,
        column: impl Into<String>,
        span: Option<SourceSpan>,
    ) -> Box<Error> {
        Box::new(Error::MissingHeader {
            src: self.named_source(),
            span,
            column: column.into(),
        })
    }

    /// Create a JSON parse error, locating the span from line/column.
    pub fn json_error(&self, source: serde_json::Error) -> Box<Error> {
        let span = offset_of(&self.src, source.line(), source.column())
            .map(|offset| SourceSpan::from((offset, 0)));
        Box::new(Error::Json {
            src: self.named_source(),
            span,
            source,
        })
    }

    /// Create a config parse error from a toml error.
    pub fn config_error(&self, source: toml::de::Error) -> Box<Error> {
        let span = source.span().map(SourceSpan::from);
        Box::new(Error::Config {
            src: self.named_source(),
            span,
            source,
        })
    }

    /// Create a validation error with an optional span.
    pub fn validation_error(
        &self,
        message: impl Into<String>,
        span: Option<SourceSpan>,
    ) -> Box<Error> {
        Box::new(Error::Validation {
            src: self.named_source(),
            span,
            message: message.into(),
        })
    }
}

/// Byte offset of a 1-based line/column position.
fn offset_of(src: &str, line: usize, column: usize) -> Option<usize> {
    if line == 0 {
        return None;
    }
    let line_start: usize = src
        .split_inclusive('\n')
        .take(line - 1)
        .map(str::len)
        .sum();
    Some((line_start + column.saturating_sub(1)).min(src.len()))
}

#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("failed to read '{path}'")]
    #[diagnostic(help("check the path, or run 'tg init' to create a config file"))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse table definitions ({count} row errors)")]
    #[diagnostic(
        code(tablegen::delimited),
        help("every row must have the same number of fields as the header")
    )]
    Delimited {
        #[source_code]
        src: NamedSource<String>,
        count: usize,
        #[related]
        errors: Vec<RowError>,
    },

    #[error("missing required header column '{column}'")]
    #[diagnostic(
        code(tablegen::missing_header),
        help("the first row must name the columns, e.g. TableName, ColName, Type")
    )]
    MissingHeader {
        #[source_code]
        src: NamedSource<String>,
        #[label("header row")]
        span: Option<SourceSpan>,
        column: String,
    },

    #[error("failed to parse JSON table definitions")]
    #[diagnostic(
        code(tablegen::json),
        help("expected an array of tables with camelCase keys")
    )]
    Json {
        #[source_code]
        src: NamedSource<String>,
        #[label("parse error here")]
        span: Option<SourceSpan>,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to parse configuration")]
    #[diagnostic(code(tablegen::config))]
    Config {
        #[source_code]
        src: NamedSource<String>,
        #[label("parse error here")]
        span: Option<SourceSpan>,
        #[source]
        source: toml::de::Error,
    },

    #[error("{message}")]
    #[diagnostic(code(tablegen::validation_error))]
    Validation {
        #[source_code]
        src: NamedSource<String>,
        #[label("{message}")]
        span: Option<SourceSpan>,
        message: String,
    },
}

/// A problem with a single row of delimited input.
///
/// Rows are numbered from 1, counting the header row.
#[derive(Debug, Clone, Error, Diagnostic)]
pub enum RowError {
    #[error("row {row}: expected {expected} fields, found {found}")]
    #[diagnostic(code(tablegen::too_few_fields))]
    TooFewFields {
        row: usize,
        expected: usize,
        found: usize,
        #[label("too few fields")]
        span: SourceSpan,
    },

    #[error("row {row}: expected {expected} fields, found {found}")]
    #[diagnostic(code(tablegen::too_many_fields))]
    TooManyFields {
        row: usize,
        expected: usize,
        found: usize,
        #[label("too many fields")]
        span: SourceSpan,
    },

    #[error("row {row}: unterminated quoted field")]
    #[diagnostic(code(tablegen::unterminated_quote))]
    UnterminatedQuote {
        row: usize,
        #[label("quote opened here")]
        span: SourceSpan,
    },

    #[error("row {row}: index ordinal '{value}' in {slot} is not an integer")]
    #[diagnostic(code(tablegen::invalid_index_ordinal))]
    InvalidIndexOrdinal {
        row: usize,
        slot: String,
        value: String,
        #[label("not an integer")]
        span: SourceSpan,
    },
}

impl RowError {
    /// The 1-based row number.
    pub fn row(&self) -> usize {
        match self {
            RowError::TooFewFields { row, .. }
            | RowError::TooManyFields { row, .. }
            | RowError::UnterminatedQuote { row, .. }
            | RowError::InvalidIndexOrdinal { row, .. } => *row,
        }
    }
}

impl Error {
    /// Row errors carried by a delimited parse failure.
    pub fn row_errors(&self) -> &[RowError] {
        match self {
            Error::Delimited { errors, .. } => errors,
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_of() {
        let src = "ab\ncde\nf";
        assert_eq!(offset_of(src, 1, 1), Some(0));
        assert_eq!(offset_of(src, 2, 2), Some(4));
        assert_eq!(offset_of(src, 3, 1), Some(7));
        assert_eq!(offset_of(src, 0, 0), None);
    }

    #[test]
    fn test_delimited_error_counts_rows() {
        let ctx = SourceContext::new("a\tb\n1\n", "schema.tsv");
        let err = ctx.delimited_error(vec![RowError::TooFewFields {
            row: 2,
            expected: 2,
            found: 1,
            span: (4, 1).into(),
        }]);
        assert_eq!(
            err.to_string(),
            "failed to parse table definitions (1 row errors)"
        );
        assert_eq!(err.row_errors()[0].row(), 2);
    }
}
