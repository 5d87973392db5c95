//! Tokenizer for delimited (tab- or comma-separated) text.

use std::{fmt, str::FromStr};

use miette::SourceSpan;

use crate::RowError;

/// Field separator of delimited input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Delimiter {
    #[default]
    Tab,
    Comma,
}

impl Delimiter {
    pub fn as_char(&self) -> char {
        match self {
            Delimiter::Tab => '\t',
            Delimiter::Comma => ',',
        }
    }
}

impl fmt::Display for Delimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Delimiter::Tab => write!(f, "tab"),
            Delimiter::Comma => write!(f, "comma"),
        }
    }
}

impl FromStr for Delimiter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tab" | "\t" | "tsv" => Ok(Delimiter::Tab),
            "comma" | "," | "csv" => Ok(Delimiter::Comma),
            other => Err(format!("unknown delimiter '{other}', expected 'tab' or 'comma'")),
        }
    }
}

/// One record of delimited input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    /// 1-based line number where the record starts
    pub row: usize,
    /// Byte range of the record in the source
    pub span: SourceSpan,
    pub fields: Vec<String>,
}

impl RawRow {
    fn is_blank(&self) -> bool {
        self.fields.iter().all(|f| f.trim().is_empty())
    }
}

/// Split delimited text into records.
///
/// Fields may be wrapped in double quotes, in which case they can contain
/// the delimiter, newlines and `""` escapes. Carriage returns outside of
/// quotes are dropped and blank lines are skipped. An unterminated quote is
/// reported; the rows read before it are still returned.
pub fn tokenize(src: &str, delimiter: Delimiter) -> (Vec<RawRow>, Vec<RowError>) {
    let delim = delimiter.as_char();
    let src_body = src.strip_prefix('\u{feff}').unwrap_or(src);
    let base = src.len() - src_body.len();

    let mut rows = Vec::new();
    let mut errors = Vec::new();

    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut quote_start = 0;
    let mut line = 1;
    let mut row_line = 1;
    let mut row_start = base;

    let mut chars = src_body.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        let pos = base + i;
        if in_quotes {
            match c {
                '"' if matches!(chars.peek(), Some((_, '"'))) => {
                    chars.next();
                    field.push('"');
                }
                '"' => in_quotes = false,
                '\n' => {
                    line += 1;
                    field.push(c);
                }
                _ => field.push(c),
            }
            continue;
        }

        match c {
            '"' if field.is_empty() => {
                in_quotes = true;
                quote_start = pos;
            }
            '\r' => {}
            '\n' => {
                fields.push(std::mem::take(&mut field));
                push_row(&mut rows, row_line, row_start, pos, std::mem::take(&mut fields));
                line += 1;
                row_line = line;
                row_start = pos + 1;
            }
            c if c == delim => fields.push(std::mem::take(&mut field)),
            _ => field.push(c),
        }
    }

    if in_quotes {
        errors.push(RowError::UnterminatedQuote {
            row: row_line,
            span: (quote_start, 1).into(),
        });
    } else if !field.is_empty() || !fields.is_empty() {
        fields.push(field);
        push_row(&mut rows, row_line, row_start, src.len(), fields);
    }

    (rows, errors)
}

fn push_row(rows: &mut Vec<RawRow>, row: usize, start: usize, end: usize, fields: Vec<String>) {
    let raw = RawRow {
        row,
        span: (start, end.saturating_sub(start)).into(),
        fields,
    };
    if !raw.is_blank() {
        rows.push(raw);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(rows: &[RawRow]) -> Vec<Vec<&str>> {
        rows.iter()
            .map(|r| r.fields.iter().map(String::as_str).collect())
            .collect()
    }

    #[test]
    fn test_tab_separated() {
        let (rows, errors) = tokenize("a\tb\n1\t2\n", Delimiter::Tab);
        assert!(errors.is_empty());
        assert_eq!(fields(&rows), vec![vec!["a", "b"], vec!["1", "2"]]);
        assert_eq!(rows[1].row, 2);
    }

    #[test]
    fn test_quoted_fields() {
        let src = "a,b\n\"x, y\",\"say \"\"hi\"\"\"\n";
        let (rows, errors) = tokenize(src, Delimiter::Comma);
        assert!(errors.is_empty());
        assert_eq!(fields(&rows)[1], vec!["x, y", "say \"hi\""]);
    }

    #[test]
    fn test_quoted_newline_keeps_row_numbers() {
        let src = "a,b\n\"multi\nline\",2\n3,4";
        let (rows, _) = tokenize(src, Delimiter::Comma);
        assert_eq!(fields(&rows)[1], vec!["multi\nline", "2"]);
        assert_eq!(rows[1].row, 2);
        assert_eq!(rows[2].row, 4);
    }

    #[test]
    fn test_blank_lines_and_crlf() {
        let src = "\u{feff}a\tb\r\n\r\n\t\n1\t2";
        let (rows, errors) = tokenize(src, Delimiter::Tab);
        assert!(errors.is_empty());
        assert_eq!(fields(&rows), vec![vec!["a", "b"], vec!["1", "2"]]);
        assert_eq!(rows[1].row, 4);
    }

    #[test]
    fn test_unterminated_quote() {
        let (rows, errors) = tokenize("a,b\n\"open,2\n", Delimiter::Comma);
        assert_eq!(rows.len(), 1);
        assert!(matches!(errors[0], RowError::UnterminatedQuote { row: 2, .. }));
    }

    #[test]
    fn test_delimiter_from_str() {
        assert_eq!("comma".parse::<Delimiter>(), Ok(Delimiter::Comma));
        assert_eq!("tab".parse::<Delimiter>(), Ok(Delimiter::Tab));
        assert!("pipe".parse::<Delimiter>().is_err());
    }
}
