//! CSV/TSV parser with delimiter detection and header row selection.

use std::cmp::Reverse;
use std::collections::HashMap;

use tracing::debug;

use crate::error::{Result, SheetMatchError};
use crate::table::{Cell, DataTable};

use super::header::table_from_records;

/// Delimiters to try when auto-detecting.
const DELIMITERS: &[u8] = &[b'\t', b',', b';', b'|'];

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Parser configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserConfig {
    /// Delimiter to use (None = auto-detect).
    pub delimiter: Option<u8>,
    /// Maximum data rows to read (None = all).
    pub max_rows: Option<usize>,
    /// Quote character.
    pub quote: u8,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            delimiter: None,
            max_rows: None,
            quote: b'"',
        }
    }
}

/// Parses delimited text files.
#[derive(Debug, Clone, Default)]
pub struct Parser {
    config: ParserConfig,
}

impl Parser {
    /// Create a new parser with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a parser with custom configuration.
    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parse delimited bytes, taking column names from record `header_row`.
    pub fn parse_bytes(&self, bytes: &[u8], header_row: usize) -> Result<DataTable> {
        let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);

        let delimiter = match self.config.delimiter {
            Some(d) => d,
            None => detect_delimiter(bytes, self.config.quote)?,
        };
        debug!(delimiter = %(delimiter as char).escape_default(), "parsing delimited text");

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(false)
            .quote(self.config.quote)
            .flexible(true)
            .from_reader(bytes);

        let mut records = Vec::new();
        for result in reader.byte_records() {
            let record = result?;
            let row: Vec<Cell> = record
                .iter()
                .map(|field| {
                    if field.is_empty() {
                        Cell::Empty
                    } else {
                        Cell::Text(String::from_utf8_lossy(field).into_owned())
                    }
                })
                .collect();
            records.push(row);
        }

        if records.is_empty() {
            return Err(SheetMatchError::EmptyData("No records found".to_string()));
        }

        table_from_records(records, header_row, self.config.max_rows)
    }
}

/// Non-blank lines sampled when detecting the delimiter.
const SAMPLE_LINES: usize = 20;

/// How well one candidate delimiter explains the sampled lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct DelimiterFit {
    /// Lines sharing the most common separator count.
    agreeing: usize,
    /// That separator count.
    separators: usize,
}

/// Pick the delimiter whose separator count agrees across the most lines.
///
/// Lines without the candidate (report titles above the header row) do not
/// count against it. Ties go to the larger count, then to earlier entries of
/// [`DELIMITERS`].
pub(crate) fn detect_delimiter(bytes: &[u8], quote: u8) -> Result<u8> {
    let text = String::from_utf8_lossy(bytes);
    let lines: Vec<&str> = text
        .lines()
        .filter(|l| !l.trim().is_empty())
        .take(SAMPLE_LINES)
        .collect();

    if lines.is_empty() {
        return Err(SheetMatchError::EmptyData("No lines to analyze".to_string()));
    }

    let best = DELIMITERS
        .iter()
        .enumerate()
        .filter_map(|(rank, &delim)| fit(&lines, delim, quote).map(|f| (f, rank, delim)))
        .max_by_key(|&(f, rank, _)| (f.agreeing, f.separators, Reverse(rank)))
        .map(|(_, _, delim)| delim);

    Ok(best.unwrap_or(b','))
}

fn fit(lines: &[&str], delimiter: u8, quote: u8) -> Option<DelimiterFit> {
    let mut lines_by_count: HashMap<usize, usize> = HashMap::new();
    for line in lines {
        let separators = count_unquoted(line, delimiter, quote);
        if separators > 0 {
            *lines_by_count.entry(separators).or_default() += 1;
        }
    }

    lines_by_count
        .into_iter()
        .max_by_key(|&(separators, agreeing)| (agreeing, separators))
        .map(|(separators, agreeing)| DelimiterFit { agreeing, separators })
}

/// Occurrences of `delimiter` outside quoted sections of `line`.
fn count_unquoted(line: &str, delimiter: u8, quote: u8) -> usize {
    line.bytes()
        .scan(false, |quoted, b| {
            if b == quote {
                *quoted = !*quoted;
            }
            Some(b == delimiter && !*quoted)
        })
        .filter(|&hit| hit)
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_delimiter_csv() {
        let data = b"a,b,c\n1,2,3\n4,5,6";
        assert_eq!(detect_delimiter(data, b'"').unwrap(), b',');
    }

    #[test]
    fn test_detect_delimiter_tsv() {
        let data = b"a\tb\tc\n1\t2\t3\n4\t5\t6";
        assert_eq!(detect_delimiter(data, b'"').unwrap(), b'\t');
    }

    #[test]
    fn test_detect_delimiter_ignores_quoted() {
        let data = b"name;note\n\"Smith, J\";x\n\"Doe, A\";y";
        assert_eq!(detect_delimiter(data, b'"').unwrap(), b';');
    }

    #[test]
    fn test_detect_delimiter_below_title_lines() {
        // Title and a stray comma above a semicolon table.
        let data = b"Stock report\nWeek 12, draft\nsku;size;qty\nA;M;3\nB;L;1\nC;S;0";
        assert_eq!(detect_delimiter(data, b'"').unwrap(), b';');
    }

    #[test]
    fn test_detect_delimiter_custom_quote() {
        let data = b"name,note\n'a|b',x\n'c|d',y";
        assert_eq!(detect_delimiter(data, b'\'').unwrap(), b',');
    }

    #[test]
    fn test_detect_delimiter_blank_input() {
        assert!(matches!(
            detect_delimiter(b"\n  \n", b'"'),
            Err(SheetMatchError::EmptyData(_))
        ));
    }

    #[test]
    fn test_parse_csv() {
        let parser = Parser::new();
        let data = b"name,age,city\nAlice,30,NYC\nBob,,LA";
        let table = parser.parse_bytes(data, 0).unwrap();

        assert_eq!(table.headers, vec!["name", "age", "city"]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.get(0, 0), Some(&Cell::text("Alice")));
        assert_eq!(table.get(1, 1), Some(&Cell::Empty));
    }

    #[test]
    fn test_parse_with_title_rows_and_bom() {
        let parser = Parser::new();
        let data = "\u{feff}Report,,\nGenerated,2024,\norder,style,qty\nA1,S1,5\n".as_bytes();
        let table = parser.parse_bytes(data, 2).unwrap();

        assert_eq!(table.headers, vec!["order", "style", "qty"]);
        assert_eq!(table.get_by_name(0, "qty"), Some(&Cell::text("5")));
    }

    #[test]
    fn test_parse_fixed_delimiter() {
        let parser = Parser::with_config(ParserConfig {
            delimiter: Some(b'|'),
            ..ParserConfig::default()
        });
        let table = parser.parse_bytes(b"a|b\n1|2", 0).unwrap();
        assert_eq!(table.headers, vec!["a", "b"]);
    }

    #[test]
    fn test_parse_empty_input() {
        let parser = Parser::new();
        assert!(matches!(
            parser.parse_bytes(b"", 0),
            Err(SheetMatchError::EmptyData(_))
        ));
    }
}
