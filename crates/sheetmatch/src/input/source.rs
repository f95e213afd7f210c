//! File-backed table sources and their metadata.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::error::{Result, SheetMatchError};
use crate::table::DataTable;

use super::parser::{Parser, ParserConfig};
use super::workbook;
use super::{LoadRequest, TableSource};

/// Broad encoding family of a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceFormat {
    /// Comma, tab, semicolon or pipe separated text.
    Delimited,
    /// Multi-sheet spreadsheet container.
    Workbook,
}

impl SourceFormat {
    /// Pick the format from a file extension (case-insensitive).
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "csv" | "tsv" | "txt" | "psv" => Some(SourceFormat::Delimited),
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Some(SourceFormat::Workbook),
            _ => None,
        }
    }
}

/// Metadata about the source data file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceMetadata {
    /// File name without path.
    pub file: String,
    /// Full path to the file, when loaded from disk.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    /// SHA-256 hash of the file contents.
    pub hash: String,
    /// File size in bytes.
    pub size_bytes: u64,
    /// Lowercased file extension (csv, xlsx, ...).
    pub format: String,
    /// When the file was read.
    pub loaded_at: DateTime<Utc>,
}

impl SourceMetadata {
    fn new(file: String, path: Option<PathBuf>, contents: &[u8], format: String) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(contents);
        let hash = format!("sha256:{:x}", hasher.finalize());

        Self {
            file,
            path,
            hash,
            size_bytes: contents.len() as u64,
            format,
            loaded_at: Utc::now(),
        }
    }
}

/// A source file held in memory, readable as a [`TableSource`].
#[derive(Debug, Clone)]
pub struct SourceFile {
    metadata: SourceMetadata,
    format: SourceFormat,
    contents: Vec<u8>,
    parser: Parser,
}

impl SourceFile {
    /// Read a file from disk.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read(path).map_err(|e| SheetMatchError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let file = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self::build(file, Some(path.to_path_buf()), contents)
    }

    /// Wrap bytes that were received under the given file name.
    pub fn from_bytes(name: impl Into<String>, contents: Vec<u8>) -> Result<Self> {
        Self::build(name.into(), None, contents)
    }

    fn build(file: String, path: Option<PathBuf>, contents: Vec<u8>) -> Result<Self> {
        let extension = Path::new(&file)
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();

        let format = SourceFormat::from_extension(&extension).ok_or_else(|| {
            SheetMatchError::UnsupportedFormat(format!(
                "'{}' (expected csv, tsv, txt, xlsx, xlsm, xlsb, xls or ods)",
                file
            ))
        })?;

        let metadata = SourceMetadata::new(file, path, &contents, extension);
        debug!(file = %metadata.file, hash = %metadata.hash, ?format, "opened source");

        Ok(Self {
            metadata,
            format,
            contents,
            parser: Parser::new(),
        })
    }

    /// Use a custom delimited-text parser configuration.
    pub fn with_parser_config(mut self, config: ParserConfig) -> Self {
        self.parser = Parser::with_config(config);
        self
    }

    pub fn metadata(&self) -> &SourceMetadata {
        &self.metadata
    }

    pub fn format(&self) -> SourceFormat {
        self.format
    }
}

impl TableSource for SourceFile {
    fn identity(&self) -> &str {
        &self.metadata.hash
    }

    /// Sheet names for workbooks; delimited text has none.
    fn sheet_names(&self) -> Result<Vec<String>> {
        match self.format {
            SourceFormat::Delimited => Ok(Vec::new()),
            SourceFormat::Workbook => workbook::sheet_names(&self.contents),
        }
    }

    fn load(&self, request: &LoadRequest) -> Result<DataTable> {
        let table = match self.format {
            SourceFormat::Delimited => {
                if let Some(ref sheet) = request.sheet {
                    debug!(%sheet, "ignoring sheet selection for delimited text");
                }
                self.parser.parse_bytes(&self.contents, request.header_row)?
            }
            SourceFormat::Workbook => workbook::read_sheet(
                &self.contents,
                request.sheet.as_deref(),
                request.header_row,
                self.parser.config().max_rows,
            )?,
        };

        debug!(
            file = %self.metadata.file,
            rows = table.row_count(),
            columns = table.column_count(),
            "loaded table"
        );
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(SourceFormat::from_extension("CSV"), Some(SourceFormat::Delimited));
        assert_eq!(SourceFormat::from_extension("xlsx"), Some(SourceFormat::Workbook));
        assert_eq!(SourceFormat::from_extension("pdf"), None);
    }

    #[test]
    fn test_unsupported_format() {
        let err = SourceFile::from_bytes("report.pdf", b"%PDF".to_vec()).unwrap_err();
        assert!(matches!(err, SheetMatchError::UnsupportedFormat(_)));
        assert!(err.is_load_error());
    }

    #[test]
    fn test_identity_is_content_hash() {
        let a = SourceFile::from_bytes("a.csv", b"x\n1".to_vec()).unwrap();
        let b = SourceFile::from_bytes("b.csv", b"x\n1".to_vec()).unwrap();
        let c = SourceFile::from_bytes("c.csv", b"x\n2".to_vec()).unwrap();

        assert!(a.identity().starts_with("sha256:"));
        assert_eq!(a.identity(), b.identity());
        assert_ne!(a.identity(), c.identity());
        assert_eq!(a.metadata().format, "csv");
        assert_eq!(a.metadata().size_bytes, 3);
    }

    #[test]
    fn test_load_delimited() {
        let source = SourceFile::from_bytes("t.csv", b"title\nid,name\n1,Widget".to_vec()).unwrap();
        assert!(source.sheet_names().unwrap().is_empty());

        let table = source.load(&LoadRequest::new().with_header_row(1)).unwrap();
        assert_eq!(table.headers, vec!["id", "name"]);
        assert_eq!(table.row_count(), 1);
    }
}
