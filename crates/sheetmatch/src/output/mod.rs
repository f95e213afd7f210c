//! Serialization of result tables.

mod delimited;
mod xlsx;

use std::fs;
use std::path::Path;

use crate::error::{Result, SheetMatchError};
use crate::table::NamedTable;

pub use delimited::CsvSink;
pub use xlsx::XlsxSink;

/// Turns named tables into a downloadable byte stream.
pub trait TableSink {
    /// Serialize the tables in order. Missing cells are written as blanks.
    fn emit(&self, tables: &[NamedTable]) -> Result<Vec<u8>>;
}

/// Pick a sink from an output file extension.
pub fn sink_for_path(path: &Path) -> Result<Box<dyn TableSink>> {
    let extension = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "xlsx" => Ok(Box::new(XlsxSink::new())),
        "csv" => Ok(Box::new(CsvSink::new())),
        "tsv" => Ok(Box::new(CsvSink::new().with_delimiter(b'\t'))),
        _ => Err(SheetMatchError::UnsupportedFormat(format!(
            "output '{}' (expected .xlsx, .csv or .tsv)",
            path.display()
        ))),
    }
}

/// Emit through `sink` and write the bytes to `path`, creating parent directories.
pub fn write_to_path(sink: &dyn TableSink, tables: &[NamedTable], path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let bytes = sink.emit(tables)?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| SheetMatchError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
    }

    fs::write(path, bytes).map_err(|e| SheetMatchError::Io {
        path: path.to_path_buf(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::DataTable;

    #[test]
    fn test_sink_for_path() {
        assert!(sink_for_path(Path::new("out/result.XLSX")).is_ok());
        assert!(sink_for_path(Path::new("result.csv")).is_ok());
        assert!(matches!(
            sink_for_path(Path::new("result.json")),
            Err(SheetMatchError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_write_to_path_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("out.csv");
        let tables = vec![NamedTable::new(
            "merged",
            DataTable::from_text(&["a"], &[&["1"]]),
        )];

        write_to_path(&CsvSink::new(), &tables, &path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "a\n1\n");
    }
}
