//! Single-table CSV/TSV output.

use crate::error::{Result, SheetMatchError};
use crate::table::NamedTable;

use super::TableSink;

/// Writes exactly one table as delimited text.
#[derive(Debug, Clone)]
pub struct CsvSink {
    delimiter: u8,
}

impl CsvSink {
    pub fn new() -> Self {
        Self { delimiter: b',' }
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }
}

impl Default for CsvSink {
    fn default() -> Self {
        Self::new()
    }
}

impl TableSink for CsvSink {
    fn emit(&self, tables: &[NamedTable]) -> Result<Vec<u8>> {
        let [named] = tables else {
            return Err(SheetMatchError::Config(format!(
                "delimited output holds exactly one table, got {}",
                tables.len()
            )));
        };

        let mut writer = csv::WriterBuilder::new()
            .delimiter(self.delimiter)
            .from_writer(Vec::new());

        writer.write_record(&named.table.headers)?;
        for row in &named.table.rows {
            writer.write_record(row.iter().map(|cell| cell.to_text()))?;
        }

        writer.into_inner().map_err(|e| SheetMatchError::Io {
            path: named.name.clone().into(),
            source: e.into_error(),
        })
    }
}
