//! Multi-sheet xlsx output.

use rust_xlsxwriter::{Format, Workbook};
use tracing::debug;

use crate::error::{Result, SheetMatchError};
use crate::table::{Cell, NamedTable};

use super::TableSink;

/// Writes each named table to its own worksheet.
#[derive(Debug, Clone)]
pub struct XlsxSink {
    bold_header: bool,
}

impl XlsxSink {
    pub fn new() -> Self {
        Self { bold_header: true }
    }

    /// Toggle bold formatting of the header row.
    pub fn with_bold_header(mut self, bold: bool) -> Self {
        self.bold_header = bold;
        self
    }
}

impl Default for XlsxSink {
    fn default() -> Self {
        Self::new()
    }
}

impl TableSink for XlsxSink {
    fn emit(&self, tables: &[NamedTable]) -> Result<Vec<u8>> {
        if tables.is_empty() {
            return Err(SheetMatchError::Config(
                "a workbook needs at least one table".to_string(),
            ));
        }

        let header_format = if self.bold_header {
            Format::new().set_bold()
        } else {
            Format::new()
        };

        let mut workbook = Workbook::new();
        for named in tables {
            let worksheet = workbook.add_worksheet().set_name(&named.name)?;

            for (col, header) in named.table.headers.iter().enumerate() {
                worksheet.write_string_with_format(0, col as u16, header, &header_format)?;
            }

            for (row_idx, row) in named.table.rows.iter().enumerate() {
                let xl_row = row_idx as u32 + 1;
                for (col, cell) in row.iter().enumerate() {
                    let xl_col = col as u16;
                    match cell {
                        _ if cell.is_missing() => {}
                        Cell::Text(s) => {
                            worksheet.write_string(xl_row, xl_col, s)?;
                        }
                        Cell::Number(n) => {
                            worksheet.write_number(xl_row, xl_col, *n)?;
                        }
                        Cell::Bool(b) => {
                            worksheet.write_boolean(xl_row, xl_col, *b)?;
                        }
                        Cell::Empty => {}
                    }
                }
            }

            debug!(
                sheet = %named.name,
                rows = named.table.row_count(),
                "wrote worksheet"
            );
        }

        Ok(workbook.save_to_buffer()?)
    }
}
