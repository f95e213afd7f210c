//! Spreadsheet workbook reader (xlsx, xlsm, xlsb, xls, ods).

use std::io::Cursor;

use calamine::{Data, Reader, open_workbook_auto_from_rs};
use chrono::Timelike;
use tracing::debug;

use crate::error::{Result, SheetMatchError};
use crate::table::{Cell, DataTable};

use super::header::table_from_records;

/// List the sheet names of a workbook held in memory.
pub fn sheet_names(bytes: &[u8]) -> Result<Vec<String>> {
    let workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;
    Ok(workbook.sheet_names().to_vec())
}

/// Read one sheet of a workbook, using record `header_row` as headers.
///
/// With no `sheet`, the first sheet is read.
pub fn read_sheet(
    bytes: &[u8],
    sheet: Option<&str>,
    header_row: usize,
    max_rows: Option<usize>,
) -> Result<DataTable> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;
    let names: Vec<String> = workbook.sheet_names().to_vec();

    let sheet_name = match sheet {
        Some(name) if names.iter().any(|n| n == name) => name.to_string(),
        Some(name) => return Err(SheetMatchError::SheetNotFound(name.to_string())),
        None => names
            .first()
            .cloned()
            .ok_or_else(|| SheetMatchError::EmptyData("Workbook contains no sheets".to_string()))?,
    };

    let range = workbook.worksheet_range(&sheet_name)?;
    let (height, width) = range.get_size();
    debug!(sheet = %sheet_name, height, width, "reading worksheet");

    // The range starts at the first used cell; rows above it are blank.
    let start_row = range.start().map(|(row, _)| row as usize).unwrap_or(0);
    let mut records: Vec<Vec<Cell>> = vec![Vec::new(); start_row];
    records.extend(range.rows().map(|row| row.iter().map(convert_cell).collect()));

    table_from_records(records, header_row, max_rows)
}

fn convert_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) if s.is_empty() => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Float(n) => Cell::Number(*n),
        Data::Int(n) => Cell::Number(*n as f64),
        Data::Bool(b) => Cell::Bool(*b),
        Data::Error(e) => Cell::Text(e.to_string()),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(value) if value.time().num_seconds_from_midnight() == 0 => {
                Cell::Text(value.format("%Y-%m-%d").to_string())
            }
            Some(value) => Cell::Text(value.format("%Y-%m-%d %H:%M:%S").to_string()),
            None => Cell::Number(dt.as_f64()),
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::CellErrorType;

    #[test]
    fn test_convert_cell() {
        assert_eq!(convert_cell(&Data::Empty), Cell::Empty);
        assert_eq!(convert_cell(&Data::String(String::new())), Cell::Empty);
        assert_eq!(convert_cell(&Data::String("Red".into())), Cell::text("Red"));
        assert_eq!(convert_cell(&Data::Int(4)), Cell::Number(4.0));
        assert_eq!(convert_cell(&Data::Float(2.5)), Cell::Number(2.5));
        assert_eq!(convert_cell(&Data::Bool(true)), Cell::Bool(true));
        assert_eq!(
            convert_cell(&Data::DateTimeIso("2024-03-01".into())),
            Cell::text("2024-03-01")
        );
    }

    #[test]
    fn test_error_cells_keep_excel_text() {
        assert_eq!(convert_cell(&Data::Error(CellErrorType::Div0)), Cell::text("#DIV/0!"));
        assert_eq!(convert_cell(&Data::Error(CellErrorType::NA)), Cell::text("#N/A"));
        assert_eq!(convert_cell(&Data::Error(CellErrorType::Ref)), Cell::text("#REF!"));
    }

    #[test]
    fn test_read_garbage_is_workbook_error() {
        assert!(matches!(
            read_sheet(b"not a workbook", None, 0, None),
            Err(SheetMatchError::Workbook(_))
        ));
    }
}
