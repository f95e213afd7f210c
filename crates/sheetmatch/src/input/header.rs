//! Header row selection shared by the delimited and workbook readers.

use std::collections::HashSet;

use crate::error::{Result, SheetMatchError};
use crate::table::{Cell, DataTable};

/// Build a table from raw records using the record at `header_row` as headers.
///
/// Records above the header are discarded and wholly blank records below it
/// are skipped. Columns with a blank header cell are dropped; repeated names
/// become `name.1`, `name.2`, and so on.
pub(crate) fn table_from_records(
    records: Vec<Vec<Cell>>,
    header_row: usize,
    max_rows: Option<usize>,
) -> Result<DataTable> {
    if header_row >= records.len() {
        return Err(SheetMatchError::HeaderRowOutOfRange {
            row: header_row,
            available: records.len(),
        });
    }

    let mut records = records.into_iter().skip(header_row);
    let header = records.next().unwrap_or_default();

    let columns: Vec<(usize, String)> = header
        .iter()
        .enumerate()
        .filter(|(_, cell)| !cell.is_missing())
        .map(|(idx, cell)| (idx, cell.to_text()))
        .collect();

    if columns.is_empty() {
        return Err(SheetMatchError::EmptyData(format!(
            "header row {} has no column names",
            header_row
        )));
    }

    let (indices, names): (Vec<usize>, Vec<String>) = columns.into_iter().unzip();
    let headers = dedupe_headers(names);

    let rows = records
        .filter(|record| !record.iter().all(Cell::is_missing))
        .take(max_rows.unwrap_or(usize::MAX))
        .map(|record| {
            indices
                .iter()
                .map(|&i| record.get(i).cloned().unwrap_or_default())
                .collect()
        })
        .collect();

    Ok(DataTable::new(headers, rows))
}

fn dedupe_headers(names: Vec<String>) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::with_capacity(names.len());
    let mut headers = Vec::with_capacity(names.len());

    for name in names {
        let mut candidate = name.clone();
        let mut suffix = 1;
        while seen.contains(&candidate) {
            candidate = format!("{}.{}", name, suffix);
            suffix += 1;
        }
        seen.insert(candidate.clone());
        headers.push(candidate);
    }

    headers
}
