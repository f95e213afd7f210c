//! Table-wide normalization: forward-fill, missing-value collapse, stringify.

use super::cell::Cell;
use super::data::DataTable;

/// Collapse blank, whitespace-only and absent cells to `Cell::Empty`.
pub fn normalize_missing(cell: Cell) -> Cell {
    cell.normalized()
}

/// Apply [`normalize_missing`] to every cell.
pub fn normalize_table(mut table: DataTable) -> DataTable {
    for row in &mut table.rows {
        for cell in row.iter_mut() {
            *cell = std::mem::take(cell).normalized();
        }
    }
    table
}

/// Fill each missing cell with the nearest non-missing value above it.
///
/// Columns are handled independently in row order. Leading missing cells
/// with nothing above them are left untouched. This repairs values lost to
/// merged-cell layouts in source spreadsheets.
pub fn forward_fill(table: DataTable) -> DataTable {
    forward_fill_except(table, &[])
}

/// [`forward_fill`] that leaves the columns at `skip` as they are.
pub fn forward_fill_except(mut table: DataTable, skip: &[usize]) -> DataTable {
    let mut last_seen: Vec<Option<Cell>> = vec![None; table.column_count()];

    for row in &mut table.rows {
        for (col, (cell, last)) in row.iter_mut().zip(last_seen.iter_mut()).enumerate() {
            if skip.contains(&col) {
                continue;
            }
            if cell.is_missing() {
                if let Some(value) = last {
                    *cell = value.clone();
                }
            } else {
                *last = Some(cell.clone());
            }
        }
    }

    table
}

/// Render every cell to its textual form.
///
/// Missing values become `Cell::Empty`; everything else becomes `Cell::Text`.
/// Used before cross-table comparison so `5` and `"5"` compare equal.
pub fn stringify(mut table: DataTable) -> DataTable {
    for row in &mut table.rows {
        for cell in row.iter_mut() {
            *cell = if cell.is_missing() {
                Cell::Empty
            } else {
                Cell::Text(cell.to_text())
            };
        }
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_fill_merged_cells() {
        let table = DataTable::from_text(
            &["order", "style", "qty"],
            &[
                &["", "S1", "1"],
                &["A1", "", "2"],
                &["", "S2", " "],
                &["", "", "4"],
            ],
        );
        let filled = forward_fill(table);

        assert_eq!(filled.get(0, 0), Some(&Cell::text("")));
        assert_eq!(filled.get(1, 0), Some(&Cell::text("A1")));
        assert_eq!(filled.get(2, 0), Some(&Cell::text("A1")));
        assert_eq!(filled.get(3, 0), Some(&Cell::text("A1")));
        assert_eq!(filled.get(1, 1), Some(&Cell::text("S1")));
        assert_eq!(filled.get(3, 1), Some(&Cell::text("S2")));
        assert_eq!(filled.get(2, 2), Some(&Cell::text("2")));
    }

    #[test]
    fn test_forward_fill_keeps_types() {
        let table = DataTable::new(
            vec!["n".into()],
            vec![vec![Cell::Number(3.0)], vec![Cell::Empty]],
        );
        let filled = forward_fill(table);
        assert_eq!(filled.get(1, 0), Some(&Cell::Number(3.0)));
    }

    #[test]
    fn test_forward_fill_except_skips_columns() {
        let table = DataTable::from_text(&["id", "name"], &[&["X", "Apple"], &["", ""], &["Y", ""]]);
        let filled = forward_fill_except(normalize_table(table), &[1]);

        assert_eq!(filled.get(1, 0), Some(&Cell::text("X")));
        assert_eq!(filled.get(1, 1), Some(&Cell::Empty));
        assert_eq!(filled.get(2, 1), Some(&Cell::Empty));
    }

    #[test]
    fn test_normalize_table() {
        let table = DataTable::from_text(&["a", "b"], &[&[" ", "x "]]);
        let normalized = normalize_table(table);
        assert_eq!(normalized.get(0, 0), Some(&Cell::Empty));
        assert_eq!(normalized.get(0, 1), Some(&Cell::text("x ")));
        assert_eq!(normalize_missing(Cell::text("\t")), Cell::Empty);
    }

    #[test]
    fn test_stringify() {
        let table = DataTable::new(
            vec!["a".into(), "b".into(), "c".into(), "d".into()],
            vec![vec![
                Cell::Number(5.0),
                Cell::Bool(false),
                Cell::text(""),
                Cell::text("abc"),
            ]],
        );
        let table = stringify(table);
        assert_eq!(
            table.rows[0],
            vec![
                Cell::text("5"),
                Cell::text("FALSE"),
                Cell::Empty,
                Cell::text("abc")
            ]
        );
    }
}
