//! In-memory rectangular table.

use crate::error::{Result, SheetMatchError};

use super::cell::Cell;

/// Represents loaded tabular data.
///
/// Every row holds exactly one cell per header. Constructors pad short rows
/// with `Cell::Empty` and truncate long ones.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataTable {
    /// Column headers, unique within the table.
    pub headers: Vec<String>,
    /// Row data (row-major order).
    pub rows: Vec<Vec<Cell>>,
}

impl DataTable {
    /// Create a new data table.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, Cell::Empty);
                row
            })
            .collect();
        Self { headers, rows }
    }

    /// Create a table with headers and no rows.
    pub fn with_headers(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    /// Build a table of text cells, mostly useful for fixtures.
    pub fn from_text(headers: &[&str], rows: &[&[&str]]) -> Self {
        Self::new(
            headers.iter().map(|h| h.to_string()).collect(),
            rows.iter()
                .map(|row| row.iter().map(|v| Cell::from(*v)).collect())
                .collect(),
        )
    }

    /// Get the number of columns.
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Get the number of rows (excluding header).
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Find a column index by name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Find a column index, failing with `ColumnNotFound` labelled by `table`.
    pub fn require_column(&self, name: &str, table: &str) -> Result<usize> {
        self.column_index(name)
            .ok_or_else(|| SheetMatchError::column_not_found(name, table))
    }

    /// Resolve a list of column names in order.
    pub fn require_columns<S: AsRef<str>>(&self, names: &[S], table: &str) -> Result<Vec<usize>> {
        names
            .iter()
            .map(|name| self.require_column(name.as_ref(), table))
            .collect()
    }

    /// Get all values for a column by index.
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = &Cell> {
        self.rows.iter().map(move |row| &row[index])
    }

    /// Get a column by name.
    pub fn column_by_name(&self, name: &str) -> Option<Vec<&Cell>> {
        let index = self.column_index(name)?;
        Some(self.column_values(index).collect())
    }

    /// Get a specific cell value.
    pub fn get(&self, row: usize, col: usize) -> Option<&Cell> {
        self.rows.get(row).and_then(|r| r.get(col))
    }

    /// Get a cell by row index and column name.
    pub fn get_by_name(&self, row: usize, column: &str) -> Option<&Cell> {
        let col = self.column_index(column)?;
        self.get(row, col)
    }

    /// Replace a cell value. Out-of-range positions are ignored.
    pub fn set(&mut self, row: usize, col: usize, value: Cell) {
        if let Some(cell) = self.rows.get_mut(row).and_then(|r| r.get_mut(col)) {
            *cell = value;
        }
    }

    /// Append a row, padding or truncating it to the table width.
    pub fn push_row(&mut self, mut row: Vec<Cell>) {
        row.resize(self.headers.len(), Cell::Empty);
        self.rows.push(row);
    }

    /// Append a column filled with `default`.
    pub fn add_column(&mut self, name: impl Into<String>, default: Cell) {
        self.headers.push(name.into());
        for row in &mut self.rows {
            row.push(default.clone());
        }
    }

    /// Keep only the given column indices, in the given order.
    pub fn project(&self, indices: &[usize]) -> DataTable {
        DataTable {
            headers: indices.iter().map(|&i| self.headers[i].clone()).collect(),
            rows: self
                .rows
                .iter()
                .map(|row| indices.iter().map(|&i| row[i].clone()).collect())
                .collect(),
        }
    }

    /// Replace all headers positionally.
    pub fn rename_columns(&mut self, headers: Vec<String>) -> Result<()> {
        if headers.len() != self.headers.len() {
            return Err(SheetMatchError::Config(format!(
                "cannot rename {} columns with {} names",
                self.headers.len(),
                headers.len()
            )));
        }
        self.headers = headers;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DataTable {
        DataTable::from_text(
            &["id", "name", "qty"],
            &[&["1", "Widget", "5"], &["2", "Gadget"]],
        )
    }

    #[test]
    fn test_short_rows_are_padded() {
        let table = sample();
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.get(1, 2), Some(&Cell::Empty));
    }

    #[test]
    fn test_require_column() {
        let table = sample();
        assert_eq!(table.require_column("qty", "left").unwrap(), 2);

        let err = table.require_column("color", "left").unwrap_err();
        assert!(matches!(
            err,
            SheetMatchError::ColumnNotFound { ref column, ref table } if column == "color" && table == "left"
        ));
    }

    #[test]
    fn test_project_reorders() {
        let table = sample().project(&[2, 0]);
        assert_eq!(table.headers, vec!["qty", "id"]);
        assert_eq!(table.get(0, 0), Some(&Cell::text("5")));
        assert_eq!(table.get(0, 1), Some(&Cell::text("1")));
    }

    #[test]
    fn test_add_column_and_set() {
        let mut table = sample();
        table.add_column("flag", Cell::Empty);
        let col = table.column_index("flag").unwrap();
        table.set(1, col, Cell::text("x"));
        assert_eq!(table.get_by_name(1, "flag"), Some(&Cell::text("x")));
        assert_eq!(table.get_by_name(0, "flag"), Some(&Cell::Empty));
    }

    #[test]
    fn test_rename_columns_length_mismatch() {
        let mut table = sample();
        assert!(table.rename_columns(vec!["a".into()]).is_err());
        table
            .rename_columns(vec!["a".into(), "b".into(), "c".into()])
            .unwrap();
        assert_eq!(table.headers, vec!["a", "b", "c"]);
    }
}
