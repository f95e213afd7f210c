//! Composite key tuples and first-wins de-duplication.

use std::fmt;

use indexmap::IndexMap;
use indexmap::map::Entry;

use super::cell::Cell;
use super::data::DataTable;

/// An ordered tuple of normalized cell values drawn from key columns.
///
/// Components hold the textual form of each cell with missing values mapped
/// to `""`, so two tuples compare equal iff every normalized value matches.
/// No numeric coercion happens beyond the integral rendering of numbers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyTuple(Box<[String]>);

impl KeyTuple {
    /// Build a key from the cells at `indices` within `row`.
    pub fn from_row(row: &[Cell], indices: &[usize]) -> Self {
        Self(indices.iter().map(|&i| row[i].to_text()).collect())
    }

    /// Key components in column order.
    pub fn values(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for KeyTuple {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for KeyTuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})", self.0.join(", "))
    }
}

/// Map each distinct key tuple to the index of its first row.
///
/// Iteration order of the returned map follows first occurrence.
pub fn first_wins_index(table: &DataTable, key_indices: &[usize]) -> IndexMap<KeyTuple, usize> {
    let mut index = IndexMap::with_capacity(table.row_count());
    for (row_idx, row) in table.rows.iter().enumerate() {
        if let Entry::Vacant(slot) = index.entry(KeyTuple::from_row(row, key_indices)) {
            slot.insert(row_idx);
        }
    }
    index
}

/// Drop rows whose key tuple already appeared earlier in the table.
pub fn dedup_first_wins(table: &DataTable, key_indices: &[usize]) -> DataTable {
    let index = first_wins_index(table, key_indices);
    let rows = index
        .values()
        .map(|&row_idx| table.rows[row_idx].clone())
        .collect();
    DataTable::new(table.headers.clone(), rows)
}
