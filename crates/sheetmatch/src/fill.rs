//! Intra-table gap filling using donor rows as a lookup dictionary.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Result, SheetMatchError};
use crate::table::{Cell, DataTable, KeyTuple};

/// Audit information for a single filled cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilledCell {
    /// Row index (0-based) that received a value.
    pub row: usize,
    /// Key tuple the row was matched on.
    pub key: Vec<String>,
    /// Value written into the target column.
    pub value: String,
    /// Row index of the donor that supplied the value.
    pub donor_row: usize,
}

/// Result details of a fill pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FillReport {
    /// Target column that was filled.
    pub column: String,
    /// Number of distinct keys with a donor value.
    pub dictionary_size: usize,
    /// Every cell that was filled, in row order.
    pub filled: Vec<FilledCell>,
    /// Rows whose target stayed EMPTY because no donor matched.
    pub unfilled: usize,
}

impl FillReport {
    pub fn values_filled(&self) -> usize {
        self.filled.len()
    }
}

/// Fills missing target values from rows sharing the same match key.
#[derive(Debug, Clone, Copy, Default)]
pub struct DictionaryFiller;

impl DictionaryFiller {
    /// Create a new filler.
    pub fn new() -> Self {
        Self
    }

    /// Fill EMPTY cells of `target_col` from donors with the same key tuple.
    pub fn fill(&self, table: &DataTable, match_cols: &[String], target_col: &str) -> Result<DataTable> {
        self.fill_with_audit(table, match_cols, target_col)
            .map(|(table, _)| table)
    }

    /// Same as [`DictionaryFiller::fill`], also returning per-cell audit records.
    pub fn fill_with_audit(
        &self,
        table: &DataTable,
        match_cols: &[String],
        target_col: &str,
    ) -> Result<(DataTable, FillReport)> {
        if match_cols.is_empty() {
            return Err(SheetMatchError::Config(
                "at least one match column is required".to_string(),
            ));
        }
        if match_cols.iter().any(|c| c == target_col) {
            return Err(SheetMatchError::Config(format!(
                "target column '{}' is also a match column",
                target_col
            )));
        }

        let key_indices = table.require_columns(match_cols, "source")?;
        let target = table.require_column(target_col, "source")?;

        let mut output = table.clone();
        for row in &mut output.rows {
            row[target] = std::mem::take(&mut row[target]).normalized();
        }

        // Donor dictionary: first non-empty target per key tuple.
        let mut dictionary: HashMap<KeyTuple, usize> = HashMap::new();
        for (row_idx, row) in output.rows.iter().enumerate() {
            if row[target] == Cell::Empty {
                continue;
            }
            if let Entry::Vacant(slot) = dictionary.entry(KeyTuple::from_row(row, &key_indices)) {
                slot.insert(row_idx);
            }
        }
        debug!(donor_keys = dictionary.len(), "built donor dictionary");

        let mut report = FillReport {
            column: target_col.to_string(),
            dictionary_size: dictionary.len(),
            ..FillReport::default()
        };

        for row_idx in 0..output.row_count() {
            if output.rows[row_idx][target] != Cell::Empty {
                continue;
            }
            let key = KeyTuple::from_row(&output.rows[row_idx], &key_indices);
            match dictionary.get(&key) {
                Some(&donor_row) => {
                    let value = output.rows[donor_row][target].clone();
                    report.filled.push(FilledCell {
                        row: row_idx,
                        key: key.values().to_vec(),
                        value: value.to_text(),
                        donor_row,
                    });
                    output.rows[row_idx][target] = value;
                }
                None => report.unfilled += 1,
            }
        }

        info!(
            column = target_col,
            filled = report.values_filled(),
            unfilled = report.unfilled,
            "fill complete"
        );

        Ok((output, report))
    }
}
