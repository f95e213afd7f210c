//! Three-way diff between an old and a new version of a table.
//!
//! Rows are identified by a composite key. Each distinct key lands in exactly
//! one bucket: added, removed, modified, or unchanged.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Result, SheetMatchError};
use crate::table::{Cell, DataTable, KeyTuple, NamedTable, dedup_first_wins, first_wins_index, stringify};

/// Name of the change description column in the modified table.
pub const DETAIL_COLUMN: &str = "detail";
/// Separator between per-field change descriptions.
pub const DETAIL_SEPARATOR: &str = "; ";

/// Which columns identify and which columns are compared on each side.
///
/// Old and new lists correspond positionally; output uses the new names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffSpec {
    pub old_keys: Vec<String>,
    pub new_keys: Vec<String>,
    pub old_compare: Vec<String>,
    pub new_compare: Vec<String>,
}

impl DiffSpec {
    /// Same key and compare column names on both sides.
    pub fn same<K, C>(keys: K, compare: C) -> Self
    where
        K: IntoIterator,
        K::Item: Into<String>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        let keys: Vec<String> = keys.into_iter().map(Into::into).collect();
        let compare: Vec<String> = compare.into_iter().map(Into::into).collect();
        Self {
            old_keys: keys.clone(),
            new_keys: keys,
            old_compare: compare.clone(),
            new_compare: compare,
        }
    }

    /// Swap the old and new sides.
    pub fn reversed(&self) -> Self {
        Self {
            old_keys: self.new_keys.clone(),
            new_keys: self.old_keys.clone(),
            old_compare: self.new_compare.clone(),
            new_compare: self.old_compare.clone(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        check_pair("key", &self.old_keys, &self.new_keys)?;
        check_pair("compare", &self.old_compare, &self.new_compare)?;

        for (side, keys, compare) in [
            ("old", &self.old_keys, &self.old_compare),
            ("new", &self.new_keys, &self.new_compare),
        ] {
            let mut seen = HashSet::new();
            if let Some(dup) = keys.iter().chain(compare).find(|c| !seen.insert(c.as_str())) {
                return Err(SheetMatchError::Config(format!(
                    "{} column '{}' is listed more than once across keys and compare columns",
                    side, dup
                )));
            }
        }

        let mut seen = HashSet::new();
        if let Some(dup) = modified_headers(&self.new_keys, &self.new_compare)
            .into_iter()
            .find(|h| !seen.insert(h.clone()))
        {
            return Err(SheetMatchError::Config(format!(
                "modified table would have two columns named '{}'; rename the key column",
                dup
            )));
        }
        Ok(())
    }

    fn new_columns(&self) -> Vec<String> {
        self.new_keys.iter().chain(&self.new_compare).cloned().collect()
    }
}

fn check_pair(label: &str, old: &[String], new: &[String]) -> Result<()> {
    if old.is_empty() || new.is_empty() {
        return Err(SheetMatchError::Config(format!(
            "{} column lists must not be empty",
            label
        )));
    }
    if old.len() != new.len() {
        return Err(SheetMatchError::Config(format!(
            "{} column lists differ in length: {} old vs {} new",
            label,
            old.len(),
            new.len()
        )));
    }
    Ok(())
}

/// Output of a diff.
#[derive(Debug, Clone, PartialEq)]
pub struct DiffResult {
    /// Keys only in the new table: keys + new compare values.
    pub added: DataTable,
    /// Keys only in the old table: keys + old compare values.
    pub removed: DataTable,
    /// Keys in both with at least one differing compare value.
    pub modified: DataTable,
    /// Keys in both with identical compare values.
    pub unchanged: usize,
}

impl DiffResult {
    /// Number of distinct keys seen across both tables.
    pub fn total_keys(&self) -> usize {
        self.added.row_count() + self.removed.row_count() + self.modified.row_count() + self.unchanged
    }

    pub fn has_changes(&self) -> bool {
        !(self.added.is_empty() && self.removed.is_empty() && self.modified.is_empty())
    }

    /// Sheets `added`, `removed`, `modified`, in that order.
    pub fn into_named_tables(self) -> Vec<NamedTable> {
        vec![
            NamedTable::new("added", self.added),
            NamedTable::new("removed", self.removed),
            NamedTable::new("modified", self.modified),
        ]
    }
}

/// Classifies rows of two table versions by composite key.
#[derive(Debug, Clone, Copy, Default)]
pub struct VersionDiffer;

impl VersionDiffer {
    /// Create a new differ.
    pub fn new() -> Self {
        Self
    }

    pub fn diff(&self, old: &DataTable, new: &DataTable, spec: &DiffSpec) -> Result<DiffResult> {
        spec.validate()?;

        let old_columns: Vec<String> = spec.old_keys.iter().chain(&spec.old_compare).cloned().collect();
        let old_indices = old.require_columns(&old_columns, "old")?;
        let new_indices = new.require_columns(&spec.new_columns(), "new")?;

        let key_count = spec.new_keys.len();
        let key_indices: Vec<usize> = (0..key_count).collect();

        let mut old_projected = old.project(&old_indices);
        old_projected.rename_columns(spec.new_columns())?;
        let old_side = stringify(dedup_first_wins(&old_projected, &key_indices));
        let new_side = stringify(dedup_first_wins(&new.project(&new_indices), &key_indices));
        debug!(
            old_rows = old_side.row_count(),
            new_rows = new_side.row_count(),
            "collapsed duplicate keys"
        );

        let new_lookup = first_wins_index(&new_side, &key_indices);
        let mut matched_new = vec![false; new_side.row_count()];

        let headers = old_side.headers.clone();
        let mut removed = DataTable::with_headers(headers.clone());
        let mut modified = DataTable::with_headers(modified_headers(&spec.new_keys, &spec.new_compare));
        let mut unchanged = 0;

        for old_row in &old_side.rows {
            let key = KeyTuple::from_row(old_row, &key_indices);
            let Some(&new_idx) = new_lookup.get(&key) else {
                removed.rows.push(old_row.clone());
                continue;
            };
            matched_new[new_idx] = true;

            let new_row = &new_side.rows[new_idx];
            match compare_rows(&headers[key_count..], &old_row[key_count..], &new_row[key_count..]) {
                Some((pairs, detail)) => {
                    let mut row: Vec<Cell> = old_row[..key_count].to_vec();
                    row.extend(pairs);
                    row.push(Cell::Text(detail));
                    modified.rows.push(row);
                }
                None => unchanged += 1,
            }
        }

        let mut added = DataTable::with_headers(headers);
        added.rows = new_side
            .rows
            .iter()
            .zip(&matched_new)
            .filter(|(_, matched)| !**matched)
            .map(|(row, _)| row.clone())
            .collect();

        let result = DiffResult {
            added,
            removed,
            modified,
            unchanged,
        };
        info!(
            added = result.added.row_count(),
            removed = result.removed.row_count(),
            modified = result.modified.row_count(),
            unchanged = result.unchanged,
            "diff complete"
        );
        Ok(result)
    }
}

/// Keys, then `<col>_old` / `<col>_new` per compare column, then the detail.
fn modified_headers(keys: &[String], compare: &[String]) -> Vec<String> {
    let mut headers = keys.to_vec();
    for column in compare {
        headers.push(format!("{}_old", column));
        headers.push(format!("{}_new", column));
    }
    headers.push(DETAIL_COLUMN.to_string());
    headers
}

/// Compare trimmed values column by column.
///
/// Returns the interleaved old/new cells and the change description, or
/// `None` when every column matches.
fn compare_rows(columns: &[String], old: &[Cell], new: &[Cell]) -> Option<(Vec<Cell>, String)> {
    let mut pairs = Vec::with_capacity(columns.len() * 2);
    let mut changes = Vec::new();

    for ((column, old_cell), new_cell) in columns.iter().zip(old).zip(new) {
        let old_text = old_cell.to_text();
        let new_text = new_cell.to_text();
        let (old_value, new_value) = (old_text.trim(), new_text.trim());

        if old_value != new_value {
            changes.push(format!("{} changed from {} to {}", column, old_value, new_value));
        }
        pairs.push(Cell::from(old_value).normalized());
        pairs.push(Cell::from(new_value).normalized());
    }

    if changes.is_empty() {
        None
    } else {
        Some((pairs, changes.join(DETAIL_SEPARATOR)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diff_scenario() {
        let old = DataTable::from_text(&["id", "qty"], &[&["1", "5"]]);
        let new = DataTable::from_text(&["id", "qty"], &[&["1", "7"], &["2", "3"]]);

        let result = VersionDiffer::new()
            .diff(&old, &new, &DiffSpec::same(["id"], ["qty"]))
            .unwrap();

        assert_eq!(result.added, DataTable::from_text(&["id", "qty"], &[&["2", "3"]]));
        assert!(result.removed.is_empty());
        assert_eq!(
            result.modified,
            DataTable::from_text(
                &["id", "qty_old", "qty_new", "detail"],
                &[&["1", "5", "7", "qty changed from 5 to 7"]],
            )
        );
        assert_eq!(result.unchanged, 0);
    }

    #[test]
    fn test_diff_multiple_fields_and_unchanged_rows() {
        let old = DataTable::from_text(
            &["sku", "size", "price", "stock"],
            &[
                &["A", "M", "10", "3"],
                &["B", "L", "12", "1"],
                &["C", "S", "8", "0"],
            ],
        );
        let new = DataTable::from_text(
            &["sku", "size", "price", "stock"],
            &[&["C", "S", " 8 ", "0"], &["A", "M", "11", "4"]],
        );

        let result = VersionDiffer::new()
            .diff(&old, &new, &DiffSpec::same(["sku", "size"], ["price", "stock"]))
            .unwrap();

        assert_eq!(result.unchanged, 1);
        assert_eq!(result.removed.row_count(), 1);
        assert_eq!(result.removed.get(0, 0), Some(&Cell::text("B")));
        assert!(result.added.is_empty());
        assert_eq!(
            result.modified.get_by_name(0, DETAIL_COLUMN),
            Some(&Cell::text("price changed from 10 to 11; stock changed from 3 to 4"))
        );
        assert_eq!(result.total_keys(), 3);
    }

    #[test]
    fn test_diff_renames_old_columns() {
        let old = DataTable::from_text(&["Order No", "Qty"], &[&["P1", "5"], &["P2", "1"]]);
        let new = DataTable::from_text(&["order", "quantity", "note"], &[&["P1", "6", "x"]]);
        let spec = DiffSpec {
            old_keys: vec!["Order No".into()],
            new_keys: vec!["order".into()],
            old_compare: vec!["Qty".into()],
            new_compare: vec!["quantity".into()],
        };

        let result = VersionDiffer::new().diff(&old, &new, &spec).unwrap();

        assert_eq!(result.removed.headers, vec!["order", "quantity"]);
        assert_eq!(
            result.modified.headers,
            vec!["order", "quantity_old", "quantity_new", "detail"]
        );
    }

    #[test]
    fn test_diff_numbers_and_text_compare_equal() {
        let old = DataTable::new(
            vec!["id".into(), "qty".into()],
            vec![vec![Cell::Number(1.0), Cell::Number(5.0)]],
        );
        let new = DataTable::from_text(&["id", "qty"], &[&["1", "5"]]);

        let result = VersionDiffer::new()
            .diff(&old, &new, &DiffSpec::same(["id"], ["qty"]))
            .unwrap();

        assert!(!result.has_changes());
        assert_eq!(result.unchanged, 1);
    }

    #[test]
    fn test_diff_duplicate_keys_first_wins() {
        let old = DataTable::from_text(&["id", "v"], &[&["1", "a"], &["1", "b"]]);
        let new = DataTable::from_text(&["id", "v"], &[&["1", "a"]]);

        let result = VersionDiffer::new()
            .diff(&old, &new, &DiffSpec::same(["id"], ["v"]))
            .unwrap();

        assert_eq!(result.unchanged, 1);
        assert!(!result.has_changes());
    }

    #[test]
    fn test_diff_configuration_errors() {
        let table = DataTable::from_text(&["id", "v"], &[&["1", "a"]]);
        let differ = VersionDiffer::new();

        let mismatched = DiffSpec {
            old_keys: vec!["id".into()],
            new_keys: vec!["id".into(), "v".into()],
            old_compare: vec!["v".into()],
            new_compare: vec!["v".into()],
        };
        assert!(matches!(
            differ.diff(&table, &table, &mismatched),
            Err(SheetMatchError::Config(_))
        ));

        let overlapping = DiffSpec::same(["id"], ["id"]);
        assert!(matches!(
            differ.diff(&table, &table, &overlapping),
            Err(SheetMatchError::Config(_))
        ));

        let no_compare = DiffSpec::same(["id"], Vec::<String>::new());
        assert!(matches!(
            differ.diff(&table, &table, &no_compare),
            Err(SheetMatchError::Config(_))
        ));

        let missing = DiffSpec::same(["id"], ["qty"]);
        assert!(matches!(
            differ.diff(&table, &table, &missing),
            Err(SheetMatchError::ColumnNotFound { ref table, .. }) if table == "old"
        ));
    }

    #[test]
    fn test_key_clashing_with_generated_column_rejected() {
        let old = DataTable::from_text(&["qty_old", "qty"], &[&["1", "5"]]);
        let new = old.clone();
        let differ = VersionDiffer::new();

        assert!(matches!(
            differ.diff(&old, &new, &DiffSpec::same(["qty_old"], ["qty"])),
            Err(SheetMatchError::Config(_))
        ));

        let old = DataTable::from_text(&["detail", "qty"], &[&["1", "5"]]);
        assert!(matches!(
            differ.diff(&old, &old, &DiffSpec::same(["detail"], ["qty"])),
            Err(SheetMatchError::Config(_))
        ));
    }

    #[test]
    fn test_into_named_tables_order() {
        let table = DataTable::from_text(&["id", "v"], &[&["1", "a"]]);
        let names: Vec<String> = VersionDiffer::new()
            .diff(&table, &table, &DiffSpec::same(["id"], ["v"]))
            .unwrap()
            .into_named_tables()
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(names, vec!["added", "removed", "modified"]);
    }
}
