//! Keyed left-outer merge of a reference table into a base table.
//!
//! The base ("left") table keeps every row in its original order. Target
//! columns are pulled from the reference ("right") table by matching composite
//! key tuples. Duplicate reference keys are collapsed first-wins.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Result, SheetMatchError};
use crate::table::{Cell, DataTable, KeyTuple, first_wins_index};

/// Suffix for a left column whose name collides with a target column.
const LEFT_SUFFIX: &str = "_x";
/// Suffix for a target column whose name collides with a left column.
const RIGHT_SUFFIX: &str = "_y";

/// Positional pairing of left and right key columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinSpec {
    pub left_keys: Vec<String>,
    pub right_keys: Vec<String>,
}

impl JoinSpec {
    /// Pair `left_keys[i]` with `right_keys[i]`.
    pub fn new<L, R>(left_keys: L, right_keys: R) -> Self
    where
        L: IntoIterator,
        L::Item: Into<String>,
        R: IntoIterator,
        R::Item: Into<String>,
    {
        Self {
            left_keys: left_keys.into_iter().map(Into::into).collect(),
            right_keys: right_keys.into_iter().map(Into::into).collect(),
        }
    }

    /// Use the same column names on both sides.
    pub fn same<I>(keys: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let keys: Vec<String> = keys.into_iter().map(Into::into).collect();
        Self {
            left_keys: keys.clone(),
            right_keys: keys,
        }
    }

    /// Check the key lists are non-empty and of equal length.
    pub fn validate(&self) -> Result<()> {
        if self.left_keys.is_empty() || self.right_keys.is_empty() {
            return Err(SheetMatchError::Config(
                "join keys must not be empty".to_string(),
            ));
        }
        if self.left_keys.len() != self.right_keys.len() {
            return Err(SheetMatchError::Config(format!(
                "join key lists differ in length: {} left vs {} right",
                self.left_keys.len(),
                self.right_keys.len()
            )));
        }
        Ok(())
    }
}

/// Counts describing one merge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeStats {
    /// Rows in the output (always equal to the left row count).
    pub rows: usize,
    /// Left rows whose key was found in the reference table.
    pub matched: usize,
    /// Left rows that received EMPTY targets.
    pub unmatched: usize,
    /// Reference rows dropped because an earlier row had the same key.
    pub duplicate_reference_rows: usize,
}

/// Merges target columns from a reference table into a base table.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyedMerger;

impl KeyedMerger {
    /// Create a new merger.
    pub fn new() -> Self {
        Self
    }

    /// Left-outer join `right`'s `target_cols` onto `left`.
    pub fn merge(
        &self,
        left: &DataTable,
        right: &DataTable,
        spec: &JoinSpec,
        target_cols: &[String],
    ) -> Result<DataTable> {
        self.merge_with_stats(left, right, spec, target_cols)
            .map(|(table, _)| table)
    }

    /// Same as [`KeyedMerger::merge`], also returning match counts.
    pub fn merge_with_stats(
        &self,
        left: &DataTable,
        right: &DataTable,
        spec: &JoinSpec,
        target_cols: &[String],
    ) -> Result<(DataTable, MergeStats)> {
        validate_targets(spec, target_cols)?;

        let left_keys = left.require_columns(&spec.left_keys, "left")?;
        let right_keys = right.require_columns(&spec.right_keys, "right")?;
        let targets = right.require_columns(target_cols, "right")?;

        // Reference subset: right keys followed by targets.
        let mut subset_columns = right_keys.clone();
        subset_columns.extend(&targets);
        let reference = right.project(&subset_columns);
        let reference_keys: Vec<usize> = (0..right_keys.len()).collect();
        let lookup = first_wins_index(&reference, &reference_keys);

        let duplicate_reference_rows = reference.row_count() - lookup.len();
        debug!(
            reference_rows = reference.row_count(),
            distinct_keys = lookup.len(),
            duplicate_reference_rows,
            "built reference index"
        );

        let target_start = right_keys.len();
        let mut stats = MergeStats {
            duplicate_reference_rows,
            ..MergeStats::default()
        };

        let mut output = DataTable::with_headers(output_headers(&left.headers, target_cols)?);
        output.rows.reserve(left.row_count());

        for row in &left.rows {
            let key = KeyTuple::from_row(row, &left_keys);
            let mut merged = Vec::with_capacity(row.len() + targets.len());
            merged.extend(row.iter().cloned());

            match lookup.get(&key) {
                Some(&ref_idx) => {
                    merged.extend(reference.rows[ref_idx][target_start..].iter().cloned());
                    stats.matched += 1;
                }
                None => {
                    merged.extend(std::iter::repeat_n(Cell::Empty, targets.len()));
                    stats.unmatched += 1;
                }
            }
            output.rows.push(merged);
        }
        stats.rows = output.row_count();

        info!(
            rows = stats.rows,
            matched = stats.matched,
            unmatched = stats.unmatched,
            "merge complete"
        );

        Ok((output, stats))
    }
}

fn validate_targets(spec: &JoinSpec, target_cols: &[String]) -> Result<()> {
    spec.validate()?;

    if target_cols.is_empty() {
        return Err(SheetMatchError::Config(
            "at least one target column is required".to_string(),
        ));
    }
    if let Some(target) = target_cols.iter().find(|t| spec.right_keys.contains(t)) {
        return Err(SheetMatchError::Config(format!(
            "target column '{}' is also a right key",
            target
        )));
    }
    let mut seen = HashSet::new();
    if let Some(target) = target_cols.iter().find(|t| !seen.insert(t.as_str())) {
        return Err(SheetMatchError::Config(format!(
            "target column '{}' listed more than once",
            target
        )));
    }
    Ok(())
}

/// Left headers then target headers, suffixing both sides of a name clash.
///
/// Right key columns never reach the output: a key sharing a left key's name
/// is represented by that left column, the rest are redundant. Fails when a
/// suffixed name is already taken.
fn output_headers(left_headers: &[String], target_cols: &[String]) -> Result<Vec<String>> {
    let left_names: HashSet<&str> = left_headers.iter().map(String::as_str).collect();
    let target_names: HashSet<&str> = target_cols.iter().map(String::as_str).collect();

    let mut headers: Vec<String> = left_headers
        .iter()
        .map(|h| {
            if target_names.contains(h.as_str()) {
                format!("{}{}", h, LEFT_SUFFIX)
            } else {
                h.clone()
            }
        })
        .collect();

    headers.extend(target_cols.iter().map(|t| {
        if left_names.contains(t.as_str()) {
            format!("{}{}", t, RIGHT_SUFFIX)
        } else {
            t.clone()
        }
    }));

    let mut seen = HashSet::new();
    if let Some(dup) = headers.iter().find(|h| !seen.insert(h.as_str())) {
        return Err(SheetMatchError::Config(format!(
            "merged table would have two columns named '{}'",
            dup
        )));
    }
    Ok(headers)
}
