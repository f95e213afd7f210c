//! Table model and normalization utilities.

mod cell;
mod data;
mod key;
mod normalize;

pub use cell::Cell;
pub use data::DataTable;
pub use key::{KeyTuple, dedup_first_wins, first_wins_index};
pub use normalize::{forward_fill, forward_fill_except, normalize_missing, normalize_table, stringify};

/// A table paired with the sheet name it is written under.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedTable {
    pub name: String,
    pub table: DataTable,
}

impl NamedTable {
    pub fn new(name: impl Into<String>, table: DataTable) -> Self {
        Self {
            name: name.into(),
            table,
        }
    }
}
