//! Input parsing and data source handling.

mod cache;
mod header;
mod parser;
mod source;
mod workbook;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::table::DataTable;

pub use cache::{CacheStats, SourceCache};
pub use parser::{Parser, ParserConfig};
pub use source::{SourceFile, SourceFormat, SourceMetadata};

/// Which sheet and header row to read from a source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LoadRequest {
    /// Sheet name for workbook sources (None = first sheet).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sheet: Option<String>,
    /// Zero-based index of the record holding the column names.
    #[serde(default)]
    pub header_row: usize,
}

impl LoadRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sheet(mut self, sheet: impl Into<String>) -> Self {
        self.sheet = Some(sheet.into());
        self
    }

    pub fn with_header_row(mut self, header_row: usize) -> Self {
        self.header_row = header_row;
        self
    }
}

/// Supplies rectangular tables from some stored representation.
pub trait TableSource {
    /// Stable identity of the underlying content, used for caching.
    fn identity(&self) -> &str;

    /// Names of the sheets this source holds.
    fn sheet_names(&self) -> Result<Vec<String>>;

    /// Load one table.
    fn load(&self, request: &LoadRequest) -> Result<DataTable>;
}
