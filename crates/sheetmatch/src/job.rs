//! Job files describing one reconciliation run.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SheetMatchError};
use crate::input::LoadRequest;

/// One input table of a job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableInput {
    /// Path to a delimited text file or workbook.
    pub path: PathBuf,
    /// Sheet to read from a workbook (None = first sheet).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sheet: Option<String>,
    /// Zero-based index of the header record.
    #[serde(default)]
    pub header_row: usize,
    /// Repair merged-cell blanks by filling down each column.
    ///
    /// None = the job mode decides (see [`JobKind::fills_down_by_default`]).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forward_fill: Option<bool>,
}

impl TableInput {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            sheet: None,
            header_row: 0,
            forward_fill: None,
        }
    }

    pub fn with_sheet(mut self, sheet: impl Into<String>) -> Self {
        self.sheet = Some(sheet.into());
        self
    }

    pub fn with_header_row(mut self, header_row: usize) -> Self {
        self.header_row = header_row;
        self
    }

    pub fn with_forward_fill(mut self, forward_fill: bool) -> Self {
        self.forward_fill = Some(forward_fill);
        self
    }

    /// The sheet/header part of this input.
    pub fn request(&self) -> LoadRequest {
        LoadRequest {
            sheet: self.sheet.clone(),
            header_row: self.header_row,
        }
    }

    /// Whether this input is filled down, given the mode's default.
    pub fn fills_down(&self, mode_default: bool) -> bool {
        self.forward_fill.unwrap_or(mode_default)
    }

    fn resolve_against(&mut self, base: &Path) {
        if self.path.is_relative() {
            self.path = base.join(&self.path);
        }
    }
}

/// What a job does, tagged by `mode` in the job file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum JobKind {
    /// Pull target columns from `right` into `left`.
    Merge {
        left: TableInput,
        right: TableInput,
        left_keys: Vec<String>,
        right_keys: Vec<String>,
        target_columns: Vec<String>,
    },
    /// Fill blanks of `target_column` from rows sharing `match_columns`.
    Fill {
        table: TableInput,
        match_columns: Vec<String>,
        target_column: String,
    },
    /// Classify rows of `new` against `old`.
    ///
    /// Empty `new_keys` / `new_compare` reuse the old column names.
    Diff {
        old: TableInput,
        new: TableInput,
        old_keys: Vec<String>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        new_keys: Vec<String>,
        old_compare: Vec<String>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        new_compare: Vec<String>,
    },
}

impl JobKind {
    /// Mode name as written in job files.
    pub fn mode(&self) -> &'static str {
        match self {
            JobKind::Merge { .. } => "merge",
            JobKind::Fill { .. } => "fill",
            JobKind::Diff { .. } => "diff",
        }
    }

    /// Whether inputs are filled down when they do not say.
    ///
    /// Only merge fills down by default; fill and diff keep blanks as read.
    pub fn fills_down_by_default(&self) -> bool {
        matches!(self, JobKind::Merge { .. })
    }

    fn inputs_mut(&mut self) -> Vec<&mut TableInput> {
        match self {
            JobKind::Merge { left, right, .. } => vec![left, right],
            JobKind::Fill { table, .. } => vec![table],
            JobKind::Diff { old, new, .. } => vec![old, new],
        }
    }
}

/// A complete job: the operation plus where to write its result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    #[serde(flatten)]
    pub kind: JobKind,
    /// Output file (.xlsx, .csv or .tsv). None = do not write.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
    /// Sheet name for single-table results (merge, fill).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sheet_name: Option<String>,
}

impl Job {
    pub fn new(kind: JobKind) -> Self {
        Self {
            kind,
            output: None,
            sheet_name: None,
        }
    }

    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = Some(output.into());
        self
    }

    /// Parse a job from JSON text. Paths are kept as written.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a job file. Relative paths resolve against the file's directory.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| SheetMatchError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let mut job = Self::from_json(&text)?;
        if let Some(base) = path.parent() {
            job.resolve_paths(base);
        }
        Ok(job)
    }

    /// Make every relative input and output path relative to `base`.
    pub fn resolve_paths(&mut self, base: &Path) {
        for input in self.kind.inputs_mut() {
            input.resolve_against(base);
        }
        if let Some(output) = self.output.as_mut() {
            if output.is_relative() {
                *output = base.join(&*output);
            }
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
