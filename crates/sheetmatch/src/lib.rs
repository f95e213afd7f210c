//! sheetmatch: keyed reconciliation of spreadsheet and CSV tables.
//!
//! Three operations over loosely structured tabular exports:
//!
//! - **Merge**: pull columns from a reference table into a base table by
//!   composite key (left-outer, first reference row wins).
//! - **Fill**: complete blank cells of one column from other rows of the
//!   same table that share a key.
//! - **Diff**: classify the rows of two versions of a table as added,
//!   removed or modified, with a readable change description.
//!
//! Inputs are normalized first: missing markers collapse to a single empty
//! cell and merged-cell blanks can be filled down. The original tables are
//! never modified.
//!
//! # Example
//!
//! ```no_run
//! use sheetmatch::{Job, JobKind, Reconciler, TableInput};
//!
//! let job = Job::new(JobKind::Merge {
//!     left: TableInput::new("orders.xlsx").with_header_row(2),
//!     right: TableInput::new("colors.csv"),
//!     left_keys: vec!["order".into(), "color_code".into()],
//!     right_keys: vec!["order".into(), "color_code".into()],
//!     target_columns: vec!["color_name".into()],
//! })
//! .with_output("matched.xlsx");
//!
//! let output = Reconciler::new().run_and_write(&job).unwrap();
//! println!("Rows: {}", output.summary.sheets[0].rows);
//! ```

pub mod diff;
pub mod error;
pub mod fill;
pub mod input;
pub mod job;
pub mod merge;
pub mod output;
pub mod table;

mod reconciler;

pub use crate::reconciler::{
    FILLED_SHEET, MERGED_SHEET, Reconciler, ReconcilerConfig, RunOutput, RunSummary, SheetSummary,
};
pub use diff::{DiffResult, DiffSpec, VersionDiffer};
pub use error::{Result, SheetMatchError};
pub use fill::{DictionaryFiller, FillReport, FilledCell};
pub use input::{LoadRequest, SourceCache, SourceFile, SourceMetadata, TableSource};
pub use job::{Job, JobKind, TableInput};
pub use merge::{JoinSpec, KeyedMerger, MergeStats};
pub use output::{CsvSink, TableSink, XlsxSink};
pub use table::{Cell, DataTable, KeyTuple, NamedTable};
