//! Reconciler facade: loads sources, runs one job, writes the result.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::diff::{DiffSpec, VersionDiffer};
use crate::error::Result;
use crate::fill::DictionaryFiller;
use crate::input::{CacheStats, ParserConfig, SourceCache, SourceFile, SourceMetadata, TableSource};
use crate::job::{Job, JobKind, TableInput};
use crate::merge::{JoinSpec, KeyedMerger};
use crate::output::{sink_for_path, write_to_path};
use crate::table::{DataTable, NamedTable, forward_fill_except, normalize_table};

/// Default sheet name of a merge result.
pub const MERGED_SHEET: &str = "merged";
/// Default sheet name of a fill result.
pub const FILLED_SHEET: &str = "filled";

/// Configuration for a [`Reconciler`].
#[derive(Debug, Clone, Default)]
pub struct ReconcilerConfig {
    /// Parser configuration for delimited sources.
    pub parser: ParserConfig,
}

/// Row and column counts of one output table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetSummary {
    pub name: String,
    pub rows: usize,
    pub columns: usize,
}

/// What a run read, produced and counted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    /// Job mode (`merge`, `fill` or `diff`).
    pub mode: String,
    /// Every source read, in job order.
    pub sources: Vec<SourceMetadata>,
    /// Output tables, in sheet order.
    pub sheets: Vec<SheetSummary>,
    /// Mode-specific counters (matched, filled, modified, ...).
    pub counts: IndexMap<String, usize>,
    /// Where the result was written, if anywhere.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
}

/// Result of running a job.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub tables: Vec<NamedTable>,
    pub summary: RunSummary,
}

/// Runs merge, fill and diff jobs against files on disk.
pub struct Reconciler {
    config: ReconcilerConfig,
    cache: SourceCache,
    merger: KeyedMerger,
    filler: DictionaryFiller,
    differ: VersionDiffer,
}

impl Reconciler {
    /// Create a reconciler with default configuration.
    pub fn new() -> Self {
        Self::with_config(ReconcilerConfig::default())
    }

    pub fn with_config(config: ReconcilerConfig) -> Self {
        Self {
            config,
            cache: SourceCache::new(),
            merger: KeyedMerger::new(),
            filler: DictionaryFiller::new(),
            differ: VersionDiffer::new(),
        }
    }

    /// Sheet names of a workbook (empty for delimited text).
    pub fn sheet_names(&self, path: impl AsRef<Path>) -> Result<Vec<String>> {
        SourceFile::open(path)?.sheet_names()
    }

    /// Load one input through the cache and normalize it.
    ///
    /// Missing markers collapse to [`Cell::Empty`](crate::table::Cell::Empty). Blanks are filled
    /// down when the input asks for it, or when it does not say and `fill_by_default` is set.
    /// Columns named in `keep_blank` are never filled down.
    pub fn load(
        &mut self,
        input: &TableInput,
        fill_by_default: bool,
        keep_blank: &[&str],
    ) -> Result<(DataTable, SourceMetadata)> {
        let source = SourceFile::open(&input.path)?.with_parser_config(self.config.parser.clone());
        let table = normalize_table(self.cache.load(&source, &input.request())?);
        if !input.fills_down(fill_by_default) {
            return Ok((table, source.metadata().clone()));
        }

        let skip: Vec<usize> = keep_blank
            .iter()
            .filter_map(|name| table.column_index(name))
            .collect();
        debug!(path = %input.path.display(), ?skip, "filling down");
        Ok((forward_fill_except(table, &skip), source.metadata().clone()))
    }

    /// Run a job and return its tables without writing them.
    pub fn run(&mut self, job: &Job) -> Result<RunOutput> {
        let mut sources = Vec::new();
        let mut counts = IndexMap::new();
        let fill_by_default = job.kind.fills_down_by_default();

        let tables = match &job.kind {
            JobKind::Merge {
                left,
                right,
                left_keys,
                right_keys,
                target_columns,
            } => {
                let (left_table, left_meta) = self.load(left, fill_by_default, &[])?;
                let (right_table, right_meta) = self.load(right, fill_by_default, &[])?;
                sources.extend([left_meta, right_meta]);

                let spec = JoinSpec::new(left_keys.clone(), right_keys.clone());
                let (merged, stats) =
                    self.merger
                        .merge_with_stats(&left_table, &right_table, &spec, target_columns)?;

                counts.insert("matched".to_string(), stats.matched);
                counts.insert("unmatched".to_string(), stats.unmatched);
                counts.insert(
                    "duplicate_reference_rows".to_string(),
                    stats.duplicate_reference_rows,
                );
                vec![NamedTable::new(sheet_name(job, MERGED_SHEET), merged)]
            }
            JobKind::Fill {
                table,
                match_columns,
                target_column,
            } => {
                let (input, meta) = self.load(table, fill_by_default, &[target_column.as_str()])?;
                sources.push(meta);

                let (filled, report) =
                    self.filler
                        .fill_with_audit(&input, match_columns, target_column)?;

                counts.insert("dictionary_size".to_string(), report.dictionary_size);
                counts.insert("filled".to_string(), report.values_filled());
                counts.insert("unfilled".to_string(), report.unfilled);
                vec![NamedTable::new(sheet_name(job, FILLED_SHEET), filled)]
            }
            JobKind::Diff {
                old,
                new,
                old_keys,
                new_keys,
                old_compare,
                new_compare,
            } => {
                let (old_table, old_meta) = self.load(old, fill_by_default, &[])?;
                let (new_table, new_meta) = self.load(new, fill_by_default, &[])?;
                sources.extend([old_meta, new_meta]);

                let spec = DiffSpec {
                    old_keys: old_keys.clone(),
                    new_keys: or_same(new_keys, old_keys),
                    old_compare: old_compare.clone(),
                    new_compare: or_same(new_compare, old_compare),
                };
                let result = self.differ.diff(&old_table, &new_table, &spec)?;

                counts.insert("added".to_string(), result.added.row_count());
                counts.insert("removed".to_string(), result.removed.row_count());
                counts.insert("modified".to_string(), result.modified.row_count());
                counts.insert("unchanged".to_string(), result.unchanged);
                result.into_named_tables()
            }
        };

        let sheets = tables
            .iter()
            .map(|t| SheetSummary {
                name: t.name.clone(),
                rows: t.table.row_count(),
                columns: t.table.column_count(),
            })
            .collect();

        info!(mode = job.kind.mode(), ?counts, "job finished");

        Ok(RunOutput {
            tables,
            summary: RunSummary {
                mode: job.kind.mode().to_string(),
                sources,
                sheets,
                counts,
                output: None,
            },
        })
    }

    /// Run a job and write its tables to `job.output` when set.
    pub fn run_and_write(&mut self, job: &Job) -> Result<RunOutput> {
        let mut output = self.run(job)?;
        if let Some(ref path) = job.output {
            let sink = sink_for_path(path)?;
            write_to_path(sink.as_ref(), &output.tables, path)?;
            debug!(path = %path.display(), "wrote result");
            output.summary.output = Some(path.clone());
        }
        Ok(output)
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }
}

impl Default for Reconciler {
    fn default() -> Self {
        Self::new()
    }
}

fn sheet_name(job: &Job, default: &str) -> String {
    job.sheet_name.clone().unwrap_or_else(|| default.to_string())
}

fn or_same(names: &[String], fallback: &[String]) -> Vec<String> {
    if names.is_empty() {
        fallback.to_vec()
    } else {
        names.to_vec()
    }
}
