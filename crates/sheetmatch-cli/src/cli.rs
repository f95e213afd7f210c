//! CLI argument definitions using clap.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use sheetmatch::TableInput;

/// sheetmatch: reconcile spreadsheet and CSV tables by key
#[derive(Parser)]
#[command(name = "sheetmatch")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// How to read one input file.
#[derive(Args, Clone, Debug)]
pub struct SourceArgs {
    /// Sheet to read from a workbook (default: first sheet)
    #[arg(long)]
    pub sheet: Option<String>,

    /// Row holding the column names (1-based)
    #[arg(long, default_value = "1", value_parser = clap::value_parser!(u32).range(1..))]
    pub header_row: u32,
}

impl SourceArgs {
    /// Input for `path`; fill-down is left to the job mode.
    pub fn to_input(&self, path: PathBuf) -> TableInput {
        let mut input = TableInput::new(path).with_header_row(self.header_row as usize - 1);
        if let Some(ref sheet) = self.sheet {
            input = input.with_sheet(sheet.clone());
        }
        input
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the sheets of a workbook
    Sheets {
        /// Path to the workbook
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Pull columns from a reference table into a base table by key
    Merge {
        /// Base table; every row is kept
        #[arg(value_name = "LEFT")]
        left: PathBuf,

        /// Reference table supplying the target columns
        #[arg(value_name = "RIGHT")]
        right: PathBuf,

        /// Key columns of the base table
        #[arg(short = 'l', long = "left-key", required = true, num_args = 1..)]
        left_keys: Vec<String>,

        /// Key columns of the reference table (default: same as --left-key)
        #[arg(short = 'r', long = "right-key", num_args = 1..)]
        right_keys: Vec<String>,

        /// Reference columns to copy
        #[arg(short = 't', long = "target", required = true, num_args = 1..)]
        targets: Vec<String>,

        /// Sheet of the reference table (default: first sheet)
        #[arg(long)]
        right_sheet: Option<String>,

        /// Header row of the reference table (1-based)
        #[arg(long, default_value = "1", value_parser = clap::value_parser!(u32).range(1..))]
        right_header_row: u32,

        #[command(flatten)]
        source: SourceArgs,

        /// Do not fill merged-cell blanks down each column
        #[arg(long)]
        no_fill_down: bool,

        /// Output path (.xlsx, .csv or .tsv)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Fill blanks in a column from rows sharing the same key
    Fill {
        /// Table to fill
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Columns identifying rows that belong together
        #[arg(short = 'm', long = "match", required = true, num_args = 1..)]
        match_columns: Vec<String>,

        /// Column whose blanks are filled
        #[arg(short = 't', long = "target")]
        target: String,

        #[command(flatten)]
        source: SourceArgs,

        /// Fill merged-cell blanks down each column except the target
        #[arg(long)]
        fill_down: bool,

        /// Output path (.xlsx, .csv or .tsv)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Compare two versions of a table
    Diff {
        /// Old version
        #[arg(value_name = "OLD")]
        old: PathBuf,

        /// New version
        #[arg(value_name = "NEW")]
        new: PathBuf,

        /// Key columns of the old table
        #[arg(short = 'k', long = "key", required = true, num_args = 1..)]
        keys: Vec<String>,

        /// Key columns of the new table (default: same as --key)
        #[arg(long, num_args = 1..)]
        new_keys: Vec<String>,

        /// Columns compared for changes in the old table
        #[arg(short = 'c', long = "compare", required = true, num_args = 1..)]
        compare: Vec<String>,

        /// Compared columns of the new table (default: same as --compare)
        #[arg(long, num_args = 1..)]
        new_compare: Vec<String>,

        #[command(flatten)]
        source: SourceArgs,

        /// Fill merged-cell blanks down each column of both versions
        #[arg(long)]
        fill_down: bool,

        /// Output path (.xlsx, .csv or .tsv)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the modified rows
        #[arg(long)]
        show: bool,
    },

    /// Run a JSON job file
    Run {
        /// Path to the job file
        #[arg(value_name = "JOB")]
        job: PathBuf,

        /// Print the run summary as JSON
        #[arg(long)]
        json: bool,
    },
}
