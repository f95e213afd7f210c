//! Merge command - pull reference columns into a base table.

use std::path::PathBuf;

use sheetmatch::{Job, JobKind, TableInput};

use crate::cli::SourceArgs;

pub struct MergeArgs {
    pub left: PathBuf,
    pub right: PathBuf,
    pub left_keys: Vec<String>,
    pub right_keys: Vec<String>,
    pub targets: Vec<String>,
    pub right_sheet: Option<String>,
    pub right_header_row: u32,
    pub source: SourceArgs,
    pub no_fill_down: bool,
}

pub fn run(args: MergeArgs, output: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let right_keys = if args.right_keys.is_empty() {
        args.left_keys.clone()
    } else {
        args.right_keys
    };

    let mut left = args.source.to_input(args.left);
    let mut right = TableInput::new(args.right).with_header_row(args.right_header_row as usize - 1);
    if let Some(sheet) = args.right_sheet {
        right = right.with_sheet(sheet);
    }
    if args.no_fill_down {
        left = left.with_forward_fill(false);
        right = right.with_forward_fill(false);
    }

    let mut job = Job::new(JobKind::Merge {
        left,
        right,
        left_keys: args.left_keys,
        right_keys,
        target_columns: args.targets,
    });
    job.output = output;

    super::execute(&job)?;
    Ok(())
}
