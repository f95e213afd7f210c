//! Diff command - compare two versions of a table.

use std::path::PathBuf;

use colored::Colorize;
use sheetmatch::diff::DETAIL_COLUMN;
use sheetmatch::{Job, JobKind};

use crate::cli::SourceArgs;

pub struct DiffArgs {
    pub old: PathBuf,
    pub new: PathBuf,
    pub keys: Vec<String>,
    pub new_keys: Vec<String>,
    pub compare: Vec<String>,
    pub new_compare: Vec<String>,
    pub source: SourceArgs,
    pub fill_down: bool,
}

pub fn run(args: DiffArgs, output: Option<PathBuf>, show: bool) -> Result<(), Box<dyn std::error::Error>> {
    let key_count = args.keys.len();

    let mut old = args.source.to_input(args.old);
    let mut new = args.source.to_input(args.new);
    if args.fill_down {
        old = old.with_forward_fill(true);
        new = new.with_forward_fill(true);
    }

    let mut job = Job::new(JobKind::Diff {
        old,
        new,
        old_keys: args.keys,
        new_keys: args.new_keys,
        old_compare: args.compare,
        new_compare: args.new_compare,
    });
    job.output = output;

    let result = super::execute(&job)?;
    if !show {
        return Ok(());
    }

    let Some(modified) = result.tables.iter().find(|t| t.name == "modified") else {
        return Ok(());
    };
    if modified.table.is_empty() {
        return Ok(());
    }

    println!();
    println!("{}", "Modified rows:".yellow().bold());
    for row in 0..modified.table.row_count() {
        let key: Vec<String> = (0..key_count)
            .filter_map(|col| modified.table.get(row, col))
            .map(|cell| cell.to_text())
            .collect();
        let detail = modified
            .table
            .get_by_name(row, DETAIL_COLUMN)
            .map(|cell| cell.to_text())
            .unwrap_or_default();
        println!("  {} {}", format!("({})", key.join(", ")).white().bold(), detail);
    }
    Ok(())
}
