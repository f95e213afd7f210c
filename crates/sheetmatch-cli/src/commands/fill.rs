//! Fill command - complete blank cells from rows sharing a key.

use std::path::PathBuf;

use sheetmatch::{Job, JobKind};

use crate::cli::SourceArgs;

pub fn run(
    file: PathBuf,
    match_columns: Vec<String>,
    target: String,
    source: SourceArgs,
    fill_down: bool,
    output: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut table = source.to_input(file);
    if fill_down {
        table = table.with_forward_fill(true);
    }

    let mut job = Job::new(JobKind::Fill {
        table,
        match_columns,
        target_column: target,
    });
    job.output = output;

    super::execute(&job)?;
    Ok(())
}
