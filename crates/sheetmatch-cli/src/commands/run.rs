//! Run command - execute a JSON job file.

use std::path::PathBuf;

use sheetmatch::{Job, Reconciler};

pub fn run(file: PathBuf, json_output: bool) -> Result<(), Box<dyn std::error::Error>> {
    if !file.exists() {
        return Err(format!("Job file not found: {}", file.display()).into());
    }

    let job = Job::load(&file)?;

    if json_output {
        let output = Reconciler::new().run_and_write(&job)?;
        println!("{}", serde_json::to_string_pretty(&output.summary)?);
    } else {
        super::execute(&job)?;
    }
    Ok(())
}
