//! Sheets command - list the sheets of a workbook.

use std::path::PathBuf;

use colored::Colorize;
use sheetmatch::Reconciler;

pub fn run(file: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    if !file.exists() {
        return Err(format!("File not found: {}", file.display()).into());
    }

    let names = Reconciler::new().sheet_names(&file)?;
    if names.is_empty() {
        println!("{}", "Delimited text file: no sheets".dimmed());
        return Ok(());
    }

    println!("{} {}", "Sheets in".cyan().bold(), file.display().to_string().white());
    for (i, name) in names.iter().enumerate() {
        println!("  {:>3}  {}", i + 1, name);
    }
    Ok(())
}
