//! CLI command implementations.

pub mod diff;
pub mod fill;
pub mod merge;
pub mod run;
pub mod sheets;

use colored::Colorize;
use sheetmatch::{Job, Reconciler, RunOutput};

/// Run a job, write its output if requested and print the summary.
pub(crate) fn execute(job: &Job) -> Result<RunOutput, Box<dyn std::error::Error>> {
    let mut reconciler = Reconciler::new();
    let output = reconciler.run_and_write(job)?;
    print_summary(&output);
    Ok(output)
}

pub(crate) fn print_summary(output: &RunOutput) {
    let summary = &output.summary;

    let files: Vec<&str> = summary.sources.iter().map(|s| s.file.as_str()).collect();
    println!(
        "{} {}",
        capitalize(&summary.mode).cyan().bold(),
        files.join(" + ").white()
    );
    println!();

    println!("{}", "Sheets:".yellow().bold());
    for sheet in &summary.sheets {
        println!(
            "  {:12} {} rows, {} columns",
            sheet.name,
            sheet.rows.to_string().white().bold(),
            sheet.columns
        );
    }

    if !summary.counts.is_empty() {
        println!();
        println!("{}", "Counts:".yellow().bold());
        for (name, count) in &summary.counts {
            println!("  {:26} {}", name.replace('_', " "), count.to_string().white().bold());
        }
    }

    println!();
    match summary.output {
        Some(ref path) => println!("{} {}", "Wrote".green().bold(), path.display()),
        None => println!("{}", "No output written (use -o to save the result)".dimmed()),
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
