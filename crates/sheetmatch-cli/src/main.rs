//! sheetmatch CLI - keyed reconciliation of spreadsheet and CSV tables.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Sheets { file } => commands::sheets::run(file),

        Commands::Merge {
            left,
            right,
            left_keys,
            right_keys,
            targets,
            right_sheet,
            right_header_row,
            source,
            no_fill_down,
            output,
        } => commands::merge::run(
            commands::merge::MergeArgs {
                left,
                right,
                left_keys,
                right_keys,
                targets,
                right_sheet,
                right_header_row,
                source,
                no_fill_down,
            },
            output,
        ),

        Commands::Fill {
            file,
            match_columns,
            target,
            source,
            fill_down,
            output,
        } => commands::fill::run(file, match_columns, target, source, fill_down, output),

        Commands::Diff {
            old,
            new,
            keys,
            new_keys,
            compare,
            new_compare,
            source,
            fill_down,
            output,
            show,
        } => commands::diff::run(
            commands::diff::DiffArgs {
                old,
                new,
                keys,
                new_keys,
                compare,
                new_compare,
                source,
                fill_down,
            },
            output,
            show,
        ),

        Commands::Run { job, json } => commands::run::run(job, json),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
