//! Command-line interface entry point for `courseselect`

mod args;
mod commands;
mod render;

use args::{Cli, Command};
use clap::Parser;
use commands::selection::Change;
use course_selection::config::Config;
use course_selection::info;
use course_selection::logger::{enable_debug, enable_verbose, init_file_logging, set_level, Level};
use std::process::ExitCode;

/// Exit status of `validate` when export is not available
const EXIT_NOT_ELIGIBLE: u8 = 2;

fn main() -> ExitCode {
    let args = Cli::parse();

    // Load configuration once at startup and apply CLI overrides to it
    let mut config = Config::load();
    let defaults = Config::from_defaults();
    config.apply_overrides(&args.to_config_overrides());

    // CLI flag overrides config; otherwise use config logging.level; fallback warn
    let mut level = args
        .log_level
        .map(Level::from)
        .or_else(|| config.logging.level.parse().ok())
        .unwrap_or(Level::Warn);

    if args.debug_flag || level == Level::Debug {
        level = Level::Debug;
        enable_debug();
    }

    let verbose = args.verbose || config.logging.verbose;
    if verbose {
        enable_verbose();
    }
    set_level(level);

    // CLI flag wins, otherwise use config logging.file if set
    let config_log_path: Option<std::path::PathBuf> = if config.logging.file.is_empty() {
        None
    } else {
        Some(std::path::PathBuf::from(&config.logging.file))
    };

    if let Some(log_path) = args.log_file.as_ref().or(config_log_path.as_ref()) {
        let display_path = log_path.to_string_lossy();
        if init_file_logging(log_path) {
            if verbose {
                eprintln!("✓ File logging initialized at: {display_path}");
            } else {
                info!("File logging initialized at: {display_path}");
            }
        } else {
            eprintln!("✗ Failed to initialize file logging at: {display_path}");
        }
    }

    let result = match args.command {
        Command::Config { subcommand } => commands::config::run(subcommand, &mut config, &defaults),
        Command::Catalog => commands::catalog::run(&config),
        Command::Select { ids } => commands::selection::run(&config, Change::Select, &ids),
        Command::Deselect { ids } => commands::selection::run(&config, Change::Deselect, &ids),
        Command::Toggle { ids } => commands::selection::run(&config, Change::Toggle, &ids),
        Command::Identity { name, id } => commands::selection::run_identity(&config, &name, &id),
        Command::Validate => match commands::validate::run(&config) {
            Ok(true) => Ok(()),
            Ok(false) => return ExitCode::from(EXIT_NOT_ELIGIBLE),
            Err(e) => Err(e),
        },
        Command::Export {
            format,
            output,
            no_submit,
        } => commands::export::run(&config, format.as_deref(), output.as_deref(), no_submit),
        Command::Clear => commands::selection::run_clear(&config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{message}");
            ExitCode::FAILURE
        }
    }
}
