//! CLI argument definitions for `courseselect`

use clap::{builder::BoolishValueParser, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use course_selection::config::ConfigOverrides;
use course_selection::logger::Level;

/// CLI log level argument
///
/// Represents log levels that can be passed via CLI arguments. Converts to lowercase
/// strings for config storage and to `logger::Level` for runtime use.
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogLevelArg {
    /// Error-level logging
    Error,
    /// Warning-level logging
    Warn,
    /// Info-level logging
    Info,
    /// Debug-level logging
    Debug,
}

impl From<LogLevelArg> for Level {
    fn from(arg: LogLevelArg) -> Self {
        match arg {
            LogLevelArg::Error => Self::Error,
            LogLevelArg::Warn => Self::Warn,
            LogLevelArg::Info => Self::Info,
            LogLevelArg::Debug => Self::Debug,
        }
    }
}

impl std::fmt::Display for LogLevelArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&Level::from(*self), f)
    }
}

#[derive(Debug, Subcommand)]
pub enum ConfigSubcommand {
    /// Display configuration values.
    ///
    /// If a KEY is provided, displays only that configuration value.
    /// If no KEY is provided, displays all configuration values.
    Get {
        /// Optional configuration key to display (e.g., `level`, `catalog`, `endpoint`)
        #[arg(value_name = "KEY")]
        key: Option<String>,
    },
    /// Set a configuration value.
    Set {
        /// Configuration key to set
        #[arg(value_name = "KEY")]
        key: String,
        /// Value to set
        #[arg(value_name = "VALUE")]
        value: String,
    },
    /// Unset a configuration value.
    Unset {
        /// Configuration key to unset
        #[arg(value_name = "KEY")]
        key: String,
    },
    /// Reset configuration to defaults (requires confirmation).
    Reset,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage configuration.
    ///
    /// If no subcommand is provided, displays all configuration values.
    Config {
        #[command(subcommand)]
        subcommand: Option<ConfigSubcommand>,
    },
    /// Show the course catalog with the current selection.
    ///
    /// Courses are listed per year/semester and group; mandatory courses are locked.
    Catalog,
    /// Select one or more courses.
    Select {
        /// Course ids to select
        #[arg(value_name = "IDS", num_args = 1..)]
        ids: Vec<String>,
    },
    /// Deselect one or more courses.
    Deselect {
        /// Course ids to deselect
        #[arg(value_name = "IDS", num_args = 1..)]
        ids: Vec<String>,
    },
    /// Flip the selection state of one or more courses.
    Toggle {
        /// Course ids to toggle
        #[arg(value_name = "IDS", num_args = 1..)]
        ids: Vec<String>,
    },
    /// Set the student name and identifier.
    Identity {
        /// Student name
        #[arg(long)]
        name: String,
        /// Student identifier
        #[arg(long, default_value = "")]
        id: String,
    },
    /// Validate the current selection.
    ///
    /// Exits with status 2 when export is not available.
    Validate,
    /// Export the confirmation document and submit the selection.
    Export {
        /// Document format: markdown (md), html, or pdf (defaults to config `format`)
        #[arg(short, long, value_name = "FORMAT")]
        format: Option<String>,

        /// Output file path (optional; defaults to a name derived from the student identity)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Export only; do not submit to the endpoint
        #[arg(long)]
        no_submit: bool,
    },
    /// Delete the saved selection.
    Clear,
}

#[derive(Parser, Debug)]
#[command(
    name = "courseselect",
    about = "Course selection planner and validator",
    version = env!("CARGO_PKG_VERSION")
)]
pub struct Cli {
    /// Set the runtime log level (error|warn|info|debug). Falls back to config if omitted.
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevelArg>,

    /// Enable verbose output (runtime only)
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Enable debug-level logging and runtime debug flag (shorthand)
    #[arg(long = "debug")]
    pub debug_flag: bool,

    /// Write runtime logs to a file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    // --- Config overrides ---
    /// Override config logging level (stored in config file)
    #[arg(long = "config-level", value_enum)]
    pub config_level: Option<LogLevelArg>,

    /// Override config log file path
    #[arg(long = "config-log-file", value_name = "PATH")]
    pub config_log_file: Option<PathBuf>,

    /// Override config verbose flag (true/false)
    #[arg(long = "config-verbose", value_parser = BoolishValueParser::new())]
    pub config_verbose: Option<bool>,

    /// Override the catalog source (JSON file or http(s) URL)
    #[arg(long, value_name = "PATH|URL")]
    pub catalog: Option<String>,

    /// Override the directory holding the saved selection
    #[arg(long, value_name = "DIR")]
    pub state_dir: Option<PathBuf>,

    /// Override the submission endpoint (empty disables submission)
    #[arg(long, value_name = "URL")]
    pub endpoint: Option<String>,

    /// Override the exports directory
    #[arg(long, value_name = "DIR")]
    pub exports_dir: Option<PathBuf>,

    /// Subcommand to execute.
    /// A subcommand is required to run the CLI.
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Convert CLI flags into config overrides
    ///
    /// # Returns
    /// A `ConfigOverrides` struct with values from CLI flags, where `None` means no override.
    pub fn to_config_overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            level: self.config_level.map(|lvl| lvl.to_string()),
            file: self
                .config_log_file
                .as_ref()
                .map(|p| p.to_string_lossy().to_string()),
            verbose: self.config_verbose,
            catalog: self.catalog.clone(),
            state_dir: self
                .state_dir
                .as_ref()
                .map(|p| p.to_string_lossy().to_string()),
            exports_dir: self
                .exports_dir
                .as_ref()
                .map(|p| p.to_string_lossy().to_string()),
            endpoint: self.endpoint.clone(),
        }
    }
}
