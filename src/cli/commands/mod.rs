//! CLI command handlers for `courseselect`.
//!
//! This module provides handlers for various CLI subcommands.
//! Each command is implemented in its own submodule.

pub mod catalog;
pub mod config;
pub mod export;
pub mod selection;
pub mod validate;

use course_selection::config::Config;
use course_selection::core::catalog::{failure_messages, load_catalog, CatalogSource};
use course_selection::core::session::Session;
use course_selection::core::store::StateStore;
use course_selection::core::validation::RuleSet;
use course_selection::{error, info};
use std::path::Path;

/// Load the rules and catalog named by `config` and restore the saved selection
///
/// # Errors
/// Returns a printable message if the rules are invalid or the catalog cannot
/// be loaded. Nothing is mutated in that case.
pub fn open_session(config: &Config) -> Result<Session, String> {
    let rules =
        RuleSet::from_config(&config.rules).map_err(|e| format!("✗ Invalid [rules] config: {e}"))?;

    let source = CatalogSource::parse(&config.paths.catalog);
    let catalog = load_catalog(&source).map_err(|e| {
        error!("Failed to load catalog from {source}: {e}");
        let mut message = format!("✗ {e}");
        for line in failure_messages(&rules.slots()) {
            message.push_str("\n  ");
            message.push_str(&line);
        }
        message
    })?;

    let store = StateStore::new(Path::new(&config.paths.state_dir), &config.paths.state_key);
    info!("Using snapshot {}", store.path().display());
    Ok(Session::open(catalog, rules, Some(store)))
}
