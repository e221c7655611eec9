//! Catalog command handler

use crate::render;
use course_selection::config::Config;

/// Print the catalog with the current selection
///
/// # Errors
/// Returns a message if the session cannot be opened.
pub fn run(config: &Config) -> Result<(), String> {
    let session = super::open_session(config)?;
    print!("{}", render::catalog(&session));
    Ok(())
}
