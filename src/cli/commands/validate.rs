//! Validate command handler

use crate::render;
use course_selection::config::Config;

/// Print the validation report; returns whether export is available
///
/// # Errors
/// Returns a message if the session cannot be opened.
pub fn run(config: &Config) -> Result<bool, String> {
    let session = super::open_session(config)?;
    let report = session.report();
    print!("{}", render::report(&report));
    Ok(report.export_eligible())
}
