//! Selection command handlers: select, deselect, toggle, identity, clear

use crate::render;
use course_selection::config::Config;
use course_selection::core::session::{SelectionError, Session};
use course_selection::{verbose, warn};

/// Which mutation to apply to each id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    /// Add to the selection
    Select,
    /// Remove from the selection
    Deselect,
    /// Flip the current state
    Toggle,
}

fn apply(session: &mut Session, change: Change, id: &str) -> Result<(), SelectionError> {
    match change {
        Change::Select => {
            if !session.select(id)? {
                verbose!("{id} is already selected");
            }
        }
        Change::Deselect => {
            if !session.deselect(id)? {
                verbose!("{id} was not selected");
            }
        }
        Change::Toggle => {
            let selected = session.toggle(id)?;
            verbose!("{id} {}", if selected { "selected" } else { "deselected" });
        }
    }
    Ok(())
}

/// Apply `change` to every id, then print the report
///
/// Rejected ids are reported and skipped; the remaining ids are still applied.
///
/// # Errors
/// Returns a message if the session cannot be opened or any id was rejected.
pub fn run(config: &Config, change: Change, ids: &[String]) -> Result<(), String> {
    let mut session = super::open_session(config)?;
    let mut rejected = Vec::new();

    for id in ids {
        if let Err(e) = apply(&mut session, change, id) {
            warn!("Rejected {id}: {e}");
            rejected.push(format!("✗ {e}"));
        }
    }

    print!("{}", render::report(&session.report()));

    if rejected.is_empty() {
        Ok(())
    } else {
        Err(rejected.join("\n"))
    }
}

/// Set the student identity, then print the report
///
/// # Errors
/// Returns a message if the session cannot be opened.
pub fn run_identity(config: &Config, name: &str, id: &str) -> Result<(), String> {
    let mut session = super::open_session(config)?;
    session.set_identity(name, id);
    println!("✓ {}", render::identity_line(session.selection()));
    print!("{}", render::report(&session.report()));
    Ok(())
}

/// Delete the saved selection
///
/// # Errors
/// Returns a message if the session cannot be opened or the snapshot cannot be removed.
pub fn run_clear(config: &Config) -> Result<(), String> {
    let mut session = super::open_session(config)?;
    let removed = session
        .clear()
        .map_err(|e| format!("✗ Failed to clear selection: {e}"))?;
    if removed {
        println!("✓ Saved selection cleared");
    } else {
        println!("✓ No saved selection");
    }
    Ok(())
}
