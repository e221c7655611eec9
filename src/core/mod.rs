//! Core module: catalog, selection state, validation and export

pub mod catalog;
pub mod config;
pub mod models;
pub mod report;
pub mod selection;
pub mod session;
pub mod store;
pub mod submission;
pub mod validation;

/// Returns the current version of the `course-selection` crate
#[must_use]
pub const fn get_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
