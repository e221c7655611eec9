//! Shared library for `courseselect`
//! Contains the catalog, validation, persistence and export core used by the CLI

pub mod core;
pub mod logger;

pub use core::{config, get_version};
