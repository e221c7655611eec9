//! Catalog loader for local JSON files and HTTP(S) URLs

use super::{Catalog, CatalogError};
use crate::core::models::{Course, Slot};
use crate::{debug, info};
use std::fs;
use std::path::PathBuf;

/// Where a catalog comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    /// A JSON file on disk
    File(PathBuf),
    /// A JSON resource served over HTTP(S)
    Url(String),
}

impl CatalogSource {
    /// Interpret a configured source string: URLs start with `http://` or `https://`
    #[must_use]
    pub fn parse(source: &str) -> Self {
        let trimmed = source.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            Self::Url(trimmed.to_string())
        } else {
            Self::File(PathBuf::from(trimmed))
        }
    }
}

impl std::fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Url(url) => f.write_str(url),
        }
    }
}

/// Parse a JSON array of course records into a checked catalog
///
/// # Errors
/// Returns an error if the JSON is malformed or a record breaks the catalog
/// invariants (duplicate id, zero hours).
pub fn parse_catalog_json(json: &str) -> Result<Catalog, CatalogError> {
    let courses: Vec<Course> = serde_json::from_str(json)?;
    Catalog::from_courses(courses)
}

/// Fetch and parse a catalog
///
/// # Errors
/// Returns an error if the source cannot be read or fetched, answers with a
/// non-success status, or does not contain a valid catalog.
pub fn load_catalog(source: &CatalogSource) -> Result<Catalog, CatalogError> {
    let body = match source {
        CatalogSource::File(path) => fs::read_to_string(path).map_err(|e| CatalogError::Io {
            path: path.display().to_string(),
            source: e,
        })?,
        CatalogSource::Url(url) => fetch(url)?,
    };

    let catalog = parse_catalog_json(&body)?;
    info!("Catalog loaded from {source}: {} courses", catalog.len());
    for (slot, courses) in catalog.partition() {
        debug!("  {slot}: {} courses", courses.len());
    }
    Ok(catalog)
}

fn fetch(url: &str) -> Result<String, CatalogError> {
    let http_err = |e| CatalogError::Http {
        url: url.to_string(),
        source: e,
    };
    let response = reqwest::blocking::get(url).map_err(http_err)?;
    let status = response.status();
    if !status.is_success() {
        return Err(CatalogError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }
    response.text().map_err(http_err)
}

/// Inline messages shown in place of each slot when the catalog failed to load
#[must_use]
pub fn failure_messages(slots: &[Slot]) -> Vec<String> {
    slots
        .iter()
        .map(|slot| format!("Failed to load course information for {slot}."))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_detection() {
        assert_eq!(
            CatalogSource::parse("https://example.com/courses.json"),
            CatalogSource::Url("https://example.com/courses.json".to_string())
        );
        assert_eq!(
            CatalogSource::parse("samples/courses.json"),
            CatalogSource::File(PathBuf::from("samples/courses.json"))
        );
    }

    #[test]
    fn test_parse_rejects_non_array() {
        assert!(matches!(
            parse_catalog_json(r#"{"id": "c1"}"#),
            Err(CatalogError::Json(_))
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let source = CatalogSource::File(PathBuf::from("definitely/not/here.json"));
        assert!(matches!(load_catalog(&source), Err(CatalogError::Io { .. })));
    }

    #[test]
    fn test_failure_messages_per_slot() {
        let messages = failure_messages(&[Slot::new(2, 1), Slot::new(3, 2)]);
        assert_eq!(
            messages,
            vec![
                "Failed to load course information for year 2 semester 1.",
                "Failed to load course information for year 3 semester 2.",
            ]
        );
    }
}
