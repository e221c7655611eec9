//! Course catalog: loading, integrity checks and slot partitioning

pub mod loader;

pub use loader::{failure_messages, load_catalog, parse_catalog_json, CatalogSource};

use crate::core::models::{Course, Slot};
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;

/// Errors raised while loading a catalog
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The catalog file could not be read
    #[error("failed to read catalog {path}: {source}")]
    Io {
        /// Path that was read
        path: String,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// The catalog URL could not be fetched
    #[error("failed to fetch catalog {url}: {source}")]
    Http {
        /// URL that was requested
        url: String,
        /// Underlying error
        #[source]
        source: reqwest::Error,
    },

    /// The catalog server answered with a non-success status
    #[error("HTTP error! status: {status} while fetching {url}")]
    Status {
        /// URL that was requested
        url: String,
        /// Response status code
        status: u16,
    },

    /// The catalog is not a valid JSON course array
    #[error("invalid catalog JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Two records share an id
    #[error("duplicate course id '{0}'")]
    DuplicateId(String),

    /// A record declares zero credit hours
    #[error("course '{0}' must have positive credit hours")]
    InvalidHours(String),
}

/// The immutable list of course offerings
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    courses: Vec<Course>,
    index: HashMap<String, usize>,
}

impl Catalog {
    /// Build a catalog, checking id uniqueness and positive credit hours
    ///
    /// # Errors
    /// Returns [`CatalogError::DuplicateId`] or [`CatalogError::InvalidHours`]
    /// when a record breaks the catalog invariants.
    pub fn from_courses(courses: Vec<Course>) -> Result<Self, CatalogError> {
        let mut index = HashMap::with_capacity(courses.len());
        for (position, course) in courses.iter().enumerate() {
            if course.hours == 0 {
                return Err(CatalogError::InvalidHours(course.id.clone()));
            }
            if index.insert(course.id.clone(), position).is_some() {
                return Err(CatalogError::DuplicateId(course.id.clone()));
            }
        }
        Ok(Self { courses, index })
    }

    /// All courses in catalog order
    #[must_use]
    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    /// Look up a course by id
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Course> {
        self.index.get(id).map(|&position| &self.courses[position])
    }

    /// Whether the catalog contains `id`
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Display name of a course, falling back to the id itself
    #[must_use]
    pub fn display_name<'a>(&'a self, id: &'a str) -> &'a str {
        self.get(id).map_or(id, |course| course.name.as_str())
    }

    /// Courses offered in one slot, in catalog order
    #[must_use]
    pub fn slot_courses(&self, slot: Slot) -> Vec<&Course> {
        self.courses
            .iter()
            .filter(|course| course.slot() == slot)
            .collect()
    }

    /// Courses grouped by slot, slots ascending
    #[must_use]
    pub fn partition(&self) -> BTreeMap<Slot, Vec<&Course>> {
        let mut slots: BTreeMap<Slot, Vec<&Course>> = BTreeMap::new();
        for course in &self.courses {
            slots.entry(course.slot()).or_default().push(course);
        }
        slots
    }

    /// Ids of every course flagged mandatory
    pub fn mandatory_ids(&self) -> impl Iterator<Item = &str> {
        self.courses
            .iter()
            .filter(|course| course.mandatory)
            .map(|course| course.id.as_str())
    }

    /// Number of courses
    #[must_use]
    pub fn len(&self) -> usize {
        self.courses.len()
    }

    /// Whether the catalog has no courses
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }
}
