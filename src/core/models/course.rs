//! Course model

use super::Slot;
use serde::{Deserialize, Serialize};

/// A course offering as delivered by the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    /// Unique course identifier (e.g., "c19")
    pub id: String,

    /// Display name; the same name may be offered in several slots
    pub name: String,

    /// School year the offering belongs to
    pub year: u8,

    /// Semester within the year
    pub semester: u8,

    /// Credit hours (positive)
    pub hours: u32,

    /// Group (category) name within the slot
    pub group: String,

    /// Number of courses to pick from the group; unused for mandatory groups
    #[serde(default)]
    pub group_quota: usize,

    /// Whether the course is pre-selected and locked
    #[serde(default)]
    pub mandatory: bool,
}

impl Course {
    /// Create a new optional course
    ///
    /// # Arguments
    /// * `id` - Unique identifier
    /// * `name` - Display name
    /// * `slot` - Year/semester the course is offered in
    /// * `hours` - Credit hours
    /// * `group` - Group name
    /// * `group_quota` - Number of picks required from the group
    #[must_use]
    pub fn new(
        id: &str,
        name: &str,
        slot: Slot,
        hours: u32,
        group: &str,
        group_quota: usize,
    ) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            year: slot.year,
            semester: slot.semester,
            hours,
            group: group.to_string(),
            group_quota,
            mandatory: false,
        }
    }

    /// Mark the course as mandatory (builder style)
    #[must_use]
    pub const fn mandatory(mut self) -> Self {
        self.mandatory = true;
        self
    }

    /// The slot this course is offered in
    #[must_use]
    pub const fn slot(&self) -> Slot {
        Slot::new(self.year, self.semester)
    }
}
