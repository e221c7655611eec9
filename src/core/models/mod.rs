//! Data models for `course_selection`

pub mod course;
pub mod group;
pub mod slot;

pub use course::Course;
pub use group::{natural_cmp, Group, GroupIndex, SlotGroups};
pub use slot::Slot;
