//! Selection state and its persisted snapshot

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// The student's current picks and identity
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    selected: BTreeSet<String>,
    student_name: String,
    student_id: String,
}

impl Selection {
    /// An empty selection with blank identity
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `id` is selected
    #[must_use]
    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.contains(id)
    }

    /// Add `id`; returns `true` if it was not selected before
    pub fn insert(&mut self, id: &str) -> bool {
        self.selected.insert(id.to_string())
    }

    /// Remove `id`; returns `true` if it was selected
    pub fn remove(&mut self, id: &str) -> bool {
        self.selected.remove(id)
    }

    /// Flip `id`; returns the new state (`true` = selected)
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.remove(id) {
            false
        } else {
            self.insert(id)
        }
    }

    /// Overwrite both identity fields with their trimmed values
    pub fn set_identity(&mut self, name: &str, id: &str) {
        self.student_name = name.trim().to_string();
        self.student_id = id.trim().to_string();
    }

    /// Trimmed student name (may be empty)
    #[must_use]
    pub fn student_name(&self) -> &str {
        &self.student_name
    }

    /// Trimmed student identifier (may be empty)
    #[must_use]
    pub fn student_id(&self) -> &str {
        &self.student_id
    }

    /// Selected ids in ascending order
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.selected.iter().map(String::as_str)
    }

    /// Number of selected courses
    #[must_use]
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    /// Whether nothing is selected
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Keep only ids accepted by `keep`; returns the removed ids
    pub fn retain<F>(&mut self, mut keep: F) -> Vec<String>
    where
        F: FnMut(&str) -> bool,
    {
        let (kept, dropped): (BTreeSet<String>, BTreeSet<String>) =
            std::mem::take(&mut self.selected)
                .into_iter()
                .partition(|id| keep(id.as_str()));
        self.selected = kept;
        dropped.into_iter().collect()
    }

    /// Serializable form of this selection
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            selected_course_ids: self.selected.iter().cloned().collect(),
            student_name: self.student_name.clone(),
            student_id: if self.student_id.is_empty() {
                None
            } else {
                Some(self.student_id.clone())
            },
        }
    }

    /// Rebuild a selection from a snapshot, trimming identity fields
    #[must_use]
    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        let mut selection = Self {
            selected: snapshot.selected_course_ids.into_iter().collect(),
            ..Self::default()
        };
        selection.set_identity(
            &snapshot.student_name,
            snapshot.student_id.as_deref().unwrap_or_default(),
        );
        selection
    }
}

/// Persisted form: `{selectedCourseIds, studentName, studentId?}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Selected ids
    #[serde(default)]
    pub selected_course_ids: Vec<String>,
    /// Student name
    #[serde(default)]
    pub student_name: String,
    /// Student identifier; older snapshots stored it as `studentIdNumber`
    #[serde(default, alias = "studentIdNumber", skip_serializing_if = "Option::is_none")]
    pub student_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_flips() {
        let mut selection = Selection::new();
        assert!(selection.toggle("c1"));
        assert!(selection.is_selected("c1"));
        assert!(!selection.toggle("c1"));
        assert!(selection.is_empty());
    }

    #[test]
    fn test_insert_is_idempotent() {
        let mut selection = Selection::new();
        assert!(selection.insert("c1"));
        assert!(!selection.insert("c1"));
        assert_eq!(selection.len(), 1);
    }

    #[test]
    fn test_identity_is_trimmed() {
        let mut selection = Selection::new();
        selection.set_identity("  Kim Minji ", "\t20417 ");
        assert_eq!(selection.student_name(), "Kim Minji");
        assert_eq!(selection.student_id(), "20417");
    }

    #[test]
    fn test_snapshot_accepts_legacy_id_field() {
        let json = r#"{"selectedCourseIds": ["c2", "c1"], "studentName": "Lee", "studentIdNumber": "30112"}"#;
        let snapshot: Snapshot = serde_json::from_str(json).unwrap();
        let selection = Selection::from_snapshot(snapshot);

        assert_eq!(selection.ids().collect::<Vec<_>>(), vec!["c1", "c2"]);
        assert_eq!(selection.student_id(), "30112");
    }

    #[test]
    fn test_snapshot_omits_empty_id() {
        let mut selection = Selection::new();
        selection.insert("c1");
        selection.set_identity("Lee", "");
        let json = serde_json::to_string(&selection.snapshot()).unwrap();
        assert_eq!(json, r#"{"selectedCourseIds":["c1"],"studentName":"Lee"}"#);
    }

    #[test]
    fn test_retain_reports_dropped() {
        let mut selection = Selection::new();
        selection.insert("c1");
        selection.insert("gone");
        let dropped = selection.retain(|id| id != "gone");
        assert_eq!(dropped, vec!["gone"]);
        assert_eq!(selection.len(), 1);
    }
}
