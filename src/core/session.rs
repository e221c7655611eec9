//! Session controller owning every piece of mutable state
//!
//! Each mutation re-validates from scratch and writes a snapshot.

use crate::core::catalog::Catalog;
use crate::core::models::GroupIndex;
use crate::core::selection::Selection;
use crate::core::store::{StateStore, StoreError};
use crate::core::validation::{validate, RuleSet, ValidationReport};
use crate::{debug, error, info, warn};
use thiserror::Error;

/// Rejected selection changes
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    /// The id is not in the catalog
    #[error("unknown course id '{0}'")]
    UnknownCourse(String),

    /// Mandatory courses are locked
    #[error("course '{0}' is mandatory and cannot be changed")]
    Mandatory(String),
}

/// Catalog, groups, selection and rules of one run
#[derive(Debug)]
pub struct Session {
    catalog: Catalog,
    groups: GroupIndex,
    selection: Selection,
    rules: RuleSet,
    store: Option<StateStore>,
}

impl Session {
    /// Start a session with an explicit selection and no persistence
    #[must_use]
    pub fn new(catalog: Catalog, rules: RuleSet, selection: Selection) -> Self {
        let groups = GroupIndex::build(&catalog, &rules.mandatory_group);
        Self {
            catalog,
            groups,
            selection,
            rules,
            store: None,
        }
    }

    /// Start a session, restoring the snapshot kept in `store`.
    ///
    /// Unknown ids in the snapshot are dropped. When nothing remains
    /// selected, every mandatory course is selected.
    #[must_use]
    pub fn open(catalog: Catalog, rules: RuleSet, store: Option<StateStore>) -> Self {
        let snapshot = store.as_ref().and_then(StateStore::load);
        let restored = snapshot.is_some();
        let mut selection = snapshot.map(Selection::from_snapshot).unwrap_or_default();

        let dropped = selection.retain(|id| catalog.contains(id));
        for id in &dropped {
            warn!("Dropping unknown course '{id}' from the restored selection");
        }

        let mut session = Self::new(catalog, rules, selection);
        session.warn_unconfigured_slots();

        if session.selection.is_empty() {
            session.select_mandatory();
        } else {
            info!(
                "Restored {} selected courses, mandatory defaults not applied",
                session.selection.len()
            );
        }
        if !restored {
            debug!("Starting with a fresh selection");
        }

        session.store = store;
        session
    }

    fn warn_unconfigured_slots(&self) {
        for slot in self.catalog.partition().keys() {
            if !self.rules.required_hours.contains_key(slot) {
                warn!("No credit target configured for {slot}; its courses are not validated");
            }
        }
    }

    fn select_mandatory(&mut self) {
        let ids: Vec<String> = self.catalog.mandatory_ids().map(str::to_string).collect();
        for id in &ids {
            self.selection.insert(id);
        }
        debug!("Selected {} mandatory courses by default", ids.len());
    }

    /// The loaded catalog
    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Group structure derived from the catalog
    #[must_use]
    pub const fn groups(&self) -> &GroupIndex {
        &self.groups
    }

    /// Current selection
    #[must_use]
    pub const fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Active rule set
    #[must_use]
    pub const fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Snapshot store, when persistence is enabled
    #[must_use]
    pub const fn store(&self) -> Option<&StateStore> {
        self.store.as_ref()
    }

    /// Validate the current state
    #[must_use]
    pub fn report(&self) -> ValidationReport {
        validate(&self.catalog, &self.groups, &self.selection, &self.rules)
    }

    /// Flip a course; returns its new state
    ///
    /// # Errors
    /// Returns an error if the id is unknown or the course is mandatory.
    pub fn toggle(&mut self, id: &str) -> Result<bool, SelectionError> {
        self.editable(id)?;
        let selected = self.selection.toggle(id);
        debug!("Toggled {id}: {}", if selected { "selected" } else { "deselected" });
        self.persist();
        Ok(selected)
    }

    /// Select a course; returns `false` if it already was
    ///
    /// # Errors
    /// Returns an error if the id is unknown or the course is mandatory.
    pub fn select(&mut self, id: &str) -> Result<bool, SelectionError> {
        self.editable(id)?;
        let changed = self.selection.insert(id);
        if changed {
            self.persist();
        }
        Ok(changed)
    }

    /// Deselect a course; returns `false` if it was not selected
    ///
    /// # Errors
    /// Returns an error if the id is unknown or the course is mandatory.
    pub fn deselect(&mut self, id: &str) -> Result<bool, SelectionError> {
        self.editable(id)?;
        let changed = self.selection.remove(id);
        if changed {
            self.persist();
        }
        Ok(changed)
    }

    /// Overwrite the student name and identifier
    pub fn set_identity(&mut self, name: &str, id: &str) {
        self.selection.set_identity(name, id);
        self.persist();
    }

    /// Forget the persisted snapshot and return to first-load defaults
    ///
    /// # Errors
    /// Returns an error if the snapshot exists but cannot be removed.
    pub fn clear(&mut self) -> Result<bool, StoreError> {
        let removed = match &self.store {
            Some(store) => store.clear()?,
            None => false,
        };
        self.selection = Selection::new();
        self.select_mandatory();
        Ok(removed)
    }

    fn editable(&self, id: &str) -> Result<(), SelectionError> {
        match self.catalog.get(id) {
            None => Err(SelectionError::UnknownCourse(id.to_string())),
            Some(course) if course.mandatory => Err(SelectionError::Mandatory(id.to_string())),
            Some(_) => Ok(()),
        }
    }

    fn persist(&self) {
        let Some(store) = &self.store else {
            return;
        };
        if let Err(e) = store.save(&self.selection.snapshot()) {
            error!("Failed to save selection: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::{Course, Slot};
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    const MANDATORY: &str = "School Designated";

    fn catalog() -> Catalog {
        let slot = Slot::new(2, 1);
        Catalog::from_courses(vec![
            Course::new("m1", "Korean", slot, 5, MANDATORY, 0).mandatory(),
            Course::new("e1", "Physics", slot, 4, "Science", 1),
        ])
        .unwrap()
    }

    fn rules() -> RuleSet {
        RuleSet {
            mandatory_group: MANDATORY.to_string(),
            require_student_id: true,
            required_hours: BTreeMap::from([(Slot::new(2, 1), 9)]),
            ..RuleSet::default()
        }
    }

    #[test]
    fn test_mandatory_courses_are_locked() {
        let mut session = Session::open(catalog(), rules(), None);
        assert!(session.selection().is_selected("m1"));
        assert_eq!(
            session.toggle("m1"),
            Err(SelectionError::Mandatory("m1".to_string()))
        );
        assert_eq!(
            session.select("nope"),
            Err(SelectionError::UnknownCourse("nope".to_string()))
        );
    }

    #[test]
    fn test_mutations_are_persisted() {
        let dir = TempDir::new().unwrap();
        let store = StateStore::new(dir.path(), "state");

        let mut session = Session::open(catalog(), rules(), Some(store.clone()));
        assert_eq!(session.toggle("e1"), Ok(true));
        session.set_identity(" Kim ", "20101");

        let snapshot = store.load().unwrap();
        assert_eq!(snapshot.selected_course_ids, vec!["e1", "m1"]);
        assert_eq!(snapshot.student_name, "Kim");
        assert!(session.report().export_eligible());
    }

    #[test]
    fn test_select_and_deselect_are_idempotent() {
        let mut session = Session::open(catalog(), rules(), None);
        assert_eq!(session.select("e1"), Ok(true));
        assert_eq!(session.select("e1"), Ok(false));
        assert_eq!(session.deselect("e1"), Ok(true));
        assert_eq!(session.deselect("e1"), Ok(false));
    }

    #[test]
    fn test_clear_restores_defaults() {
        let dir = TempDir::new().unwrap();
        let store = StateStore::new(dir.path(), "state");
        let mut session = Session::open(catalog(), rules(), Some(store));
        session.select("e1").unwrap();

        assert!(session.clear().unwrap());
        assert!(!session.selection().is_selected("e1"));
        assert!(session.selection().is_selected("m1"));
        assert!(session.store().unwrap().load().is_none());
    }
}
