//! Integration tests for session hydration and persistence

use course_selection::core::catalog::Catalog;
use course_selection::core::models::{Course, Slot};
use course_selection::core::selection::Snapshot;
use course_selection::core::session::{SelectionError, Session};
use course_selection::core::store::StateStore;
use course_selection::core::validation::RuleSet;
use std::collections::BTreeMap;
use std::fs;
use tempfile::TempDir;

const MANDATORY: &str = "School Designated";
const KEY: &str = "courseSelectionsApp_Y2Y3";

fn catalog() -> Catalog {
    let y2s1 = Slot::new(2, 1);
    let y2s2 = Slot::new(2, 2);
    Catalog::from_courses(vec![
        Course::new("m1", "Korean", y2s1, 5, MANDATORY, 0).mandatory(),
        Course::new("m2", "English", y2s2, 5, MANDATORY, 0).mandatory(),
        Course::new("e1", "Physics", y2s1, 4, "Science", 1),
        Course::new("e2", "Chemistry", y2s2, 4, "Science", 1),
    ])
    .unwrap()
}

fn rules() -> RuleSet {
    RuleSet {
        mandatory_group: MANDATORY.to_string(),
        require_student_id: true,
        required_hours: BTreeMap::from([(Slot::new(2, 1), 9), (Slot::new(2, 2), 9)]),
        ..RuleSet::default()
    }
}

fn selected(session: &Session) -> Vec<&str> {
    session.selection().ids().collect()
}

#[test]
fn test_first_load_selects_mandatory_courses() {
    let dir = TempDir::new().unwrap();
    let store = StateStore::new(dir.path(), KEY);

    let session = Session::open(catalog(), rules(), Some(store));
    assert_eq!(selected(&session), vec!["m1", "m2"]);
    assert_eq!(session.selection().student_name(), "");
}

#[test]
fn test_restored_selection_is_not_overridden() {
    let dir = TempDir::new().unwrap();
    let store = StateStore::new(dir.path(), KEY);
    store
        .save(&Snapshot {
            selected_course_ids: vec!["e1".to_string()],
            student_name: "Lee".to_string(),
            student_id: Some("30112".to_string()),
        })
        .unwrap();

    let session = Session::open(catalog(), rules(), Some(store));
    assert_eq!(selected(&session), vec!["e1"]);
    assert_eq!(session.selection().student_name(), "Lee");
    assert_eq!(session.selection().student_id(), "30112");
}

#[test]
fn test_unknown_ids_dropped_before_defaults() {
    let dir = TempDir::new().unwrap();
    let store = StateStore::new(dir.path(), KEY);
    store
        .save(&Snapshot {
            selected_course_ids: vec!["retired-course".to_string()],
            student_name: "Lee".to_string(),
            student_id: None,
        })
        .unwrap();

    let session = Session::open(catalog(), rules(), Some(store));
    assert_eq!(selected(&session), vec!["m1", "m2"]);
    assert_eq!(session.selection().student_name(), "Lee");
}

#[test]
fn test_malformed_snapshot_starts_fresh() {
    let dir = TempDir::new().unwrap();
    let store = StateStore::new(dir.path(), KEY);
    fs::write(store.path(), "{\"selectedCourseIds\": [").unwrap();

    let session = Session::open(catalog(), rules(), Some(store));
    assert_eq!(selected(&session), vec!["m1", "m2"]);
}

#[test]
fn test_legacy_snapshot_field() {
    let dir = TempDir::new().unwrap();
    let store = StateStore::new(dir.path(), KEY);
    fs::write(
        store.path(),
        r#"{"selectedCourseIds":["m1","e1"],"studentName":" Park ","studentIdNumber":"20233"}"#,
    )
    .unwrap();

    let session = Session::open(catalog(), rules(), Some(store));
    assert_eq!(session.selection().student_name(), "Park");
    assert_eq!(session.selection().student_id(), "20233");
}

#[test]
fn test_mutations_survive_reopen() {
    let dir = TempDir::new().unwrap();
    let store = StateStore::new(dir.path(), KEY);

    let mut session = Session::open(catalog(), rules(), Some(store.clone()));
    session.select("e1").unwrap();
    session.toggle("e2").unwrap();
    session.set_identity("Kim", "20101");
    assert!(session.report().export_eligible());

    let reopened = Session::open(catalog(), rules(), Some(store));
    assert_eq!(selected(&reopened), vec!["e1", "e2", "m1", "m2"]);
    assert!(reopened.report().export_eligible());
}

#[test]
fn test_rejected_changes_are_not_persisted() {
    let dir = TempDir::new().unwrap();
    let store = StateStore::new(dir.path(), KEY);

    let mut session = Session::open(catalog(), rules(), Some(store.clone()));
    assert_eq!(
        session.deselect("m2"),
        Err(SelectionError::Mandatory("m2".to_string()))
    );
    assert!(matches!(
        session.toggle("x9"),
        Err(SelectionError::UnknownCourse(_))
    ));
    assert!(store.load().is_none());
}

#[test]
fn test_failed_write_keeps_mutation() {
    let dir = TempDir::new().unwrap();
    // A file where the state directory should be makes every write fail
    let blocker = dir.path().join("state");
    fs::write(&blocker, "").unwrap();
    let store = StateStore::new(&blocker, KEY);

    let mut session = Session::open(catalog(), rules(), Some(store));
    assert_eq!(session.select("e1"), Ok(true));
    assert!(session.selection().is_selected("e1"));
}
