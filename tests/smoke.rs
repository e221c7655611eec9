//! Integration smoke tests for `course_selection`

use course_selection::config::Config;
use course_selection::core::catalog::{load_catalog, CatalogSource};
use course_selection::core::models::{GroupIndex, Slot};
use course_selection::core::validation::RuleSet;
use course_selection::get_version;
use course_selection::logger::{self, Level};
use std::path::PathBuf;

fn sample_catalog_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("samples/courses.json")
}

#[test]
fn version_is_not_empty() {
    let v = get_version();
    assert!(!v.trim().is_empty());
}

#[test]
fn logger_level_round_trips() {
    logger::set_level(Level::Error);
    assert_eq!(logger::level(), Level::Error);
    assert!(logger::set_level_from_str("info"));
    assert_eq!(logger::level(), Level::Info);
    assert!(!logger::set_level_from_str("loud"));
    assert_eq!(logger::level(), Level::Info);
}

#[test]
fn sample_catalog_matches_default_rules() {
    let catalog = load_catalog(&CatalogSource::File(sample_catalog_path())).unwrap();
    let rules = RuleSet::from_config(&Config::from_defaults().rules).unwrap();
    let groups = GroupIndex::build(&catalog, &rules.mandatory_group);

    for slot in rules.slots() {
        let slot_groups = groups.slot(slot).unwrap();
        assert!(slot_groups[&rules.mandatory_group].mandatory, "{slot}");
    }
    assert!(groups.slot(Slot::new(1, 1)).is_none());

    for id in rules
        .exact_category
        .course_ids
        .iter()
        .chain(&rules.max_category.course_ids)
    {
        assert!(catalog.contains(id), "sample catalog lacks {id}");
    }
}

#[test]
fn sample_catalog_has_an_eligible_plan() {
    use course_selection::core::session::Session;

    let catalog = load_catalog(&CatalogSource::File(sample_catalog_path())).unwrap();
    let rules = RuleSet::from_config(&Config::from_defaults().rules).unwrap();
    let mut session = Session::open(catalog, rules, None);

    let plan = [
        "c5", "c6", "c11", "c12", "c19", // year 2 semester 1
        "c27", "c28", "c33", "c35", "c37", // year 2 semester 2
        "c46", "c47", "c57", "c59", "c55", // year 3 semester 1
        "c65", "c66", "c71", "c72", "c80", // year 3 semester 2
    ];
    for id in plan {
        session.select(id).unwrap();
    }
    session.set_identity("Kim Minji", "20417");

    let report = session.report();
    for slot in &report.slots {
        assert!(slot.passed, "{} failed: {:?}", slot.slot, slot.findings);
        assert_eq!(slot.total_hours, 29);
    }
    assert!(report.export_eligible(), "{:?}", report.global);
}
