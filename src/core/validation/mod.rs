//! Validation engine
//!
//! [`validate`] recomputes the whole report from scratch. It has no side
//! effects and the same inputs always produce the same findings in the same
//! order: slots ascending, then the global checks.

pub mod findings;
pub mod rules;

pub use findings::{Eligibility, Finding, Severity, SlotReport, ValidationReport};
pub use rules::{ExactCountRule, MaxCountRule, RuleSet};

use crate::core::catalog::Catalog;
use crate::core::models::{Course, GroupIndex, Slot};
use crate::core::selection::Selection;
use std::collections::{BTreeMap, BTreeSet};

/// Validate `selection` against the catalog, its groups and `rules`
#[must_use]
pub fn validate(
    catalog: &Catalog,
    groups: &GroupIndex,
    selection: &Selection,
    rules: &RuleSet,
) -> ValidationReport {
    let slots: Vec<SlotReport> = rules
        .required_hours
        .iter()
        .map(|(&slot, &required)| validate_slot(catalog, groups, selection, slot, required))
        .collect();

    let selected: Vec<&Course> = selection.ids().filter_map(|id| catalog.get(id)).collect();
    let identity_missing = identity_finding(selection, rules);

    let mut eligibility = Eligibility {
        identity_complete: identity_missing.is_none(),
        has_selection: !selection.is_empty(),
        slots_pass: slots.iter().all(|report| report.passed),
        no_duplicates: true,
        exact_category_pass: true,
        max_category_pass: true,
    };
    let mut global = Vec::new();

    let duplicates = duplicate_findings(&selected);
    eligibility.no_duplicates = duplicates.is_empty();

    if !eligibility.slots_pass && eligibility.no_duplicates {
        let failing: Vec<String> = slots
            .iter()
            .filter(|report| !report.passed)
            .map(|report| report.slot.to_string())
            .collect();
        global.push(Finding::error(format!(
            "Course selection conditions are not met for: {}. Check each slot's selections.",
            failing.join(", ")
        )));
    }
    global.extend(duplicates);

    let (exact_pass, exact_finding) =
        check_exact(catalog, selection, &rules.exact_category, eligibility.has_selection);
    eligibility.exact_category_pass = exact_pass;
    global.extend(exact_finding);

    let (max_pass, max_finding) =
        check_max(catalog, selection, &rules.max_category, eligibility.has_selection);
    eligibility.max_category_pass = max_pass;
    global.extend(max_finding);

    match identity_missing {
        Some(finding) => global.push(finding),
        None if !eligibility.has_selection => {
            global.push(Finding::error("No courses selected. Please select courses."));
        }
        None => {}
    }

    if eligibility.is_eligible() {
        global.push(Finding::success(
            "All course selection conditions are met. Export and submission are available.",
        ));
    } else if eligibility.identity_complete && eligibility.has_selection {
        global.push(Finding::error(
            "Some course selection conditions are not met. Check the messages above.",
        ));
    }

    ValidationReport {
        slots,
        global,
        eligibility,
    }
}

fn validate_slot(
    catalog: &Catalog,
    groups: &GroupIndex,
    selection: &Selection,
    slot: Slot,
    required: u32,
) -> SlotReport {
    let Some(slot_groups) = groups.slot(slot) else {
        return SlotReport {
            slot,
            passed: true,
            findings: vec![Finding::info(format!("No course information for {slot}."))],
            total_hours: 0,
            required_hours: required,
        };
    };

    let mut findings = Vec::new();
    let mut passed = true;

    for group in slot_groups.values().filter(|group| !group.mandatory) {
        let count = group.selected_count(|id| selection.is_selected(id));
        if count == group.quota {
            findings.push(Finding::success(format!(
                "Group \"{}\" complete! ({count}/{})",
                group.name, group.quota
            )));
        } else {
            passed = false;
            findings.push(Finding::error(format!(
                "Group \"{}\" requires {} course(s) (currently {count} selected).",
                group.name, group.quota
            )));
        }
    }

    let total_hours: u32 = catalog
        .slot_courses(slot)
        .into_iter()
        .filter(|course| selection.is_selected(&course.id))
        .map(|course| course.hours)
        .sum();

    if total_hours == required {
        findings.push(Finding::success(format!(
            "Credit total for {slot} met! ({total_hours}/{required})"
        )));
    } else {
        passed = false;
        findings.push(Finding::error(format!(
            "Total credits for {slot} must be exactly {required} (currently {total_hours})."
        )));
    }

    let summary = if passed {
        Finding::success(format!("All conditions for {slot} are met."))
    } else {
        Finding::error(format!("Some conditions for {slot} are not met."))
    };
    findings.insert(0, summary);

    SlotReport {
        slot,
        passed,
        findings,
        total_hours,
        required_hours: required,
    }
}

/// One finding per course name selected in more than one distinct semester
fn duplicate_findings(selected: &[&Course]) -> Vec<Finding> {
    let mut by_name: BTreeMap<&str, Vec<&Course>> = BTreeMap::new();
    for course in selected {
        by_name.entry(course.name.as_str()).or_default().push(course);
    }

    by_name
        .into_iter()
        .filter(|(_, offerings)| {
            offerings
                .iter()
                .map(|course| course.semester)
                .collect::<BTreeSet<_>>()
                .len()
                > 1
        })
        .map(|(name, mut offerings)| {
            offerings.sort_by_key(|course| (course.slot(), course.id.clone()));
            let locations: Vec<String> = offerings
                .iter()
                .map(|course| course.slot().to_string())
                .collect();
            Finding::error(format!(
                "Course \"{name}\" cannot be selected in more than one semester (selected in: {}).",
                locations.join(", ")
            ))
        })
        .collect()
}

fn category_names(catalog: &Catalog, ids: &[String]) -> String {
    ids.iter()
        .map(|id| catalog.display_name(id))
        .collect::<Vec<_>>()
        .join(", ")
}

fn count_selected(selection: &Selection, ids: &[String]) -> usize {
    ids.iter().filter(|id| selection.is_selected(id)).count()
}

fn check_exact(
    catalog: &Catalog,
    selection: &Selection,
    rule: &ExactCountRule,
    has_selection: bool,
) -> (bool, Option<Finding>) {
    if rule.course_ids.is_empty() {
        return (true, None);
    }
    let count = count_selected(selection, &rule.course_ids);
    if count == rule.count {
        let finding = has_selection.then(|| {
            Finding::success(format!(
                "{} requirement met! (exactly {} selected)",
                rule.label, rule.count
            ))
        });
        (true, finding)
    } else {
        let finding = Finding::error(format!(
            "Select exactly {} of the {} courses ({}) (currently {count} selected).",
            rule.count,
            rule.label,
            category_names(catalog, &rule.course_ids)
        ));
        (false, Some(finding))
    }
}

fn check_max(
    catalog: &Catalog,
    selection: &Selection,
    rule: &MaxCountRule,
    has_selection: bool,
) -> (bool, Option<Finding>) {
    if rule.course_ids.is_empty() {
        return (true, None);
    }
    let count = count_selected(selection, &rule.course_ids);
    if count > rule.max {
        let finding = Finding::error(format!(
            "Select at most {} of the {} courses ({}) (currently {count} selected).",
            rule.max,
            rule.label,
            category_names(catalog, &rule.course_ids)
        ));
        (false, Some(finding))
    } else {
        let finding = has_selection.then(|| {
            Finding::success(format!(
                "{} requirement met! (at most {}, currently {count})",
                rule.label, rule.max
            ))
        });
        (true, finding)
    }
}

fn identity_finding(selection: &Selection, rules: &RuleSet) -> Option<Finding> {
    if selection.student_name().is_empty() {
        Some(Finding::error("Please enter the student name."))
    } else if rules.require_student_id && selection.student_id().is_empty() {
        Some(Finding::error("Please enter the student ID."))
    } else {
        None
    }
}
