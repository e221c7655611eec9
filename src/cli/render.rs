//! Terminal rendering of the catalog and validation reports

use course_selection::core::models::Course;
use course_selection::core::selection::Selection;
use course_selection::core::session::Session;
use course_selection::core::validation::ValidationReport;
use std::fmt::Write;

/// Catalog listing: slots, groups in display order, courses with selection marks
pub fn catalog(session: &Session) -> String {
    let catalog = session.catalog();
    let selection = session.selection();
    let mut out = String::new();

    for slot in catalog.partition().keys().copied() {
        match session.rules().required_hours.get(&slot) {
            Some(required) => {
                let _ = writeln!(out, "\n=== {slot} (required credits: {required}) ===");
            }
            None => {
                let _ = writeln!(out, "\n=== {slot} (not validated) ===");
            }
        }

        for group in session.groups().display_order(slot) {
            if group.mandatory {
                let _ = writeln!(out, "  [{}] school designated", group.name);
            } else {
                let count = group.selected_count(|id| selection.is_selected(id));
                let _ = writeln!(
                    out,
                    "  [{}] choose {} ({count} selected)",
                    group.name, group.quota
                );
            }

            let mut courses: Vec<&Course> = group
                .course_ids
                .iter()
                .filter_map(|id| catalog.get(id))
                .collect();
            courses.sort_by(|a, b| a.name.cmp(&b.name));

            for course in courses {
                let mark = if selection.is_selected(&course.id) { "x" } else { " " };
                let lock = if course.mandatory { " (locked)" } else { "" };
                let _ = writeln!(
                    out,
                    "    [{mark}] {:<6} {} ({} credits){lock}",
                    course.id, course.name, course.hours
                );
            }
        }
    }

    let _ = writeln!(out, "\n{}", identity_line(selection));
    out
}

/// Validation report: per-slot findings, then the global findings
pub fn report(report: &ValidationReport) -> String {
    let mut out = String::new();

    for slot in &report.slots {
        let _ = writeln!(
            out,
            "\n=== {} ({}/{} credits) ===",
            slot.slot, slot.total_hours, slot.required_hours
        );
        for finding in &slot.findings {
            let _ = writeln!(out, "  {finding}");
        }
    }

    let _ = writeln!(out, "\n=== Overall ===");
    for finding in &report.global {
        let _ = writeln!(out, "  {finding}");
    }

    if report.export_eligible() {
        let _ = writeln!(out, "\nExport: available");
    } else {
        let errors = report.findings().filter(|finding| finding.is_error()).count();
        let _ = writeln!(out, "\nExport: not available ({errors} issue(s) to resolve)");
    }
    out
}

/// "Student: name (ID: id)" with placeholders for blank fields
pub fn identity_line(selection: &Selection) -> String {
    let name = match selection.student_name() {
        "" => "(name not entered)",
        name => name,
    };
    match selection.student_id() {
        "" => format!("Student: {name}"),
        id => format!("Student: {name} (ID: {id})"),
    }
}
