//! Integration tests for confirmation export and submission

use course_selection::core::catalog::Catalog;
use course_selection::core::models::{Course, Slot};
use course_selection::core::report::{
    ConfirmationContext, HtmlReporter, MarkdownReporter, ReportFormat, ReportGenerator,
};
use course_selection::core::selection::Selection;
use course_selection::core::session::Session;
use course_selection::core::submission::{
    export_and_submit, ExportOutcome, RetryPolicy, SubmissionOutcome, SubmissionPayload,
    Submitter, Transport, TransportError,
};
use course_selection::core::validation::RuleSet;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use tempfile::TempDir;

const MANDATORY: &str = "School Designated";

/// Records every payload and fails the first `failures` calls
struct RecordingTransport {
    failures: u32,
    payloads: RefCell<Vec<SubmissionPayload>>,
}

impl RecordingTransport {
    fn failing(failures: u32) -> Self {
        Self {
            failures,
            payloads: RefCell::new(Vec::new()),
        }
    }
}

impl Transport for RecordingTransport {
    fn post_json(&self, _url: &str, payload: &SubmissionPayload) -> Result<(), TransportError> {
        let mut payloads = self.payloads.borrow_mut();
        payloads.push(payload.clone());
        if u32::try_from(payloads.len()).unwrap() <= self.failures {
            Err(TransportError::Status(429))
        } else {
            Ok(())
        }
    }
}

fn catalog() -> Catalog {
    let y2s1 = Slot::new(2, 1);
    let y3s1 = Slot::new(3, 1);
    Catalog::from_courses(vec![
        Course::new("m1", "Korean", y2s1, 5, MANDATORY, 0).mandatory(),
        Course::new("g2", "Zoology", y2s1, 4, "Group 2", 1),
        Course::new("g10", "Algebra", y2s1, 4, "Group 10", 1),
        Course::new("b1", "Biology", y2s1, 4, "Group 10", 1),
        Course::new("m2", "Reading", y3s1, 6, MANDATORY, 0).mandatory(),
        Course::new("h1", "History", y3s1, 3, "Social", 1),
    ])
    .unwrap()
}

fn rules() -> RuleSet {
    RuleSet {
        mandatory_group: MANDATORY.to_string(),
        require_student_id: true,
        required_hours: BTreeMap::from([(Slot::new(2, 1), 13), (Slot::new(3, 1), 9)]),
        ..RuleSet::default()
    }
}

fn eligible_session() -> Session {
    let mut selection = Selection::new();
    for id in ["m1", "g2", "g10", "m2", "h1"] {
        selection.insert(id);
    }
    selection.set_identity("Kim Minji", "20417");
    Session::new(catalog(), rules(), selection)
}

#[test]
fn test_confirmation_context_order_and_totals() {
    let ctx = ConfirmationContext::from_session(&eligible_session());

    assert_eq!(ctx.sections.len(), 2);
    let first = &ctx.sections[0];
    let names: Vec<&str> = first.rows.iter().map(|row| row.name.as_str()).collect();
    // mandatory group first, then "Group 2" before "Group 10"
    assert_eq!(names, vec!["Korean", "Zoology", "Algebra"]);
    assert_eq!(first.total_hours, 13);
    assert!(!first.new_page);
    assert!(ctx.sections[1].new_page);
    assert_eq!(ctx.total_hours, 22);
    assert_eq!(
        ctx.file_name(ReportFormat::Html),
        "course_selection_20417_Kim_Minji.html"
    );
}

#[test]
fn test_markdown_confirmation() {
    let ctx = ConfirmationContext::from_session(&eligible_session());
    let text = MarkdownReporter::new().render(&ctx).unwrap();

    assert!(text.starts_with("# Course Selection Confirmation"));
    assert!(text.contains("Student name: Kim Minji  (Student ID: 20417)"));
    assert!(text.contains("Homeroom teacher confirmation: _______________"));
    assert!(text.contains("## year 2 semester 1 selected courses"));
    assert!(text.contains("| Zoology | 4 |"));
    assert!(text.contains("Total credits for year 3 semester 1: 9"));
    assert!(text.contains("---\n\n## year 3 semester 1 selected courses"));
    assert!(text.contains("**Overall selected credits: 22**"));
}

#[test]
fn test_html_confirmation() {
    let ctx = ConfirmationContext::from_session(&eligible_session());
    let html = HtmlReporter::new().render(&ctx).unwrap();

    assert!(html.contains("<h1>Course Selection Confirmation</h1>"));
    assert!(html.contains("<td>Algebra</td>"));
    assert_eq!(html.matches("class=\"page-break\"").count(), 1);
    assert!(html.contains("Overall selected credits: 22"));
}

#[test]
fn test_empty_confirmation() {
    let mut selection = Selection::new();
    selection.set_identity("", "");
    let session = Session::new(catalog(), rules(), selection);
    let ctx = ConfirmationContext::from_session(&session);

    let text = MarkdownReporter::new().render(&ctx).unwrap();
    assert!(text.contains("Student name: Not entered"));
    assert!(text.contains("No courses selected."));
    assert_eq!(ctx.file_name(ReportFormat::Pdf), "course_selection_student.pdf");
}

#[test]
fn test_export_then_submit() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("exports").join("confirmation.md");
    let session = eligible_session();
    let submitter = Submitter::new(
        RecordingTransport::failing(2),
        "http://localhost/submit",
        RetryPolicy::immediate(5),
    );

    let outcome =
        export_and_submit(&session, &MarkdownReporter::new(), &output, Some(&submitter)).unwrap();

    assert_eq!(
        outcome,
        ExportOutcome::Exported {
            path: output.clone(),
            submission: Some(SubmissionOutcome::Submitted { attempts: 3 }),
        }
    );
    assert!(fs::read_to_string(&output).unwrap().contains("Kim Minji"));

    let payloads = submitter.transport().payloads.borrow();
    assert_eq!(payloads.len(), 3);
    assert_eq!(payloads[0].student_id, "20417");
    assert_eq!(payloads[0].selected_course_ids, vec!["g10", "g2", "h1", "m1", "m2"]);
}

#[test]
fn test_submission_failure_keeps_export() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("confirmation.html");
    let submitter = Submitter::new(
        RecordingTransport::failing(u32::MAX),
        "http://localhost/submit",
        RetryPolicy::immediate(5),
    );

    let outcome =
        export_and_submit(&eligible_session(), &HtmlReporter::new(), &output, Some(&submitter))
            .unwrap();

    match outcome {
        ExportOutcome::Exported {
            submission: Some(SubmissionOutcome::Failed { attempts, .. }),
            ..
        } => assert_eq!(attempts, 5),
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert!(output.exists());
}

#[test]
fn test_ineligible_export_is_blocked() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("confirmation.md");
    let mut selection = Selection::new();
    selection.insert("m1");
    selection.set_identity("Kim Minji", "20417");
    let session = Session::new(catalog(), rules(), selection);
    let submitter = Submitter::new(
        RecordingTransport::failing(0),
        "http://localhost/submit",
        RetryPolicy::immediate(5),
    );

    let outcome =
        export_and_submit(&session, &MarkdownReporter::new(), &output, Some(&submitter)).unwrap();

    assert_eq!(outcome, ExportOutcome::Blocked);
    assert!(!output.exists());
    assert!(submitter.transport().payloads.borrow().is_empty());
}

#[test]
fn test_export_failure_skips_submission() {
    let dir = TempDir::new().unwrap();
    // The output's parent is a regular file, so the write fails
    let blocker = dir.path().join("not-a-dir");
    fs::write(&blocker, "").unwrap();
    let output = blocker.join("confirmation.md");
    let submitter = Submitter::new(
        RecordingTransport::failing(0),
        "http://localhost/submit",
        RetryPolicy::immediate(5),
    );

    let result = export_and_submit(
        &eligible_session(),
        &MarkdownReporter::new(),
        &output,
        Some(&submitter),
    );

    assert!(result.is_err());
    assert!(submitter.transport().payloads.borrow().is_empty());
}

#[test]
fn test_export_without_submitter() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("confirmation.md");

    let outcome = export_and_submit::<RecordingTransport>(
        &eligible_session(),
        &MarkdownReporter::new(),
        &output,
        None,
    )
    .unwrap();

    assert_eq!(
        outcome,
        ExportOutcome::Exported {
            path: output,
            submission: None,
        }
    );
}
