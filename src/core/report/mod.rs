//! Confirmation document generation
//!
//! This module builds the confirmation document handed to the homeroom teacher
//! after a successful selection, in Markdown, HTML or PDF form.

pub mod formats;

use crate::core::models::{natural_cmp, Course, Slot};
use crate::core::session::Session;
use std::error::Error;
use std::path::Path;

pub use formats::{HtmlReporter, MarkdownReporter, PdfReporter, ReportFormat};

/// Placeholder printed for identity fields left blank
pub const NOT_ENTERED: &str = "Not entered";

/// Document title
pub const TITLE: &str = "Course Selection Confirmation";

/// One course line of a slot table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmationRow {
    /// Course display name
    pub name: String,
    /// Credit hours
    pub hours: u32,
}

/// Selected courses of one slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotSection {
    /// The slot
    pub slot: Slot,
    /// Heading, e.g. "year 2 semester 1 selected courses"
    pub heading: String,
    /// Rows sorted mandatory group first, then group, then course name
    pub rows: Vec<ConfirmationRow>,
    /// Sum of the rows' hours
    pub total_hours: u32,
    /// Whether this section opens a new year and starts on a new page
    pub new_page: bool,
}

/// Data context for confirmation rendering
///
/// Everything a template needs, already ordered and totalled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmationContext {
    /// Trimmed student name, empty when not entered
    pub student_name: String,
    /// Trimmed student identifier, empty when not entered
    pub student_id: String,
    /// Slots with at least one selected course, ascending
    pub sections: Vec<SlotSection>,
    /// Hours across all sections
    pub total_hours: u32,
}

impl ConfirmationContext {
    /// Collect the selected courses of `session`
    #[must_use]
    pub fn from_session(session: &Session) -> Self {
        let catalog = session.catalog();
        let groups = session.groups();
        let selection = session.selection();

        let mut sections = Vec::new();
        let mut previous_year = None;
        for (slot, courses) in catalog.partition() {
            let mut picked: Vec<&Course> = courses
                .into_iter()
                .filter(|course| selection.is_selected(&course.id))
                .collect();
            if picked.is_empty() {
                continue;
            }

            let is_mandatory =
                |course: &Course| groups.group(slot, &course.group).is_some_and(|g| g.mandatory);
            picked.sort_by(|a, b| {
                is_mandatory(*b)
                    .cmp(&is_mandatory(*a))
                    .then_with(|| natural_cmp(&a.group, &b.group))
                    .then_with(|| a.name.cmp(&b.name))
            });

            let rows: Vec<ConfirmationRow> = picked
                .iter()
                .map(|course| ConfirmationRow {
                    name: course.name.clone(),
                    hours: course.hours,
                })
                .collect();
            let total_hours = rows.iter().map(|row| row.hours).sum();
            let new_page = previous_year.is_some_and(|year| year != slot.year);
            previous_year = Some(slot.year);

            sections.push(SlotSection {
                slot,
                heading: format!("{slot} selected courses"),
                rows,
                total_hours,
                new_page,
            });
        }

        let total_hours = sections.iter().map(|section| section.total_hours).sum();
        Self {
            student_name: selection.student_name().to_string(),
            student_id: selection.student_id().to_string(),
            sections,
            total_hours,
        }
    }

    /// Student line: name, plus the identifier when one was entered
    #[must_use]
    pub fn student_line(&self) -> String {
        let name = if self.student_name.is_empty() {
            NOT_ENTERED
        } else {
            self.student_name.as_str()
        };
        if self.student_id.is_empty() {
            format!("Student name: {name}")
        } else {
            format!("Student name: {name}  (Student ID: {})", self.student_id)
        }
    }

    /// Whether any course is listed
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Default file name: `course_selection_{id}_{name}.{ext}`
    ///
    /// A blank name becomes `student`; a blank identifier drops its segment.
    #[must_use]
    pub fn file_name(&self, format: ReportFormat) -> String {
        let name = if self.student_name.is_empty() {
            "student".to_string()
        } else {
            sanitize(&self.student_name)
        };
        let prefix = if self.student_id.is_empty() {
            name
        } else {
            format!("{}_{name}", sanitize(&self.student_id))
        };
        format!("course_selection_{prefix}.{}", format.extension())
    }
}

fn sanitize(segment: &str) -> String {
    segment
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_whitespace() => '_',
            c => c,
        })
        .collect()
}

/// Trait for confirmation generators
pub trait ReportGenerator {
    /// Generate the document to a file
    ///
    /// # Errors
    /// Returns an error if rendering or file writing fails
    fn generate(&self, ctx: &ConfirmationContext, output_path: &Path) -> Result<(), Box<dyn Error>>;

    /// Generate document content as a string
    ///
    /// # Errors
    /// Returns an error if rendering fails
    fn render(&self, ctx: &ConfirmationContext) -> Result<String, Box<dyn Error>>;
}

/// Generator for `format`, using `pdf_converter` when it is non-empty
#[must_use]
pub fn generator_for(format: ReportFormat, pdf_converter: &str) -> Box<dyn ReportGenerator> {
    match format {
        ReportFormat::Markdown => Box::new(MarkdownReporter::new()),
        ReportFormat::Html => Box::new(HtmlReporter::new()),
        ReportFormat::Pdf if pdf_converter.is_empty() => Box::new(PdfReporter::new()),
        ReportFormat::Pdf => Box::new(PdfReporter::with_converter(pdf_converter)),
    }
}
