//! HTML confirmation generator
//!
//! Renders a self-contained, printable page through an askama template. Each
//! new year starts on a new printed page.

use crate::core::report::{ConfirmationContext, ReportGenerator, SlotSection, TITLE};
use askama::Template;
use std::error::Error;
use std::fs;
use std::path::Path;

#[derive(Template)]
#[template(path = "confirmation.html")]
struct ConfirmationPage<'a> {
    title: &'a str,
    student_line: String,
    sections: &'a [SlotSection],
    total_hours: u32,
}

/// HTML confirmation generator
pub struct HtmlReporter;

impl HtmlReporter {
    /// Create a new HTML reporter
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Default for HtmlReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for HtmlReporter {
    fn generate(
        &self,
        ctx: &ConfirmationContext,
        output_path: &Path,
    ) -> Result<(), Box<dyn Error>> {
        let content = self.render(ctx)?;
        fs::write(output_path, content)?;
        Ok(())
    }

    fn render(&self, ctx: &ConfirmationContext) -> Result<String, Box<dyn Error>> {
        let page = ConfirmationPage {
            title: TITLE,
            student_line: ctx.student_line(),
            sections: &ctx.sections,
            total_hours: ctx.total_hours,
        };
        Ok(page.render()?)
    }
}
