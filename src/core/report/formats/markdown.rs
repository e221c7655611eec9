//! Markdown confirmation generator
//!
//! Renders the confirmation as Markdown tables; years are separated by a
//! horizontal rule.

use crate::core::report::{ConfirmationContext, ReportGenerator, TITLE};
use std::error::Error;
use std::fmt::Write;
use std::fs;
use std::path::Path;

/// Embedded Markdown confirmation template
const MARKDOWN_TEMPLATE: &str = include_str!("../templates/confirmation.md");

/// Markdown confirmation generator
pub struct MarkdownReporter;

impl MarkdownReporter {
    /// Create a new Markdown reporter
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Render the document using template substitution
    #[allow(clippy::unused_self)]
    fn render_template(&self, ctx: &ConfirmationContext) -> String {
        let mut output = MARKDOWN_TEMPLATE.to_string();

        output = output.replace("{{title}}", TITLE);
        output = output.replace("{{student_line}}", &ctx.student_line());
        output = output.replace("{{sections}}", &Self::generate_sections(ctx));

        let total = if ctx.is_empty() {
            "No courses selected.".to_string()
        } else {
            format!("**Overall selected credits: {}**", ctx.total_hours)
        };
        output = output.replace("{{total}}", &total);

        output
    }

    /// One table per slot with its total underneath
    fn generate_sections(ctx: &ConfirmationContext) -> String {
        let mut out = String::new();

        for section in &ctx.sections {
            if section.new_page {
                out.push_str("---\n\n");
            }
            let _ = writeln!(out, "## {}\n", section.heading);
            out.push_str("| Course | Credits |\n");
            out.push_str("|---|---:|\n");
            for row in &section.rows {
                let _ = writeln!(out, "| {} | {} |", escape_cell(&row.name), row.hours);
            }
            let _ = writeln!(
                out,
                "\nTotal credits for {}: {}\n",
                section.slot, section.total_hours
            );
        }

        out
    }
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}

impl Default for MarkdownReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for MarkdownReporter {
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
        Ok(self.render_template(ctx))
    }
}
