//! Export command handler
//!
//! Writes the confirmation document and then submits the selection to the
//! configured endpoint.

use crate::render;
use course_selection::config::Config;
use course_selection::core::report::{generator_for, ConfirmationContext, ReportFormat};
use course_selection::core::submission::{
    export_and_submit, ExportOutcome, HttpTransport, RetryPolicy, SubmissionOutcome, Submitter,
};
use course_selection::{error, info};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Why the selection will not be posted after export, if it will not be
fn submission_skip_reason(config: &Config, no_submit: bool) -> Option<&'static str> {
    if no_submit {
        Some("--no-submit given")
    } else if config.submission.endpoint.trim().is_empty() {
        Some("no endpoint configured (courseselect config set endpoint URL)")
    } else {
        None
    }
}

/// Run the export command.
///
/// # Arguments
/// * `config` - Configuration with the exports directory, format and endpoint
/// * `format` - Optional format override (markdown, html, pdf)
/// * `output` - Optional output path
/// * `no_submit` - Skip the remote submission
///
/// # Errors
/// Returns a message if export is not available, the document cannot be
/// written, or the submission finally failed.
pub fn run(
    config: &Config,
    format: Option<&str>,
    output: Option<&Path>,
    no_submit: bool,
) -> Result<(), String> {
    let format_str = format.unwrap_or(&config.export.format);
    let format = ReportFormat::from_str(format_str)
        .map_err(|e| format!("✗ {e}. Use: markdown, html, or pdf"))?;

    let session = super::open_session(config)?;

    let output_path: PathBuf = output.map_or_else(
        || {
            let ctx = ConfirmationContext::from_session(&session);
            PathBuf::from(&config.paths.exports_dir).join(ctx.file_name(format))
        },
        Path::to_path_buf,
    );

    let skip_reason = submission_skip_reason(config, no_submit);
    let submitter = skip_reason.is_none().then(|| {
        Submitter::new(
            HttpTransport::new(),
            config.submission.endpoint.trim(),
            RetryPolicy::from_config(&config.submission),
        )
    });

    let generator = generator_for(format, &config.export.pdf_converter);
    let outcome = export_and_submit(&session, generator.as_ref(), &output_path, submitter.as_ref())
        .map_err(|e| {
            error!("{e}");
            format!("✗ {e}")
        })?;

    match outcome {
        ExportOutcome::Blocked => {
            print!("{}", render::report(&session.report()));
            Err("✗ Export is not available until all conditions are met".to_string())
        }
        ExportOutcome::Exported { path, submission } => {
            println!("✓ Confirmation exported: {}", path.display());
            match submission {
                None => {
                    let reason = skip_reason.unwrap_or("not requested");
                    info!("Submission skipped: {reason}");
                    println!("ℹ Submission skipped: {reason}");
                    Ok(())
                }
                Some(SubmissionOutcome::Submitted { .. }) => {
                    println!("✓ Selection submitted successfully");
                    Ok(())
                }
                Some(SubmissionOutcome::Failed {
                    attempts,
                    last_error,
                }) => {
                    error!("Submission failed after {attempts} attempts: {last_error}");
                    Err(format!(
                        "✗ The confirmation was exported, but submission failed after {attempts} attempts ({last_error}). Please try again later."
                    ))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_skips_submission() {
        let mut config = Config::from_defaults();
        assert!(submission_skip_reason(&config, false)
            .is_some_and(|reason| reason.starts_with("no endpoint configured")));

        config.submission.endpoint = "https://submit.example/exec".to_string();
        assert_eq!(submission_skip_reason(&config, false), None);
        assert_eq!(submission_skip_reason(&config, true), Some("--no-submit given"));
    }
}
