//! Export and best-effort remote submission
//!
//! The export is written first. Submission only starts once the document
//! exists, and a failed submission never undoes it.

use crate::config::{
    SubmissionConfig, DEFAULT_ATTEMPTS, DEFAULT_BASE_DELAY_MS, DEFAULT_JITTER_MS,
};
use crate::core::report::{ConfirmationContext, ReportGenerator};
use crate::core::selection::Selection;
use crate::core::session::Session;
use crate::{debug, info, warn};
use rand::Rng;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;
use thiserror::Error;

/// JSON body posted to the submission endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionPayload {
    /// Trimmed student name
    pub student_name: String,
    /// Trimmed student identifier
    pub student_id: String,
    /// Selected ids, ascending
    pub selected_course_ids: Vec<String>,
}

impl SubmissionPayload {
    /// Payload for the current selection
    #[must_use]
    pub fn from_selection(selection: &Selection) -> Self {
        Self {
            student_name: selection.student_name().to_string(),
            student_id: selection.student_id().to_string(),
            selected_course_ids: selection.ids().map(str::to_string).collect(),
        }
    }
}

/// A failed delivery attempt
#[derive(Debug, Error)]
pub enum TransportError {
    /// Connection or protocol failure
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The endpoint answered with a non-success status
    #[error("endpoint answered with status {0}")]
    Status(u16),
}

/// Delivers a payload to an endpoint
pub trait Transport {
    /// Post `payload` as JSON to `url`
    ///
    /// # Errors
    /// Returns an error on transport failure or a non-success status.
    fn post_json(&self, url: &str, payload: &SubmissionPayload) -> Result<(), TransportError>;
}

/// Blocking HTTP transport
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    /// Create a transport with a default client
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Transport for HttpTransport {
    fn post_json(&self, url: &str, payload: &SubmissionPayload) -> Result<(), TransportError> {
        let response = self.client.post(url).json(payload).send()?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(TransportError::Status(status.as_u16()))
        }
    }
}

/// Exponential backoff with random jitter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total number of attempts
    pub attempts: u32,
    /// Delay before the second attempt, doubled for every further one
    pub base_delay: Duration,
    /// Upper bound of the uniform jitter added to each delay
    pub jitter: Duration,
}

impl RetryPolicy {
    /// Policy from the `[submission]` config section
    #[must_use]
    pub const fn from_config(config: &SubmissionConfig) -> Self {
        Self {
            attempts: config.attempts,
            base_delay: Duration::from_millis(config.base_delay_ms),
            jitter: Duration::from_millis(config.jitter_ms),
        }
    }

    /// A policy that retries without sleeping
    #[must_use]
    pub const fn immediate(attempts: u32) -> Self {
        Self {
            attempts,
            base_delay: Duration::ZERO,
            jitter: Duration::ZERO,
        }
    }

    /// Smallest delay after the zero-based `attempt`: `base * 2^attempt`
    #[must_use]
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.base_delay
            .saturating_mul(2u32.saturating_pow(attempt))
    }

    /// Delay after the zero-based `attempt`, jitter included
    #[must_use]
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let jitter_ms =
            u64::try_from(self.jitter.as_millis()).unwrap_or(u64::MAX);
        let jitter = rand::thread_rng().gen_range(0..=jitter_ms);
        self.backoff(attempt)
            .saturating_add(Duration::from_millis(jitter))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: DEFAULT_ATTEMPTS,
            base_delay: Duration::from_millis(DEFAULT_BASE_DELAY_MS),
            jitter: Duration::from_millis(DEFAULT_JITTER_MS),
        }
    }
}

/// How a submission ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// Delivered on attempt number `attempts`
    Submitted {
        /// Attempts used, including the successful one
        attempts: u32,
    },
    /// All attempts failed
    Failed {
        /// Attempts made
        attempts: u32,
        /// Error text of the final attempt
        last_error: String,
    },
}

/// Posts payloads with retries
#[derive(Debug, Clone)]
pub struct Submitter<T: Transport> {
    transport: T,
    endpoint: String,
    policy: RetryPolicy,
}

impl<T: Transport> Submitter<T> {
    /// Create a submitter for `endpoint`
    #[must_use]
    pub fn new(transport: T, endpoint: &str, policy: RetryPolicy) -> Self {
        Self {
            transport,
            endpoint: endpoint.to_string(),
            policy,
        }
    }

    /// The transport in use
    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Deliver `payload`, retrying until success or the attempt budget runs out
    pub fn submit(&self, payload: &SubmissionPayload) -> SubmissionOutcome {
        let attempts = self.policy.attempts.max(1);
        let mut last_error = String::new();

        for attempt in 0..attempts {
            match self.transport.post_json(&self.endpoint, payload) {
                Ok(()) => {
                    info!(
                        "Submission accepted by {} on attempt {}",
                        self.endpoint,
                        attempt + 1
                    );
                    return SubmissionOutcome::Submitted {
                        attempts: attempt + 1,
                    };
                }
                Err(e) => {
                    warn!("Submission attempt {}/{attempts} failed: {e}", attempt + 1);
                    last_error = e.to_string();
                }
            }

            if attempt + 1 < attempts {
                let delay = self.policy.delay_for(attempt);
                debug!("Retrying submission in {} ms", delay.as_millis());
                thread::sleep(delay);
            }
        }

        SubmissionOutcome::Failed {
            attempts,
            last_error,
        }
    }
}

/// The document could not be written
#[derive(Debug, Error)]
#[error("failed to export {path}: {message}")]
pub struct ExportError {
    /// Target file
    pub path: String,
    /// Underlying error text
    pub message: String,
}

/// Result of an export request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    /// Export is disabled by validation; nothing was written
    Blocked,
    /// The document was written
    Exported {
        /// Location of the document
        path: PathBuf,
        /// Submission result; `None` when no submission was attempted
        submission: Option<SubmissionOutcome>,
    },
}

/// Export the confirmation of `session` to `output`, then submit it.
///
/// Returns [`ExportOutcome::Blocked`] without side effects when the session
/// is not export-eligible. Submission is skipped when `submitter` is `None`.
///
/// # Errors
/// Returns an error if the document cannot be written; no submission is
/// attempted in that case.
pub fn export_and_submit<T: Transport>(
    session: &Session,
    generator: &dyn ReportGenerator,
    output: &Path,
    submitter: Option<&Submitter<T>>,
) -> Result<ExportOutcome, ExportError> {
    if !session.report().export_eligible() {
        info!("Export requested while conditions are not met; ignoring");
        return Ok(ExportOutcome::Blocked);
    }

    let export_error = |message: String| ExportError {
        path: output.display().to_string(),
        message,
    };
    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| export_error(e.to_string()))?;
        }
    }

    let ctx = ConfirmationContext::from_session(session);
    generator
        .generate(&ctx, output)
        .map_err(|e| export_error(e.to_string()))?;
    info!("Confirmation exported to {}", output.display());

    let submission = submitter.map(|submitter| {
        submitter.submit(&SubmissionPayload::from_selection(session.selection()))
    });

    Ok(ExportOutcome::Exported {
        path: output.to_path_buf(),
        submission,
    })
}
