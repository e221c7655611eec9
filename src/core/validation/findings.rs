//! Validation report types

use crate::core::models::Slot;
use std::fmt;

/// How a finding should be presented
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// A rule is violated
    Error,
    /// A rule is satisfied
    Success,
    /// Neutral information
    Info,
}

impl Severity {
    /// Terminal marker for this severity
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Error => "✗",
            Self::Success => "✓",
            Self::Info => "ℹ",
        }
    }
}

/// One human-readable validation message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    /// Presentation severity
    pub severity: Severity,
    /// Message text
    pub text: String,
}

impl Finding {
    /// An error finding
    #[must_use]
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            text: text.into(),
        }
    }

    /// A success finding
    #[must_use]
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            severity: Severity::Success,
            text: text.into(),
        }
    }

    /// An informational finding
    #[must_use]
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            severity: Severity::Info,
            text: text.into(),
        }
    }

    /// Whether this finding reports a violation
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.severity.symbol(), self.text)
    }
}

/// Result of validating one slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotReport {
    /// The slot
    pub slot: Slot,
    /// Whether every group quota and the credit total are met
    pub passed: bool,
    /// Messages, starting with a slot summary
    pub findings: Vec<Finding>,
    /// Credit total of the selected courses in the slot
    pub total_hours: u32,
    /// Credit total the slot must reach
    pub required_hours: u32,
}

/// The individual conditions behind export-eligibility
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Eligibility {
    /// Name (and identifier when required) filled in
    pub identity_complete: bool,
    /// At least one course selected
    pub has_selection: bool,
    /// Every validated slot passed
    pub slots_pass: bool,
    /// No course name selected across semesters
    pub no_duplicates: bool,
    /// Exact-count category satisfied
    pub exact_category_pass: bool,
    /// Max-count category satisfied
    pub max_category_pass: bool,
}

impl Eligibility {
    /// The conditions that depend on the picked courses only
    #[must_use]
    pub const fn course_conditions_met(&self) -> bool {
        self.slots_pass && self.no_duplicates && self.exact_category_pass && self.max_category_pass
    }

    /// Whether the export action is enabled
    #[must_use]
    pub const fn is_eligible(&self) -> bool {
        self.identity_complete && self.has_selection && self.course_conditions_met()
    }
}

/// Complete diagnostic output of one validation pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    /// Per-slot results, slots ascending
    pub slots: Vec<SlotReport>,
    /// Global findings in fixed order: slot summary, duplicates, fixed
    /// categories, identity, selection, verdict
    pub global: Vec<Finding>,
    /// Condition breakdown
    pub eligibility: Eligibility,
}

impl ValidationReport {
    /// Whether the export action is enabled
    #[must_use]
    pub const fn export_eligible(&self) -> bool {
        self.eligibility.is_eligible()
    }

    /// Result for one slot
    #[must_use]
    pub fn slot(&self, slot: Slot) -> Option<&SlotReport> {
        self.slots.iter().find(|report| report.slot == slot)
    }

    /// All findings, slot findings first
    pub fn findings(&self) -> impl Iterator<Item = &Finding> {
        self.slots
            .iter()
            .flat_map(|report| report.findings.iter())
            .chain(self.global.iter())
    }

    /// Global error findings
    pub fn global_errors(&self) -> impl Iterator<Item = &Finding> {
        self.global.iter().filter(|finding| finding.is_error())
    }
}
