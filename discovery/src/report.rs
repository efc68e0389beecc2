//! Structured extraction reporting.

use serde::{Deserialize, Serialize};

use flag_completions_core::{ExtractionOutcome, ScanReport};

use crate::error::DiscoveryError;

/// Structured failure code for generation failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureCode {
    /// A required executable is not installed.
    NotInstalled,
    /// A process did not finish in time.
    Timeout,
    /// A process could not be started or exited unsuccessfully.
    CommandFailed,
    /// The rendered markdown has no target section.
    SectionNotFound,
    /// The target section produced no completion items.
    NoCompletionItems,
    /// Extracted items failed validation.
    ValidationFailed,
}

impl std::fmt::Display for FailureCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotInstalled => write!(f, "not_installed"),
            Self::Timeout => write!(f, "timeout"),
            Self::CommandFailed => write!(f, "command_failed"),
            Self::SectionNotFound => write!(f, "section_not_found"),
            Self::NoCompletionItems => write!(f, "no_completion_items"),
            Self::ValidationFailed => write!(f, "validation_failed"),
        }
    }
}

impl FailureCode {
    /// Maps an error to its failure code, when it has one.
    pub fn from_error(error: &DiscoveryError) -> Option<Self> {
        match error {
            DiscoveryError::NotInstalled(_) => Some(Self::NotInstalled),
            DiscoveryError::Timeout { .. } => Some(Self::Timeout),
            DiscoveryError::Spawn { .. } | DiscoveryError::CommandFailed { .. } => {
                Some(Self::CommandFailed)
            }
            DiscoveryError::SectionNotFound(_) => Some(Self::SectionNotFound),
            DiscoveryError::NoCompletionItems(_) => Some(Self::NoCompletionItems),
            DiscoveryError::Invalid(_) => Some(Self::ValidationFailed),
            DiscoveryError::IoError(_)
            | DiscoveryError::JsonError(_)
            | DiscoveryError::YamlError(_) => None,
        }
    }
}

/// Per-run extraction report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionReport {
    pub section_heading: String,
    pub outcome: ExtractionOutcome,
    pub item_count: usize,
    pub flag_lines: usize,
    pub untokenized_flag_lines: usize,
    pub documentation_lines: usize,
    /// Heading that ended the section, when it did not run to end of input.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub terminating_heading: Option<String>,
    pub versions: Vec<String>,
    /// Structured failure code when the run should not be accepted. Cleared
    /// by [`generate`](crate::pipeline::generate) when an empty section was
    /// explicitly allowed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_code: Option<FailureCode>,
    pub warnings: Vec<String>,
}

impl ExtractionReport {
    /// Builds a report from a finished scan.
    ///
    /// A missing section or an empty section is recorded as a failure code;
    /// whether that aborts the run is the caller's decision.
    pub fn from_scan(section_heading: &str, scan: &ScanReport, versions: Vec<String>) -> Self {
        let outcome = scan.outcome();
        let failure_code = match outcome {
            ExtractionOutcome::SectionNotFound => Some(FailureCode::SectionNotFound),
            ExtractionOutcome::SectionEmpty => Some(FailureCode::NoCompletionItems),
            ExtractionOutcome::Found(_) => None,
        };

        let mut warnings = Vec::new();
        if scan.untokenized_flag_lines > 0 {
            warnings.push(format!(
                "{} flag definition line(s) contained no flag token and were skipped",
                scan.untokenized_flag_lines
            ));
        }

        Self {
            section_heading: section_heading.to_string(),
            outcome,
            item_count: scan.items.len(),
            flag_lines: scan.flag_lines,
            untokenized_flag_lines: scan.untokenized_flag_lines,
            documentation_lines: scan.documentation_lines,
            terminating_heading: scan.terminating_heading.clone(),
            versions,
            failure_code,
            warnings,
        }
    }

    pub fn is_success(&self) -> bool {
        self.failure_code.is_none()
    }
}
