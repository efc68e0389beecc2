//! Completion item validation.
//!
//! Checks structural invariants of extracted items before they are written
//! or after they are loaded from disk: every label is a single flag token and
//! every documentation block opens with the flag-definition line it came
//! from.
//!
//! # Examples
//!
//! ```
//! use flag_completions_core::*;
//!
//! let good = vec![CompletionItem::markdown("-q", "*-q*\n\nQuiet.\n")];
//! assert!(validate_items(&good).is_empty());
//!
//! let bad = vec![CompletionItem::markdown("quiet", "*-q*\n\n")];
//! assert!(!validate_items(&bad).is_empty());
//! ```

use thiserror::Error;

use crate::{CompletionItem, extract_flags};

/// Completion item validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Label is empty or whitespace-only.
    #[error("item {index}: label cannot be empty")]
    EmptyLabel { index: usize },
    /// Label is not exactly one flag token (e.g. `quiet` or `-q --quiet`).
    #[error("item {index}: label is not a flag: {label}")]
    InvalidLabel { index: usize, label: String },
    /// Documentation does not start with a `*` flag-definition line.
    #[error("item {index} ({label}): documentation must start with its flag definition")]
    MissingDefinition { index: usize, label: String },
}

/// Validates a list of completion items.
///
/// Returns every problem found; an empty vector means the list is valid.
/// Repeated labels are allowed.
pub fn validate_items(items: &[CompletionItem]) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    for (index, item) in items.iter().enumerate() {
        let label = item.label.as_str();
        if label.trim().is_empty() {
            errors.push(ValidationError::EmptyLabel { index });
            continue;
        }

        let tokens = extract_flags(label);
        if tokens.len() != 1 || tokens[0] != label {
            errors.push(ValidationError::InvalidLabel {
                index,
                label: label.to_string(),
            });
        }

        let value = item.documentation.value.as_str();
        let definition = value.split("\n\n").next().unwrap_or_default();
        if !definition.starts_with('*') || !extract_flags(definition).iter().any(|t| t == label)
        {
            errors.push(ValidationError::MissingDefinition {
                index,
                label: label.to_string(),
            });
        }
    }

    errors
}
