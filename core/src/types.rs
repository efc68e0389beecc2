//! Completion item type definitions.
//!
//! These types mirror the completion item shape consumed by editor
//! completion engines: a `label` plus a `documentation` object carrying a
//! markup kind and a value. Field names and nesting are part of the
//! downstream contract and must not change.

use serde::{Deserialize, Serialize};

/// Markup kind of a documentation block.
///
/// # Examples
///
/// ```
/// use flag_completions_core::MarkupKind;
///
/// let json = serde_json::to_string(&MarkupKind::Markdown).unwrap();
/// assert_eq!(json, "\"markdown\"");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MarkupKind {
    /// Markdown-formatted text (the only kind the extractor emits).
    #[default]
    Markdown,
}

/// Documentation attached to a completion item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Documentation {
    pub kind: MarkupKind,
    pub value: String,
}

/// One flag and its documentation, ready for a completion engine.
///
/// # Examples
///
/// ```
/// use flag_completions_core::{CompletionItem, MarkupKind};
///
/// let item = CompletionItem::markdown("--quiet", "*-q*, *--quiet*\n\nBe quiet.\n");
/// assert_eq!(item.label, "--quiet");
/// assert_eq!(item.documentation.kind, MarkupKind::Markdown);
///
/// let json = serde_json::to_value(&item).unwrap();
/// assert_eq!(json["documentation"]["kind"], "markdown");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionItem {
    /// Flag token, e.g. `-q` or `--quiet`.
    pub label: String,
    pub documentation: Documentation,
}

impl CompletionItem {
    /// Creates an item with markdown documentation.
    pub fn markdown(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            documentation: Documentation {
                kind: MarkupKind::Markdown,
                value: value.into(),
            },
        }
    }
}

/// Provenance of a generated completion items file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedInfo {
    /// Name of the program that produced the file.
    pub from: String,
    /// RFC 3339 UTC timestamp of generation.
    pub at: String,
}

/// The document written to disk for the completion engine.
///
/// # Examples
///
/// ```
/// use flag_completions_core::{CompletionItem, CompletionItemsFile, GeneratedInfo};
///
/// let file = CompletionItemsFile {
///     generated: GeneratedInfo {
///         from: "write-completion-items".into(),
///         at: "2024-01-01T00:00:00.000Z".into(),
///     },
///     versions: vec!["ripgrep 14.1.0".into()],
///     completion_items: vec![CompletionItem::markdown("-q", "*-q*\n\n")],
/// };
/// let json = serde_json::to_value(&file).unwrap();
/// assert_eq!(json["completion_items"][0]["label"], "-q");
/// assert_eq!(json["versions"][0], "ripgrep 14.1.0");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionItemsFile {
    pub generated: GeneratedInfo,
    /// First line of each tool's version output, in configured order.
    pub versions: Vec<String>,
    pub completion_items: Vec<CompletionItem>,
}

impl CompletionItemsFile {
    /// Returns the number of completion items.
    pub fn item_count(&self) -> usize {
        self.completion_items.len()
    }

    /// Finds the first item with the given label.
    pub fn find(&self, label: &str) -> Option<&CompletionItem> {
        self.completion_items.iter().find(|item| item.label == label)
    }
}
