//! Core types and flag extraction for man-page driven completion items.
//!
//! This crate turns a command's reference documentation, rendered as
//! markdown, into completion items for an editor completion engine:
//!
//! - [`CompletionItem`] — one flag label with markdown documentation.
//! - [`CompletionItemsFile`] — the document written to disk, with
//!   provenance and tool versions.
//! - [`extract_completion_items`] — the OPTIONS-section scanner.
//! - [`scan_section`] / [`ScanReport`] — the same scan with statistics and a
//!   not-found / empty / found outcome.
//!
//! Validation ([`validate_items`]) catches items whose label is not a flag
//! token or whose documentation lost its definition line.
//!
//! # Example
//!
//! ```
//! use flag_completions_core::*;
//!
//! let markdown = [
//!     "# NAME",
//!     "",
//!     "rg - recursively search the current directory",
//!     "",
//!     "# OPTIONS",
//!     "",
//!     r"*-i*, *\--ignore-case*",
//!     "",
//!     "> Search case insensitively.",
//!     "",
//!     "# EXIT STATUS",
//! ]
//! .join("\n");
//!
//! let report = scan_section(markdown.split('\n'), TARGET_SECTION_HEADING);
//! assert_eq!(report.outcome(), ExtractionOutcome::Found(2));
//! assert_eq!(report.items[1].label, "--ignore-case");
//! assert!(validate_items(&report.items).is_empty());
//! ```

mod extract;
mod types;
mod validate;

pub use extract::{
    ExtractionOutcome, FLAG_PATTERN, SECTION_HEADING_PREFIX, ScanControl, ScanReport,
    SectionScanner, TARGET_SECTION_HEADING, extract_completion_items, extract_flags,
    scan_section,
};
pub use types::*;
pub use validate::{ValidationError, validate_items};
