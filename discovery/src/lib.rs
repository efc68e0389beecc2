//! Completion item generation from a tool's man page.
//!
//! This crate drives the external side of extraction: it checks that the
//! documentation tools are installed, records their versions, renders the man
//! page to markdown (by default `rg --generate man | pandoc --from man --to
//! markdown`), scans the OPTIONS section with
//! [`flag_completions_core::scan_section`], and writes the result as JSON for
//! an editor completion engine.
//!
//! # Main entry points
//!
//! - [`parse_markdown`] — scan pre-rendered markdown without running any
//!   commands.
//! - [`pipeline::generate`] — run the configured pipeline end to end
//!   (requires the tools to be installed).
//! - [`pipeline::write_completion_items`] — write a generated file to disk.
//!
//! # Example
//!
//! ```
//! use flag_completions_discovery::parse_markdown;
//! use flag_completions_core::ExtractionOutcome;
//!
//! let markdown = "\
//! rg - recursively search the current directory
//!
//! *-s*, *\\--case-sensitive*
//!
//! > Search case sensitively.
//! ";
//!
//! // No OPTIONS heading: reported as not found rather than just empty.
//! let scan = parse_markdown(markdown, "# OPTIONS");
//! assert_eq!(scan.outcome(), ExtractionOutcome::SectionNotFound);
//! ```
//!
//! # Crate type
//!
//! This is a **library-only crate**. For CLI usage, use the
//! `flag-completions-cli` crate which provides the `write-completion-items`
//! binary.

pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod probe;
pub mod report;

pub use error::{DiscoveryError, Result};
pub use pipeline::{GenerationRun, parse_markdown};
