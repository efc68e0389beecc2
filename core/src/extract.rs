//! OPTIONS-section flag extraction for man pages rendered as markdown.
//!
//! The input is the line sequence of a man page converted to markdown
//! (e.g. by `pandoc --from man --to markdown`). Within the target section,
//! flag-definition lines start with `*` (strong emphasis around the flag
//! tokens) and their prose follows as `>` block-quote lines:
//!
//! ```text
//! # OPTIONS
//!
//! *-q*, *\--quiet*
//!
//! > Do not print anything.
//! ```
//!
//! Every flag token on a definition line becomes one [`CompletionItem`]; all
//! tokens of one line share the same documentation, which starts with the
//! verbatim definition line, a blank line, and then the block-quote text.
//!
//! Malformed input never fails: lines that match neither shape are skipped
//! and a definition line without any flag token produces no items. Use
//! [`scan_section`] and [`ScanReport::outcome`] to tell a missing section
//! apart from a section that yielded nothing.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::CompletionItem;

/// Heading line that opens the target section.
pub const TARGET_SECTION_HEADING: &str = "# OPTIONS";

/// Prefix of any top-level section heading.
pub const SECTION_HEADING_PREFIX: &str = "# ";

/// One or two hyphens followed by letters, digits, hyphens or periods.
///
/// The period is included for single-character flags such as ripgrep's `-.`.
pub const FLAG_PATTERN: &str = r"--?[.a-zA-Z0-9-]+";

static FLAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(FLAG_PATTERN).expect("flag pattern regex"));

/// Returns every non-overlapping flag token on `line`, in order of appearance.
///
/// Duplicates are kept.
///
/// # Examples
///
/// ```
/// use flag_completions_core::extract_flags;
///
/// assert_eq!(extract_flags(r"*-q*, *\--quiet*"), vec!["-q", "--quiet"]);
/// assert_eq!(extract_flags(r"*-.*, *\--hidden*"), vec!["-.", "--hidden"]);
/// assert!(extract_flags("*PATTERN*").is_empty());
/// ```
pub fn extract_flags(line: &str) -> Vec<String> {
    FLAG_RE
        .find_iter(line)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Extracts completion items from the `# OPTIONS` section of `lines`.
///
/// Returns an empty list both when the section is missing and when it holds
/// no flags; call [`scan_section`] to distinguish the two.
///
/// # Examples
///
/// ```
/// use flag_completions_core::extract_completion_items;
///
/// let lines = [
///     "# NAME",
///     "> some intro",
///     "# OPTIONS",
///     "*-q*, *--quiet*",
///     "> Do not print anything.",
///     "# EXIT STATUS",
///     "more text",
/// ];
/// let items = extract_completion_items(lines);
/// assert_eq!(items.len(), 2);
/// assert_eq!(items[0].label, "-q");
/// assert_eq!(items[1].label, "--quiet");
/// assert_eq!(
///     items[0].documentation.value,
///     "*-q*, *--quiet*\n\nDo not print anything.\n"
/// );
/// ```
pub fn extract_completion_items<I, S>(lines: I) -> Vec<CompletionItem>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    scan_section(lines, TARGET_SECTION_HEADING).items
}

/// Scans `lines` for the section opened by `heading` and reports the result.
pub fn scan_section<I, S>(lines: I, heading: &str) -> ScanReport
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut scanner = SectionScanner::with_heading(heading);
    for line in lines {
        if scanner.feed(line.as_ref()) == ScanControl::Stop {
            break;
        }
    }
    scanner.finish()
}

/// Whether the scanner wants more input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanControl {
    Continue,
    /// The target section has ended; further lines are ignored.
    Stop,
}

/// What a scan found, from the caller's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionOutcome {
    /// The target heading never appeared.
    SectionNotFound,
    /// The section was present but produced no items.
    SectionEmpty,
    /// The section produced this many items.
    Found(usize),
}

/// Result of scanning one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanReport {
    /// Whether the target heading was seen.
    pub section_found: bool,
    /// Items in the order their definition lines appeared.
    pub items: Vec<CompletionItem>,
    /// Number of flag-definition lines inside the section.
    pub flag_lines: usize,
    /// Flag-definition lines that contained no flag token.
    pub untokenized_flag_lines: usize,
    /// Number of block-quote documentation lines inside the section.
    pub documentation_lines: usize,
    /// Heading that ended the section, if it did not run to end of input.
    pub terminating_heading: Option<String>,
}

impl ScanReport {
    /// Classifies the scan as not-found, empty or found.
    ///
    /// # Examples
    ///
    /// ```
    /// use flag_completions_core::{ExtractionOutcome, scan_section};
    ///
    /// let missing = scan_section(["# options", "*-a*"], "# OPTIONS");
    /// assert_eq!(missing.outcome(), ExtractionOutcome::SectionNotFound);
    ///
    /// let empty = scan_section(["# OPTIONS", "nothing here"], "# OPTIONS");
    /// assert_eq!(empty.outcome(), ExtractionOutcome::SectionEmpty);
    /// ```
    pub fn outcome(&self) -> ExtractionOutcome {
        if !self.section_found {
            ExtractionOutcome::SectionNotFound
        } else if self.items.is_empty() {
            ExtractionOutcome::SectionEmpty
        } else {
            ExtractionOutcome::Found(self.items.len())
        }
    }

    pub fn into_items(self) -> Vec<CompletionItem> {
        self.items
    }
}

/// Line-at-a-time accumulator for one extraction pass.
///
/// A fresh scanner is needed per document; state is never shared between
/// passes.
#[derive(Debug, Clone)]
pub struct SectionScanner {
    heading: String,
    inside_target_section: bool,
    section_found: bool,
    stopped: bool,
    pending_flags: Vec<String>,
    pending_documentation: String,
    items: Vec<CompletionItem>,
    flag_lines: usize,
    untokenized_flag_lines: usize,
    documentation_lines: usize,
    terminating_heading: Option<String>,
}

impl Default for SectionScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl SectionScanner {
    /// Creates a scanner for the `# OPTIONS` section.
    pub fn new() -> Self {
        Self::with_heading(TARGET_SECTION_HEADING)
    }

    /// Creates a scanner for the section whose heading line equals `heading`.
    pub fn with_heading(heading: impl Into<String>) -> Self {
        Self {
            heading: heading.into(),
            inside_target_section: false,
            section_found: false,
            stopped: false,
            pending_flags: Vec::new(),
            pending_documentation: String::new(),
            items: Vec::new(),
            flag_lines: 0,
            untokenized_flag_lines: 0,
            documentation_lines: 0,
            terminating_heading: None,
        }
    }

    pub fn is_inside_section(&self) -> bool {
        self.inside_target_section && !self.stopped
    }

    /// Consumes one line.
    pub fn feed(&mut self, line: &str) -> ScanControl {
        if self.stopped {
            return ScanControl::Stop;
        }

        // Termination is checked before entry, so a repeated target heading
        // ends the section instead of re-entering it.
        if self.inside_target_section && line.starts_with(SECTION_HEADING_PREFIX) {
            self.stopped = true;
            self.terminating_heading = Some(line.to_string());
            return ScanControl::Stop;
        }

        if line == self.heading {
            self.inside_target_section = true;
            self.section_found = true;
        }

        if !self.inside_target_section {
            return ScanControl::Continue;
        }

        if line.starts_with('*') {
            self.flush();
            self.pending_flags = extract_flags(line);
            self.flag_lines += 1;
            if self.pending_flags.is_empty() {
                self.untokenized_flag_lines += 1;
            }
            self.pending_documentation.push_str(line);
            self.pending_documentation.push_str("\n\n");
        } else if line.starts_with('>') {
            self.documentation_lines += 1;
            self.pending_documentation
                .push_str(strip_block_quote_marker(line));
            self.pending_documentation.push('\n');
        }

        ScanControl::Continue
    }

    /// Flushes the final flag group and returns the report.
    pub fn finish(mut self) -> ScanReport {
        self.flush();
        ScanReport {
            section_found: self.section_found,
            items: self.items,
            flag_lines: self.flag_lines,
            untokenized_flag_lines: self.untokenized_flag_lines,
            documentation_lines: self.documentation_lines,
            terminating_heading: self.terminating_heading,
        }
    }

    fn flush(&mut self) {
        if self.pending_documentation.is_empty() {
            return;
        }
        let documentation = std::mem::take(&mut self.pending_documentation);
        for flag in &self.pending_flags {
            self.items
                .push(CompletionItem::markdown(flag.clone(), documentation.clone()));
        }
    }
}

/// Drops the `>` marker and the single separator character after it.
fn strip_block_quote_marker(line: &str) -> &str {
    line.char_indices()
        .nth(2)
        .map_or("", |(idx, _)| &line[idx..])
}
