//! Output formatting for completion items and reports.

use flag_completions_core::{CompletionItem, CompletionItemsFile};

use crate::error::Result;
use crate::report::ExtractionReport;

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum OutputFormat {
    /// Pretty-printed JSON, the format completion engines load.
    #[default]
    Json,
    Yaml,
    Markdown,
}

impl OutputFormat {
    /// File extension for this format.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Yaml => "yaml",
            Self::Markdown => "md",
        }
    }
}

/// Formats a completion items file in the requested output format.
pub fn format_items_file(file: &CompletionItemsFile, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(file)?),
        OutputFormat::Yaml => Ok(serde_yaml::to_string(file)?),
        OutputFormat::Markdown => {
            let mut out = String::new();
            out.push_str(&format!("# Completion items ({})\n\n", file.generated.from));
            out.push_str(&format!("**Generated:** {}\n\n", file.generated.at));
            for version in &file.versions {
                out.push_str(&format!("- {version}\n"));
            }
            if !file.versions.is_empty() {
                out.push('\n');
            }
            out.push_str(&items_to_markdown(&file.completion_items));
            Ok(out)
        }
    }
}

/// Formats a bare list of completion items.
pub fn format_items(items: &[CompletionItem], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(items)?),
        OutputFormat::Yaml => Ok(serde_yaml::to_string(items)?),
        OutputFormat::Markdown => Ok(items_to_markdown(items)),
    }
}

/// Formats an extraction report in the requested output format.
pub fn format_report(report: &ExtractionReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
        OutputFormat::Yaml => Ok(serde_yaml::to_string(report)?),
        OutputFormat::Markdown => Ok(report_to_markdown(report)),
    }
}

fn items_to_markdown(items: &[CompletionItem]) -> String {
    let mut out = String::new();

    out.push_str("| Flag | Summary |\n");
    out.push_str("|------|---------|\n");
    for item in items {
        out.push_str(&format!(
            "| `{}` | {} |\n",
            item.label,
            summary_line(&item.documentation.value).replace('|', "\\|")
        ));
    }
    out.push('\n');

    // Items from one definition line share documentation; print it once.
    let mut previous: Option<&str> = None;
    for item in items {
        let value = item.documentation.value.as_str();
        if previous == Some(value) {
            continue;
        }
        previous = Some(value);
        out.push_str("---\n\n");
        out.push_str(value);
        if !value.ends_with('\n') {
            out.push('\n');
        }
        out.push('\n');
    }

    out
}

/// First documentation line after the flag definition, if any.
fn summary_line(value: &str) -> &str {
    value
        .split_once("\n\n")
        .map_or("", |(_, body)| body.lines().next().unwrap_or_default())
        .trim()
}

fn report_to_markdown(report: &ExtractionReport) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "# Extraction Report: {}\n\n",
        report.section_heading
    ));
    out.push_str(&format!("- **Outcome:** {:?}\n", report.outcome));
    out.push_str(&format!("- **Items:** {}\n", report.item_count));
    out.push_str(&format!("- **Flag lines:** {}\n", report.flag_lines));
    out.push_str(&format!(
        "- **Documentation lines:** {}\n",
        report.documentation_lines
    ));

    if let Some(ref heading) = report.terminating_heading {
        out.push_str(&format!("- **Ended at:** `{heading}`\n"));
    }
    if let Some(ref code) = report.failure_code {
        out.push_str(&format!("- **Failure Code:** {code}\n"));
    }

    if !report.versions.is_empty() {
        out.push_str("\n## Versions\n\n");
        for v in &report.versions {
            out.push_str(&format!("- {v}\n"));
        }
    }

    if !report.warnings.is_empty() {
        out.push_str("\n## Warnings\n\n");
        for w in &report.warnings {
            out.push_str(&format!("- {w}\n"));
        }
    }

    out
}
