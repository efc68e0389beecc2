//! Completion item generation pipeline.
//!
//! Checks that the required tools are installed, records their versions,
//! renders the man page to markdown through the generator and converter, and
//! scans the configured section for flags.

use std::fs;
use std::path::Path;

use chrono::{SecondsFormat, Utc};
use tracing::{debug, info, warn};

use flag_completions_core::{
    CompletionItemsFile, ExtractionOutcome, GeneratedInfo, ScanReport, scan_section,
    validate_items,
};

use crate::config::PipelineConfig;
use crate::error::{DiscoveryError, Result};
use crate::output::{OutputFormat, format_items_file};
use crate::probe;
use crate::report::ExtractionReport;

/// Output of one successful generation run.
#[derive(Debug, Clone)]
pub struct GenerationRun {
    pub file: CompletionItemsFile,
    pub report: ExtractionReport,
}

/// Scans pre-rendered markdown without running any commands.
///
/// # Examples
///
/// ```
/// use flag_completions_discovery::parse_markdown;
///
/// let markdown = "# OPTIONS\n\n*-a*, *\\--all*\n\n> Show everything.\n";
/// let scan = parse_markdown(markdown, "# OPTIONS");
/// assert_eq!(scan.items.len(), 2);
/// ```
pub fn parse_markdown(markdown: &str, section_heading: &str) -> ScanReport {
    scan_section(markdown.split('\n'), section_heading)
}

/// Runs the generator and pipes its output through the converter.
///
/// # Errors
///
/// Any process error from [`probe::run_command`].
pub fn render_markdown(config: &PipelineConfig) -> Result<String> {
    let timeout = config.timeout();
    let man_page = probe::run_command(&config.generator, None, timeout)?;
    debug!(
        generator = %config.generator.display(),
        length = man_page.len(),
        "Generated man page"
    );
    let markdown = probe::run_command(&config.converter, Some(man_page.as_bytes()), timeout)?;
    debug!(
        converter = %config.converter.display(),
        length = markdown.len(),
        "Converted man page"
    );
    Ok(markdown)
}

/// Generates the completion items file described by `config`.
///
/// A missing section is always an error. An empty section is an error
/// unless `allow_empty` is set, in which case an empty item list is
/// returned.
///
/// # Errors
///
/// - [`DiscoveryError::NotInstalled`] listing every missing executable.
/// - Process errors from the version, generator or converter commands.
/// - [`DiscoveryError::SectionNotFound`] / [`DiscoveryError::NoCompletionItems`].
/// - [`DiscoveryError::Invalid`] if extracted items fail validation.
pub fn generate(
    config: &PipelineConfig,
    generated_from: &str,
    allow_empty: bool,
) -> Result<GenerationRun> {
    let missing = probe::missing_executables(&config.required_executables);
    if !missing.is_empty() {
        return Err(DiscoveryError::NotInstalled(missing));
    }

    let timeout = config.timeout();
    let versions = config
        .version_commands
        .iter()
        .map(|spec| probe::capture_version(spec, timeout))
        .collect::<Result<Vec<_>>>()?;
    for version in &versions {
        info!(version = %version, "Detected tool version");
    }

    let markdown = render_markdown(config)?;
    let scan = parse_markdown(&markdown, &config.section_heading);
    let mut report = ExtractionReport::from_scan(&config.section_heading, &scan, versions.clone());
    for warning in &report.warnings {
        warn!("{warning}");
    }

    match scan.outcome() {
        ExtractionOutcome::SectionNotFound => {
            return Err(DiscoveryError::SectionNotFound(
                config.section_heading.clone(),
            ));
        }
        ExtractionOutcome::SectionEmpty if !allow_empty => {
            return Err(DiscoveryError::NoCompletionItems(
                config.section_heading.clone(),
            ));
        }
        ExtractionOutcome::SectionEmpty => {
            warn!(section = %config.section_heading, "Section contains no flags");
            report.failure_code = None;
            report
                .warnings
                .push(format!("section '{}' contains no flags", config.section_heading));
        }
        ExtractionOutcome::Found(count) => {
            info!(section = %config.section_heading, items = count, "Extracted completion items");
        }
    }

    let errors = validate_items(&scan.items);
    if !errors.is_empty() {
        return Err(DiscoveryError::Invalid(errors));
    }

    let file = CompletionItemsFile {
        generated: GeneratedInfo {
            from: generated_from.to_string(),
            at: timestamp(),
        },
        versions,
        completion_items: scan.into_items(),
    };

    Ok(GenerationRun { file, report })
}

/// Writes `file` to `path`, creating the parent directory if needed.
pub fn write_completion_items(
    path: &Path,
    file: &CompletionItemsFile,
    format: OutputFormat,
) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let raw = format_items_file(file, format)?;
    fs::write(path, raw)?;
    debug!(path = %path.display(), items = file.item_count(), "Wrote completion items");
    Ok(())
}

/// Current UTC time with millisecond precision, e.g. `2024-03-01T12:00:00.000Z`.
fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
