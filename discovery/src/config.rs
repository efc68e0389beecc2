//! Pipeline configuration.
//!
//! Describes which programs render the man page, which ones must be
//! installed, how their versions are captured, which section is scanned, and
//! where the result is written. The defaults reproduce the ripgrep pipeline
//! `rg --generate man | pandoc --from man --to markdown`.
//!
//! # Example YAML
//!
//! ```yaml
//! generator:
//!   program: rg
//!   args: ["--generate", "man"]
//! converter:
//!   program: pandoc
//!   args: ["--from", "man", "--to", "markdown"]
//! required_executables: [rg, pandoc]
//! version_commands:
//!   - { program: rg, args: ["-V"] }
//!   - { program: pandoc, args: ["-v"] }
//! section_heading: "# OPTIONS"
//! output: ./lua/cmp_ripgrep_flags/completion_items.json
//! timeout_ms: 30000
//! ```
//!
//! Every field is optional; missing fields take the default value.

use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use flag_completions_core::TARGET_SECTION_HEADING;

use crate::error::Result;

/// Default location of the generated completion items file.
pub const DEFAULT_OUTPUT_PATH: &str = "./lua/cmp_ripgrep_flags/completion_items.json";

/// Default per-process timeout (milliseconds).
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// A program and its arguments.
///
/// # Examples
///
/// ```
/// use flag_completions_discovery::config::CommandSpec;
///
/// let spec = CommandSpec::new("pandoc", ["--from", "man", "--to", "markdown"]);
/// assert_eq!(spec.display(), "pandoc --from man --to markdown");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandSpec {
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
}

impl CommandSpec {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Renders the command line for logs and error messages.
    pub fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Top-level pipeline configuration.
///
/// # Examples
///
/// ```
/// use flag_completions_discovery::config::PipelineConfig;
///
/// let config = PipelineConfig::default();
/// assert_eq!(config.generator.display(), "rg --generate man");
/// assert_eq!(config.section_heading, "# OPTIONS");
/// assert_eq!(config.required_executables, vec!["rg", "pandoc"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Produces the man page (roff) on stdout.
    pub generator: CommandSpec,
    /// Reads the man page on stdin and writes markdown on stdout.
    pub converter: CommandSpec,
    /// Executables checked on `PATH` before anything runs.
    pub required_executables: Vec<String>,
    /// Commands whose first output line is recorded as a version string.
    pub version_commands: Vec<CommandSpec>,
    /// Heading line of the section to scan.
    pub section_heading: String,
    /// Where the completion items file is written.
    pub output: PathBuf,
    /// Per-process timeout in milliseconds.
    pub timeout_ms: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            generator: CommandSpec::new("rg", ["--generate", "man"]),
            converter: CommandSpec::new("pandoc", ["--from", "man", "--to", "markdown"]),
            required_executables: vec!["rg".to_string(), "pandoc".to_string()],
            version_commands: vec![
                CommandSpec::new("rg", ["-V"]),
                CommandSpec::new("pandoc", ["-v"]),
            ],
            section_heading: TARGET_SECTION_HEADING.to_string(),
            output: PathBuf::from(DEFAULT_OUTPUT_PATH),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl PipelineConfig {
    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](crate::DiscoveryError::IoError) if the file cannot
    /// be read, or [`YamlError`](crate::DiscoveryError::YamlError) if parsing
    /// fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let config = serde_yaml::from_reader(reader)?;
        Ok(config)
    }

    /// Saves the configuration as YAML.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = BufWriter::new(file);
        serde_yaml::to_writer(writer, self)?;
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}
