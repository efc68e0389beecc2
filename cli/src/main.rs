use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use flag_completions_core::{
    CompletionItemsFile, ExtractionOutcome, TARGET_SECTION_HEADING, validate_items,
};
use flag_completions_discovery::config::PipelineConfig;
use flag_completions_discovery::output::{OutputFormat, format_items, format_report};
use flag_completions_discovery::parse_markdown;
use flag_completions_discovery::pipeline::{generate, write_completion_items};
use flag_completions_discovery::report::ExtractionReport;
use tracing_subscriber::EnvFilter;

/// Recorded as `generated.from` in written files.
const GENERATED_FROM: &str = env!("CARGO_BIN_NAME");

#[derive(Debug, Parser)]
#[command(name = "write-completion-items")]
#[command(version)]
#[command(about = "Generate flag completion items from a tool's man page")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Render the man page, extract the OPTIONS section, and write the items file.
    Generate(GenerateArgs),
    /// Extract completion items from a markdown file without executing commands.
    ParseFile(ParseFileArgs),
    /// Extract completion items from markdown on stdin without executing commands.
    ParseStdin(ParseStdinArgs),
    /// Validate one or more completion items JSON files.
    Validate(ValidateArgs),
    /// Write the default pipeline configuration as YAML.
    InitConfig(InitConfigArgs),
}

#[derive(Debug, Args)]
struct GenerateArgs {
    /// Pipeline configuration YAML (defaults to the ripgrep pipeline).
    #[arg(long)]
    config: Option<PathBuf>,
    /// Output path, overriding the configured one. Without it, non-JSON
    /// formats are written next to the configured path with their own
    /// extension.
    #[arg(long)]
    output: Option<PathBuf>,
    /// Section heading line, overriding the configured one.
    #[arg(long)]
    heading: Option<String>,
    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,
    /// Write an empty items file when the section has no flags.
    #[arg(long)]
    allow_empty: bool,
    /// Also write the extraction report (JSON) to this path.
    #[arg(long)]
    report: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct ParseFileArgs {
    /// Path to the rendered markdown.
    #[arg(long)]
    input: PathBuf,
    #[command(flatten)]
    parse: ParseArgs,
}

#[derive(Debug, Args)]
struct ParseStdinArgs {
    #[command(flatten)]
    parse: ParseArgs,
}

#[derive(Debug, Args)]
struct ParseArgs {
    /// Section heading line to scan.
    #[arg(long, default_value = TARGET_SECTION_HEADING)]
    heading: String,
    /// Output both items and extraction report.
    #[arg(long)]
    with_report: bool,
    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,
}

#[derive(Debug, Args)]
struct ValidateArgs {
    /// Items files and/or directories containing items JSON files.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
}

#[derive(Debug, Args)]
struct InitConfigArgs {
    /// Where to write the YAML configuration.
    #[arg(long)]
    output: PathBuf,
}

fn main() {
    setup_logging();
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Generate(args) => run_generate(args),
        Command::ParseFile(args) => run_parse_file(args),
        Command::ParseStdin(args) => run_parse_stdin(args),
        Command::Validate(args) => run_validate(args),
        Command::InitConfig(args) => run_init_config(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

/// Installs a stderr subscriber filtered by `RUST_LOG` (default `warn`).
fn setup_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run_generate(args: GenerateArgs) -> Result<(), String> {
    let mut config = match args.config {
        Some(ref path) => PipelineConfig::load(path)
            .map_err(|err| format!("Failed to load config '{}': {err}", path.display()))?,
        None => PipelineConfig::default(),
    };
    match args.output {
        Some(output) => config.output = output,
        // The configured path is the JSON file the completion engine loads;
        // other formats go next to it instead of replacing it.
        None => config.output = config.output.with_extension(args.format.extension()),
    }
    if let Some(heading) = args.heading {
        config.section_heading = heading;
    }
    tracing::info!(
        generator = %config.generator.display(),
        converter = %config.converter.display(),
        output = %config.output.display(),
        "Generating completion items"
    );

    let run = generate(&config, GENERATED_FROM, args.allow_empty).map_err(|err| err.to_string())?;

    write_completion_items(&config.output, &run.file, args.format)
        .map_err(|err| format!("Failed to write '{}': {err}", config.output.display()))?;

    if let Some(report_path) = args.report {
        let raw = format_report(&run.report, OutputFormat::Json).map_err(|err| err.to_string())?;
        fs::write(&report_path, raw)
            .map_err(|err| format!("Failed to write '{}': {err}", report_path.display()))?;
    }

    match args.format {
        OutputFormat::Json => println!(
            "JSON data successfully written to {}",
            config.output.display()
        ),
        _ => println!(
            "{} completion item(s) written to {}",
            run.file.item_count(),
            config.output.display()
        ),
    }
    Ok(())
}

fn run_parse_file(args: ParseFileArgs) -> Result<(), String> {
    let markdown = fs::read_to_string(&args.input)
        .map_err(|err| format!("Failed to read '{}': {err}", args.input.display()))?;
    run_parse_markdown(&markdown, &args.parse)
}

fn run_parse_stdin(args: ParseStdinArgs) -> Result<(), String> {
    let mut markdown = String::new();
    std::io::stdin()
        .read_to_string(&mut markdown)
        .map_err(|err| format!("Failed to read stdin: {err}"))?;
    run_parse_markdown(&markdown, &args.parse)
}

fn run_parse_markdown(markdown: &str, args: &ParseArgs) -> Result<(), String> {
    let scan = parse_markdown(markdown, &args.heading);

    if args.with_report {
        let report = ExtractionReport::from_scan(&args.heading, &scan, Vec::new());
        match args.format {
            OutputFormat::Json => {
                #[derive(serde::Serialize)]
                struct ParseOutput<'a> {
                    completion_items: &'a [flag_completions_core::CompletionItem],
                    report: &'a ExtractionReport,
                }

                let output = ParseOutput {
                    completion_items: &scan.items,
                    report: &report,
                };
                let json = serde_json::to_string_pretty(&output)
                    .map_err(|e| format!("Failed to serialize output: {e}"))?;
                println!("{json}");
            }
            format => {
                print!("{}", format_items(&scan.items, format).map_err(|e| e.to_string())?);
                print!("{}", format_report(&report, format).map_err(|e| e.to_string())?);
            }
        }
        return Ok(());
    }

    if scan.outcome() == ExtractionOutcome::SectionNotFound {
        return Err(format!("Section '{}' not found in input", args.heading));
    }
    let output = format_items(&scan.items, args.format).map_err(|e| e.to_string())?;
    println!("{output}");
    Ok(())
}

fn run_validate(args: ValidateArgs) -> Result<(), String> {
    let paths = collect_items_paths(&args.inputs)?;
    if paths.is_empty() {
        return Err("No completion items JSON files found".to_string());
    }

    let mut item_count = 0usize;
    let mut problems = Vec::new();
    for path in &paths {
        let raw = fs::read_to_string(path)
            .map_err(|err| format!("Failed to read '{}': {err}", path.display()))?;
        let file: CompletionItemsFile = serde_json::from_str(&raw)
            .map_err(|err| format!("Failed to parse '{}': {err}", path.display()))?;
        item_count += file.item_count();
        problems.extend(
            validate_items(&file.completion_items)
                .into_iter()
                .map(|err| format!("{}: {err}", path.display())),
        );
    }

    if !problems.is_empty() {
        return Err(format!(
            "{} validation error(s):\n{}",
            problems.len(),
            problems.join("\n")
        ));
    }

    println!(
        "Validated {} file(s) with {item_count} completion item(s).",
        paths.len()
    );
    Ok(())
}

fn run_init_config(args: InitConfigArgs) -> Result<(), String> {
    PipelineConfig::default()
        .save(&args.output)
        .map_err(|err| format!("Failed to write '{}': {err}", args.output.display()))?;
    println!("Wrote default configuration to {}", args.output.display());
    Ok(())
}

/// Expands directories to the `.json` files they contain, sorted.
fn collect_items_paths(inputs: &[PathBuf]) -> Result<Vec<PathBuf>, String> {
    let mut paths = Vec::new();
    for input in inputs {
        if input.is_dir() {
            let entries = fs::read_dir(input)
                .map_err(|err| format!("Failed to read '{}': {err}", input.display()))?;
            let mut found: Vec<PathBuf> = entries
                .filter_map(|entry| entry.ok().map(|e| e.path()))
                .filter(|path| is_json(path))
                .collect();
            found.sort();
            paths.extend(found);
        } else {
            paths.push(input.clone());
        }
    }
    Ok(paths)
}

fn is_json(path: &Path) -> bool {
    path.is_file() && path.extension().is_some_and(|ext| ext == "json")
}
