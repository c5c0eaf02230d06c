//! pdf-headings CLI - heading outline extraction tool

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;

use pdf_headings::label::{self, label_template, read_labeled_file};
use pdf_headings::render::{to_json, to_markdown};
use pdf_headings::{
    Config, JsonFormat, LabeledClassifier, LineMerger, LineReader, OutlineExtractor, ReadOptions,
    TextLine,
};

type CliResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(name = "pdf-headings")]
#[command(version)]
#[command(about = "Build title + heading outlines from PDF text line dumps", long_about = None)]
struct Cli {
    /// Input line file (JSON array or JSON Lines)
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output file (stdout if not specified)
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract the title and heading outline of one document
    Outline {
        /// Input line file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,

        /// Output a Markdown outline instead of JSON
        #[arg(long, conflicts_with = "compact")]
        markdown: bool,

        /// Pipeline configuration (JSON)
        #[arg(short, long, value_name = "FILE", env = "PDF_HEADINGS_CONFIG")]
        config: Option<PathBuf>,

        /// Annotated labels to classify with (JSON or JSON Lines)
        #[arg(long, value_name = "FILE")]
        labels: Option<PathBuf>,

        /// Skip invalid line records instead of failing
        #[arg(long)]
        lenient: bool,
    },

    /// Extract outlines for every line file in a directory
    Batch {
        /// Directory containing *.json / *.jsonl line files
        #[arg(value_name = "INPUT_DIR")]
        input: PathBuf,

        /// Directory for <name>.json outlines
        #[arg(value_name = "OUTPUT_DIR")]
        output: PathBuf,

        /// Pipeline configuration (JSON)
        #[arg(short, long, value_name = "FILE", env = "PDF_HEADINGS_CONFIG")]
        config: Option<PathBuf>,

        /// Process files one at a time
        #[arg(long)]
        sequential: bool,

        /// Skip invalid line records instead of failing
        #[arg(long)]
        lenient: bool,
    },

    /// Export merged lines as an annotation template
    Label {
        /// Input line file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Write JSON Lines instead of a JSON array
        #[arg(long)]
        jsonl: bool,

        /// Pipeline configuration (JSON)
        #[arg(short, long, value_name = "FILE", env = "PDF_HEADINGS_CONFIG")]
        config: Option<PathBuf>,
    },

    /// Show per-stage pipeline statistics for one document
    Stats {
        /// Input line file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Pipeline configuration (JSON)
        #[arg(short, long, value_name = "FILE", env = "PDF_HEADINGS_CONFIG")]
        config: Option<PathBuf>,
    },

    /// Print the effective configuration
    Config {
        /// Configuration file to validate and print
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },

    /// Show version information
    Version,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Outline {
            input,
            output,
            compact,
            markdown,
            config,
            labels,
            lenient,
        }) => cmd_outline(
            &input,
            output.as_deref(),
            output_format(compact, markdown),
            config.as_deref(),
            labels.as_deref(),
            lenient,
        ),
        Some(Commands::Batch {
            input,
            output,
            config,
            sequential,
            lenient,
        }) => cmd_batch(&input, &output, config.as_deref(), sequential, lenient),
        Some(Commands::Label {
            input,
            output,
            jsonl,
            config,
        }) => cmd_label(&input, output.as_deref(), jsonl, config.as_deref()),
        Some(Commands::Stats { input, config }) => cmd_stats(&input, config.as_deref()),
        Some(Commands::Config { file }) => cmd_config(file.as_deref()),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            // Default behavior: outline if input is provided
            if let Some(input) = cli.input {
                cmd_outline(
                    &input,
                    cli.output.as_deref(),
                    OutputFormat::Json(JsonFormat::Pretty),
                    None,
                    None,
                    false,
                )
            } else {
                println!("{}", "Usage: pdf-headings <FILE> [OUTPUT]".yellow());
                println!("       pdf-headings --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum OutputFormat {
    Json(JsonFormat),
    Markdown,
}

fn output_format(compact: bool, markdown: bool) -> OutputFormat {
    if markdown {
        OutputFormat::Markdown
    } else if compact {
        OutputFormat::Json(JsonFormat::Compact)
    } else {
        OutputFormat::Json(JsonFormat::Pretty)
    }
}

fn load_config(path: Option<&Path>) -> CliResult<Config> {
    match path {
        Some(path) => Ok(Config::from_file(path)?),
        None => Ok(Config::default()),
    }
}

fn read_options(lenient: bool) -> ReadOptions {
    if lenient {
        ReadOptions::new().lenient()
    } else {
        ReadOptions::default()
    }
}

fn read_lines(path: &Path, lenient: bool) -> CliResult<Vec<TextLine>> {
    let reader = LineReader::open_with_options(path, read_options(lenient))?;
    Ok(reader.read()?)
}

fn write_output(output: Option<&Path>, content: &str) -> CliResult {
    if let Some(path) = output {
        fs::write(path, content)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", content);
    }
    Ok(())
}

fn cmd_outline(
    input: &Path,
    output: Option<&Path>,
    format: OutputFormat,
    config: Option<&Path>,
    labels: Option<&Path>,
    lenient: bool,
) -> CliResult {
    let config = load_config(config)?;
    let mut extractor = OutlineExtractor::new().with_config(config.clone());

    if let Some(path) = labels {
        let records = read_labeled_file(path)?;
        let classifier = LabeledClassifier::from_records_with_config(&records, &config);
        log::info!("Loaded {} labels from {}", classifier.len(), path.display());
        extractor = extractor.with_classifier(classifier);
    }

    let lines = read_lines(input, lenient)?;
    let hierarchy = extractor.extract(&lines)?;

    let rendered = match format {
        OutputFormat::Json(json) => to_json(&hierarchy, json)?,
        OutputFormat::Markdown => to_markdown(&hierarchy),
    };

    write_output(output, &rendered)
}

/// Line files in `dir`, sorted by name.
fn collect_inputs(dir: &Path) -> CliResult<Vec<PathBuf>> {
    let mut inputs: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("json") || ext.eq_ignore_ascii_case("jsonl"))
        })
        .collect();
    inputs.sort();
    Ok(inputs)
}

/// `<output_dir>/<stem>.json` for an input file.
fn output_path(input: &Path, output_dir: &Path) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    output_dir.join(format!("{}.json", stem))
}

/// Output paths claimed by more than one input.
fn colliding_outputs(inputs: &[PathBuf], output_dir: &Path) -> HashSet<PathBuf> {
    let mut claims: HashMap<PathBuf, usize> = HashMap::new();
    for input in inputs {
        *claims.entry(output_path(input, output_dir)).or_default() += 1;
    }
    claims
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(path, _)| path)
        .collect()
}

fn process_one(
    extractor: &OutlineExtractor,
    input: &Path,
    output_dir: &Path,
    lenient: bool,
) -> CliResult {
    let lines = read_lines(input, lenient)?;
    let hierarchy = extractor.extract(&lines)?;
    let json = to_json(&hierarchy, JsonFormat::Pretty)?;
    fs::write(output_path(input, output_dir), json)?;
    Ok(())
}

fn cmd_batch(
    input_dir: &Path,
    output_dir: &Path,
    config: Option<&Path>,
    sequential: bool,
    lenient: bool,
) -> CliResult {
    let start = Instant::now();
    let extractor = OutlineExtractor::new().with_config(load_config(config)?);

    if output_dir.exists() && fs::canonicalize(input_dir)? == fs::canonicalize(output_dir)? {
        return Err(format!(
            "output directory {} is the input directory",
            output_dir.display()
        )
        .into());
    }

    let inputs = collect_inputs(input_dir)?;
    if inputs.is_empty() {
        println!(
            "{} {}",
            "No line files found in".yellow(),
            input_dir.display()
        );
        return Ok(());
    }
    fs::create_dir_all(output_dir)?;

    let pb = ProgressBar::new(inputs.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let collisions = colliding_outputs(&inputs, output_dir);
    let failures = AtomicUsize::new(0);
    let run = |input: &PathBuf| {
        let name = input.file_name().unwrap_or_default().to_string_lossy();
        let target = output_path(input, output_dir);
        let result = if collisions.contains(&target) {
            Err(format!("{} is shared with another input", target.display()).into())
        } else {
            process_one(&extractor, input, output_dir, lenient)
        };
        if let Err(e) = result {
            failures.fetch_add(1, Ordering::Relaxed);
            log::warn!("Failed to process {}: {}", input.display(), e);
            pb.println(format!("{} {}: {}", "Failed".red(), name, e));
        }
        pb.set_message(name.to_string());
        pb.inc(1);
    };

    if sequential {
        inputs.iter().for_each(run);
    } else {
        inputs.par_iter().for_each(run);
    }

    pb.finish_with_message("Done!");

    let failed = failures.load(Ordering::Relaxed);
    println!(
        "\n{} {} of {} files in {:.2?}",
        "Processed".green().bold(),
        inputs.len() - failed,
        inputs.len(),
        start.elapsed()
    );
    if failed > 0 {
        println!("{} {} files failed", "Warning:".yellow().bold(), failed);
    }

    Ok(())
}

fn cmd_label(
    input: &Path,
    output: Option<&Path>,
    jsonl: bool,
    config: Option<&Path>,
) -> CliResult {
    let config = load_config(config)?;
    let lines = read_lines(input, false)?;
    let merged = LineMerger::new(&config).merge(&lines);
    let records = label_template(&merged);

    let rendered = if jsonl {
        label::to_jsonl(&records)?
    } else {
        label::to_json(&records, JsonFormat::Pretty)?
    };

    write_output(output, rendered.trim_end())
}

fn cmd_stats(input: &Path, config: Option<&Path>) -> CliResult {
    let extractor = OutlineExtractor::new().with_config(load_config(config)?);
    let lines = read_lines(input, false)?;
    let (hierarchy, stats) = extractor.extract_with_stats(&lines)?;

    println!("{}", "Pipeline Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Title".bold(), hierarchy.title);
    println!("{}: {}", "Pages".bold(), stats.page_count);
    println!("{}: {}", "Raw lines".bold(), stats.raw_lines);
    println!("{}: {}", "Merged lines".bold(), stats.merged_lines);
    println!("{}: {}", "Repeating keys".bold(), stats.repeating_keys);
    println!("{}: {}", "After repetition".bold(), stats.after_repetition);
    println!("{}: {}", "After length".bold(), stats.after_length);
    println!("{}: {}", "Candidates".bold(), stats.candidates);
    println!("{}: {}", "Classified".bold(), stats.classified);
    println!("{}: {}", "Outline entries".bold(), stats.outline_entries);

    println!();
    println!("{}", "Outline Levels".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    let mut levels: Vec<_> = hierarchy.outline.iter().map(|entry| entry.level).collect();
    levels.sort();
    levels.dedup();
    for level in levels {
        println!(
            "{}: {}",
            level.to_string().bold(),
            hierarchy.entries_at(level).count()
        );
    }

    Ok(())
}

fn cmd_config(file: Option<&Path>) -> CliResult {
    let config = load_config(file)?;
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}

fn cmd_version() {
    println!(
        "{} {}",
        "pdf-headings".cyan().bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!("Heading outline extraction tool");
    println!();
    println!("License: MIT");
}
