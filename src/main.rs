//! Command-line front end for timetable extraction.
//!
//! Reads one or more timetable files (or directories of them) and prints
//! the extracted records as JSON or CSV, or the per-lecturer and per-day
//! class counts.

use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Result, Context};
use clap::{Parser, ValueEnum};
use log::{error, info};

use timetable_extractor::config;
use timetable_extractor::timetable::summary::write_csv;
use timetable_extractor::{
    file_utils, Extraction, ExtractOptions, MalformedRowPolicy, ParseCache, TimetableExtractor,
    TimetableSummary,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Records as JSON, one document per input file
    Json,
    /// Records as a six-column CSV table
    Csv,
    /// Classes per lecturer and per day
    Summary,
}

#[derive(Debug, Parser)]
#[command(version, about = "Extract class records from teaching timetable text")]
struct Cli {
    /// Timetable files or directories containing them
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    /// TOML file with extraction options
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Skip malformed day rows instead of failing
    #[arg(long)]
    lenient: bool,

    /// Parse every input even if identical text was already parsed
    #[arg(long)]
    no_cache: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let mut options = match &cli.config {
        Some(path) => config::load_options(path)?,
        None => ExtractOptions::default(),
    };
    if cli.lenient {
        options.malformed_rows = MalformedRowPolicy::Skip;
    }
    options.verbose |= cli.verbose;

    let mut extractor = TimetableExtractor::new(options).context("Invalid extraction options")?;
    if !cli.no_cache {
        extractor = extractor.with_cache(ParseCache::shared());
    }

    let inputs = file_utils::collect_inputs(&cli.paths)?;
    info!("Processing {} timetable files", inputs.len());

    let mut extractions = Vec::with_capacity(inputs.len());
    for input in &inputs {
        let extraction = extractor.extract_file(input)?;
        info!(
            "{}: {} records, {} malformed rows skipped",
            input.display(),
            extraction.records.len(),
            extraction.stats.malformed_rows
        );
        extractions.push((input.clone(), extraction));
    }

    match cli.format {
        OutputFormat::Json => print_json(&extractions),
        OutputFormat::Csv => {
            let records = extractions
                .iter()
                .flat_map(|(_, extraction)| extraction.records.iter().cloned())
                .collect::<Vec<_>>();
            write_csv(&records, io::stdout().lock())
        }
        OutputFormat::Summary => {
            for (path, extraction) in &extractions {
                print_summary(path, extraction);
            }
            Ok(())
        }
    }
}

fn print_json(extractions: &[(PathBuf, Arc<Extraction>)]) -> Result<()> {
    for (path, extraction) in extractions {
        let document = serde_json::json!({
            "file": path.display().to_string(),
            "records": extraction.records,
            "stats": extraction.stats,
        });
        let text = serde_json::to_string_pretty(&document).context("Failed to serialize records")?;
        println!("{}", text);
    }
    Ok(())
}

fn print_summary(path: &Path, extraction: &Extraction) {
    println!("{}", path.display());

    let Some(summary) = TimetableSummary::build(&extraction.records) else {
        println!("  No data");
        return;
    };

    println!("  Classes per lecturer:");
    for count in &summary.by_lecturer {
        println!("    {:<30} {}", count.lecturer, count.classes);
    }

    println!("  Classes per day:");
    for count in &summary.by_day {
        println!("    {:<30} {}", count.day.label(), count.classes);
    }

    println!("  Total classes: {}", summary.total_classes);
}
