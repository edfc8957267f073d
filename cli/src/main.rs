//! bandfilter CLI - pull band and orchestra pages out of schedule PDFs

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;

use bandfilter::{
    scan_bytes, BandFilter, FilterMode, FilterReport, JsonFormat, Progress, RunOutcome,
    DEFAULT_OUTPUT_NAME,
};

/// Exit status for a run that kept no pages.
const EXIT_NO_MATCHES: u8 = 2;

#[derive(Parser)]
#[command(name = "bandfilter")]
#[command(version)]
#[command(about = "Extract band and orchestra pages from PDF schedules", long_about = None)]
struct Cli {
    /// Input PDF file
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output PDF file
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Which pages to keep
    #[arg(short, long, value_enum, env = "BANDFILTER_MODE", default_value = "both")]
    mode: ModeArg,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the matching pages to a new PDF
    Filter {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (default: band_orchestra_students.pdf)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Which pages to keep
        #[arg(short, long, value_enum, env = "BANDFILTER_MODE", default_value = "both")]
        mode: ModeArg,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,

        /// Hide the progress bar
        #[arg(short, long)]
        quiet: bool,
    },

    /// List the verdict for every page without writing anything
    Scan {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Which pages to keep
        #[arg(short, long, value_enum, env = "BANDFILTER_MODE", default_value = "both")]
        mode: ModeArg,
    },

    /// Filter several PDFs in parallel
    Batch {
        /// Input PDF files
        #[arg(value_name = "FILES", required = true)]
        inputs: Vec<PathBuf>,

        /// Output directory
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        /// Which pages to keep
        #[arg(short, long, value_enum, env = "BANDFILTER_MODE", default_value = "both")]
        mode: ModeArg,
    },

    /// Show version information
    Version,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum ModeArg {
    /// Pages mentioning band or orchestra
    Both,
    /// Pages mentioning band
    Band,
    /// Pages mentioning orchestra
    Orchestra,
}

impl From<ModeArg> for FilterMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Both => FilterMode::Both,
            ModeArg::Band => FilterMode::BandOnly,
            ModeArg::Orchestra => FilterMode::OrchestraOnly,
        }
    }
}

type CmdResult = Result<ExitCode, Box<dyn std::error::Error>>;

fn main() -> ExitCode {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Filter {
            input,
            output,
            mode,
            json,
            quiet,
        }) => cmd_filter(&input, output.as_deref(), mode.into(), json, quiet),
        Some(Commands::Scan { input, mode }) => cmd_scan(&input, mode.into()),
        Some(Commands::Batch {
            inputs,
            output,
            mode,
        }) => cmd_batch(&inputs, output.as_deref(), mode.into()),
        Some(Commands::Version) => {
            cmd_version();
            Ok(ExitCode::SUCCESS)
        }
        None => {
            if let Some(input) = cli.input {
                cmd_filter(&input, cli.output.as_deref(), cli.mode.into(), false, false)
            } else {
                println!("{}", "Usage: bandfilter <FILE> [OUTPUT]".yellow());
                println!("       bandfilter --help for more information");
                Ok(ExitCode::SUCCESS)
            }
        }
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {}", "Error".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn progress_bar(quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );
    pb
}

fn cmd_filter(
    input: &Path,
    output: Option<&Path>,
    mode: FilterMode,
    json: bool,
    quiet: bool,
) -> CmdResult {
    let pb = progress_bar(quiet || json);
    pb.set_message("Reading file...");

    let bar = pb.clone();
    let outcome = BandFilter::new()
        .mode(mode)
        .on_progress(move |p| {
            if let Progress::Page { current, total } = p {
                bar.set_length(total as u64);
                bar.set_position(current as u64);
            }
            bar.set_message(p.to_string());
        })
        .filter_file(input);
    pb.finish_and_clear();
    let outcome = outcome?;

    if json {
        println!("{}", outcome.report().to_json(JsonFormat::Pretty)?);
    }

    match outcome {
        RunOutcome::Filtered(pdf) => {
            let path = output
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from(&pdf.report.output_name));
            pdf.write_to(&path)?;

            if !json {
                print_report(&pdf.report);
                println!("{} {}", "Saved to".green(), path.display());
            }
            Ok(ExitCode::SUCCESS)
        }
        RunOutcome::NoMatches(report) => {
            if !json {
                println!("{}", report.summary().yellow());
            }
            Ok(ExitCode::from(EXIT_NO_MATCHES))
        }
    }
}

fn print_report(report: &FilterReport) {
    println!("{}", report.summary());
    println!(
        "{}: {} of {} pages ({})",
        "Kept".bold(),
        report.kept_count(),
        report.total_pages,
        report.mode
    );
}

fn cmd_scan(input: &Path, mode: FilterMode) -> CmdResult {
    let data = fs::read(input)?;
    let verdicts = scan_bytes(&data, mode)?;

    println!("{}", "Page verdicts".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    for v in &verdicts {
        let mut hits = Vec::new();
        if v.matches_band {
            hits.push("BAND");
        }
        if v.matches_orchestra {
            hits.push("ORCHESTRA");
        }
        let hits = if !v.has_any_match() {
            "-".dimmed().to_string()
        } else {
            hits.join(", ")
        };
        let verdict = if v.keep {
            "keep".green()
        } else {
            "skip".dimmed()
        };
        println!("{:>5}  {}  {}", v.page_number(), verdict, hits);
    }

    let kept = verdicts.iter().filter(|v| v.keep).count();
    println!();
    println!(
        "{}: {} of {} pages ({})",
        "Would keep".bold(),
        kept,
        verdicts.len(),
        mode
    );

    Ok(ExitCode::SUCCESS)
}

/// Output name for one input of a batch run.
fn batch_output_name(input: &Path) -> String {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    format!("{}_{}", stem, DEFAULT_OUTPUT_NAME)
}

/// Output names for a whole batch, one per input and all distinct.
///
/// Inputs sharing a file stem get `-2`, `-3`, ... after the stem. Names are
/// compared case-insensitively.
fn batch_output_names(inputs: &[PathBuf]) -> Vec<String> {
    let mut used = HashSet::new();

    inputs
        .iter()
        .map(|input| {
            let mut name = batch_output_name(input);
            let stem = input.file_stem().unwrap_or_default().to_string_lossy();
            let mut suffix = 2;
            while !used.insert(name.to_lowercase()) {
                name = format!("{}-{}_{}", stem, suffix, DEFAULT_OUTPUT_NAME);
                suffix += 1;
            }
            if suffix > 2 {
                log::warn!("{} renamed to {} to avoid a clash", input.display(), name);
            }
            name
        })
        .collect()
}

fn cmd_batch(inputs: &[PathBuf], output: Option<&Path>, mode: FilterMode) -> CmdResult {
    let output_dir = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    fs::create_dir_all(&output_dir)?;
    log::info!(
        "Filtering {} files into {}",
        inputs.len(),
        output_dir.display()
    );

    // Each file is its own run with its own context; nothing is shared.
    let names = batch_output_names(inputs);
    let results: Vec<_> = inputs
        .par_iter()
        .zip(names)
        .map(|(input, name)| {
            let outcome = BandFilter::new()
                .mode(mode)
                .output_name(name)
                .filter_file(input)
                .and_then(|outcome| {
                    if let RunOutcome::Filtered(ref pdf) = outcome {
                        pdf.write_to(output_dir.join(&pdf.report.output_name))?;
                    }
                    Ok(outcome)
                });
            (input, outcome)
        })
        .collect();

    let mut failures = 0;
    for (input, outcome) in &results {
        match outcome {
            Ok(RunOutcome::Filtered(pdf)) => println!(
                "{} {} -> {} ({} pages)",
                "OK".green().bold(),
                input.display(),
                pdf.report.output_name,
                pdf.report.kept_count()
            ),
            Ok(RunOutcome::NoMatches(_)) => println!(
                "{} {}: no matching pages",
                "--".yellow().bold(),
                input.display()
            ),
            Err(e) => {
                failures += 1;
                println!("{} {}: {}", "FAIL".red().bold(), input.display(), e);
            }
        }
    }

    println!(
        "\n{} {} files, {} failed",
        "Done!".green().bold(),
        results.len(),
        failures
    );

    if failures > 0 {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

fn cmd_version() {
    println!(
        "{} {}",
        "bandfilter".cyan().bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!("Band and orchestra page extraction for PDF schedules");
    println!();
    println!("License: MIT");
}
