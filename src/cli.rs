//! Command-line interface module for extsort.
//!
//! This module handles all CLI-related functionality including:
//! - Argument parsing
//! - Configuration loading and command-line overrides
//! - Organization orchestration and progress output
//! - Exit status selection

use crate::config::{Config, ConfigError};
use crate::file_organizer::{FileOrganizer, OrganizeError};
use crate::output::OutputFormatter;
use crate::report::{EntryOutcome, OrganizeReport};
use clap::Parser;
use log::LevelFilter;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Process exit codes.
pub mod exit_codes {
    /// Every non-conflicting entry was processed.
    pub const SUCCESS: i32 = 0;
    /// The run could not start.
    pub const FATAL: i32 = 1;
    /// The run finished but some entries failed to move.
    pub const PARTIAL_FAILURE: i32 = 2;
}

/// Errors that stop the CLI before or while organizing.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Error loading configuration: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Organize(#[from] OrganizeError),
    #[error("No directory given")]
    MissingDirectory,
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),
}

/// CLI arguments for extsort.
#[derive(Parser, Debug, Clone, Default)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Directory to organize. Prompted for when omitted.
    #[arg(value_name = "DIR")]
    pub directory: Option<PathBuf>,

    /// Show what would be moved without touching the filesystem.
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Configuration file (defaults to .extsortrc.toml, then ~/.config/extsort/config.toml).
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Classify and move subdirectories as well as files.
    #[arg(long = "include-dirs")]
    pub include_dirs: bool,

    /// Lowercase extensions before grouping.
    #[arg(long)]
    pub lowercase: bool,

    /// Folder for entries without an extension.
    #[arg(long = "no-extension-dir", value_name = "NAME")]
    pub no_extension_dir: Option<String>,

    /// Print the run report as JSON instead of human-readable output.
    #[arg(long)]
    pub json: bool,

    /// Increase logging verbosity (`-v`, `-vv`, `-vvv`).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Maps the number of `-v` flags to a log level.
pub fn log_level_from_verbose(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Asks for the directory on stdin. The prompt goes to stderr so stdout
/// only carries the run output.
///
/// # Errors
///
/// Returns `CliError::MissingDirectory` if the answer is blank.
pub fn prompt_for_directory() -> Result<PathBuf, CliError> {
    eprint!("Enter path: ");
    io::stderr().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;

    let answer = line.trim();
    if answer.is_empty() {
        return Err(CliError::MissingDirectory);
    }
    Ok(PathBuf::from(answer))
}

/// Builds an organizer from the configuration file and command-line overrides.
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded, a filter pattern
/// does not compile, or the resulting options are invalid.
pub fn build_organizer(args: &Args) -> Result<FileOrganizer, CliError> {
    let config = Config::load(args.config.as_deref())?;

    let mut options = config.organize;
    if args.include_dirs {
        options.include_directories = true;
    }
    if args.lowercase {
        options.lowercase_extensions = true;
    }
    if let Some(name) = &args.no_extension_dir {
        options.no_extension_dir = name.clone();
    }

    let filters = config.filters.compile()?;
    Ok(FileOrganizer::new(options, filters)?)
}

/// Runs the CLI application against `dir_path`.
///
/// # Examples
///
/// ```no_run
/// use clap::Parser;
/// use extsort::cli::{Args, run_cli};
/// use std::path::Path;
///
/// let args = Args::parse_from(["extsort", "--dry-run"]);
/// match run_cli(&args, Path::new("/path/to/directory")) {
///     Ok(report) => println!("{} entries would move", report.moved()),
///     Err(e) => eprintln!("Error: {}", e),
/// }
/// ```
pub fn run_cli(args: &Args, dir_path: &Path) -> Result<OrganizeReport, CliError> {
    let organizer = build_organizer(args)?;

    if args.json {
        let report = organizer.run(dir_path, args.dry_run, |outcome| {
            if let EntryOutcome::Conflict { path, existing } = outcome {
                OutputFormatter::warning_stderr(&OutputFormatter::conflict_message(
                    &display_name(path),
                    &folder_name(existing),
                ));
            }
        })?;
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(report);
    }

    if args.dry_run {
        preview_directory(&organizer, dir_path)
    } else {
        organize_directory(&organizer, dir_path)
    }
}

/// Exit code for a finished run.
pub fn exit_code(report: &OrganizeReport) -> i32 {
    if report.is_success() {
        exit_codes::SUCCESS
    } else {
        exit_codes::PARTIAL_FAILURE
    }
}

/// Moves entries, printing one line per entry and a summary.
fn organize_directory(
    organizer: &FileOrganizer,
    base_path: &Path,
) -> Result<OrganizeReport, CliError> {
    OutputFormatter::info(&format!("Organizing contents of: {}", base_path.display()));

    let total = fs::read_dir(base_path).map(|d| d.count()).unwrap_or(0);
    let pb = OutputFormatter::create_progress_bar(total as u64);

    let report = organizer.run(base_path, false, |outcome| {
        pb.suspend(|| print_outcome(outcome));
        pb.inc(1);
    })?;
    pb.finish_and_clear();

    OutputFormatter::summary_table(&report.counts_by_folder(), report.moved());

    if report.conflicts() > 0 {
        OutputFormatter::warning(&format!(
            "{} {} left in place because of name conflicts.",
            report.conflicts(),
            if report.conflicts() == 1 { "entry was" } else { "entries were" }
        ));
    }

    if report.is_success() {
        OutputFormatter::success("Organization complete!");
    } else {
        OutputFormatter::error(&format!(
            "{} entries could not be organized. Please review errors above.",
            report.failed()
        ));
    }

    Ok(report)
}

/// Computes moves without applying them.
fn preview_directory(
    organizer: &FileOrganizer,
    base_path: &Path,
) -> Result<OrganizeReport, CliError> {
    OutputFormatter::dry_run_notice(&format!("Analyzing contents of: {}", base_path.display()));

    let report = organizer.preview(base_path)?;

    if report.entries.is_empty() {
        OutputFormatter::plain("No files found to organize.");
        return Ok(report);
    }

    for outcome in &report.entries {
        print_outcome(outcome);
    }

    OutputFormatter::summary_table(&report.counts_by_folder(), report.moved());
    OutputFormatter::success("Dry run complete. No files were modified.");
    OutputFormatter::plain(&format!(
        "Run 'extsort {}' (without --dry-run) to execute the organization.",
        base_path.display()
    ));

    Ok(report)
}

fn print_outcome(outcome: &EntryOutcome) {
    let name = display_name(outcome.source());
    match outcome {
        EntryOutcome::Moved { folder, .. } => {
            OutputFormatter::success(&format!("{} → {}/", name, folder));
        }
        EntryOutcome::WouldMove { folder, .. } => {
            OutputFormatter::dry_run_notice(&format!("{} → would move to {}/", name, folder));
        }
        EntryOutcome::Conflict { existing, .. } => {
            OutputFormatter::conflict(&name, &folder_name(existing));
        }
        EntryOutcome::Failed { reason, .. } => {
            OutputFormatter::error(&format!("{}: {}", name, reason));
        }
        EntryOutcome::Skipped { reason, .. } => {
            log::debug!("Skipped {} ({})", name, reason);
        }
    }
}

/// Name of the folder holding `path`.
fn folder_name(path: &Path) -> String {
    path.parent().map(display_name).unwrap_or_default()
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
