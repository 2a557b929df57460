//! Command-line interface module for downsort.
//!
//! This module handles:
//! - Argument parsing
//! - Default target resolution (`~/Downloads`)
//! - Logging setup
//! - Running the organizer and rendering its result

use crate::file_organizer::{
    FileOrganizer, OrganizeEvent, OrganizeOptions, OrganizeReport, OrganizeResult,
};
use crate::output::ConsoleSink;
use clap::{Parser, ValueHint};
use std::path::{Path, PathBuf};

/// Sort the files of a downloads folder into category subdirectories.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about)]
pub struct Args {
    /// Folder to organize. Defaults to ~/Downloads.
    #[arg(value_name = "TARGET", value_hint = ValueHint::DirPath)]
    pub target: Option<PathBuf>,

    /// Show what would be moved without touching any file.
    #[arg(long)]
    pub dry_run: bool,

    /// Leave files whose name matches this glob in place (repeatable),
    /// e.g. --exclude '*.crdownload'.
    #[arg(long, short = 'x', value_name = "GLOB")]
    pub exclude: Vec<String>,

    /// Print the run report as JSON instead of status lines.
    #[arg(long)]
    pub json: bool,

    /// Enable debug logging (RUST_LOG takes precedence).
    #[arg(long, short = 'v')]
    pub verbose: bool,
}

impl Args {
    fn options(&self) -> OrganizeOptions {
        OrganizeOptions {
            dry_run: self.dry_run,
            exclude: self.exclude.clone(),
        }
    }
}

/// Returns the explicit target, or the user's `Downloads` folder.
pub fn resolve_target(explicit: Option<&Path>) -> Option<PathBuf> {
    match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => dirs::home_dir().map(|home| home.join("Downloads")),
    }
}

/// Initializes `env_logger`. Diagnostics go to stderr; status lines are
/// printed separately by the output module.
pub fn init_logging(verbose: bool) {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

/// Runs one organize pass on `target` as configured by `args`.
///
/// With `--json` the status lines are suppressed and the report is printed
/// as JSON once the run ends.
///
/// # Examples
///
/// ```no_run
/// use clap::Parser;
/// use downsort::cli::{Args, run_cli};
/// use std::path::Path;
///
/// let args = Args::parse_from(["downsort", "--dry-run"]);
/// match run_cli(&args, Path::new("/path/to/Downloads")) {
///     Ok(report) => println!("{} file(s)", report.moves.len()),
///     Err(e) => eprintln!("Error: {}", e),
/// }
/// ```
pub fn run_cli(args: &Args, target: &Path) -> OrganizeResult<OrganizeReport> {
    let organizer = FileOrganizer::default().with_options(args.options());

    if args.json {
        let mut events: Vec<OrganizeEvent> = Vec::new();
        let report = organizer.run(target, &mut events)?;
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{}", json),
            Err(e) => log::error!("Could not serialize report: {}", e),
        }
        return Ok(report);
    }

    let mut sink = ConsoleSink::new();
    organizer.run(target, &mut sink)
}
