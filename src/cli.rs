//! Command-line interface module for extsort.
//!
//! This module handles all CLI-related functionality including:
//! - Argument parsing
//! - Settings loading
//! - Organization and dry-run orchestration
//! - Console reporting of the results

use crate::config::{load_config, load_config_from};
use crate::file_organizer::FileOrganizer;
use crate::output::OutputFormatter;
use clap::Parser;
use std::path::PathBuf;

/// Sort every file under a directory into `Organized/<extension>/`.
#[derive(Debug, Clone, Parser)]
#[command(name = "extsort", version, about)]
pub struct Args {
    /// Directory to organize.
    pub root: PathBuf,

    /// Settings file to use instead of ./organize_config.ini.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Show what would be moved without changing anything.
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Also re-sort files already inside Organized/ from earlier runs.
    #[arg(long)]
    pub include_organized: bool,

    /// Do not draw the progress bar.
    #[arg(long)]
    pub no_progress: bool,
}

impl Args {
    /// Arguments for organizing `root` with every option at its default.
    ///
    /// # Example
    ///
    /// ```
    /// use extsort::cli::Args;
    ///
    /// let args = Args {
    ///     dry_run: true,
    ///     ..Args::for_root("/data")
    /// };
    /// assert!(args.config.is_none());
    /// ```
    pub fn for_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            config: None,
            dry_run: false,
            include_organized: false,
            no_progress: false,
        }
    }
}

/// Runs the CLI application with the given arguments.
///
/// Loads (or creates) the settings file, then organizes the root directory or,
/// with `--dry-run`, only reports what would happen. Errors are returned as a
/// single printable line; files moved before a failure stay moved.
///
/// # Arguments
///
/// * `args` - Parsed command-line arguments: root directory, settings file and flags
///
/// # Examples
///
/// ```no_run
/// use extsort::cli::{Args, run_cli};
///
/// match run_cli(&Args::for_root("/path/to/directory")) {
///     Ok(()) => println!("Operation completed successfully"),
///     Err(e) => eprintln!("{}", e),
/// }
/// ```
pub fn run_cli(args: &Args) -> Result<(), String> {
    let config = match &args.config {
        Some(path) => load_config_from(path),
        None => load_config(),
    }
    .map_err(|e| format!("Error loading configuration: {}", e))?;

    let organizer = FileOrganizer::new(&args.root, config)
        .include_organized(args.include_organized)
        .show_progress(!args.no_progress && !args.dry_run);

    if args.dry_run {
        organize_directory_dry_run(&organizer)
    } else {
        organize_directory(&organizer)
    }
}

/// Organizes the root directory.
///
/// This function:
/// 1. Creates `Organized/` and opens the run log
/// 2. Moves every file that is not skipped
/// 3. Prints the per-category summary and where the log was written
///
/// # Arguments
///
/// * `organizer` - Organizer configured for the root directory
fn organize_directory(organizer: &FileOrganizer) -> Result<(), String> {
    OutputFormatter::info(&format!(
        "Organizing contents of: {}",
        organizer.root().display()
    ));

    let summary = organizer
        .organize()
        .map_err(|e| format!("An error occurred: {}", e))?;

    OutputFormatter::success("Files successfully organized.");
    OutputFormatter::summary_table(&summary);
    OutputFormatter::plain(&format!(
        "\nLog written to {}",
        organizer.log_path().display()
    ));

    Ok(())
}

/// Prints the moves `organize_directory` would make, without making them.
///
/// # Arguments
///
/// * `organizer` - Organizer configured for the root directory
fn organize_directory_dry_run(organizer: &FileOrganizer) -> Result<(), String> {
    OutputFormatter::dry_run_notice(&format!(
        "Analyzing contents of: {}",
        organizer.root().display()
    ));

    let plan = organizer
        .plan()
        .map_err(|e| format!("An error occurred: {}", e))?;

    if plan.moves.is_empty() {
        OutputFormatter::plain("No files found to organize.");
        return Ok(());
    }

    OutputFormatter::header("Files would be organized as follows:");
    for planned in &plan.moves {
        let note = if planned.clears_category_dir {
            " (moved aside for a category directory)"
        } else if planned.replaces_existing {
            " (replaces existing file)"
        } else {
            ""
        };
        OutputFormatter::plain(&format!(
            " - [{}] {}",
            planned.category.label(),
            planned.source.display()
        ));
        OutputFormatter::plain(&format!(
            "   → {}{}",
            planned.destination.display(),
            note
        ));
    }

    OutputFormatter::summary_table(&plan.summary);
    OutputFormatter::dry_run_notice("Dry run complete. No files were modified.");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_args_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_flags() {
        let args = Args::try_parse_from([
            "extsort",
            "/data",
            "--config",
            "my.ini",
            "--dry-run",
            "--include-organized",
            "--no-progress",
        ])
        .unwrap();

        assert_eq!(args.root, PathBuf::from("/data"));
        assert_eq!(args.config, Some(PathBuf::from("my.ini")));
        assert!(args.dry_run);
        assert!(args.include_organized);
        assert!(args.no_progress);
    }

    #[test]
    fn test_root_is_required() {
        assert!(Args::try_parse_from(["extsort"]).is_err());
    }

    #[test]
    fn test_for_root_defaults() {
        let args = Args::for_root("/data");
        assert!(!args.dry_run);
        assert!(!args.include_organized);
        assert!(args.config.is_none());
    }
}
