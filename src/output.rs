//! Output formatting and styling module.
//!
//! Provides a centralized interface for console output: coloured status lines,
//! the progress bar shown while files are moved and the final summary table.

use crate::file_category::Summary;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

/// Manages all CLI output with consistent styling and formatting.
pub struct OutputFormatter;

impl OutputFormatter {
    /// Prints a success message in green with a checkmark.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use extsort::output::OutputFormatter;
    /// OutputFormatter::success("Files successfully organized.");
    /// ```
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Prints an error message in red with an X mark, on standard error.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use extsort::output::OutputFormatter;
    /// OutputFormatter::error("An error occurred: invalid root directory");
    /// ```
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Prints an info message in cyan.
    pub fn info(message: &str) {
        println!("{}", message.cyan());
    }

    /// Prints a regular message without styling.
    pub fn plain(message: &str) {
        println!("{}", message);
    }

    /// Prints a section header.
    pub fn header(header: &str) {
        println!("\n{}", header.bold());
    }

    /// Prints a dry-run notice message, prefixed with `[DRY RUN]`, in yellow.
    ///
    /// # Arguments
    ///
    /// * `message` - The notice to print after the prefix
    pub fn dry_run_notice(message: &str) {
        println!("{}", format!("[DRY RUN] {}", message).yellow());
    }

    /// Creates the "Organizing Files" progress bar.
    ///
    /// Returns a hidden bar when `visible` is false, so callers can drive it
    /// unconditionally.
    ///
    /// # Arguments
    ///
    /// * `total` - Number of files the bar counts up to
    /// * `visible` - Whether the bar is drawn on the terminal
    ///
    /// # Example
    ///
    /// ```
    /// use extsort::output::OutputFormatter;
    ///
    /// let pb = OutputFormatter::create_progress_bar(3, false);
    /// pb.inc(3);
    /// pb.finish_and_clear();
    /// assert_eq!(pb.position(), 3);
    /// ```
    pub fn create_progress_bar(total: u64, visible: bool) -> ProgressBar {
        if !visible {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new(total);
        let style = ProgressStyle::default_bar()
            .template("{msg} {spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} files")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓░");
        pb.set_style(style);
        pb.set_message("Organizing Files");
        pb
    }

    /// Renders the summary table as plain text, one line per row.
    ///
    /// Categories are sorted by name; the empty-string category is shown with a
    /// readable label.
    ///
    /// # Arguments
    ///
    /// * `summary` - Per-category counts of one run
    ///
    /// # Example
    ///
    /// ```
    /// use extsort::file_category::{Category, Summary};
    /// use extsort::output::OutputFormatter;
    /// use std::path::Path;
    ///
    /// let mut summary = Summary::new();
    /// summary.record(&Category::of(Path::new("notes.md")));
    ///
    /// let lines = OutputFormatter::summary_lines(&summary);
    /// assert_eq!(lines[2], "md       | 1 file");
    /// assert_eq!(lines.last().unwrap(), "Total    | 1 file");
    /// ```
    pub fn summary_lines(summary: &Summary) -> Vec<String> {
        let rows: Vec<_> = summary
            .iter()
            .map(|(category, count)| (category.label().to_string(), count))
            .collect();

        let width = rows
            .iter()
            .map(|(name, _)| name.chars().count())
            .max()
            .unwrap_or(0)
            .max("Category".len());

        let mut lines = Vec::with_capacity(rows.len() + 4);
        lines.push(format!("{:<width$} | Files", "Category", width = width));
        lines.push("-".repeat(width + 10));
        for (name, count) in &rows {
            lines.push(format!(
                "{:<width$} | {} {}",
                name,
                count,
                file_word(*count),
                width = width
            ));
        }
        lines.push("-".repeat(width + 10));
        let total = summary.total();
        lines.push(format!(
            "{:<width$} | {} {}",
            "Total",
            total,
            file_word(total),
            width = width
        ));
        lines
    }

    /// Prints a summary table with file counts by category.
    ///
    /// # Arguments
    ///
    /// * `summary` - Per-category counts of one run
    ///
    /// # Example
    ///
    /// ```no_run
    /// use extsort::file_category::{Category, Summary};
    /// use extsort::output::OutputFormatter;
    /// use std::path::Path;
    ///
    /// let mut summary = Summary::new();
    /// summary.record(&Category::of(Path::new("a.txt")));
    /// OutputFormatter::summary_table(&summary);
    /// ```
    pub fn summary_table(summary: &Summary) {
        Self::header("Summary:");

        if summary.is_empty() {
            println!("  No files were moved.");
            return;
        }

        for line in Self::summary_lines(summary) {
            println!("  {}", line);
        }
    }
}

fn file_word(count: usize) -> &'static str {
    if count == 1 { "file" } else { "files" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file_category::Category;
    use std::path::Path;

    #[test]
    fn test_summary_lines_layout() {
        let mut summary = Summary::new();
        summary.record(&Category::of(Path::new("a.txt")));
        summary.record(&Category::of(Path::new("b.TXT")));
        summary.record(&Category::of(Path::new("notes")));

        let lines = OutputFormatter::summary_lines(&summary);

        assert_eq!(lines.len(), 6);
        assert!(lines[0].starts_with("Category"));
        assert_eq!(lines[2], "(no extension) | 1 file");
        assert_eq!(lines[3], "txt            | 2 files");
        assert_eq!(lines[5], "Total          | 3 files");
    }

    #[test]
    fn test_hidden_progress_bar() {
        let pb = OutputFormatter::create_progress_bar(10, false);
        assert!(pb.is_hidden());
        pb.inc(1);
    }
}
