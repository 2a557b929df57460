//! Output formatting and styling module.
//!
//! Provides a centralized interface for all CLI output. [`OutputFormatter`]
//! holds the styled primitives and [`ConsoleSink`] turns organizer events
//! into status lines.

use crate::file_organizer::{EventSink, OrganizeEvent};
use colored::*;
use std::collections::HashMap;

/// Manages all CLI output with consistent styling and formatting.
pub struct OutputFormatter;

impl OutputFormatter {
    /// Prints a success message in green with a checkmark.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use downsort::output::OutputFormatter;
    /// OutputFormatter::success("Completed. Files have been organized by category.");
    /// ```
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Prints an error message in red with an X mark.
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Prints a warning message in yellow with a warning symbol.
    pub fn warning(message: &str) {
        println!("{} {}", "⚠".yellow(), message);
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

    /// Prints a summary table with file statistics by category.
    ///
    /// # Arguments
    ///
    /// * `category_counts` - HashMap of category names to file counts
    /// * `total_files` - Total number of files organized
    ///
    /// # Example
    ///
    /// ```no_run
    /// use downsort::output::OutputFormatter;
    /// use std::collections::HashMap;
    ///
    /// let mut counts = HashMap::new();
    /// counts.insert("Documents".to_string(), 15);
    /// counts.insert("Images".to_string(), 8);
    /// OutputFormatter::summary_table(&counts, 23);
    /// ```
    pub fn summary_table(category_counts: &HashMap<String, usize>, total_files: usize) {
        Self::header("SUMMARY");
        for line in summary_lines(category_counts, total_files) {
            println!("{}", line);
        }
    }

    /// Prints a dry-run notice message.
    pub fn dry_run_notice(message: &str) {
        println!("{}", format!("[DRY RUN] {}", message).yellow());
    }
}

fn plural(count: usize) -> &'static str {
    if count == 1 { "file" } else { "files" }
}

/// Renders the summary table rows, sorted by category name.
fn summary_lines(category_counts: &HashMap<String, usize>, total_files: usize) -> Vec<String> {
    let mut categories: Vec<_> = category_counts.iter().collect();
    categories.sort_by_key(|&(name, _)| name);

    let width = categories
        .iter()
        .map(|(name, _)| name.len())
        .max()
        .unwrap_or(0)
        .max(8); // At least "Category" width

    let mut lines = Vec::with_capacity(categories.len() + 4);
    lines.push(format!(
        "{:<width$} | {}",
        "Category".bold(),
        "Files".bold(),
        width = width
    ));
    lines.push("-".repeat(width + 10));
    for (category, count) in &categories {
        lines.push(format!(
            "{:<width$} | {} {}",
            category,
            count.to_string().green(),
            plural(**count),
            width = width
        ));
    }
    lines.push("-".repeat(width + 10));
    lines.push(format!(
        "{:<width$} | {} {}",
        "Total".bold(),
        total_files.to_string().green().bold(),
        plural(total_files),
        width = width
    ));
    lines
}

/// Prints organizer events as console status lines.
///
/// Per-category counts are gathered from move events and printed as a
/// summary table once the run completes.
#[derive(Debug, Default)]
pub struct ConsoleSink {
    category_counts: HashMap<String, usize>,
}

impl ConsoleSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EventSink for ConsoleSink {
    fn emit(&mut self, event: &OrganizeEvent) {
        match event {
            OrganizeEvent::Started { target, dry_run } => {
                if *dry_run {
                    OutputFormatter::dry_run_notice("Nothing will be moved.");
                }
                OutputFormatter::info(&format!(
                    "Organizing downloads folder: {}",
                    target.display()
                ));
            }
            OrganizeEvent::InvalidTarget { .. } => {
                OutputFormatter::error("Specified folder is invalid or unavailable.");
            }
            OrganizeEvent::Excluded { file_name } => {
                OutputFormatter::warning(&format!("Skipping {} (excluded)", file_name));
            }
            OrganizeEvent::Moving {
                file_name,
                category,
                dry_run,
                ..
            } => {
                *self.category_counts.entry(category.clone()).or_insert(0) += 1;
                if *dry_run {
                    OutputFormatter::dry_run_notice(&format!(
                        "Would move {} to {}/",
                        file_name, category
                    ));
                } else {
                    OutputFormatter::plain(&format!("Moving {} to {}/", file_name, category));
                }
            }
            OrganizeEvent::Completed { moved, dry_run } => {
                if *dry_run {
                    OutputFormatter::success("Dry run complete. No files were modified.");
                } else {
                    OutputFormatter::success("Completed. Files have been organized by category.");
                }
                if *moved > 0 {
                    OutputFormatter::summary_table(&self.category_counts, *moved);
                }
            }
        }
    }
}
