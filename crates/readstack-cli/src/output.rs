//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)
//!
//! `Output` is also the presenter of the interactive shell.

use readstack_core::{Book, Filter, FilterCounts, Presenter, Severity, Statistics, View};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
#[derive(Debug, Clone, Copy)]
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Check if output is in JSON mode
    pub fn is_json(&self) -> bool {
        matches!(self.format, OutputFormat::Json)
    }

    /// Check if output is in quiet mode
    pub fn is_quiet(&self) -> bool {
        matches!(self.format, OutputFormat::Quiet)
    }

    /// Print a single book
    pub fn print_book(&self, book: &Book) {
        match self.format {
            OutputFormat::Human => {
                println!("ID:        {}", book.id);
                println!("Title:     {}", book.title);
                println!("Author:    {}", book.author);
                println!("Category:  {}", book.category);
                println!("Status:    {}", book.status.display_name());
                if !book.notes.is_empty() {
                    println!("Notes:     {}", book.notes);
                }
                println!("Added:     {}", book.date_added.format("%Y-%m-%d %H:%M"));
                println!("Modified:  {}", book.date_modified.format("%Y-%m-%d %H:%M"));
            }
            OutputFormat::Json => print_json(book),
            OutputFormat::Quiet => println!("{}", book.id),
        }
    }

    /// Print a filtered list of books with per-filter counts
    pub fn print_books(&self, books: &[&Book], filter: Filter, counts: &FilterCounts) {
        match self.format {
            OutputFormat::Human => {
                if books.is_empty() {
                    if filter == Filter::All {
                        println!("Your library is empty. Add your first book with `readstack add`.");
                    } else {
                        println!("No books match the current filter: {}", filter_name(filter));
                    }
                } else {
                    for book in books {
                        println!(
                            "{} | {:<35} | {:<22} | {}",
                            book.id.short(),
                            truncate(&book.title, 35),
                            truncate(&book.author, 22),
                            book.status.display_name()
                        );
                    }
                }
                println!();
                println!("{}", counts_line(filter, counts));
            }
            OutputFormat::Json => print_json(books),
            OutputFormat::Quiet => {
                for book in books {
                    println!("{}", book.id);
                }
            }
        }
    }

    /// Print statistics and per-filter counts
    pub fn print_stats(&self, stats: &Statistics, counts: &FilterCounts) {
        match self.format {
            OutputFormat::Human => {
                println!("Library");
                println!("=======");
                println!("  Total books:  {}", stats.total);
                println!("  Finished:     {}", stats.finished);
                println!("  Progress:     {}%", stats.completion_percent);
                println!();
                println!("{}", counts_line(Filter::All, counts));
            }
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({ "statistics": stats, "counts": counts })
                );
            }
            OutputFormat::Quiet => println!("{}", stats.completion_percent),
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        self.notice(message, Severity::Success);
    }

    /// Check if we should prompt for confirmation
    pub fn should_prompt(&self) -> bool {
        self.format == OutputFormat::Human
    }

    /// Print an informational message
    pub fn message(&self, msg: &str) {
        match self.format {
            OutputFormat::Human => println!("{}", msg),
            OutputFormat::Json => {
                println!("{}", serde_json::json!({ "message": msg }));
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Print a message with its severity marker
    pub fn notice(&self, message: &str, severity: Severity) {
        match self.format {
            OutputFormat::Human => match severity {
                Severity::Success => println!("✓ {}", message),
                Severity::Info => println!("{}", message),
                Severity::Warning => eprintln!("⚠ {}", message),
                Severity::Error => eprintln!("✗ {}", message),
            },
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({ "status": severity_name(severity), "message": message })
                );
            }
            OutputFormat::Quiet => {
                if severity == Severity::Error {
                    eprintln!("{}", message);
                }
            }
        }
    }
}

impl Presenter for Output {
    fn render(&mut self, view: &View<'_>) {
        self.print_books(&view.books, view.filter, &view.counts);
    }

    fn notify(&mut self, message: &str, severity: Severity) {
        self.notice(message, severity);
    }
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize output: {}", e),
    }
}

fn severity_name(severity: Severity) -> &'static str {
    match severity {
        Severity::Success => "success",
        Severity::Error => "error",
        Severity::Warning => "warning",
        Severity::Info => "info",
    }
}

/// Human name of a filter
pub fn filter_name(filter: Filter) -> &'static str {
    match filter.status() {
        Some(status) => status.display_name(),
        None => "All Books",
    }
}

/// One-line summary of per-filter counts, marking the active one
fn counts_line(active: Filter, counts: &FilterCounts) -> String {
    Filter::ALL
        .iter()
        .map(|&filter| {
            let label = format!("{} ({})", filter.as_str(), counts.get(filter));
            if filter == active {
                format!("[{}]", label)
            } else {
                label
            }
        })
        .collect::<Vec<_>>()
        .join("  ")
}

/// Truncate a string to max characters, adding "..." if truncated
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_flags() {
        assert_eq!(OutputFormat::from_flags(false, false), OutputFormat::Human);
        assert_eq!(OutputFormat::from_flags(true, false), OutputFormat::Json);
        assert_eq!(OutputFormat::from_flags(false, true), OutputFormat::Quiet);
        // Quiet takes precedence
        assert_eq!(OutputFormat::from_flags(true, true), OutputFormat::Quiet);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("this is a long string", 10), "this is...");
        assert_eq!(truncate("ééééééééééééé", 5), "éé...");
    }

    #[test]
    fn test_counts_line_marks_active() {
        let counts = FilterCounts {
            all: 3,
            to_read: 1,
            reading: 1,
            finished: 1,
        };
        assert_eq!(
            counts_line(Filter::Reading, &counts),
            "all (3)  to-read (1)  [reading (1)]  finished (1)"
        );
    }

    #[test]
    fn test_filter_name() {
        assert_eq!(filter_name(Filter::All), "All Books");
        assert_eq!(filter_name(Filter::Reading), "Currently Reading");
    }
}
