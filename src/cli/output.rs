//! Colored output helpers for CLI
//!
//! Provides consistent, colored terminal output for the Triangulate CLI.

use crate::types::{Document, ResearchResponse, SourceStatus};
use crate::utils::text::{format_duration, truncate_chars};
use owo_colors::OwoColorize;

/// Characters of document content shown under each cited source
const SNIPPET_CHARS: usize = 160;

/// Output style configuration
pub struct Output {
    /// Whether to use colored output
    pub colored: bool,
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}

impl Output {
    /// Create a new output helper with colors enabled
    pub fn new() -> Self {
        Self { colored: true }
    }

    /// Create a new output helper with colors disabled
    pub fn no_color() -> Self {
        Self { colored: false }
    }

    /// Print the Triangulate banner
    pub fn banner(&self) {
        if self.colored {
            println!(
                "\n   {} {}\n   {}\n",
                "▲ Triangulate".bright_cyan().bold(),
                format!("v{}", env!("CARGO_PKG_VERSION")).dimmed(),
                "Multi-source research with cited answers".bright_white()
            );
        } else {
            println!(
                "\n   Triangulate v{}\n   Multi-source research with cited answers\n",
                env!("CARGO_PKG_VERSION")
            );
        }
    }

    /// Print a success message with a checkmark
    pub fn success(&self, message: &str) {
        if self.colored {
            println!("  {} {}", "✓".green().bold(), message.green());
        } else {
            println!("  [OK] {}", message);
        }
    }

    /// Print an info message
    pub fn info(&self, message: &str) {
        if self.colored {
            println!("  {} {}", "•".blue(), message);
        } else {
            println!("  [INFO] {}", message);
        }
    }

    /// Print a warning message
    pub fn warning(&self, message: &str) {
        if self.colored {
            println!("  {} {}", "⚠".yellow().bold(), message.yellow());
        } else {
            println!("  [WARN] {}", message);
        }
    }

    /// Print an error message
    pub fn error(&self, message: &str) {
        if self.colored {
            eprintln!("  {} {}", "✗".red().bold(), message.red());
        } else {
            eprintln!("  [ERROR] {}", message);
        }
    }

    /// Print a header for a section
    pub fn header(&self, title: &str) {
        if self.colored {
            println!("\n  {}", title.bright_white().bold().underline());
        } else {
            println!("\n  === {} ===", title);
        }
    }

    /// Print a key-value pair
    pub fn kv(&self, key: &str, value: &str) {
        if self.colored {
            println!("    {}: {}", key.dimmed(), value.bright_white());
        } else {
            println!("    {}: {}", key, value);
        }
    }

    /// Print a hint/tip message
    pub fn hint(&self, message: &str) {
        if self.colored {
            println!("\n  {} {}", "💡".dimmed(), message.dimmed().italic());
        } else {
            println!("\n  [TIP] {}", message);
        }
    }

    /// Print a research answer followed by its numbered sources
    pub fn research(&self, response: &ResearchResponse) {
        self.header("Answer");
        println!();
        for line in response.answer.lines() {
            println!("  {}", line);
        }

        self.header(&format!("Sources ({})", response.sources.len()));
        for (i, doc) in response.sources.iter().enumerate() {
            self.source(i + 1, doc);
        }

        println!();
        let stats = format!(
            "{} tokens · {}",
            response.tokens_used,
            format_duration(response.processing_time)
        );
        if self.colored {
            println!("  {}", stats.dimmed());
        } else {
            println!("  {}", stats);
        }
    }

    /// Print one cited source as `[n] title (type)`, its URL and a snippet
    pub fn source(&self, number: usize, doc: &Document) {
        let snippet = truncate_chars(&doc.content, SNIPPET_CHARS);
        if self.colored {
            println!(
                "\n  {} {} {}",
                format!("[{}]", number).bright_cyan().bold(),
                doc.title.bright_white(),
                format!("({})", doc.source_type).dimmed()
            );
            println!("      {}", doc.url.blue().underline());
            println!("      {}", snippet.dimmed());
        } else {
            println!("\n  [{}] {} ({})", number, doc.title, doc.source_type);
            println!("      {}", doc.url);
            println!("      {}", snippet);
        }
    }

    /// Print source availability as a table
    pub fn source_statuses(&self, statuses: &[SourceStatus]) {
        self.table_header(&["Source", "Enabled", "API key", "Ready"]);
        for status in statuses {
            let yes_no = |b: bool| if b { "yes" } else { "no" };
            let ready = status.enabled && status.configured;
            self.table_row(&[
                status.source_type.as_str(),
                yes_no(status.enabled),
                if status.requires_api_key { "required" } else { "-" },
                yes_no(ready),
            ]);
        }
    }

    /// Print a table header row
    pub fn table_header(&self, columns: &[&str]) {
        let header: String = columns
            .iter()
            .map(|c| format!("{:<15}", c))
            .collect::<Vec<_>>()
            .join(" ");
        if self.colored {
            println!("    {}", header.bright_white().bold());
            println!("    {}", "─".repeat(columns.len() * 16).dimmed());
        } else {
            println!("    {}", header);
            println!("    {}", "-".repeat(columns.len() * 16));
        }
    }

    /// Print a table row
    pub fn table_row(&self, values: &[&str]) {
        let row: String = values
            .iter()
            .map(|v| format!("{:<15}", v))
            .collect::<Vec<_>>()
            .join(" ");
        println!("    {}", row);
    }
}
