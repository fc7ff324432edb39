//! CLI console utilities

use colored::*;
use spicy_sdk::{SpicyError, UnifiedError};

/// Formatted terminal output
pub struct CliConsole;

impl CliConsole {
    /// Print an info message
    pub fn info(&self, message: &str) {
        println!("{} {}", "ℹ".blue().bold(), message);
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        println!("{} {}", "✓".green().bold(), message.green());
    }

    /// Print a warning message
    pub fn warn(&self, message: &str) {
        println!("{} {}", "⚠".yellow().bold(), message.yellow());
    }

    /// Print a header
    pub fn print_header(&self, title: &str) {
        println!();
        println!("{}", title.bold().underline());
        println!("{}", "=".repeat(title.chars().count()).dimmed());
    }

    /// Print an aligned key/value line
    pub fn field(&self, key: &str, value: &str) {
        println!("  {:<14} {}", format!("{}:", key).dimmed(), value);
    }
}

/// Print a failed command's error chain with its error code and hints
pub fn report_error(err: &anyhow::Error, verbose: bool) {
    eprintln!("{} {}", "✗".red().bold(), format!("{:#}", err).red());
    for line in error_details(err, verbose) {
        eprintln!("  {}", line.dimmed());
    }
}

/// Extra lines for errors raised by the client library
fn error_details(err: &anyhow::Error, verbose: bool) -> Vec<String> {
    let Some(spicy) = err.downcast_ref::<SpicyError>() else {
        return Vec::new();
    };

    let mut lines = vec![format!("code: {}", spicy.error_code())];
    if verbose {
        if let Some(context) = spicy.context() {
            lines.push(format!("context: {}", context));
        }
    }
    if spicy.is_retryable() {
        lines.push("This looks temporary; try again shortly.".to_string());
    } else if spicy.is_authentication() {
        lines.push("Run `spicy login --email <address>` to sign in again.".to_string());
    }
    lines
}

/// Human-readable duration such as `3h 12m`
pub fn format_duration(seconds: i64) -> String {
    if seconds <= 0 {
        return "expired".to_string();
    }
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    match (hours, minutes) {
        (0, 0) => format!("{}s", seconds),
        (0, m) => format!("{}m", m),
        (h, m) => format!("{}h {}m", h, m),
    }
}
