//! Terminal reporting for CLI commands.
//!
//! Everything here goes to stderr: stdout is reserved for the extracted
//! dictionary.

use std::{
    io::{self, Write},
    path::Path,
};

use colored::Colorize;

use crate::core::ExtractSummary;

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

fn plural(count: usize, word: &str) -> String {
    if count == 1 {
        format!("{} {}", count, word)
    } else {
        format!("{} {}s", count, word)
    }
}

/// Print a success message after the dictionary was written.
pub fn print_success(summary: &ExtractSummary, output: &Path) {
    print_success_to(summary, output, &mut io::stderr().lock());
}

/// Print a success message to a custom writer.
pub fn print_success_to<W: Write>(summary: &ExtractSummary, output: &Path, writer: &mut W) {
    let msg = format!(
        "Extracted {} from {} ({} scanned) into {}",
        plural(summary.messages_added, "new message"),
        plural(summary.files_extracted, "file"),
        summary.files_scanned,
        output.display()
    );
    let _ = writeln!(writer, "{} {}", SUCCESS_MARK.green(), msg.green());
}

/// Print a warning about files that could not be parsed.
pub fn print_parse_warning(count: usize, verbose: bool) {
    print_parse_warning_to(count, verbose, &mut io::stderr().lock());
}

/// Print a parse warning to a custom writer.
///
/// Under `--verbose` every failure was already reported by the driver.
pub fn print_parse_warning_to<W: Write>(count: usize, verbose: bool, writer: &mut W) {
    if count > 0 && !verbose {
        let _ = writeln!(
            writer,
            "{} {} could not be parsed (use {} for details)",
            "warning:".bold().yellow(),
            plural(count, "file"),
            "-v".cyan()
        );
    }
}

/// Print a warning when the glob selected nothing.
pub fn print_no_files_warning(pattern: &str) {
    eprintln!(
        "{} no files matched \"{}\"",
        "warning:".bold().yellow(),
        pattern
    );
}
