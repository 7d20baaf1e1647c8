use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use colored::Colorize;
use glob::{MatchOptions, Pattern, glob_with};

/// Result of scanning files.
pub struct ScanResult {
    /// Matching files, sorted.
    pub files: Vec<String>,
    pub skipped_count: usize,
}

/// Expand `pattern` and keep the files accepted by `filter` and not ignored.
///
/// Paths come back sorted so extraction order, and therefore which file wins
/// a duplicate id, is stable between runs.
pub fn scan_files(
    pattern: &str,
    ignore_patterns: &[String],
    filter: impl Fn(&Path) -> bool,
    verbose: bool,
) -> Result<ScanResult> {
    let mut files: Vec<String> = Vec::new();
    let mut skipped_count = 0;

    let mut ignores: Vec<Pattern> = Vec::new();
    for p in ignore_patterns {
        match Pattern::new(p) {
            Ok(pattern) => ignores.push(pattern),
            Err(e) => {
                if verbose {
                    eprintln!(
                        "{} Invalid ignore pattern '{}': {}",
                        "warning:".bold().yellow(),
                        p,
                        e
                    );
                }
            }
        }
    }

    let options = MatchOptions {
        case_sensitive: true,
        require_literal_separator: true,
        require_literal_leading_dot: false,
    };
    let entries = glob_with(pattern, options)
        .with_context(|| format!("Invalid glob pattern: \"{}\"", pattern))?;

    for entry in entries {
        let path: PathBuf = match entry {
            Ok(path) => path,
            Err(e) => {
                skipped_count += 1;
                if verbose {
                    eprintln!(
                        "{} Cannot access {}: {}",
                        "warning:".bold().yellow(),
                        e.path().display(),
                        e.error()
                    );
                }
                continue;
            }
        };

        if !path.is_file() || !filter(&path) {
            continue;
        }
        if ignores.iter().any(|ignore| ignore.matches_path(&path)) {
            continue;
        }

        files.push(path.to_string_lossy().to_string());
    }

    files.sort();
    files.dedup();

    Ok(ScanResult {
        files,
        skipped_count,
    })
}
