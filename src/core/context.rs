use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{Context as _, Result, anyhow};
use colored::Colorize;
use rayon::prelude::*;
use swc_common::SourceMap;

use crate::{
    config::{CONFIG_FILE_NAME, Config, load_config},
    core::{
        Dictionary, KeyMode,
        accumulate::extract_messages,
        collect::LibraryApi,
        file_scanner::scan_files,
        parsers::template::{ParsedTemplate, parse_template},
    },
};

/// Inputs of one extraction run.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Glob selecting the component files.
    pub pattern: String,
    /// Directory the configuration file is searched from.
    pub config_dir: PathBuf,
    pub mode: KeyMode,
    /// Whether to print verbose diagnostic messages.
    pub verbose: bool,
}

/// A file that could not be read or parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseFailure {
    pub file_path: String,
    pub error: String,
}

/// Outcome of an extraction run.
#[derive(Debug, Clone, Default)]
pub struct ExtractSummary {
    /// Files matched by the glob after filtering.
    pub files_scanned: usize,
    /// Files that contributed at least one message record.
    pub files_extracted: usize,
    /// Records written into the dictionary.
    pub messages_added: usize,
    /// Records whose id was already taken.
    pub messages_skipped: usize,
    pub parse_errors: Vec<ParseFailure>,
}

/// Batch driver: configuration, file discovery, parsing and merging.
///
/// Files are read and parsed in parallel, then merged one by one, in sorted
/// path order, into a single dictionary. The dictionary is never touched from
/// more than one thread.
pub struct ExtractContext {
    pub config: Config,
    pub files: Vec<String>,
    pub mode: KeyMode,
    pub verbose: bool,
    api: LibraryApi,
}

impl ExtractContext {
    /// Load configuration and scan for component files.
    ///
    /// # Errors
    ///
    /// Returns error if the config file is invalid or the glob is malformed.
    pub fn new(options: &ExtractOptions) -> Result<Self> {
        let verbose = options.verbose;
        let config_result = load_config(&options.config_dir)?;

        if verbose && !config_result.from_file {
            eprintln!(
                "Note: No {} found, using default configuration",
                CONFIG_FILE_NAME
            );
        }

        let config = config_result.config;
        let scan_result = scan_files(
            &options.pattern,
            &config.ignores,
            |path: &Path| config.matches_extension(path),
            verbose,
        )?;

        if scan_result.skipped_count > 0 {
            eprintln!(
                "{} {} path(s) skipped due to access errors{}",
                "warning:".bold().yellow(),
                scan_result.skipped_count,
                if verbose { "" } else { " (use -v for details)" }
            );
        }

        let api = config.library_api();

        Ok(Self {
            config,
            files: scan_result.files,
            mode: options.mode,
            verbose,
            api,
        })
    }

    /// Read and parse every file in parallel, keeping input order.
    pub fn parse_files(&self) -> Vec<(String, Result<ParsedTemplate>)> {
        self.files
            .par_iter()
            .map(|file_path| {
                let parse_result = std::fs::read_to_string(file_path)
                    .map_err(|e| anyhow!("Failed to read file: {}", e))
                    .and_then(|code| {
                        // Each thread creates its own SourceMap
                        let source_map = Arc::new(SourceMap::default());
                        parse_template(code, file_path, source_map)
                    });
                (file_path.clone(), parse_result)
            })
            .collect()
    }

    /// Extract all files into `dictionary`.
    ///
    /// Unparsable files are reported and skipped. A malformed message catalog
    /// aborts the run.
    pub fn run(&self, dictionary: &mut Dictionary) -> Result<ExtractSummary> {
        let mut summary = ExtractSummary {
            files_scanned: self.files.len(),
            ..Default::default()
        };

        if self.verbose {
            eprintln!("Extracting messages from {} file(s)", self.files.len());
        }

        for (file_path, result) in self.parse_files() {
            let template = match result {
                Ok(template) => template,
                Err(e) => {
                    if self.verbose {
                        eprintln!("{} {} - {}", "warning:".bold().yellow(), file_path, e);
                    }
                    summary.parse_errors.push(ParseFailure {
                        file_path,
                        error: e.to_string(),
                    });
                    continue;
                }
            };

            let stats = extract_messages(&template, &self.api, dictionary, self.mode)
                .with_context(|| {
                    format!("Failed to extract messages from {}", template.file_path)
                })?;

            if stats.total() > 0 {
                summary.files_extracted += 1;
                if self.verbose {
                    eprintln!(
                        "  {}: {} added, {} already present",
                        template.file_path, stats.added, stats.skipped
                    );
                }
            }
            summary.messages_added += stats.added;
            summary.messages_skipped += stats.skipped;
        }

        Ok(summary)
    }
}
