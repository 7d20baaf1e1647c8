//! CLI argument definitions using clap.
//!
//! ## Commands
//!
//! - `extract`: Extract messages from components into a JSON dictionary
//! - `init`: Initialize the configuration file

use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};

use crate::core::KeyMode;

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Arguments {
    /// Check if a command was provided, otherwise print help and return None.
    pub fn with_command_or_help(self) -> Option<Self> {
        if self.command.is_none() {
            Self::command().print_help().ok();
            None
        } else {
            Some(self)
        }
    }
}

/// Common arguments shared by all commands.
#[derive(Debug, Clone, Args)]
pub struct CommonArgs {
    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Args)]
pub struct ExtractCommand {
    /// Glob pattern selecting the component files (quote it to avoid shell expansion)
    pub pattern: String,

    /// Output JSON file; the dictionary is printed to stdout when omitted
    pub output: Option<PathBuf>,

    /// Use message ids as flat keys instead of nested paths
    #[arg(short, long)]
    pub shallow: bool,

    /// Start from an empty dictionary instead of merging into the existing output
    #[arg(long)]
    pub overwrite: bool,

    #[command(flatten)]
    pub common: CommonArgs,
}

impl ExtractCommand {
    pub fn key_mode(&self) -> KeyMode {
        if self.shallow {
            KeyMode::Shallow
        } else {
            KeyMode::Deep
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Extract message ids and defaults from components into a JSON dictionary
    Extract(ExtractCommand),
    /// Initialize a new .intlrc.json configuration file
    Init,
}
