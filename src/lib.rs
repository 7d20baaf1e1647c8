//! svelte-intl-extract - message extractor for svelte-i18n components
//!
//! Scans Svelte components for `defineMessages` catalogs and store-subscribed
//! formatting calls (`$_`, `$t`, `$format`), and accumulates every statically
//! known message id and default into a single JSON dictionary.
//!
//! ## Module Structure
//!
//! - `cli`: Command-line interface layer (argument parsing, commands, reporting)
//! - `config`: Configuration file loading and parsing
//! - `core`: Extraction engine (three-phase pipeline)
//! - `json_writer`: Reading and writing the output dictionary

pub mod cli;
pub mod config;
pub mod core;
pub mod json_writer;
