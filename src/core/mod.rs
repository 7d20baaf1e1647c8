//! Core extraction engine.
//!
//! Extraction runs as a three-phase pipeline per file:
//!
//! 1. **Collection** (`collect`): resolve the library bindings of a parsed
//!    component and gather formatting calls and `defineMessages` entries.
//! 2. **Extraction** (`extract`): statically evaluate literal objects into
//!    message records.
//! 3. **Accumulation** (`accumulate`): merge records into the shared
//!    dictionary, first writer wins.
//!
//! `context` drives the pipeline over a batch of files.

pub mod accumulate;
pub mod collect;
pub mod context;
pub mod error;
pub mod extract;
pub mod file_scanner;
pub mod parsers;
pub mod path;
pub mod walk;

pub use accumulate::{Dictionary, KeyMode, MergeStats, extract_messages, extract_source};
pub use context::{ExtractContext, ExtractOptions, ExtractSummary, ParseFailure};
pub use error::ExtractError;
