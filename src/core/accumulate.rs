//! Phase 3: Accumulation - merging message records into the dictionary.
//!
//! One dictionary is threaded through every file of a run. Entries are only
//! ever added: an id that already holds a value keeps it, so the first file
//! (or the pre-existing output) that defines an id wins.

use std::sync::Arc;

use anyhow::Result;
use serde_json::{Map, Value};
use swc_common::SourceMap;

use crate::core::{
    collect::{LibraryApi, resolve_bindings},
    error::ExtractError,
    extract::{Message, collect_messages},
    parsers::template::{ParsedTemplate, parse_template},
    path::{AssignOutcome, assign, resolve},
};

/// The accumulated message dictionary.
pub type Dictionary = Map<String, Value>;

/// How message ids address the dictionary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum KeyMode {
    /// Dotted ids are paths: `app.title` → `{ "app": { "title": .. } }`.
    #[default]
    Deep,
    /// Ids are opaque flat keys: `app.title` → `{ "app.title": .. }`.
    Shallow,
}

/// What a merge did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    /// Messages written into the dictionary.
    pub added: usize,
    /// Messages whose id was already taken.
    pub skipped: usize,
}

impl MergeStats {
    pub fn total(&self) -> usize {
        self.added + self.skipped
    }
}

impl std::ops::AddAssign for MergeStats {
    fn add_assign(&mut self, other: Self) {
        self.added += other.added;
        self.skipped += other.skipped;
    }
}

/// Merge one message. Returns `true` if it was written.
pub fn merge_message(message: &Message, dictionary: &mut Dictionary, mode: KeyMode) -> bool {
    let value = message.default_value();

    match mode {
        KeyMode::Shallow => {
            if dictionary.contains_key(&message.id) {
                return false;
            }
            dictionary.insert(message.id.clone(), value);
            true
        }
        KeyMode::Deep => {
            if resolve(dictionary, &message.id).is_some() {
                return false;
            }
            assign(dictionary, &message.id, value) == AssignOutcome::Written
        }
    }
}

/// Merge messages in order; earlier messages win over later ones.
pub fn merge_messages<'a, I>(messages: I, dictionary: &mut Dictionary, mode: KeyMode) -> MergeStats
where
    I: IntoIterator<Item = &'a Message>,
{
    let mut stats = MergeStats::default();
    for message in messages {
        if merge_message(message, dictionary, mode) {
            stats.added += 1;
        } else {
            stats.skipped += 1;
        }
    }
    stats
}

/// Extract every message of a parsed template into the dictionary.
///
/// Files that import nothing from the library contribute nothing. A malformed
/// `defineMessages` catalog is a fatal [`ExtractError`].
pub fn extract_messages(
    template: &ParsedTemplate,
    api: &LibraryApi,
    dictionary: &mut Dictionary,
    mode: KeyMode,
) -> Result<MergeStats, ExtractError> {
    let bindings = resolve_bindings(template, api);
    if bindings.is_empty() {
        return Ok(MergeStats::default());
    }

    let messages = collect_messages(template, &bindings)?;
    Ok(merge_messages(&messages, dictionary, mode))
}

/// Parse component source and extract its messages into the dictionary.
pub fn extract_source(
    code: &str,
    file_path: &str,
    api: &LibraryApi,
    dictionary: &mut Dictionary,
    mode: KeyMode,
) -> Result<MergeStats> {
    let template = parse_template(code.to_string(), file_path, Arc::new(SourceMap::default()))?;
    Ok(extract_messages(&template, api, dictionary, mode)?)
}
