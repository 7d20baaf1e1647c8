//! Typed errors of the extraction core.

use thiserror::Error;

/// Fatal structural errors raised while extracting messages from one file.
///
/// These abort the whole batch; soft misses (calls without a usable id) never
/// surface as errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    /// A `defineMessages` catalog entry that is not a plain `key: value` property.
    #[error("Found invalid '{kind}' at L{line}:{col}")]
    InvalidCatalogEntry {
        /// Node kind of the offending entry (e.g. `SpreadElement`).
        kind: &'static str,
        /// 1-based line.
        line: usize,
        /// 0-based column.
        col: usize,
    },
}
