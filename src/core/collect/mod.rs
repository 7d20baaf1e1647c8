//! Phase 1: Collection - library bindings, formatting calls and catalogs.
//!
//! This module handles the first phase of the extraction pipeline:
//! - Resolving which local names alias the translation library's API
//! - Collecting formatting calls from the instance script and markup
//! - Collecting `defineMessages` catalog entries from both scripts
//!
//! The collected nodes are turned into message records in Phase 2 (Extraction).

pub mod bindings;
pub mod calls;

pub use bindings::{BindingSet, LibraryApi, resolve_bindings, store_subscription_target};
pub use calls::{collect_catalogs, collect_format_calls, collect_message_definitions};
