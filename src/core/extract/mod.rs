//! Phase 2: Extraction - literal evaluation and message records.
//!
//! Collected calls and catalog entries are evaluated statically: only literal
//! values are read, and anything without a literal string id is dropped.
//! The records produced here are merged into the dictionary in Phase 3
//! (see `crate::core::accumulate`).

pub mod literal;
pub mod message;

pub use literal::evaluate_object;
pub use message::{CallShape, Message, collect_messages};
