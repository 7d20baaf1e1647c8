//! Component file parsers.
//!
//! - `template`: splits a component into scripts and markup expressions and
//!   parses each part with swc.

pub mod template;
