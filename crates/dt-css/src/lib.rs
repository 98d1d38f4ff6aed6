//! CSS `var()` call analysis (spec.md §4.3).
//!
//! Parsing is tree-sitter-backed so the extraction survives malformed or
//! partially-typed stylesheets the way a hand-rolled regex scanner would
//! not; pooling amortizes parser setup across the many small re-parses a
//! document store triggers while a user is actively editing.

#![deny(unsafe_code)]

pub mod analysis;
pub mod pool;

pub use analysis::{analyze, node_at_byte_offset, ParseResult, VarCall};
pub use pool::ParserPool;
