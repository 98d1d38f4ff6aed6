//! Token model and reference graph for DTCG design tokens.
//!
//! This crate has no knowledge of CSS, JSON, or YAML syntax — it is the
//! shared vocabulary (`Token`, `TokenGraph`, `Range`) that the parsers,
//! analyzers, and feature handlers all build on.

#![deny(unsafe_code)]

pub mod deprecation;
pub mod graph;
pub mod line_index;
pub mod naming;
pub mod range;
pub mod reference;
pub mod token;

pub use graph::{GraphError, TokenGraph, MAX_RESOLUTION_DEPTH};
pub use line_index::LineIndex;
pub use range::{ByteRange, Position, Range};
pub use token::{Deprecation, ReferenceLiteral, Token, TokenType};
