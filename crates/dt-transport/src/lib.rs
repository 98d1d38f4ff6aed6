//! LSP transport layer for design-tokens-lsp: Content-Length message framing
//! over stdio, per the LSP Base Protocol.
//!
//! Never write to stdout outside this module — the `write_message` /
//! `write_notification` functions here are the only things allowed to touch
//! the wire. Logging goes through `tracing` to a separate sink.

#![deny(unsafe_code)]

mod framing;

pub use framing::{read_message, write_message, write_notification};
