//! JSON-RPC/LSP protocol types and capability configuration for
//! design-tokens-lsp.
//!
//! This crate owns only wire-format concerns: request/response envelopes,
//! standard error codes, and the `initialize` capability payload. It has no
//! knowledge of tokens, documents, or diagnostics.

#![deny(unsafe_code)]

pub mod capabilities;
pub mod errors;
pub mod jsonrpc;

pub use errors::*;
pub use jsonrpc::{JsonRpcError, JsonRpcRequest, JsonRpcResponse};
