//! Standard JSON-RPC / LSP error codes (§7 of the spec).

/// Method not found (unknown `method` in a request).
pub const METHOD_NOT_FOUND: i32 = -32601;
/// Malformed or out-of-range parameters.
pub const INVALID_PARAMS: i32 = -32602;
/// Request made outside a permitted lifecycle state.
pub const INVALID_REQUEST: i32 = -32600;
/// Unexpected internal error; the server remains alive.
pub const INTERNAL_ERROR: i32 = -32603;
/// JSON could not be parsed.
pub const PARSE_ERROR: i32 = -32700;
/// LSP: the request was cancelled via `$/cancelRequest`.
pub const REQUEST_CANCELLED: i32 = -32800;
/// LSP: content was modified concurrently with the request.
pub const CONTENT_MODIFIED: i32 = -32801;
/// LSP: the server itself cancelled the request (overload, shutdown).
pub const SERVER_CANCELLED: i32 = -32802;

use crate::jsonrpc::JsonRpcError;

/// Build a `RequestCancelled` error for a given method (used in logs/messages).
pub fn request_cancelled(method: &str) -> JsonRpcError {
    JsonRpcError::new(REQUEST_CANCELLED, format!("Request cancelled: {method}"))
}

/// Build an `InvalidRequest` error for a request made outside the permitted
/// lifecycle state (before `initialize`, or after `shutdown`).
pub fn invalid_request(reason: &str) -> JsonRpcError {
    JsonRpcError::new(INVALID_REQUEST, reason.to_string())
}

/// Build an `InternalError` wrapping an unexpected failure. The message is
/// intentionally generic; details belong in the log sink, not the wire
/// response.
pub fn internal_error(context: &str) -> JsonRpcError {
    JsonRpcError::new(INTERNAL_ERROR, format!("Internal error while handling {context}"))
}
