//! Request routing and lifecycle gating (spec.md §4.9).
//!
//! Lifecycle requests and every mutating notification
//! (`textDocument/didOpen|didChange|didClose`,
//! `workspace/didChangeConfiguration`, `workspace/didChangeWatchedFiles`)
//! run synchronously on the read-loop thread, which is what gives the
//! "single writer lane" spec.md §5 asks for: there is only ever one thread
//! touching the document store and the workspace's config/graph write side
//! at a time. Read-only feature requests are hard to get wrong this way,
//! so they are handed to the worker pool instead.

pub mod cancellation;
mod configuration;
mod documents;
mod features;
mod lifecycle;

use crate::server::Server;
use crate::state::LifecycleState;
use crate::workers::WorkerPool;
use dt_protocol::{JsonRpcRequest, JsonRpcResponse};
use std::sync::Arc;

/// Whether the read loop should keep going after handling one message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Stop,
}

pub fn route(server: &Arc<Server>, workers: &WorkerPool, request: JsonRpcRequest) -> Control {
    if request.method == "$/cancelRequest" {
        handle_cancel_request(server, request);
        return Control::Continue;
    }

    if !server.state.permits(&request.method) {
        reject_unpermitted(server, request);
        return Control::Continue;
    }

    match request.method.as_str() {
        "initialize" => {
            lifecycle::handle_initialize(server, request);
            Control::Continue
        }
        "initialized" => {
            lifecycle::handle_initialized(server, request);
            Control::Continue
        }
        "shutdown" => {
            lifecycle::handle_shutdown(server, request);
            Control::Continue
        }
        "exit" => lifecycle::handle_exit(server),
        "$/setTrace" => {
            lifecycle::handle_set_trace(server, request);
            Control::Continue
        }

        "textDocument/didOpen" => {
            documents::did_open(server, request);
            Control::Continue
        }
        "textDocument/didChange" => {
            documents::did_change(server, request);
            Control::Continue
        }
        "textDocument/didClose" => {
            documents::did_close(server, request);
            Control::Continue
        }
        "workspace/didChangeConfiguration" => {
            configuration::did_change_configuration(server, request);
            Control::Continue
        }
        "workspace/didChangeWatchedFiles" => {
            configuration::did_change_watched_files(server, request);
            Control::Continue
        }

        "textDocument/hover"
        | "textDocument/completion"
        | "completionItem/resolve"
        | "textDocument/definition"
        | "textDocument/references"
        | "textDocument/codeAction"
        | "codeAction/resolve"
        | "textDocument/documentColor"
        | "textDocument/colorPresentation"
        | "textDocument/semanticTokens/full"
        | "textDocument/diagnostic" => {
            dispatch_to_worker(server, workers, request);
            Control::Continue
        }

        other => {
            if let Some(id) = request.id {
                server.send_response(JsonRpcResponse::error(
                    Some(id),
                    dt_protocol::JsonRpcError::new(dt_protocol::METHOD_NOT_FOUND, format!("method not found: {other}")),
                ));
            }
            Control::Continue
        }
    }
}

fn handle_cancel_request(server: &Server, request: JsonRpcRequest) {
    if let Some(target_id) = request.params.as_ref().and_then(|p| p.get("id")) {
        server.cancellation.cancel(target_id);
    }
}

fn reject_unpermitted(server: &Server, request: JsonRpcRequest) {
    let Some(id) = request.id else { return };
    let reason = match server.state.current() {
        LifecycleState::Created => format!("server is not initialized: {}", request.method),
        LifecycleState::Exited => format!("server has exited: {}", request.method),
        _ => format!("method not permitted in the current state: {}", request.method),
    };
    server.send_response(JsonRpcResponse::error(Some(id), dt_protocol::invalid_request(&reason)));
}

/// Register a cancellation token and hand the request to the worker pool.
/// Every method routed here is a request (carries an `id`); none of them
/// are advertised as notifications in the server's capabilities.
fn dispatch_to_worker(server: &Arc<Server>, workers: &WorkerPool, request: JsonRpcRequest) {
    let Some(id) = request.id.clone() else { return };
    let token = server.cancellation.register(&id);
    let server = Arc::clone(server);

    workers.submit(Box::new(move || {
        let response = if token.is_cancelled() {
            JsonRpcResponse::error(Some(id.clone()), dt_protocol::request_cancelled(&request.method))
        } else {
            features::handle(&server, &request, &token)
        };
        server.cancellation.remove(&id);
        server.send_response(response);
    }));
}
