//! `initialize`/`initialized`/`shutdown`/`exit`/`$/setTrace` (spec.md §4.9
//! "State machine", §6 "Wire protocol").

use crate::dispatch::Control;
use crate::server::{ClientInfo, Server};
use crate::state::LifecycleState;
use dt_protocol::{JsonRpcRequest, JsonRpcResponse};
use lsp_types::{InitializeParams, InitializeResult, ServerInfo};
use std::path::PathBuf;
use std::sync::Arc;

pub fn handle_initialize(server: &Arc<Server>, request: JsonRpcRequest) {
    server.state.transition_to(LifecycleState::Initializing);

    let params: InitializeParams = request
        .params
        .clone()
        .and_then(|p| serde_json::from_value(p).ok())
        .unwrap_or_else(|| InitializeParams { ..Default::default() });

    let root = root_from_params(&params).unwrap_or_else(|| std::env::current_dir().unwrap_or_default());
    server.init_workspace(root);

    let dynamic_watch = params
        .capabilities
        .workspace
        .as_ref()
        .and_then(|ws| ws.did_change_watched_files.as_ref())
        .and_then(|w| w.dynamic_registration)
        .unwrap_or(false);
    server.set_client_info(ClientInfo { supports_watched_files_dynamic_registration: dynamic_watch });

    server.reload_workspace();

    let Some(id) = request.id else { return };
    let result = InitializeResult {
        capabilities: dt_protocol::capabilities::server_capabilities(),
        server_info: Some(ServerInfo { name: "design-tokens-lsp".to_string(), version: Some(env!("CARGO_PKG_VERSION").to_string()) }),
    };
    let response = match serde_json::to_value(result) {
        Ok(value) => JsonRpcResponse::success(Some(id), value),
        Err(err) => JsonRpcResponse::error(Some(id), dt_protocol::internal_error(&err.to_string())),
    };
    server.send_response(response);
}

fn root_from_params(params: &InitializeParams) -> Option<PathBuf> {
    if let Some(folders) = &params.workspace_folders {
        if let Some(folder) = folders.first() {
            if let Ok(path) = folder.uri.to_file_path() {
                return Some(path);
            }
        }
    }
    #[allow(deprecated)]
    params.root_uri.as_ref().and_then(|uri| uri.to_file_path().ok())
}

/// `initialized`: register the file-watcher capability (spec.md §4.6
/// "File watcher registration"; failures are logged and non-fatal), then
/// transition `Initializing -> Ready` and publish diagnostics for whatever
/// got opened before `initialize` finished.
pub fn handle_initialized(server: &Arc<Server>, _request: JsonRpcRequest) {
    server.state.transition_to(LifecycleState::Ready);

    if server.client_info().supports_watched_files_dynamic_registration {
        register_file_watchers(server);
    }

    server.publish_diagnostics_for_all_open();
}

fn register_file_watchers(server: &Server) {
    let watchers: Vec<lsp_types::FileSystemWatcher> = server
        .watch_patterns()
        .into_iter()
        .map(|pattern| lsp_types::FileSystemWatcher {
            glob_pattern: lsp_types::GlobPattern::String(pattern),
            kind: None,
        })
        .collect();

    if watchers.is_empty() {
        return;
    }

    let options = lsp_types::DidChangeWatchedFilesRegistrationOptions { watchers };
    let Ok(register_options) = serde_json::to_value(options) else { return };
    let registration = lsp_types::Registration {
        id: "design-tokens-lsp-watched-files".to_string(),
        method: "workspace/didChangeWatchedFiles".to_string(),
        register_options: Some(register_options),
    };
    let params = lsp_types::RegistrationParams { registrations: vec![registration] };
    let Ok(params) = serde_json::to_value(params) else { return };
    server.send_request("client/registerCapability", params);
}

pub fn handle_shutdown(server: &Server, request: JsonRpcRequest) {
    server.state.transition_to(LifecycleState::ShuttingDown);
    server.shutdown_received.store(true, std::sync::atomic::Ordering::Relaxed);
    if let Some(id) = request.id {
        server.send_response(JsonRpcResponse::success(Some(id), serde_json::Value::Null));
    }
}

pub fn handle_exit(server: &Server) -> Control {
    server.state.transition_to(LifecycleState::Exited);
    Control::Stop
}

pub fn handle_set_trace(server: &Server, request: JsonRpcRequest) {
    let Some(params) = request.params else { return };
    let level = params.get("value").and_then(|v| v.as_str()).unwrap_or("off");
    let level = match level {
        "off" | "messages" | "verbose" => level,
        _ => "off",
    };
    *server.trace_level.lock() = level.to_string();
}
