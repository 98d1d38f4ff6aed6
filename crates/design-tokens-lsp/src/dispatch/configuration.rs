//! `workspace/didChangeConfiguration` and `workspace/didChangeWatchedFiles`
//! (spec.md §4.6/§8 reload scenario).
//!
//! Both notifications end the same way: the token graph may now be stale,
//! so reload it and republish diagnostics for whatever is open. Neither
//! tries to figure out exactly which files changed — a full reload is
//! cheap enough (spec.md §4.8) that precise invalidation isn't worth the
//! bookkeeping.

use crate::server::Server;
use dt_protocol::JsonRpcRequest;
use serde_json::Value;

pub fn did_change_configuration(server: &Server, request: JsonRpcRequest) {
    let settings = request.params.as_ref().and_then(|p| p.get("settings")).cloned().unwrap_or(Value::Null);
    server.update_config(&settings);
    server.reload_workspace();
    server.publish_diagnostics_for_all_open();
}

pub fn did_change_watched_files(server: &Server, _request: JsonRpcRequest) {
    server.reload_workspace();
    server.publish_diagnostics_for_all_open();
}
