//! Shared server state (spec.md §4.9/§5), composed from the engine crates.
//!
//! `Server` owns everything a request handler needs: the document store,
//! the workspace (config + token graph snapshot), the CSS parser pool, and
//! the single output writer every response and notification funnels
//! through. It carries no protocol-dispatch logic itself — that lives in
//! [`crate::dispatch`].

use crate::dispatch::cancellation::CancellationRegistry;
use crate::state::StateMachine;
use dt_token::TokenGraph;
use dt_workspace::Workspace;
use parking_lot::{Mutex, RwLock};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::Arc;

/// The subset of `initialize`'s `ClientCapabilities` this server acts on.
#[derive(Debug, Clone, Default)]
pub struct ClientInfo {
    pub supports_watched_files_dynamic_registration: bool,
}

pub struct Server {
    pub state: StateMachine,
    pub documents: dt_document::DocumentStore,
    pub css_pool: dt_css::ParserPool,
    pub cancellation: CancellationRegistry,
    workspace: RwLock<Option<Workspace>>,
    client_info: RwLock<ClientInfo>,
    output: Arc<Mutex<Box<dyn Write + Send>>>,
    next_request_id: AtomicI64,
    pub shutdown_received: AtomicBool,
    pub trace_level: Mutex<String>,
}

impl Server {
    pub fn new(output: Box<dyn Write + Send>) -> Self {
        Self {
            state: StateMachine::new(),
            documents: dt_document::DocumentStore::new(),
            css_pool: dt_css::ParserPool::new(),
            cancellation: CancellationRegistry::new(),
            workspace: RwLock::new(None),
            client_info: RwLock::new(ClientInfo::default()),
            output: Arc::new(Mutex::new(output)),
            next_request_id: AtomicI64::new(1),
            shutdown_received: AtomicBool::new(false),
            trace_level: Mutex::new("off".to_string()),
        }
    }

    pub fn set_client_info(&self, info: ClientInfo) {
        *self.client_info.write() = info;
    }

    pub fn client_info(&self) -> ClientInfo {
        self.client_info.read().clone()
    }

    /// Establish the workspace root at `initialize` time and load whatever
    /// `designtokensrc.json` sits there (SPEC_FULL.md §4.6 supplement),
    /// before the first reload.
    pub fn init_workspace(&self, root: PathBuf) {
        let workspace = Workspace::new(root.clone());
        if let Some(rc) = crate::config_file::load(&root) {
            workspace.update_config(&rc);
        }
        *self.workspace.write() = Some(workspace);
    }

    pub fn workspace_root(&self) -> Option<PathBuf> {
        self.workspace.read().as_ref().map(|ws| ws.root().to_path_buf())
    }

    pub fn graph(&self) -> Arc<TokenGraph> {
        match self.workspace.read().as_ref() {
            Some(ws) => ws.graph(),
            None => Arc::new(TokenGraph::new()),
        }
    }

    pub fn update_config(&self, settings: &serde_json::Value) {
        if let Some(ws) = self.workspace.read().as_ref() {
            ws.update_config(settings);
        }
    }

    pub fn watch_patterns(&self) -> Vec<String> {
        match self.workspace.read().as_ref() {
            Some(ws) => ws.watch_patterns(),
            None => Vec::new(),
        }
    }

    /// Rebuild the token graph: open documents are served from the store
    /// (reflecting unsaved edits), everything else is read from disk.
    pub fn reload_workspace(&self) -> dt_workspace::ReloadReport {
        let guard = self.workspace.read();
        let Some(workspace) = guard.as_ref() else {
            return dt_workspace::ReloadReport { files_loaded: 0, tokens_loaded: 0, errors: Vec::new() };
        };
        let documents = &self.documents;
        workspace.reload(|path| {
            let uri = path_to_uri(path);
            if let Some(text) = documents.with_document(&uri, |doc| doc.text().to_string()) {
                return Ok(text);
            }
            std::fs::read_to_string(path)
        })
    }

    pub fn send_notification(&self, method: &str, params: serde_json::Value) {
        let mut output = self.output.lock();
        if let Err(err) = dt_transport::write_notification(&mut *output, method, params) {
            tracing::error!(method, error = %err, "failed to write notification");
        }
    }

    pub fn send_response(&self, response: dt_protocol::JsonRpcResponse) {
        let mut output = self.output.lock();
        if let Err(err) = dt_transport::write_message(&mut *output, &response) {
            tracing::error!(error = %err, "failed to write response");
        }
    }

    /// Issue a server-to-client request (e.g. `client/registerCapability`)
    /// and return the id it was sent with. Responses to these are not
    /// currently consumed; registration failures are logged and otherwise
    /// non-fatal (SPEC_FULL.md §4.6).
    pub fn send_request(&self, method: &str, params: serde_json::Value) -> i64 {
        let id = self.next_request_id.fetch_add(1, Ordering::Relaxed);
        let envelope = serde_json::json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });
        let mut output = self.output.lock();
        let content = serde_json::to_string(&envelope).unwrap_or_default();
        if let Err(err) = write!(output, "Content-Length: {}\r\n\r\n{}", content.len(), content).and_then(|_| output.flush()) {
            tracing::error!(method, error = %err, "failed to write server request");
        }
        id
    }

    /// Publish diagnostics for one open CSS document. No-op for non-CSS
    /// documents and for documents that are no longer open.
    pub fn publish_diagnostics(&self, uri: &str) {
        let Some(diagnostics) = self.documents.with_document(uri, |doc| {
            if doc.language_id != "css" {
                return None;
            }
            let text = doc.text().to_string();
            let parse = doc.get_or_parse({
                let pool = self.css_pool.clone();
                let text = text.clone();
                move || dt_css::analyze(&text, &pool)
            });
            let parse = parse.as_ref().as_ref()?;
            let line_index = dt_token::LineIndex::new(&text);
            let graph = self.graph();
            Some(dt_diagnostics::compute(&text, parse, &graph, &line_index))
        }) else {
            return;
        };
        let Some(diagnostics) = diagnostics else { return };

        self.send_notification(
            "textDocument/publishDiagnostics",
            serde_json::json!({ "uri": uri, "diagnostics": diagnostics }),
        );
    }

    /// Republish diagnostics for every currently open CSS document, used
    /// after a workspace-wide reload (spec.md §8 reload scenario).
    pub fn publish_diagnostics_for_all_open(&self) {
        for uri in self.documents.all_uris() {
            self.publish_diagnostics(&uri);
        }
    }
}

pub fn path_to_uri(path: &Path) -> String {
    url::Url::from_file_path(path).map(|url| url.to_string()).unwrap_or_else(|()| format!("file://{}", path.display()))
}
