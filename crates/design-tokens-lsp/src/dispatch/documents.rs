//! `textDocument/didOpen|didChange|didClose` (spec.md §4.5).
//!
//! Run inline on the read-loop thread, never on the worker pool: these
//! mutate the document store that every feature handler reads from.

use crate::server::Server;
use dt_protocol::JsonRpcRequest;

pub fn did_open(server: &Server, request: JsonRpcRequest) {
    let Some(params) = request.params else { return };
    let Ok(params) = serde_json::from_value::<lsp_types::DidOpenTextDocumentParams>(params) else { return };
    let doc = params.text_document;
    let uri = doc.uri.to_string();
    server.documents.open(uri.clone(), doc.language_id, doc.version, doc.text);
    server.publish_diagnostics(&uri);
}

pub fn did_change(server: &Server, request: JsonRpcRequest) {
    let Some(params) = request.params else { return };
    let Ok(params) = serde_json::from_value::<lsp_types::DidChangeTextDocumentParams>(params) else { return };
    let uri = params.text_document.uri.to_string();
    let version = params.text_document.version;

    server.documents.with_document_mut(&uri, |doc| {
        for change in params.content_changes {
            match change.range {
                Some(range) => doc.apply_change(to_dt_range(range), &change.text, version),
                None => doc.set_full_text(change.text, version),
            }
        }
    });

    server.publish_diagnostics(&uri);
}

pub fn did_close(server: &Server, request: JsonRpcRequest) {
    let Some(params) = request.params else { return };
    let Ok(params) = serde_json::from_value::<lsp_types::DidCloseTextDocumentParams>(params) else { return };
    server.documents.close(params.text_document.uri.as_str());
}

pub(super) fn to_dt_range(range: lsp_types::Range) -> dt_token::Range {
    dt_token::Range::new(
        dt_token::Position::new(range.start.line, range.start.character),
        dt_token::Position::new(range.end.line, range.end.character),
    )
}
