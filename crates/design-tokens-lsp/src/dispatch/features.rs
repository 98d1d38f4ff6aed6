//! Read-only feature requests (spec.md §4.7), run on the worker pool.
//!
//! Every handler here borrows a `TokenGraph` snapshot and the requesting
//! document's text, computes a result, and returns a `JsonRpcResponse`.
//! None of them touch the document store or workspace mutably — that
//! split is what lets spec.md §5 promise readers never block writers.

use crate::dispatch::cancellation::CancellationToken;
use crate::server::Server;
use dt_document::Document;
use dt_protocol::{JsonRpcRequest, JsonRpcResponse};
use dt_token::{LineIndex, TokenGraph};
use serde_json::Value;

pub fn handle(server: &Server, request: &JsonRpcRequest, token: &CancellationToken) -> JsonRpcResponse {
    let id = request.id.clone();
    match dispatch_one(server, request, token) {
        Ok(value) => JsonRpcResponse::success(id, value),
        Err(err) => JsonRpcResponse::error(id, err),
    }
}

fn dispatch_one(server: &Server, request: &JsonRpcRequest, token: &CancellationToken) -> Result<Value, dt_protocol::JsonRpcError> {
    if token.is_cancelled() {
        return Err(dt_protocol::request_cancelled(&request.method));
    }

    let params = request.params.clone().unwrap_or(Value::Null);

    match request.method.as_str() {
        "textDocument/hover" => hover(server, params),
        "textDocument/completion" => completion(server, params),
        "completionItem/resolve" => completion_resolve(server, params),
        "textDocument/definition" => definition(server, params),
        "textDocument/references" => references(server, params),
        "textDocument/codeAction" => code_action(server, params),
        "codeAction/resolve" => code_action_resolve(params),
        "textDocument/documentColor" => document_color(server, params),
        "textDocument/colorPresentation" => color_presentation(server, params),
        "textDocument/semanticTokens/full" => semantic_tokens(server, params),
        "textDocument/diagnostic" => pull_diagnostic(server, params),
        other => Err(dt_protocol::JsonRpcError::new(dt_protocol::METHOD_NOT_FOUND, format!("method not found: {other}"))),
    }
}

fn internal(context: &str) -> dt_protocol::JsonRpcError {
    dt_protocol::internal_error(context)
}

fn doc_uri(params: &Value) -> Option<String> {
    params.get("textDocument")?.get("uri")?.as_str().map(str::to_string)
}

fn lsp_position(params: &Value) -> Option<dt_token::Position> {
    let position: lsp_types::Position = serde_json::from_value(params.get("position")?.clone()).ok()?;
    Some(dt_token::Position::new(position.line, position.character))
}

fn to_dt_range(range: lsp_types::Range) -> dt_token::Range {
    crate::dispatch::documents::to_dt_range(range)
}

fn css_parse(server: &Server, doc: &Document) -> std::sync::Arc<Option<dt_css::ParseResult>> {
    let text = doc.text().to_string();
    let pool = server.css_pool.clone();
    doc.get_or_parse(move || dt_css::analyze(&text, &pool))
}

fn hover(server: &Server, params: Value) -> Result<Value, dt_protocol::JsonRpcError> {
    let uri = doc_uri(&params).ok_or_else(|| internal("textDocument/hover"))?;
    let position = lsp_position(&params).ok_or_else(|| internal("textDocument/hover"))?;
    let graph = server.graph();

    let hover = server.documents.with_document(&uri, |doc| {
        let text = doc.text();
        let line_index = LineIndex::new(text);

        if doc.language_id == "css" {
            let parse = css_parse(server, doc);
            let parse = parse.as_ref().as_ref()?;
            dt_features::hover::hover_css(text, &line_index, parse, &graph, position)
        } else {
            let root = dt_features::parse_token_file(&doc.language_id, text, &doc.uri)?;
            dt_features::hover::hover_token_file(text, &line_index, &root, &graph, position)
        }
    });

    serde_json::to_value(hover.flatten()).map_err(|_| internal("textDocument/hover"))
}

fn completion(server: &Server, params: Value) -> Result<Value, dt_protocol::JsonRpcError> {
    let uri = doc_uri(&params).ok_or_else(|| internal("textDocument/completion"))?;
    let position = lsp_position(&params).ok_or_else(|| internal("textDocument/completion"))?;
    let graph = server.graph();

    let items = server
        .documents
        .with_document(&uri, |doc| {
            if doc.language_id != "css" {
                return Vec::new();
            }
            let text = doc.text();
            let line_index = LineIndex::new(text);
            let offset = line_index.byte_offset(text, position);
            dt_features::completion::complete(text, offset, &graph)
        })
        .unwrap_or_default();

    serde_json::to_value(items).map_err(|_| internal("textDocument/completion"))
}

fn completion_resolve(server: &Server, params: Value) -> Result<Value, dt_protocol::JsonRpcError> {
    let item: lsp_types::CompletionItem = serde_json::from_value(params).map_err(|_| internal("completionItem/resolve"))?;
    let resolved = dt_features::completion::resolve(item, &server.graph());
    serde_json::to_value(resolved).map_err(|_| internal("completionItem/resolve"))
}

fn definition(server: &Server, params: Value) -> Result<Value, dt_protocol::JsonRpcError> {
    let uri = doc_uri(&params).ok_or_else(|| internal("textDocument/definition"))?;
    let position = lsp_position(&params).ok_or_else(|| internal("textDocument/definition"))?;
    let graph = server.graph();

    let location = server.documents.with_document(&uri, |doc| {
        let text = doc.text();
        let line_index = LineIndex::new(text);

        if doc.language_id == "css" {
            let parse = css_parse(server, doc);
            let parse = parse.as_ref().as_ref()?;
            dt_features::definition::definition_css(text, &line_index, parse, &graph, position)
        } else {
            let root = dt_features::parse_token_file(&doc.language_id, text, &doc.uri)?;
            dt_features::definition::definition_token_file(text, &line_index, &root, &graph, position)
        }
    });

    serde_json::to_value(location.flatten()).map_err(|_| internal("textDocument/definition"))
}

/// The token under the cursor, named by its CSS variable name regardless of
/// which syntactic surface (CSS call site or token-file reference literal)
/// the request originated from, so `references` can scan every open
/// document uniformly.
fn target_css_name(server: &Server, doc: &Document, graph: &TokenGraph, position: dt_token::Position) -> Option<String> {
    let text = doc.text();
    let line_index = LineIndex::new(text);

    if doc.language_id == "css" {
        let parse = css_parse(server, doc);
        let offset = line_index.byte_offset(text, position);
        parse
            .as_ref()
            .as_ref()?
            .var_calls
            .iter()
            .find(|c| c.name_range.start <= offset && offset < c.name_range.end)
            .map(|c| c.token_name.clone())
    } else {
        let root = dt_features::parse_token_file(&doc.language_id, text, &doc.uri)?;
        let occurrence = dt_structural::reference_at_position(&root, text, &line_index, position)?;
        Some(graph.get_by_path(&occurrence.dot_path).map(|t| t.css_name.clone()).unwrap_or(occurrence.dot_path))
    }
}

fn references(server: &Server, params: Value) -> Result<Value, dt_protocol::JsonRpcError> {
    let uri = doc_uri(&params).ok_or_else(|| internal("textDocument/references"))?;
    let position = lsp_position(&params).ok_or_else(|| internal("textDocument/references"))?;
    let include_declaration = params.get("context").and_then(|c| c.get("includeDeclaration")).and_then(Value::as_bool).unwrap_or(false);
    let graph = server.graph();

    let target = server.documents.with_document(&uri, |doc| target_css_name(server, doc, &graph, position)).flatten();

    let Some(css_name) = target else {
        return serde_json::to_value(Vec::<lsp_types::Location>::new()).map_err(|_| internal("textDocument/references"));
    };

    let owned: Vec<(String, String, String)> = server
        .documents
        .all_uris()
        .into_iter()
        .filter_map(|uri| server.documents.with_document(&uri, |doc| (doc.uri.clone(), doc.language_id.clone(), doc.text().to_string())))
        .collect();
    let open_documents: Vec<dt_features::OpenDocument> =
        owned.iter().map(|(uri, language_id, text)| dt_features::OpenDocument { uri, language_id, text }).collect();

    let locations = dt_features::references::find_references_by_css_name(&css_name, &open_documents, &graph, include_declaration);
    serde_json::to_value(locations).map_err(|_| internal("textDocument/references"))
}

fn code_action(server: &Server, params: Value) -> Result<Value, dt_protocol::JsonRpcError> {
    let uri = doc_uri(&params).ok_or_else(|| internal("textDocument/codeAction"))?;
    let range: lsp_types::Range = serde_json::from_value(params.get("range").cloned().unwrap_or(Value::Null)).map_err(|_| internal("textDocument/codeAction"))?;
    let diagnostics: Vec<lsp_types::Diagnostic> = params
        .get("context")
        .and_then(|c| c.get("diagnostics"))
        .cloned()
        .and_then(|v| serde_json::from_value(v).ok())
        .unwrap_or_default();
    let graph = server.graph();
    let dt_range = to_dt_range(range);

    let actions = server
        .documents
        .with_document(&uri, |doc| {
            if doc.language_id != "css" {
                return Vec::new();
            }
            let text = doc.text();
            let parse = css_parse(server, doc);
            let Some(parse) = parse.as_ref().as_ref() else { return Vec::new() };
            let line_index = LineIndex::new(text);
            let byte_range = dt_token::ByteRange::new(line_index.byte_offset(text, dt_range.start), line_index.byte_offset(text, dt_range.end));
            dt_features::code_actions::code_actions(&uri, text, &line_index, parse, &graph, byte_range, &diagnostics)
        })
        .unwrap_or_default();

    serde_json::to_value(actions).map_err(|_| internal("textDocument/codeAction"))
}

fn code_action_resolve(params: Value) -> Result<Value, dt_protocol::JsonRpcError> {
    let action: lsp_types::CodeAction = serde_json::from_value(params).map_err(|_| internal("codeAction/resolve"))?;
    let resolved = dt_features::code_actions::resolve(action);
    serde_json::to_value(resolved).map_err(|_| internal("codeAction/resolve"))
}

fn document_color(server: &Server, params: Value) -> Result<Value, dt_protocol::JsonRpcError> {
    let uri = doc_uri(&params).ok_or_else(|| internal("textDocument/documentColor"))?;
    let graph = server.graph();

    let colors = server
        .documents
        .with_document(&uri, |doc| {
            if doc.language_id != "css" {
                return Vec::new();
            }
            let text = doc.text();
            let parse = css_parse(server, doc);
            let Some(parse) = parse.as_ref().as_ref() else { return Vec::new() };
            let line_index = LineIndex::new(text);
            dt_features::color::document_color(text, &line_index, parse, &graph)
        })
        .unwrap_or_default();

    serde_json::to_value(colors).map_err(|_| internal("textDocument/documentColor"))
}

fn color_presentation(server: &Server, params: Value) -> Result<Value, dt_protocol::JsonRpcError> {
    let color: lsp_types::Color = serde_json::from_value(params.get("color").cloned().unwrap_or(Value::Null)).map_err(|_| internal("textDocument/colorPresentation"))?;
    let presentations = dt_features::color::color_presentation(color, &server.graph());
    serde_json::to_value(presentations).map_err(|_| internal("textDocument/colorPresentation"))
}

fn semantic_tokens(server: &Server, params: Value) -> Result<Value, dt_protocol::JsonRpcError> {
    let uri = doc_uri(&params).ok_or_else(|| internal("textDocument/semanticTokens/full"))?;
    let graph = server.graph();

    let tokens = server.documents.with_document(&uri, |doc| {
        if !matches!(doc.language_id.as_str(), "json" | "jsonc" | "yaml") {
            return None;
        }
        let text = doc.text();
        let root = dt_features::parse_token_file(&doc.language_id, text, &doc.uri)?;
        let line_index = LineIndex::new(text);
        Some(dt_features::semantic_tokens::semantic_tokens(text, &root, &graph, &line_index))
    });

    serde_json::to_value(tokens.flatten()).map_err(|_| internal("textDocument/semanticTokens/full"))
}

fn pull_diagnostic(server: &Server, params: Value) -> Result<Value, dt_protocol::JsonRpcError> {
    let uri = doc_uri(&params).ok_or_else(|| internal("textDocument/diagnostic"))?;
    let graph = server.graph();

    let diagnostics = server
        .documents
        .with_document(&uri, |doc| {
            if doc.language_id != "css" {
                return Vec::new();
            }
            let text = doc.text();
            let parse = css_parse(server, doc);
            let Some(parse) = parse.as_ref().as_ref() else { return Vec::new() };
            let line_index = LineIndex::new(text);
            dt_diagnostics::compute(text, parse, &graph, &line_index)
        })
        .unwrap_or_default();

    serde_json::to_value(serde_json::json!({ "kind": "full", "items": diagnostics })).map_err(|_| internal("textDocument/diagnostic"))
}
