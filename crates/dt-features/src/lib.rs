//! Thin orchestration layer over the token graph and per-document syntactic
//! models: hover, completion, definition, references, code actions,
//! document color, and semantic tokens (spec.md §4.7).
//!
//! Every handler here is read-only against its inputs and returns
//! `None`/empty on a miss rather than erroring — spec.md §7 "Lookup misses:
//! return null/empty results." Handlers take plain borrowed data
//! (`&TokenGraph`, `&str`, parsed IR) rather than a `Server`/`Workspace`
//! handle, so they stay testable without spinning up the dispatcher.

#![deny(unsafe_code)]

pub mod code_actions;
pub mod color;
pub mod completion;
pub mod definition;
pub mod hover;
pub mod markdown;
pub mod references;
pub mod semantic_tokens;

/// One already-open document, as the feature handlers that scan across the
/// whole open set (references, workspace-wide color) need it. Intentionally
/// not `dt_document::Document` itself: these handlers only ever need the
/// three fields below, and depending on the document-store type directly
/// would pull transport-adjacent concerns into this crate for no benefit.
#[derive(Debug, Clone, Copy)]
pub struct OpenDocument<'a> {
    pub uri: &'a str,
    pub language_id: &'a str,
    pub text: &'a str,
}

pub(crate) fn is_css(language_id: &str) -> bool {
    language_id == "css"
}

pub(crate) fn is_json(language_id: &str) -> bool {
    matches!(language_id, "json" | "jsonc")
}

pub(crate) fn is_yaml(language_id: &str) -> bool {
    matches!(language_id, "yaml")
}

/// Parse an open document's text into a token-file syntax tree, dispatching
/// on language id. The dispatcher needs this directly (hover, definition,
/// semantic tokens, and reference-target lookup all start from an open
/// document rather than a parsed artifact), so unlike `is_css`/`is_json`/
/// `is_yaml` above this one crosses the crate boundary.
pub fn parse_token_file(language_id: &str, text: &str, uri: &str) -> Option<dt_dtcg::ir::RawObject> {
    if is_json(language_id) {
        dt_dtcg::json::parse_to_raw(text, uri).ok()
    } else if is_yaml(language_id) {
        dt_dtcg::yaml::parse_to_raw(text, uri).ok()
    } else {
        None
    }
}

pub(crate) fn to_lsp_range(r: dt_token::Range) -> lsp_types::Range {
    lsp_types::Range::new(
        lsp_types::Position::new(r.start.line, r.start.character),
        lsp_types::Position::new(r.end.line, r.end.character),
    )
}

pub(crate) fn from_lsp_position(p: lsp_types::Position) -> dt_token::Position {
    dt_token::Position::new(p.line, p.character)
}

pub(crate) fn location(uri: &str, range: dt_token::Range) -> Option<lsp_types::Location> {
    let url = url::Url::parse(uri).ok()?;
    Some(lsp_types::Location::new(url, to_lsp_range(range)))
}
