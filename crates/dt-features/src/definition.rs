//! `textDocument/definition` (spec.md §4.7 "Definition").

use dt_css::ParseResult;
use dt_dtcg::ir::RawObject;
use dt_token::{LineIndex, Position, TokenGraph};
use lsp_types::Location;

/// From a CSS `var(--name)` call, the defining location of `--name` in its
/// source token file (which may be a different file from the CSS document).
pub fn definition_css(text: &str, line_index: &LineIndex, parse: &ParseResult, graph: &TokenGraph, position: Position) -> Option<Location> {
    let offset = line_index.byte_offset(text, position);
    let call = parse.var_calls.iter().find(|c| c.name_range.start <= offset && offset < c.name_range.end)?;
    let token = graph.get(&call.token_name)?;
    crate::location(&token.definition_uri, token.definition_range)
}

/// From a `{dot.path}` reference literal inside a JSON/YAML token file, the
/// defining location of the referenced token (may be in another file).
pub fn definition_token_file(text: &str, line_index: &LineIndex, root: &RawObject, graph: &TokenGraph, position: Position) -> Option<Location> {
    let occurrence = dt_structural::reference_at_position(root, text, line_index, position)?;
    let token = graph.get_by_path(&occurrence.dot_path)?;
    crate::location(&token.definition_uri, token.definition_range)
}
