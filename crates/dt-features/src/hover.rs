//! `textDocument/hover` (spec.md §4.7 "Hover").

use dt_css::ParseResult;
use dt_dtcg::ir::RawObject;
use dt_token::{LineIndex, Position, TokenGraph};
use lsp_types::{Hover, HoverContents, MarkupContent, MarkupKind};

/// Hover over a CSS `var(--name)` call: the whole call's name argument must
/// contain `position` (spec.md: "CSS: the `--name` identifier").
pub fn hover_css(text: &str, line_index: &LineIndex, parse: &ParseResult, graph: &TokenGraph, position: Position) -> Option<Hover> {
    let offset = line_index.byte_offset(text, position);
    let call = parse.var_calls.iter().find(|c| c.name_range.start <= offset && offset < c.name_range.end)?;
    let token = graph.get(&call.token_name)?;

    Some(Hover {
        contents: HoverContents::Markup(MarkupContent {
            kind: MarkupKind::Markdown,
            value: crate::markdown::render(token, graph),
        }),
        range: Some(crate::to_lsp_range(line_index.range(text, call.name_range))),
    })
}

/// Hover over a `{dot.path}` reference literal inside a JSON/YAML token file.
pub fn hover_token_file(text: &str, line_index: &LineIndex, root: &RawObject, graph: &TokenGraph, position: Position) -> Option<Hover> {
    let occurrence = dt_structural::reference_at_position(root, text, line_index, position)?;
    let token = graph.get_by_path(&occurrence.dot_path)?;

    Some(Hover {
        contents: HoverContents::Markup(MarkupContent {
            kind: MarkupKind::Markdown,
            value: crate::markdown::render(token, graph),
        }),
        range: Some(crate::to_lsp_range(line_index.range(text, occurrence.range))),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use dt_token::{Deprecation, Range, Token, TokenType};

    fn token() -> Token {
        Token {
            dot_path: "color.red".to_string(),
            css_name: "--color-red".to_string(),
            raw_value: "#ff0000".to_string(),
            token_type: TokenType::Color,
            description: None,
            deprecated: Deprecation::default(),
            extensions: None,
            references: vec![],
            definition_uri: "file:///tokens.json".to_string(),
            definition_range: Range::new(Position::new(0, 0), Position::new(0, 1)),
            source_prefix: None,
            source_group_markers: vec![],
            cyclic: false,
        }
    }

    #[test]
    fn hovers_a_css_var_call_name() {
        let mut graph = TokenGraph::new();
        graph.add(token()).unwrap();
        let pool = dt_css::ParserPool::new();
        let source = "a { color: var(--color-red); }";
        let parse = dt_css::analyze(source, &pool).unwrap();
        let line_index = LineIndex::new(source);

        let offset = source.find("--color-red").unwrap();
        let position = line_index.position(source, offset);
        let hover = hover_css(source, &line_index, &parse, &graph, position).unwrap();
        match hover.contents {
            HoverContents::Markup(markup) => assert!(markup.value.contains("--color-red")),
            _ => unreachable!(),
        }
    }

    #[test]
    fn no_hover_outside_any_var_call() {
        let graph = TokenGraph::new();
        let pool = dt_css::ParserPool::new();
        let source = "a { color: red; }";
        let parse = dt_css::analyze(source, &pool).unwrap();
        let line_index = LineIndex::new(source);
        assert!(hover_css(source, &line_index, &parse, &graph, Position::new(0, 2)).is_none());
    }

    #[test]
    fn hovers_a_reference_literal_in_a_token_file() {
        let mut graph = TokenGraph::new();
        graph.add(token()).unwrap();
        let text = r#"{"color": {"alias": {"$value": "{color.red}"}}}"#;
        let root = dt_dtcg::json::parse_to_raw(text, "file:///t.json").unwrap();
        let line_index = LineIndex::new(text);
        let offset = text.find("color.red").unwrap();
        let position = line_index.position(text, offset);

        let hover = hover_token_file(text, &line_index, &root, &graph, position).unwrap();
        match hover.contents {
            HoverContents::Markup(markup) => assert!(markup.value.contains("--color-red")),
            _ => unreachable!(),
        }
    }
}
