//! `textDocument/completion` and `completionItem/resolve` (spec.md §4.7).

use dt_token::TokenGraph;
use lsp_types::{CompletionItem, CompletionItemKind, Documentation, InsertTextFormat, MarkupContent, MarkupKind};

/// The word under the cursor, hyphens ignored, used as the fuzzy-match
/// query. Walks outward from `offset` while the character is alphanumeric
/// or `-`, since a CSS custom-property name is exactly that alphabet.
fn word_at_offset(source: &str, offset: usize) -> String {
    let bytes = source.as_bytes();
    let is_word_byte = |b: u8| b.is_ascii_alphanumeric() || b == b'-' || b == b'_';

    let mut start = offset.min(bytes.len());
    while start > 0 && is_word_byte(bytes[start - 1]) {
        start -= 1;
    }
    let mut end = offset.min(bytes.len());
    while end < bytes.len() && is_word_byte(bytes[end]) {
        end += 1;
    }
    source[start..end].to_string()
}

fn normalize(s: &str) -> String {
    s.chars().filter(|c| *c != '-').collect::<String>().to_ascii_lowercase()
}

/// Completion is offered anywhere inside a CSS block; this server does not
/// gate on brace-nesting, since every completion candidate is itself a
/// `var()` call regardless of which CSS property it appears on.
pub fn complete(source: &str, offset: usize, graph: &TokenGraph) -> Vec<CompletionItem> {
    let query = normalize(&word_at_offset(source, offset));

    let mut items: Vec<CompletionItem> = graph
        .all()
        .filter(|token| query.is_empty() || normalize(&token.css_name).contains(&query))
        .map(|token| {
            let resolved = graph.resolve_reference(&token.raw_value);
            CompletionItem {
                label: token.css_name.clone(),
                kind: Some(CompletionItemKind::VARIABLE),
                detail: (token.token_type != dt_token::TokenType::Empty)
                    .then(|| token.token_type.as_str().to_string()),
                insert_text_format: Some(InsertTextFormat::SNIPPET),
                insert_text: Some(format!("var({}${{1|, {}|}})$0", token.css_name, resolved)),
                ..Default::default()
            }
        })
        .collect();

    items.sort_by(|a, b| a.label.cmp(&b.label));
    items
}

/// Attach full Markdown documentation to a previously-returned item.
pub fn resolve(mut item: CompletionItem, graph: &TokenGraph) -> CompletionItem {
    if let Some(token) = graph.get(&item.label) {
        item.documentation = Some(Documentation::MarkupContent(MarkupContent {
            kind: MarkupKind::Markdown,
            value: crate::markdown::render(token, graph),
        }));
    }
    item
}

#[cfg(test)]
mod tests {
    use super::*;
    use dt_token::{Deprecation, Position, Range, Token, TokenType};

    fn token(dot_path: &str, css_name: &str, raw_value: &str) -> Token {
        Token {
            dot_path: dot_path.to_string(),
            css_name: css_name.to_string(),
            raw_value: raw_value.to_string(),
            token_type: TokenType::Color,
            description: None,
            deprecated: Deprecation::default(),
            extensions: None,
            references: Token::find_references(raw_value),
            definition_uri: "file:///tokens.json".to_string(),
            definition_range: Range::new(Position::new(0, 0), Position::new(0, 1)),
            source_prefix: None,
            source_group_markers: vec![],
            cyclic: false,
        }
    }

    #[test]
    fn word_at_offset_ignores_surrounding_punctuation() {
        let source = "a { color: var(--color-red); }";
        let offset = source.find("color-red").unwrap() + 2;
        assert_eq!(word_at_offset(source, offset), "--color-red");
    }

    #[test]
    fn fuzzy_match_ignores_hyphens() {
        let mut graph = TokenGraph::new();
        graph.add(token("color.brand.primary", "--color-brand-primary", "#f00")).unwrap();
        graph.add(token("spacing.small", "--spacing-small", "4px")).unwrap();

        let source = "a { color: var(--colorbrand) }";
        let offset = source.find("colorbrand").unwrap() + 5;
        let items = complete(source, offset, &graph);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].label, "--color-brand-primary");
    }

    #[test]
    fn insert_text_is_a_snippet_with_a_fallback_tabstop() {
        let mut graph = TokenGraph::new();
        graph.add(token("color.red", "--color-red", "#ff0000")).unwrap();
        let items = complete("", 0, &graph);
        assert_eq!(items[0].insert_text.as_deref(), Some("var(--color-red${1|, #ff0000|})$0"));
    }

    #[test]
    fn resolve_attaches_markdown_documentation() {
        let mut graph = TokenGraph::new();
        graph.add(token("color.red", "--color-red", "#ff0000")).unwrap();
        let item = CompletionItem { label: "--color-red".to_string(), ..Default::default() };
        let resolved = resolve(item, &graph);
        assert!(resolved.documentation.is_some());
    }
}
