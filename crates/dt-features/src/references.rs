//! `textDocument/references` (spec.md §4.7 "References"): every usage site
//! of a token across the open document set — `var(--name)` calls in CSS
//! documents and `{dot.path}` literals in JSON/YAML token documents —
//! optionally including the token's own declaration.

use dt_token::{LineIndex, Token, TokenGraph};
use lsp_types::Location;

/// Every reference to `target` across `documents`. `include_declaration`
/// mirrors the LSP `ReferenceContext` field of the same name.
pub fn find_references(target: &Token, documents: &[crate::OpenDocument<'_>], include_declaration: bool) -> Vec<Location> {
    let mut out = Vec::new();

    if include_declaration {
        if let Some(location) = crate::location(&target.definition_uri, target.definition_range) {
            out.push(location);
        }
    }

    for doc in documents {
        if crate::is_css(doc.language_id) {
            collect_css_usages(doc, &target.css_name, &mut out);
        } else if let Some(root) = crate::parse_token_file(doc.language_id, doc.text, doc.uri) {
            collect_token_file_usages(doc, &root, &target.dot_path, &mut out);
        }
    }

    out
}

fn collect_css_usages(doc: &crate::OpenDocument<'_>, css_name: &str, out: &mut Vec<Location>) {
    let pool = dt_css::ParserPool::new();
    let Some(parse) = dt_css::analyze(doc.text, &pool) else { return };
    let line_index = LineIndex::new(doc.text);

    for call in &parse.var_calls {
        if call.token_name == css_name {
            let range = crate::to_lsp_range(line_index.range(doc.text, call.name_range));
            if let Ok(url) = url::Url::parse(doc.uri) {
                out.push(Location::new(url, range));
            }
        }
    }
}

fn collect_token_file_usages(doc: &crate::OpenDocument<'_>, root: &dt_dtcg::ir::RawObject, dot_path: &str, out: &mut Vec<Location>) {
    let line_index = LineIndex::new(doc.text);
    for occurrence in dt_structural::find_reference_occurrences(root) {
        if occurrence.dot_path == dot_path {
            let range = crate::to_lsp_range(line_index.range(doc.text, occurrence.range));
            if let Ok(url) = url::Url::parse(doc.uri) {
                out.push(Location::new(url, range));
            }
        }
    }
}

/// Every token the graph holds whose CSS variable name `target_css_name`
/// belongs to, for a `references` request rooted at a CSS `var()` call
/// rather than a token-file declaration.
pub fn find_references_by_css_name(css_name: &str, documents: &[crate::OpenDocument<'_>], graph: &TokenGraph, include_declaration: bool) -> Vec<Location> {
    match graph.get(css_name) {
        Some(token) => find_references(token, documents, include_declaration),
        None => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dt_token::{Deprecation, Position, Range, TokenType};

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
            definition_range: Range::new(Position::new(1, 0), Position::new(1, 5)),
            source_prefix: None,
            source_group_markers: vec![],
            cyclic: false,
        }
    }

    #[test]
    fn finds_css_and_token_file_usages_plus_the_declaration() {
        let css_text = "a { color: var(--color-red); } b { border-color: var(--color-red); }";
        let json_text = r#"{"color": {"alias": {"$value": "{color.red}"}}}"#;
        let docs = vec![
            crate::OpenDocument { uri: "file:///style.css", language_id: "css", text: css_text },
            crate::OpenDocument { uri: "file:///alias.json", language_id: "json", text: json_text },
        ];

        let locations = find_references(&token(), &docs, true);
        assert_eq!(locations.len(), 4);
        assert!(locations.iter().any(|l| l.uri.as_str() == "file:///tokens.json"));
        assert_eq!(locations.iter().filter(|l| l.uri.as_str() == "file:///style.css").count(), 2);
        assert_eq!(locations.iter().filter(|l| l.uri.as_str() == "file:///alias.json").count(), 1);
    }

    #[test]
    fn excludes_declaration_when_asked() {
        let docs = vec![crate::OpenDocument { uri: "file:///style.css", language_id: "css", text: "a { color: var(--color-red); }" }];
        let locations = find_references(&token(), &docs, false);
        assert_eq!(locations.len(), 1);
        assert_eq!(locations[0].uri.as_str(), "file:///style.css");
    }
}
