//! `textDocument/semanticTokens/full` (spec.md §4.7 "Semantic tokens").
//! JSON/YAML only: every `{dot.path}` reference literal that resolves to a
//! known token is split into its dot-segments, legend `["class",
//! "property"]` — first segment `class`, everything after it `property`.

use dt_dtcg::ir::RawObject;
use dt_token::{LineIndex, TokenGraph};
use lsp_types::{SemanticToken, SemanticTokens};

const TYPE_CLASS: u32 = 0;
const TYPE_PROPERTY: u32 = 1;

struct RawToken {
    line: u32,
    start_char: u32,
    length: u32,
    token_type: u32,
}

pub fn semantic_tokens(text: &str, root: &RawObject, graph: &TokenGraph, line_index: &LineIndex) -> SemanticTokens {
    let mut raw = Vec::new();

    for occurrence in dt_structural::find_reference_occurrences(root) {
        if graph.get_by_path(&occurrence.dot_path).is_none() {
            continue;
        }
        // `occurrence.range` spans the whole `{dot.path}` literal including
        // braces; the segments start one byte past the opening brace.
        let mut cursor = occurrence.range.start + 1;
        for (i, segment) in occurrence.dot_path.split('.').enumerate() {
            let start = cursor;
            let end = start + segment.len();
            let position = line_index.position(text, start);
            raw.push(RawToken {
                line: position.line,
                start_char: position.character,
                length: (end - start) as u32,
                token_type: if i == 0 { TYPE_CLASS } else { TYPE_PROPERTY },
            });
            cursor = end + 1; // the '.' (or the closing '}', harmlessly skipped)
        }
    }

    raw.sort_by_key(|t| (t.line, t.start_char));

    let mut data = Vec::with_capacity(raw.len());
    let mut prev_line = 0u32;
    let mut prev_start = 0u32;
    for token in raw {
        let delta_line = token.line - prev_line;
        let delta_start = if delta_line == 0 { token.start_char - prev_start } else { token.start_char };
        data.push(SemanticToken {
            delta_line,
            delta_start,
            length: token.length,
            token_type: token.token_type,
            token_modifiers_bitset: 0,
        });
        prev_line = token.line;
        prev_start = token.start_char;
    }

    SemanticTokens { result_id: None, data }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dt_token::{Deprecation, Position, Range, Token, TokenType};

    fn token(dot_path: &str, css_name: &str) -> Token {
        Token {
            dot_path: dot_path.to_string(),
            css_name: css_name.to_string(),
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

    /// spec.md §8 scenario 4.
    #[test]
    fn emits_one_token_per_dot_segment_with_correct_lengths_and_types() {
        let mut graph = TokenGraph::new();
        graph.add(token("color.brand.primary", "--color-brand-primary")).unwrap();

        let text = r#"{"alias": {"$value": "{color.brand.primary}"}}"#;
        let root = dt_dtcg::json::parse_to_raw(text, "file:///t.json").unwrap();
        let line_index = LineIndex::new(text);

        let tokens = semantic_tokens(text, &root, &graph, &line_index);
        assert_eq!(tokens.data.len(), 3);
        let lengths: Vec<u32> = tokens.data.iter().map(|t| t.length).collect();
        assert_eq!(lengths, vec![5, 5, 7]);
        let types: Vec<u32> = tokens.data.iter().map(|t| t.token_type).collect();
        assert_eq!(types, vec![0, 1, 1]);
        assert_eq!(tokens.data[0].delta_line, 0);
        assert_eq!(tokens.data[1].delta_line, 0);
        assert_eq!(tokens.data[2].delta_line, 0);
    }

    #[test]
    fn unresolved_reference_emits_no_tokens() {
        let graph = TokenGraph::new();
        let text = r#"{"alias": {"$value": "{color.missing}"}}"#;
        let root = dt_dtcg::json::parse_to_raw(text, "file:///t.json").unwrap();
        let line_index = LineIndex::new(text);
        let tokens = semantic_tokens(text, &root, &graph, &line_index);
        assert!(tokens.data.is_empty());
    }
}
