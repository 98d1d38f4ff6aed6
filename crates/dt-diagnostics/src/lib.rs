//! Diagnostic computation for CSS documents against the token graph
//! (spec.md §4.8).
//!
//! This crate turns a [`dt_css::ParseResult`] (the var-calls found in one
//! stylesheet) and a [`dt_token::TokenGraph`] snapshot into the LSP
//! `Diagnostic` list `textDocument/publishDiagnostics` and
//! `textDocument/diagnostic` both serve. Every diagnostic kind here
//! corresponds to one bullet in spec.md §4.8; nothing here mutates either
//! input, so the same computation backs both the push and pull protocols.

#![deny(unsafe_code)]

pub mod equivalence;

use dt_css::{ParseResult, VarCall};
use dt_token::{LineIndex, TokenGraph};
use lsp_types::{Diagnostic, DiagnosticSeverity, NumberOrString, Position, Range};
use serde_json::json;

/// Diagnostic source string advertised in every `Diagnostic.source` field.
pub const SOURCE: &str = "design-tokens-lsp";

/// Diagnostic codes (spec.md §4.8), kept as plain strings so they survive
/// round-tripping through `codeAction`'s `context.diagnostics` unchanged.
pub mod codes {
    pub const UNKNOWN_REFERENCE: &str = "unknown-reference";
    pub const INCORRECT_FALLBACK: &str = "incorrect-fallback";
    pub const DEPRECATED_TOKEN: &str = "deprecated-token";
    pub const CYCLIC_REFERENCE: &str = "cyclic-reference";
}

/// Compute every diagnostic for one CSS document's parsed var-calls against
/// `graph`. `text`/`line_index` convert the var-calls' byte ranges (as
/// produced by `dt_css`) into LSP `Range`s.
pub fn compute(text: &str, parse: &ParseResult, graph: &TokenGraph, line_index: &LineIndex) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    for call in &parse.var_calls {
        let range = to_range(text, line_index, call);

        let Some(token) = graph.get(&call.token_name) else {
            diagnostics.push(unknown_reference(range));
            continue;
        };

        if let Some(fallback) = &call.fallback_text {
            let resolved = graph.resolve_reference(&token.raw_value);
            if !equivalence::values_equivalent(fallback, &resolved, token.token_type) {
                diagnostics.push(incorrect_fallback(range, &call.token_name));
            }
        }

        if token.deprecated.deprecated {
            diagnostics.push(deprecated_token(range, token.deprecated.message.as_deref()));
        }

        if token.cyclic {
            diagnostics.push(cyclic_reference(range));
        }
    }

    diagnostics
}

fn to_range(text: &str, line_index: &LineIndex, call: &VarCall) -> Range {
    let dt_range = line_index.range(text, dt_token::ByteRange::new(call.call_range.start, call.call_range.end));
    Range::new(
        Position::new(dt_range.start.line, dt_range.start.character),
        Position::new(dt_range.end.line, dt_range.end.character),
    )
}

fn unknown_reference(range: Range) -> Diagnostic {
    Diagnostic {
        range,
        severity: Some(DiagnosticSeverity::WARNING),
        code: Some(NumberOrString::String(codes::UNKNOWN_REFERENCE.to_string())),
        source: Some(SOURCE.to_string()),
        message: "Unknown design token reference".to_string(),
        ..Diagnostic::default()
    }
}

/// The `data` payload carries the token name so the code-action layer can
/// recompute the fix without re-parsing the call site (spec.md §4.8:
/// "data payload carries the token name for code-action retrieval").
fn incorrect_fallback(range: Range, token_name: &str) -> Diagnostic {
    Diagnostic {
        range,
        severity: Some(DiagnosticSeverity::ERROR),
        code: Some(NumberOrString::String(codes::INCORRECT_FALLBACK.to_string())),
        source: Some(SOURCE.to_string()),
        message: "Fallback value does not match the token's resolved value".to_string(),
        data: Some(json!({ "tokenName": token_name })),
        ..Diagnostic::default()
    }
}

fn deprecated_token(range: Range, message: Option<&str>) -> Diagnostic {
    let detail = message.unwrap_or("This token is deprecated");
    Diagnostic {
        range,
        severity: Some(DiagnosticSeverity::INFORMATION),
        code: Some(NumberOrString::String(codes::DEPRECATED_TOKEN.to_string())),
        source: Some(SOURCE.to_string()),
        message: format!("Deprecated design token: {detail}"),
        tags: Some(vec![lsp_types::DiagnosticTag::DEPRECATED]),
        ..Diagnostic::default()
    }
}

fn cyclic_reference(range: Range) -> Diagnostic {
    Diagnostic {
        range,
        severity: Some(DiagnosticSeverity::WARNING),
        code: Some(NumberOrString::String(codes::CYCLIC_REFERENCE.to_string())),
        source: Some(SOURCE.to_string()),
        message: "Token participates in a cyclic reference".to_string(),
        ..Diagnostic::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dt_token::{Deprecation, Range as DtRange, Token, TokenType};

    fn graph_with(tokens: Vec<Token>) -> TokenGraph {
        let mut graph = TokenGraph::new();
        for token in tokens {
            graph.add(token).unwrap();
        }
        graph.detect_cycles();
        graph
    }

    fn token(dot_path: &str, css_name: &str, raw_value: &str, token_type: TokenType) -> Token {
        Token {
            dot_path: dot_path.to_string(),
            css_name: css_name.to_string(),
            raw_value: raw_value.to_string(),
            token_type,
            description: None,
            deprecated: Deprecation::default(),
            extensions: None,
            references: Token::find_references(raw_value),
            definition_uri: "file:///tokens.json".to_string(),
            definition_range: DtRange::new(dt_token::Position::new(0, 0), dt_token::Position::new(0, 1)),
            source_prefix: None,
            source_group_markers: vec![],
            cyclic: false,
        }
    }

    /// spec.md §8 scenario 1: unknown reference. The diagnostic spans the
    /// whole `var(--nope)` call (`to_range` derives from `call.call_range`,
    /// which `dt_css` sets to the full `call_expression` node), not just the
    /// `--nope` argument.
    #[test]
    fn unknown_reference_scenario() {
        let graph = graph_with(vec![]);
        let pool = dt_css::ParserPool::new();
        let source = ".a { color: var(--nope); }";
        let parse = dt_css::analyze(source, &pool).unwrap();
        let line_index = LineIndex::new(source);

        let diagnostics = compute(source, &parse, &graph, &line_index);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, Some(NumberOrString::String(codes::UNKNOWN_REFERENCE.to_string())));
        assert_eq!(diagnostics[0].range.start, Position::new(0, 12));
        assert_eq!(diagnostics[0].range.end, Position::new(0, 23));
    }

    /// spec.md §8 scenario 2: fallback mismatch.
    #[test]
    fn fallback_mismatch_scenario() {
        let graph = graph_with(vec![token("color.red", "--token-color-red", "red", TokenType::Color)]);
        let pool = dt_css::ParserPool::new();
        let source = "body { color: var(--token-color-red, blue); }";
        let parse = dt_css::analyze(source, &pool).unwrap();
        let line_index = LineIndex::new(source);

        let diagnostics = compute(source, &parse, &graph, &line_index);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, Some(NumberOrString::String(codes::INCORRECT_FALLBACK.to_string())));
        assert_eq!(diagnostics[0].data, Some(json!({ "tokenName": "--token-color-red" })));
    }

    #[test]
    fn correct_fallback_produces_no_diagnostic() {
        let graph = graph_with(vec![token("color.red", "--token-color-red", "red", TokenType::Color)]);
        let pool = dt_css::ParserPool::new();
        let source = "body { color: var(--token-color-red, red); }";
        let parse = dt_css::analyze(source, &pool).unwrap();
        let line_index = LineIndex::new(source);
        assert!(compute(source, &parse, &graph, &line_index).is_empty());
    }

    #[test]
    fn deprecated_token_is_flagged_information() {
        let mut tok = token("color.old", "--token-color-old", "#fff", TokenType::Color);
        tok.deprecated = Deprecation { deprecated: true, message: Some("Use color.new instead".to_string()), replacement: Some("color.new".to_string()) };
        let graph = graph_with(vec![tok]);
        let pool = dt_css::ParserPool::new();
        let source = "a { color: var(--token-color-old); }";
        let parse = dt_css::analyze(source, &pool).unwrap();
        let line_index = LineIndex::new(source);

        let diagnostics = compute(source, &parse, &graph, &line_index);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].severity, Some(DiagnosticSeverity::INFORMATION));
        assert!(diagnostics[0].message.contains("Use color.new instead"));
    }

    /// spec.md §8 scenario 6 (reload half): a cyclic token's var-call is
    /// flagged at every call site referencing it.
    #[test]
    fn cyclic_reference_is_flagged() {
        let a = token("color.a", "--color-a", "{color.b}", TokenType::Color);
        let b = token("color.b", "--color-b", "{color.a}", TokenType::Color);
        let graph = graph_with(vec![a, b]);
        let pool = dt_css::ParserPool::new();
        let source = "a { color: var(--color-a); }";
        let parse = dt_css::analyze(source, &pool).unwrap();
        let line_index = LineIndex::new(source);

        let diagnostics = compute(source, &parse, &graph, &line_index);
        assert!(diagnostics.iter().any(|d| d.code == Some(NumberOrString::String(codes::CYCLIC_REFERENCE.to_string()))));
    }
}
