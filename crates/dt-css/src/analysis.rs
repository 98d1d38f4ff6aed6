//! `var()` call extraction over a tree-sitter CSS syntax tree (spec.md §4.3).

use dt_token::ByteRange;
use tree_sitter::{Node, Tree};

use crate::pool::ParserPool;

/// One `var(--name, fallback)` call found in a stylesheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VarCall {
    pub token_name: String,
    pub fallback_text: Option<String>,
    /// Range of the whole `var(...)` call, including the function name.
    pub call_range: ByteRange,
    /// Range of just the custom-property-name argument.
    pub name_range: ByteRange,
    /// Range of the fallback expression, trimmed of surrounding whitespace.
    /// `None` when the call has no second argument.
    pub fallback_range: Option<ByteRange>,
}

pub struct ParseResult {
    pub tree: Tree,
    pub var_calls: Vec<VarCall>,
}

/// Parse `source` as CSS and extract every `var()` call in it. `None` only
/// if the parser pool handed back a parser mid-cancellation (spec.md §4.3
/// does not define behavior for that case; the caller re-requests instead).
pub fn analyze(source: &str, pool: &ParserPool) -> Option<ParseResult> {
    let mut parser = pool.acquire();
    let tree = parser.parse(source, None);
    pool.release(parser);
    let tree = tree?;

    let mut var_calls = Vec::new();
    collect_var_calls(tree.root_node(), source, &mut var_calls);

    Some(ParseResult { tree, var_calls })
}

/// The smallest syntax node whose byte range contains `byte_offset`.
pub fn node_at_byte_offset(tree: &Tree, byte_offset: usize) -> Option<Node<'_>> {
    tree.root_node().descendant_for_byte_range(byte_offset, byte_offset)
}

fn collect_var_calls(node: Node, source: &str, out: &mut Vec<VarCall>) {
    if node.kind() == "call_expression" {
        if let Some(call) = try_extract_var_call(node, source) {
            out.push(call);
        }
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_var_calls(child, source, out);
    }
}

/// `call_expression` nodes are extracted from their own source text rather
/// than by walking named child fields: the grammar's exact shape for
/// `arguments` is an implementation detail this server does not want to
/// couple to, while "text between the first `(` and the matching `)`" is
/// stable across grammar versions.
fn try_extract_var_call(node: Node, source: &str) -> Option<VarCall> {
    let call_text = source.get(node.start_byte()..node.end_byte())?;
    let open_rel = call_text.find('(')?;
    let close_rel = call_text.rfind(')')?;
    if close_rel <= open_rel {
        return None;
    }

    let function_name = call_text[..open_rel].trim();
    if function_name != "var" {
        return None;
    }

    let inside = &call_text[open_rel + 1..close_rel];
    let inside_start = node.start_byte() + open_rel + 1;

    let comma_rel = find_top_level_comma(inside);

    let (name_part, name_start) = match comma_rel {
        Some(c) => (&inside[..c], inside_start),
        None => (inside, inside_start),
    };
    let (name_text, name_trim_start) = trim_with_offset(name_part);
    if name_text.is_empty() {
        return None;
    }
    let name_range = ByteRange::new(name_start + name_trim_start, name_start + name_trim_start + name_text.len());

    let (fallback_text, fallback_range) = match comma_rel {
        Some(c) => {
            let fallback_part = &inside[c + 1..];
            let fallback_start = inside_start + c + 1;
            let (trimmed, trim_start) = trim_with_offset(fallback_part);
            if trimmed.is_empty() {
                (None, None)
            } else {
                let range = ByteRange::new(fallback_start + trim_start, fallback_start + trim_start + trimmed.len());
                (Some(trimmed.to_string()), Some(range))
            }
        }
        None => (None, None),
    };

    Some(VarCall {
        token_name: name_text.to_string(),
        fallback_text,
        call_range: ByteRange::new(node.start_byte(), node.end_byte()),
        name_range,
        fallback_range,
    })
}

/// Byte offset (within `s`) of the first comma not nested inside parens,
/// brackets, or a quoted string. Returns `None` for a single-argument call.
fn find_top_level_comma(s: &str) -> Option<usize> {
    let mut depth = 0i32;
    let mut in_string: Option<char> = None;
    for (idx, ch) in s.char_indices() {
        if let Some(quote) = in_string {
            if ch == quote {
                in_string = None;
            }
            continue;
        }
        match ch {
            '\'' | '"' => in_string = Some(ch),
            '(' | '[' => depth += 1,
            ')' | ']' => depth -= 1,
            ',' if depth == 0 => return Some(idx),
            _ => {}
        }
    }
    None
}

fn trim_with_offset(s: &str) -> (&str, usize) {
    let trimmed_start = s.len() - s.trim_start().len();
    (s.trim(), trimmed_start)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_name_with_no_fallback() {
        let pool = ParserPool::new();
        let result = analyze("a { color: var(--color-red); }", &pool).unwrap();
        assert_eq!(result.var_calls.len(), 1);
        let call = &result.var_calls[0];
        assert_eq!(call.token_name, "--color-red");
        assert!(call.fallback_text.is_none());
    }

    #[test]
    fn extracts_name_and_fallback() {
        let pool = ParserPool::new();
        let source = "a { color: var(--color-red, #ff0000); }";
        let result = analyze(source, &pool).unwrap();
        assert_eq!(result.var_calls.len(), 1);
        let call = &result.var_calls[0];
        assert_eq!(call.token_name, "--color-red");
        assert_eq!(call.fallback_text.as_deref(), Some("#ff0000"));
        let fallback = call.fallback_range.unwrap();
        assert_eq!(&source[fallback.start..fallback.end], "#ff0000");
    }

    #[test]
    fn nested_var_in_fallback_is_preserved_as_raw_text_and_found_itself() {
        let pool = ParserPool::new();
        let source = "a { color: var(--color-a, var(--color-b, red)); }";
        let result = analyze(source, &pool).unwrap();
        assert_eq!(result.var_calls.len(), 2);
        let outer = result.var_calls.iter().find(|c| c.token_name == "--color-a").unwrap();
        assert_eq!(outer.fallback_text.as_deref(), Some("var(--color-b, red)"));
        let inner = result.var_calls.iter().find(|c| c.token_name == "--color-b").unwrap();
        assert_eq!(inner.fallback_text.as_deref(), Some("red"));
    }

    #[test]
    fn comma_inside_fallback_function_is_not_the_split_point() {
        let pool = ParserPool::new();
        let source = "a { color: var(--x, rgb(1, 2, 3)); }";
        let result = analyze(source, &pool).unwrap();
        assert_eq!(result.var_calls.len(), 1);
        assert_eq!(result.var_calls[0].fallback_text.as_deref(), Some("rgb(1, 2, 3)"));
    }

    #[test]
    fn node_at_byte_offset_finds_a_leaf() {
        let pool = ParserPool::new();
        let source = "a { color: var(--x); }";
        let result = analyze(source, &pool).unwrap();
        let offset = source.find("--x").unwrap();
        let node = node_at_byte_offset(&result.tree, offset).unwrap();
        assert!(node.start_byte() <= offset && offset < node.end_byte());
    }
}
