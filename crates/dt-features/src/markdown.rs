//! Shared Markdown rendering for a token's documentation (spec.md §4.7
//! "Hover" and "`completionItem/resolve` attaches full Markdown
//! documentation" — both paths render the exact same block).

use dt_token::{Token, TokenGraph};

/// Render `token`'s documentation: CSS variable name as title, type,
/// description, resolved current value (`light-dark(a, b)` split onto two
/// lines), deprecation notice, and the source file path.
pub fn render(token: &Token, graph: &TokenGraph) -> String {
    let mut out = String::new();
    out.push_str(&format!("**`{}`**\n\n", token.css_name));

    if token.token_type != dt_token::TokenType::Empty {
        out.push_str(&format!("Type: `{}`\n\n", token.token_type.as_str()));
    }

    if let Some(description) = &token.description {
        out.push_str(description);
        out.push_str("\n\n");
    }

    let resolved = graph.resolve_reference(&token.raw_value);
    out.push_str("Value:\n```\n");
    out.push_str(&render_value(&resolved));
    out.push_str("\n```\n\n");

    if token.deprecated.deprecated {
        out.push_str("**Deprecated**");
        if let Some(message) = &token.deprecated.message {
            out.push_str(&format!(": {message}"));
        }
        out.push_str("\n\n");
    }

    out.push_str(&format!("_Defined in `{}`_", token.definition_uri));
    out
}

/// `light-dark(a, b)` is rendered on two lines (one per scheme) rather than
/// as one long line; everything else renders verbatim.
fn render_value(resolved: &str) -> String {
    if let Some((light, dark)) = crate::color::split_light_dark(resolved) {
        format!("light: {light}\ndark:  {dark}")
    } else {
        resolved.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dt_token::{Deprecation, Position, Range, TokenType};

    fn token() -> Token {
        Token {
            dot_path: "color.brand.primary".to_string(),
            css_name: "--color-brand-primary".to_string(),
            raw_value: "#ff0000".to_string(),
            token_type: TokenType::Color,
            description: Some("Primary brand color.".to_string()),
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
    fn renders_title_type_value_and_source() {
        let graph = TokenGraph::new();
        let markdown = render(&token(), &graph);
        assert!(markdown.contains("--color-brand-primary"));
        assert!(markdown.contains("color"));
        assert!(markdown.contains("#ff0000"));
        assert!(markdown.contains("file:///tokens.json"));
    }

    #[test]
    fn light_dark_value_is_split_across_two_lines() {
        let mut t = token();
        t.raw_value = "light-dark(#fff, #000)".to_string();
        let graph = TokenGraph::new();
        let markdown = render(&t, &graph);
        assert!(markdown.contains("light: #fff"));
        assert!(markdown.contains("dark:  #000"));
    }

    #[test]
    fn deprecated_token_carries_its_message() {
        let mut t = token();
        t.deprecated = Deprecation {
            deprecated: true,
            message: Some("Use color.brand.secondary instead".to_string()),
            replacement: Some("color.brand.secondary".to_string()),
        };
        let graph = TokenGraph::new();
        let markdown = render(&t, &graph);
        assert!(markdown.contains("Deprecated"));
        assert!(markdown.contains("Use color.brand.secondary instead"));
    }
}
