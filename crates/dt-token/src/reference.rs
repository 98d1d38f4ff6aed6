//! `{dot.path}` reference-literal discovery (spec.md §4.4).

use crate::token::ReferenceLiteral;
use regex::Regex;
use std::sync::OnceLock;

/// Matches a `{...}` span with no nested braces — "balanced" in the sense
/// that DTCG reference literals never nest, so a non-greedy `[^}]+` body is
/// sufficient and considerably cheaper than a real balanced-brace parser.
fn reference_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    #[allow(clippy::expect_used)] // pattern is a fixed literal, compiles by construction
    RE.get_or_init(|| Regex::new(r"\{([^{}]+)\}").expect("static reference pattern is valid"))
}

/// Find every `{dot.path}` literal in `text`, returning each with its byte
/// range within `text`. Does not validate that the path resolves to a known
/// token — that is the caller's job (definition/references keep unresolved
/// matches so users can navigate to broken references; semantic-token
/// emission drops them, per spec.md §4.7).
pub fn find_reference_literals(text: &str) -> Vec<ReferenceLiteral> {
    reference_regex()
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let inner = caps.get(1)?;
            Some(ReferenceLiteral {
                dot_path: inner.as_str().to_string(),
                range_in_value: (whole.start(), whole.end()),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_single_reference() {
        let refs = find_reference_literals("{color.brand.primary}");
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].dot_path, "color.brand.primary");
        assert_eq!(refs[0].range_in_value, (0, 21));
    }

    #[test]
    fn finds_reference_inside_light_dark() {
        let refs = find_reference_literals("light-dark({color.bg.light}, {color.bg.dark})");
        assert_eq!(refs.len(), 2);
        assert_eq!(refs[0].dot_path, "color.bg.light");
        assert_eq!(refs[1].dot_path, "color.bg.dark");
    }

    #[test]
    fn no_references_in_plain_value() {
        assert!(find_reference_literals("#ff0000").is_empty());
    }
}
