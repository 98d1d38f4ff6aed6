//! Semantic equivalence of CSS values (spec.md §4.7), shared between the
//! `incorrect-fallback` diagnostic and the "Fix fallback"/"Add fallback"
//! code actions so both agree on what counts as "already correct".
//!
//! Comparisons are normalized, never parsed into a full CSS value model:
//! whitespace and quoting are the only things every type needs collapsed,
//! and a handful of types (`color`, `fontWeight`, `fontFamily`) get one
//! extra normalization pass each. Everything else, including every
//! composite type, falls back to whitespace-only comparison (spec.md §4.7:
//! "Composite types ... use byte-exact comparison after whitespace
//! normalization").

use dt_token::TokenType;

/// Are `a` and `b` the same CSS value once their type's normalization rule
/// is applied?
pub fn values_equivalent(a: &str, b: &str, token_type: TokenType) -> bool {
    match token_type {
        TokenType::Color => normalize_color(a) == normalize_color(b),
        TokenType::FontWeight => normalize_quoted_scalar(a) == normalize_quoted_scalar(b),
        TokenType::FontFamily => font_family_list(a) == font_family_list(b),
        _ => normalize_whitespace(a) == normalize_whitespace(b),
    }
}

fn normalize_whitespace(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn strip_matching_quotes(value: &str) -> &str {
    let trimmed = value.trim();
    let bytes = trimmed.as_bytes();
    if bytes.len() >= 2 && (bytes[0] == b'"' || bytes[0] == b'\'') && bytes[bytes.len() - 1] == bytes[0] {
        &trimmed[1..trimmed.len() - 1]
    } else {
        trimmed
    }
}

/// `400` vs `"400"` (spec.md §4.7 example): compare once quotes and
/// surrounding whitespace are stripped.
fn normalize_quoted_scalar(value: &str) -> String {
    strip_matching_quotes(value).to_string()
}

/// Font-family token-lists compare modulo quoting: split on top-level
/// commas, strip quotes and whitespace from each entry, compare the lists.
fn font_family_list(value: &str) -> Vec<String> {
    value.split(',').map(|entry| strip_matching_quotes(entry).to_ascii_lowercase()).collect()
}

/// `#f00` vs `#ff0000` (spec.md §4.7 example): expand to a canonical
/// 8-hex-digit (RGBA) lowercase form when the value is a hex color.
/// Anything else (named colors, `rgb()`/`hsl()` functions) is compared
/// case-insensitively with whitespace normalized — a deliberate scope
/// limit, not full color-space equivalence (see `DESIGN.md`).
fn normalize_color(value: &str) -> String {
    let trimmed = value.trim();
    if let Some(hex) = trimmed.strip_prefix('#') {
        if let Some(expanded) = expand_hex(hex) {
            return expanded;
        }
    }
    normalize_whitespace(trimmed).to_ascii_lowercase()
}

fn expand_hex(hex: &str) -> Option<String> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let lower = hex.to_ascii_lowercase();
    let full = match lower.len() {
        3 => lower.chars().flat_map(|c| [c, c]).collect::<String>() + "ff",
        4 => {
            let rgb: String = lower.chars().take(3).flat_map(|c| [c, c]).collect();
            let a = lower.chars().nth(3)?;
            rgb + &a.to_string().repeat(2)
        }
        6 => lower + "ff",
        8 => lower,
        _ => return None,
    };
    Some(full)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_and_long_hex_colors_are_equivalent() {
        assert!(values_equivalent("#f00", "#ff0000", TokenType::Color));
    }

    #[test]
    fn hex_color_case_is_ignored() {
        assert!(values_equivalent("#FF0000", "#ff0000", TokenType::Color));
    }

    #[test]
    fn hex_alpha_is_compared_too() {
        assert!(!values_equivalent("#ff0000", "#ff000080", TokenType::Color));
    }

    #[test]
    fn font_weight_number_and_quoted_string_are_equivalent() {
        assert!(values_equivalent("400", "\"400\"", TokenType::FontWeight));
    }

    #[test]
    fn font_family_lists_ignore_quoting() {
        assert!(values_equivalent(
            "\"Helvetica Neue\", sans-serif",
            "'Helvetica Neue', sans-serif",
            TokenType::FontFamily
        ));
    }

    #[test]
    fn composite_values_compare_byte_exact_after_whitespace_normalization() {
        assert!(values_equivalent("1px  solid red", "1px solid red", TokenType::Border));
        assert!(!values_equivalent("1px solid red", "1px solid blue", TokenType::Border));
    }
}
