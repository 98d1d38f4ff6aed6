//! Color extraction for `textDocument/documentColor` and
//! `textDocument/colorPresentation` (spec.md §4.7).
//!
//! No CSS-color crate sits in the corpus's dependency stack for this, so
//! colors are parsed by hand against the narrow grammar the spec actually
//! needs: `#rgb[a]`/`#rrggbb[aa]` hex, `rgb()`/`rgba()` functions, a small
//! named-color table, and `light-dark(a, b)` (handled one level up, as two
//! color entries sharing one call range).

use dt_css::ParseResult;
use dt_token::{LineIndex, TokenGraph, TokenType};
use lsp_types::{Color, ColorInformation, ColorPresentation};

/// Split a `light-dark(a, b)` value into its two branches. Returns `None`
/// for any other shape — nested parens inside `a`/`b` are not expected in
/// practice for scalar color/dimension values, so a simple top-level comma
/// split is sufficient.
pub fn split_light_dark(value: &str) -> Option<(&str, &str)> {
    let trimmed = value.trim();
    let inner = trimmed.strip_prefix("light-dark(")?.strip_suffix(')')?;
    let comma = top_level_comma(inner)?;
    Some((inner[..comma].trim(), inner[comma + 1..].trim()))
}

fn top_level_comma(s: &str) -> Option<usize> {
    let mut depth = 0i32;
    for (idx, ch) in s.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => depth -= 1,
            ',' if depth == 0 => return Some(idx),
            _ => {}
        }
    }
    None
}

/// Parse a single CSS color literal into LSP `Color` (0.0–1.0 components).
pub fn parse_color(value: &str) -> Option<Color> {
    let trimmed = value.trim();
    if let Some(hex) = trimmed.strip_prefix('#') {
        return parse_hex(hex);
    }
    if let Some(inner) = trimmed.strip_prefix("rgba(").and_then(|s| s.strip_suffix(')')) {
        return parse_rgb_args(inner, true);
    }
    if let Some(inner) = trimmed.strip_prefix("rgb(").and_then(|s| s.strip_suffix(')')) {
        return parse_rgb_args(inner, false);
    }
    named_color(trimmed)
}

fn parse_hex(hex: &str) -> Option<Color> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let component = |s: &str| -> Option<f32> { u8::from_str_radix(s, 16).ok().map(|v| v as f32 / 255.0) };
    match hex.len() {
        3 | 4 => {
            let chars: Vec<char> = hex.chars().collect();
            let pair = |c: char| format!("{c}{c}");
            let red = component(&pair(chars[0]))?;
            let green = component(&pair(chars[1]))?;
            let blue = component(&pair(chars[2]))?;
            let alpha = if chars.len() == 4 { component(&pair(chars[3]))? } else { 1.0 };
            Some(Color { red, green, blue, alpha })
        }
        6 | 8 => {
            let red = component(&hex[0..2])?;
            let green = component(&hex[2..4])?;
            let blue = component(&hex[4..6])?;
            let alpha = if hex.len() == 8 { component(&hex[6..8])? } else { 1.0 };
            Some(Color { red, green, blue, alpha })
        }
        _ => None,
    }
}

fn parse_rgb_args(inner: &str, has_alpha_fn: bool) -> Option<Color> {
    let parts: Vec<&str> = inner.split(|c| c == ',' || c == '/').map(str::trim).filter(|s| !s.is_empty()).collect();
    if parts.len() < 3 {
        return None;
    }
    let channel = |s: &str| -> Option<f32> {
        if let Some(pct) = s.strip_suffix('%') {
            Some(pct.parse::<f32>().ok()? / 100.0)
        } else {
            Some(s.parse::<f32>().ok()? / 255.0)
        }
    };
    let red = channel(parts[0])?;
    let green = channel(parts[1])?;
    let blue = channel(parts[2])?;
    let alpha = if parts.len() > 3 {
        parts[3].trim_end_matches('%').parse::<f32>().ok().map(|a| if parts[3].ends_with('%') { a / 100.0 } else { a })?
    } else if has_alpha_fn {
        1.0
    } else {
        1.0
    };
    Some(Color { red, green, blue, alpha })
}

fn named_color(name: &str) -> Option<Color> {
    let hex = match name.to_ascii_lowercase().as_str() {
        "black" => "000000",
        "white" => "ffffff",
        "red" => "ff0000",
        "green" => "008000",
        "blue" => "0000ff",
        "yellow" => "ffff00",
        "orange" => "ffa500",
        "purple" => "800080",
        "gray" | "grey" => "808080",
        "transparent" => return Some(Color { red: 0.0, green: 0.0, blue: 0.0, alpha: 0.0 }),
        _ => return None,
    };
    parse_hex(hex)
}

/// Heuristic used when a token carries no explicit `$type`: does the value
/// look like a color literal? (spec.md §9 open question: "a deliberate
/// heuristic, not DTCG-mandated behavior.")
pub fn looks_like_color(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.starts_with('#')
        || trimmed.starts_with("rgb(")
        || trimmed.starts_with("rgba(")
        || trimmed.starts_with("hsl(")
        || trimmed.starts_with("hsla(")
        || named_color(trimmed).is_some()
}

/// Whether document-color extraction should run for this token: an
/// explicit `color` type, or an untyped value that looks like one.
pub fn eligible_for_document_color(token_type: TokenType, resolved_value: &str) -> bool {
    match token_type {
        TokenType::Color => true,
        TokenType::Empty => {
            if let Some((light, dark)) = split_light_dark(resolved_value) {
                looks_like_color(light) || looks_like_color(dark)
            } else {
                looks_like_color(resolved_value)
            }
        }
        _ => false,
    }
}

/// Every concrete `Color` a resolved value carries: one, or two for
/// `light-dark(a, b)` (spec.md §4.7: "handling `light-dark(a,b)` as *two*
/// color entries sharing the call range").
pub fn extract_colors(resolved_value: &str) -> Vec<Color> {
    if let Some((light, dark)) = split_light_dark(resolved_value) {
        [parse_color(light), parse_color(dark)].into_iter().flatten().collect()
    } else {
        parse_color(resolved_value).into_iter().collect()
    }
}

/// Format a `Color` as an 8-hex-digit literal, the form `colorPresentation`
/// compares requested colors against (spec.md §4.7).
pub fn to_hex8(color: &Color) -> String {
    let byte = |c: f32| ((c.clamp(0.0, 1.0) * 255.0).round() as u8);
    format!("#{:02x}{:02x}{:02x}{:02x}", byte(color.red), byte(color.green), byte(color.blue), byte(color.alpha))
}

/// `textDocument/documentColor`: every color carried by a `var()` call whose
/// token is (or looks like) a color, one `ColorInformation` per concrete
/// color value sharing the call's range — two entries for `light-dark`.
pub fn document_color(text: &str, line_index: &LineIndex, parse: &ParseResult, graph: &TokenGraph) -> Vec<ColorInformation> {
    let mut out = Vec::new();
    for call in &parse.var_calls {
        let Some(token) = graph.get(&call.token_name) else { continue };
        let resolved = graph.resolve_reference(&token.raw_value);
        if !eligible_for_document_color(token.token_type, &resolved) {
            continue;
        }
        let range = crate::to_lsp_range(line_index.range(text, call.call_range));
        for color in extract_colors(&resolved) {
            out.push(ColorInformation { range, color });
        }
    }
    out
}

/// `textDocument/colorPresentation`: the token(s) whose resolved color
/// matches `requested_color` at 8-hex precision, presented by their CSS
/// variable name as the replacement text for `range`.
pub fn color_presentation(requested_color: Color, graph: &TokenGraph) -> Vec<ColorPresentation> {
    let requested_hex = to_hex8(&requested_color);
    graph
        .all()
        .filter(|token| token.token_type == TokenType::Color)
        .filter(|token| {
            let resolved = graph.resolve_reference(&token.raw_value);
            extract_colors(&resolved).iter().any(|c| to_hex8(c) == requested_hex)
        })
        .map(|token| ColorPresentation { label: format!("var({})", token.css_name), text_edit: None, additional_text_edits: None })
        .collect()
}
