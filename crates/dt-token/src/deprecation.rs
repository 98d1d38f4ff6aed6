//! Deprecation flag/message parsing (spec.md §4.1 "Deprecation").

use crate::token::Deprecation;
use regex::Regex;
use std::sync::OnceLock;

fn use_x_instead() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    #[allow(clippy::expect_used)] // pattern is a fixed literal, compiles by construction
    RE.get_or_init(|| {
        Regex::new(r"(?i)^use\s+([A-Za-z0-9_.-]+)\s+instead\.?$")
            .expect("static pattern is valid")
    })
}

fn replaced_by_x() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    #[allow(clippy::expect_used)] // pattern is a fixed literal, compiles by construction
    RE.get_or_init(|| {
        Regex::new(r"(?i)^replaced\s+by\s+([A-Za-z0-9_.-]+)\.?$").expect("static pattern is valid")
    })
}

/// Parse a `$deprecated` message for a suggested replacement token.
///
/// Recognizes "Use X instead", "Use X.Y instead", and "Replaced by X"
/// (case-insensitive, optional trailing period). Returns `None` when no
/// pattern matches — the code-action layer then falls back to "replace with
/// literal value".
pub fn suggest_replacement(message: &str) -> Option<String> {
    let trimmed = message.trim();
    use_x_instead()
        .captures(trimmed)
        .or_else(|| replaced_by_x().captures(trimmed))
        .map(|caps| caps[1].to_string())
}

/// Build a [`Deprecation`] from the raw `$deprecated` value, which per DTCG
/// may be a bare `true` or a string message.
pub fn from_raw(deprecated_bool: Option<bool>, deprecated_message: Option<&str>) -> Deprecation {
    match (deprecated_bool, deprecated_message) {
        (_, Some(msg)) => {
            Deprecation { deprecated: true, replacement: suggest_replacement(msg), message: Some(msg.to_string()) }
        }
        (Some(true), None) => Deprecation { deprecated: true, message: None, replacement: None },
        _ => Deprecation::default(),
    }
}
