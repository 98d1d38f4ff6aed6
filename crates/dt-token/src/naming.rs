//! Derived-name rules (spec.md §4.1 "Prefix rule", §4.2 "Path construction").

/// Build the canonical dot-path from the ordered list of keys visited
/// during traversal, with group-marker segments already excluded by the
/// caller (spec.md §3 invariant 3).
pub fn dot_path(segments: &[String]) -> String {
    segments.join(".")
}

/// Derive the CSS custom-property name for a dot-path: dots become dashes,
/// and a file- or global-level `prefix` is prepended when present. A
/// file-level prefix always wins over the global default (spec.md §4.1
/// "Prefix rule": "A global prefix applies only to files that do not
/// specify their own.").
pub fn css_name(dot_path: &str, file_prefix: Option<&str>, global_prefix: Option<&str>) -> String {
    let dashed = dot_path.replace('.', "-");
    match file_prefix.or(global_prefix) {
        Some(prefix) if !prefix.is_empty() => format!("--{prefix}-{dashed}"),
        _ => format!("--{dashed}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_prefix() {
        assert_eq!(css_name("color.brand.primary", None, None), "--color-brand-primary");
    }

    #[test]
    fn file_prefix_wins_over_global() {
        assert_eq!(css_name("color.red", Some("token"), Some("global")), "--token-color-red");
    }

    #[test]
    fn global_prefix_applies_when_file_has_none() {
        assert_eq!(css_name("color.red", None, Some("global")), "--global-color-red");
    }
}
