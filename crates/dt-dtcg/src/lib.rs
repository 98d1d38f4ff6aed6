//! DTCG JSON and YAML token file parsers (spec.md §4.2).
//!
//! Both front ends convert their source syntax into the shared
//! [`ir::RawObject`] tree, then hand it to [`traverse::traverse`] for the
//! one true walk: group-marker path-dropping, `$type` inheritance, and
//! [`dt_token::Token`] construction.

#![deny(unsafe_code)]

pub mod error;
pub mod ir;
pub mod json;
pub mod traverse;
pub mod yaml;

pub use error::DtcgParseError;
use dt_token::{LineIndex, Token};
use traverse::TraverseContext;

/// Parse a JSON or JSONC token file into tokens, with any per-node errors
/// accumulated rather than aborting the whole file.
pub fn parse_json(
    text: &str,
    uri: &str,
    file_prefix: Option<&str>,
    global_prefix: Option<&str>,
    group_markers: &[String],
) -> (Vec<Token>, Vec<DtcgParseError>) {
    match json::parse_to_raw(text, uri) {
        Ok(root) => run_traverse(&root, text, uri, file_prefix, global_prefix, group_markers),
        Err(err) => (Vec::new(), vec![err]),
    }
}

/// Parse a YAML token file into tokens, with any per-node errors
/// accumulated rather than aborting the whole file.
pub fn parse_yaml(
    text: &str,
    uri: &str,
    file_prefix: Option<&str>,
    global_prefix: Option<&str>,
    group_markers: &[String],
) -> (Vec<Token>, Vec<DtcgParseError>) {
    match yaml::parse_to_raw(text, uri) {
        Ok(root) => run_traverse(&root, text, uri, file_prefix, global_prefix, group_markers),
        Err(err) => (Vec::new(), vec![err]),
    }
}

fn run_traverse(
    root: &ir::RawObject,
    text: &str,
    uri: &str,
    file_prefix: Option<&str>,
    global_prefix: Option<&str>,
    group_markers: &[String],
) -> (Vec<Token>, Vec<DtcgParseError>) {
    let line_index = LineIndex::new(text);
    let ctx = TraverseContext { uri, text, line_index: &line_index, file_prefix, global_prefix, group_markers };
    traverse::traverse(root, &ctx)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// spec.md's end-to-end group-marker scenario: `color.red.$value` lives
    /// under the marker key `_`, and `color.red.darker` is its sibling —
    /// both addressed without the marker ever appearing in a dot-path.
    #[test]
    fn group_marker_scenario_from_json() {
        let text = r#"{
            "color": {
                "red": {
                    "_": { "$value": "#f00", "$type": "color" },
                    "darker": { "$value": "#a00" }
                }
            }
        }"#;
        let group_markers = vec!["_".to_string()];
        let (tokens, errors) = parse_json(text, "file:///tokens.json", None, None, &group_markers);
        assert!(errors.is_empty());

        let mut by_path: Vec<_> = tokens.iter().map(|t| (t.dot_path.clone(), t.raw_value.clone())).collect();
        by_path.sort();
        assert_eq!(
            by_path,
            vec![
                ("color.red".to_string(), "#f00".to_string()),
                ("color.red.darker".to_string(), "#a00".to_string()),
            ]
        );

        let red = tokens.iter().find(|t| t.dot_path == "color.red").unwrap();
        assert_eq!(red.css_name, "--color-red");
        assert_eq!(red.source_group_markers, vec!["_".to_string()]);
    }

    #[test]
    fn file_prefix_applies_to_css_name() {
        let text = r#"{"color": {"brand": {"$value": "#123456", "$type": "color"}}}"#;
        let (tokens, errors) = parse_json(text, "file:///tokens.json", Some("acme"), None, &[]);
        assert!(errors.is_empty());
        assert_eq!(tokens[0].css_name, "--acme-color-brand");
    }

    #[test]
    fn yaml_and_json_agree_on_the_same_tree() {
        let json_text = r#"{"spacing": {"small": {"$value": "4px", "$type": "dimension"}}}"#;
        let yaml_text = "spacing:\n  small:\n    $value: \"4px\"\n    $type: dimension\n";
        let (json_tokens, _) = parse_json(json_text, "file:///t.json", None, None, &[]);
        let (yaml_tokens, _) = parse_yaml(yaml_text, "file:///t.yaml", None, None, &[]);
        assert_eq!(json_tokens[0].dot_path, yaml_tokens[0].dot_path);
        assert_eq!(json_tokens[0].raw_value, yaml_tokens[0].raw_value);
        assert_eq!(json_tokens[0].token_type, yaml_tokens[0].token_type);
    }
}
