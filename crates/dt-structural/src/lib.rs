//! Structural (non-grammar) lookup of `{dot.path}` reference literals inside
//! a DTCG JSON/YAML source file (spec.md §4.4).
//!
//! [`dt_dtcg`] already resolves a *parsed* token's references relative to
//! its own `$value` text. This crate answers a different question: given a
//! raw byte offset (or position) in the *source file itself*, is it sitting
//! on top of a reference literal, and if so where exactly does that literal
//! start and end in the file? That is what hover/definition/references need
//! when the cursor is inside a token file rather than a stylesheet.

#![deny(unsafe_code)]

use dt_dtcg::ir::{RawObject, RawValue};
use dt_token::{ByteRange, LineIndex, Position};

/// A `{dot.path}` reference literal found inside a string scalar somewhere
/// in a token file, with its absolute byte range in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceOccurrence {
    pub dot_path: String,
    pub range: ByteRange,
}

/// Walk every string scalar in `root` looking for `{dot.path}` literals.
/// Escaped characters inside the literal JSON/YAML string are not
/// unescaped back to source offsets — token files in practice never put
/// escape sequences inside a reference literal, so the value's own range
/// start is used as the base offset directly.
pub fn find_reference_occurrences(root: &RawObject) -> Vec<ReferenceOccurrence> {
    let mut out = Vec::new();
    walk_object(root, &mut out);
    out
}

fn walk_object(object: &RawObject, out: &mut Vec<ReferenceOccurrence>) {
    for member in &object.members {
        walk_value(&member.value, out);
    }
}

fn walk_value(value: &RawValue, out: &mut Vec<ReferenceOccurrence>) {
    match value {
        RawValue::Object(o) => walk_object(o, out),
        RawValue::Array(items, _) => {
            for item in items {
                walk_value(item, out);
            }
        }
        RawValue::String(text, range) => {
            for literal in dt_token::reference::find_reference_literals(text) {
                let (start, end) = literal.range_in_value;
                out.push(ReferenceOccurrence {
                    dot_path: literal.dot_path,
                    range: ByteRange::new(range.start + start, range.start + end),
                });
            }
        }
        RawValue::Number(_, _) | RawValue::Bool(_, _) | RawValue::Null(_) => {}
    }
}

/// The reference literal (if any) whose range contains `byte_offset`.
pub fn reference_at_byte_offset(root: &RawObject, byte_offset: usize) -> Option<ReferenceOccurrence> {
    find_reference_occurrences(root)
        .into_iter()
        .find(|occurrence| occurrence.range.start <= byte_offset && byte_offset < occurrence.range.end)
}

/// Convenience over [`reference_at_byte_offset`] for callers working in LSP
/// `Position` coordinates.
pub fn reference_at_position(root: &RawObject, text: &str, index: &LineIndex, position: Position) -> Option<ReferenceOccurrence> {
    reference_at_byte_offset(root, index.byte_offset(text, position))
}

/// The smallest string-scalar node whose range contains `byte_offset`, used
/// to support hover on a `$value` even when it carries no reference.
pub fn string_node_at_byte_offset(root: &RawObject, byte_offset: usize) -> Option<ByteRange> {
    let mut found = None;
    find_string_node(root, byte_offset, &mut found);
    found
}

fn find_string_node(object: &RawObject, byte_offset: usize, found: &mut Option<ByteRange>) {
    for member in &object.members {
        match &member.value {
            RawValue::Object(o) => find_string_node(o, byte_offset, found),
            RawValue::Array(items, _) => {
                for item in items {
                    if let RawValue::Object(o) = item {
                        find_string_node(o, byte_offset, found);
                    }
                }
            }
            RawValue::String(_, range) => {
                if range.start <= byte_offset && byte_offset < range.end {
                    *found = Some(*range);
                }
            }
            RawValue::Number(_, _) | RawValue::Bool(_, _) | RawValue::Null(_) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_a_reference_literal_and_its_absolute_range() {
        let text = r#"{"color": {"alias": {"$value": "{color.base}"}}}"#;
        let root = dt_dtcg::json::parse_to_raw(text, "file:///t.json").unwrap();
        let occurrences = find_reference_occurrences(&root);
        assert_eq!(occurrences.len(), 1);
        assert_eq!(occurrences[0].dot_path, "color.base");
        let range = occurrences[0].range;
        assert_eq!(&text[range.start..range.end], "{color.base}");
    }

    #[test]
    fn position_inside_the_literal_resolves_to_it() {
        let text = r#"{"color": {"alias": {"$value": "{color.base}"}}}"#;
        let root = dt_dtcg::json::parse_to_raw(text, "file:///t.json").unwrap();
        let offset = text.find("color.base").unwrap();
        let occurrence = reference_at_byte_offset(&root, offset).unwrap();
        assert_eq!(occurrence.dot_path, "color.base");
    }

    #[test]
    fn position_outside_any_literal_resolves_to_nothing() {
        let text = r#"{"color": {"base": {"$value": "#ff0000"}}}"#;
        let root = dt_dtcg::json::parse_to_raw(text, "file:///t.json").unwrap();
        let offset = text.find("#ff0000").unwrap();
        assert!(reference_at_byte_offset(&root, offset).is_none());
    }
}
