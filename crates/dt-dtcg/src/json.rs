//! JSON/JSONC front end: converts a `jsonc-parser` AST into [`crate::ir`].
//!
//! JSONC tolerance (comments, trailing commas) comes for free from the
//! parser; this module only flattens its AST into the shared IR so
//! [`crate::traverse`] never has to know which syntax produced it.

use crate::error::DtcgParseError;
use crate::ir::{RawMember, RawObject, RawValue};
use dt_token::ByteRange;
use jsonc_parser::ast::{Object as AstObject, Value as AstValue};
use jsonc_parser::common::Ranged;
use jsonc_parser::{parse_to_ast, CollectOptions, ParseOptions};

pub fn parse_to_raw(text: &str, uri: &str) -> Result<RawObject, DtcgParseError> {
    let result = parse_to_ast(text, &CollectOptions::default(), &ParseOptions::default())
        .map_err(|err| DtcgParseError::Syntax { path: uri.to_string(), message: err.to_string() })?;

    match result.value {
        Some(AstValue::Object(obj)) => Ok(convert_object(&obj)),
        Some(other) => Err(DtcgParseError::Syntax {
            path: uri.to_string(),
            message: format!("expected a top-level JSON object, found {}", value_kind(&other)),
        }),
        None => Ok(RawObject { range: ByteRange::new(0, 0), members: Vec::new() }),
    }
}

fn convert_object(obj: &AstObject) -> RawObject {
    let members = obj
        .properties
        .iter()
        .map(|prop| RawMember {
            key: prop.name.value.clone(),
            key_range: to_byte_range(prop.name.range()),
            value: convert_value(&prop.value),
        })
        .collect();
    RawObject { range: to_byte_range(obj.range()), members }
}

fn convert_value(value: &AstValue) -> RawValue {
    match value {
        AstValue::Object(o) => RawValue::Object(convert_object(o)),
        AstValue::Array(a) => {
            let items = a.elements.iter().map(convert_value).collect();
            RawValue::Array(items, to_byte_range(a.range()))
        }
        AstValue::StringLit(s) => RawValue::String(s.value.clone(), to_byte_range(s.range())),
        AstValue::NumberLit(n) => RawValue::Number(n.value.clone(), to_byte_range(n.range())),
        AstValue::BooleanLit(b) => RawValue::Bool(b.value, to_byte_range(b.range())),
        AstValue::NullKeyword(n) => RawValue::Null(to_byte_range(n.range())),
    }
}

fn to_byte_range(range: jsonc_parser::common::Range) -> ByteRange {
    ByteRange::new(range.start, range.end)
}

fn value_kind(value: &AstValue) -> &'static str {
    match value {
        AstValue::Object(_) => "an object",
        AstValue::Array(_) => "an array",
        AstValue::StringLit(_) => "a string",
        AstValue::NumberLit(_) => "a number",
        AstValue::BooleanLit(_) => "a boolean",
        AstValue::NullKeyword(_) => "null",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_object_round_trips_through_ir() {
        let raw = parse_to_raw(
            r#"{"color": {"red": {"$value": "#ff0000", "$type": "color"}}}"#,
            "file:///tokens.json",
        )
        .unwrap();
        assert_eq!(raw.members.len(), 1);
        assert_eq!(raw.members[0].key, "color");
        let color = raw.members[0].value.as_object().unwrap();
        let red = color.get("red").unwrap().as_object().unwrap();
        assert_eq!(red.get("$value").unwrap().as_str(), Some("#ff0000"));
    }

    #[test]
    fn non_object_root_is_an_error() {
        let err = parse_to_raw("[1, 2, 3]", "file:///tokens.json").unwrap_err();
        assert!(matches!(err, DtcgParseError::Syntax { .. }));
    }

    #[test]
    fn jsonc_comments_are_tolerated() {
        let raw = parse_to_raw(
            "{\n  // a comment\n  \"color\": {\"$value\": \"#fff\", \"$type\": \"color\"},\n}",
            "file:///tokens.json",
        )
        .unwrap();
        assert_eq!(raw.members.len(), 1);
    }
}
