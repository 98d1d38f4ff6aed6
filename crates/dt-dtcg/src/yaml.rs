//! YAML front end: converts a `yaml-rust2` event stream into [`crate::ir`].
//!
//! `serde_yaml` was deliberately not used here: it discards source
//! positions entirely, and this server needs byte-accurate ranges for
//! hover/definition/references just as much on YAML token files as on JSON
//! ones. `yaml-rust2`'s [`MarkedEventReceiver`] hands every event a
//! [`Marker`] with a byte offset, which this module folds into the same
//! [`crate::ir`] tree the JSON front end produces.

use crate::error::DtcgParseError;
use crate::ir::{RawMember, RawObject, RawValue};
use dt_token::ByteRange;
use yaml_rust2::parser::{MarkedEventReceiver, Parser};
use yaml_rust2::scanner::{Marker, TScalarStyle};
use yaml_rust2::Event;

enum Frame {
    Object { start: usize, members: Vec<RawMember>, pending_key: Option<(String, ByteRange)> },
    Array { start: usize, items: Vec<RawValue> },
}

#[derive(Default)]
struct Builder {
    stack: Vec<Frame>,
    root: Option<RawValue>,
}

impl Builder {
    fn push_value(&mut self, value: RawValue) {
        match self.stack.last_mut() {
            Some(Frame::Array { items, .. }) => items.push(value),
            Some(Frame::Object { pending_key, members, .. }) => {
                if let Some((key, key_range)) = pending_key.take() {
                    members.push(RawMember { key, key_range, value });
                } else if let RawValue::String(key, key_range) = value {
                    // Mapping keys arrive as scalar events too; a non-string
                    // key has no meaning in DTCG and is simply dropped.
                    *pending_key = Some((key, key_range));
                }
            }
            None => self.root = Some(value),
        }
    }
}

impl MarkedEventReceiver for Builder {
    fn on_event(&mut self, event: Event, mark: Marker) {
        let offset = mark.index();
        match event {
            Event::MappingStart(_, _) => {
                self.stack.push(Frame::Object { start: offset, members: Vec::new(), pending_key: None });
            }
            Event::MappingEnd => {
                if let Some(Frame::Object { start, members, .. }) = self.stack.pop() {
                    self.push_value(RawValue::Object(RawObject { range: ByteRange::new(start, offset), members }));
                }
            }
            Event::SequenceStart(_, _) => {
                self.stack.push(Frame::Array { start: offset, items: Vec::new() });
            }
            Event::SequenceEnd => {
                if let Some(Frame::Array { start, items }) = self.stack.pop() {
                    self.push_value(RawValue::Array(items, ByteRange::new(start, offset)));
                }
            }
            Event::Scalar(value, style, _, _) => {
                let range = ByteRange::new(offset, offset + value.len());
                self.push_value(scalar_to_raw(&value, style, range));
            }
            _ => {}
        }
    }
}

fn scalar_to_raw(value: &str, style: TScalarStyle, range: ByteRange) -> RawValue {
    if style == TScalarStyle::Plain {
        if value.is_empty() || value == "~" || value.eq_ignore_ascii_case("null") {
            return RawValue::Null(range);
        }
        if let Ok(b) = value.parse::<bool>() {
            return RawValue::Bool(b, range);
        }
        if value.parse::<f64>().is_ok() {
            return RawValue::Number(value.to_string(), range);
        }
    }
    RawValue::String(value.to_string(), range)
}

pub fn parse_to_raw(text: &str, uri: &str) -> Result<RawObject, DtcgParseError> {
    let mut builder = Builder::default();
    let mut parser = Parser::new_from_str(text);
    parser
        .load(&mut builder, false)
        .map_err(|err| DtcgParseError::Syntax { path: uri.to_string(), message: err.to_string() })?;

    match builder.root {
        Some(RawValue::Object(obj)) => Ok(obj),
        Some(other) => Err(DtcgParseError::Syntax {
            path: uri.to_string(),
            message: format!("expected a top-level YAML mapping, found {}", other.kind_name()),
        }),
        None => Ok(RawObject { range: ByteRange::new(0, 0), members: Vec::new() }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_mapping_round_trips_through_ir() {
        let raw = parse_to_raw(
            "color:\n  red:\n    $value: \"#ff0000\"\n    $type: color\n",
            "file:///tokens.yaml",
        )
        .unwrap();
        assert_eq!(raw.members.len(), 1);
        assert_eq!(raw.members[0].key, "color");
        let color = raw.members[0].value.as_object().unwrap();
        let red = color.get("red").unwrap().as_object().unwrap();
        assert_eq!(red.get("$value").unwrap().as_str(), Some("#ff0000"));
        assert_eq!(red.get("$type").unwrap().as_str(), Some("color"));
    }

    #[test]
    fn non_mapping_root_is_an_error() {
        let err = parse_to_raw("- 1\n- 2\n", "file:///tokens.yaml").unwrap_err();
        assert!(matches!(err, DtcgParseError::Syntax { .. }));
    }

    #[test]
    fn plain_scalar_booleans_and_numbers_are_typed() {
        let raw = parse_to_raw("a:\n  b: true\n  c: 12\n", "file:///tokens.yaml").unwrap();
        let a = raw.members[0].value.as_object().unwrap();
        assert_eq!(a.get("b").unwrap().as_bool(), Some(true));
        assert!(matches!(a.get("c").unwrap(), RawValue::Number(s, _) if s == "12"));
    }
}
