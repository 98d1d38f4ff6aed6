//! Format-agnostic intermediate representation.
//!
//! Both the JSON and YAML front ends parse into this tree before the shared
//! [`crate::traverse`] walk turns it into [`dt_token::Token`]s. This keeps
//! the group-marker / `$type`-inheritance logic (spec.md §4.1, §4.2) in one
//! place instead of duplicated per format.

use dt_token::ByteRange;

#[derive(Debug, Clone)]
pub struct RawObject {
    /// Byte range of the object's defining node, e.g. the `{ ... }` that
    /// contains `$value` (spec.md §3 invariant 4).
    pub range: ByteRange,
    pub members: Vec<RawMember>,
}

#[derive(Debug, Clone)]
pub struct RawMember {
    pub key: String,
    pub key_range: ByteRange,
    pub value: RawValue,
}

#[derive(Debug, Clone)]
pub enum RawValue {
    Object(RawObject),
    /// String content with quotes/escapes already resolved; the range
    /// covers the literal as written in the source.
    String(String, ByteRange),
    /// Numeric literal, raw text preserved verbatim (so `400` round-trips
    /// as `"400"` for `fontWeight` comparisons, per spec.md §4.7).
    Number(String, ByteRange),
    Bool(bool, ByteRange),
    Null(ByteRange),
    Array(Vec<RawValue>, ByteRange),
}

impl RawValue {
    pub fn range(&self) -> ByteRange {
        match self {
            RawValue::Object(o) => o.range,
            RawValue::String(_, r)
            | RawValue::Number(_, r)
            | RawValue::Bool(_, r)
            | RawValue::Null(r)
            | RawValue::Array(_, r) => *r,
        }
    }

    /// Raw-text rendering used as a token's `$value` when the value is a
    /// scalar (string or number). Composite `$value` objects (border,
    /// shadow, typography, gradient...) are rendered as a JSON projection
    /// instead, since there is no single canonical CSS-like text form.
    pub fn to_raw_text(&self) -> String {
        match self {
            RawValue::String(s, _) => s.clone(),
            RawValue::Number(s, _) => s.clone(),
            RawValue::Bool(b, _) => b.to_string(),
            RawValue::Null(_) => String::new(),
            RawValue::Object(_) | RawValue::Array(_, _) => {
                serde_json::to_string(&self.to_json()).unwrap_or_default()
            }
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            RawValue::String(s, _) => serde_json::Value::String(s.clone()),
            RawValue::Number(s, _) => {
                serde_json::from_str(s).unwrap_or_else(|_| serde_json::Value::String(s.clone()))
            }
            RawValue::Bool(b, _) => serde_json::Value::Bool(*b),
            RawValue::Null(_) => serde_json::Value::Null,
            RawValue::Array(items, _) => {
                serde_json::Value::Array(items.iter().map(RawValue::to_json).collect())
            }
            RawValue::Object(o) => {
                let mut map = serde_json::Map::new();
                for member in &o.members {
                    map.insert(member.key.clone(), member.value.to_json());
                }
                serde_json::Value::Object(map)
            }
        }
    }

    pub fn as_object(&self) -> Option<&RawObject> {
        match self {
            RawValue::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            RawValue::Bool(b, _) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            RawValue::String(s, _) => Some(s),
            _ => None,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            RawValue::Object(_) => "object",
            RawValue::String(_, _) => "string",
            RawValue::Number(_, _) => "number",
            RawValue::Bool(_, _) => "bool",
            RawValue::Null(_) => "null",
            RawValue::Array(_, _) => "array",
        }
    }
}

impl RawObject {
    pub fn get(&self, key: &str) -> Option<&RawValue> {
        self.members.iter().find(|m| m.key == key).map(|m| &m.value)
    }

    /// Non-`$`-prefixed children, in source order (spec.md §4.2 "Traversal":
    /// "Skip DTCG metadata keys (`$`-prefixed) in the child-enumeration
    /// step").
    pub fn children(&self) -> impl Iterator<Item = (&str, &RawValue, ByteRange)> {
        self.members
            .iter()
            .filter(|m| !m.key.starts_with('$'))
            .map(|m| (m.key.as_str(), &m.value, m.key_range))
    }
}
