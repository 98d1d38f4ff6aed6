//! Token identity, attributes, and deprecation metadata (spec.md §3, §4.1).

use crate::range::Range;
use serde::{Deserialize, Serialize};

/// One of the DTCG-recognized `$type` values, or `Empty` when no ancestor
/// declares one (spec.md §3 "Attributes").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TokenType {
    Color,
    Dimension,
    Number,
    FontFamily,
    FontWeight,
    Duration,
    CubicBezier,
    Border,
    Shadow,
    Typography,
    Gradient,
    StrokeStyle,
    Transition,
    Empty,
}

impl TokenType {
    pub fn parse(raw: &str) -> Option<Self> {
        Some(match raw {
            "color" => Self::Color,
            "dimension" => Self::Dimension,
            "number" => Self::Number,
            "fontFamily" => Self::FontFamily,
            "fontWeight" => Self::FontWeight,
            "duration" => Self::Duration,
            "cubicBezier" => Self::CubicBezier,
            "border" => Self::Border,
            "shadow" => Self::Shadow,
            "typography" => Self::Typography,
            "gradient" => Self::Gradient,
            "strokeStyle" => Self::StrokeStyle,
            "transition" => Self::Transition,
            _ => return None,
        })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Color => "color",
            Self::Dimension => "dimension",
            Self::Number => "number",
            Self::FontFamily => "fontFamily",
            Self::FontWeight => "fontWeight",
            Self::Duration => "duration",
            Self::CubicBezier => "cubicBezier",
            Self::Border => "border",
            Self::Shadow => "shadow",
            Self::Typography => "typography",
            Self::Gradient => "gradient",
            Self::StrokeStyle => "strokeStyle",
            Self::Transition => "transition",
            Self::Empty => "",
        }
    }

    /// Composite types (spec.md §4.7 "Semantic equivalence of CSS values")
    /// are compared byte-exact after whitespace normalization rather than
    /// via a value-specific equivalence rule.
    pub fn is_composite(&self) -> bool {
        matches!(self, Self::Border | Self::Shadow | Self::Typography)
    }
}

/// Deprecation metadata for a token (spec.md §4.1 "Deprecation").
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deprecation {
    pub deprecated: bool,
    pub message: Option<String>,
    /// Dot-path of a replacement token, parsed from `message` by
    /// [`crate::deprecation::suggest_replacement`]. Empty when no pattern
    /// matched.
    pub replacement: Option<String>,
}

/// A `{dot.path}` reference literal found inside a token's raw value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceLiteral {
    pub dot_path: String,
    /// Byte range of the reference within the token's raw value text.
    pub range_in_value: (usize, usize),
}

/// A fully parsed design token (spec.md §3 "Token").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    /// Canonical dot-path identity, e.g. `color.brand.primary`.
    pub dot_path: String,
    /// Derived CSS custom property name, e.g. `--brand-color-brand-primary`.
    pub css_name: String,
    /// Raw, unresolved `$value` text exactly as written in the source file.
    pub raw_value: String,
    /// `$type`, inherited from the nearest ancestor that declares one.
    pub token_type: TokenType,
    pub description: Option<String>,
    pub deprecated: Deprecation,
    /// Opaque `$extensions` payload, preserved verbatim.
    pub extensions: Option<serde_json::Value>,
    /// References to other tokens found in `raw_value`.
    pub references: Vec<ReferenceLiteral>,
    /// Absolute or `file://` URI of the file this token was defined in.
    pub definition_uri: String,
    /// Range covering the defining object (the one containing `$value`).
    pub definition_range: Range,
    /// The file-level prefix (if any) that produced `css_name`.
    pub source_prefix: Option<String>,
    /// Group-marker keys encountered while walking to this token, in order.
    pub source_group_markers: Vec<String>,
    /// Set by cycle detection; never un-set once true for a given graph
    /// build (spec.md §3 invariant 5).
    pub cyclic: bool,
}

impl Token {
    /// Every `{dot.path}` reference literal embedded in `raw_value`,
    /// matched with a balanced-braces regex (spec.md §4.4).
    pub fn find_references(raw_value: &str) -> Vec<ReferenceLiteral> {
        crate::reference::find_reference_literals(raw_value)
    }
}
