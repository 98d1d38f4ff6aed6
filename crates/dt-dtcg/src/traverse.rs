//! The shared DTCG walk: group-marker path-dropping, `$type` inheritance,
//! and token emission (spec.md §3 invariant 3, §4.2 "Traversal").
//!
//! Both [`crate::json`] and [`crate::yaml`] convert their source format into
//! the [`crate::ir`] tree first, then hand it to [`traverse`] so this logic
//! is written, and tested, exactly once.

use crate::error::DtcgParseError;
use crate::ir::{RawObject, RawValue};
use dt_token::{ByteRange, LineIndex, Range, Token, TokenType};

pub struct TraverseContext<'a> {
    pub uri: &'a str,
    pub text: &'a str,
    pub line_index: &'a LineIndex,
    pub file_prefix: Option<&'a str>,
    pub global_prefix: Option<&'a str>,
    pub group_markers: &'a [String],
}

impl TraverseContext<'_> {
    fn is_group_marker(&self, key: &str) -> bool {
        self.group_markers.iter().any(|m| m == key)
    }

    fn to_range(&self, byte_range: ByteRange) -> Range {
        self.line_index.range(self.text, byte_range)
    }
}

/// Walk `root` and return every token found plus any per-node errors
/// (accumulated, not fatal — one malformed token does not stop the rest).
pub fn traverse(root: &RawObject, ctx: &TraverseContext) -> (Vec<Token>, Vec<DtcgParseError>) {
    let mut tokens = Vec::new();
    let mut errors = Vec::new();

    for (key, value, _key_range) in root.children() {
        let is_marker = ctx.is_group_marker(key);
        visit(value, key, is_marker, &[], Vec::new(), None, ctx, &mut tokens, &mut errors);
    }

    (tokens, errors)
}

#[allow(clippy::too_many_arguments)]
fn visit(
    node: &RawValue,
    key: &str,
    is_group_marker: bool,
    current_path: &[String],
    markers_seen: Vec<String>,
    inherited_type: Option<TokenType>,
    ctx: &TraverseContext,
    tokens: &mut Vec<Token>,
    errors: &mut Vec<DtcgParseError>,
) {
    let Some(object) = node.as_object() else { return };

    let mut effective_type = inherited_type;
    if let Some(raw_ty) = object.get("$type").and_then(RawValue::as_str) {
        match TokenType::parse(raw_ty) {
            Some(ty) => effective_type = Some(ty),
            None => errors.push(DtcgParseError::UnknownType {
                path: joined_path(current_path, key, is_group_marker),
                raw: raw_ty.to_string(),
                range: ctx.to_range(object.range),
            }),
        }
    }

    let has_value = object.get("$value").is_some();

    let mut next_markers = markers_seen;
    if is_group_marker {
        next_markers.push(key.to_string());
    }

    // A group-marker key never contributes its own path segment; everything
    // beneath it (the token it introduces, and its siblings-turned-children)
    // is addressed as if the marker were not there (spec.md §3 invariant 3).
    let continuation_path: Vec<String> = if is_group_marker {
        current_path.to_vec()
    } else {
        let mut p = current_path.to_vec();
        p.push(key.to_string());
        p
    };

    if has_value {
        match build_token(object, &continuation_path, effective_type, &next_markers, ctx) {
            Ok(token) => tokens.push(token),
            Err(err) => errors.push(err),
        }
    }

    if !has_value || is_group_marker {
        for (child_key, child_value, _range) in object.children() {
            let child_is_marker = ctx.is_group_marker(child_key);
            visit(
                child_value,
                child_key,
                child_is_marker,
                &continuation_path,
                next_markers.clone(),
                effective_type,
                ctx,
                tokens,
                errors,
            );
        }
    }
}

fn joined_path(current_path: &[String], key: &str, is_group_marker: bool) -> String {
    if is_group_marker {
        dt_token::naming::dot_path(current_path)
    } else {
        let mut segments = current_path.to_vec();
        segments.push(key.to_string());
        dt_token::naming::dot_path(&segments)
    }
}

fn build_token(
    object: &RawObject,
    path_segments: &[String],
    effective_type: Option<TokenType>,
    markers_seen: &[String],
    ctx: &TraverseContext,
) -> Result<Token, DtcgParseError> {
    let dot_path = dt_token::naming::dot_path(path_segments);

    let Some(value) = object.get("$value") else {
        return Err(DtcgParseError::MissingValue { path: dot_path, range: ctx.to_range(object.range) });
    };
    let raw_value = value.to_raw_text();

    if let Some(dep_value) = object.get("$deprecated") {
        if dep_value.as_bool().is_none() && dep_value.as_str().is_none() {
            return Err(DtcgParseError::MalformedDeprecated {
                path: dot_path,
                found: dep_value.kind_name(),
                range: ctx.to_range(dep_value.range()),
            });
        }
    }

    let deprecated = dt_token::deprecation::from_raw(
        object.get("$deprecated").and_then(RawValue::as_bool),
        object.get("$deprecated").and_then(RawValue::as_str),
    );

    let description = object.get("$description").and_then(RawValue::as_str).map(str::to_string);
    let extensions = object.get("$extensions").map(RawValue::to_json);
    let css_name = dt_token::naming::css_name(&dot_path, ctx.file_prefix, ctx.global_prefix);
    let references = Token::find_references(&raw_value);

    Ok(Token {
        dot_path,
        css_name,
        raw_value,
        token_type: effective_type.unwrap_or(TokenType::Empty),
        description,
        deprecated,
        extensions,
        references,
        definition_uri: ctx.uri.to_string(),
        definition_range: ctx.to_range(object.range),
        source_prefix: ctx.file_prefix.map(str::to_string),
        source_group_markers: markers_seen.to_vec(),
        cyclic: false,
    })
}
