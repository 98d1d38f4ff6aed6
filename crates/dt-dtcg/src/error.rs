//! Per-file parse diagnostics (SPEC_FULL.md §4.2 supplement).
//!
//! A malformed token inside an otherwise-valid file must not abort parsing
//! of its siblings, so these are accumulated rather than returned as a
//! single terminal `Result::Err`.

use dt_token::Range;
use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum DtcgParseError {
    #[error("`{path}`: malformed JSON/YAML: {message}")]
    Syntax { path: String, message: String },

    #[error("`{path}`: `$deprecated` must be a boolean or string, got {found}")]
    MalformedDeprecated { path: String, found: &'static str, range: Range },

    #[error("`{path}`: unresolvable `$type` value `{raw}`")]
    UnknownType { path: String, raw: String, range: Range },

    #[error("`{path}`: `$value` is missing on a token-like node")]
    MissingValue { path: String, range: Range },
}

impl DtcgParseError {
    pub fn dot_path(&self) -> &str {
        match self {
            DtcgParseError::Syntax { path, .. }
            | DtcgParseError::MalformedDeprecated { path, .. }
            | DtcgParseError::UnknownType { path, .. }
            | DtcgParseError::MissingValue { path, .. } => path,
        }
    }
}
