//! Workspace configuration (spec.md §4.6).
//!
//! Settings arrive from two places: a `designtokensrc.json` /
//! `.designtokensrc.json` file read once at workspace-root discovery time
//! (SPEC_FULL.md §4.6 supplement), and `workspace/didChangeConfiguration`
//! payloads pushed by the client at any point afterwards. Both are plain
//! `serde_json::Value` blobs read defensively field-by-field, the same way
//! the teacher's `ServerConfig::update_from_value` does it, rather than a
//! `#[derive(Deserialize)]` that would reject an editor sending a partial or
//! forward-compatible settings object.

use serde_json::Value;

/// One entry of the `tokensFiles` setting: a glob or literal path, with an
/// optional per-entry prefix/group-marker override (spec.md §6:
/// `tokensFiles: [string | {path, prefix?, groupMarkers?}]`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenFileEntry {
    pub pattern: String,
    pub prefix: Option<String>,
    pub group_markers: Option<Vec<String>>,
}

impl TokenFileEntry {
    fn from_value(value: &Value) -> Option<Self> {
        if let Some(path) = value.as_str() {
            return Some(Self { pattern: path.to_string(), prefix: None, group_markers: None });
        }

        let object = value.as_object()?;
        let pattern = object.get("path").and_then(Value::as_str)?.to_string();
        let prefix = object.get("prefix").and_then(Value::as_str).map(str::to_string);
        let group_markers = object.get("groupMarkers").and_then(Value::as_array).map(|markers| {
            markers.iter().filter_map(|v| v.as_str().map(str::to_string)).collect()
        });
        Some(Self { pattern, prefix, group_markers })
    }
}

/// Workspace-level configuration: which files to load as token sources, and
/// the naming defaults applied while parsing them.
#[derive(Debug, Clone)]
pub struct WorkspaceConfig {
    /// Explicit token files. Empty means "run auto-discovery" (spec.md §6).
    pub tokens_files: Vec<TokenFileEntry>,
    /// Global CSS variable name prefix, applied to every token unless a
    /// per-file prefix overrides it.
    pub prefix: Option<String>,
    /// Keys that mark a child object as a sibling of its parent rather than
    /// a nested group (spec.md §3 invariant 3), applied to every file unless
    /// a per-file override is present.
    pub group_markers: Vec<String>,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self { tokens_files: Vec::new(), prefix: None, group_markers: Vec::new() }
    }
}

impl WorkspaceConfig {
    /// Merge a settings blob on top of the current config. Called once with
    /// the `designtokensrc.json` contents (if any) and again, later, with
    /// whatever the client pushes — the later call always wins since each
    /// field is only overwritten when present in `settings`.
    pub fn update_from_value(&mut self, settings: &Value) {
        if let Some(files) = settings.get("tokensFiles").and_then(Value::as_array) {
            self.tokens_files = files.iter().filter_map(TokenFileEntry::from_value).collect();
        }

        if let Some(prefix) = settings.get("prefix").and_then(Value::as_str) {
            self.prefix = if prefix.is_empty() { None } else { Some(prefix.to_string()) };
        }

        if let Some(markers) = settings.get("groupMarkers").and_then(Value::as_array) {
            self.group_markers = markers.iter().filter_map(|v| v.as_str().map(str::to_string)).collect();
        }
    }
}
