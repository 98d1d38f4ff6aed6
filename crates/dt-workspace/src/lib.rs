//! Workspace configuration, token-file discovery, and graph reload
//! (spec.md §4.6).
//!
//! This crate owns the `RwLock<Arc<TokenGraph>>` snapshot pointer spec.md §5
//! describes ("Token Graph: copy-on-rebuild; readers hold a snapshot
//! pointer"): a reload builds a brand new graph off the configured token
//! files, then swaps it in behind the lock in one assignment, so every
//! request already in flight keeps reading its own `Arc` clone of the old
//! graph undisturbed.

#![deny(unsafe_code)]

pub mod config;
pub mod discovery;

pub use config::{TokenFileEntry, WorkspaceConfig};
pub use discovery::ResolvedTokenFile;

use dt_token::TokenGraph;
use parking_lot::RwLock;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// One token file that failed to parse or load, surfaced rather than
/// aborting the rest of the reload (spec.md §4.1 "Failure semantics":
/// per-file errors are accumulated, not fatal).
#[derive(Debug, Clone)]
pub struct FileError {
    pub path: PathBuf,
    pub message: String,
}

/// Outcome of one `reload()` call.
#[derive(Debug, Clone)]
pub struct ReloadReport {
    pub files_loaded: usize,
    pub tokens_loaded: usize,
    pub errors: Vec<FileError>,
}

/// The workspace root plus its live configuration and current token graph
/// snapshot. One instance per server session.
pub struct Workspace {
    root: PathBuf,
    config: RwLock<WorkspaceConfig>,
    graph: RwLock<Arc<TokenGraph>>,
}

impl Workspace {
    pub fn new(root: PathBuf) -> Self {
        Self { root, config: RwLock::new(WorkspaceConfig::default()), graph: RwLock::new(Arc::new(TokenGraph::new())) }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// A cheap `Arc` clone of the current graph snapshot; callers hold it
    /// for the lifetime of one request rather than re-locking per lookup.
    pub fn graph(&self) -> Arc<TokenGraph> {
        self.graph.read().clone()
    }

    pub fn update_config(&self, settings: &serde_json::Value) {
        self.config.write().update_from_value(settings);
    }

    pub fn config_snapshot(&self) -> WorkspaceConfig {
        self.config.read().clone()
    }

    /// The glob patterns currently in effect, for `client/registerCapability`
    /// file-watcher registration (spec.md §6 "derived from the current
    /// config"). Returns the configured `tokensFiles` patterns verbatim, or
    /// the built-in auto-discovery defaults when none are configured.
    pub fn watch_patterns(&self) -> Vec<String> {
        let config = self.config.read();
        if config.tokens_files.is_empty() {
            discovery::default_patterns()
        } else {
            config.tokens_files.iter().map(|entry| entry.pattern.clone()).collect()
        }
    }

    /// Rebuild the token graph from scratch: resolve the configured token
    /// files, parse each one (JSON or YAML by extension) via `dt_dtcg`, run
    /// cycle detection, and swap the result in. `read_file` is injected so
    /// callers can serve already-open-and-edited buffers from the document
    /// store instead of re-reading disk for files the client is actively
    /// editing.
    pub fn reload<R>(&self, read_file: R) -> ReloadReport
    where
        R: Fn(&Path) -> std::io::Result<String>,
    {
        let config = self.config_snapshot();
        let resolved = discovery::resolve_token_files(&self.root, &config.tokens_files);

        let mut graph = TokenGraph::new();
        let mut errors = Vec::new();

        for file in &resolved {
            let text = match read_file(&file.path) {
                Ok(text) => text,
                Err(err) => {
                    errors.push(FileError { path: file.path.clone(), message: err.to_string() });
                    continue;
                }
            };

            let uri = path_to_uri(&file.path);
            let group_markers = file.group_markers.as_deref().unwrap_or(&config.group_markers);

            let (tokens, parse_errors) = if is_yaml(&file.path) {
                dt_dtcg::parse_yaml(&text, &uri, file.prefix.as_deref(), config.prefix.as_deref(), group_markers)
            } else {
                dt_dtcg::parse_json(&text, &uri, file.prefix.as_deref(), config.prefix.as_deref(), group_markers)
            };

            for error in parse_errors {
                errors.push(FileError { path: file.path.clone(), message: error.to_string() });
            }
            for token in tokens {
                if let Err(error) = graph.add(token) {
                    errors.push(FileError { path: file.path.clone(), message: error.to_string() });
                }
            }
        }

        graph.detect_cycles();
        let tokens_loaded = graph.count();
        *self.graph.write() = Arc::new(graph);

        tracing::info!(files = resolved.len(), tokens = tokens_loaded, errors = errors.len(), "reloaded token graph");
        ReloadReport { files_loaded: resolved.len(), tokens_loaded, errors }
    }
}

fn is_yaml(path: &Path) -> bool {
    matches!(path.extension().and_then(|ext| ext.to_str()), Some("yaml") | Some("yml"))
}

fn path_to_uri(path: &Path) -> String {
    url::Url::from_file_path(path).map(|url| url.to_string()).unwrap_or_else(|()| format!("file://{}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};

    /// A real, process-unique scratch directory: `resolve_entry` checks
    /// literal `tokensFiles` paths against the filesystem, so these tests
    /// need actual files on disk rather than an in-memory fake.
    fn tempdir() -> PathBuf {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        let mut dir = std::env::temp_dir();
        dir.push(format!("dt-workspace-lib-test-{}-{}", std::process::id(), COUNTER.fetch_add(1, Ordering::SeqCst)));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn write(root: &Path, rel: &str, contents: &str) {
        std::fs::write(root.join(rel), contents).unwrap();
    }

    fn read_from_disk(path: &Path) -> std::io::Result<String> {
        std::fs::read_to_string(path)
    }

    #[test]
    fn reload_with_no_configured_files_and_nothing_on_disk_is_empty() {
        let workspace = Workspace::new(tempdir());
        let report = workspace.reload(read_from_disk);
        assert_eq!(report.tokens_loaded, 0);
        assert!(report.errors.is_empty());
    }

    #[test]
    fn explicit_file_is_parsed_and_published_to_the_graph() {
        let root = tempdir();
        write(&root, "tokens.json", r#"{"color": {"brand": {"$value": "#123456", "$type": "color"}}}"#);

        let workspace = Workspace::new(root);
        workspace.update_config(&serde_json::json!({ "tokensFiles": ["tokens.json"] }));

        let report = workspace.reload(read_from_disk);
        assert_eq!(report.tokens_loaded, 1);
        assert!(report.errors.is_empty());

        let graph = workspace.graph();
        assert!(graph.get_by_path("color.brand").is_some());
    }

    #[test]
    fn an_explicit_entry_with_no_file_on_disk_does_not_fall_back_to_discovery() {
        let root = tempdir();
        write(&root, "tokens.json", r#"{"spacing": {"small": {"$value": "4px", "$type": "dimension"}}}"#);

        let workspace = Workspace::new(root);
        workspace.update_config(&serde_json::json!({ "tokensFiles": ["missing.json"] }));

        let report = workspace.reload(read_from_disk);
        assert_eq!(report.tokens_loaded, 0);
        assert!(report.errors.is_empty());
    }

    #[test]
    fn a_malformed_file_is_reported_without_aborting_other_files() {
        let root = tempdir();
        write(&root, "a.tokens.json", r#"not valid json"#);
        write(&root, "b.tokens.json", r#"{"spacing": {"small": {"$value": "4px", "$type": "dimension"}}}"#);

        let workspace = Workspace::new(root);
        let report = workspace.reload(read_from_disk);
        assert_eq!(report.tokens_loaded, 1);
        assert_eq!(report.errors.len(), 1);
    }

    #[test]
    fn per_file_prefix_overrides_the_workspace_default() {
        let root = tempdir();
        write(&root, "vendor.json", r#"{"color": {"brand": {"$value": "#123456", "$type": "color"}}}"#);

        let workspace = Workspace::new(root);
        workspace.update_config(&serde_json::json!({
            "prefix": "ws",
            "tokensFiles": [{ "path": "vendor.json", "prefix": "vendor" }]
        }));

        workspace.reload(read_from_disk);
        let graph = workspace.graph();
        assert_eq!(graph.get_by_path("color.brand").unwrap().css_name, "--vendor-color-brand");
    }

    #[test]
    fn watch_patterns_fall_back_to_defaults_when_unconfigured() {
        let workspace = Workspace::new(PathBuf::from("/workspace"));
        assert!(!workspace.watch_patterns().is_empty());
    }
}
