//! Token-file discovery: expanding `tokensFiles` entries and glob-based
//! auto-discovery (spec.md §4.6/§6).
//!
//! Grounded on the teacher's `runtime::file_discovery` module: a `WalkDir`
//! traversal with a `should_skip_dir` predicate, generalized from a fixed
//! extension filter to a [`globset::GlobSet`] match so an editor-configured
//! glob (or the built-in default patterns) decides what counts as a token
//! file instead of a hardcoded suffix list.

use crate::config::TokenFileEntry;
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// spec.md §6: "always excluding `node_modules`, hidden directories, and
/// common build outputs."
fn should_skip_dir(entry: &DirEntry) -> bool {
    if !entry.file_type().is_dir() {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    name.starts_with('.') || matches!(name.as_ref(), "node_modules" | "target" | "dist" | "build")
}

/// spec.md §6 auto-discovery patterns, used only when `tokensFiles` is empty.
const DEFAULT_PATTERNS: &[&str] = &[
    "**/tokens.json",
    "**/tokens.yaml",
    "**/tokens.yml",
    "**/*.tokens.json",
    "**/*.tokens.yaml",
    "**/*.tokens.yml",
    "**/design-tokens.json",
    "**/design-tokens.yaml",
    "**/design-tokens.yml",
];

/// The built-in auto-discovery patterns, owned, for callers that just want
/// to advertise them (e.g. file-watcher registration) without walking disk.
pub fn default_patterns() -> Vec<String> {
    DEFAULT_PATTERNS.iter().map(|p| (*p).to_string()).collect()
}

fn build_set(patterns: impl IntoIterator<Item = String>) -> Option<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    let mut any = false;
    for pattern in patterns {
        if let Ok(glob) = Glob::new(&pattern) {
            builder.add(glob);
            any = true;
        } else {
            tracing::warn!(pattern, "ignoring unparseable glob pattern");
        }
    }
    any.then(|| builder.build().ok()).flatten()
}

fn walk_matching(root: &Path, set: &GlobSet) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root).follow_links(false).into_iter().filter_entry(|e| !should_skip_dir(e)) {
        let Ok(entry) = entry else { continue };
        if !entry.file_type().is_file() {
            continue;
        }
        let Ok(relative) = entry.path().strip_prefix(root) else { continue };
        if set.is_match(relative) {
            files.push(entry.path().to_path_buf());
        }
    }
    files
}

/// A token file resolved to a concrete path on disk, carrying whatever
/// per-entry overrides applied (or `None` when auto-discovered).
#[derive(Debug, Clone)]
pub struct ResolvedTokenFile {
    pub path: PathBuf,
    pub prefix: Option<String>,
    pub group_markers: Option<Vec<String>>,
}

/// Resolve the effective set of token files for `root`: every explicit
/// `tokensFiles` entry expanded (literal paths checked for existence, globs
/// walked), or — only when `entries` is empty — the default auto-discovery
/// patterns. spec.md §9: explicit entries that all fail to resolve do
/// *not* fall back to auto-discovery.
pub fn resolve_token_files(root: &Path, entries: &[TokenFileEntry]) -> Vec<ResolvedTokenFile> {
    if entries.is_empty() {
        let Some(set) = build_set(default_patterns()) else {
            return Vec::new();
        };
        return walk_matching(root, &set)
            .into_iter()
            .map(|path| ResolvedTokenFile { path, prefix: None, group_markers: None })
            .collect();
    }

    let mut out = Vec::new();
    for entry in entries {
        out.extend(resolve_entry(root, entry));
    }
    out
}

fn resolve_entry(root: &Path, entry: &TokenFileEntry) -> Vec<ResolvedTokenFile> {
    if !is_glob(&entry.pattern) {
        let path = root.join(&entry.pattern);
        return if path.is_file() {
            vec![ResolvedTokenFile {
                path,
                prefix: entry.prefix.clone(),
                group_markers: entry.group_markers.clone(),
            }]
        } else {
            tracing::warn!(pattern = %entry.pattern, "configured token file does not exist");
            Vec::new()
        };
    }

    let Some(set) = build_set(std::iter::once(entry.pattern.clone())) else {
        return Vec::new();
    };
    walk_matching(root, &set)
        .into_iter()
        .map(|path| ResolvedTokenFile {
            path,
            prefix: entry.prefix.clone(),
            group_markers: entry.group_markers.clone(),
        })
        .collect()
}

fn is_glob(pattern: &str) -> bool {
    pattern.contains('*') || pattern.contains('?') || pattern.contains('[')
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(dir: &Path, rel: &str, contents: &str) {
        let path = dir.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn default_patterns_find_conventional_file_names() {
        let dir = tempdir();
        write(&dir, "tokens.json", "{}");
        write(&dir, "src/design-tokens.yaml", "{}");
        write(&dir, "node_modules/tokens.json", "{}");
        write(&dir, "README.md", "hi");

        let resolved = resolve_token_files(&dir, &[]);
        let names: Vec<_> = resolved.iter().map(|f| f.path.strip_prefix(&dir).unwrap().to_path_buf()).collect();
        assert_eq!(names.len(), 2);
        assert!(names.contains(&PathBuf::from("tokens.json")));
        assert!(names.contains(&PathBuf::from("src/design-tokens.yaml")));
    }

    #[test]
    fn explicit_literal_entry_resolves_to_exactly_that_file() {
        let dir = tempdir();
        write(&dir, "weird-name.json", "{}");
        let entries = vec![TokenFileEntry {
            pattern: "weird-name.json".to_string(),
            prefix: Some("acme".to_string()),
            group_markers: None,
        }];
        let resolved = resolve_token_files(&dir, &entries);
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].prefix.as_deref(), Some("acme"));
    }

    #[test]
    fn explicit_entries_that_all_fail_do_not_fall_back_to_discovery() {
        let dir = tempdir();
        write(&dir, "tokens.json", "{}");
        let entries =
            vec![TokenFileEntry { pattern: "missing.json".to_string(), prefix: None, group_markers: None }];
        let resolved = resolve_token_files(&dir, &entries);
        assert!(resolved.is_empty());
    }

    #[test]
    fn explicit_glob_entry_expands_against_the_root() {
        let dir = tempdir();
        write(&dir, "packages/a/tokens.json", "{}");
        write(&dir, "packages/b/tokens.json", "{}");
        let entries = vec![TokenFileEntry {
            pattern: "packages/*/tokens.json".to_string(),
            prefix: None,
            group_markers: None,
        }];
        let resolved = resolve_token_files(&dir, &entries);
        assert_eq!(resolved.len(), 2);
    }

    /// Minimal temp-dir helper so these tests don't need a `tempfile`
    /// dependency just for directory cleanup; the directory leaks onto disk
    /// (process-unique name, CI containers are ephemeral) rather than
    /// needing a `Drop` impl here.
    fn tempdir() -> PathBuf {
        let mut dir = std::env::temp_dir();
        dir.push(format!("dt-workspace-test-{}-{}", std::process::id(), dir_counter()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn dir_counter() -> u64 {
        use std::sync::atomic::{AtomicU64, Ordering};
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        COUNTER.fetch_add(1, Ordering::SeqCst)
    }
}
