//! The token reference graph (spec.md §4.1).
//!
//! Built once per parse/reload and treated as immutable thereafter; a
//! reload constructs a brand new [`TokenGraph`] rather than mutating one in
//! place (spec.md §5 "Token Graph: copy-on-rebuild; readers hold a snapshot
//! pointer" — the `Arc<TokenGraph>` swap itself lives in `dt-workspace`,
//! outside this crate).

use crate::token::Token;
use rustc_hash::FxHashMap;
use thiserror::Error;

/// Maximum reference-resolution depth (spec.md §4.1: "depth-limited to 32").
pub const MAX_RESOLUTION_DEPTH: usize = 32;

#[derive(Debug, Error)]
pub enum GraphError {
    /// spec.md §3 invariant 1: CSS-variable-name uniqueness; last-write-wins
    /// is forbidden, so a second `Add` for the same name is an error rather
    /// than a silent overwrite.
    #[error("duplicate CSS variable name `{0}`: first defined in `{1}`")]
    DuplicateCssName(String, String),
}

/// An immutable-after-construction token graph, indexed by both dot-path
/// and CSS variable name.
#[derive(Debug, Default)]
pub struct TokenGraph {
    by_css_name: FxHashMap<String, Token>,
    dot_path_to_css_name: FxHashMap<String, String>,
    /// Secondary index: a dot-path prefix (one level) to every token
    /// dot-path nested under it, letting feature handlers answer "what's in
    /// this group" without a linear scan (SPEC_FULL.md §4.1 supplement).
    by_group: FxHashMap<String, Vec<String>>,
}

impl TokenGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a token, rejecting CSS-variable-name collisions (spec.md §3
    /// invariant 1). The open design question in spec.md §9 is resolved as:
    /// the *first* definition wins and stays queryable, while the error is
    /// still recorded as a `GraphError` for the diagnostic engine to surface
    /// (see `DESIGN.md`).
    pub fn add(&mut self, token: Token) -> Result<(), GraphError> {
        if let Some(existing) = self.by_css_name.get(&token.css_name) {
            return Err(GraphError::DuplicateCssName(
                token.css_name.clone(),
                existing.definition_uri.clone(),
            ));
        }

        self.dot_path_to_css_name.insert(token.dot_path.clone(), token.css_name.clone());

        if let Some((group, _)) = token.dot_path.rsplit_once('.') {
            self.by_group.entry(group.to_string()).or_default().push(token.dot_path.clone());
        }

        self.by_css_name.insert(token.css_name.clone(), token);
        Ok(())
    }

    pub fn get(&self, css_name: &str) -> Option<&Token> {
        self.by_css_name.get(css_name)
    }

    pub fn get_by_path(&self, dot_path: &str) -> Option<&Token> {
        let css_name = self.dot_path_to_css_name.get(dot_path)?;
        self.by_css_name.get(css_name)
    }

    pub fn all(&self) -> impl Iterator<Item = &Token> {
        self.by_css_name.values()
    }

    pub fn count(&self) -> usize {
        self.by_css_name.len()
    }

    pub fn clear(&mut self) {
        self.by_css_name.clear();
        self.dot_path_to_css_name.clear();
        self.by_group.clear();
    }

    /// Every direct-child dot-path under `group` (one level, not recursive).
    pub fn by_group(&self, group: &str) -> impl Iterator<Item = &Token> {
        self.by_group
            .get(group)
            .into_iter()
            .flatten()
            .filter_map(move |path| self.get_by_path(path))
    }

    /// Resolve `raw_value`, substituting every `{dot.path}` reference with
    /// the referenced token's own resolved value, transitively. Cycle-safe:
    /// a path revisited within the current resolution chain resolves to
    /// itself verbatim rather than looping forever. Depth is capped at
    /// [`MAX_RESOLUTION_DEPTH`].
    pub fn resolve_reference(&self, raw_value: &str) -> String {
        let mut in_progress = Vec::new();
        self.resolve_inner(raw_value, &mut in_progress, 0)
    }

    fn resolve_inner(&self, raw_value: &str, in_progress: &mut Vec<String>, depth: usize) -> String {
        if depth >= MAX_RESOLUTION_DEPTH {
            return raw_value.to_string();
        }

        let refs = crate::reference::find_reference_literals(raw_value);
        if refs.is_empty() {
            return raw_value.to_string();
        }

        let mut out = String::with_capacity(raw_value.len());
        let mut cursor = 0;
        for r in refs {
            let (start, end) = r.range_in_value;
            out.push_str(&raw_value[cursor..start]);

            if in_progress.contains(&r.dot_path) {
                // Cycle: leave the literal as-is rather than recursing forever.
                out.push_str(&raw_value[start..end]);
            } else if let Some(token) = self.get_by_path(&r.dot_path) {
                in_progress.push(r.dot_path.clone());
                out.push_str(&self.resolve_inner(&token.raw_value, in_progress, depth + 1));
                in_progress.pop();
            } else {
                // Unresolvable: leave the literal in place.
                out.push_str(&raw_value[start..end]);
            }

            cursor = end;
        }
        out.push_str(&raw_value[cursor..]);
        out
    }

    /// Mark every token reachable from a cycle with `cyclic = true`
    /// (spec.md §3 invariant 5). Depth-first with an in-progress set capped
    /// at [`MAX_RESOLUTION_DEPTH`]; tokens are never removed from the graph,
    /// only flagged.
    pub fn detect_cycles(&mut self) {
        let paths: Vec<String> = self.by_css_name.values().map(|t| t.dot_path.clone()).collect();
        let mut cyclic_paths = std::collections::HashSet::new();

        for start in &paths {
            let mut stack = Vec::new();
            self.walk_for_cycle(start, &mut stack, &mut cyclic_paths);
        }

        for (path, css_name) in self.dot_path_to_css_name.clone() {
            if cyclic_paths.contains(&path) {
                if let Some(token) = self.by_css_name.get_mut(&css_name) {
                    token.cyclic = true;
                }
            }
        }
    }

    fn walk_for_cycle(
        &self,
        path: &str,
        stack: &mut Vec<String>,
        cyclic: &mut std::collections::HashSet<String>,
    ) {
        if stack.len() >= MAX_RESOLUTION_DEPTH {
            return;
        }
        if let Some(pos) = stack.iter().position(|p| p == path) {
            for p in &stack[pos..] {
                cyclic.insert(p.clone());
            }
            return;
        }

        let Some(token) = self.get_by_path(path) else { return };
        stack.push(path.to_string());
        for r in &token.references {
            self.walk_for_cycle(&r.dot_path, stack, cyclic);
        }
        stack.pop();
    }
}
