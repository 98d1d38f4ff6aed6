//! `designtokensrc.json` / `.designtokensrc.json` convenience config
//! (SPEC_FULL.md §4.6 supplement). Read once at workspace-root discovery
//! time and merged under whatever the client later pushes via
//! `workspace/didChangeConfiguration`.

use std::path::Path;

const CANDIDATES: &[&str] = &["designtokensrc.json", ".designtokensrc.json"];

/// The parsed contents of the first rc file found at `root`, if any.
/// A present-but-malformed file is logged and treated the same as an
/// absent one — it must not prevent the server from starting.
pub fn load(root: &Path) -> Option<serde_json::Value> {
    for candidate in CANDIDATES {
        let path = root.join(candidate);
        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => continue,
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "failed to read config file");
                continue;
            }
        };

        match serde_json::from_str(&text) {
            Ok(value) => return Some(value),
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "malformed config file, ignoring");
                continue;
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};

    fn tempdir() -> std::path::PathBuf {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        let mut dir = std::env::temp_dir();
        dir.push(format!("dt-lsp-config-file-test-{}-{}", std::process::id(), COUNTER.fetch_add(1, Ordering::SeqCst)));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn no_rc_file_yields_none() {
        assert!(load(&tempdir()).is_none());
    }

    #[test]
    fn prefers_the_unprefixed_name() {
        let dir = tempdir();
        std::fs::write(dir.join("designtokensrc.json"), r#"{"prefix": "acme"}"#).unwrap();
        let value = load(&dir).unwrap();
        assert_eq!(value["prefix"], "acme");
    }

    #[test]
    fn falls_back_to_the_dotfile_variant() {
        let dir = tempdir();
        std::fs::write(dir.join(".designtokensrc.json"), r#"{"prefix": "acme"}"#).unwrap();
        let value = load(&dir).unwrap();
        assert_eq!(value["prefix"], "acme");
    }

    #[test]
    fn malformed_file_is_ignored_rather_than_erroring() {
        let dir = tempdir();
        std::fs::write(dir.join("designtokensrc.json"), "not json").unwrap();
        assert!(load(&dir).is_none());
    }
}
