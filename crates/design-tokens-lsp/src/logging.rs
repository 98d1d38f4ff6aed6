//! Rolling file logging (SPEC_FULL.md §6 ambient: stdout is reserved for the
//! JSON-RPC framer, so every log line goes to a file instead).

use std::io;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

const LOG_DIR_ENV: &str = "DESIGN_TOKENS_LSP_LOG_DIR";
const LEVEL_ENV: &str = "DESIGN_TOKENS_LSP_LOG";

/// The effective log directory: an explicit CLI flag wins, then the
/// environment override, then the platform default, then a relative
/// fallback for environments with no resolvable state directory at all.
pub fn resolve_log_dir(cli_override: Option<PathBuf>) -> PathBuf {
    cli_override
        .or_else(|| std::env::var_os(LOG_DIR_ENV).map(PathBuf::from))
        .or_else(|| dirs::state_dir().map(|dir| dir.join("design-tokens-lsp")))
        .unwrap_or_else(|| PathBuf::from("design-tokens-lsp-logs"))
}

/// Initialize a non-blocking rolling file subscriber. The returned guard
/// must be held for the lifetime of the process, or buffered log lines are
/// dropped on exit.
pub fn init(log_dir: &Path) -> io::Result<WorkerGuard> {
    std::fs::create_dir_all(log_dir)?;
    let appender = tracing_appender::rolling::daily(log_dir, "design-tokens-lsp.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_env(LEVEL_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_writer(writer).with_ansi(false).with_env_filter(filter).init();

    Ok(guard)
}
