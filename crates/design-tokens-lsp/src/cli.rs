//! Command-line surface (spec.md §6: "CLI surface").

use clap::Parser;
use std::path::PathBuf;

/// A Language Server Protocol server for DTCG design tokens, consumed via
/// CSS `var(--token-name)` calls.
#[derive(Debug, Parser)]
#[command(name = "design-tokens-lsp", version, about)]
pub struct Cli {
    /// Communicate over stdio. Currently the only supported transport.
    #[arg(long)]
    pub stdio: bool,

    /// Directory to write rolling log files to. Overrides
    /// `DESIGN_TOKENS_LSP_LOG_DIR` and the platform default.
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,
}
