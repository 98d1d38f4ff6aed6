//! Design Tokens Language Server binary.
//!
//! Usage:
//!   design-tokens-lsp --stdio

use clap::Parser;
use design_tokens_lsp::cli::Cli;
use design_tokens_lsp::logging;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    if !cli.stdio {
        eprintln!("design-tokens-lsp: only --stdio is supported");
        return ExitCode::FAILURE;
    }

    let log_dir = logging::resolve_log_dir(cli.log_dir);
    let _guard = match logging::init(&log_dir) {
        Ok(guard) => guard,
        Err(err) => {
            eprintln!("design-tokens-lsp: failed to initialize logging in {}: {err}", log_dir.display());
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "design-tokens-lsp starting");

    match design_tokens_lsp::run_stdio() {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => {
            tracing::warn!("connection closed before shutdown was requested");
            ExitCode::from(1)
        }
        Err(err) => {
            tracing::error!(error = %err, "server exited with an I/O error");
            ExitCode::FAILURE
        }
    }
}
