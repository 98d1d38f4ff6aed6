//! Binary crate wiring the design-tokens engine crates behind a stdio
//! JSON-RPC loop (spec.md §4.9).
//!
//! [`server::Server`] holds the shared state; [`dispatch`] routes incoming
//! messages to it, either inline (lifecycle requests and every mutating
//! notification) or onto the [`workers::WorkerPool`] (read-only feature
//! requests).

#![deny(unsafe_code)]

pub mod cli;
pub mod config_file;
pub mod dispatch;
pub mod logging;
pub mod server;
pub mod state;
pub mod workers;

use dispatch::Control;
use server::Server;
use std::io::BufRead;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use workers::WorkerPool;

/// Run the server to completion over `reader`/`output`, i.e. until the
/// client closes the connection (EOF) or `exit` is dispatched. Returns
/// whether `shutdown` was received before the connection ended, which the
/// caller uses as the process exit code per the LSP exit-code convention.
pub fn serve(reader: &mut dyn BufRead, output: Box<dyn std::io::Write + Send>) -> std::io::Result<bool> {
    let server = Arc::new(Server::new(output));
    let workers = WorkerPool::new(workers::DEFAULT_PARALLELISM);

    loop {
        match dt_transport::read_message(reader)? {
            None => break,
            Some(request) => {
                if dispatch::route(&server, &workers, request) == Control::Stop {
                    break;
                }
            }
        }
    }

    workers.shutdown();
    Ok(server.shutdown_received.load(Ordering::Relaxed))
}

/// Run over real process stdio. The top-level entry point `main.rs` calls
/// into, mirroring the shape of a Perl language server's `run_stdio`.
pub fn run_stdio() -> std::io::Result<bool> {
    let stdin = std::io::stdin();
    let mut reader = std::io::BufReader::new(stdin.lock());
    serve(&mut reader, Box::new(std::io::stdout()))
}
