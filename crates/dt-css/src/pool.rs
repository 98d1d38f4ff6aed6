//! Pooled tree-sitter CSS parsers (SPEC_FULL.md §4.3 ambient supplement).
//!
//! Building a `tree_sitter::Parser` and loading the CSS grammar is cheap but
//! not free, and the dispatcher can have several documents being analyzed
//! concurrently. A small bounded pool keeps spare parsers around; a caller
//! that finds it empty just builds its own rather than waiting.

use parking_lot::Mutex;
use std::sync::Arc;
use tree_sitter::Parser;

const DEFAULT_CAPACITY: usize = 4;

struct Inner {
    parsers: Vec<Parser>,
    capacity: usize,
    closed: bool,
}

/// Cheaply cloneable handle to a shared pool.
#[derive(Clone)]
pub struct ParserPool {
    inner: Arc<Mutex<Inner>>,
}

impl ParserPool {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self { inner: Arc::new(Mutex::new(Inner { parsers: Vec::new(), capacity, closed: false })) }
    }

    /// Take a parser from the pool, building a new one on contention or once
    /// the pool has been closed. Never blocks.
    pub fn acquire(&self) -> Parser {
        let mut inner = self.inner.lock();
        if let Some(parser) = inner.parsers.pop() {
            return parser;
        }
        drop(inner);
        new_css_parser()
    }

    /// Return a parser for reuse. Silently dropped once the pool is closed
    /// or already at capacity.
    pub fn release(&self, parser: Parser) {
        let mut inner = self.inner.lock();
        if !inner.closed && inner.parsers.len() < inner.capacity {
            inner.parsers.push(parser);
        }
    }

    /// Discards every pooled parser and marks the pool closed. Calling this
    /// more than once is harmless.
    pub fn close(&self) {
        let mut inner = self.inner.lock();
        inner.parsers.clear();
        inner.closed = true;
    }
}

impl Default for ParserPool {
    fn default() -> Self {
        Self::new()
    }
}

#[allow(clippy::expect_used)] // grammar/runtime ABI versions are pinned in Cargo.toml together
fn new_css_parser() -> Parser {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_css::LANGUAGE.into())
        .expect("tree-sitter-css grammar is ABI-compatible with the vendored tree-sitter runtime");
    parser
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acquire_without_release_never_blocks() {
        let pool = ParserPool::with_capacity(1);
        let _a = pool.acquire();
        let _b = pool.acquire();
    }

    #[test]
    fn released_parser_is_reused() {
        let pool = ParserPool::with_capacity(1);
        let parser = pool.acquire();
        pool.release(parser);
        assert_eq!(pool.inner.lock().parsers.len(), 1);
    }

    #[test]
    fn close_is_idempotent_and_drops_pooled_parsers() {
        let pool = ParserPool::with_capacity(2);
        pool.release(pool.acquire());
        pool.close();
        pool.close();
        let inner = pool.inner.lock();
        assert!(inner.closed);
        assert!(inner.parsers.is_empty());
    }

    #[test]
    fn release_after_close_does_not_refill() {
        let pool = ParserPool::with_capacity(2);
        pool.close();
        pool.release(pool.acquire());
        assert!(pool.inner.lock().parsers.is_empty());
    }
}
