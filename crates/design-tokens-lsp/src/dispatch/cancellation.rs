//! Cooperative request cancellation (spec.md §4.9 "`$/cancelRequest`").
//!
//! A simplified descendant of a Perl language server's cancellation
//! registry: the same `Arc<AtomicBool>`-per-request design, the request id
//! as the lookup key, and removal on completion. Dropped from that
//! ancestor: the dual token-cache layer, the hit-count metrics, and the
//! branch-prediction hints — this server's worker pool checks cancellation
//! at most a few times per request, not in a hot parsing loop, so none of
//! that pays for itself here.

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A request's cancellation flag, cheaply cloneable into a worker closure.
#[derive(Clone)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    fn new() -> Self {
        Self { cancelled: Arc::new(AtomicBool::new(false)) }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }
}

/// Request ids are either strings or numbers on the wire; `Value`'s own
/// `Eq`/`Hash` (via its string rendering) is enough of a key without
/// reimplementing JSON-RPC id comparison.
fn key(id: &Value) -> String {
    id.to_string()
}

/// Every in-flight cancelable request, keyed by request id.
#[derive(Default)]
pub struct CancellationRegistry {
    tokens: Mutex<FxHashMap<String, CancellationToken>>,
}

impl CancellationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a fresh token for `id`, to be handed to the worker job.
    pub fn register(&self, id: &Value) -> CancellationToken {
        let token = CancellationToken::new();
        self.tokens.lock().insert(key(id), token.clone());
        token
    }

    /// Mark the request named by a `$/cancelRequest` notification as
    /// cancelled. A miss (the request already finished, or never existed)
    /// is silently ignored, as the LSP spec allows.
    pub fn cancel(&self, id: &Value) {
        if let Some(token) = self.tokens.lock().get(&key(id)) {
            token.cancel();
        }
    }

    /// Drop the bookkeeping for a request once its response has been sent.
    pub fn remove(&self, id: &Value) {
        self.tokens.lock().remove(&key(id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn cancel_flips_the_registered_token() {
        let registry = CancellationRegistry::new();
        let id = json!(1);
        let token = registry.register(&id);
        assert!(!token.is_cancelled());
        registry.cancel(&id);
        assert!(token.is_cancelled());
    }

    #[test]
    fn cancel_of_unknown_id_is_a_no_op() {
        let registry = CancellationRegistry::new();
        registry.cancel(&json!("missing"));
    }

    #[test]
    fn remove_forgets_the_token() {
        let registry = CancellationRegistry::new();
        let id = json!(7);
        registry.register(&id);
        registry.remove(&id);
        registry.cancel(&id);
    }
}
