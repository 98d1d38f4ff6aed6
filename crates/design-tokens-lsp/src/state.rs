//! Server lifecycle state machine (spec.md §4.9).
//!
//! `Created -> Initializing -> Ready -> ShuttingDown -> Exited`. Requests
//! outside the permitted state for their method are rejected with
//! `InvalidRequest` rather than processed (spec.md §7).

use parking_lot::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Created,
    Initializing,
    Ready,
    ShuttingDown,
    Exited,
}

/// Thread-safe holder for the current lifecycle state, with the method
/// gating spec.md §4.9 describes.
pub struct StateMachine {
    state: Mutex<LifecycleState>,
}

impl StateMachine {
    pub fn new() -> Self {
        Self { state: Mutex::new(LifecycleState::Created) }
    }

    pub fn current(&self) -> LifecycleState {
        *self.state.lock()
    }

    pub fn transition_to(&self, next: LifecycleState) {
        *self.state.lock() = next;
    }

    /// Whether `method` is allowed to run in the current state.
    /// `initialize` only from `Created`; everything else (besides `exit`)
    /// only once `Ready`; `shutdown`/`exit` are always permitted so a
    /// misbehaving client can still terminate the session cleanly.
    pub fn permits(&self, method: &str) -> bool {
        match self.current() {
            LifecycleState::Created => method == "initialize",
            LifecycleState::Initializing => method == "initialized" || method == "shutdown" || method == "exit",
            LifecycleState::Ready => method != "initialize",
            LifecycleState::ShuttingDown => method == "exit" || method == "$/cancelRequest",
            LifecycleState::Exited => false,
        }
    }
}

impl Default for StateMachine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initialize_only_permitted_before_initialization() {
        let sm = StateMachine::new();
        assert!(sm.permits("initialize"));
        assert!(!sm.permits("textDocument/hover"));
    }

    #[test]
    fn ready_state_permits_everything_but_a_second_initialize() {
        let sm = StateMachine::new();
        sm.transition_to(LifecycleState::Ready);
        assert!(sm.permits("textDocument/hover"));
        assert!(!sm.permits("initialize"));
    }

    #[test]
    fn shutting_down_only_permits_exit_and_cancellation() {
        let sm = StateMachine::new();
        sm.transition_to(LifecycleState::ShuttingDown);
        assert!(sm.permits("exit"));
        assert!(sm.permits("$/cancelRequest"));
        assert!(!sm.permits("textDocument/hover"));
    }
}
