//=========================================================================
// State Stack Errors
//=========================================================================
//
// Precondition violations reported by stack operations. All of these are
// programmer errors: they are returned to the caller and never retried.
//
// The drain-time invariant (push and swap queues both non-empty) is not
// represented here; it indicates a bug in the stack itself and panics.
//
//=========================================================================

//=== External Dependencies ===============================================

use thiserror::Error;

//=== Internal Dependencies ===============================================

use super::StateId;

//=== StateStackError =====================================================

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateStackError {
    /// A pop was requested while some state is mid-transition.
    #[error("cannot {operation} while a state is transitioning")]
    Transitioning { operation: &'static str },

    /// A non-overlay was queued behind an overlay that is still pending.
    #[error("cannot queue non-overlay state `{name}` while overlay `{overlay}` is pending")]
    OverlayPending { name: String, overlay: String },

    /// The operation needs a state on the stack and there is none.
    #[error("cannot {operation}: the state stack is empty")]
    Empty { operation: &'static str },

    /// The state the operation targets is already paused or popped.
    #[error("cannot {operation}: state `{name}` is not active")]
    Inactive { operation: &'static str, name: String },

    /// No live or pending state carries this handle.
    #[error("no state with handle {0} on the stack")]
    UnknownState(StateId),

    /// No factory is registered under this name.
    #[error("no state factory registered as `{0}`")]
    UnregisteredFactory(String),
}

//=== Tests ===============================================================
