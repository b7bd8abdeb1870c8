//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use aetheric_states::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Stage driver
pub use crate::stage::{Stage, StageBuilder};

// Host bridge
pub use crate::core::host::{HostEvent, TickControl};

// State system
pub use crate::core::state::{
    State, StateContext, StateEvent, StateId, StateInfo, StateRegistry, StateStack,
    StateStackError, Transition,
};

// Per-state collaborators
pub use crate::core::services::{Effect, EffectManager, Lifecycle, Process, ProcessManager};
