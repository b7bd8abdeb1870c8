//=========================================================================
// State Services
//=========================================================================
//
// Per-state collaborators that mirror the state lifecycle.
//
// Architecture:
//   StateRecord
//     ├─ ProcessManager  (timed/background work owned by the state)
//     └─ EffectManager   (visual effects owned by the state)
//
// Both implement `Lifecycle`, the uniform hook set the state stack
// forwards to after the state itself has handled an event.
//
//=========================================================================

//=== Module Declarations =================================================

mod effects;
mod processes;

//=== Public API ==========================================================

pub use effects::{Effect, EffectManager};
pub use processes::{Process, ProcessManager};

//=== Lifecycle Trait =====================================================

/// Lifecycle hooks mirrored from a state onto its collaborators.
///
/// All hooks default to doing nothing. Implementations must not assume
/// any particular ordering relative to sibling collaborators.
pub trait Lifecycle {
    fn on_pause(&mut self) {}

    fn on_resume(&mut self) {}

    fn on_app_gain_focus(&mut self) {}

    fn on_app_lost_focus(&mut self) {}

    fn on_app_pause(&mut self) {}

    fn on_app_resume(&mut self) {}

    fn on_lost_context(&mut self) {}

    fn on_new_context(&mut self) {}

    fn on_render(&mut self, _delta: f32) {}

    fn on_resize(&mut self, _width: u32, _height: u32) {}

    fn on_update(&mut self, _delta: f32) {}

    /// Tears down everything the collaborator owns.
    ///
    /// Called when the owning state begins an exit transition that ends
    /// in permanent removal.
    fn remove_all(&mut self) {}
}
