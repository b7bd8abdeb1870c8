//=========================================================================
// Host Bridge Interface
//=========================================================================
//
// Host-to-stage event types.
//
// The windowing layer (winit, SDL, a test harness) translates its own
// notifications into `HostEvent`s and sends them over a channel. Nothing
// here depends on a particular backend.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::state::StateEvent;

//=== HostEvent ===========================================================

/// Application-level notifications sent by the host to the stage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HostEvent {
    /// Drawable surface changed size.
    Resized { width: u32, height: u32 },

    /// Application window gained (`true`) or lost (`false`) focus.
    Focused(bool),

    /// Application moved to the background.
    Suspended,

    /// Application returned to the foreground.
    Resumed,

    /// Graphics context was destroyed; GPU resources are gone.
    ContextLost,

    /// A new graphics context is available.
    ContextRestored,

    /// Host requested shutdown.
    Close,
}

impl HostEvent {
    /// Lifecycle event forwarded to states, or `None` for `Close`.
    pub fn as_state_event(&self) -> Option<StateEvent> {
        match *self {
            Self::Resized { width, height } => Some(StateEvent::Resize { width, height }),
            Self::Focused(true) => Some(StateEvent::AppGainFocus),
            Self::Focused(false) => Some(StateEvent::AppLostFocus),
            Self::Suspended => Some(StateEvent::AppPause),
            Self::Resumed => Some(StateEvent::AppResume),
            Self::ContextLost => Some(StateEvent::LostContext),
            Self::ContextRestored => Some(StateEvent::NewContext),
            Self::Close => None,
        }
    }
}

//=== Tests ===============================================================
