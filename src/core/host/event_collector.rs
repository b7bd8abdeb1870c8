//=========================================================================
// Event Collector
//=========================================================================
//
// Host event collector with bounded polling and shutdown detection.
//
// Architecture:
//   Receiver<HostEvent> → collect_frame() → frame events → TickControl
//
// Bounded polling prevents a flooding host from starving the tick.
//
//=========================================================================

//=== External Dependencies ===============================================

use crossbeam_channel::{Receiver, TryRecvError};
use log::warn;

//=== Internal Dependencies ===============================================

use super::HostEvent;
use crate::core::state::StateEvent;

//=== TickControl =========================================================

/// Update loop control signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickControl {
    Continue,
    Exit,
}

//=== EventCollector ======================================================

/// Collects host events for one frame.
pub(crate) struct EventCollector {
    receiver: Receiver<HostEvent>,
    events: Vec<StateEvent>,
    max_events_per_frame: usize,
}

impl EventCollector {
    pub(crate) fn new(receiver: Receiver<HostEvent>, max_events_per_frame: usize) -> Self {
        Self {
            receiver,
            events: Vec::with_capacity(8),
            max_events_per_frame,
        }
    }

    /// Collects pending host events (bounded to prevent starvation).
    ///
    /// Events left over past the bound stay in the channel for the next
    /// frame.
    pub(crate) fn collect_frame(&mut self) -> TickControl {
        self.events.clear();
        let mut drained = 0;

        while drained < self.max_events_per_frame {
            match self.receiver.try_recv() {
                Ok(event) => {
                    drained += 1;
                    match event.as_state_event() {
                        Some(state_event) => self.events.push(state_event),
                        None => return TickControl::Exit,
                    }
                }
                Err(TryRecvError::Disconnected) => return TickControl::Exit,
                Err(TryRecvError::Empty) => break,
            }
        }

        if drained >= self.max_events_per_frame {
            warn!("Host event backlog: drained {} events this frame", drained);
        }

        TickControl::Continue
    }

    /// Returns the events collected for this frame.
    pub(crate) fn events(&self) -> &[StateEvent] {
        &self.events
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
