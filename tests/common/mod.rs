//=========================================================================
// Shared Test Helpers
//=========================================================================
//
// A scripted state that journals every lifecycle call and animates its
// transitions for a fixed number of frames.
//
//=========================================================================

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use aetheric_states::prelude::*;

//=== Journal =============================================================

/// One lifecycle call made on a scripted state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Push,
    Pop,
    Pause { overlay: bool },
    Resume { overlay: bool },
    Update,
    Render,
    Transition { out: bool, started: bool },
    Dispose,
}

#[derive(Debug, Clone, Default)]
pub struct Journal(Arc<Mutex<Vec<(&'static str, Call)>>>);

impl Journal {
    pub fn record(&self, name: &'static str, call: Call) {
        self.0.lock().unwrap().push((name, call));
    }

    /// Takes every entry recorded so far.
    pub fn take(&self) -> Vec<(&'static str, Call)> {
        std::mem::take(&mut *self.0.lock().unwrap())
    }

    /// Takes the entries of one state, dropping the rest.
    pub fn take_for(&self, name: &str) -> Vec<Call> {
        self.take()
            .into_iter()
            .filter(|(who, _)| *who == name)
            .map(|(_, call)| call)
            .collect()
    }
}

//=== Scripted ============================================================

/// State whose transitions take `frames` polls to complete.
pub struct Scripted {
    name: &'static str,
    frames: u32,
    remaining: u32,
    journal: Journal,
}

impl Scripted {
    /// Transitions complete on the first poll.
    pub fn instant(name: &'static str, journal: &Journal) -> Self {
        Self::animated(name, 1, journal)
    }

    pub fn animated(name: &'static str, frames: u32, journal: &Journal) -> Self {
        Self {
            name,
            frames: frames.max(1),
            remaining: 0,
            journal: journal.clone(),
        }
    }
}

impl State for Scripted {
    fn on_push(&mut self, _ctx: &mut StateContext<'_>) {
        self.journal.record(self.name, Call::Push);
    }

    fn on_pop(&mut self, _ctx: &mut StateContext<'_>) {
        self.journal.record(self.name, Call::Pop);
    }

    fn on_pause(&mut self, _ctx: &mut StateContext<'_>, due_to_overlay: bool) {
        self.journal.record(self.name, Call::Pause { overlay: due_to_overlay });
    }

    fn on_resume(&mut self, _ctx: &mut StateContext<'_>, from_overlay: bool) {
        self.journal.record(self.name, Call::Resume { overlay: from_overlay });
    }

    fn on_update(&mut self, _ctx: &mut StateContext<'_>, _delta: f32) {
        self.journal.record(self.name, Call::Update);
    }

    fn on_render(&mut self, _ctx: &mut StateContext<'_>, _delta: f32) {
        self.journal.record(self.name, Call::Render);
    }

    fn on_transition(
        &mut self,
        _ctx: &mut StateContext<'_>,
        _delta: f32,
        transition: Transition,
    ) -> bool {
        self.journal.record(
            self.name,
            Call::Transition {
                out: transition.is_out(),
                started: transition.just_started(),
            },
        );

        if transition.just_started() {
            self.remaining = self.frames;
        }
        self.remaining = self.remaining.saturating_sub(1);
        self.remaining == 0
    }

    fn dispose(&mut self) {
        self.journal.record(self.name, Call::Dispose);
    }
}

//=== Queries =============================================================

pub fn info(stack: &StateStack, id: StateId) -> Option<StateInfo> {
    stack.snapshot().into_iter().find(|info| info.id == id)
}
