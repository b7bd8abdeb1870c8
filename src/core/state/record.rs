//=========================================================================
// State Record
//=========================================================================
//
// Bookkeeping wrapper around one state on the stack.
//
// The lifecycle of a record is a single `Phase` value instead of a set of
// independent flags:
//
//   TransitioningIn ──done──> Active ──arm──> TransitioningOut { for_pop }
//         ↑                                        │
//      resume                          for_pop ────┼──── !for_pop
//         │                                        ↓           ↓
//       Paused <──────────────────────────────── (pause)     Popped
//
// `overlayed` stays a separate flag: a record covered by an overlay keeps
// its phase and is merely skipped by update dispatch.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::debug;

//=== Internal Dependencies ===============================================

use super::{
    Completion, PendingState, StackRequest, State, StateContext, StateEvent, StateId, Transition,
};
use crate::core::services::{EffectManager, Lifecycle, ProcessManager};

//=== Phase ===============================================================

/// Lifecycle position of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Phase {
    /// Entry animation in progress.
    TransitioningIn { starting: bool, resuming: bool },

    /// Fully entered, receiving updates.
    Active,

    /// Exit animation in progress. `for_pop` decides whether it ends in
    /// removal or in a pause.
    TransitioningOut { for_pop: bool, starting: bool },

    /// Exited for later resume.
    Paused,

    /// Exited for good, waiting for the cleanup phase to dispose it.
    Popped,
}

/// Result of a transition that reported completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TransitionEnd {
    Entered,
    Paused,
    Popped { return_value: Option<i32> },
}

//=== StateRecord =========================================================

pub(crate) struct StateRecord {
    id: StateId,
    name: String,
    descriptor: &'static str,
    overlay: bool,
    overlayed: bool,
    phase: Phase,
    completion: Completion,
    state: Box<dyn State>,
    processes: ProcessManager,
    effects: EffectManager,
}

impl StateRecord {
    //--- Construction -----------------------------------------------------

    /// Wraps a pending state. The record starts in `Active` but is only
    /// observable once placed on the stack, which begins its entry
    /// transition.
    pub(crate) fn new(pending: PendingState, overlay: bool) -> Self {
        Self {
            id: pending.id,
            name: pending.name,
            descriptor: pending.descriptor,
            overlay,
            overlayed: false,
            phase: Phase::Active,
            completion: Completion::default(),
            state: pending.state,
            processes: ProcessManager::new(),
            effects: EffectManager::new(),
        }
    }

    //--- Identity ---------------------------------------------------------

    pub(crate) fn id(&self) -> StateId {
        self.id
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn descriptor(&self) -> &'static str {
        self.descriptor
    }

    //--- Flag Views -------------------------------------------------------

    pub(crate) fn is_overlay(&self) -> bool {
        self.overlay
    }

    pub(crate) fn is_overlayed(&self) -> bool {
        self.overlayed
    }

    pub(crate) fn is_transitioning(&self) -> bool {
        matches!(
            self.phase,
            Phase::TransitioningIn { .. } | Phase::TransitioningOut { .. }
        )
    }

    pub(crate) fn is_transitioning_out(&self) -> bool {
        matches!(self.phase, Phase::TransitioningOut { .. })
    }

    pub(crate) fn is_transition_starting(&self) -> bool {
        matches!(
            self.phase,
            Phase::TransitioningIn { starting: true, .. }
                | Phase::TransitioningOut { starting: true, .. }
        )
    }

    pub(crate) fn is_inactive(&self) -> bool {
        matches!(self.phase, Phase::Paused | Phase::Popped)
    }

    pub(crate) fn is_being_popped(&self) -> bool {
        matches!(
            self.phase,
            Phase::TransitioningOut { for_pop: true, .. } | Phase::Popped
        )
    }

    /// Inactive and popped: ready for disposal.
    pub(crate) fn is_removable(&self) -> bool {
        self.phase == Phase::Popped
    }

    pub(crate) fn is_finished(&self) -> bool {
        self.completion.finished
    }

    pub(crate) fn finish(&mut self, return_value: Option<i32>) {
        self.completion.finished = true;
        if return_value.is_some() {
            self.completion.return_value = return_value;
        }
    }

    //--- Phase Changes ----------------------------------------------------

    /// Starts the entry animation.
    pub(crate) fn begin_transition_in(&mut self, resuming: bool) {
        self.phase = Phase::TransitioningIn {
            starting: true,
            resuming,
        };
    }

    /// Arms the exit animation. Returns `false` if nothing changed.
    ///
    /// A pause-exit already in flight is upgraded in place when a pop is
    /// requested; a pop-exit is never downgraded.
    pub(crate) fn arm_exit(&mut self, for_pop: bool) -> bool {
        let armed = match self.phase {
            Phase::Active | Phase::TransitioningIn { .. } => {
                self.phase = Phase::TransitioningOut {
                    for_pop,
                    starting: true,
                };
                true
            }
            Phase::TransitioningOut {
                for_pop: false,
                starting,
            } if for_pop => {
                self.phase = Phase::TransitioningOut {
                    for_pop: true,
                    starting,
                };
                true
            }
            _ => false,
        };

        if armed {
            debug!(
                "State `{}` ({}) begins exit ({})",
                self.name,
                self.id,
                if for_pop { "pop" } else { "pause" }
            );
            if for_pop {
                self.processes.remove_all();
                self.effects.remove_all();
            }
        }

        armed
    }

    //--- Lifecycle Hooks --------------------------------------------------

    pub(crate) fn push(&mut self, requests: &mut Vec<StackRequest>) {
        self.with_context(requests, |state, ctx| state.on_push(ctx));
    }

    /// Pauses in place without an exit animation.
    pub(crate) fn pause(&mut self, due_to_overlay: bool, requests: &mut Vec<StackRequest>) {
        debug!(
            "Pausing state `{}` ({}){}",
            self.name,
            self.id,
            if due_to_overlay { " under overlay" } else { "" }
        );

        if due_to_overlay {
            self.overlayed = true;
        } else {
            self.phase = Phase::Paused;
        }

        self.with_context(requests, |state, ctx| state.on_pause(ctx, due_to_overlay));
        self.processes.on_pause();
        self.effects.on_pause();
    }

    /// Resumes a paused record and starts its entry animation, or lifts
    /// the overlay pause when `from_overlay` is set.
    pub(crate) fn resume(&mut self, from_overlay: bool, requests: &mut Vec<StackRequest>) {
        debug!(
            "Resuming state `{}` ({}){}",
            self.name,
            self.id,
            if from_overlay { " from overlay" } else { "" }
        );

        if from_overlay {
            self.overlayed = false;
        } else {
            self.begin_transition_in(true);
        }

        self.with_context(requests, |state, ctx| state.on_resume(ctx, from_overlay));
        self.processes.on_resume();
        self.effects.on_resume();
    }

    pub(crate) fn update(&mut self, delta: f32, requests: &mut Vec<StackRequest>) {
        self.with_context(requests, |state, ctx| state.on_update(ctx, delta));
        self.processes.on_update(delta);
        self.effects.on_update(delta);
    }

    /// Polls the running transition and finalizes it on completion.
    ///
    /// Returns `None` while the animation is still running. Must only be
    /// called on a transitioning record.
    pub(crate) fn advance_transition(
        &mut self,
        delta: f32,
        requests: &mut Vec<StackRequest>,
    ) -> Option<TransitionEnd> {
        let transition = match self.phase {
            Phase::TransitioningIn { starting, resuming } => {
                Transition::entering(starting, resuming)
            }
            Phase::TransitioningOut { starting, .. } => Transition::leaving(starting),
            _ => return None,
        };

        let done = self.with_context(requests, |state, ctx| {
            state.on_transition(ctx, delta, transition)
        });

        match &mut self.phase {
            Phase::TransitioningIn { starting, .. } | Phase::TransitioningOut { starting, .. } => {
                *starting = false;
            }
            _ => {}
        }

        if !done {
            return None;
        }

        let end = match self.phase {
            Phase::TransitioningIn { .. } => {
                self.phase = Phase::Active;
                TransitionEnd::Entered
            }
            Phase::TransitioningOut { for_pop: true, .. } => {
                self.with_context(requests, |state, ctx| state.on_pop(ctx));
                self.phase = Phase::Popped;
                TransitionEnd::Popped {
                    return_value: self.completion.return_value,
                }
            }
            Phase::TransitioningOut { for_pop: false, .. } => {
                self.pause(false, requests);
                TransitionEnd::Paused
            }
            _ => return None,
        };

        debug!("State `{}` ({}) transition finished: {:?}", self.name, self.id, end);
        Some(end)
    }

    /// Forwards a non-tick event to the state and its collaborators.
    pub(crate) fn handle_event(&mut self, event: StateEvent, requests: &mut Vec<StackRequest>) {
        use StateEvent as E;

        self.with_context(requests, |state, ctx| match event {
            E::Render(delta) => state.on_render(ctx, delta),
            E::Resize { width, height } => state.on_resize(ctx, width, height),
            E::AppGainFocus => state.on_app_gain_focus(ctx),
            E::AppLostFocus => state.on_app_lost_focus(ctx),
            E::AppPause => state.on_app_pause(ctx),
            E::AppResume => state.on_app_resume(ctx),
            E::LostContext => state.on_lost_context(ctx),
            E::NewContext => state.on_new_context(ctx),
        });

        let services: [&mut dyn Lifecycle; 2] = [&mut self.processes, &mut self.effects];
        for services in services {
            match event {
                E::Render(delta) => services.on_render(delta),
                E::Resize { width, height } => services.on_resize(width, height),
                E::AppGainFocus => services.on_app_gain_focus(),
                E::AppLostFocus => services.on_app_lost_focus(),
                E::AppPause => services.on_app_pause(),
                E::AppResume => services.on_app_resume(),
                E::LostContext => services.on_lost_context(),
                E::NewContext => services.on_new_context(),
            }
        }
    }

    /// Calls `dispose` on the state. The record is dropped right after.
    pub(crate) fn dispose(&mut self) {
        debug!("Disposing state `{}` ({}, {})", self.name, self.id, self.descriptor);
        self.state.dispose();
    }

    //--- Internal Helpers -------------------------------------------------

    fn with_context<R>(
        &mut self,
        requests: &mut Vec<StackRequest>,
        f: impl FnOnce(&mut dyn State, &mut StateContext<'_>) -> R,
    ) -> R {
        let Self {
            id,
            name,
            completion,
            state,
            processes,
            effects,
            ..
        } = self;

        let mut ctx = StateContext::new(*id, name, completion, processes, effects, requests);
        f(&mut **state, &mut ctx)
    }
}

//=== Tests ===============================================================
