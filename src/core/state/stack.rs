//=========================================================================
// State Stack
//=========================================================================
//
// Orchestrates the ordered state sequence, its pending queues and the
// per-tick lifecycle machine.
//
// Stack operations (push/overlay/swap/pop) only enqueue records and arm
// exit transitions. The sequence itself changes only inside `update`,
// which runs these phases in a fixed order:
//
//   1. reset        last return value, overlay-cleanup marker
//   2. cleanup      dispose + remove popped records
//   3. finish       start popping a finished top non-overlay (+ overlays)
//   4. drain        move the push or swap queue onto the stack
//   5. resume       wake the exposed top after removals
//   6. transitions  poll entry/exit animations, finalize completed ones
//   7. update       per-frame update of the live active range
//
// Phases 2–5 are skipped while any record is transitioning.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::ops::Range;

use log::{debug, error, trace};

//=== Internal Dependencies ===============================================

use super::record::TransitionEnd;
use super::{
    PendingQueue, PendingState, StackRequest, State, StateId, StateRecord, StateStackError,
};

//=== StateEvent ==========================================================

/// Non-tick events forwarded to the live active range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StateEvent {
    Render(f32),
    Resize { width: u32, height: u32 },
    AppGainFocus,
    AppLostFocus,
    AppPause,
    AppResume,
    LostContext,
    NewContext,
}

//=== StateInfo ===========================================================

/// Read-only view of one record's lifecycle flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateInfo {
    pub id: StateId,
    pub name: String,
    pub is_overlay: bool,
    pub is_overlayed: bool,
    pub is_transitioning: bool,
    pub is_transitioning_out: bool,
    pub is_transition_starting: bool,
    pub is_inactive: bool,
    pub is_being_popped: bool,
}

impl StateInfo {
    fn of(record: &StateRecord) -> Self {
        Self {
            id: record.id(),
            name: record.name().to_owned(),
            is_overlay: record.is_overlay(),
            is_overlayed: record.is_overlayed(),
            is_transitioning: record.is_transitioning(),
            is_transitioning_out: record.is_transitioning_out(),
            is_transition_starting: record.is_transition_starting(),
            is_inactive: record.is_inactive(),
            is_being_popped: record.is_being_popped(),
        }
    }
}

//=== StateStack ==========================================================

/// Ordered stack of states with deferred mutation.
///
/// The *active range* runs from the topmost non-overlay record to the top
/// of the stack. Only records in that range receive updates, transitions
/// and events.
///
/// # Example
///
/// ```rust
/// # use aetheric_states::prelude::*;
/// struct Game;
/// impl State for Game {}
///
/// struct PauseMenu;
/// impl State for PauseMenu {}
///
/// let mut stack = StateStack::new();
/// let game = stack.push(Game).unwrap();
/// stack.update(0.016).unwrap();
/// assert!(stack.is_top_state(game));
///
/// let menu = stack.overlay(PauseMenu).unwrap();
/// stack.update(0.016).unwrap();
/// assert!(stack.is_top_state(menu));
/// ```
#[derive(Default)]
pub struct StateStack {
    records: Vec<StateRecord>,
    push_queue: PendingQueue,
    swap_queue: PendingQueue,
    requests: Vec<StackRequest>,
    last_return_value: Option<i32>,
    removed_only_overlays: bool,
}

impl StateStack {
    //--- Construction -----------------------------------------------------

    pub fn new() -> Self {
        Self::default()
    }

    //--- Stack Operations -------------------------------------------------

    /// Queues a non-overlay state.
    ///
    /// Every live record in the active range immediately begins an exit
    /// transition that ends in a pause; they are resumed once the new
    /// state is popped.
    ///
    /// # Errors
    ///
    /// [`StateStackError::OverlayPending`] if an overlay is already waiting
    /// in the push queue.
    pub fn push<S: State + 'static>(&mut self, state: S) -> Result<StateId, StateStackError> {
        self.queue_push(PendingState::new(state, None), false)
    }

    pub fn push_named<S: State + 'static>(
        &mut self,
        name: &str,
        state: S,
    ) -> Result<StateId, StateStackError> {
        self.queue_push(PendingState::new(state, Some(name)), false)
    }

    /// Queues an overlay. Records below are paused in place when it is
    /// placed on the stack.
    pub fn overlay<S: State + 'static>(&mut self, state: S) -> Result<StateId, StateStackError> {
        self.queue_push(PendingState::new(state, None), true)
    }

    pub fn overlay_named<S: State + 'static>(
        &mut self,
        name: &str,
        state: S,
    ) -> Result<StateId, StateStackError> {
        self.queue_push(PendingState::new(state, Some(name)), true)
    }

    /// Replaces the top record. The new state inherits its overlay flag.
    ///
    /// # Errors
    ///
    /// [`StateStackError::Empty`] if the stack has no records, or
    /// [`StateStackError::OverlayPending`] when queuing a non-overlay while
    /// the swap queue holds an overlay.
    pub fn swap_top_with<S: State + 'static>(
        &mut self,
        state: S,
    ) -> Result<StateId, StateStackError> {
        self.queue_swap_top(PendingState::new(state, None))
    }

    pub fn swap_top_with_named<S: State + 'static>(
        &mut self,
        name: &str,
        state: S,
    ) -> Result<StateId, StateStackError> {
        self.queue_swap_top(PendingState::new(state, Some(name)))
    }

    /// Replaces the top non-overlay record, evicting every overlay above it.
    pub fn swap_top_non_overlay_with<S: State + 'static>(
        &mut self,
        state: S,
    ) -> Result<StateId, StateStackError> {
        self.queue_swap_top_non_overlay(PendingState::new(state, None))
    }

    pub fn swap_top_non_overlay_with_named<S: State + 'static>(
        &mut self,
        name: &str,
        state: S,
    ) -> Result<StateId, StateStackError> {
        self.queue_swap_top_non_overlay(PendingState::new(state, Some(name)))
    }

    /// Starts popping the top record.
    ///
    /// # Errors
    ///
    /// Fails if any record is transitioning, if the stack is empty, or if
    /// the top record is already inactive.
    pub fn pop(&mut self) -> Result<(), StateStackError> {
        const OPERATION: &str = "pop";

        self.ensure_settled(OPERATION)?;
        let top = self
            .records
            .last_mut()
            .ok_or(StateStackError::Empty { operation: OPERATION })?;

        if !top.arm_exit(true) {
            return Err(StateStackError::Inactive {
                operation: OPERATION,
                name: top.name().to_owned(),
            });
        }

        Ok(())
    }

    /// Starts popping the top non-overlay record and every live overlay
    /// above it.
    pub fn pop_top_non_overlay(&mut self) -> Result<(), StateStackError> {
        const OPERATION: &str = "pop the top non-overlay state";

        self.ensure_settled(OPERATION)?;
        if self.records.is_empty() {
            return Err(StateStackError::Empty { operation: OPERATION });
        }

        let range = self.active_range();
        let base = range.start;
        if self.arm_range(range, true) == 0 {
            return Err(StateStackError::Inactive {
                operation: OPERATION,
                name: self.records[base].name().to_owned(),
            });
        }

        Ok(())
    }

    /// Marks a live or queued state as finished, as if it had called
    /// [`StateContext::set_finished_with`](super::StateContext::set_finished_with)
    /// itself.
    pub fn finish(&mut self, id: StateId, return_value: Option<i32>) -> Result<(), StateStackError> {
        let record = self
            .records
            .iter_mut()
            .chain(self.push_queue.iter_mut())
            .chain(self.swap_queue.iter_mut())
            .find(|record| record.id() == id)
            .ok_or(StateStackError::UnknownState(id))?;

        record.finish(return_value);
        Ok(())
    }

    //--- Query API --------------------------------------------------------

    /// `true` while the state is running an entry or exit transition.
    pub fn is_state_transitioning(&self, id: StateId) -> bool {
        self.record(id).is_some_and(StateRecord::is_transitioning)
    }

    /// `true` if the state is the topmost record on the stack.
    pub fn is_top_state(&self, id: StateId) -> bool {
        self.records.last().is_some_and(|record| record.id() == id)
    }

    /// `true` if a state with this name is on the stack or queued, and is
    /// not already popped awaiting removal.
    pub fn has_state(&self, name: &str) -> bool {
        self.records
            .iter()
            .chain(self.push_queue.iter())
            .chain(self.swap_queue.iter())
            .any(|record| record.name() == name && !record.is_removable())
    }

    /// `true` if the state is on the stack and neither paused nor popped.
    pub fn is_state_active(&self, id: StateId) -> bool {
        self.record(id).is_some_and(|record| !record.is_inactive())
    }

    /// `true` if the state is paused because an overlay covers it.
    pub fn is_state_overlayed(&self, id: StateId) -> bool {
        self.record(id).is_some_and(StateRecord::is_overlayed)
    }

    /// Return value of a state whose pop finalized during the last tick.
    ///
    /// Cleared at the start of every tick.
    pub fn last_return_value(&self) -> Option<i32> {
        self.last_return_value
    }

    /// Number of records on the stack, excluding queued ones.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// `true` when the stack and both queues are empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty() && !self.has_pending()
    }

    /// `true` while a push or swap is waiting to be drained.
    pub fn has_pending(&self) -> bool {
        !self.push_queue.is_empty() || !self.swap_queue.is_empty()
    }

    /// Names of the records on the stack, bottom to top.
    pub fn names(&self) -> Vec<&str> {
        self.records.iter().map(StateRecord::name).collect()
    }

    /// Flag snapshot of every record on the stack, bottom to top.
    pub fn snapshot(&self) -> Vec<StateInfo> {
        self.records.iter().map(StateInfo::of).collect()
    }

    //--- Update Loop ------------------------------------------------------

    /// Runs one tick of the lifecycle machine.
    ///
    /// # Errors
    ///
    /// Returns the first error produced by a stack request issued from a
    /// state hook during this tick. The tick itself always runs to the end.
    ///
    /// # Panics
    ///
    /// Panics if both the push queue and the swap queue hold records when
    /// they are drained. Mixing the two before a drain is a usage bug the
    /// stack cannot order safely.
    pub fn update(&mut self, delta: f32) -> Result<(), StateStackError> {
        let mut failure = None;

        //--- Phase 1: Reset ---------------------------------------------------
        self.last_return_value = None;
        self.removed_only_overlays = false;

        //--- Phase 2: Cleanup -------------------------------------------------
        self.cleanup();

        //--- Phase 3: Finish detection ----------------------------------------
        self.detect_finished();

        //--- Phase 4: Queue drain ---------------------------------------------
        self.drain_pending(&mut failure);

        //--- Phase 5: Resume detection ----------------------------------------
        self.detect_resume(&mut failure);

        //--- Phase 6: Transition advancement ----------------------------------
        self.advance_transitions(delta, &mut failure);

        //--- Phase 7: Update dispatch -----------------------------------------
        self.dispatch_update(delta, &mut failure);

        failure.map_or(Ok(()), Err)
    }

    //--- Event Dispatch ---------------------------------------------------

    /// Forwards an event to every live record in the active range.
    pub fn dispatch(&mut self, event: StateEvent) -> Result<(), StateStackError> {
        let mut failure = None;

        for index in self.active_range() {
            let record = &mut self.records[index];
            if record.is_inactive() {
                continue;
            }

            record.handle_event(event, &mut self.requests);
            self.flush_requests(&mut failure);
        }

        failure.map_or(Ok(()), Err)
    }

    pub fn on_render(&mut self, delta: f32) -> Result<(), StateStackError> {
        self.dispatch(StateEvent::Render(delta))
    }

    pub fn on_resize(&mut self, width: u32, height: u32) -> Result<(), StateStackError> {
        self.dispatch(StateEvent::Resize { width, height })
    }

    pub fn on_app_gain_focus(&mut self) -> Result<(), StateStackError> {
        self.dispatch(StateEvent::AppGainFocus)
    }

    pub fn on_app_lost_focus(&mut self) -> Result<(), StateStackError> {
        self.dispatch(StateEvent::AppLostFocus)
    }

    pub fn on_app_pause(&mut self) -> Result<(), StateStackError> {
        self.dispatch(StateEvent::AppPause)
    }

    pub fn on_app_resume(&mut self) -> Result<(), StateStackError> {
        self.dispatch(StateEvent::AppResume)
    }

    pub fn on_lost_context(&mut self) -> Result<(), StateStackError> {
        self.dispatch(StateEvent::LostContext)
    }

    pub fn on_new_context(&mut self) -> Result<(), StateStackError> {
        self.dispatch(StateEvent::NewContext)
    }

    //--- Tick Phases ------------------------------------------------------

    fn cleanup(&mut self) {
        if self.any_transitioning() {
            return;
        }

        let mut removed_any = false;
        let mut removed_non_overlay = false;

        self.records.retain_mut(|record| {
            if !record.is_removable() {
                return true;
            }

            removed_any = true;
            removed_non_overlay |= !record.is_overlay();
            record.dispose();
            false
        });

        self.removed_only_overlays = removed_any && !removed_non_overlay;
    }

    fn detect_finished(&mut self) {
        if self.any_transitioning() {
            return;
        }

        let Some(base) = self.top_non_overlay() else {
            return;
        };

        let record = &self.records[base];
        if record.is_inactive() || !record.is_finished() {
            return;
        }

        debug!("State `{}` ({}) finished", record.name(), record.id());

        // Overlays never outlive the record they cover
        let len = self.records.len();
        self.arm_range(base..len, true);
    }

    fn drain_pending(&mut self, failure: &mut Option<StateStackError>) {
        if self.any_transitioning() {
            return;
        }

        let push_pending = !self.push_queue.is_empty();
        let swap_pending = !self.swap_queue.is_empty();

        assert!(
            !(push_pending && swap_pending),
            "state stack invariant violated: push queue ({}) and swap queue ({}) both pending at drain",
            self.push_queue.len(),
            self.swap_queue.len()
        );

        let queued = if push_pending {
            self.push_queue.take()
        } else if swap_pending {
            self.swap_queue.take()
        } else {
            return;
        };

        for mut record in queued {
            if record.is_overlay() {
                self.pause_top_under_overlay(failure);
            } else {
                self.pause_live_range(failure);
            }

            debug!(
                "Placing {} `{}` ({}) on the stack",
                if record.is_overlay() { "overlay" } else { "state" },
                record.name(),
                record.id()
            );

            record.push(&mut self.requests);
            record.begin_transition_in(false);
            self.records.push(record);
            self.flush_requests(failure);
        }
    }

    fn detect_resume(&mut self, failure: &mut Option<StateStackError>) {
        if self.any_transitioning() {
            return;
        }

        let Some(top) = self.records.last_mut() else {
            return;
        };

        if self.removed_only_overlays && top.is_overlayed() && !top.is_inactive() {
            top.resume(true, &mut self.requests);
            self.flush_requests(failure);
        } else if top.is_inactive() {
            for index in self.active_range() {
                let record = &mut self.records[index];
                if record.is_removable() || !record.is_inactive() {
                    continue;
                }

                record.resume(false, &mut self.requests);
                self.flush_requests(failure);
            }
        }
    }

    fn advance_transitions(&mut self, delta: f32, failure: &mut Option<StateStackError>) {
        for index in self.active_range() {
            let record = &mut self.records[index];
            if !record.is_transitioning() {
                continue;
            }

            // Overlays popped alongside a finished state must not erase its value
            let end = record.advance_transition(delta, &mut self.requests);
            if let Some(TransitionEnd::Popped {
                return_value: Some(value),
            }) = end
            {
                self.last_return_value = Some(value);
            }

            self.flush_requests(failure);
        }
    }

    fn dispatch_update(&mut self, delta: f32, failure: &mut Option<StateStackError>) {
        for index in self.active_range() {
            let record = &mut self.records[index];
            if record.is_inactive() || record.is_overlayed() {
                continue;
            }

            record.update(delta, &mut self.requests);
            self.flush_requests(failure);
        }
    }

    //--- Queueing Helpers -------------------------------------------------

    fn queue_push(&mut self, pending: PendingState, overlay: bool) -> Result<StateId, StateStackError> {
        if !overlay {
            if let Some(queued) = self.push_queue.queued_overlay() {
                return Err(StateStackError::OverlayPending {
                    name: pending.name,
                    overlay: queued.name().to_owned(),
                });
            }
        }

        let record = StateRecord::new(pending, overlay);
        let id = record.id();
        trace!("Queued push of `{}` ({}, {})", record.name(), id, record.descriptor());

        if !overlay {
            let range = self.active_range();
            self.arm_range(range, false);
        }

        self.push_queue.push(record);
        Ok(id)
    }

    fn queue_swap_top(&mut self, pending: PendingState) -> Result<StateId, StateStackError> {
        let Some(top) = self.records.last() else {
            return Err(StateStackError::Empty {
                operation: "swap the top state",
            });
        };

        let overlay = top.is_overlay();
        self.check_swap_queue(&pending, overlay)?;

        let record = StateRecord::new(pending, overlay);
        let id = record.id();
        trace!("Queued swap to `{}` ({}, {})", record.name(), id, record.descriptor());

        if let Some(top) = self.records.last_mut() {
            top.arm_exit(true);
        }

        self.swap_queue.push(record);
        Ok(id)
    }

    fn queue_swap_top_non_overlay(
        &mut self,
        pending: PendingState,
    ) -> Result<StateId, StateStackError> {
        if self.records.is_empty() {
            return Err(StateStackError::Empty {
                operation: "swap the top non-overlay state",
            });
        }

        self.check_swap_queue(&pending, false)?;

        let record = StateRecord::new(pending, false);
        let id = record.id();
        trace!("Queued swap to `{}` ({}, {})", record.name(), id, record.descriptor());

        let range = self.active_range();
        self.arm_range(range, true);

        self.swap_queue.push(record);
        Ok(id)
    }

    fn check_swap_queue(&self, pending: &PendingState, overlay: bool) -> Result<(), StateStackError> {
        if overlay {
            return Ok(());
        }

        match self.swap_queue.queued_overlay() {
            Some(queued) => Err(StateStackError::OverlayPending {
                name: pending.name.clone(),
                overlay: queued.name().to_owned(),
            }),
            None => Ok(()),
        }
    }

    //--- Request Handling -------------------------------------------------

    /// Applies stack requests issued by the hook that just returned.
    fn flush_requests(&mut self, failure: &mut Option<StateStackError>) {
        if self.requests.is_empty() {
            return;
        }

        for request in std::mem::take(&mut self.requests) {
            if let Err(err) = self.apply_request(request) {
                error!("State stack request failed: {}", err);
                failure.get_or_insert(err);
            }
        }
    }

    fn apply_request(&mut self, request: StackRequest) -> Result<(), StateStackError> {
        match request {
            StackRequest::Push(pending) => self.queue_push(pending, false).map(drop),
            StackRequest::Overlay(pending) => self.queue_push(pending, true).map(drop),
            StackRequest::SwapTop(pending) => self.queue_swap_top(pending).map(drop),
            StackRequest::SwapTopNonOverlay(pending) => {
                self.queue_swap_top_non_overlay(pending).map(drop)
            }
            StackRequest::Pop => self.pop(),
            StackRequest::PopTopNonOverlay => self.pop_top_non_overlay(),
        }
    }

    //--- Internal Helpers -------------------------------------------------

    fn record(&self, id: StateId) -> Option<&StateRecord> {
        self.records.iter().find(|record| record.id() == id)
    }

    fn any_transitioning(&self) -> bool {
        self.records.iter().any(StateRecord::is_transitioning)
    }

    fn ensure_settled(&self, operation: &'static str) -> Result<(), StateStackError> {
        if self.any_transitioning() {
            return Err(StateStackError::Transitioning { operation });
        }
        Ok(())
    }

    fn top_non_overlay(&self) -> Option<usize> {
        self.records.iter().rposition(|record| !record.is_overlay())
    }

    /// Top non-overlay through top, inclusive. Starts at 0 when the stack
    /// holds only overlays.
    fn active_range(&self) -> Range<usize> {
        self.top_non_overlay().unwrap_or(0)..self.records.len()
    }

    /// Arms an exit on every record in `range`. Returns how many changed.
    fn arm_range(&mut self, range: Range<usize>, for_pop: bool) -> usize {
        self.records[range]
            .iter_mut()
            .map(|record| record.arm_exit(for_pop))
            .filter(|&armed| armed)
            .count()
    }

    fn pause_top_under_overlay(&mut self, failure: &mut Option<StateStackError>) {
        let Some(top) = self.records.last_mut() else {
            return;
        };

        if top.is_inactive() || top.is_overlayed() {
            return;
        }

        top.pause(true, &mut self.requests);
        self.flush_requests(failure);
    }

    /// Pauses in place any live record left in the active range, so a
    /// drained non-overlay never lands on another live non-overlay.
    fn pause_live_range(&mut self, failure: &mut Option<StateStackError>) {
        for index in self.active_range() {
            let record = &mut self.records[index];
            if record.is_inactive() {
                continue;
            }

            record.pause(false, &mut self.requests);
            self.flush_requests(failure);
        }
    }
}

//=== Tests ===============================================================
