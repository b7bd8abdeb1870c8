//=========================================================================
// State System
//=========================================================================
//
// Ordered stack of interactive states (menus, gameplay, pause overlays)
// with deferred mutation and polled enter/exit transitions.
//
// Architecture:
//   StateStack
//     ├─ records: Vec<StateRecord>      (bottom → top)
//     ├─ push_queue: PendingQueue       (push / overlay)
//     └─ swap_queue: PendingQueue       (swap_top_with / swap_top_non_overlay_with)
//
// Flow (once per tick):
//   cleanup → finish detection → drain → resume → transitions → update
//
// States never touch the stack directly. Every hook receives a
// `StateContext` whose stack operations are recorded as requests and
// applied by the stack as soon as the hook returns.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

//=== Internal Dependencies ===============================================

use crate::core::services::{EffectManager, ProcessManager};

//=== Module Declarations =================================================

mod error;
mod pending;
mod record;
mod registry;
mod stack;

//=== Public API ==========================================================

pub use error::StateStackError;
pub use registry::StateRegistry;
pub use stack::{StateEvent, StateInfo, StateStack};

pub(crate) use pending::PendingQueue;
pub(crate) use record::StateRecord;

//=== StateId =============================================================

/// Stable handle to a state queued on or living in a [`StateStack`].
///
/// Handles are unique for the lifetime of the process and are never reused,
/// so a handle to a removed state simply stops matching anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateId(u64);

impl StateId {
    pub(crate) fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

//=== Transition ==========================================================

/// Describes the transition a state is being asked to animate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    out: bool,
    just_started: bool,
    resume: bool,
}

impl Transition {
    pub(crate) fn entering(just_started: bool, resume: bool) -> Self {
        Self { out: false, just_started, resume }
    }

    pub(crate) fn leaving(just_started: bool) -> Self {
        Self { out: true, just_started, resume: false }
    }

    /// `true` for an exit transition, `false` for an entry.
    pub fn is_out(&self) -> bool {
        self.out
    }

    /// `true` on the first tick of this transition.
    pub fn just_started(&self) -> bool {
        self.just_started
    }

    /// `true` when entering because a paused state is being resumed
    /// rather than freshly pushed.
    pub fn is_resume(&self) -> bool {
        self.resume
    }
}

//=== State Trait =========================================================

/// One interactive screen or mode of the application.
///
/// Every hook has an empty default, so a state only overrides what it
/// needs. Hooks receive a [`StateContext`] that gives access to the
/// state's collaborators and lets it request stack changes.
///
/// # Minimal Implementation
///
/// ```rust
/// # use aetheric_states::prelude::*;
/// struct Splash {
///     elapsed: f32,
/// }
///
/// impl State for Splash {
///     fn on_update(&mut self, ctx: &mut StateContext<'_>, delta: f32) {
///         self.elapsed += delta;
///         if self.elapsed > 2.0 {
///             ctx.set_finished();
///         }
///     }
/// }
/// ```
pub trait State: Send {
    /// Called once when the state is taken off a pending queue and placed
    /// on the stack, right before its entry transition begins.
    fn on_push(&mut self, _ctx: &mut StateContext<'_>) {}

    /// Called once when the exit transition of a permanent pop completes.
    fn on_pop(&mut self, _ctx: &mut StateContext<'_>) {}

    /// Called when the state stops receiving updates.
    ///
    /// `due_to_overlay` is `true` when an overlay was placed above it.
    fn on_pause(&mut self, _ctx: &mut StateContext<'_>, _due_to_overlay: bool) {}

    /// Counterpart of [`State::on_pause`].
    fn on_resume(&mut self, _ctx: &mut StateContext<'_>, _from_overlay: bool) {}

    fn on_app_gain_focus(&mut self, _ctx: &mut StateContext<'_>) {}

    fn on_app_lost_focus(&mut self, _ctx: &mut StateContext<'_>) {}

    fn on_app_pause(&mut self, _ctx: &mut StateContext<'_>) {}

    fn on_app_resume(&mut self, _ctx: &mut StateContext<'_>) {}

    fn on_lost_context(&mut self, _ctx: &mut StateContext<'_>) {}

    fn on_new_context(&mut self, _ctx: &mut StateContext<'_>) {}

    fn on_render(&mut self, _ctx: &mut StateContext<'_>, _delta: f32) {}

    fn on_resize(&mut self, _ctx: &mut StateContext<'_>, _width: u32, _height: u32) {}

    fn on_update(&mut self, _ctx: &mut StateContext<'_>, _delta: f32) {}

    /// Advances an entry or exit animation. Returns `true` once complete.
    ///
    /// Default implementation completes immediately (no animation).
    fn on_transition(
        &mut self,
        _ctx: &mut StateContext<'_>,
        _delta: f32,
        _transition: Transition,
    ) -> bool {
        true
    }

    /// Releases resources. Called exactly once, after the state has been
    /// popped and right before it is removed from the stack.
    fn dispose(&mut self) {}
}

impl State for Box<dyn State> {
    fn on_push(&mut self, ctx: &mut StateContext<'_>) {
        (**self).on_push(ctx)
    }

    fn on_pop(&mut self, ctx: &mut StateContext<'_>) {
        (**self).on_pop(ctx)
    }

    fn on_pause(&mut self, ctx: &mut StateContext<'_>, due_to_overlay: bool) {
        (**self).on_pause(ctx, due_to_overlay)
    }

    fn on_resume(&mut self, ctx: &mut StateContext<'_>, from_overlay: bool) {
        (**self).on_resume(ctx, from_overlay)
    }

    fn on_app_gain_focus(&mut self, ctx: &mut StateContext<'_>) {
        (**self).on_app_gain_focus(ctx)
    }

    fn on_app_lost_focus(&mut self, ctx: &mut StateContext<'_>) {
        (**self).on_app_lost_focus(ctx)
    }

    fn on_app_pause(&mut self, ctx: &mut StateContext<'_>) {
        (**self).on_app_pause(ctx)
    }

    fn on_app_resume(&mut self, ctx: &mut StateContext<'_>) {
        (**self).on_app_resume(ctx)
    }

    fn on_lost_context(&mut self, ctx: &mut StateContext<'_>) {
        (**self).on_lost_context(ctx)
    }

    fn on_new_context(&mut self, ctx: &mut StateContext<'_>) {
        (**self).on_new_context(ctx)
    }

    fn on_render(&mut self, ctx: &mut StateContext<'_>, delta: f32) {
        (**self).on_render(ctx, delta)
    }

    fn on_resize(&mut self, ctx: &mut StateContext<'_>, width: u32, height: u32) {
        (**self).on_resize(ctx, width, height)
    }

    fn on_update(&mut self, ctx: &mut StateContext<'_>, delta: f32) {
        (**self).on_update(ctx, delta)
    }

    fn on_transition(
        &mut self,
        ctx: &mut StateContext<'_>,
        delta: f32,
        transition: Transition,
    ) -> bool {
        (**self).on_transition(ctx, delta, transition)
    }

    fn dispose(&mut self) {
        (**self).dispose()
    }
}

//=== Pending State =======================================================

/// A state value plus the identity it will carry on the stack.
pub(crate) struct PendingState {
    pub(crate) id: StateId,
    pub(crate) name: String,
    pub(crate) descriptor: &'static str,
    pub(crate) state: Box<dyn State>,
}

impl PendingState {
    pub(crate) fn new<S>(state: S, name: Option<&str>) -> Self
    where
        S: State + 'static,
    {
        let descriptor = std::any::type_name::<S>();
        let name = name.map_or_else(|| short_type_name(descriptor), str::to_owned);

        Self {
            id: StateId::next(),
            name,
            descriptor,
            state: Box::new(state),
        }
    }
}

/// Strips the module path from the outermost type of a `type_name`.
fn short_type_name(descriptor: &str) -> String {
    let (head, generics) = match descriptor.find('<') {
        Some(pos) => descriptor.split_at(pos),
        None => (descriptor, ""),
    };
    let base = head.rsplit("::").next().unwrap_or(head);
    format!("{base}{generics}")
}

//=== Stack Requests ======================================================

/// Stack operation recorded by a state through its context.
pub(crate) enum StackRequest {
    Push(PendingState),
    Overlay(PendingState),
    SwapTop(PendingState),
    SwapTopNonOverlay(PendingState),
    Pop,
    PopTopNonOverlay,
}

//=== Completion ==========================================================

/// Finished flag and optional return value, polled by the stack.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Completion {
    pub(crate) finished: bool,
    pub(crate) return_value: Option<i32>,
}

//=== StateContext ========================================================

/// Per-hook view of a state's identity, collaborators and stack access.
///
/// Stack operations issued here are deferred: they are applied right
/// after the current hook returns, exactly as if the caller had invoked
/// the matching [`StateStack`] method at that point. Errors they produce
/// are reported by the stack call that dispatched the hook.
pub struct StateContext<'a> {
    id: StateId,
    name: &'a str,
    completion: &'a mut Completion,
    processes: &'a mut ProcessManager,
    effects: &'a mut EffectManager,
    requests: &'a mut Vec<StackRequest>,
}

impl<'a> StateContext<'a> {
    pub(crate) fn new(
        id: StateId,
        name: &'a str,
        completion: &'a mut Completion,
        processes: &'a mut ProcessManager,
        effects: &'a mut EffectManager,
        requests: &'a mut Vec<StackRequest>,
    ) -> Self {
        Self {
            id,
            name,
            completion,
            processes,
            effects,
            requests,
        }
    }

    //--- Identity ---------------------------------------------------------

    pub fn id(&self) -> StateId {
        self.id
    }

    pub fn name(&self) -> &str {
        self.name
    }

    //--- Completion -------------------------------------------------------

    /// Marks the state as logically complete, without a return value.
    pub fn set_finished(&mut self) {
        self.completion.finished = true;
    }

    /// Marks the state as complete and records the value reported by
    /// [`StateStack::last_return_value`] once it has been popped.
    pub fn set_finished_with(&mut self, value: i32) {
        self.completion.finished = true;
        self.completion.return_value = Some(value);
    }

    pub fn is_finished(&self) -> bool {
        self.completion.finished
    }

    //--- Collaborators ----------------------------------------------------

    pub fn processes(&mut self) -> &mut ProcessManager {
        self.processes
    }

    pub fn effects(&mut self) -> &mut EffectManager {
        self.effects
    }

    //--- Stack Requests ---------------------------------------------------

    /// See [`StateStack::push`].
    pub fn push<S: State + 'static>(&mut self, state: S) -> StateId {
        self.request(StackRequest::Push, state, None)
    }

    pub fn push_named<S: State + 'static>(&mut self, name: &str, state: S) -> StateId {
        self.request(StackRequest::Push, state, Some(name))
    }

    /// See [`StateStack::overlay`].
    pub fn overlay<S: State + 'static>(&mut self, state: S) -> StateId {
        self.request(StackRequest::Overlay, state, None)
    }

    pub fn overlay_named<S: State + 'static>(&mut self, name: &str, state: S) -> StateId {
        self.request(StackRequest::Overlay, state, Some(name))
    }

    /// See [`StateStack::swap_top_with`].
    pub fn swap_top_with<S: State + 'static>(&mut self, state: S) -> StateId {
        self.request(StackRequest::SwapTop, state, None)
    }

    pub fn swap_top_with_named<S: State + 'static>(&mut self, name: &str, state: S) -> StateId {
        self.request(StackRequest::SwapTop, state, Some(name))
    }

    /// See [`StateStack::swap_top_non_overlay_with`].
    pub fn swap_top_non_overlay_with<S: State + 'static>(&mut self, state: S) -> StateId {
        self.request(StackRequest::SwapTopNonOverlay, state, None)
    }

    pub fn swap_top_non_overlay_with_named<S: State + 'static>(
        &mut self,
        name: &str,
        state: S,
    ) -> StateId {
        self.request(StackRequest::SwapTopNonOverlay, state, Some(name))
    }

    /// See [`StateStack::pop`].
    pub fn pop(&mut self) {
        self.requests.push(StackRequest::Pop);
    }

    /// See [`StateStack::pop_top_non_overlay`].
    pub fn pop_top_non_overlay(&mut self) {
        self.requests.push(StackRequest::PopTopNonOverlay);
    }

    fn request<S, F>(&mut self, make: F, state: S, name: Option<&str>) -> StateId
    where
        S: State + 'static,
        F: FnOnce(PendingState) -> StackRequest,
    {
        let pending = PendingState::new(state, name);
        let id = pending.id;
        self.requests.push(make(pending));
        id
    }
}

//=== Tests ===============================================================
