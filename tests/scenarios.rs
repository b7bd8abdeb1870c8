//=========================================================================
// Lifecycle Scenarios
//=========================================================================
//
// End-to-end runs of the state stack through its public API.
//
//=========================================================================

mod common;

use aetheric_states::prelude::*;
use common::{info, Call, Journal, Scripted};

const DT: f32 = 1.0 / 60.0;

fn entered() -> Call {
    Call::Transition { out: false, started: true }
}

fn left() -> Call {
    Call::Transition { out: true, started: true }
}

//=== Push ================================================================

#[test]
fn pushed_state_enters_and_updates_on_first_tick() {
    let journal = Journal::default();
    let mut stack = StateStack::new();

    let x = stack.push_named("x", Scripted::instant("x", &journal)).unwrap();
    assert!(stack.has_pending());
    assert!(stack.has_state("x"));
    assert_eq!(stack.len(), 0);

    stack.update(DT).unwrap();

    assert!(stack.is_state_active(x));
    assert!(stack.is_top_state(x));
    assert!(!stack.is_state_transitioning(x));
    assert_eq!(journal.take_for("x"), [Call::Push, entered(), Call::Update]);
}

#[test]
fn animated_entry_keeps_updating_while_it_plays() {
    let journal = Journal::default();
    let mut stack = StateStack::new();
    let x = stack.push_named("x", Scripted::animated("x", 3, &journal)).unwrap();

    stack.update(DT).unwrap();
    assert!(stack.is_state_transitioning(x));
    stack.update(DT).unwrap();
    assert!(stack.is_state_transitioning(x));
    stack.update(DT).unwrap();
    assert!(!stack.is_state_transitioning(x));

    assert_eq!(
        journal.take_for("x"),
        [
            Call::Push,
            entered(),
            Call::Update,
            Call::Transition { out: false, started: false },
            Call::Update,
            Call::Transition { out: false, started: false },
            Call::Update,
        ]
    );
}

//=== Overlay =============================================================

#[test]
fn overlay_pauses_the_state_below_in_place() {
    let journal = Journal::default();
    let mut stack = StateStack::new();
    let x = stack.push_named("x", Scripted::instant("x", &journal)).unwrap();
    stack.update(DT).unwrap();
    journal.take();

    let y = stack.overlay_named("y", Scripted::instant("y", &journal)).unwrap();
    stack.update(DT).unwrap();

    assert!(stack.is_state_overlayed(x));
    assert!(stack.is_state_active(x));
    assert!(stack.is_state_active(y));
    assert_eq!(
        journal.take(),
        [
            ("x", Call::Pause { overlay: true }),
            ("y", Call::Push),
            ("y", entered()),
            ("y", Call::Update),
        ]
    );

    // Covered states still render
    stack.on_render(DT).unwrap();
    assert_eq!(journal.take(), [("x", Call::Render), ("y", Call::Render)]);
}

#[test]
fn popping_overlay_resumes_the_state_below() {
    let journal = Journal::default();
    let mut stack = StateStack::new();
    let x = stack.push_named("x", Scripted::instant("x", &journal)).unwrap();
    stack.update(DT).unwrap();
    let y = stack.overlay_named("y", Scripted::instant("y", &journal)).unwrap();
    stack.update(DT).unwrap();
    journal.take();

    stack.pop().unwrap();
    stack.update(DT).unwrap();
    assert_eq!(journal.take(), [("y", left()), ("y", Call::Pop)]);
    assert!(stack.is_state_overlayed(x));

    stack.update(DT).unwrap();
    assert_eq!(
        journal.take(),
        [
            ("y", Call::Dispose),
            ("x", Call::Resume { overlay: true }),
            ("x", Call::Update),
        ]
    );
    assert!(!stack.is_state_overlayed(x));
    assert!(info(&stack, y).is_none());
    assert_eq!(stack.names(), ["x"]);
}

//=== Finish ==============================================================

#[test]
fn finished_state_pops_and_reports_return_value_for_one_tick() {
    let journal = Journal::default();
    let mut stack = StateStack::new();
    let x = stack.push_named("x", Scripted::instant("x", &journal)).unwrap();
    stack.update(DT).unwrap();

    stack.finish(x, Some(42)).unwrap();
    stack.update(DT).unwrap();

    assert_eq!(stack.last_return_value(), Some(42));
    assert!(info(&stack, x).is_some_and(|x| x.is_being_popped && x.is_inactive));
    assert!(!stack.has_state("x"));

    stack.update(DT).unwrap();
    assert_eq!(stack.last_return_value(), None);
    assert!(stack.is_empty());
    assert_eq!(journal.take_for("x").last(), Some(&Call::Dispose));
}

#[test]
fn finished_state_takes_its_overlays_down_with_it() {
    let journal = Journal::default();
    let mut stack = StateStack::new();
    let x = stack.push_named("x", Scripted::instant("x", &journal)).unwrap();
    stack.update(DT).unwrap();
    let y = stack.overlay_named("y", Scripted::animated("y", 2, &journal)).unwrap();
    stack.update(DT).unwrap();
    stack.update(DT).unwrap();
    journal.take();

    stack.finish(x, None).unwrap();
    stack.update(DT).unwrap();

    let y_info = info(&stack, y).unwrap();
    assert!(y_info.is_being_popped && y_info.is_transitioning_out);
    assert!(info(&stack, x).unwrap().is_being_popped);

    stack.update(DT).unwrap();
    stack.update(DT).unwrap();
    assert!(stack.is_empty());
    assert_eq!(
        journal
            .take()
            .into_iter()
            .filter(|(_, call)| *call == Call::Dispose)
            .count(),
        2
    );
}

#[test]
fn finished_state_keeps_its_return_value_when_overlays_pop_with_it() {
    let journal = Journal::default();
    let mut stack = StateStack::new();
    let x = stack.push_named("x", Scripted::instant("x", &journal)).unwrap();
    stack.update(DT).unwrap();
    stack.overlay_named("y", Scripted::instant("y", &journal)).unwrap();
    stack.update(DT).unwrap();
    assert_eq!(stack.names(), ["x", "y"]);

    stack.finish(x, Some(42)).unwrap();
    stack.update(DT).unwrap();
    assert_eq!(stack.last_return_value(), Some(42));

    stack.update(DT).unwrap();
    assert_eq!(stack.last_return_value(), None);
    assert!(stack.is_empty());
}

#[test]
fn return_value_comes_from_state_context() {
    struct Quitter;

    impl State for Quitter {
        fn on_update(&mut self, ctx: &mut StateContext<'_>, _delta: f32) {
            ctx.set_finished_with(7);
        }
    }

    let mut stack = StateStack::new();
    stack.push(Quitter).unwrap();

    stack.update(DT).unwrap();
    assert_eq!(stack.last_return_value(), None);

    stack.update(DT).unwrap();
    assert_eq!(stack.last_return_value(), Some(7));
}

//=== Pop Then Push =======================================================

#[test]
fn pop_then_push_arms_the_pop_exit_immediately() {
    let journal = Journal::default();
    let mut stack = StateStack::new();
    let x = stack.push_named("x", Scripted::instant("x", &journal)).unwrap();
    stack.update(DT).unwrap();
    journal.take();

    stack.pop().unwrap();
    let y = stack.push_named("y", Scripted::instant("y", &journal)).unwrap();

    let x_info = info(&stack, x).unwrap();
    assert!(x_info.is_transitioning_out);
    assert!(x_info.is_being_popped);
    assert!(x_info.is_transition_starting);

    stack.update(DT).unwrap();
    assert_eq!(journal.take(), [("x", left()), ("x", Call::Pop)]);

    stack.update(DT).unwrap();
    assert_eq!(
        journal.take(),
        [
            ("x", Call::Dispose),
            ("y", Call::Push),
            ("y", entered()),
            ("y", Call::Update),
        ]
    );
    assert!(stack.is_top_state(y));
    assert_eq!(stack.len(), 1);
}

#[test]
fn push_over_a_state_pauses_it_and_pop_resumes_it() {
    let journal = Journal::default();
    let mut stack = StateStack::new();
    let x = stack.push_named("x", Scripted::instant("x", &journal)).unwrap();
    stack.update(DT).unwrap();
    journal.take();

    stack.push_named("y", Scripted::instant("y", &journal)).unwrap();
    stack.update(DT).unwrap();
    assert_eq!(
        journal.take(),
        [("x", left()), ("x", Call::Pause { overlay: false })]
    );
    assert!(!stack.is_state_active(x));

    stack.update(DT).unwrap();
    assert_eq!(
        journal.take(),
        [("y", Call::Push), ("y", entered()), ("y", Call::Update)]
    );

    stack.pop().unwrap();
    stack.update(DT).unwrap();
    stack.update(DT).unwrap();
    assert_eq!(
        journal.take(),
        [
            ("y", left()),
            ("y", Call::Pop),
            ("y", Call::Dispose),
            ("x", Call::Resume { overlay: false }),
            ("x", entered()),
            ("x", Call::Update),
        ]
    );
    assert!(stack.is_state_active(x));
}

//=== Swaps ===============================================================

#[test]
fn swap_top_replaces_overlay_with_overlay() {
    let journal = Journal::default();
    let mut stack = StateStack::new();
    stack.push_named("x", Scripted::instant("x", &journal)).unwrap();
    stack.update(DT).unwrap();
    stack.overlay_named("y", Scripted::instant("y", &journal)).unwrap();
    stack.update(DT).unwrap();

    let z = stack.swap_top_with_named("z", Scripted::instant("z", &journal)).unwrap();
    stack.update(DT).unwrap();
    stack.update(DT).unwrap();

    assert_eq!(stack.names(), ["x", "z"]);
    assert!(info(&stack, z).is_some_and(|z| z.is_overlay));
}

#[test]
fn swap_top_non_overlay_evicts_overlays() {
    let journal = Journal::default();
    let mut stack = StateStack::new();
    stack.push_named("x", Scripted::instant("x", &journal)).unwrap();
    stack.update(DT).unwrap();
    stack.overlay_named("y", Scripted::instant("y", &journal)).unwrap();
    stack.update(DT).unwrap();

    let z = stack
        .swap_top_non_overlay_with_named("z", Scripted::instant("z", &journal))
        .unwrap();
    stack.update(DT).unwrap();
    stack.update(DT).unwrap();

    assert_eq!(stack.names(), ["z"]);
    assert!(stack.is_state_active(z));
}

//=== Errors ==============================================================

#[test]
fn operations_on_an_empty_stack_fail() {
    let journal = Journal::default();
    let mut stack = StateStack::new();

    assert!(matches!(stack.pop(), Err(StateStackError::Empty { .. })));
    assert!(matches!(
        stack.pop_top_non_overlay(),
        Err(StateStackError::Empty { .. })
    ));
    assert!(matches!(
        stack.swap_top_with_named("x", Scripted::instant("x", &journal)),
        Err(StateStackError::Empty { .. })
    ));
}

#[test]
fn pop_fails_while_anything_transitions() {
    let journal = Journal::default();
    let mut stack = StateStack::new();
    stack.push_named("x", Scripted::animated("x", 2, &journal)).unwrap();
    stack.update(DT).unwrap();

    assert_eq!(
        stack.pop(),
        Err(StateStackError::Transitioning { operation: "pop" })
    );
}

#[test]
fn non_overlay_cannot_queue_behind_an_overlay() {
    let journal = Journal::default();
    let mut stack = StateStack::new();
    stack.overlay_named("y", Scripted::instant("y", &journal)).unwrap();

    assert!(matches!(
        stack.push_named("x", Scripted::instant("x", &journal)),
        Err(StateStackError::OverlayPending { .. })
    ));
}
