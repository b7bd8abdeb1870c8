//=========================================================================
// Core Systems
//
// State-management building blocks driven by the `Stage`.
//
// Components:
// - `state`: the state contract and the `StateStack` lifecycle machine
// - `services`: per-state collaborators (processes, effects)
// - `host`: host event types and per-frame collection
//
// Notes:
// Everything here is single-threaded and cooperative. The stage may run
// on its own thread, but a stack and its states are only ever touched by
// the thread that ticks it.
//
//=========================================================================

//=== Module Declarations =================================================

pub mod host;
pub mod services;
pub mod state;
