//=========================================================================
// Aetheric States — Library Root
//
// This crate provides the presentation-state layer of the Aetheric Engine:
// an ordered stack of screens (menus, gameplay, pause overlays) with
// deferred mutation and polled enter/exit transitions.
//
// Responsibilities:
// - Expose the state contract (`State`) and its orchestrator (`StateStack`)
// - Provide per-state collaborators (process and effect managers)
// - Offer a fixed-rate `Stage` that feeds host events into the stack
//
// Typical usage:
// ```no_run
// use aetheric_states::prelude::*;
//
// struct Title;
// impl State for Title {}
//
// fn main() {
//     StageBuilder::new()
//         .build()
//         .init(|stack| { stack.push(Title).unwrap(); })
//         .run()
//         .unwrap();
// }
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` contains the state system and its collaborators. It is public
// for extensibility; most applications only need the prelude.
//
pub mod core;
pub mod prelude;

//--- Internal Modules ----------------------------------------------------
//
// `stage` defines the fixed-rate driver. Its types are re-exported below.
//
mod stage;

//--- Public Exports ------------------------------------------------------

pub use stage::{Stage, StageBuilder};
