//=========================================================================
// Host Bridge
//=========================================================================
//
// Bridges the host application (windowing/event loop) with the stage.
//
// Components:
// - `interface`: host event types (the contract)
// - `event_collector`: stage-side, bounded per-frame collection
//
//=========================================================================

//=== Module Declarations =================================================

pub(crate) mod event_collector;
pub(crate) mod interface;

//=== Public API ==========================================================

pub use event_collector::TickControl;
pub use interface::HostEvent;

pub(crate) use event_collector::EventCollector;
