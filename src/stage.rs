//=========================================================================
// Stage
//
// Fixed-rate driver that owns a `StateStack` and feeds it host events.
//
// Architecture:
// ```text
//     StageBuilder  ──build()──>  Stage  ──run()──>  [Tick Loop]
//         │                         │
//         ├─ with_tps()             ├─ sender() → host thread
//         ├─ with_channel_capacity()└─ spawn()  → logic thread
//         └─ with_max_events_per_frame()
// ```
//
// Each tick:
//  1. Collects host events (bounded)
//  2. Dispatches them to the active states
//  3. Runs the state stack tick
//  4. Renders the active states
//  5. Sleeps to maintain fixed pacing
//
//=========================================================================

//=== External Dependencies ===============================================

use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{bounded, Sender};
use log::{error, info};

//=== Internal Dependencies ===============================================

use crate::core::host::{EventCollector, HostEvent, TickControl};
use crate::core::state::{StateStack, StateStackError};

//=== StageBuilder ========================================================

/// Builder for configuring and constructing a [`Stage`].
///
/// # Default Values
///
/// - **TPS**: 60.0 (ticks per second)
/// - **Channel capacity**: 128 host events
/// - **Events per frame**: 100
/// - **Exit when empty**: enabled
///
/// # Examples
///
/// ```no_run
/// use aetheric_states::prelude::*;
///
/// struct Title;
/// impl State for Title {}
///
/// StageBuilder::new()
///     .with_tps(120.0)
///     .build()
///     .init(|stack| {
///         stack.push(Title).unwrap();
///     })
///     .run()
///     .unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct StageBuilder {
    tps: f64,
    channel_capacity: usize,
    max_events_per_frame: usize,
    exit_when_empty: bool,
}

impl StageBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            tps: 60.0,
            channel_capacity: 128,
            max_events_per_frame: 100,
            exit_when_empty: true,
        }
    }

    /// Sets the target ticks per second.
    ///
    /// Also fixes the delta passed to states: `1.0 / tps` seconds.
    ///
    /// # Panics
    ///
    /// Panics if `tps <= 0.0`.
    pub fn with_tps(mut self, tps: f64) -> Self {
        assert!(tps > 0.0, "TPS must be positive, got {}", tps);
        self.tps = tps;
        self
    }

    /// Sets the capacity of the host → stage channel.
    ///
    /// # Panics
    ///
    /// Panics if `capacity == 0`.
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        assert!(capacity > 0, "Channel capacity must be positive");
        self.channel_capacity = capacity;
        self
    }

    /// Caps how many host events are handled per tick. The rest wait for
    /// the following tick.
    ///
    /// # Panics
    ///
    /// Panics if `max == 0`.
    pub fn with_max_events_per_frame(mut self, max: usize) -> Self {
        assert!(max > 0, "Events per frame must be positive");
        self.max_events_per_frame = max;
        self
    }

    /// Whether the stage stops once the stack and its queues are empty.
    pub fn exit_when_empty(mut self, exit: bool) -> Self {
        self.exit_when_empty = exit;
        self
    }

    /// Builds the stage with an empty state stack.
    pub fn build(self) -> Stage {
        info!(
            "Building stage (TPS: {}, channel: {}, events/frame: {})",
            self.tps, self.channel_capacity, self.max_events_per_frame
        );

        let (sender, receiver) = bounded(self.channel_capacity);

        Stage {
            stack: StateStack::new(),
            collector: EventCollector::new(receiver, self.max_events_per_frame),
            sender,
            tps: self.tps,
            exit_when_empty: self.exit_when_empty,
        }
    }
}

impl Default for StageBuilder {
    fn default() -> Self {
        Self::new()
    }
}

//=== Stage ===============================================================

/// Owns a [`StateStack`] and drives it at a fixed tick rate.
///
/// Host events arrive over a bounded channel; obtain the sending half with
/// [`Stage::sender`] before starting the loop.
pub struct Stage {
    stack: StateStack,
    collector: EventCollector,
    sender: Sender<HostEvent>,
    tps: f64,
    exit_when_empty: bool,
}

impl Stage {
    //--- Initialization ---------------------------------------------------

    /// Gives mutable access to the stack before the loop starts, typically
    /// to queue the initial state.
    pub fn init<F>(mut self, init_fn: F) -> Self
    where
        F: FnOnce(&mut StateStack),
    {
        init_fn(&mut self.stack);
        self
    }

    /// Sending half of the host event channel.
    pub fn sender(&self) -> Sender<HostEvent> {
        self.sender.clone()
    }

    pub fn stack(&self) -> &StateStack {
        &self.stack
    }

    pub fn stack_mut(&mut self) -> &mut StateStack {
        &mut self.stack
    }

    /// Fixed delta handed to states each tick, in seconds.
    pub fn delta(&self) -> f32 {
        (1.0 / self.tps) as f32
    }

    //--- Execution --------------------------------------------------------

    /// Runs a single tick: events, stack update, render.
    ///
    /// Returns [`TickControl::Exit`] when the host closed or disconnected,
    /// or when the stack emptied and the stage is configured to stop then.
    ///
    /// # Errors
    ///
    /// Returns the first stack error raised during the frame. The frame
    /// still runs to the end.
    pub fn step(&mut self) -> Result<TickControl, StateStackError> {
        let delta = self.delta();
        let mut failure = None;

        //--- Step 1: Gather host events ---------------------------------------
        if let TickControl::Exit = self.collector.collect_frame() {
            return Ok(TickControl::Exit);
        }

        //--- Step 2: Forward host events ---------------------------------------
        for &event in self.collector.events() {
            if let Err(err) = self.stack.dispatch(event) {
                failure.get_or_insert(err);
            }
        }

        //--- Step 3: Tick the state stack --------------------------------------
        if let Err(err) = self.stack.update(delta) {
            failure.get_or_insert(err);
        }

        //--- Step 4: Render -----------------------------------------------------
        if let Err(err) = self.stack.on_render(delta) {
            failure.get_or_insert(err);
        }

        if let Some(err) = failure {
            return Err(err);
        }

        if self.exit_when_empty && self.stack.is_empty() {
            info!("State stack is empty, stopping stage");
            return Ok(TickControl::Exit);
        }

        Ok(TickControl::Continue)
    }

    /// Runs the tick loop on the current thread until it exits.
    ///
    /// # Errors
    ///
    /// Stops at the first stack error and returns it.
    pub fn run(mut self) -> Result<(), StateStackError> {
        let frame_duration = Duration::from_secs_f64(1.0 / self.tps);
        info!("Starting stage loop (TPS: {})", self.tps);

        loop {
            let frame_start = Instant::now();

            match self.step() {
                Ok(TickControl::Continue) => {}
                Ok(TickControl::Exit) => break,
                Err(err) => {
                    error!("Stage stopped on state stack error: {}", err);
                    return Err(err);
                }
            }

            //--- Step 5: Maintain fixed pacing --------------------------------
            let elapsed = frame_start.elapsed();
            if elapsed < frame_duration {
                thread::sleep(frame_duration - elapsed);
            }
        }

        info!("Stage loop exited");
        Ok(())
    }

    /// Moves the stage to a new logic thread and runs it there.
    pub fn spawn(self) -> thread::JoinHandle<Result<(), StateStackError>> {
        thread::spawn(move || self.run())
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
