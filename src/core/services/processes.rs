//=========================================================================
// Process Manager
//=========================================================================
//
// Runs the background processes a state owns (timers, tweens, scripted
// sequences). Processes are ticked on update and dropped once they
// report completion.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::debug;

//=== Internal Dependencies ===============================================

use super::Lifecycle;

//=== Process Trait =======================================================

/// A unit of background work owned by a state.
pub trait Process: Send {
    /// Advances the process. Returns `true` once it has completed.
    fn update(&mut self, delta: f32) -> bool;

    /// Called when the process is dropped before completing.
    fn on_abort(&mut self) {}
}

//=== ProcessManager ======================================================

/// Owns and ticks a state's processes.
///
/// While paused, `on_update` does nothing; processes keep their progress
/// and continue from where they left off on resume.
#[derive(Default)]
pub struct ProcessManager {
    processes: Vec<Box<dyn Process>>,
    paused: bool,
}

impl ProcessManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a process. It first runs on the next update.
    pub fn add<P>(&mut self, process: P)
    where
        P: Process + 'static,
    {
        self.processes.push(Box::new(process));
    }

    pub fn len(&self) -> usize {
        self.processes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processes.is_empty()
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }
}

impl Lifecycle for ProcessManager {
    fn on_pause(&mut self) {
        self.paused = true;
    }

    fn on_resume(&mut self) {
        self.paused = false;
    }

    fn on_update(&mut self, delta: f32) {
        if self.paused {
            return;
        }

        self.processes.retain_mut(|process| !process.update(delta));
    }

    fn remove_all(&mut self) {
        if !self.processes.is_empty() {
            debug!("Aborting {} pending process(es)", self.processes.len());
        }

        for mut process in self.processes.drain(..) {
            process.on_abort();
        }
    }
}

//=== Tests ===============================================================
