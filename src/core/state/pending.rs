//=========================================================================
// Pending Queue
//=========================================================================
//
// FIFO of records waiting to be placed on the stack.
//
// Stack operations enqueue records here. The stack drains a queue at the
// tick boundary, once no state is mid-transition.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::VecDeque;

//=== Internal Dependencies ===============================================

use super::StateRecord;

//=== PendingQueue ========================================================

/// FIFO of records queued by push/overlay or swap operations.
#[derive(Default)]
pub(crate) struct PendingQueue {
    queue: VecDeque<StateRecord>,
}

impl PendingQueue {
    /// Queues a record to be placed on the stack at the next drain.
    pub(crate) fn push(&mut self, record: StateRecord) {
        self.queue.push_back(record);
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &StateRecord> {
        self.queue.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut StateRecord> {
        self.queue.iter_mut()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub(crate) fn len(&self) -> usize {
        self.queue.len()
    }

    /// First queued overlay, if any.
    pub(crate) fn queued_overlay(&self) -> Option<&StateRecord> {
        self.queue.iter().find(|record| record.is_overlay())
    }

    /// Takes every queued record in FIFO order, leaving the queue empty.
    pub(crate) fn take(&mut self) -> VecDeque<StateRecord> {
        std::mem::take(&mut self.queue)
    }
}

//=== Tests ===============================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::state::{PendingState, State};

    struct Blank;
    impl State for Blank {}

    fn record(name: &str, overlay: bool) -> StateRecord {
        StateRecord::new(PendingState::new(Blank, Some(name)), overlay)
    }

    #[test]
    fn take_preserves_fifo_order() {
        let mut queue = PendingQueue::default();
        queue.push(record("a", false));
        queue.push(record("b", true));
        queue.push(record("c", true));

        let names: Vec<_> = queue.take().iter().map(|r| r.name().to_owned()).collect();
        assert_eq!(names, ["a", "b", "c"]);
        assert!(queue.is_empty());
    }

    #[test]
    fn queued_overlay_finds_first_overlay() {
        let mut queue = PendingQueue::default();
        assert!(queue.queued_overlay().is_none());

        queue.push(record("a", false));
        queue.push(record("b", true));

        assert_eq!(queue.len(), 2);
        assert_eq!(queue.queued_overlay().map(|r| r.name()), Some("b"));
    }
}
