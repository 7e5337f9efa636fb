//! Deferred "next tick" work.
//!
//! Some follow-up work must observe state only after the current synchronous
//! update has been committed, e.g. refocusing an input after a value change has
//! been delivered. Such work is posted to a [`TickQueue`] and run by the owner
//! on its next tick.
//!
//! The queue stores plain work items rather than closures so the owner can
//! interpret them with full mutable access to itself.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::logging::targets;

/// A unique identifier for a posted tick item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TickId(u64);

impl TickId {
    /// Get the raw u64 value of this tick ID.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

/// Global counter for generating unique tick IDs.
static NEXT_TICK_ID: AtomicU64 = AtomicU64::new(1);

fn next_tick_id() -> TickId {
    TickId(NEXT_TICK_ID.fetch_add(1, Ordering::Relaxed))
}

/// FIFO queue of deferred work items.
#[derive(Debug)]
pub struct TickQueue<T> {
    items: VecDeque<(TickId, T)>,
}

impl<T> TickQueue<T> {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self {
            items: VecDeque::new(),
        }
    }

    /// Post an item to run on the next tick.
    pub fn post(&mut self, item: T) -> TickId {
        let id = next_tick_id();
        self.items.push_back((id, item));
        tracing::trace!(target: targets::TICK, id = id.as_u64(), "tick item posted");
        id
    }

    /// Cancel a pending item.
    ///
    /// Returns `true` if the item was found and removed.
    pub fn cancel(&mut self, id: TickId) -> bool {
        match self.items.iter().position(|(item_id, _)| *item_id == id) {
            Some(pos) => {
                self.items.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Drop every pending item.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Check if there are any pending items.
    pub fn has_pending(&self) -> bool {
        !self.items.is_empty()
    }

    /// Get the number of pending items.
    pub fn pending_count(&self) -> usize {
        self.items.len()
    }

    /// Take the current batch.
    ///
    /// Items posted while the batch is being processed are not part of it and
    /// wait for the next call.
    pub fn drain(&mut self) -> Vec<T> {
        self.items.drain(..).map(|(_, item)| item).collect()
    }
}

impl<T> Default for TickQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fifo_drain() {
        let mut queue = TickQueue::new();
        queue.post("focus");
        queue.post("reset");

        assert_eq!(queue.pending_count(), 2);
        assert_eq!(queue.drain(), vec!["focus", "reset"]);
        assert!(!queue.has_pending());
    }

    #[test]
    fn test_cancel() {
        let mut queue = TickQueue::new();
        let first = queue.post(1);
        queue.post(2);

        assert!(queue.cancel(first));
        assert!(!queue.cancel(first));
        assert_eq!(queue.drain(), vec![2]);
    }

    #[test]
    fn test_posting_after_drain_waits_for_next_batch() {
        let mut queue = TickQueue::new();
        queue.post(1);

        let batch = queue.drain();
        for item in batch {
            queue.post(item + 10);
        }

        assert_eq!(queue.drain(), vec![11]);
    }
}
