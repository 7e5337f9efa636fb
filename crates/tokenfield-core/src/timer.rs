//! Purpose-keyed one-shot timers.
//!
//! A widget usually needs a handful of timers that each serve one purpose
//! (debouncing input, a safety close, a deferred blur). [`TimerQueue`] keys
//! timers by that purpose: starting a timer for a purpose that already has one
//! in flight cancels the old one first, so at most one timer per purpose ever
//! exists.
//!
//! The queue does not read the clock itself. Callers pass `now` in, which keeps
//! it deterministic under a [`ManualClock`](crate::ManualClock).

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};
use std::fmt::Debug;
use std::hash::Hash;
use std::time::{Duration, Instant};

use slotmap::{SlotMap, new_key_type};

use crate::error::{CoreError, Result};
use crate::logging::targets;

new_key_type! {
    /// A unique identifier for a timer.
    pub struct TimerId;
}

/// Internal timer data.
#[derive(Debug)]
struct TimerData<K> {
    key: K,
    deadline: Instant,
}

/// An entry in the timer queue (min-heap by deadline, then start order).
#[derive(Debug, Clone, Copy)]
struct TimerQueueEntry {
    id: TimerId,
    deadline: Instant,
    sequence: u64,
}

impl PartialEq for TimerQueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.deadline == other.deadline && self.sequence == other.sequence
    }
}

impl Eq for TimerQueueEntry {}

impl PartialOrd for TimerQueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TimerQueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse order for min-heap (BinaryHeap is max-heap by default).
        other
            .deadline
            .cmp(&self.deadline)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

/// One-shot timers keyed by purpose.
pub struct TimerQueue<K> {
    /// All live timers.
    timers: SlotMap<TimerId, TimerData<K>>,
    /// Live timer for each purpose.
    by_key: HashMap<K, TimerId>,
    /// Pending fires; entries for cancelled timers are skipped lazily.
    queue: BinaryHeap<TimerQueueEntry>,
    /// Tie-breaker so equal deadlines fire in start order.
    sequence: u64,
}

impl<K: Copy + Eq + Hash + Debug> TimerQueue<K> {
    /// Create an empty timer queue.
    pub fn new() -> Self {
        Self {
            timers: SlotMap::with_key(),
            by_key: HashMap::new(),
            queue: BinaryHeap::new(),
            sequence: 0,
        }
    }

    /// Start the timer for `key`, firing `delay` after `now`.
    ///
    /// Any timer already pending for `key` is cancelled first.
    pub fn start(&mut self, key: K, now: Instant, delay: Duration) -> TimerId {
        self.cancel(key);

        let deadline = now + delay;
        let id = self.timers.insert(TimerData { key, deadline });
        self.by_key.insert(key, id);
        self.sequence += 1;
        self.queue.push(TimerQueueEntry {
            id,
            deadline,
            sequence: self.sequence,
        });

        tracing::trace!(target: targets::TIMER, ?key, ?delay, "timer started");
        id
    }

    /// Cancel the pending timer for `key`.
    ///
    /// Returns `true` if a timer was pending.
    pub fn cancel(&mut self, key: K) -> bool {
        match self.by_key.remove(&key) {
            Some(id) => {
                self.timers.remove(id);
                tracing::trace!(target: targets::TIMER, ?key, "timer cancelled");
                true
            }
            None => false,
        }
    }

    /// Stop a timer by id.
    pub fn stop(&mut self, id: TimerId) -> Result<()> {
        let data = self.timers.remove(id).ok_or(CoreError::InvalidTimer)?;
        self.by_key.remove(&data.key);
        Ok(())
    }

    /// Cancel every pending timer.
    pub fn clear(&mut self) {
        self.timers.clear();
        self.by_key.clear();
        self.queue.clear();
    }

    /// Whether a timer for `key` is pending.
    pub fn is_pending(&self, key: K) -> bool {
        self.by_key.contains_key(&key)
    }

    /// The deadline of the pending timer for `key`, if any.
    pub fn deadline(&self, key: K) -> Option<Instant> {
        self.by_key
            .get(&key)
            .and_then(|id| self.timers.get(*id))
            .map(|data| data.deadline)
    }

    /// Duration until the next timer fires, `None` if nothing is pending.
    pub fn time_until_next(&mut self, now: Instant) -> Option<Duration> {
        self.discard_stale();
        self.queue
            .peek()
            .map(|entry| entry.deadline.saturating_duration_since(now))
    }

    /// Remove and return the purposes of all timers due at `now`.
    ///
    /// Keys come back in deadline order; timers with equal deadlines come
    /// back in the order they were started.
    #[tracing::instrument(skip(self), target = "tokenfield_core::timer", level = "trace")]
    pub fn take_expired(&mut self, now: Instant) -> Vec<K> {
        let mut fired = Vec::new();

        while let Some(entry) = self.queue.peek() {
            if entry.deadline > now {
                break;
            }
            let Some(entry) = self.queue.pop() else {
                break;
            };
            let Some(data) = self.timers.remove(entry.id) else {
                continue;
            };
            self.by_key.remove(&data.key);
            tracing::trace!(target: targets::TIMER, key = ?data.key, "timer fired");
            fired.push(data.key);
        }

        fired
    }

    /// Number of pending timers.
    pub fn pending_count(&self) -> usize {
        self.timers.len()
    }

    fn discard_stale(&mut self) {
        while let Some(entry) = self.queue.peek() {
            if self.timers.contains_key(entry.id) {
                break;
            }
            self.queue.pop();
        }
    }
}

impl<K: Copy + Eq + Hash + Debug> Default for TimerQueue<K> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Purpose {
        Debounce,
        Safety,
    }

    #[test]
    fn test_timer_fires_after_delay() {
        let start = Instant::now();
        let mut timers = TimerQueue::new();
        timers.start(Purpose::Debounce, start, Duration::from_millis(250));

        assert!(timers.take_expired(start + Duration::from_millis(249)).is_empty());
        assert_eq!(
            timers.take_expired(start + Duration::from_millis(250)),
            vec![Purpose::Debounce]
        );
        assert!(!timers.is_pending(Purpose::Debounce));
    }

    #[test]
    fn test_restart_replaces_pending_timer() {
        let start = Instant::now();
        let mut timers = TimerQueue::new();
        timers.start(Purpose::Debounce, start, Duration::from_millis(100));
        timers.start(
            Purpose::Debounce,
            start + Duration::from_millis(80),
            Duration::from_millis(100),
        );

        assert_eq!(timers.pending_count(), 1);
        assert!(timers.take_expired(start + Duration::from_millis(120)).is_empty());
        assert_eq!(
            timers.take_expired(start + Duration::from_millis(180)),
            vec![Purpose::Debounce]
        );
    }

    #[test]
    fn test_cancel() {
        let start = Instant::now();
        let mut timers = TimerQueue::new();
        timers.start(Purpose::Safety, start, Duration::from_millis(10));

        assert!(timers.cancel(Purpose::Safety));
        assert!(!timers.cancel(Purpose::Safety));
        assert!(timers.take_expired(start + Duration::from_secs(1)).is_empty());
        assert_eq!(timers.time_until_next(start), None);
    }

    #[test]
    fn test_expired_order() {
        let start = Instant::now();
        let mut timers = TimerQueue::new();
        timers.start(Purpose::Debounce, start, Duration::from_millis(20));
        timers.start(Purpose::Safety, start, Duration::from_millis(10));

        assert_eq!(
            timers.time_until_next(start),
            Some(Duration::from_millis(10))
        );
        assert_eq!(
            timers.take_expired(start + Duration::from_millis(30)),
            vec![Purpose::Safety, Purpose::Debounce]
        );
    }

    #[test]
    fn test_stop_by_id() {
        let start = Instant::now();
        let mut timers = TimerQueue::new();
        let id = timers.start(Purpose::Safety, start, Duration::ZERO);

        assert!(timers.stop(id).is_ok());
        assert!(matches!(timers.stop(id), Err(CoreError::InvalidTimer)));
        assert_eq!(timers.deadline(Purpose::Safety), None);
    }
}
