//! One-shot timers
//!
//! A [`TimerQueue`] stores pending one-shot timers keyed by [`TimerId`]. The id
//! doubles as the cancellation token: whoever armed a timer keeps its id and
//! cancels through it. Timers carry a caller-defined payload `K` describing
//! what should happen when they fire. Nothing runs on its own; the host polls
//! [`TimerQueue::take_due`] from its event loop.

use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;

new_key_type! {
    /// Cancellation token for a pending timer
    pub struct TimerId;
}

struct Timer<K> {
    deadline_ms: u64,
    /// Arming order, breaks ties between equal deadlines
    seq: u64,
    kind: K,
}

/// Pending one-shot timers
pub struct TimerQueue<K> {
    timers: SlotMap<TimerId, Timer<K>>,
    next_seq: u64,
}

impl<K: Copy> TimerQueue<K> {
    pub fn new() -> Self {
        Self {
            timers: SlotMap::with_key(),
            next_seq: 0,
        }
    }

    /// Arm a timer that fires `delay_ms` after `now_ms`
    pub fn start(&mut self, kind: K, now_ms: u64, delay_ms: u64) -> TimerId {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.timers.insert(Timer {
            deadline_ms: now_ms.saturating_add(delay_ms),
            seq,
            kind,
        })
    }

    /// Cancel a pending timer. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        self.timers.remove(id).is_some()
    }

    /// Earliest pending deadline
    pub fn next_deadline(&self) -> Option<u64> {
        self.timers.values().map(|t| t.deadline_ms).min()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// Remove and return every timer whose deadline is at or before `now_ms`,
    /// earliest first
    pub fn take_due(&mut self, now_ms: u64) -> SmallVec<[(TimerId, K); 2]> {
        let mut due: SmallVec<[(u64, u64, TimerId); 2]> = self
            .timers
            .iter()
            .filter(|(_, t)| t.deadline_ms <= now_ms)
            .map(|(id, t)| (t.deadline_ms, t.seq, id))
            .collect();
        due.sort_unstable_by_key(|&(deadline, seq, _)| (deadline, seq));

        due.into_iter()
            .filter_map(|(_, _, id)| self.timers.remove(id).map(|t| (id, t.kind)))
            .collect()
    }
}

impl<K: Copy> Default for TimerQueue<K> {
    fn default() -> Self {
        Self::new()
    }
}
