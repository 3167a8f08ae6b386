//! Cooperative timer set.
//!
//! Everything runs on one thread.  Owners arm one-shot and periodic
//! timers tagged with their own enum, then drain due timers from their
//! `poll()` method and dispatch on the tag.  No callback ever runs
//! inside the timer set itself, so owners keep full `&mut self` access
//! while handling a fire.
//!
//! ```text
//!   LedStripController ──┐                     ┌── FlashTimer::Toggle
//!   Robot (self-test) ───┼─▶ TimerSet<Tag> ──▶ ├── FlashTimer::Stop
//!                        │   pop_due(now)      └── SelfTestTimer::Step/End
//!   MonotonicClock ──────┘
//! ```
//!
//! Due timers come out in deadline order.  Timers sharing a deadline come
//! out in the order they were armed, which lets an owner guarantee that a
//! terminating one-shot beats a periodic tick landing on the same
//! millisecond.

use heapless::Vec;
use log::debug;

/// Default number of concurrently armed timers per owner (stack-allocated).
pub const MAX_TIMERS: usize = 8;

/// Opaque identifier returned when a timer is armed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u32);

/// How a timer behaves after it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    /// Removed after its single fire.
    OneShot,
    /// Re-armed at `deadline + interval_ms` after every fire.
    Periodic { interval_ms: u32 },
}

/// Internal bookkeeping for an armed timer.
#[derive(Debug, Clone)]
struct TimerEntry<T> {
    id: TimerId,
    deadline_ms: u64,
    kind: TimerKind,
    tag: T,
}

/// Fixed-capacity set of pending timers carrying a caller tag `T`.
pub struct TimerSet<T, const N: usize = MAX_TIMERS> {
    timers: Vec<TimerEntry<T>, N>,
    next_id: u32,
}

impl<T: Copy, const N: usize> Default for TimerSet<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Copy, const N: usize> TimerSet<T, N> {
    pub fn new() -> Self {
        Self {
            timers: Vec::new(),
            next_id: 0,
        }
    }

    /// Arm a one-shot timer firing at `now_ms + delay_ms`.
    /// Returns `None` if the set is full.
    pub fn after(&mut self, now_ms: u64, delay_ms: u32, tag: T) -> Option<TimerId> {
        self.arm(now_ms + u64::from(delay_ms), TimerKind::OneShot, tag)
    }

    /// Arm a periodic timer whose first fire is at `now_ms + interval_ms`.
    /// A zero interval is treated as 1 ms.
    pub fn every(&mut self, now_ms: u64, interval_ms: u32, tag: T) -> Option<TimerId> {
        let interval_ms = interval_ms.max(1);
        self.arm(
            now_ms + u64::from(interval_ms),
            TimerKind::Periodic { interval_ms },
            tag,
        )
    }

    fn arm(&mut self, deadline_ms: u64, kind: TimerKind, tag: T) -> Option<TimerId> {
        let id = TimerId(self.next_id);
        self.timers
            .push(TimerEntry {
                id,
                deadline_ms,
                kind,
                tag,
            })
            .ok()?;
        self.next_id = self.next_id.wrapping_add(1);
        debug!("TimerSet: armed {:?} {:?} due at {}ms", id, kind, deadline_ms);
        Some(id)
    }

    /// Cancel an armed timer.  Returns `false` if it already fired
    /// (one-shot) or was never armed.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        match self.timers.iter().position(|t| t.id == id) {
            Some(i) => {
                // `remove` keeps arming order, which breaks deadline ties.
                self.timers.remove(i);
                true
            }
            None => false,
        }
    }

    /// Cancel every armed timer.
    pub fn clear(&mut self) {
        self.timers.clear();
    }

    /// Take the earliest timer due at `now_ms`, if any.
    ///
    /// Call repeatedly until it returns `None`.  A periodic timer that is
    /// several intervals behind fires once per call until it catches up.
    pub fn pop_due(&mut self, now_ms: u64) -> Option<(TimerId, T)> {
        // First minimum wins, and the vector is in arming order.
        let mut best: Option<usize> = None;
        for (i, t) in self.timers.iter().enumerate() {
            if t.deadline_ms > now_ms {
                continue;
            }
            match best {
                Some(b) if self.timers[b].deadline_ms <= t.deadline_ms => {}
                _ => best = Some(i),
            }
        }
        let i = best?;

        let TimerEntry { id, tag, kind, .. } = self.timers[i];
        match kind {
            TimerKind::OneShot => {
                self.timers.remove(i);
            }
            TimerKind::Periodic { interval_ms } => {
                self.timers[i].deadline_ms += u64::from(interval_ms);
            }
        }
        Some((id, tag))
    }

    /// Deadline of the next timer to fire.
    pub fn next_deadline(&self) -> Option<u64> {
        self.timers.iter().map(|t| t.deadline_ms).min()
    }

    pub fn is_armed(&self, id: TimerId) -> bool {
        self.timers.iter().any(|t| t.id == id)
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }
}

// ═══════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════
