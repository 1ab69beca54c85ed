//! Discrete-time scheduler
//!
//! Every timer the game runs (score, spawn, movement, jump landing and each
//! obstacle's advance) lives here and is addressed by a `TimerHandle`, so the
//! session can cancel all of them when the run ends.

use std::cmp::Reverse;
use std::collections::{BTreeMap, BinaryHeap};

use serde::{Deserialize, Serialize};

use crate::error::SimError;

/// What a timer does when it fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TickKind {
    /// Award points
    Score,
    /// Create a new obstacle
    SpawnObstacle,
    /// Move one obstacle a step toward the far boundary
    AdvanceObstacle(u32),
    /// Land the player after a jump
    JumpReversal,
    /// One step of held-key horizontal movement
    MovePlayer,
}

impl TickKind {
    /// Decode a host-supplied tick (tag + obstacle id, ignored for other kinds)
    pub fn from_tag(tag: u8, obstacle_id: u32) -> Result<Self, SimError> {
        match tag {
            0 => Ok(TickKind::Score),
            1 => Ok(TickKind::SpawnObstacle),
            2 => Ok(TickKind::AdvanceObstacle(obstacle_id)),
            3 => Ok(TickKind::JumpReversal),
            4 => Ok(TickKind::MovePlayer),
            other => Err(SimError::UnknownTickTag(other)),
        }
    }

    pub fn tag(&self) -> u8 {
        match self {
            TickKind::Score => 0,
            TickKind::SpawnObstacle => 1,
            TickKind::AdvanceObstacle(_) => 2,
            TickKind::JumpReversal => 3,
            TickKind::MovePlayer => 4,
        }
    }
}

/// Cancellation handle for a scheduled timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TimerHandle(u64);

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Timer {
    kind: TickKind,
    /// Repeat period, `None` for one-shot timers
    period: Option<u64>,
}

/// Queue entry ordered by due time, then by scheduling order (FIFO)
type Entry = Reverse<(u64, u64, TimerHandle)>;

/// Single-threaded timer queue over an abstract clock
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    now: u64,
    next_handle: u64,
    next_seq: u64,
    queue: BinaryHeap<Entry>,
    /// Live timers; queue entries whose handle is missing here are stale
    timers: BTreeMap<TimerHandle, Timer>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current clock time
    pub fn now(&self) -> u64 {
        self.now
    }

    /// Number of live timers
    pub fn pending(&self) -> usize {
        self.timers.len()
    }

    pub fn is_scheduled(&self, handle: TimerHandle) -> bool {
        self.timers.contains_key(&handle)
    }

    /// Fire `kind` once, `delay` units from now
    pub fn schedule_once(&mut self, delay: u64, kind: TickKind) -> TimerHandle {
        self.insert(delay, Timer { kind, period: None })
    }

    /// Fire `kind` every `period` units, first firing one period from now
    pub fn schedule_every(&mut self, period: u64, kind: TickKind) -> TimerHandle {
        let period = period.max(1);
        self.insert(
            period,
            Timer {
                kind,
                period: Some(period),
            },
        )
    }

    /// Cancel a timer. Returns false if it already fired (one-shot) or was cancelled.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        self.timers.remove(&handle).is_some()
    }

    /// Cancel every outstanding timer
    pub fn cancel_all(&mut self) {
        self.timers.clear();
        self.queue.clear();
    }

    /// Pop the next timer due at or before `until`, moving the clock to its due time.
    ///
    /// Repeating timers are re-queued behind anything already due at the same instant.
    pub fn pop_due(&mut self, until: u64) -> Option<TickKind> {
        while let Some(Reverse((due, _, handle))) = self.queue.peek().copied() {
            if due > until {
                return None;
            }
            self.queue.pop();

            let Some(timer) = self.timers.get(&handle).cloned() else {
                continue;
            };

            self.now = self.now.max(due);
            match timer.period {
                Some(period) => {
                    let seq = self.bump_seq();
                    self.queue.push(Reverse((due + period, seq, handle)));
                }
                None => {
                    self.timers.remove(&handle);
                }
            }
            return Some(timer.kind);
        }
        None
    }

    /// Move the clock forward to `time` once everything due has been popped
    pub fn settle(&mut self, time: u64) {
        self.now = self.now.max(time);
    }

    fn insert(&mut self, delay: u64, timer: Timer) -> TimerHandle {
        let handle = TimerHandle(self.next_handle);
        self.next_handle += 1;
        let seq = self.bump_seq();
        self.queue.push(Reverse((self.now + delay, seq, handle)));
        self.timers.insert(handle, timer);
        handle
    }

    fn bump_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }
}
