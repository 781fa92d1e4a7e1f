//! Tick-driven one-shot timers.
//!
//! Everything is keyed on the game ticker, so timers advance only while the
//! game loop runs and tests can drive them deterministically.

use std::collections::{BTreeMap, HashMap};

use gloaming_core::types::ObjectId;

/// Opaque handle to a scheduled task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

/// Work the scheduler can be asked to run later.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    /// Finish walking `character` through `exit`.
    Traverse { character: ObjectId, exit: ObjectId },
}

#[derive(Debug, Default)]
pub struct Scheduler {
    next_seq: u64,
    /// (due tick, sequence) to task; sequence keeps same-tick order stable.
    timers: BTreeMap<(u64, u64), Task>,
    due_by_seq: HashMap<u64, u64>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules `task` to fire `delay` ticks after `now`.
    pub fn schedule(&mut self, now: u64, delay: u64, task: Task) -> TimerHandle {
        let seq = self.next_seq;
        self.next_seq += 1;
        let due = now.saturating_add(delay);
        self.timers.insert((due, seq), task);
        self.due_by_seq.insert(seq, due);
        log::debug!("Scheduled {:?} for tick {} (seq {})", task, due, seq);
        TimerHandle(seq)
    }

    /// Cancels a pending task. Returns false if it already fired or was
    /// cancelled before.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        match self.due_by_seq.remove(&handle.0) {
            Some(due) => {
                self.timers.remove(&(due, handle.0));
                true
            }
            None => false,
        }
    }

    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.due_by_seq.contains_key(&handle.0)
    }

    /// Removes and returns the earliest task due at or before `now`.
    pub fn pop_due(&mut self, now: u64) -> Option<(TimerHandle, Task)> {
        let (&(due, seq), _) = self.timers.iter().next()?;
        if due > now {
            return None;
        }
        let task = self.timers.remove(&(due, seq))?;
        self.due_by_seq.remove(&seq);
        Some((TimerHandle(seq), task))
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }
}
