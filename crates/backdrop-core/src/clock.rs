//! Monotonic millisecond clocks and cancellable deadline slots.
//!
//! The controller never sleeps or spawns timers itself. Every suspension
//! point (cooldown, resize settle) is a [`TaskSlot`] holding at most one
//! [`ScheduledTask`]; the host polls it with the current time, and dropping
//! or cancelling the slot is all the teardown there is.

/// Source of monotonic timestamps in milliseconds.
pub trait Clock {
    fn now_ms(&self) -> f64;
}

/// Milliseconds on the `instant` time base. On wasm this is
/// `performance.now()`, the origin animation frame timestamps use, so readings
/// can be mixed with frame callback times.
#[derive(Debug, Default, Clone, Copy)]
pub struct InstantClock;

impl Clock for InstantClock {
    fn now_ms(&self) -> f64 {
        instant::now()
    }
}

/// Identifier for one scheduling of a slot; rescheduling yields a new id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(u64);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduledTask {
    pub id: TaskId,
    pub due_ms: f64,
}

impl ScheduledTask {
    pub fn is_due(&self, now_ms: f64) -> bool {
        now_ms >= self.due_ms
    }

    /// Time left until due, never negative.
    pub fn remaining_ms(&self, now_ms: f64) -> f64 {
        (self.due_ms - now_ms).max(0.0)
    }
}

/// Holder for at most one pending deadline.
#[derive(Debug, Default)]
pub struct TaskSlot {
    next_id: u64,
    active: Option<ScheduledTask>,
}

impl TaskSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace any pending deadline with one due at `due_ms`.
    pub fn schedule(&mut self, due_ms: f64) -> ScheduledTask {
        self.next_id += 1;
        let task = ScheduledTask {
            id: TaskId(self.next_id),
            due_ms,
        };
        self.active = Some(task);
        task
    }

    pub fn cancel(&mut self) -> Option<ScheduledTask> {
        self.active.take()
    }

    pub fn pending(&self) -> Option<ScheduledTask> {
        self.active
    }

    pub fn is_pending(&self) -> bool {
        self.active.is_some()
    }

    /// Remove and return the deadline if it has come due.
    pub fn take_due(&mut self, now_ms: f64) -> Option<ScheduledTask> {
        match self.active {
            Some(task) if task.is_due(now_ms) => self.active.take(),
            _ => None,
        }
    }
}
