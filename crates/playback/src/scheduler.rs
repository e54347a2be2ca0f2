//! Frame scheduling.
//!
//! The engine never waits. It hands a [`Ticket`] to a [`Scheduler`] and is
//! re-entered with that ticket later. Each ticket carries the epoch of the
//! run that issued it so continuations from an abandoned run are ignored.

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::time::Duration;

/// Which continuation a ticket resumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Task {
    /// Next marker frame
    Frame,
    /// Next step of the route line reveal
    Reveal,
}

/// A scheduled continuation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket {
    pub task: Task,
    pub epoch: u64,
}

impl Ticket {
    /// Ticket for `task` in run `epoch`.
    pub const fn new(task: Task, epoch: u64) -> Self {
        Self { task, epoch }
    }
}

/// Deferred execution provided by the host event loop.
pub trait Scheduler {
    /// Resume `ticket` at the next repaint.
    fn schedule_next(&mut self, ticket: Ticket);

    /// Resume `ticket` once `delay` has elapsed.
    fn schedule_after(&mut self, delay: Duration, ticket: Ticket);
}

/// A ticket that has come due on a [`VirtualScheduler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Due {
    pub ticket: Ticket,
    /// Virtual time the ticket fires at
    pub at: Duration,
    /// Virtual time that passed since the previous ticket fired
    pub wait: Duration,
}

/// Deterministic scheduler over a virtual clock.
///
/// Repaints happen every `frame_interval`. Tickets due at the same instant
/// fire in scheduling order.
#[derive(Debug)]
pub struct VirtualScheduler {
    now: Duration,
    frame_interval: Duration,
    seq: u64,
    queue: BinaryHeap<Reverse<(Duration, u64, Ticket)>>,
}

impl VirtualScheduler {
    /// Empty scheduler at time zero.
    pub fn new(frame_interval: Duration) -> Self {
        Self {
            now: Duration::ZERO,
            frame_interval,
            seq: 0,
            queue: BinaryHeap::new(),
        }
    }

    /// Current virtual time.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Delay used by [`Scheduler::schedule_next`].
    pub fn frame_interval(&self) -> Duration {
        self.frame_interval
    }

    /// Number of tickets waiting.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// True when no ticket is waiting.
    pub fn is_idle(&self) -> bool {
        self.queue.is_empty()
    }

    /// Removes the earliest ticket and advances the clock to its due time.
    pub fn pop(&mut self) -> Option<Due> {
        let Reverse((at, _, ticket)) = self.queue.pop()?;
        let wait = at.saturating_sub(self.now);
        self.now = self.now.max(at);
        Some(Due { ticket, at, wait })
    }

    fn push(&mut self, at: Duration, ticket: Ticket) {
        self.seq += 1;
        self.queue.push(Reverse((at, self.seq, ticket)));
    }
}

impl Scheduler for VirtualScheduler {
    fn schedule_next(&mut self, ticket: Ticket) {
        self.push(self.now + self.frame_interval, ticket);
    }

    fn schedule_after(&mut self, delay: Duration, ticket: Ticket) {
        self.push(self.now + delay, ticket);
    }
}
