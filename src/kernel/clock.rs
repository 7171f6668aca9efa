//! Simulated clock and the time-ordered event queue that drives the engine.
//!
//! Time only moves when the driver pops an event or advances explicitly, so a
//! run is fully deterministic. Events due at the same instant are ordered by
//! kind (completions, then admission ticks, then quantum ticks) and then by
//! the order they were scheduled.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// Simulated time in milliseconds.
pub type SimTime = u64;

/// Identifies one in-flight instruction inside the dispatcher.
pub type Ticket = u64;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum EventKind {
    Completion(Ticket),
    AdmissionTick,
    QuantumTick,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct ScheduledEvent {
    at: SimTime,
    kind: EventKind,
    seq: u64,
}

pub(crate) struct EventQueue {
    now: SimTime,
    next_seq: u64,
    events: BinaryHeap<Reverse<ScheduledEvent>>,
}

impl EventQueue {
    pub fn new() -> EventQueue {
        EventQueue {
            now: 0,
            next_seq: 0,
            events: BinaryHeap::new(),
        }
    }

    pub fn now(&self) -> SimTime {
        self.now
    }

    pub fn schedule_at(&mut self, at: SimTime, kind: EventKind) {
        debug_assert!(at >= self.now, "event scheduled in the past");

        let seq = self.next_seq;
        self.next_seq += 1;
        self.events.push(Reverse(ScheduledEvent { at: at.max(self.now), kind, seq }));
    }

    pub fn schedule_after(&mut self, delay: SimTime, kind: EventKind) {
        self.schedule_at(self.now.saturating_add(delay), kind);
    }

    pub fn peek_time(&self) -> Option<SimTime> {
        self.events.peek().map(|Reverse(event)| event.at)
    }

    /// Pops the earliest event due at or before `until`, moving the clock to
    /// its timestamp.
    pub fn pop_due(&mut self, until: SimTime) -> Option<(SimTime, EventKind)> {
        if self.peek_time()? > until {
            return None;
        }

        let Reverse(event) = self.events.pop()?;
        self.now = event.at;

        Some((event.at, event.kind))
    }

    /// Moves the clock forward without popping anything. Never goes back.
    pub fn advance_to(&mut self, t: SimTime) {
        self.now = self.now.max(t);
    }
}
