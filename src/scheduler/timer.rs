//! Deadline-based timers
//!
//! Timers never call back into the scheduler. They only remember when they
//! are due; the worker polls them and runs the expiry work itself.

use embassy_time::{Duration, Instant};

use crate::class::{ClassMap, EventClass};

/// Single-shot deadline shared by the step and pause timers.
///
/// Arming replaces any earlier deadline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct WorkTimer {
    deadline: Option<Instant>,
}

impl WorkTimer {
    pub(crate) const fn new() -> Self {
        Self { deadline: None }
    }

    pub(crate) fn arm(&mut self, at: Instant) {
        self.deadline = Some(at);
    }

    pub(crate) fn disarm(&mut self) {
        self.deadline = None;
    }

    pub(crate) const fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub(crate) const fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }
}

/// Repeating timer for a single event class
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LoopTimer {
    period: Duration,
    next: Option<Instant>,
}

impl LoopTimer {
    const STOPPED: Self = Self {
        period: Duration::from_ticks(0),
        next: None,
    };
}

/// Loop timers for every event class.
#[derive(Debug, Clone, Copy)]
pub(crate) struct LoopTimers {
    timers: ClassMap<LoopTimer>,
}

impl LoopTimers {
    pub(crate) const fn new() -> Self {
        Self {
            timers: ClassMap::splat(LoopTimer::STOPPED),
        }
    }

    /// Start the loop timer unless it is already running.
    ///
    /// A running timer keeps its original period and phase.
    pub(crate) fn start(&mut self, class: EventClass, period: Duration, now: Instant) -> bool {
        let timer = &mut self.timers[class];
        if timer.next.is_some() {
            return false;
        }
        timer.period = period;
        timer.next = Some(now + period);
        true
    }

    pub(crate) fn stop(&mut self, class: EventClass) {
        self.timers[class] = LoopTimer::STOPPED;
    }

    pub(crate) fn is_running(&self, class: EventClass) -> bool {
        self.timers[class].next.is_some()
    }

    /// Earliest running timer, ties resolved in class order
    pub(crate) fn earliest(&self) -> Option<(EventClass, Instant)> {
        self.timers
            .iter()
            .filter_map(|(class, timer)| timer.next.map(|next| (class, next)))
            .fold(None, |earliest, (class, next)| match earliest {
                Some((_, best)) if best <= next => earliest,
                _ => Some((class, next)),
            })
    }

    /// Consume one expiry of a due timer.
    ///
    /// Returns the instant the expiry is accounted at. When the worker is a
    /// whole period or more behind, the backlog is skipped and the timer is
    /// re-based on `now` instead of firing a catch-up burst.
    pub(crate) fn expire(&mut self, class: EventClass, now: Instant) -> Option<Instant> {
        let timer = &mut self.timers[class];
        let due = timer.next?;
        let fired_at = if now >= due + timer.period { now } else { due };
        timer.next = Some(fired_at + timer.period);
        Some(fired_at)
    }
}
