//! Priority-preemptive indicator scheduler
//!
//! Arbitrates between event classes that all want to show a pattern on the
//! same LEDs. At most one class owns the output at a time:
//!
//! - `Idle`: nothing is playing, or a terminal step is being held or rested on
//! - `Paused`: outputs are blanked for a short gap before a pattern starts
//! - `Active`: a step of the active pattern is being held
//!
//! Every class keeps one pending selector. A newer request for the same class
//! overwrites it; preempted classes keep theirs and resume once the higher
//! priority pattern finishes.
//!
//! All methods take the current time and only arm deadlines. The owner is
//! expected to call [`Scheduler::poll`] when [`Scheduler::next_deadline`]
//! passes.

mod executor;
mod timer;

use embassy_time::{Duration, Instant};

use crate::OutputSink;
use crate::class::{ClassMap, EventClass};
use crate::config::PAUSE_DURATION;
use crate::logging::log;
use crate::table::PatternTable;
use timer::{LoopTimers, WorkTimer};

/// Global scheduler state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SchedulerState {
    #[default]
    Idle,
    Paused,
    Active,
}

/// The class owning the output and its progress
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivePattern {
    pub class: EventClass,
    /// Selector being played, or queued to play when the pause ends
    pub selector: u8,
    /// Index of the last step written to the output
    pub step: usize,
}

/// Indicator scheduler - owns the output and all arbitration state
pub struct Scheduler<'a, S: OutputSink, const N: usize> {
    // External dependencies and configuration
    table: &'a PatternTable<N>,
    sink: S,
    pause: Duration,

    // Internal state
    state: SchedulerState,
    active: Option<ActivePattern>,
    pending: ClassMap<Option<u8>>,
    last_shown: ClassMap<Option<u8>>,

    // Timers
    work: WorkTimer,
    loops: LoopTimers,
}

impl<'a, S: OutputSink, const N: usize> Scheduler<'a, S, N> {
    /// Create a scheduler with the default 100 ms pause
    pub fn new(table: &'a PatternTable<N>, sink: S) -> Self {
        Self::with_pause(table, sink, PAUSE_DURATION)
    }

    pub fn with_pause(table: &'a PatternTable<N>, sink: S, pause: Duration) -> Self {
        Self {
            table,
            sink,
            pause,
            state: SchedulerState::Idle,
            active: None,
            pending: ClassMap::splat(None),
            last_shown: ClassMap::splat(None),
            work: WorkTimer::new(),
            loops: LoopTimers::new(),
        }
    }

    /// Request the pattern for `(class, selector)`
    ///
    /// This is the only entry point for status changes. The request is stored
    /// as the pending selector of `class` and then arbitrated against the
    /// pattern currently owning the output.
    pub fn schedule(&mut self, class: EventClass, selector: u8, now: Instant) {
        log!(
            "[Scheduler.schedule] class={} selector={}",
            class.as_str(),
            selector
        );
        let Some(pattern) = self.table.lookup(class, selector) else {
            log!(
                "[Scheduler.schedule] no pattern for class={} selector={}",
                class.as_str(),
                selector
            );
            return;
        };
        let is_status = pattern.is_status();
        let priority = pattern.priority();

        // Repeated identical status requests must not restart the display
        if self.pending[class] == Some(selector) && is_status {
            return;
        }
        self.pending[class] = Some(selector);

        let Some(active) = self.active else {
            self.run_step(class, selector, 0, now);
            return;
        };
        if self.state == SchedulerState::Paused {
            return;
        }

        let same_class = active.class == class;
        if same_class {
            if active.selector == selector {
                return;
            }
            // The class replaced its own request, the old pattern is gone
            self.work.disarm();
        } else if priority <= self.priority_of(active) {
            return;
        }

        if is_status {
            if !same_class && self.state == SchedulerState::Idle && self.work.is_armed() {
                // The displaced pattern was already holding its terminal step
                self.finish(active);
            }
            self.blank();
            self.run_step(class, selector, 0, now);
            return;
        }

        self.active = Some(ActivePattern {
            class,
            selector,
            step: 0,
        });
        self.enter_pause(now);
    }

    /// Run every timer that is due at `now`, in deadline order
    pub fn poll(&mut self, now: Instant) {
        loop {
            let work = self.work.deadline().filter(|&at| at <= now);
            let looped = self.loops.earliest().filter(|&(_, at)| at <= now);
            match (work, looped) {
                (Some(at), Some((class, loop_at))) if loop_at < at => {
                    self.on_loop_timer(class, now);
                }
                (Some(at), _) => {
                    self.work.disarm();
                    self.on_work_timer(at);
                }
                (None, Some((class, _))) => self.on_loop_timer(class, now),
                (None, None) => break,
            }
        }
    }

    /// Instant at which [`poll`](Self::poll) has work to do next
    pub fn next_deadline(&self) -> Option<Instant> {
        let looped = self.loops.earliest().map(|(_, at)| at);
        match (self.work.deadline(), looped) {
            (Some(work), Some(looped)) => Some(work.min(looped)),
            (work, looped) => work.or(looped),
        }
    }

    /// Step and pause timer expiry
    fn on_work_timer(&mut self, now: Instant) {
        match self.state {
            SchedulerState::Idle => self.enter_idle(now),
            SchedulerState::Paused => {
                // The paused class starts with its latest request, anything
                // queued by other classes waits for the next idle scan
                let paused = self
                    .active
                    .and_then(|active| Some((active.class, self.pending[active.class]?)));
                let Some((class, selector)) = paused else {
                    self.active = None;
                    self.enter_idle(now);
                    return;
                };
                self.run_step(class, selector, 0, now);
            }
            SchedulerState::Active => {
                let Some(active) = self.active else {
                    self.enter_idle(now);
                    return;
                };
                self.blank();
                self.run_step(active.class, active.selector, active.step + 1, now);
            }
        }
    }

    /// Loop timer expiry: silently re-request the last shown selector
    fn on_loop_timer(&mut self, class: EventClass, now: Instant) {
        let Some(fired_at) = self.loops.expire(class, now) else {
            return;
        };
        log!("[Scheduler.on_loop_timer] class={}", class.as_str());
        if let Some(selector) = self.last_shown[class] {
            self.schedule(class, selector, fired_at);
        }
    }

    /// Blank the output, retire the finished pattern and pick the next one
    fn enter_idle(&mut self, now: Instant) {
        log!("[Scheduler.enter_idle]");
        self.blank();
        self.state = SchedulerState::Idle;
        if let Some(finished) = self.active.take() {
            self.finish(finished);
        }

        let Some((class, selector)) = self.highest_pending() else {
            return;
        };
        log!("[Scheduler.enter_idle] next class={}", class.as_str());
        self.active = Some(ActivePattern {
            class,
            selector,
            step: 0,
        });
        self.enter_pause(now);
    }

    fn enter_pause(&mut self, now: Instant) {
        log!("[Scheduler.enter_pause]");
        self.blank();
        self.state = SchedulerState::Paused;
        self.work.arm(now + self.pause);
    }

    /// Clear the pending slot of a pattern that played to its end
    fn finish(&mut self, finished: ActivePattern) {
        let class = finished.class;
        if self.pending[class] == Some(finished.selector) {
            self.pending[class] = None;
        }
        self.last_shown[class] = Some(finished.selector);
    }

    /// Pending request with the highest priority
    ///
    /// Ties go to the first class in [`EventClass::ALL`] order. Priority 0
    /// is a valid priority and still gets picked.
    fn highest_pending(&self) -> Option<(EventClass, u8)> {
        let mut best: Option<(EventClass, u8, u8)> = None;
        for class in EventClass::ALL {
            let Some(selector) = self.pending[class] else {
                continue;
            };
            let Some(pattern) = self.table.lookup(class, selector) else {
                continue;
            };
            let priority = pattern.priority();
            if best.is_none_or(|(_, _, best_priority)| priority > best_priority) {
                best = Some((class, selector, priority));
            }
        }
        best.map(|(class, selector, _)| (class, selector))
    }

    fn priority_of(&self, active: ActivePattern) -> u8 {
        self.table
            .lookup(active.class, active.selector)
            .map_or(0, |pattern| pattern.priority())
    }

    fn blank(&mut self) {
        self.sink.all_off();
        self.sink.flush();
    }

    pub const fn state(&self) -> SchedulerState {
        self.state
    }

    /// Class currently owning the output
    ///
    /// A status pattern keeps owning the output after it was drawn, even
    /// though the scheduler reports [`SchedulerState::Idle`].
    pub fn active_class(&self) -> Option<EventClass> {
        self.active.map(|active| active.class)
    }

    pub const fn active(&self) -> Option<ActivePattern> {
        self.active
    }

    /// Index of the step currently on the output
    pub fn active_step(&self) -> Option<usize> {
        self.active.map(|active| active.step)
    }

    pub fn pending(&self, class: EventClass) -> Option<u8> {
        self.pending[class]
    }

    pub fn last_shown(&self, class: EventClass) -> Option<u8> {
        self.last_shown[class]
    }

    pub fn is_looping(&self, class: EventClass) -> bool {
        self.loops.is_running(class)
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn table(&self) -> &'a PatternTable<N> {
        self.table
    }
}
