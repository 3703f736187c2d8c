//! Indicator worker.
//!
//! Serializes status notifications and timer expiries onto one context
//! without async/await or platform-specific timers. The caller is
//! responsible for sleeping between ticks.

use embassy_time::{Duration, Instant};

use crate::OutputSink;
use crate::adapter::EventAdapter;
use crate::channel::StatusReceiver;
use crate::config::IndicatorConfig;
use crate::scheduler::Scheduler;
use crate::table::PatternTable;

/// Result of a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickResult {
    /// When the next timer expires, `None` if no timer is armed.
    pub next_deadline: Option<Instant>,
    /// How long the caller may sleep unless a notification arrives first
    /// (zero if a deadline has already passed).
    pub sleep_duration: Option<Duration>,
}

/// Owns the scheduler and feeds it from the status queue.
///
/// # Usage
///
/// ```ignore
/// static STATUS: StatusChannel<8> = StatusChannel::new();
///
/// let mut runner = IndicatorRunner::new(&TABLE, sink, STATUS.receiver(), &IndicatorConfig::default());
///
/// loop {
///     let result = runner.tick(Instant::now());
///
///     // Platform-specific wait: the deadline or the next notification
///     wait_for_deadline_or_event(result.next_deadline);
/// }
/// ```
pub struct IndicatorRunner<'a, S: OutputSink, const N: usize, const QUEUE_SIZE: usize> {
    events: StatusReceiver<'a, QUEUE_SIZE>,
    adapter: EventAdapter,
    scheduler: Scheduler<'a, S, N>,
}

impl<'a, S: OutputSink, const N: usize, const QUEUE_SIZE: usize>
    IndicatorRunner<'a, S, N, QUEUE_SIZE>
{
    pub fn new(
        table: &'a PatternTable<N>,
        sink: S,
        events: StatusReceiver<'a, QUEUE_SIZE>,
        config: &IndicatorConfig,
    ) -> Self {
        Self {
            events,
            adapter: EventAdapter::new(config.low_battery_threshold),
            scheduler: Scheduler::with_pause(table, sink, config.pause),
        }
    }

    /// Process everything that is due at `now`.
    ///
    /// This method:
    /// 1. Fires expired step, pause and loop timers
    /// 2. Drains queued notifications into the scheduler
    /// 3. Returns the deadline for the next timer
    pub fn tick(&mut self, now: Instant) -> TickResult {
        self.scheduler.poll(now);

        while let Ok(event) = self.events.try_receive() {
            let request = self.adapter.map(event);
            self.scheduler.schedule(request.class, request.selector, now);
        }

        let next_deadline = self.scheduler.next_deadline();
        let sleep_duration = next_deadline.map(|deadline| {
            deadline
                .checked_duration_since(now)
                .unwrap_or(Duration::from_ticks(0))
        });

        TickResult {
            next_deadline,
            sleep_duration,
        }
    }

    pub fn scheduler(&self) -> &Scheduler<'a, S, N> {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut Scheduler<'a, S, N> {
        &mut self.scheduler
    }
}
