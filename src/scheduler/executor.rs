//! Command executor
//!
//! Advances the active pattern one step per step-timer expiry.

use embassy_time::Instant;

use super::{ActivePattern, Scheduler, SchedulerState};
use crate::OutputSink;
use crate::class::EventClass;
use crate::logging::log;

impl<S: OutputSink, const N: usize> Scheduler<'_, S, N> {
    /// Write step `index` of the `(class, selector)` pattern to the output
    ///
    /// The first step starts or stops the class loop timer. A step with a
    /// hold arms the step timer; the terminal step returns the scheduler to
    /// [`SchedulerState::Idle`], where the hold (if any) still runs before the
    /// next pattern is picked.
    pub(super) fn run_step(&mut self, class: EventClass, selector: u8, index: usize, now: Instant) {
        let table = self.table;
        let Some(pattern) = table.lookup(class, selector) else {
            log!(
                "[Scheduler.run_step] no pattern for class={} selector={}",
                class.as_str(),
                selector
            );
            self.active = None;
            self.state = SchedulerState::Idle;
            return;
        };
        let Some(step) = pattern.step(index) else {
            log!(
                "[Scheduler.run_step] step {} out of range for class={}",
                index,
                class.as_str()
            );
            self.active = None;
            self.state = SchedulerState::Idle;
            return;
        };

        if index == 0 {
            log!("[Scheduler.run_step] run class={}", class.as_str());
            if pattern.is_looping() {
                if self.loops.start(class, pattern.loop_period(), now) {
                    log!(
                        "[Scheduler.run_step] start loop timer: {} ms",
                        pattern.loop_period().as_millis()
                    );
                }
            } else {
                self.loops.stop(class);
            }
        }

        for (position, &value) in (0..=u8::MAX).zip(step.brightness.iter()) {
            self.sink.set_brightness(position, value);
        }
        self.sink.flush();

        if step.has_hold() {
            self.work.arm(now + step.hold);
        }

        self.active = Some(ActivePattern {
            class,
            selector,
            step: index,
        });
        self.state = if pattern.is_last(index) {
            SchedulerState::Idle
        } else {
            SchedulerState::Active
        };
    }
}
