#![allow(dead_code)]

use myrtio_led_indicator::{
    Duration, EventClass, Instant, OutputSink, Pattern, PatternTable, Scheduler, Step,
};

pub const POSITIONS: usize = 4;

pub const USB_BLINK: u8 = 1;
pub const USB_SOLID: u8 = 0;
pub const BATTERY_LOW: u8 = 1;
pub const BATTERY_NORMAL: u8 = 0;
pub const BATTERY_CRITICAL: u8 = 2;
pub const BLE_BLINK: u8 = 1;
pub const BLE_FLASH: u8 = 0;

/// Output operation captured by [`RecordingSink`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkOp {
    Set(u8, u8),
    AllOff,
    Flush,
}

/// Sink that remembers every call and the resulting levels
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub ops: Vec<SinkOp>,
    pub levels: [u8; POSITIONS],
    /// Frames that started writing while the previous frame was still lit
    pub bleed_through: usize,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take_ops(&mut self) -> Vec<SinkOp> {
        std::mem::take(&mut self.ops)
    }

    pub fn is_dark(&self) -> bool {
        self.levels.iter().all(|&level| level == 0)
    }
}

impl OutputSink for RecordingSink {
    fn set_brightness(&mut self, position: u8, value: u8) {
        let frame_start = !matches!(self.ops.last(), Some(SinkOp::Set(..)));
        if frame_start && !self.is_dark() {
            self.bleed_through += 1;
        }
        self.ops.push(SinkOp::Set(position, value));
        self.levels[usize::from(position)] = value;
    }

    fn all_off(&mut self) {
        self.ops.push(SinkOp::AllOff);
        self.levels = [0; POSITIONS];
    }

    fn flush(&mut self) {
        self.ops.push(SinkOp::Flush);
    }
}

pub const fn ms(value: u64) -> Instant {
    Instant::from_millis(value)
}

pub const fn hold(value: u64) -> Duration {
    Duration::from_millis(value)
}

/// Patterns used across the scheduler tests:
///
/// - USB blink: priority 4, loops every 2000 ms, 2 steps of 200 ms
/// - USB solid: status, priority 2
/// - BLE blink: priority 5, one-shot, 2 steps of 300 ms
/// - BLE flash: priority 7, one-shot, 2 steps of 100 ms
/// - Battery low: priority 10, one-shot, 3 steps of 100 ms
/// - Battery normal: status, priority 1
/// - Battery critical: status, priority 12
pub fn scenario_table() -> PatternTable<POSITIONS> {
    let mut table = PatternTable::new();
    table
        .insert(
            EventClass::Usb,
            USB_BLINK,
            Pattern::new(
                4,
                hold(2000),
                &[Step::new([100, 0, 0, 0], hold(200)), Step::wait(hold(200))],
            )
            .unwrap(),
        )
        .unwrap();
    table
        .insert(
            EventClass::Usb,
            USB_SOLID,
            Pattern::new(2, hold(0), &[Step::new([0, 100, 0, 0], hold(0))]).unwrap(),
        )
        .unwrap();
    table
        .insert(
            EventClass::Ble,
            BLE_BLINK,
            Pattern::new(
                5,
                hold(0),
                &[Step::new([0, 0, 100, 0], hold(300)), Step::wait(hold(300))],
            )
            .unwrap(),
        )
        .unwrap();
    table
        .insert(
            EventClass::Ble,
            BLE_FLASH,
            Pattern::new(
                7,
                hold(0),
                &[Step::new([0, 0, 50, 0], hold(100)), Step::wait(hold(100))],
            )
            .unwrap(),
        )
        .unwrap();
    table
        .insert(
            EventClass::Battery,
            BATTERY_LOW,
            Pattern::new(
                10,
                hold(0),
                &[
                    Step::new([0, 0, 0, 100], hold(100)),
                    Step::wait(hold(100)),
                    Step::new([0, 0, 0, 100], hold(100)),
                ],
            )
            .unwrap(),
        )
        .unwrap();
    table
        .insert(
            EventClass::Battery,
            BATTERY_NORMAL,
            Pattern::new(1, hold(0), &[Step::new([0, 0, 0, 20], hold(0))]).unwrap(),
        )
        .unwrap();
    table
        .insert(
            EventClass::Battery,
            BATTERY_CRITICAL,
            Pattern::new(12, hold(0), &[Step::new([0, 0, 0, 100], hold(0))]).unwrap(),
        )
        .unwrap();
    table
}

/// Fire every deadline up to and including `until`, one at a time,
/// the way a worker sleeping on `next_deadline` would.
pub fn advance<S: OutputSink, const N: usize>(scheduler: &mut Scheduler<'_, S, N>, until: Instant) {
    while let Some(deadline) = scheduler.next_deadline() {
        if deadline > until {
            break;
        }
        scheduler.poll(deadline);
    }
}
