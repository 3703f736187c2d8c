#![no_std]

mod logging;

pub mod adapter;
pub mod channel;
pub mod class;
pub mod config;
pub mod output;
pub mod pattern;
pub mod runner;
pub mod scheduler;
pub mod table;

pub use adapter::{EventAdapter, IndicatorRequest, StatusEvent, UsbConnState};
pub use channel::{StatusChannel, StatusReceiver, StatusSender};
pub use class::{ClassMap, EventClass};
pub use config::{IndicatorConfig, LOW_BATTERY_THRESHOLD, PAUSE_DURATION};
pub use output::{MappedSink, NoopSink, SmartLedSink};
pub use pattern::{Pattern, PatternError, Step};
pub use runner::{IndicatorRunner, TickResult};
pub use scheduler::{ActivePattern, Scheduler, SchedulerState};
pub use table::PatternTable;

pub use embassy_time::{Duration, Instant};

/// Abstract indicator output
///
/// Implement this trait to support different hardware platforms.
/// The scheduler is generic over this trait and is its only writer.
pub trait OutputSink {
    /// Set logical `position` to `value` percent (0-100)
    fn set_brightness(&mut self, position: u8, value: u8);

    /// Turn every position off
    fn all_off(&mut self);

    /// Called once a full frame has been written
    fn flush(&mut self) {}
}

impl<S: OutputSink + ?Sized> OutputSink for &mut S {
    fn set_brightness(&mut self, position: u8, value: u8) {
        (**self).set_brightness(position, value);
    }

    fn all_off(&mut self) {
        (**self).all_off();
    }

    fn flush(&mut self) {
        (**self).flush();
    }
}
