//! Output sinks
//!
//! Ready-made [`OutputSink`] implementations and wrappers.

mod smart_led;

pub use smart_led::{DEFAULT_GAMMA, SmartLedSink, percent_to_level};

use crate::OutputSink;

/// Sink that performs no hardware interaction.
///
/// Stands in when the LED device failed to initialise, so the scheduler keeps
/// running and every output call becomes a no-op.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoopSink;

impl NoopSink {
    pub const fn new() -> Self {
        Self
    }
}

impl OutputSink for NoopSink {
    fn set_brightness(&mut self, _position: u8, _value: u8) {}

    fn all_off(&mut self) {}
}

/// Remaps logical positions to physical LED indices.
///
/// Keyboards often chain their LEDs in serpentine order, so logical position
/// `i` is written to physical index `map[i]`. Positions outside the map are
/// dropped.
#[derive(Debug, Clone)]
pub struct MappedSink<S: OutputSink, const N: usize> {
    inner: S,
    map: [u8; N],
}

impl<S: OutputSink, const N: usize> MappedSink<S, N> {
    pub const fn new(inner: S, map: [u8; N]) -> Self {
        Self { inner, map }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn inner_mut(&mut self) -> &mut S {
        &mut self.inner
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: OutputSink, const N: usize> OutputSink for MappedSink<S, N> {
    fn set_brightness(&mut self, position: u8, value: u8) {
        if let Some(&physical) = self.map.get(usize::from(position)) {
            self.inner.set_brightness(physical, value);
        }
    }

    fn all_off(&mut self) {
        self.inner.all_off();
    }

    fn flush(&mut self) {
        self.inner.flush();
    }
}
