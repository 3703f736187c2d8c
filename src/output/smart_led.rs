//! Addressable LED sink
//!
//! Drives a `smart-leds` strip where every indicator position is one pixel.
//! Brightness percentages are gamma-corrected before scaling the pixel color,
//! so 50% looks like half brightness instead of nearly full.

use smart_leds::{RGB8, SmartLedsWrite};

use crate::OutputSink;
use crate::logging::log;
use crate::pattern::MAX_BRIGHTNESS;

/// Gamma exponent used for WS2812-class LEDs.
pub const DEFAULT_GAMMA: f32 = 2.2;

/// Convert a brightness percentage (0-100) into an 8-bit level.
///
/// Values above 100 are clamped.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn percent_to_level(percent: u8, gamma: f32) -> u8 {
    let percent = percent.min(MAX_BRIGHTNESS);
    if percent == 0 {
        return 0;
    }
    let ratio = f32::from(percent) / f32::from(MAX_BRIGHTNESS);
    let level = libm::roundf(libm::powf(ratio, gamma) * 255.0);
    level.clamp(0.0, 255.0) as u8
}

const fn scale8(value: u8, scale: u8) -> u8 {
    ((value as u16 * (scale as u16 + 1)) >> 8) as u8
}

/// Sink that renders positions onto a smart LED strip
///
/// Levels are buffered and written to the strip on [`OutputSink::flush`].
pub struct SmartLedSink<W: SmartLedsWrite, const N: usize> {
    writer: W,
    color: RGB8,
    gamma: f32,
    levels: [u8; N],
}

impl<W, const N: usize> SmartLedSink<W, N>
where
    W: SmartLedsWrite<Color = RGB8>,
{
    /// Create a sink lighting every position with `color`
    pub const fn new(writer: W, color: RGB8) -> Self {
        Self::with_gamma(writer, color, DEFAULT_GAMMA)
    }

    pub const fn with_gamma(writer: W, color: RGB8, gamma: f32) -> Self {
        Self {
            writer,
            color,
            gamma,
            levels: [0; N],
        }
    }

    pub fn set_color(&mut self, color: RGB8) {
        self.color = color;
    }

    /// Buffered 8-bit levels, one per position
    pub fn levels(&self) -> &[u8; N] {
        &self.levels
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }

    fn pixel(&self, level: u8) -> RGB8 {
        RGB8 {
            r: scale8(self.color.r, level),
            g: scale8(self.color.g, level),
            b: scale8(self.color.b, level),
        }
    }
}

impl<W, const N: usize> OutputSink for SmartLedSink<W, N>
where
    W: SmartLedsWrite<Color = RGB8>,
{
    fn set_brightness(&mut self, position: u8, value: u8) {
        let level = percent_to_level(value, self.gamma);
        if let Some(slot) = self.levels.get_mut(usize::from(position)) {
            *slot = level;
        }
    }

    fn all_off(&mut self) {
        self.levels = [0; N];
    }

    fn flush(&mut self) {
        let mut frame = [RGB8::default(); N];
        for (pixel, &level) in frame.iter_mut().zip(self.levels.iter()) {
            *pixel = self.pixel(level);
        }
        if self.writer.write(frame).is_err() {
            log!("[SmartLedSink.flush] strip write failed");
        }
    }
}
