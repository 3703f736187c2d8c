use embassy_time::Duration;

/// Blank gap inserted before starting or resuming a pattern.
pub const PAUSE_DURATION: Duration = Duration::from_millis(100);

/// Battery charge (percent) below which the low-battery selector is used.
pub const LOW_BATTERY_THRESHOLD: u8 = 20;

/// Configuration for the indicator runner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndicatorConfig {
    /// Duration of the blank pause between two patterns
    pub pause: Duration,
    /// Battery percentage that switches to the low-battery selector
    pub low_battery_threshold: u8,
}

impl IndicatorConfig {
    pub const fn new() -> Self {
        Self {
            pause: PAUSE_DURATION,
            low_battery_threshold: LOW_BATTERY_THRESHOLD,
        }
    }
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self::new()
    }
}
