//! Indicator patterns
//!
//! A pattern is an ordered list of steps. Each step sets every indicator
//! position to a brightness and holds it for a while before the next step.

use core::fmt;

use embassy_time::Duration;
use heapless::Vec;

/// Maximum number of steps in a single pattern.
pub const MAX_STEPS: usize = 10;

/// Brightness value for a fully lit position (percent).
pub const MAX_BRIGHTNESS: u8 = 100;

/// One frame of a pattern.
///
/// N is the number of indicator positions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step<const N: usize> {
    /// Brightness per logical position (0-100)
    pub brightness: [u8; N],
    /// How long the frame is held before the next step fires.
    ///
    /// Zero marks a terminal step: no further timer is armed.
    pub hold: Duration,
}

impl<const N: usize> Step<N> {
    pub const fn new(brightness: [u8; N], hold: Duration) -> Self {
        Self { brightness, hold }
    }

    /// All positions off for `hold`
    pub const fn wait(hold: Duration) -> Self {
        Self::new([0; N], hold)
    }

    /// Check if the step arms the step timer
    pub const fn has_hold(&self) -> bool {
        self.hold.as_ticks() > 0
    }
}

/// Configuration defects detected while loading patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternError {
    /// Pattern has no steps
    EmptySequence,
    /// Pattern has more than [`MAX_STEPS`] steps
    TooManySteps { len: usize },
    /// A brightness value is above [`MAX_BRIGHTNESS`]
    BrightnessOutOfRange { step: usize, position: usize, value: u8 },
    /// A step other than the last one has a zero hold
    MissingHold { step: usize },
    /// The selector is already registered for this class
    DuplicateSelector { selector: u8 },
    /// The class has no free pattern slots
    TableFull,
}

impl fmt::Display for PatternError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptySequence => write!(f, "pattern has no steps"),
            Self::TooManySteps { len } => {
                write!(f, "pattern has {} steps, at most {} allowed", len, MAX_STEPS)
            }
            Self::BrightnessOutOfRange {
                step,
                position,
                value,
            } => write!(
                f,
                "step {} position {} brightness {} exceeds {}",
                step, position, value, MAX_BRIGHTNESS
            ),
            Self::MissingHold { step } => {
                write!(f, "step {} has no hold but is not the last step", step)
            }
            Self::DuplicateSelector { selector } => {
                write!(f, "selector {} is already registered", selector)
            }
            Self::TableFull => write!(f, "no free pattern slots"),
        }
    }
}

impl core::error::Error for PatternError {}

/// Timed light-output sequence shown for one `(class, selector)` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern<const N: usize> {
    priority: u8,
    loop_period: Duration,
    steps: Vec<Step<N>, MAX_STEPS>,
}

impl<const N: usize> Pattern<N> {
    /// Create a validated pattern
    ///
    /// # Arguments
    /// * `priority` - Higher value wins arbitration
    /// * `loop_period` - Repeat period, zero for one-shot patterns
    /// * `steps` - Ordered frames, every one but the last needs a hold
    pub fn new(
        priority: u8,
        loop_period: Duration,
        steps: &[Step<N>],
    ) -> Result<Self, PatternError> {
        if steps.is_empty() {
            return Err(PatternError::EmptySequence);
        }

        let last = steps.len() - 1;
        for (index, step) in steps.iter().enumerate() {
            if let Some((position, &value)) = step
                .brightness
                .iter()
                .enumerate()
                .find(|&(_, &value)| value > MAX_BRIGHTNESS)
            {
                return Err(PatternError::BrightnessOutOfRange {
                    step: index,
                    position,
                    value,
                });
            }
            if index != last && !step.has_hold() {
                return Err(PatternError::MissingHold { step: index });
            }
        }

        let mut sequence = Vec::new();
        sequence
            .extend_from_slice(steps)
            .map_err(|()| PatternError::TooManySteps { len: steps.len() })?;

        Ok(Self {
            priority,
            loop_period,
            steps: sequence,
        })
    }

    pub const fn priority(&self) -> u8 {
        self.priority
    }

    pub const fn loop_period(&self) -> Duration {
        self.loop_period
    }

    /// Check if the pattern repeats on its own loop timer
    pub const fn is_looping(&self) -> bool {
        self.loop_period.as_ticks() > 0
    }

    /// Status patterns are a single step with no hold.
    ///
    /// They describe a steady state rather than a timed sequence and may be
    /// shown as an immediate overlay.
    pub fn is_status(&self) -> bool {
        self.steps.len() == 1 && !self.steps[0].has_hold()
    }

    pub fn steps(&self) -> &[Step<N>] {
        &self.steps
    }

    pub fn step(&self, index: usize) -> Option<&Step<N>> {
        self.steps.get(index)
    }

    /// Number of steps, never zero
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Check if `index` is the terminal step
    pub fn is_last(&self, index: usize) -> bool {
        index + 1 == self.steps.len()
    }
}
