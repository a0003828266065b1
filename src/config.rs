//! Fixture configuration and construction-time validation.

use core::time::Duration;

use heapless::{String, Vec};

use crate::cycle::CycleTiming;
use crate::types::ModeDetection;

/// Lowest color temperature a fixture may advertise, in mireds.
pub const MIN_MIREDS: f32 = 50.0;

/// Highest color temperature a fixture may advertise, in mireds.
pub const MAX_MIREDS: f32 = 400.0;

/// Longest fixture name accepted.
pub const MAX_NAME_LEN: usize = 32;

/// Default hold time for the red flash shown when entering oscillation.
pub const DEFAULT_FLASH_HOLD: Duration = Duration::from_millis(500);

/// What kind of light the fixture presents to the remote controller.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ColorType {
    /// Single color bulb.
    Monochrome,

    /// Hue and saturation can be varied.
    #[default]
    Color,

    /// Color temperature in reciprocal megakelvin (mireds). The range must lie
    /// within [`MIN_MIREDS`]..=[`MAX_MIREDS`].
    ColorTemperature { min: f32, max: f32 },
}

/// Property exposed to the remote controller.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Characteristic {
    PowerState,
    Brightness,
    Hue,
    Saturation,
    ColorTemperature { min: f32, max: f32 },
}

/// Configuration validation errors.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// The strip must have at least one LED.
    NoLeds,

    /// Tick interval of zero.
    ZeroTickInterval,

    /// Full transition of zero.
    ZeroTransition,

    /// Color temperature range outside the supported bounds, or inverted.
    TemperatureOutOfRange { min: f32, max: f32 },

    /// Fixture name longer than [`MAX_NAME_LEN`].
    NameTooLong,

    /// Satellite entry at this position is not `ip` or `ip:port`.
    InvalidSatelliteAddress { index: usize },
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ConfigError::NoLeds => write!(f, "fixture must have at least one LED"),
            ConfigError::ZeroTickInterval => write!(f, "tick interval must be non-zero"),
            ConfigError::ZeroTransition => {
                write!(f, "full transition duration must be non-zero")
            }
            ConfigError::TemperatureOutOfRange { min, max } => {
                write!(
                    f,
                    "maximum range for color temperature is {}...{}, {}...{} is out of bounds",
                    MIN_MIREDS, MAX_MIREDS, min, max
                )
            }
            ConfigError::NameTooLong => {
                write!(f, "fixture name exceeds {} bytes", MAX_NAME_LEN)
            }
            ConfigError::InvalidSatelliteAddress { index } => {
                write!(f, "satellite address #{} is not ip or ip:port", index)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

/// Validated settings for one fixture.
#[derive(Debug, Clone, PartialEq)]
pub struct FixtureConfig {
    name: String<MAX_NAME_LEN>,
    led_count: usize,
    timing: CycleTiming,
    detection: ModeDetection,
    color_type: ColorType,
    dimmable: bool,
    flash_hold: Duration,
}

impl FixtureConfig {
    /// Creates a new configuration builder.
    pub fn builder(led_count: usize) -> FixtureConfigBuilder {
        FixtureConfigBuilder::new(led_count)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of pixels in every rendered frame.
    pub fn led_count(&self) -> usize {
        self.led_count
    }

    pub fn timing(&self) -> CycleTiming {
        self.timing
    }

    pub fn detection(&self) -> ModeDetection {
        self.detection
    }

    pub fn color_type(&self) -> ColorType {
        self.color_type
    }

    pub fn is_dimmable(&self) -> bool {
        self.dimmable
    }

    /// How long the mode-change flash stays on the strip before the real color.
    pub fn flash_hold(&self) -> Duration {
        self.flash_hold
    }

    /// Properties the fixture exposes, in registration order.
    pub fn characteristics(&self) -> Vec<Characteristic, 4> {
        let mut out = Vec::new();
        let _ = out.push(Characteristic::PowerState);
        if self.dimmable {
            let _ = out.push(Characteristic::Brightness);
        }
        match self.color_type {
            ColorType::Color => {
                let _ = out.push(Characteristic::Hue);
                let _ = out.push(Characteristic::Saturation);
            }
            ColorType::ColorTemperature { min, max } => {
                let _ = out.push(Characteristic::ColorTemperature { min, max });
            }
            ColorType::Monochrome => {}
        }
        out
    }
}

/// Builder for constructing validated fixture configurations.
#[derive(Debug, Clone)]
pub struct FixtureConfigBuilder {
    name: String<MAX_NAME_LEN>,
    name_overflow: bool,
    led_count: usize,
    timing: CycleTiming,
    detection: ModeDetection,
    color_type: ColorType,
    dimmable: bool,
    flash_hold: Duration,
}

impl FixtureConfigBuilder {
    /// Creates a builder for a strip of `led_count` pixels.
    ///
    /// Defaults: dimmable color fixture named "Light", one-second ticks, five-minute
    /// transitions, anti-black mode detection.
    pub fn new(led_count: usize) -> Self {
        let mut name = String::new();
        let _ = name.push_str("Light");
        Self {
            name,
            name_overflow: false,
            led_count,
            timing: CycleTiming::default(),
            detection: ModeDetection::default(),
            color_type: ColorType::default(),
            dimmable: true,
            flash_hold: DEFAULT_FLASH_HOLD,
        }
    }

    pub fn name(mut self, name: &str) -> Self {
        self.name.clear();
        self.name_overflow = self.name.push_str(name).is_err();
        self
    }

    pub fn timing(mut self, timing: CycleTiming) -> Self {
        self.timing = timing;
        self
    }

    /// Tick interval and the duration of one full transition.
    pub fn cycle(self, tick_interval: Duration, full_transition: Duration) -> Self {
        self.timing(CycleTiming::new(tick_interval, full_transition))
    }

    pub fn detection(mut self, detection: ModeDetection) -> Self {
        self.detection = detection;
        self
    }

    pub fn color_type(mut self, color_type: ColorType) -> Self {
        self.color_type = color_type;
        self
    }

    pub fn dimmable(mut self, dimmable: bool) -> Self {
        self.dimmable = dimmable;
        self
    }

    pub fn flash_hold(mut self, hold: Duration) -> Self {
        self.flash_hold = hold;
        self
    }

    /// Builds and validates the configuration.
    ///
    /// # Errors
    /// * `NoLeds` - Zero LEDs
    /// * `ZeroTickInterval` / `ZeroTransition` - Degenerate cycle timing
    /// * `TemperatureOutOfRange` - Mired range outside 50...400 or inverted
    /// * `NameTooLong` - Name does not fit
    pub fn build(self) -> Result<FixtureConfig, ConfigError> {
        if self.led_count == 0 {
            return Err(ConfigError::NoLeds);
        }
        if self.timing.tick_interval().is_zero() {
            return Err(ConfigError::ZeroTickInterval);
        }
        if self.timing.full_transition().is_zero() {
            return Err(ConfigError::ZeroTransition);
        }
        if let ColorType::ColorTemperature { min, max } = self.color_type {
            if !(min >= MIN_MIREDS && max <= MAX_MIREDS && min <= max) {
                return Err(ConfigError::TemperatureOutOfRange { min, max });
            }
        }
        if self.name_overflow {
            return Err(ConfigError::NameTooLong);
        }

        Ok(FixtureConfig {
            name: self.name,
            led_count: self.led_count,
            timing: self.timing,
            detection: self.detection,
            color_type: self.color_type,
            dimmable: self.dimmable,
            flash_hold: self.flash_hold,
        })
    }
}
