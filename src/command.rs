//! Command-based control for light controllers.
//!
//! [`LightCommand`] is the inbound side of the accessory property bus and
//! [`LightState`] the outbound side: a remote controller writes one of the four
//! properties and reads back the current values.

use crate::types::ColorMode;

/// Property writes accepted by a light controller.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LightCommand {
    /// Turn the fixture on or off.
    SetPower(bool),
    /// Hue in degrees, wrapped into `[0, 360)`.
    SetHue(f32),
    /// Saturation in percent, clamped into `[0, 100]`.
    SetSaturation(f32),
    /// Brightness in percent, clamped into `[0, 100]`.
    SetBrightness(u8),
}

/// Current property values, as reported back to the remote controller.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LightState {
    pub power: bool,
    /// Degrees in `[0, 360)`.
    pub hue: f32,
    /// Percent in `[0, 100]`.
    pub saturation: f32,
    /// Percent in `[0, 100]`.
    pub brightness: u8,
    /// Derived from the color history, never written directly.
    pub mode: ColorMode,
}

impl Default for LightState {
    fn default() -> Self {
        Self {
            power: false,
            hue: 0.0,
            saturation: 100.0,
            brightness: 100,
            mode: ColorMode::Single,
        }
    }
}
