#![cfg_attr(not(feature = "std"), no_std)]
#![doc = include_str!("../README.md")]

//! # Core Concepts
//!
//! - **`Color`**: An RGB color that also carries its exact HSV triple; compared by packed `0xRRGGBB`
//! - **`ColorHistory`**: The last four committed colors, used to detect an `A, B, A, B` request
//! - **`ColorMode`**: `Single` (static color) or `Multi` (oscillate between two colors)
//! - **`CycleEngine`**: Walks between two colors in equal HSV steps, reversing at each end
//! - **`LightController`**: Applies power/hue/saturation/brightness writes and tells you what to render
//! - **`RenderSink`**: Trait to implement for your LED strip driver
//! - **`FixtureConfig`**: Validated fixture settings built with `FixtureConfig::builder`
//! - **`Fixture`** (`std`): Worker thread running a controller, a sink and satellite forwarding
//!
//! Colors use `Srgb<f32>` (0.0-1.0 range) for RGB and degrees/fractions for HSV. The strip
//! itself only ever sees packed `0xRRGGBB` values.

// Re-export Srgb from palette for user convenience
pub use palette::Srgb;

pub mod color;
pub mod command;
pub mod config;
pub mod controller;
pub mod cycle;
pub mod history;
pub mod sink;
pub mod types;

#[cfg(feature = "std")]
pub mod fixture;
#[cfg(feature = "std")]
pub mod satellite;

pub use color::{Color, Hsv, hsv_to_rgb, rgb_to_hsv};
pub use command::{LightCommand, LightState};
pub use config::{Characteristic, ColorType, ConfigError, FixtureConfig, FixtureConfigBuilder};
pub use controller::{Frame, LightController, MODE_FLASH, Reaction};
pub use cycle::{CycleEngine, CycleError, CycleTiming, EngineState, TickOutcome};
pub use history::{ColorHistory, HISTORY_LEN};
pub use sink::RenderSink;
pub use types::{ColorMode, CycleChange, FrameKind, ModeDetection};

#[cfg(feature = "std")]
pub use fixture::{Fixture, FixtureError};
#[cfg(feature = "std")]
pub use satellite::{SatelliteLink, parse_satellites};

pub const COLOR_OFF: Color = Color::BLACK;
