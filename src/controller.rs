//! Fixture orchestration: property writes in, render instructions out.
//!
//! [`LightController`] owns the live HSV, the color history and the cycle engine of
//! one fixture. Every property write is an explicit `apply_*` call that mutates the
//! state and returns a [`Reaction`] describing what to render; the controller never
//! talks to hardware itself. The runtime in [`crate::fixture`] (or your own loop on
//! embedded targets) renders the frames and schedules [`LightController::tick`].

use core::time::Duration;

use heapless::Vec;
use log::debug;

use crate::color::{Color, wrap_hue};
use crate::command::{LightCommand, LightState};
use crate::config::FixtureConfig;
use crate::cycle::CycleEngine;
use crate::history::ColorHistory;
use crate::types::{ColorMode, CycleChange, FrameKind};

/// Color flashed when a powered-off fixture comes back on in oscillation mode.
pub const MODE_FLASH: Color = Color::RED;

/// One color to fill the whole strip with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    pub color: Color,
    pub kind: FrameKind,
}

/// What a controller call asks the runtime to do, in order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reaction {
    frames: Vec<Frame, 2>,
    cycle: CycleChange,
}

impl Reaction {
    /// Nothing to render, cycle untouched.
    pub fn none() -> Self {
        Self::default()
    }

    fn frame(color: Color, kind: FrameKind) -> Self {
        let mut reaction = Self::none();
        reaction.push(color, kind);
        reaction
    }

    fn push(&mut self, color: Color, kind: FrameKind) {
        let _ = self.frames.push(Frame { color, kind });
    }

    fn with_cycle(mut self, cycle: CycleChange) -> Self {
        self.cycle = cycle;
        self
    }

    /// Frames to render, first to last.
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Last frame, i.e. what the strip shows once the reaction is rendered.
    pub fn last_color(&self) -> Option<Color> {
        self.frames.last().map(|f| f.color)
    }

    pub fn cycle(&self) -> CycleChange {
        self.cycle
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty() && self.cycle == CycleChange::Unchanged
    }
}

/// Drives one fixture from hue/saturation/brightness/power writes.
///
/// Only hue writes commit a color to the history. Saturation writes change the live
/// color without committing, and brightness writes rewrite the value of every
/// history entry so that a later oscillation runs at the new brightness.
#[derive(Debug, Clone)]
pub struct LightController {
    config: FixtureConfig,
    power: bool,
    hue: f32,
    saturation: f32,
    brightness: u8,
    history: ColorHistory,
    engine: CycleEngine,
}

impl LightController {
    /// Creates a powered-off controller: hue 0, saturation 100, brightness 100,
    /// history full of black.
    pub fn new(config: FixtureConfig) -> Self {
        Self::with_history(config, ColorHistory::new())
    }

    /// Creates a powered-off controller with a pre-filled history.
    pub fn with_history(config: FixtureConfig, history: ColorHistory) -> Self {
        let defaults = LightState::default();
        let engine = CycleEngine::new(config.timing());
        Self {
            config,
            power: defaults.power,
            hue: defaults.hue,
            saturation: defaults.saturation,
            brightness: defaults.brightness,
            history,
            engine,
        }
    }

    /// Dispatches a property write to the matching `apply_*` method.
    pub fn apply(&mut self, command: LightCommand) -> Reaction {
        match command {
            LightCommand::SetPower(on) => self.apply_power(on),
            LightCommand::SetHue(hue) => self.apply_hue(hue),
            LightCommand::SetSaturation(saturation) => self.apply_saturation(saturation),
            LightCommand::SetBrightness(brightness) => self.apply_brightness(brightness),
        }
    }

    /// Turns the fixture on or off.
    ///
    /// Powering on re-derives the mode. Coming back from off into
    /// [`ColorMode::Multi`] shows a [`MODE_FLASH`] frame before the cycle starts.
    /// Powering on an already cycling fixture changes nothing. Powering off stops
    /// the cycle and renders black.
    pub fn apply_power(&mut self, on: bool) -> Reaction {
        let was_on = self.power;
        self.power = on;

        if !on {
            let cycle = self.halt_cycle();
            return Reaction::frame(Color::BLACK, FrameKind::Static).with_cycle(cycle);
        }

        if was_on && self.engine.is_running() {
            return Reaction::none();
        }

        let mut reaction = self.refresh();
        if !was_on && reaction.cycle == CycleChange::Started {
            let mut flashed = Reaction::frame(MODE_FLASH, FrameKind::Flash);
            for frame in reaction.frames() {
                flashed.push(frame.color, frame.kind);
            }
            reaction = flashed.with_cycle(CycleChange::Started);
        }
        reaction
    }

    /// Sets the hue in degrees and commits the resulting color to the history.
    pub fn apply_hue(&mut self, hue: f32) -> Reaction {
        self.hue = wrap_hue(hue);
        let color = self.composed_color();
        self.history.record(color);
        debug!("hue {} committed as {}", self.hue, color);

        if !self.power {
            return Reaction::none();
        }
        self.refresh()
    }

    /// Sets the saturation in percent. Does not commit to the history.
    ///
    /// While cycling, the new saturation only shows up in the next hue commit.
    pub fn apply_saturation(&mut self, saturation: f32) -> Reaction {
        self.saturation = saturation.clamp(0.0, 100.0);

        if !self.power || self.engine.is_running() {
            return Reaction::none();
        }
        Reaction::frame(self.composed_color(), FrameKind::Static)
    }

    /// Sets the brightness in percent and rewrites the value of every history entry.
    pub fn apply_brightness(&mut self, brightness: u8) -> Reaction {
        self.brightness = brightness.min(100);
        self.history.set_value(self.value());

        if !self.power {
            return Reaction::none();
        }
        self.refresh()
    }

    /// Advances the color cycle by one tick.
    ///
    /// Returns an empty reaction when the fixture is off or not cycling.
    pub fn tick(&mut self) -> Reaction {
        if !self.power {
            return Reaction::none();
        }
        let Ok(outcome) = self.engine.tick() else {
            return Reaction::none();
        };
        if outcome.reversed {
            debug!("cycle reversed at {}", outcome.color);
        }
        Reaction::frame(outcome.color, FrameKind::Cycle)
    }

    /// Stops the color cycle, leaving the last rendered color on the strip.
    pub fn stop_cycle(&mut self) -> Reaction {
        let cycle = self.halt_cycle();
        Reaction::none().with_cycle(cycle)
    }

    /// Mode derived from the history under the configured detection rule.
    pub fn mode(&self) -> ColorMode {
        self.history.detect(self.config.detection())
    }

    /// Snapshot of the property values.
    pub fn state(&self) -> LightState {
        LightState {
            power: self.power,
            hue: self.hue,
            saturation: self.saturation,
            brightness: self.brightness,
            mode: self.mode(),
        }
    }

    /// Live hue, saturation and brightness as a color.
    pub fn composed_color(&self) -> Color {
        Color::from_hsv(self.hue, self.saturation / 100.0, self.value())
    }

    /// Color currently on the strip.
    pub fn current_color(&self) -> Color {
        if !self.power {
            return Color::BLACK;
        }
        self.engine
            .current_color()
            .unwrap_or_else(|| self.composed_color())
    }

    pub fn is_cycling(&self) -> bool {
        self.engine.is_running()
    }

    /// Interval at which [`tick`](Self::tick) must be called while cycling.
    pub fn tick_interval(&self) -> Duration {
        self.engine.timing().tick_interval()
    }

    pub fn history(&self) -> &ColorHistory {
        &self.history
    }

    pub fn engine(&self) -> &CycleEngine {
        &self.engine
    }

    pub fn config(&self) -> &FixtureConfig {
        &self.config
    }

    fn value(&self) -> f32 {
        f32::from(self.brightness) / 100.0
    }

    /// Shows whatever the mode calls for: the cycle in `Multi`, the live color in
    /// `Single`. Assumes the fixture is on.
    fn refresh(&mut self) -> Reaction {
        match self.mode() {
            ColorMode::Multi => {
                let start = self
                    .engine
                    .start(self.history.newest(), self.history.previous());
                debug!("cycling {} <-> {}", self.history.newest(), self.history.previous());
                Reaction::frame(start, FrameKind::Static).with_cycle(CycleChange::Started)
            }
            ColorMode::Single => {
                let cycle = self.halt_cycle();
                Reaction::frame(self.composed_color(), FrameKind::Static).with_cycle(cycle)
            }
        }
    }

    fn halt_cycle(&mut self) -> CycleChange {
        if !self.engine.is_running() {
            return CycleChange::Unchanged;
        }
        self.engine.stop();
        debug!("cycle stopped");
        CycleChange::Stopped
    }
}
