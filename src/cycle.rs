//! Two-color cycle engine with state management and tick accounting.
//!
//! Provides [`CycleEngine`], which walks from a start color to an end color in equal
//! HSV increments, one per tick, and reverses direction every time it lands on the
//! end color. The engine does no I/O and keeps no clock: the owner calls
//! [`CycleEngine::tick`] every [`CycleTiming::tick_interval`] and renders the color
//! it returns.

use core::time::Duration;

use crate::color::Color;

/// Tick interval and the time one full start-to-end transition takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleTiming {
    tick_interval: Duration,
    full_transition: Duration,
}

impl CycleTiming {
    /// Creates a timing. Zero values are accepted here and fall back to a single
    /// tick per leg; [`FixtureConfig`](crate::config::FixtureConfig) rejects them up
    /// front.
    pub const fn new(tick_interval: Duration, full_transition: Duration) -> Self {
        Self {
            tick_interval,
            full_transition,
        }
    }

    /// Creates a timing from a tick interval in seconds and a transition in minutes.
    pub const fn from_minutes(tick_interval_secs: u64, transition_minutes: u64) -> Self {
        Self::new(
            Duration::from_secs(tick_interval_secs),
            Duration::from_secs(transition_minutes * 60),
        )
    }

    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    pub fn full_transition(&self) -> Duration {
        self.full_transition
    }

    /// Ticks needed for one leg, never less than one.
    pub fn total_ticks(&self) -> u32 {
        let interval = self.tick_interval.as_secs_f32();
        if interval <= 0.0 {
            return 1;
        }
        let ticks = libm::roundf(self.full_transition.as_secs_f32() / interval);
        if ticks < 1.0 { 1 } else { ticks as u32 }
    }
}

impl Default for CycleTiming {
    /// One-second ticks, five-minute transition.
    fn default() -> Self {
        Self::from_minutes(1, 5)
    }
}

/// The current state of a cycle engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EngineState {
    /// No cycle. Ticking is an error.
    Stopped,
    /// Cycle active. Tick every interval.
    Running,
}

/// Result of one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickOutcome {
    /// Color to render for this tick.
    pub color: Color,
    /// True if this tick landed on the end color and the direction flipped.
    pub reversed: bool,
}

/// Errors that can occur during engine operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CycleError {
    /// Operation called from an invalid state.
    InvalidState {
        /// Human-readable description of the expected state, e.g. "Running"
        expected: &'static str,
        /// The actual current state
        actual: EngineState,
    },
}

impl core::fmt::Display for CycleError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            CycleError::InvalidState { expected, actual } => {
                write!(
                    f,
                    "invalid state: expected {}, but engine is {:?}",
                    expected, actual
                )
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for CycleError {}

/// Live data of a running cycle.
#[derive(Debug, Clone, Copy)]
struct CycleState {
    start: Color,
    end: Color,
    current: Color,
    increment: Color,
    accumulated: Color,
    ticks_elapsed: u32,
    total_ticks: u32,
}

impl CycleState {
    fn new(start: Color, end: Color, total_ticks: u32) -> Self {
        let increment = (end - start) / total_ticks as f32;
        Self {
            start,
            end,
            current: start,
            increment,
            accumulated: increment,
            ticks_elapsed: 0,
            total_ticks,
        }
    }

    /// Flips direction, starting the next leg exactly on the old end color.
    fn reverse(&mut self) {
        *self = Self::new(self.end, self.start, self.total_ticks);
    }
}

/// Oscillates between two colors, one HSV increment per tick.
///
/// Hue is interpolated linearly without wrapping modulo 360, so a leg from 350° to
/// 10° sweeps through the whole wheel rather than the short way around. Each leg
/// restarts from the exact endpoint, so rounding does not accumulate across
/// reversals.
#[derive(Debug, Clone)]
pub struct CycleEngine {
    timing: CycleTiming,
    cycle: Option<CycleState>,
}

impl CycleEngine {
    /// Creates a stopped engine.
    pub fn new(timing: CycleTiming) -> Self {
        Self {
            timing,
            cycle: None,
        }
    }

    /// Starts a cycle from `start` toward `end`, replacing any running cycle.
    ///
    /// Returns the start color, which is what the fixture should show until the
    /// first tick.
    pub fn start(&mut self, start: Color, end: Color) -> Color {
        self.cycle = Some(CycleState::new(start, end, self.timing.total_ticks()));
        start
    }

    /// Replaces the timing. A running cycle is restarted from its current color
    /// toward its end color.
    pub fn set_timing(&mut self, timing: CycleTiming) {
        self.timing = timing;
        if let Some(cycle) = self.cycle {
            self.start(cycle.current, cycle.end);
        }
    }

    /// Advances one tick.
    ///
    /// Must be called from `Running` state.
    ///
    /// # Returns
    /// * `Ok(TickOutcome)` - Color for this tick, and whether the direction flipped
    /// * `Err` - Engine is stopped
    pub fn tick(&mut self) -> Result<TickOutcome, CycleError> {
        let cycle = self.cycle.as_mut().ok_or(CycleError::InvalidState {
            expected: "Running",
            actual: EngineState::Stopped,
        })?;

        cycle.current = cycle.start + cycle.accumulated;
        cycle.accumulated = cycle.accumulated + cycle.increment;
        cycle.ticks_elapsed += 1;

        // The tick count guards against an endpoint the packed comparison skipped.
        let landed = cycle.current == cycle.end || cycle.ticks_elapsed >= cycle.total_ticks;
        if !landed {
            return Ok(TickOutcome {
                color: cycle.current,
                reversed: false,
            });
        }

        let color = cycle.end;
        cycle.reverse();
        Ok(TickOutcome {
            color,
            reversed: true,
        })
    }

    /// Stops the cycle and clears its state. Safe to call when already stopped.
    pub fn stop(&mut self) {
        self.cycle = None;
    }

    /// Returns the current state of the engine.
    pub fn state(&self) -> EngineState {
        if self.cycle.is_some() {
            EngineState::Running
        } else {
            EngineState::Stopped
        }
    }

    /// Returns true if a cycle is active.
    pub fn is_running(&self) -> bool {
        self.cycle.is_some()
    }

    pub fn timing(&self) -> CycleTiming {
        self.timing
    }

    /// Color produced by the latest tick, or the start color before the first one.
    pub fn current_color(&self) -> Option<Color> {
        self.cycle.map(|c| c.current)
    }

    /// `(start, end)` of the current leg.
    pub fn endpoints(&self) -> Option<(Color, Color)> {
        self.cycle.map(|c| (c.start, c.end))
    }

    /// Ticks taken in the current leg.
    pub fn ticks_elapsed(&self) -> Option<u32> {
        self.cycle.map(|c| c.ticks_elapsed)
    }

    /// Ticks per leg.
    pub fn total_ticks(&self) -> u32 {
        self.timing.total_ticks()
    }
}
