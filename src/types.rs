//! Core enums shared by the history, controller and configuration.

/// Whether the fixture shows one static color or oscillates between two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ColorMode {
    /// One static color.
    #[default]
    Single,

    /// Oscillation between the two alternating colors of the history.
    Multi,
}

/// Rule used to promote an alternating history to [`ColorMode::Multi`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ModeDetection {
    /// `A, B, A, B` with no black entry. A history full of black (the fixture was
    /// off) never counts as an oscillation request.
    #[default]
    AntiBlack,

    /// `A, B, A, B` alone, black entries included.
    PatternOnly,
}

/// Whether a reaction touched the color cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CycleChange {
    /// Cycle left as it was.
    #[default]
    Unchanged,

    /// Cycle (re)started from its first tick.
    Started,

    /// Cycle stopped and cleared.
    Stopped,
}

/// Why a frame is being rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameKind {
    /// Brief signal that the fixture is entering oscillation. Not forwarded to
    /// satellites.
    Flash,

    /// Static color after a property write.
    Static,

    /// Intermediate color produced by a cycle tick.
    Cycle,
}
