//! Sliding window of committed colors and two-color mode detection.

use heapless::Deque;

use crate::color::Color;
use crate::types::{ColorMode, ModeDetection};

/// Number of committed colors kept for mode detection.
pub const HISTORY_LEN: usize = 4;

/// The last [`HISTORY_LEN`] committed colors, oldest first.
///
/// The window is always full: it starts as four blacks and every commit pushes out
/// the oldest entry.
#[derive(Debug, Clone)]
pub struct ColorHistory {
    colors: Deque<Color, HISTORY_LEN>,
}

impl ColorHistory {
    /// Creates a history holding four blacks.
    pub fn new() -> Self {
        Self::filled(Color::BLACK)
    }

    /// Creates a history holding `color` in every slot.
    pub fn filled(color: Color) -> Self {
        let mut colors = Deque::new();
        while !colors.is_full() {
            let _ = colors.push_back(color);
        }
        Self { colors }
    }

    /// Creates a history from four colors, oldest first.
    pub fn from_colors(colors: [Color; HISTORY_LEN]) -> Self {
        let mut history = Self::new();
        for color in colors {
            history.record(color);
        }
        history
    }

    /// Commits a color, dropping the oldest entry.
    pub fn record(&mut self, color: Color) {
        if self.colors.is_full() {
            self.colors.pop_front();
        }
        let _ = self.colors.push_back(color);
    }

    /// Detects whether the window shows two alternating colors.
    ///
    /// `A, B, A, B` with `A != B` under packed equality yields [`ColorMode::Multi`].
    /// With [`ModeDetection::AntiBlack`] any black entry forces
    /// [`ColorMode::Single`]. The rule is a heuristic: coincidental repeats also
    /// match.
    pub fn detect(&self, policy: ModeDetection) -> ColorMode {
        let [a, b, c, d] = self.to_array();

        let alternating = a == c && b == d && a != b;
        if !alternating {
            return ColorMode::Single;
        }

        match policy {
            ModeDetection::AntiBlack if self.colors.iter().any(Color::is_black) => {
                ColorMode::Single
            }
            _ => ColorMode::Multi,
        }
    }

    /// Rewrites the value of every entry, keeping hue and saturation.
    pub fn set_value(&mut self, value: f32) {
        for color in self.colors.iter_mut() {
            *color = color.with_value(value);
        }
    }

    /// Most recently committed color.
    pub fn newest(&self) -> Color {
        self.colors.back().copied().unwrap_or(Color::BLACK)
    }

    /// Color committed just before the newest one.
    pub fn previous(&self) -> Color {
        self.get(HISTORY_LEN - 2).unwrap_or(Color::BLACK)
    }

    /// Entry at `index`, where 0 is the oldest.
    pub fn get(&self, index: usize) -> Option<Color> {
        self.colors.iter().nth(index).copied()
    }

    /// Iterates oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Color> {
        self.colors.iter()
    }

    /// Copies the window out, oldest first.
    pub fn to_array(&self) -> [Color; HISTORY_LEN] {
        let mut out = [Color::BLACK; HISTORY_LEN];
        for (slot, color) in out.iter_mut().zip(self.colors.iter()) {
            *slot = *color;
        }
        out
    }
}

impl Default for ColorHistory {
    fn default() -> Self {
        Self::new()
    }
}
