//! Shared test infrastructure for neopixel-cycle integration tests

#![allow(dead_code)] // Items used across multiple test files; Rust analyzes per-file

use std::sync::{Arc, Mutex};
use std::time::Duration;

use neopixel_cycle::{Color, FixtureConfig, Hsv, RenderSink};

// ============================================================================
// Mock Strip
// ============================================================================

/// Everything a [`RecordingSink`] has seen, shared with the test body.
#[derive(Debug, Default)]
pub struct Recording {
    /// First pixel of every rendered frame.
    pub frames: Vec<u32>,
    pub frame_len: usize,
    pub all_off_calls: usize,
}

/// Mock strip that records the color of every frame it is asked to render
#[derive(Clone, Default)]
pub struct RecordingSink {
    inner: Arc<Mutex<Recording>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> Vec<u32> {
        self.inner.lock().unwrap().frames.clone()
    }

    pub fn frame_count(&self) -> usize {
        self.inner.lock().unwrap().frames.len()
    }

    pub fn last_frame(&self) -> Option<u32> {
        self.inner.lock().unwrap().frames.last().copied()
    }

    pub fn frame_len(&self) -> usize {
        self.inner.lock().unwrap().frame_len
    }

    pub fn all_off_calls(&self) -> usize {
        self.inner.lock().unwrap().all_off_calls
    }
}

impl RenderSink for RecordingSink {
    fn render(&mut self, frame: &[u32]) {
        let mut recording = self.inner.lock().unwrap();
        assert!(
            frame.iter().all(|&p| p == frame[0]),
            "every pixel carries the same color"
        );
        recording.frame_len = frame.len();
        recording.frames.push(frame[0]);
    }

    fn all_off(&mut self) {
        self.inner.lock().unwrap().all_off_calls += 1;
    }
}

// ============================================================================
// Configurations
// ============================================================================

/// One-second ticks, one-minute legs: 60 ticks per leg.
pub fn minute_config() -> FixtureConfig {
    FixtureConfig::builder(16)
        .cycle(Duration::from_secs(1), Duration::from_secs(60))
        .build()
        .unwrap()
}

/// Fast timing for threaded tests: 5 ms ticks, 10 ticks per leg, no flash hold.
pub fn fast_config() -> FixtureConfig {
    FixtureConfig::builder(16)
        .name("Test")
        .cycle(Duration::from_millis(5), Duration::from_millis(50))
        .flash_hold(Duration::ZERO)
        .build()
        .unwrap()
}

// ============================================================================
// Test Helper Functions
// ============================================================================

/// Compare two hues on the circle with tolerance
pub fn hues_equal(a: f32, b: f32, epsilon: f32) -> bool {
    let diff = (a - b).abs() % 360.0;
    diff.min(360.0 - diff) < epsilon
}

/// Compare two HSV triples with tolerance, hue measured around the circle
pub fn hsv_equal(a: Hsv, b: Hsv, epsilon: f32) -> bool {
    hues_equal(a.hue, b.hue, epsilon * 360.0)
        && (a.saturation - b.saturation).abs() < epsilon
        && (a.value - b.value).abs() < epsilon
}

/// Compare two colors channel by channel with tolerance
pub fn colors_equal(a: Color, b: Color) -> bool {
    const EPSILON: f32 = 0.001;
    let (a, b) = (a.rgb(), b.rgb());
    (a.red - b.red).abs() < EPSILON
        && (a.green - b.green).abs() < EPSILON
        && (a.blue - b.blue).abs() < EPSILON
}

/// Poll `cond` until it holds or `timeout` passes
pub fn wait_for(timeout: Duration, mut cond: impl FnMut() -> bool) -> bool {
    let deadline = std::time::Instant::now() + timeout;
    while std::time::Instant::now() < deadline {
        if cond() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(2));
    }
    cond()
}
