//! Pixel-strip abstraction.

use crate::color::Color;

/// Trait for abstracting the addressable LED strip driver.
///
/// Implement this for your strip hardware (PWM/DMA WS281x driver, SPI, a network
/// bridge, etc.) so a fixture can push frames to it. Frames are packed `0xRRGGBB`
/// values, one per LED. Handle hardware errors internally; these methods cannot
/// fail.
pub trait RenderSink {
    /// Pushes a frame to the strip and triggers output.
    fn render(&mut self, frame: &[u32]);

    /// Blocks until the last pushed frame has been fully shifted out.
    ///
    /// The default returns immediately, for sinks whose `render` is already
    /// synchronous.
    fn wait_until_complete(&mut self) {}

    /// Turns every LED off. Called once when the fixture shuts down.
    fn all_off(&mut self);
}

impl<S: RenderSink + ?Sized> RenderSink for &mut S {
    fn render(&mut self, frame: &[u32]) {
        (**self).render(frame);
    }

    fn wait_until_complete(&mut self) {
        (**self).wait_until_complete();
    }

    fn all_off(&mut self) {
        (**self).all_off();
    }
}

/// Fills every pixel of `frame` with `color`.
pub fn fill_frame(frame: &mut [u32], color: Color) {
    frame.fill(color.packed());
}

/// Fills `frame` with `color` and pushes it to `sink`, waiting for completion.
pub fn render_color<S: RenderSink + ?Sized>(sink: &mut S, frame: &mut [u32], color: Color) {
    fill_frame(frame, color);
    sink.render(frame);
    sink.wait_until_complete();
}

#[cfg(test)]
mod tests {
    use super::*;

    struct CountingSink {
        renders: usize,
        waits: usize,
        last: [u32; 3],
    }

    impl RenderSink for CountingSink {
        fn render(&mut self, frame: &[u32]) {
            self.renders += 1;
            self.last.copy_from_slice(frame);
        }

        fn wait_until_complete(&mut self) {
            self.waits += 1;
        }

        fn all_off(&mut self) {
            self.last = [0; 3];
        }
    }

    #[test]
    fn render_color_fills_and_waits() {
        let mut sink = CountingSink {
            renders: 0,
            waits: 0,
            last: [0; 3],
        };
        let mut frame = [0u32; 3];

        render_color(&mut sink, &mut frame, Color::RED);

        assert_eq!(sink.renders, 1);
        assert_eq!(sink.waits, 1);
        assert_eq!(sink.last, [0xFF0000; 3]);
    }
}
