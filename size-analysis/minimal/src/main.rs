#![no_std]
#![no_main]

use core::time::Duration;

use cortex_m_rt::entry;
use neopixel_cycle::{
    Color, FixtureConfig, LightCommand, LightController, ModeDetection, RenderSink, sink,
};
use panic_halt as _;

const LED_COUNT: usize = 60;

// ============================================================================
// Minimal Strip Implementation
// ============================================================================

/// Zero-size strip implementation for measuring library overhead
pub struct MinimalStrip;

impl RenderSink for MinimalStrip {
    fn render(&mut self, frame: &[u32]) {
        core::hint::black_box(frame);
    }

    fn all_off(&mut self) {
        core::hint::black_box(());
    }
}

// ============================================================================
// Controller Usage
// ============================================================================

// This function uses the library to prevent optimizer from removing code
#[inline(never)]
fn drive_controller() {
    let Ok(config) = FixtureConfig::builder(LED_COUNT)
        .cycle(Duration::from_secs(1), Duration::from_secs(300))
        .detection(ModeDetection::AntiBlack)
        .build()
    else {
        return;
    };

    let mut strip = MinimalStrip;
    let mut frame = [0u32; LED_COUNT];
    let mut controller = LightController::new(config);

    let commands = [
        LightCommand::SetPower(true),
        LightCommand::SetHue(0.0),
        LightCommand::SetHue(240.0),
        LightCommand::SetHue(0.0),
        LightCommand::SetHue(240.0),
        LightCommand::SetBrightness(60),
        LightCommand::SetSaturation(80.0),
    ];
    for command in commands {
        let reaction = controller.apply(command);
        for f in reaction.frames() {
            sink::render_color(&mut strip, &mut frame, f.color);
        }
    }

    // One full oscillation: there and back.
    for _ in 0..controller.engine().total_ticks() * 2 {
        let reaction = controller.tick();
        if let Some(color) = reaction.last_color() {
            sink::render_color(&mut strip, &mut frame, color);
        }
    }
    let _ = controller.apply(LightCommand::SetPower(false));
    sink::render_color(&mut strip, &mut frame, Color::BLACK);

    core::hint::black_box(controller);
}

#[entry]
fn main() -> ! {
    // Call test function to ensure all code is included
    drive_controller();

    // Halt - this is a size analysis binary, not meant to run
    loop {
        cortex_m::asm::nop();
    }
}
