//! Light controller tests: property writes, mode changes and rendering reactions

mod common;

use common::*;
use neopixel_cycle::{
    Color, ColorHistory, ColorMode, CycleChange, FixtureConfig, FrameKind, LightCommand,
    LightController, MODE_FLASH, ModeDetection, RenderSink, sink,
};

fn powered() -> LightController {
    let mut controller = LightController::new(minute_config());
    controller.apply_power(true);
    controller
}

/// Powered controller oscillating between blue and red.
fn cycling() -> LightController {
    let mut controller = powered();
    for hue in [0.0, 240.0, 0.0, 240.0] {
        controller.apply_hue(hue);
    }
    assert!(controller.is_cycling());
    controller
}

#[test]
fn power_on_renders_the_composed_color() {
    let mut controller = LightController::new(minute_config());
    let reaction = controller.apply_power(true);

    assert_eq!(reaction.frames().len(), 1);
    assert_eq!(reaction.frames()[0].kind, FrameKind::Static);
    assert_eq!(reaction.last_color(), Some(Color::RED));
    assert_eq!(reaction.cycle(), CycleChange::Unchanged);
    assert!(controller.state().power);
}

#[test]
fn hue_writes_render_and_commit() {
    let mut controller = powered();
    let reaction = controller.apply_hue(120.0);

    assert_eq!(reaction.last_color(), Some(Color::GREEN));
    assert_eq!(controller.history().newest(), Color::GREEN);
    assert_eq!(controller.mode(), ColorMode::Single);
}

#[test]
fn saturation_renders_without_committing() {
    let mut controller = powered();
    controller.apply_hue(0.0);
    let before = controller.history().to_array();

    let reaction = controller.apply_saturation(50.0);

    assert_eq!(reaction.last_color().map(|c| c.packed()), Some(0xFF8080));
    assert_eq!(controller.history().to_array(), before);
    assert_eq!(controller.state().saturation, 50.0);

    // The next hue commit picks the new saturation up.
    controller.apply_hue(0.0);
    assert_eq!(controller.history().newest().saturation(), 0.5);
}

#[test]
fn brightness_keeps_hue_and_saturation() {
    let mut controller = powered();
    controller.apply_hue(120.0);
    let reaction = controller.apply_brightness(50);

    let state = controller.state();
    assert_eq!(state.hue, 120.0);
    assert_eq!(state.saturation, 100.0);
    assert_eq!(state.brightness, 50);

    let newest = controller.history().newest();
    assert_eq!(newest.hue(), 120.0);
    assert_eq!(newest.saturation(), 1.0);
    assert_eq!(newest.value(), 0.5);
    assert_eq!(reaction.last_color(), Some(Color::from_hsv(120.0, 1.0, 0.5)));
}

#[test]
fn alternating_hues_start_the_cycle() {
    let mut controller = powered();
    let mut last = None;
    for hue in [0.0, 240.0, 0.0] {
        let reaction = controller.apply_hue(hue);
        assert_eq!(reaction.cycle(), CycleChange::Unchanged);
        last = reaction.last_color();
    }
    assert_eq!(last, Some(Color::RED));
    // [black, red, black, red] alternates, but black means the fixture was off.
    assert_eq!(controller.mode(), ColorMode::Single);

    let reaction = controller.apply_hue(240.0);
    assert_eq!(controller.mode(), ColorMode::Multi);
    assert_eq!(controller.state().mode, ColorMode::Multi);
    assert_eq!(reaction.cycle(), CycleChange::Started);
    assert_eq!(reaction.last_color(), Some(Color::BLUE));
    assert_eq!(
        controller.engine().endpoints(),
        Some((Color::BLUE, Color::RED))
    );
}

#[test]
fn ticks_oscillate_between_the_pair() {
    let mut controller = cycling();

    let first = controller.tick();
    assert_eq!(first.frames()[0].kind, FrameKind::Cycle);
    assert!(hues_equal(first.last_color().unwrap().hue(), 236.0, 1e-3));

    let mut landings = Vec::new();
    for _ in 1..120 {
        let color = controller.tick().last_color().unwrap();
        if color == Color::RED || color == Color::BLUE {
            landings.push(color);
        }
    }
    assert_eq!(landings, vec![Color::RED, Color::BLUE]);
    assert_eq!(controller.current_color(), Color::BLUE);
}

#[test]
fn breaking_the_pattern_stops_the_cycle() {
    let mut controller = cycling();
    controller.tick();

    let reaction = controller.apply_hue(120.0);

    assert_eq!(reaction.cycle(), CycleChange::Stopped);
    assert_eq!(reaction.last_color(), Some(Color::GREEN));
    assert!(!controller.is_cycling());
    assert!(controller.tick().is_empty());
}

#[test]
fn saturation_is_deferred_while_cycling() {
    let mut controller = cycling();
    assert!(controller.apply_saturation(20.0).is_empty());
    assert!(controller.is_cycling());
    assert_eq!(controller.state().saturation, 20.0);
}

#[test]
fn brightness_while_cycling_restarts_dimmed() {
    let mut controller = cycling();
    controller.tick();

    let reaction = controller.apply_brightness(50);

    assert_eq!(reaction.cycle(), CycleChange::Started);
    assert_eq!(reaction.last_color(), Some(Color::from_hsv(240.0, 1.0, 0.5)));
    let (start, end) = controller.engine().endpoints().unwrap();
    assert_eq!(start.value(), 0.5);
    assert_eq!(end.value(), 0.5);
}

#[test]
fn zero_brightness_leaves_oscillation() {
    let mut controller = cycling();

    let reaction = controller.apply_brightness(0);

    assert_eq!(reaction.cycle(), CycleChange::Stopped);
    assert_eq!(reaction.last_color(), Some(Color::BLACK));
    assert_eq!(controller.mode(), ColorMode::Single);
}

#[test]
fn power_on_into_oscillation_flashes_first() {
    let mut controller = cycling();
    let off = controller.apply_power(false);
    assert_eq!(off.cycle(), CycleChange::Stopped);
    assert_eq!(off.last_color(), Some(Color::BLACK));
    assert_eq!(controller.current_color(), Color::BLACK);

    let on = controller.apply_power(true);

    let frames = on.frames();
    assert_eq!(frames.len(), 2);
    assert_eq!(frames[0].kind, FrameKind::Flash);
    assert_eq!(frames[0].color, MODE_FLASH);
    assert_eq!(frames[1].kind, FrameKind::Static);
    assert_eq!(frames[1].color, Color::BLUE);
    assert_eq!(on.cycle(), CycleChange::Started);
}

#[test]
fn power_on_while_cycling_changes_nothing() {
    let mut controller = cycling();
    for _ in 0..10 {
        controller.tick();
    }
    let ticks = controller.engine().ticks_elapsed();

    assert!(controller.apply_power(true).is_empty());
    assert_eq!(controller.engine().ticks_elapsed(), ticks);
}

#[test]
fn stop_cycle_keeps_the_strip_as_is() {
    let mut controller = cycling();
    controller.tick();

    let reaction = controller.stop_cycle();
    assert!(reaction.frames().is_empty());
    assert_eq!(reaction.cycle(), CycleChange::Stopped);
    assert!(controller.stop_cycle().is_empty());
}

#[test]
fn pattern_only_detection_accepts_black() {
    let config = FixtureConfig::builder(4)
        .detection(ModeDetection::PatternOnly)
        .build()
        .unwrap();
    let history = ColorHistory::from_colors([Color::BLACK, Color::RED, Color::BLACK, Color::RED]);
    let mut controller = LightController::with_history(config, history);

    let reaction = controller.apply_power(true);

    assert_eq!(controller.mode(), ColorMode::Multi);
    assert_eq!(reaction.cycle(), CycleChange::Started);
}

#[test]
fn apply_dispatches_commands() {
    let mut controller = LightController::new(minute_config());
    controller.apply(LightCommand::SetPower(true));
    controller.apply(LightCommand::SetHue(240.0));
    controller.apply(LightCommand::SetSaturation(50.0));
    controller.apply(LightCommand::SetBrightness(80));

    let state = controller.state();
    assert!(state.power);
    assert_eq!(state.hue, 240.0);
    assert_eq!(state.saturation, 50.0);
    assert_eq!(state.brightness, 80);
}

#[test]
fn reactions_render_through_a_sink() {
    let mut controller = cycling();
    let mut strip = RecordingSink::new();
    let mut frame = vec![0u32; controller.config().led_count()];

    for _ in 0..3 {
        let reaction = controller.tick();
        for f in reaction.frames() {
            sink::render_color(&mut strip, &mut frame, f.color);
        }
    }
    strip.all_off();

    assert_eq!(strip.frame_count(), 3);
    assert_eq!(strip.frame_len(), 16);
    assert_eq!(strip.all_off_calls(), 1);
}
