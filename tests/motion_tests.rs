// Host-side tests for the drag/inertia/autopilot state machine.
// The main crate is wasm-only, so we include the pure-Rust modules directly;
// `motion` resolves its `super::rotation` import against the sibling module.

#![allow(dead_code)]
#[path = "../src/core/rotation.rs"]
mod rotation;
#[path = "../src/core/motion.rs"]
mod motion;

use glam::DVec2;
use motion::*;

fn controller() -> MotionController {
    MotionController::new(MotionTuning::default())
}

fn drag(c: &mut MotionController, from: (f64, f64), to: (f64, f64), end_ms: f64) {
    assert!(c.drag_start(DVec2::new(from.0, from.1)));
    assert!(c.drag_move(DVec2::new(to.0, to.1)));
    assert!(c.drag_end(DVec2::new(to.0, to.1), DVec2::ZERO, end_ms));
}

#[test]
fn zero_displacement_release_does_not_rotate() {
    let mut c = controller();
    let before = c.rotation();
    assert!(c.drag_start(DVec2::new(50.0, 50.0)));
    assert!(c.drag_end(DVec2::new(50.0, 50.0), DVec2::ZERO, 100.0));
    assert_eq!(c.rotation(), before);
    assert!(c.is_idle());
    // ...and the release is a tap.
    assert!(c.tap_on_click(PointerKind::Mouse, 101.0));
}

#[test]
fn drag_maps_pixels_to_degrees_by_sensitivity() {
    let mut c = controller(); // sensitivity 20 px/deg
    assert!(c.drag_start(DVec2::new(100.0, 100.0)));
    assert!(c.drag_move(DVec2::new(140.0, 80.0)));
    let r = c.rotation();
    assert!((r.yaw_deg - 2.0).abs() < 1e-9, "yaw {}", r.yaw_deg);
    assert!((r.pitch_deg - 1.0).abs() < 1e-9, "pitch {}", r.pitch_deg);
}

#[test]
fn pitch_stays_clamped_while_dragging() {
    let mut c = controller(); // max pitch 5
    assert!(c.drag_start(DVec2::ZERO));
    assert!(c.drag_move(DVec2::new(0.0, -100_000.0)));
    assert_eq!(c.rotation().pitch_deg, 5.0);
}

#[test]
fn yaw_wraps_while_dragging() {
    let mut c = controller();
    assert!(c.drag_start(DVec2::ZERO));
    // 3700 px / 20 px-per-deg = 185 degrees.
    assert!(c.drag_move(DVec2::new(3700.0, 0.0)));
    assert!((c.rotation().yaw_deg - (-175.0)).abs() < 1e-9);
}

#[test]
fn moves_are_rejected_outside_a_session() {
    let mut c = controller();
    let before = c.rotation();
    assert!(!c.drag_move(DVec2::new(500.0, 500.0)));
    assert!(!c.drag_end(DVec2::new(500.0, 500.0), DVec2::ZERO, 0.0));
    assert!(!c.coast_step());
    assert_eq!(c.rotation(), before);
}

#[test]
fn second_drag_start_is_rejected_while_dragging() {
    let mut c = controller();
    assert!(c.drag_start(DVec2::ZERO));
    assert!(!c.drag_start(DVec2::new(10.0, 10.0)));
    assert!(c.is_dragging());
}

#[test]
fn focused_flag_suppresses_all_drag_processing() {
    let mut c = controller();
    c.set_focused(true);
    let before = c.rotation();
    assert!(!c.drag_start(DVec2::ZERO));
    assert!(!c.drag_move(DVec2::new(200.0, 0.0)));
    assert_eq!(c.rotation(), before);
    assert!(c.is_idle());

    c.set_focused(false);
    assert!(c.drag_start(DVec2::ZERO));
}

#[test]
fn reported_release_velocity_starts_a_coast() {
    let mut c = controller();
    assert!(c.drag_start(DVec2::ZERO));
    assert!(c.drag_move(DVec2::new(200.0, 0.0)));
    assert!(c.drag_end(DVec2::new(200.0, 0.0), DVec2::new(1.0, 0.0), 50.0));
    assert!(c.is_coasting());

    let before = c.rotation().yaw_deg;
    assert!(c.coast_step());
    assert!(c.rotation().yaw_deg > before, "coast must continue the spin");
}

#[test]
fn near_zero_report_falls_back_to_displacement_velocity() {
    let mut c = controller();
    // 200 px of travel, dead-zero reported velocity: the fallback estimate
    // (200 / 20 * 3 = 30 px/frame) clears the coast minimum.
    drag(&mut c, (0.0, 0.0), (200.0, 0.0), 50.0);
    assert!(c.is_coasting());
}

#[test]
fn tiny_release_velocity_goes_straight_to_idle() {
    let mut c = controller();
    // 10 px of travel crosses the jitter threshold but the fallback
    // estimate (10 / 20 * 3 = 1.5 px/frame) is below the coast minimum.
    drag(&mut c, (0.0, 0.0), (10.0, 0.0), 50.0);
    assert!(c.is_idle());
}

#[test]
fn non_finite_reported_velocity_is_tolerated() {
    let mut c = controller();
    assert!(c.drag_start(DVec2::ZERO));
    assert!(c.drag_move(DVec2::new(200.0, 0.0)));
    assert!(c.drag_end(
        DVec2::new(200.0, 0.0),
        DVec2::new(f64::NAN, f64::INFINITY),
        50.0
    ));
    // Falls back to the displacement estimate and keeps the state sane.
    assert!(c.is_coasting());
    let r = c.rotation();
    assert!(r.pitch_deg.is_finite() && r.yaw_deg.is_finite());
}

#[test]
fn coast_terminates_within_the_frame_budget() {
    for dampening in [0.0, 0.3, 0.45, 1.0] {
        let tuning = MotionTuning {
            dampening,
            ..MotionTuning::default()
        };
        let budget = tuning.max_coast_frames();
        let mut c = MotionController::new(tuning);
        assert!(c.drag_start(DVec2::ZERO));
        assert!(c.drag_move(DVec2::new(4000.0, 4000.0)));
        assert!(c.drag_end(DVec2::new(4000.0, 4000.0), DVec2::new(5.0, 5.0), 10.0));
        assert!(c.is_coasting());

        let mut frames = 0;
        while c.coast_step() {
            frames += 1;
            assert!(frames <= budget, "coast exceeded budget at dampening {dampening}");
        }
        assert!(c.is_idle());
    }
}

#[test]
fn new_drag_preempts_coasting_immediately() {
    let mut c = controller();
    drag(&mut c, (0.0, 0.0), (300.0, 0.0), 50.0);
    assert!(c.is_coasting());

    assert!(c.drag_start(DVec2::new(10.0, 10.0)));
    assert!(c.is_dragging());
    assert!(!c.is_coasting());

    // The dead session must not write anymore.
    let pinned = c.rotation();
    assert!(!c.coast_step());
    assert_eq!(c.rotation(), pinned);
}

#[test]
fn autopilot_advances_only_while_idle() {
    let tuning = MotionTuning {
        auto_rotate: true,
        auto_rotate_speed: 0.5,
        ..MotionTuning::default()
    };
    let mut c = MotionController::new(tuning);

    assert!(c.autopilot_tick(2.0));
    assert!((c.rotation().yaw_deg - 1.0).abs() < 1e-9);

    assert!(c.drag_start(DVec2::ZERO));
    let during = c.rotation();
    assert!(!c.autopilot_tick(2.0));
    assert_eq!(c.rotation(), during);

    // Ending the (unmoved) drag resumes autopilot without a catch-up jump.
    assert!(c.drag_end(DVec2::ZERO, DVec2::ZERO, 10.0));
    assert!(c.autopilot_tick(1.0));
    assert!((c.rotation().yaw_deg - 1.5).abs() < 1e-9);
}

#[test]
fn autopilot_ignores_degenerate_frame_times() {
    let tuning = MotionTuning {
        auto_rotate: true,
        ..MotionTuning::default()
    };
    let mut c = MotionController::new(tuning);
    assert!(!c.autopilot_tick(f64::NAN));
    assert!(!c.autopilot_tick(0.0));
    assert!(!c.autopilot_tick(-1.0));
    assert_eq!(c.rotation().yaw_deg, 0.0);
}

#[test]
fn autopilot_respects_the_enable_flag() {
    let mut c = controller();
    assert!(!c.autopilot_tick(1.0));
    c.set_auto_rotate(true);
    assert!(c.autopilot_tick(1.0));
}

#[test]
fn moved_drag_suppresses_the_following_click() {
    let mut c = controller();
    drag(&mut c, (0.0, 0.0), (120.0, 0.0), 1000.0);
    assert!(!c.tap_on_click(PointerKind::Mouse, 1001.0));
}

#[test]
fn touch_tap_fires_on_release_and_dedupes_the_click() {
    let mut c = controller();
    assert!(c.drag_start(DVec2::new(30.0, 30.0)));
    // Tile pointerup arrives while the (unmoved) session is still live.
    assert!(c.tap_on_pointer_up(PointerKind::Touch, 500.0));
    assert!(c.drag_end(DVec2::new(30.0, 30.0), DVec2::ZERO, 501.0));
    // The browser-synthesized click that follows must not double-fire.
    assert!(!c.tap_on_click(PointerKind::Mouse, 510.0));
}

#[test]
fn touch_release_during_moved_session_is_not_a_tap() {
    let mut c = controller();
    assert!(c.drag_start(DVec2::ZERO));
    assert!(c.drag_move(DVec2::new(100.0, 0.0)));
    assert!(!c.tap_on_pointer_up(PointerKind::Touch, 500.0));
}

#[test]
fn mouse_release_is_not_a_tap_on_pointer_up() {
    let mut c = controller();
    assert!(c.drag_start(DVec2::ZERO));
    assert!(!c.tap_on_pointer_up(PointerKind::Mouse, 500.0));
}

#[test]
fn taps_cool_down_after_a_moved_drag() {
    let mut c = controller();
    drag(&mut c, (0.0, 0.0), (10.0, 0.0), 1000.0); // moved, lands idle

    // A quick follow-up press/release within the cooldown window.
    assert!(c.drag_start(DVec2::new(5.0, 5.0)));
    assert!(c.drag_end(DVec2::new(5.0, 5.0), DVec2::ZERO, 1030.0));
    assert!(!c.tap_on_click(PointerKind::Mouse, 1040.0));

    // Outside the window the same interaction taps normally.
    assert!(c.drag_start(DVec2::new(5.0, 5.0)));
    assert!(c.drag_end(DVec2::new(5.0, 5.0), DVec2::ZERO, 1100.0));
    assert!(c.tap_on_click(PointerKind::Mouse, 1101.0));
}

#[test]
fn sub_jitter_movement_still_counts_as_a_tap() {
    let mut c = controller();
    assert!(c.drag_start(DVec2::new(10.0, 10.0)));
    assert!(c.drag_move(DVec2::new(12.0, 11.0))); // under the jitter threshold
    assert!(c.drag_end(DVec2::new(12.0, 11.0), DVec2::ZERO, 700.0));
    assert!(c.is_idle());
    assert!(c.tap_on_click(PointerKind::Mouse, 701.0));
}

#[test]
fn reset_view_cancels_a_coast_but_defers_during_drag() {
    let mut c = controller();
    drag(&mut c, (0.0, 0.0), (300.0, 0.0), 50.0);
    assert!(c.is_coasting());
    let reset = c.reset_view();
    assert!(c.is_idle());
    assert_eq!(reset.yaw_deg, 0.0);
    assert_eq!(reset.pitch_deg, 0.0);

    assert!(c.drag_start(DVec2::ZERO));
    assert!(c.drag_move(DVec2::new(100.0, 0.0)));
    let held = c.rotation();
    assert_eq!(c.reset_view(), held);
    assert!(c.is_dragging());
}

#[test]
fn tuning_sanitization_repairs_bad_values() {
    let defaults = MotionTuning::default();
    let fixed = MotionTuning {
        drag_sensitivity: -3.0,
        dampening: 7.0,
        auto_rotate_speed: f64::NAN,
        ..defaults
    }
    .sanitized();
    assert_eq!(fixed.drag_sensitivity, defaults.drag_sensitivity);
    assert_eq!(fixed.dampening, 1.0);
    assert_eq!(fixed.auto_rotate_speed, defaults.auto_rotate_speed);
}

#[test]
fn dampening_maps_into_the_documented_ranges() {
    let at = |dampening: f64| MotionTuning {
        dampening,
        ..MotionTuning::default()
    };
    assert_eq!(at(0.0).friction(), FRICTION_MAX);
    assert_eq!(at(1.0).friction(), FRICTION_MIN);
    assert!(at(0.5).friction() < at(0.25).friction());

    assert_eq!(at(0.0).stop_threshold(), STOP_THRESHOLD_MIN_PX_FRAME);
    assert_eq!(at(1.0).stop_threshold(), STOP_THRESHOLD_MAX_PX_FRAME);

    assert_eq!(at(0.0).max_coast_frames(), COAST_FRAMES_AT_MIN_DAMPENING);
    assert_eq!(at(1.0).max_coast_frames(), COAST_FRAMES_AT_MAX_DAMPENING);
    assert!(at(0.8).max_coast_frames() < at(0.2).max_coast_frames());
}
