// Host-side tests for orientation clamping and wrapping.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
#[path = "../src/core/rotation.rs"]
mod rotation;

use rotation::*;

#[test]
fn wrap_concrete_values() {
    assert_eq!(wrap_yaw_deg(0.0), 0.0);
    assert_eq!(wrap_yaw_deg(185.0), -175.0);
    assert_eq!(wrap_yaw_deg(-185.0), 175.0);
    assert_eq!(wrap_yaw_deg(180.0), 180.0);
    assert_eq!(wrap_yaw_deg(-180.0), 180.0);
    assert_eq!(wrap_yaw_deg(360.0), 0.0);
    assert_eq!(wrap_yaw_deg(540.0), 180.0);
    assert_eq!(wrap_yaw_deg(f64::NAN), 0.0);
    assert_eq!(wrap_yaw_deg(f64::INFINITY), 0.0);
}

#[test]
fn wrap_is_idempotent_and_in_range() {
    let mut x = -2000.0;
    while x < 2000.0 {
        let once = wrap_yaw_deg(x);
        assert!(once > -180.0 && once <= 180.0, "wrap({x}) = {once} out of range");
        assert_eq!(wrap_yaw_deg(once), once, "wrap not idempotent at {x}");
        x += 7.3;
    }
}

#[test]
fn pitch_clamps_to_configured_maximum() {
    let mut state = RotationState::new(5.0);
    assert_eq!(state.set(999.0, 0.0).pitch_deg, 5.0);
    assert_eq!(state.set(-999.0, 0.0).pitch_deg, -5.0);
    assert_eq!(state.set(3.25, 0.0).pitch_deg, 3.25);
}

#[test]
fn yaw_wraps_through_setter() {
    let mut state = RotationState::new(5.0);
    assert_eq!(state.set(0.0, 185.0).yaw_deg, -175.0);
    assert_eq!(state.set(0.0, -190.0).yaw_deg, 170.0);
}

#[test]
fn every_write_stays_in_bounds() {
    let max_pitch = 7.5;
    let mut state = RotationState::new(max_pitch);
    let mut p = -40.0;
    while p < 40.0 {
        let mut y = -720.0;
        while y < 720.0 {
            let stored = state.set(p, y);
            assert!(stored.pitch_deg.abs() <= max_pitch);
            assert!(stored.yaw_deg > -180.0 && stored.yaw_deg <= 180.0);
            y += 31.7;
        }
        p += 3.9;
    }
}

#[test]
fn repeated_deltas_accumulate_no_drift() {
    let mut state = RotationState::new(5.0);
    for _ in 0..100_000 {
        state.apply_delta(0.0, 30.0);
    }
    // 100_000 * 30 degrees is 120 degrees mod 360; per-write wrapping keeps
    // the arithmetic exact at these magnitudes.
    let yaw = state.rotation().yaw_deg;
    assert!((yaw - 120.0).abs() < 1e-9, "drift after 100k writes: {yaw}");
    assert!(yaw > -180.0 && yaw <= 180.0);
}

#[test]
fn non_finite_components_leave_state_untouched() {
    let mut state = RotationState::new(5.0);
    state.set(2.0, 40.0);
    let stored = state.set(f64::NAN, f64::INFINITY);
    assert_eq!(stored.pitch_deg, 2.0);
    assert_eq!(stored.yaw_deg, 40.0);
}

#[test]
fn initial_rotation_is_normalized_and_restored() {
    let mut state = RotationState::with_initial(
        Rotation {
            pitch_deg: 90.0,
            yaw_deg: 700.0,
        },
        5.0,
    );
    assert_eq!(state.rotation().pitch_deg, 5.0);
    assert_eq!(state.rotation().yaw_deg, -20.0);

    state.set(-3.0, 90.0);
    let reset = state.reset();
    assert_eq!(reset.pitch_deg, 5.0);
    assert_eq!(reset.yaw_deg, -20.0);
}

#[test]
fn unusable_max_pitch_falls_back_to_default() {
    let nan = RotationState::new(f64::NAN);
    assert_eq!(nan.max_pitch_deg(), DEFAULT_MAX_PITCH_DEG);
    let negative = RotationState::new(-3.0);
    assert_eq!(negative.max_pitch_deg(), DEFAULT_MAX_PITCH_DEG);
}
