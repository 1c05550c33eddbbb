// Host-side tests for the release-velocity tracker.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
#[path = "../src/input.rs"]
mod input;

use glam::DVec2;
use input::*;

#[test]
fn empty_tracker_reports_zero_velocity() {
    let tracker = VelocityTracker::default();
    assert_eq!(tracker.release_velocity(), DVec2::ZERO);
}

#[test]
fn single_sample_reports_zero_velocity() {
    let mut tracker = VelocityTracker::default();
    tracker.push(DVec2::new(10.0, 10.0), 0.0);
    assert_eq!(tracker.release_velocity(), DVec2::ZERO);
}

#[test]
fn steady_motion_yields_average_velocity() {
    let mut tracker = VelocityTracker::default();
    // 2 px per ms along x, sampled every 16 ms.
    for i in 0..4 {
        let t = i as f64 * 16.0;
        tracker.push(DVec2::new(t * 2.0, 0.0), t);
    }
    let v = tracker.release_velocity();
    assert!((v.x - 2.0).abs() < 1e-9, "vx {}", v.x);
    assert!(v.y.abs() < 1e-9);
}

#[test]
fn tracker_caps_sample_count() {
    let mut tracker = VelocityTracker::default();
    for i in 0..(VELOCITY_SAMPLE_CAP * 3) {
        // Tight spacing so the time window never trims anything.
        tracker.push(DVec2::new(i as f64, 0.0), i as f64);
    }
    // The oldest retained sample is within the cap, so the estimate covers
    // at most cap-1 intervals of 1 px/ms each.
    let v = tracker.release_velocity();
    assert!((v.x - 1.0).abs() < 1e-9);
}

#[test]
fn stale_samples_fall_out_of_the_window() {
    let mut tracker = VelocityTracker::default();
    tracker.push(DVec2::ZERO, 0.0);
    tracker.push(DVec2::new(1000.0, 0.0), 10.0);
    // A sample far in the future evicts both earlier ones.
    tracker.push(DVec2::new(1000.0, 0.0), 10.0 + VELOCITY_SAMPLE_WINDOW_MS * 2.0);
    assert_eq!(tracker.release_velocity(), DVec2::ZERO);
}

#[test]
fn identical_timestamps_do_not_divide_by_zero() {
    let mut tracker = VelocityTracker::default();
    tracker.push(DVec2::ZERO, 5.0);
    tracker.push(DVec2::new(50.0, 50.0), 5.0);
    assert_eq!(tracker.release_velocity(), DVec2::ZERO);
}

#[test]
fn clear_resets_history() {
    let mut tracker = VelocityTracker::default();
    tracker.push(DVec2::ZERO, 0.0);
    tracker.push(DVec2::new(10.0, 0.0), 10.0);
    tracker.clear();
    assert_eq!(tracker.release_velocity(), DVec2::ZERO);
}
