//! Drag, inertia, autopilot, and tap disambiguation.
//!
//! The three rotation writers are mutually exclusive by construction: the
//! controller holds a tagged phase (`Idle | Dragging | Coasting`) and every
//! transition method rejects calls that are invalid for the current phase.
//! No flags, no nullable handles.

use glam::DVec2;

use super::rotation::{Rotation, RotationState};

/// Reference frame duration; velocities are normalized against it so the
/// feel does not depend on the display's refresh rate.
pub const BASELINE_FRAME_MS: f64 = 1000.0 / 60.0;

// Drag classification. Cumulative movement below this many pixels is treated
// as pointer jitter, not a drag.
pub const DRAG_JITTER_PX: f64 = 4.0;

// Release-velocity handling. Gesture layers occasionally report a dead-zero
// velocity for quick flicks; below the epsilon we recompute an estimate from
// the whole session's displacement. The scale and clamps are tuned for feel,
// not derived from anything.
pub const RELEASE_VELOCITY_EPS_PX_MS: f64 = 0.05;
pub const RELEASE_FALLBACK_SCALE: f64 = 3.0;
pub const MAX_RELEASE_SPEED_PX_FRAME: f64 = 90.0;
pub const MIN_COAST_SPEED_PX_FRAME: f64 = 2.0;

// Friction endpoints: the dampening knob in [0, 1] interpolates between
// them. Applied as a per-frame velocity multiplier.
pub const FRICTION_MIN: f64 = 0.82;
pub const FRICTION_MAX: f64 = 0.96;

// Coast termination, both dampening-interpolated: stop once each velocity
// component is below the threshold, or unconditionally at the frame cap.
pub const STOP_THRESHOLD_MIN_PX_FRAME: f64 = 0.4;
pub const STOP_THRESHOLD_MAX_PX_FRAME: f64 = 2.4;
pub const COAST_FRAMES_AT_MIN_DAMPENING: u32 = 600;
pub const COAST_FRAMES_AT_MAX_DAMPENING: u32 = 150;

// Tap policy.
pub const TAP_SUPPRESS_AFTER_DRAG_MS: f64 = 60.0;
pub const TOUCH_CLICK_DEDUP_MS: f64 = 500.0;

/// Normalized pointer device kind, parsed by the host from the platform
/// event. Drives the touch/click de-duplication policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerKind {
    Mouse,
    Touch,
    Pen,
}

/// Tuning supplied by the host; sanitized once at construction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MotionTuning {
    /// Pixels of pointer travel per degree of rotation (inverted: larger
    /// means less rotation per pixel).
    pub drag_sensitivity: f64,
    /// 0 = long coast, 1 = near-immediate stop.
    pub dampening: f64,
    pub max_pitch_deg: f64,
    pub auto_rotate: bool,
    /// Degrees of yaw per baseline frame while idle.
    pub auto_rotate_speed: f64,
}

impl Default for MotionTuning {
    fn default() -> Self {
        Self {
            drag_sensitivity: 20.0,
            dampening: 0.45,
            max_pitch_deg: 5.0,
            auto_rotate: false,
            auto_rotate_speed: 0.2,
        }
    }
}

impl MotionTuning {
    /// Replace unusable values with defaults; clamp dampening into [0, 1].
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if !self.drag_sensitivity.is_finite() || self.drag_sensitivity <= 0.0 {
            self.drag_sensitivity = defaults.drag_sensitivity;
        }
        self.dampening = if self.dampening.is_finite() {
            self.dampening.clamp(0.0, 1.0)
        } else {
            defaults.dampening
        };
        if !self.auto_rotate_speed.is_finite() {
            self.auto_rotate_speed = defaults.auto_rotate_speed;
        }
        self
    }

    #[inline]
    pub fn friction(&self) -> f64 {
        FRICTION_MAX - (FRICTION_MAX - FRICTION_MIN) * self.dampening
    }

    #[inline]
    pub fn stop_threshold(&self) -> f64 {
        STOP_THRESHOLD_MIN_PX_FRAME
            + (STOP_THRESHOLD_MAX_PX_FRAME - STOP_THRESHOLD_MIN_PX_FRAME) * self.dampening
    }

    #[inline]
    pub fn max_coast_frames(&self) -> u32 {
        let span = COAST_FRAMES_AT_MIN_DAMPENING as f64 - COAST_FRAMES_AT_MAX_DAMPENING as f64;
        (COAST_FRAMES_AT_MIN_DAMPENING as f64 - span * self.dampening).round() as u32
    }
}

#[derive(Clone, Debug, PartialEq)]
struct DragSession {
    start_pos: DVec2,
    start_rotation: Rotation,
    has_moved: bool,
}

#[derive(Clone, Debug, PartialEq)]
struct InertiaSession {
    /// Screen-space velocity in pixels per baseline frame.
    velocity: DVec2,
    frames: u32,
}

#[derive(Clone, Debug, PartialEq)]
enum Phase {
    Idle,
    Dragging(DragSession),
    Coasting(InertiaSession),
}

pub struct MotionController {
    tuning: MotionTuning,
    rotation: RotationState,
    phase: Phase,
    focused: bool,
    last_drag_moved: bool,
    last_moved_drag_end_ms: f64,
    last_touch_tap_ms: f64,
}

impl MotionController {
    pub fn new(tuning: MotionTuning) -> Self {
        let tuning = tuning.sanitized();
        Self {
            rotation: RotationState::new(tuning.max_pitch_deg),
            tuning,
            phase: Phase::Idle,
            focused: false,
            last_drag_moved: false,
            last_moved_drag_end_ms: f64::NEG_INFINITY,
            last_touch_tap_ms: f64::NEG_INFINITY,
        }
    }

    #[inline]
    pub fn tuning(&self) -> &MotionTuning {
        &self.tuning
    }

    #[inline]
    pub fn rotation(&self) -> Rotation {
        self.rotation.rotation()
    }

    #[inline]
    pub fn is_idle(&self) -> bool {
        matches!(self.phase, Phase::Idle)
    }

    #[inline]
    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, Phase::Dragging(_))
    }

    #[inline]
    pub fn is_coasting(&self) -> bool {
        matches!(self.phase, Phase::Coasting(_))
    }

    pub fn set_auto_rotate(&mut self, enabled: bool) {
        self.tuning.auto_rotate = enabled;
    }

    /// While a tile is focused/enlarged the host sets this flag and all
    /// drag processing is suppressed.
    pub fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    #[inline]
    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// Restore the initial orientation. Deferred while a drag is live;
    /// cancels any coast.
    pub fn reset_view(&mut self) -> Rotation {
        if self.is_dragging() {
            log::debug!("view reset ignored: drag in progress");
            return self.rotation();
        }
        self.phase = Phase::Idle;
        self.rotation.reset()
    }

    /// Begin a drag session. Preempts coasting unconditionally; rejected
    /// while focused or while another session is live.
    pub fn drag_start(&mut self, pos: DVec2) -> bool {
        if self.focused {
            log::trace!("drag start ignored: focus lock");
            return false;
        }
        if self.is_dragging() {
            log::trace!("drag start ignored: session already active");
            return false;
        }
        self.phase = Phase::Dragging(DragSession {
            start_pos: pos,
            start_rotation: self.rotation.rotation(),
            has_moved: false,
        });
        true
    }

    /// Map the live pointer position to a new orientation.
    pub fn drag_move(&mut self, pos: DVec2) -> bool {
        let sensitivity = self.tuning.drag_sensitivity;
        let (start_pos, start_rotation) = match &mut self.phase {
            Phase::Dragging(session) => {
                if !session.has_moved
                    && (pos - session.start_pos).length_squared() > DRAG_JITTER_PX * DRAG_JITTER_PX
                {
                    session.has_moved = true;
                }
                (session.start_pos, session.start_rotation)
            }
            _ => {
                log::trace!("drag move ignored: no active session");
                return false;
            }
        };
        let delta = pos - start_pos;
        self.rotation.set(
            start_rotation.pitch_deg - delta.y / sensitivity,
            start_rotation.yaw_deg + delta.x / sensitivity,
        );
        true
    }

    /// Finish the session. `reported_velocity_px_ms` is the gesture layer's
    /// release velocity; a near-zero report falls back to an estimate from
    /// the session's total displacement. Coasting starts only when the
    /// session actually moved and the speed clears the minimum.
    pub fn drag_end(&mut self, pos: DVec2, reported_velocity_px_ms: DVec2, now_ms: f64) -> bool {
        // The final position goes through the same mapping as any move;
        // this also rejects calls without an active session.
        if !self.drag_move(pos) {
            return false;
        }
        let session = match std::mem::replace(&mut self.phase, Phase::Idle) {
            Phase::Dragging(session) => session,
            other => {
                self.phase = other;
                return false;
            }
        };

        self.last_drag_moved = session.has_moved;
        if session.has_moved {
            self.last_moved_drag_end_ms = now_ms;
        }

        let reported = sanitize_vec(reported_velocity_px_ms);
        let mut velocity = reported * BASELINE_FRAME_MS;
        if reported.length() < RELEASE_VELOCITY_EPS_PX_MS {
            let total = pos - session.start_pos;
            velocity = total / self.tuning.drag_sensitivity * RELEASE_FALLBACK_SCALE;
        }
        let speed = velocity.length();
        if speed > MAX_RELEASE_SPEED_PX_FRAME {
            velocity *= MAX_RELEASE_SPEED_PX_FRAME / speed;
        }

        if session.has_moved && velocity.length() >= MIN_COAST_SPEED_PX_FRAME {
            self.phase = Phase::Coasting(InertiaSession {
                velocity,
                frames: 0,
            });
        }
        true
    }

    /// Advance one coasting frame: decay the velocity, apply the rotation
    /// delta, then terminate on the stop threshold or the frame cap.
    /// Returns whether the controller is still coasting afterwards.
    pub fn coast_step(&mut self) -> bool {
        let tuning = self.tuning;
        let stopped = match &mut self.phase {
            Phase::Coasting(session) => {
                session.velocity *= tuning.friction();
                session.frames += 1;
                let v = session.velocity;
                self.rotation.apply_delta(
                    -v.y / tuning.drag_sensitivity,
                    v.x / tuning.drag_sensitivity,
                );
                let threshold = tuning.stop_threshold();
                (v.x.abs() < threshold && v.y.abs() < threshold)
                    || session.frames >= tuning.max_coast_frames()
            }
            _ => {
                log::trace!("coast step ignored: not coasting");
                return false;
            }
        };
        if stopped {
            self.phase = Phase::Idle;
        }
        !stopped
    }

    /// Idle-time rotation. `dt_norm` is the elapsed frame time divided by
    /// the baseline frame duration. While any session is live this is a
    /// write-skip, so resuming after a drag never applies a catch-up jump.
    pub fn autopilot_tick(&mut self, dt_norm: f64) -> bool {
        if !self.tuning.auto_rotate || !self.is_idle() {
            return false;
        }
        if !dt_norm.is_finite() || dt_norm <= 0.0 {
            return false;
        }
        let r = self.rotation.rotation();
        self.rotation
            .set(r.pitch_deg, r.yaw_deg + self.tuning.auto_rotate_speed * dt_norm);
        true
    }

    /// Tap decision for a pointer-release on a tile. Fires only for touch
    /// and pen input; the matching synthesized click is de-duplicated in
    /// [`Self::tap_on_click`].
    pub fn tap_on_pointer_up(&mut self, kind: PointerKind, now_ms: f64) -> bool {
        if !matches!(kind, PointerKind::Touch | PointerKind::Pen) {
            return false;
        }
        if !self.tap_allowed(now_ms) {
            return false;
        }
        self.last_touch_tap_ms = now_ms;
        true
    }

    /// Tap decision for a click event on a tile (mouse path).
    pub fn tap_on_click(&mut self, kind: PointerKind, now_ms: f64) -> bool {
        if now_ms - self.last_touch_tap_ms < TOUCH_CLICK_DEDUP_MS {
            // Synthesized click following a touch tap we already handled.
            return false;
        }
        if !matches!(kind, PointerKind::Mouse) {
            return false;
        }
        self.tap_allowed(now_ms)
    }

    // A live session that has moved is a drag, not a tap. A live session
    // that has not moved is a tap in progress, so the previous session's
    // verdict does not apply to it. The cooldown only tracks drags that
    // actually moved.
    fn tap_allowed(&self, now_ms: f64) -> bool {
        match &self.phase {
            Phase::Dragging(session) if session.has_moved => return false,
            Phase::Dragging(_) => {}
            _ => {
                if self.last_drag_moved {
                    return false;
                }
            }
        }
        now_ms - self.last_moved_drag_end_ms >= TAP_SUPPRESS_AFTER_DRAG_MS
    }
}

#[inline]
fn sanitize_vec(v: DVec2) -> DVec2 {
    DVec2::new(
        if v.x.is_finite() { v.x } else { 0.0 },
        if v.y.is_finite() { v.y } else { 0.0 },
    )
}
