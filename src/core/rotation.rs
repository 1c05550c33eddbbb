//! Sphere orientation state.
//!
//! A single `RotationState` value is the only mutable orientation the
//! gallery has. Every writer (drag mapper, inertia, autopilot) funnels
//! through [`RotationState::set`], which clamps pitch and re-wraps yaw on
//! every call so float error cannot accumulate across frames.

/// Fallback vertical limit when the configured one is unusable.
pub const DEFAULT_MAX_PITCH_DEG: f64 = 5.0;

/// Orientation of the sphere in degrees.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rotation {
    pub pitch_deg: f64,
    pub yaw_deg: f64,
}

/// Wrap a yaw angle into `(-180, 180]`.
///
/// Idempotent: wrapping an already-normalized value returns it unchanged.
/// Non-finite input maps to `0.0`.
#[inline]
pub fn wrap_yaw_deg(yaw_deg: f64) -> f64 {
    if !yaw_deg.is_finite() {
        return 0.0;
    }
    let r = yaw_deg.rem_euclid(360.0);
    if r > 180.0 {
        r - 360.0
    } else {
        r
    }
}

#[derive(Clone, Debug)]
pub struct RotationState {
    current: Rotation,
    initial: Rotation,
    max_pitch_deg: f64,
}

impl RotationState {
    pub fn new(max_pitch_deg: f64) -> Self {
        Self::with_initial(Rotation::default(), max_pitch_deg)
    }

    /// Build a state whose reset target is `initial` (itself normalized).
    pub fn with_initial(initial: Rotation, max_pitch_deg: f64) -> Self {
        let max_pitch_deg = if max_pitch_deg.is_finite() && max_pitch_deg >= 0.0 {
            max_pitch_deg
        } else {
            DEFAULT_MAX_PITCH_DEG
        };
        let mut state = Self {
            current: Rotation::default(),
            initial: Rotation::default(),
            max_pitch_deg,
        };
        state.set(initial.pitch_deg, initial.yaw_deg);
        state.initial = state.current;
        state
    }

    #[inline]
    pub fn rotation(&self) -> Rotation {
        self.current
    }

    #[inline]
    pub fn max_pitch_deg(&self) -> f64 {
        self.max_pitch_deg
    }

    /// The single write path: clamp pitch, wrap yaw, store, report back.
    ///
    /// A non-finite component leaves the corresponding stored value
    /// untouched rather than poisoning the state.
    pub fn set(&mut self, pitch_deg: f64, yaw_deg: f64) -> Rotation {
        if pitch_deg.is_finite() {
            self.current.pitch_deg = pitch_deg.clamp(-self.max_pitch_deg, self.max_pitch_deg);
        }
        if yaw_deg.is_finite() {
            self.current.yaw_deg = wrap_yaw_deg(yaw_deg);
        }
        self.current
    }

    /// Relative write, still funneled through [`Self::set`].
    pub fn apply_delta(&mut self, dpitch_deg: f64, dyaw_deg: f64) -> Rotation {
        let c = self.current;
        self.set(c.pitch_deg + dpitch_deg, c.yaw_deg + dyaw_deg)
    }

    pub fn reset(&mut self) -> Rotation {
        let i = self.initial;
        self.set(i.pitch_deg, i.yaw_deg)
    }
}
