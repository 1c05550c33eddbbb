use glam::DVec2;
use smallvec::SmallVec;
use web_sys as web;

// Velocity estimation keeps a short ring of recent pointer samples; the
// release velocity is the average over whatever survives the window.
pub const VELOCITY_SAMPLE_CAP: usize = 6;
pub const VELOCITY_SAMPLE_WINDOW_MS: f64 = 120.0;

#[derive(Clone, Copy, Debug)]
pub struct VelocitySample {
    pub pos: DVec2,
    pub t_ms: f64,
}

/// Bounded history of pointer positions used to estimate the velocity at
/// drag release.
#[derive(Clone, Debug, Default)]
pub struct VelocityTracker {
    samples: SmallVec<[VelocitySample; VELOCITY_SAMPLE_CAP]>,
}

impl VelocityTracker {
    pub fn clear(&mut self) {
        self.samples.clear();
    }

    pub fn push(&mut self, pos: DVec2, t_ms: f64) {
        self.samples.push(VelocitySample { pos, t_ms });
        while self.samples.len() > VELOCITY_SAMPLE_CAP {
            self.samples.remove(0);
        }
        while let Some(first) = self.samples.first() {
            if t_ms - first.t_ms > VELOCITY_SAMPLE_WINDOW_MS {
                self.samples.remove(0);
            } else {
                break;
            }
        }
    }

    /// Average velocity in pixels per millisecond across the retained
    /// window; zero when there is not enough history.
    pub fn release_velocity(&self) -> DVec2 {
        let (Some(first), Some(last)) = (self.samples.first(), self.samples.last()) else {
            return DVec2::ZERO;
        };
        let dt = last.t_ms - first.t_ms;
        if dt <= 1e-3 {
            return DVec2::ZERO;
        }
        (last.pos - first.pos) / dt
    }
}

#[inline]
pub fn pointer_root_px(ev: &web::PointerEvent, root: &web::Element) -> DVec2 {
    let rect = root.get_bounding_client_rect();
    DVec2::new(
        ev.client_x() as f64 - rect.left(),
        ev.client_y() as f64 - rect.top(),
    )
}
