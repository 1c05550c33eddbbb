/// Shell-side layout and frame tuning constants.
///
/// Core interaction tuning (friction, thresholds, tap windows) lives next
/// to the motion controller; everything here is about sizing the sphere in
/// the viewport and pacing the frame loop.
// Cap on normalized frame time so returning from a background tab does not
// produce one giant autopilot step.
pub const MAX_FRAME_DT_NORM: f64 = 3.0;

// Sphere sizing: radius as a fraction of the root's smaller dimension,
// clamped to an absolute pixel range.
pub const DEFAULT_FIT: f64 = 0.55;
pub const MIN_RADIUS_PX: f64 = 240.0;
pub const MAX_RADIUS_PX: f64 = 900.0;

// CSS perspective applied to the viewport element.
pub const PERSPECTIVE_PX: f64 = 1100.0;

// Tile edge length relative to the sphere radius.
pub const TILE_SIZE_FACTOR: f64 = 0.28;

// Lattice default when the host supplies none.
pub const DEFAULT_SEGMENTS: u32 = 24;
