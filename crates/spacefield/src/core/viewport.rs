//! Viewport size and smoothed pointer state.
//!
//! Both are written by host events (through the input queue) and read once
//! per frame by the backdrop.

use glam::Vec2;

/// Viewport area that maps to an area factor of 1.0.
pub const REFERENCE_AREA: f32 = 1440.0 * 900.0;
/// Area factor bounds. Keeps entity counts sane on tiny and huge screens.
pub const AREA_FACTOR_MIN: f32 = 0.6;
pub const AREA_FACTOR_MAX: f32 = 2.0;
/// Device-pixel-ratio bounds for the backing raster.
pub const DPR_MIN: f32 = 1.0;
pub const DPR_MAX: f32 = 2.0;

/// Wrap `value` into [0, modulus).
///
/// Negative remainders are folded back into range, and non-finite input
/// collapses to 0 so a bad frame can never poison stored positions.
#[inline]
pub fn wrap(value: f32, modulus: f32) -> f32 {
    if !value.is_finite() || !(modulus > 0.0) {
        return 0.0;
    }
    let r = value.rem_euclid(modulus);
    // rem_euclid can round up to exactly `modulus` for tiny negative inputs.
    if r >= modulus {
        0.0
    } else {
        r
    }
}

/// Logical viewport in CSS pixels plus the clamped device-pixel-ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub dpr: f32,
}

impl Viewport {
    /// Build a viewport; dimensions are floored at 1px and the DPR clamped to [1, 2].
    pub fn new(width: f32, height: f32, dpr: f32) -> Self {
        let sane = |v: f32| if v.is_finite() { v.max(1.0) } else { 1.0 };
        let dpr = if dpr.is_finite() { dpr.clamp(DPR_MIN, DPR_MAX) } else { DPR_MIN };
        Self {
            width: sane(width),
            height: sane(height),
            dpr,
        }
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    pub fn area(&self) -> f32 {
        self.width * self.height
    }

    /// Viewport area relative to [`REFERENCE_AREA`], clamped to [0.6, 2.0].
    pub fn area_factor(&self) -> f32 {
        (self.area() / REFERENCE_AREA).clamp(AREA_FACTOR_MIN, AREA_FACTOR_MAX)
    }

    /// Backing raster size in device pixels.
    pub fn backing_size(&self) -> (u32, u32) {
        (
            (self.width * self.dpr).floor() as u32,
            (self.height * self.dpr).floor() as u32,
        )
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1440.0, 900.0, 1.0)
    }
}

/// Pointer position in normalized [0, 1] viewport coordinates.
///
/// `target` is sampled straight from input; `current` eases toward it each
/// frame and is what the parallax math reads.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerState {
    pub current: Vec2,
    pub target: Vec2,
}

impl PointerState {
    /// Fraction of the remaining distance covered per frame.
    pub const SMOOTHING: f32 = 0.05;

    pub fn new() -> Self {
        Self {
            current: Vec2::splat(0.5),
            target: Vec2::splat(0.5),
        }
    }

    /// Record a new sample. Values are clamped to [0, 1]; non-finite samples are dropped.
    pub fn set_target(&mut self, x: f32, y: f32) {
        if !x.is_finite() || !y.is_finite() {
            return;
        }
        self.target = Vec2::new(x, y).clamp(Vec2::ZERO, Vec2::ONE);
    }

    /// Exponential approach toward the target.
    pub fn smooth(&mut self) {
        self.current += (self.target - self.current) * Self::SMOOTHING;
    }

    /// Offset from the viewport centre scaled by `strength` (both axes).
    pub fn parallax(&self, strength: f32) -> Vec2 {
        (self.current - Vec2::splat(0.5)) * strength
    }
}

impl Default for PointerState {
    fn default() -> Self {
        Self::new()
    }
}
