//! Parallax star layers.

use std::f32::consts::TAU;

use glam::Vec2;

use crate::core::rng::Rng;
use crate::core::viewport::wrap;
use crate::renderer::color::Color;

/// Baseline star total at density 1.0 and area factor 1.0.
pub const BASE_STAR_COUNT: f32 = 2200.0;
/// Star totals are halved when the user prefers reduced motion.
pub const REDUCED_MOTION_COUNT_FACTOR: f32 = 0.5;
/// Horizontal parallax in pixels for a depth-1.0 layer at the viewport edge.
pub const STAR_PARALLAX: f32 = 20.0;

/// Static parameters of one parallax layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerSpec {
    /// Parallax strength.
    pub depth: f32,
    /// Vertical scroll per unit of animation time.
    pub speed: f32,
    /// Star radius range (min, max).
    pub size: (f32, f32),
    /// Base opacity.
    pub alpha: f32,
    /// Share of the star total, in percent.
    pub share_percent: usize,
    pub color: Color,
}

/// Far, mid and near layers, drawn in that order.
pub const STAR_LAYERS: [LayerSpec; 3] = [
    LayerSpec {
        depth: 0.25,
        speed: 0.02,
        size: (0.6, 1.1),
        alpha: 0.45,
        share_percent: 45,
        color: Color::rgb(0.780, 0.824, 0.996), // #c7d2fe
    },
    LayerSpec {
        depth: 0.5,
        speed: 0.06,
        size: (0.7, 1.4),
        alpha: 0.65,
        share_percent: 35,
        color: Color::rgb(0.859, 0.918, 0.996), // #dbeafe
    },
    LayerSpec {
        depth: 1.0,
        speed: 0.12,
        size: (0.8, 1.8),
        alpha: 0.95,
        share_percent: 20,
        color: Color::WHITE,
    },
];

/// Total stars across all layers, before splitting.
pub fn star_total(density: f32, area_factor: f32, reduced_motion: bool) -> usize {
    let motion = if reduced_motion { REDUCED_MOTION_COUNT_FACTOR } else { 1.0 };
    (BASE_STAR_COUNT * density * area_factor * motion).floor().max(0.0) as usize
}

/// Stars in one layer. Never less than one.
pub fn layer_count(total: usize, spec: &LayerSpec) -> usize {
    (total * spec.share_percent / 100).max(1)
}

#[derive(Debug, Clone, PartialEq)]
pub struct Star {
    /// Position in pixels, kept inside [0, W) × [0, H).
    pub pos: Vec2,
    pub radius: f32,
    pub twinkle_phase: f32,
    pub twinkle_speed: f32,
}

impl Star {
    /// Opacity multiplier in [0.2, 1.0].
    #[inline]
    pub fn twinkle(&self, t: f64) -> f32 {
        let phase = self.twinkle_phase as f64 + t * self.twinkle_speed as f64;
        (0.6 + 0.4 * phase.sin() as f32).clamp(0.2, 1.0)
    }

    /// Scroll down by `dy` and wrap into the viewport.
    pub fn advance(&mut self, dy: f32, size: Vec2) {
        self.pos.y = wrap(self.pos.y + dy, size.y);
        self.pos.x = wrap(self.pos.x, size.x);
    }
}

#[derive(Debug, Clone)]
pub struct StarLayer {
    pub spec: LayerSpec,
    pub stars: Vec<Star>,
}

impl StarLayer {
    pub fn generate(spec: LayerSpec, count: usize, size: Vec2, rng: &mut Rng) -> Self {
        let stars = (0..count)
            .map(|_| Star {
                pos: Vec2::new(wrap(rng.next_f32() * size.x, size.x), wrap(rng.next_f32() * size.y, size.y)),
                radius: rng.range(spec.size.0, spec.size.1),
                twinkle_phase: rng.next_f32() * TAU,
                twinkle_speed: rng.range(0.002, 0.02),
            })
            .collect();
        Self { spec, stars }
    }

    /// Scroll the whole layer by one frame of animation time.
    pub fn advance(&mut self, time_step: f32, size: Vec2) {
        let dy = time_step * self.spec.speed;
        for star in &mut self.stars {
            star.advance(dy, size);
        }
    }

    /// Horizontal parallax offset for a normalized pointer x.
    pub fn parallax(&self, pointer_x: f32) -> f32 {
        (pointer_x - 0.5) * self.spec.depth * STAR_PARALLAX
    }

    pub fn len(&self) -> usize {
        self.stars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stars.is_empty()
    }
}
