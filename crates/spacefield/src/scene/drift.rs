//! Drift field: a lighter backdrop of stars rising slowly up the screen.

use glam::Vec2;

use crate::core::rng::Rng;
use crate::renderer::color::Color;

#[derive(Debug, Clone, PartialEq)]
pub struct DriftStar {
    pub pos: Vec2,
    pub size: f32,
    /// Rise per frame in pixels.
    pub speed: f32,
    pub opacity: f32,
}

impl DriftStar {
    fn random(size: Vec2, rng: &mut Rng) -> Self {
        Self {
            pos: Vec2::new(rng.next_f32() * size.x, rng.next_f32() * size.y),
            size: rng.range(0.5, 2.0),
            speed: rng.range(0.05, 0.35),
            opacity: rng.range(0.2, 0.8),
        }
    }

    /// Flicker-adjusted alpha at wall-clock seconds `now_s`.
    pub fn alpha(&self, now_s: f64) -> f32 {
        let flicker = (now_s + self.pos.x as f64).sin() as f32 * DriftField::FLICKER;
        (self.opacity + flicker).max(DriftField::MIN_ALPHA)
    }
}

#[derive(Debug, Clone)]
pub struct DriftField {
    pub size: Vec2,
    pub stars: Vec<DriftStar>,
}

impl DriftField {
    /// One star per this many square pixels.
    pub const AREA_PER_STAR: f32 = 8000.0;
    pub const FLICKER: f32 = 0.15;
    pub const MIN_ALPHA: f32 = 0.05;
    pub const COLOR: Color = Color::rgb(0.580, 0.886, 0.835); // rgb(148, 226, 213)

    pub fn star_count(size: Vec2) -> usize {
        ((size.x * size.y / Self::AREA_PER_STAR).floor() as usize).max(1)
    }

    pub fn generate(size: Vec2, rng: &mut Rng) -> Self {
        let stars = (0..Self::star_count(size))
            .map(|_| DriftStar::random(size, rng))
            .collect();
        Self { size, stars }
    }

    /// Raise every star by its speed × `rate`; stars leaving the top re-enter
    /// at the bottom with a fresh horizontal position.
    pub fn advance(&mut self, rate: f32, rng: &mut Rng) {
        for star in &mut self.stars {
            star.pos.y -= star.speed * rate;
            if star.pos.y < 0.0 {
                star.pos.y = self.size.y;
                star.pos.x = rng.next_f32() * self.size.x;
            }
        }
    }

    pub fn len(&self) -> usize {
        self.stars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stars.is_empty()
    }
}
