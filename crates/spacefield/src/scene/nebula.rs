use glam::Vec2;

use crate::core::rng::Rng;
use crate::core::viewport::wrap;

/// Soft coloured fog blob. Created once per scene, drifts forever.
#[derive(Debug, Clone, PartialEq)]
pub struct NebulaBlob {
    /// Spawn position.
    pub origin: Vec2,
    /// Current drifted centre, wrapped into [-r, W + r) × [-r, H + r).
    pub center: Vec2,
    pub radius: f32,
    pub hue: f32,
    pub alpha: f32,
    /// Horizontal and vertical drift rates.
    pub drift: Vec2,
}

impl NebulaBlob {
    /// Blobs per scene.
    pub const COUNT: usize = 4;
    /// Maximum hue offset from the accent hue, in degrees.
    pub const HUE_SPREAD: f32 = 30.0;
    /// Angular rate of the drift oscillation.
    const SWAY: f64 = 0.0005;

    pub fn generate(size: Vec2, accent_hue: f32, rng: &mut Rng) -> Self {
        let origin = Vec2::new(rng.next_f32() * size.x, rng.next_f32() * size.y);
        Self {
            origin,
            center: origin,
            radius: rng.range(size.x * 0.2, size.x * 0.5),
            hue: (accent_hue + rng.range(-Self::HUE_SPREAD, Self::HUE_SPREAD)).rem_euclid(360.0),
            alpha: rng.range(0.05, 0.12),
            drift: Vec2::new(rng.range(-0.05, 0.05), rng.range(-0.02, 0.02)),
        }
    }

    /// Recompute the drifted centre for animation time `t`.
    pub fn update(&mut self, t: f64, size: Vec2) {
        let span = size + Vec2::splat(self.radius * 2.0);
        // Reduce the drift offset in f64 before narrowing; it grows with `t`.
        let sway = t * Self::SWAY;
        let offset = Vec2::new(
            (sway.sin() * self.drift.x as f64 * t).rem_euclid(span.x as f64) as f32,
            (sway.cos() * self.drift.y as f64 * t).rem_euclid(span.y as f64) as f32,
        );
        let raw = self.origin + offset;
        self.center = Vec2::new(
            wrap(raw.x + self.radius, span.x) - self.radius,
            wrap(raw.y + self.radius, span.y) - self.radius,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ranges() {
        let mut rng = Rng::new(11);
        let size = Vec2::new(1000.0, 800.0);
        for _ in 0..200 {
            let n = NebulaBlob::generate(size, 10.0, &mut rng);
            assert!(n.radius >= 200.0 && n.radius < 500.0);
            assert!(n.alpha >= 0.05 && n.alpha < 0.12);
            assert!(n.hue >= 0.0 && n.hue < 360.0);
            let offset = (n.hue - 10.0 + 180.0).rem_euclid(360.0) - 180.0;
            assert!(offset.abs() <= NebulaBlob::HUE_SPREAD);
        }
    }

    #[test]
    fn starts_at_origin() {
        let mut rng = Rng::new(2);
        let size = Vec2::new(640.0, 480.0);
        let mut n = NebulaBlob::generate(size, 220.0, &mut rng);
        n.update(0.0, size);
        assert!((n.center - n.origin).length() < 1e-3);
    }

    #[test]
    fn centre_stays_in_extended_bounds() {
        let mut rng = Rng::new(3);
        let size = Vec2::new(640.0, 480.0);
        let mut n = NebulaBlob::generate(size, 220.0, &mut rng);
        for frame in 0..20_000 {
            n.update(frame as f64 * 0.8, size);
            assert!(n.center.x >= -n.radius && n.center.x <= size.x + n.radius);
            assert!(n.center.y >= -n.radius && n.center.y <= size.y + n.radius);
        }
    }
}
