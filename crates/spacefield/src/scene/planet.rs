use glam::Vec2;

use crate::core::rng::Rng;
use crate::core::viewport::wrap;

/// Pointer parallax in pixels at the viewport edge (both axes).
pub const PLANET_PARALLAX: f32 = 30.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Planet {
    pub origin: Vec2,
    /// Current centre after drift and parallax, wrapped into [-r, W + r) × [-r, H + r).
    pub center: Vec2,
    pub radius: f32,
    pub ring: bool,
    pub hue: f32,
    /// Ring wobble rate.
    pub rotation_speed: f32,
    pub drift: Vec2,
    /// Current ring tilt in radians.
    pub tilt: f32,
}

impl Planet {
    pub const HUE_SPREAD: f32 = 80.0;
    pub const MAX_TILT: f32 = 0.6;

    /// Two planets, plus a third on a coin flip.
    pub fn count(rng: &mut Rng) -> usize {
        2 + rng.chance(0.5) as usize
    }

    pub fn generate(size: Vec2, accent_hue: f32, ringed: bool, rng: &mut Rng) -> Self {
        let origin = Vec2::new(rng.next_f32() * size.x, rng.next_f32() * size.y);
        let radius = rng.range(40.0, 110.0);
        let hue = (accent_hue + rng.range(-Self::HUE_SPREAD, Self::HUE_SPREAD)).rem_euclid(360.0);
        let rotation_speed = rng.range(0.01, 0.03);
        let drift = Vec2::new(rng.range(-0.04, 0.04), rng.range(-0.02, 0.02));
        let ring = ringed && rng.chance(0.5);
        Self {
            origin,
            center: origin,
            radius,
            ring,
            hue,
            rotation_speed,
            drift,
            tilt: 0.0,
        }
    }

    /// Recompute centre and ring tilt. `parallax` is the pointer offset in pixels.
    pub fn update(&mut self, t: f64, parallax: Vec2, size: Vec2, rotate: bool) {
        let span = size + Vec2::splat(self.radius * 2.0);
        let drifted = Vec2::new(
            (self.drift.x as f64 * t).rem_euclid(span.x as f64) as f32,
            (self.drift.y as f64 * t).rem_euclid(span.y as f64) as f32,
        );
        let raw = self.origin + parallax + drifted;
        self.center = Vec2::new(
            wrap(raw.x + self.radius, span.x) - self.radius,
            wrap(raw.y + self.radius, span.y) - self.radius,
        );
        self.tilt = if rotate {
            (t * 0.001 * self.rotation_speed as f64).sin() as f32 * Self::MAX_TILT
        } else {
            0.0
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_is_two_or_three() {
        let mut rng = Rng::new(8);
        let counts: Vec<usize> = (0..200).map(|_| Planet::count(&mut rng)).collect();
        assert!(counts.iter().all(|&c| c == 2 || c == 3));
        assert!(counts.contains(&2) && counts.contains(&3));
    }

    #[test]
    fn generated_ranges() {
        let mut rng = Rng::new(4);
        for _ in 0..200 {
            let p = Planet::generate(Vec2::new(800.0, 600.0), 220.0, false, &mut rng);
            assert!(p.radius >= 40.0 && p.radius < 110.0);
            assert!(!p.ring);
            let offset = (p.hue - 220.0 + 180.0).rem_euclid(360.0) - 180.0;
            assert!(offset.abs() <= Planet::HUE_SPREAD + 1e-3);
        }
    }

    #[test]
    fn rings_are_opt_in() {
        let mut rng = Rng::new(4);
        let ringed = (0..100)
            .filter(|_| Planet::generate(Vec2::splat(500.0), 0.0, true, &mut rng).ring)
            .count();
        assert!(ringed > 0 && ringed < 100);
    }

    #[test]
    fn parallax_moves_centre() {
        let mut rng = Rng::new(6);
        let size = Vec2::new(800.0, 600.0);
        let mut p = Planet::generate(size, 220.0, false, &mut rng);
        p.origin = Vec2::new(400.0, 300.0);
        p.update(0.0, Vec2::new(15.0, -15.0), size, true);
        assert!((p.center - Vec2::new(415.0, 285.0)).length() < 1e-3);
    }

    #[test]
    fn drift_keeps_moving_late_in_the_session() {
        let mut rng = Rng::new(6);
        let size = Vec2::splat(500.0);
        let mut p = Planet::generate(size, 220.0, false, &mut rng);
        p.drift = Vec2::new(0.04, 0.0);
        let span = size.x + p.radius * 2.0;

        let t0 = 16_800_000.0;
        p.update(t0, Vec2::ZERO, size, true);
        let before = p.center.x;
        p.update(t0 + 100.0 * 0.8, Vec2::ZERO, size, true);
        let moved = (p.center.x - before).rem_euclid(span);
        assert!((moved - 3.2).abs() < 1e-2, "moved {}", moved);
    }

    #[test]
    fn frozen_rotation_has_no_tilt() {
        let mut rng = Rng::new(6);
        let mut p = Planet::generate(Vec2::splat(500.0), 220.0, true, &mut rng);
        p.update(123_456.0, Vec2::ZERO, Vec2::splat(500.0), false);
        assert_eq!(p.tilt, 0.0);
    }
}
