//! Scene aggregate and the randomized scene generator.
//!
//! A scene is rebuilt wholesale whenever the viewport changes; nothing is
//! re-laid-out incrementally.

pub mod comet;
pub mod drift;
pub mod nebula;
pub mod planet;
pub mod star;

use glam::Vec2;

use crate::api::config::BackdropConfig;
use crate::core::rng::Rng;
use crate::core::viewport::{PointerState, Viewport};

pub use comet::{Comet, CometSpawner, SpawnerState};
pub use drift::{DriftField, DriftStar};
pub use nebula::NebulaBlob;
pub use planet::{Planet, PLANET_PARALLAX};
pub use star::{LayerSpec, Star, StarLayer, STAR_LAYERS};

/// Every entity of one backdrop, sized for one viewport.
#[derive(Debug, Clone)]
pub struct Scene {
    pub size: Vec2,
    /// Far, mid, near.
    pub layers: Vec<StarLayer>,
    pub nebulae: Vec<NebulaBlob>,
    pub planets: Vec<Planet>,
    /// `None` when comets are switched off.
    pub comets: Option<CometSpawner>,
}

impl Scene {
    /// Build a fresh scene. `config` must already be sanitized.
    pub fn generate(
        config: &BackdropConfig,
        viewport: &Viewport,
        reduced_motion: bool,
        now_ms: f64,
        rng: &mut Rng,
    ) -> Self {
        let size = viewport.size();
        let total = star::star_total(config.density, viewport.area_factor(), reduced_motion);

        let layers = STAR_LAYERS
            .iter()
            .map(|spec| StarLayer::generate(*spec, star::layer_count(total, spec), size, rng))
            .collect();

        let nebulae = if config.nebula {
            (0..NebulaBlob::COUNT)
                .map(|_| NebulaBlob::generate(size, config.accent_hue, rng))
                .collect()
        } else {
            Vec::new()
        };

        let planets = if config.planets {
            let count = Planet::count(rng);
            (0..count)
                .map(|_| Planet::generate(size, config.accent_hue, config.ringed_planets, rng))
                .collect()
        } else {
            Vec::new()
        };

        let comets = config
            .comets
            .then(|| CometSpawner::new(now_ms, config.speed, rng));

        let scene = Self { size, layers, nebulae, planets, comets };
        log::debug!(
            "scene built for {}x{}: {} stars, {} nebulae, {} planets",
            size.x,
            size.y,
            scene.star_count(),
            scene.nebulae.len(),
            scene.planets.len()
        );
        scene
    }

    pub fn star_count(&self) -> usize {
        self.layers.iter().map(StarLayer::len).sum()
    }

    /// Per-frame motion: scroll stars, drift nebulae and planets.
    /// `t` is the animation time after this frame's step.
    pub fn advance(&mut self, t: f64, time_step: f32, pointer: &PointerState, rotate: bool) {
        let size = self.size;
        for layer in &mut self.layers {
            layer.advance(time_step, size);
        }
        for blob in &mut self.nebulae {
            blob.update(t, size);
        }
        let parallax = pointer.parallax(PLANET_PARALLAX);
        for planet in &mut self.planets {
            planet.update(t, parallax, size, rotate);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(config: BackdropConfig, w: f32, h: f32, seed: u64) -> Scene {
        let mut rng = Rng::new(seed);
        Scene::generate(&config.sanitized(), &Viewport::new(w, h, 1.0), false, 0.0, &mut rng)
    }

    #[test]
    fn reference_viewport_star_totals() {
        let one = build(BackdropConfig::default(), 1440.0, 900.0, 1);
        assert_eq!(one.star_count(), 2200);
        let two = build(BackdropConfig { density: 2.0, ..Default::default() }, 1440.0, 900.0, 1);
        assert_eq!(two.star_count(), 4400);
    }

    #[test]
    fn star_total_is_monotone_and_bounded() {
        let sizes = [(320.0, 240.0), (800.0, 600.0), (1440.0, 900.0), (1920.0, 1080.0), (3840.0, 2160.0)];
        let densities = [0.5, 1.0, 1.5, 2.0];
        for &density in &densities {
            let mut prev = 0;
            for &(w, h) in &sizes {
                let count = build(BackdropConfig { density, ..Default::default() }, w, h, 3).star_count();
                assert!(count >= prev, "count fell from {} to {} at {}x{}", prev, count, w, h);
                let reference = 2200.0 * density;
                assert!(count as f32 >= (reference * 0.6).floor() - 3.0);
                assert!(count as f32 <= reference * 2.0 + 3.0);
                prev = count;
            }
        }
        for &(w, h) in &sizes {
            let mut prev = 0;
            for &density in &densities {
                let count = build(BackdropConfig { density, ..Default::default() }, w, h, 3).star_count();
                assert!(count >= prev);
                prev = count;
            }
        }
    }

    #[test]
    fn reduced_motion_halves_stars() {
        let mut rng = Rng::new(1);
        let config = BackdropConfig::default();
        let scene = Scene::generate(&config, &Viewport::default(), true, 0.0, &mut rng);
        assert_eq!(scene.star_count(), 1100);
    }

    #[test]
    fn toggles_disable_entities() {
        let scene = build(
            BackdropConfig { nebula: false, planets: false, comets: false, ..Default::default() },
            800.0,
            600.0,
            2,
        );
        assert!(scene.nebulae.is_empty());
        assert!(scene.planets.is_empty());
        assert!(scene.comets.is_none());
        assert_eq!(scene.layers.len(), 3);
    }

    #[test]
    fn enabled_entities_present() {
        let scene = build(BackdropConfig::default(), 800.0, 600.0, 2);
        assert_eq!(scene.nebulae.len(), NebulaBlob::COUNT);
        assert!(scene.planets.len() == 2 || scene.planets.len() == 3);
        assert!(scene.comets.is_some());
    }

    #[test]
    fn same_seed_same_layout() {
        let a = build(BackdropConfig::default(), 1024.0, 768.0, 99);
        let b = build(BackdropConfig::default(), 1024.0, 768.0, 99);
        assert_eq!(a.layers[1].stars, b.layers[1].stars);
        assert_eq!(a.planets, b.planets);
        assert_eq!(a.nebulae, b.nebulae);
    }

    #[test]
    fn stars_stay_wrapped_after_many_frames() {
        let mut scene = build(BackdropConfig::default(), 640.0, 480.0, 5);
        let mut pointer = PointerState::new();
        pointer.set_target(0.0, 1.0);
        let mut t = 0.0;
        for _ in 0..5_000 {
            t += 0.8 * 5.0;
            pointer.smooth();
            scene.advance(t, 0.8 * 5.0, &pointer, true);
        }
        for layer in &scene.layers {
            for s in &layer.stars {
                assert!(s.pos.x >= 0.0 && s.pos.x < 640.0);
                assert!(s.pos.y >= 0.0 && s.pos.y < 480.0);
            }
        }
        for p in &scene.planets {
            assert!(p.center.is_finite());
        }
    }
}
