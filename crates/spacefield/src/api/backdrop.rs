//! The backdrop controller and its per-frame scheduler.
//!
//! A `Backdrop` owns everything one mounted view needs: configuration,
//! viewport, pointer, clock, RNG and the current scene. The host calls
//! [`Backdrop::tick`] once per display frame with a surface to draw on;
//! each tick returns promptly and never blocks.

use crate::api::config::{BackdropConfig, BackdropStyle};
use crate::core::rng::Rng;
use crate::core::time::FrameClock;
use crate::core::viewport::{PointerState, Viewport};
use crate::input::queue::{InputEvent, InputQueue};
use crate::renderer::surface::Surface;
use crate::scene::{DriftField, Scene};
use crate::systems::render;

/// What the backdrop is currently drawing.
#[derive(Debug, Clone)]
pub enum Content {
    Space(Scene),
    Drift(DriftField),
}

pub struct Backdrop {
    config: BackdropConfig,
    viewport: Viewport,
    reduced_motion: bool,
    pointer: PointerState,
    clock: FrameClock,
    rng: Rng,
    input: InputQueue,
    content: Content,
    /// Scenes built so far, including the first.
    generation: u32,
}

impl Backdrop {
    /// Build the first scene. `now_ms` is the host's monotonic clock; it also
    /// seeds the RNG when the config carries no seed.
    pub fn new(config: BackdropConfig, viewport: Viewport, reduced_motion: bool, now_ms: f64) -> Self {
        let config = config.sanitized();
        let seed = config.seed.unwrap_or_else(|| now_ms.to_bits());
        let mut rng = Rng::new(seed);
        let content = Self::build(&config, &viewport, reduced_motion, now_ms, &mut rng);
        log::info!(
            "backdrop: {:?} style at {}x{} (density {}, speed {})",
            config.style,
            viewport.width,
            viewport.height,
            config.density,
            config.speed
        );
        Self {
            clock: FrameClock::new(config.speed, reduced_motion),
            config,
            viewport,
            reduced_motion,
            pointer: PointerState::new(),
            rng,
            input: InputQueue::new(),
            content,
            generation: 1,
        }
    }

    fn build(
        config: &BackdropConfig,
        viewport: &Viewport,
        reduced_motion: bool,
        now_ms: f64,
        rng: &mut Rng,
    ) -> Content {
        match config.style {
            BackdropStyle::Space => {
                Content::Space(Scene::generate(config, viewport, reduced_motion, now_ms, rng))
            }
            BackdropStyle::Drift => Content::Drift(DriftField::generate(viewport.size(), rng)),
        }
    }

    /// Queue a host event; it takes effect at the start of the next tick.
    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Discard the current scene and build one for `viewport`.
    pub fn resize(&mut self, viewport: Viewport, now_ms: f64) {
        self.viewport = viewport;
        self.rebuild(now_ms);
    }

    /// Apply a reduced-motion change: retune the clock and rebuild (entity counts depend on it).
    pub fn set_reduced_motion(&mut self, enabled: bool, now_ms: f64) {
        if enabled == self.reduced_motion {
            return;
        }
        self.reduced_motion = enabled;
        self.clock.retune(self.config.speed, enabled);
        self.rebuild(now_ms);
    }

    fn rebuild(&mut self, now_ms: f64) {
        self.content = Self::build(&self.config, &self.viewport, self.reduced_motion, now_ms, &mut self.rng);
        self.generation += 1;
        log::debug!("backdrop rebuilt (generation {})", self.generation);
    }

    fn apply_input(&mut self, now_ms: f64) {
        for event in self.input.drain() {
            match event {
                InputEvent::PointerMove { x, y } => self.pointer.set_target(x, y),
                InputEvent::Resize { width, height, dpr } => {
                    self.resize(Viewport::new(width, height, dpr), now_ms)
                }
                InputEvent::ReducedMotion { enabled } => self.set_reduced_motion(enabled, now_ms),
            }
        }
    }

    /// Run one frame and draw it onto `surface`.
    ///
    /// Order: input, clock, pointer smoothing, motion, clear, then painting
    /// back to front: gradient, nebulae, far/mid/near stars, planets, comet.
    pub fn tick<S: Surface + ?Sized>(&mut self, now_ms: f64, surface: &mut S) {
        self.apply_input(now_ms);

        let t = self.clock.advance();
        let step = self.clock.step();
        self.pointer.smooth();

        let size = self.viewport.size();
        let animate = !self.reduced_motion;

        match &mut self.content {
            Content::Space(scene) => {
                scene.advance(t, step, &self.pointer, animate);

                surface.clear(size.x, size.y);
                render::draw_space_gradient(surface, size, self.config.accent_hue);
                for blob in &scene.nebulae {
                    render::draw_nebula(surface, blob);
                }
                for layer in &scene.layers {
                    render::draw_star_layer(surface, layer, t, &self.pointer, size, animate);
                }
                for planet in &scene.planets {
                    render::draw_planet(surface, planet);
                }
                if let Some(spawner) = scene.comets.as_mut() {
                    spawner.poll(now_ms, size, self.config.accent_hue, &mut self.rng);
                    if let Some(comet) = spawner.active() {
                        render::draw_comet(surface, comet);
                    }
                    spawner.advance(now_ms, size, &mut self.rng);
                }
            }
            Content::Drift(field) => {
                field.advance(step / FrameClock::STEP, &mut self.rng);
                surface.clear(size.x, size.y);
                render::draw_drift_field(surface, field, now_ms / 1000.0);
            }
        }
    }

    pub fn config(&self) -> &BackdropConfig {
        &self.config
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn pointer(&self) -> &PointerState {
        &self.pointer
    }

    pub fn reduced_motion(&self) -> bool {
        self.reduced_motion
    }

    /// Accumulated animation time.
    pub fn elapsed(&self) -> f64 {
        self.clock.elapsed()
    }

    pub fn content(&self) -> &Content {
        &self.content
    }

    /// The space scene, when that style is active.
    pub fn scene(&self) -> Option<&Scene> {
        match &self.content {
            Content::Space(scene) => Some(scene),
            Content::Drift(_) => None,
        }
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::color::Color;
    use crate::renderer::surface::{BlendMode, DrawCommand, DrawList, Paint};

    fn seeded(config: BackdropConfig) -> BackdropConfig {
        BackdropConfig { seed: Some(42), ..config }
    }

    fn backdrop(config: BackdropConfig) -> Backdrop {
        Backdrop::new(seeded(config), Viewport::new(800.0, 600.0, 1.0), false, 0.0)
    }

    #[test]
    fn first_frame_paints_back_to_front() {
        let mut bd = backdrop(BackdropConfig { comets: false, ..Default::default() });
        let mut list = DrawList::new();
        bd.tick(16.0, &mut list);

        let scene = bd.scene().unwrap();
        let cmds = list.commands();
        assert!(matches!(cmds[0], DrawCommand::Clear { .. }));
        assert!(matches!(cmds[1], DrawCommand::Rect { paint: Paint::Linear { .. }, .. }));

        // 4 nebulae × (blend, circle, blend)
        let nebula_end = 2 + scene.nebulae.len() * 3;
        assert_eq!(cmds[2], DrawCommand::Blend(BlendMode::Additive));
        assert_eq!(cmds[nebula_end - 1], DrawCommand::Blend(BlendMode::Alpha));

        let stars_end = nebula_end + scene.star_count();
        assert!(cmds[nebula_end..stars_end]
            .iter()
            .all(|c| matches!(c, DrawCommand::Circle { paint: Paint::Solid(_), .. })));

        // Planets last: body + terminator each.
        assert_eq!(cmds.len(), stars_end + scene.planets.len() * 2);
        assert!(matches!(cmds[stars_end], DrawCommand::Circle { paint: Paint::Radial { .. }, .. }));
    }

    #[test]
    fn far_layer_drawn_before_near_layer() {
        let mut bd = backdrop(BackdropConfig {
            nebula: false,
            planets: false,
            comets: false,
            ..Default::default()
        });
        let mut list = DrawList::new();
        bd.tick(16.0, &mut list);
        let scene = bd.scene().unwrap();
        let depths: Vec<f32> = scene.layers.iter().map(|l| l.spec.depth).collect();
        assert!(depths[0] < depths[1] && depths[1] < depths[2], "layers not far to near: {:?}", depths);

        let drawn: Vec<Color> = list.commands()[2..]
            .iter()
            .map(|c| match c {
                DrawCommand::Circle { paint: Paint::Solid(col), .. } => col.with_alpha(1.0),
                other => panic!("only stars expected, got {:?}", other),
            })
            .collect();
        let expected: Vec<Color> = scene
            .layers
            .iter()
            .flat_map(|l| std::iter::repeat(l.spec.color.with_alpha(1.0)).take(l.len()))
            .collect();
        assert_eq!(drawn.len(), expected.len());
        // Each layer has its own tint, so the stars form three blocks: far, mid, near.
        assert!(drawn == expected, "star layers drawn out of order");
    }

    #[test]
    fn resize_event_rebuilds_before_next_draw() {
        let mut bd = backdrop(BackdropConfig::default());
        let mut list = DrawList::new();
        bd.tick(16.0, &mut list);
        assert_eq!(bd.generation(), 1);

        bd.push_input(InputEvent::Resize { width: 1440.0, height: 900.0, dpr: 1.0 });
        list.reset();
        bd.tick(32.0, &mut list);

        assert_eq!(bd.generation(), 2);
        let scene = bd.scene().unwrap();
        assert_eq!(scene.size, glam::Vec2::new(1440.0, 900.0));
        assert_eq!(scene.star_count(), 2200);
        assert_eq!(list.commands()[0], DrawCommand::Clear { width: 1440.0, height: 900.0 });
    }

    #[test]
    fn pointer_input_is_smoothed() {
        let mut bd = backdrop(BackdropConfig::default());
        bd.push_input(InputEvent::PointerMove { x: 1.0, y: 1.0 });
        let mut list = DrawList::new();
        bd.tick(16.0, &mut list);
        let p = bd.pointer();
        assert_eq!(p.target, glam::Vec2::ONE);
        assert!((p.current.x - 0.525).abs() < 1e-6);
    }

    #[test]
    fn reduced_motion_slows_and_thins() {
        let mut bd = Backdrop::new(seeded(BackdropConfig::default()), Viewport::default(), false, 0.0);
        let mut list = DrawList::new();
        bd.tick(16.0, &mut list);
        let normal_step = bd.elapsed();

        bd.push_input(InputEvent::ReducedMotion { enabled: true });
        bd.tick(32.0, &mut list);
        assert!(bd.reduced_motion());
        assert!(bd.elapsed() - normal_step < normal_step);
        assert_eq!(bd.scene().unwrap().star_count(), 1100);
    }

    #[test]
    fn comet_appears_and_at_most_one_in_flight() {
        let mut bd = backdrop(BackdropConfig { speed: 5.0, ..Default::default() });
        let mut list = DrawList::new();
        let mut seen = false;
        let mut now = 0.0;
        for _ in 0..5_000 {
            now += 16.0;
            list.reset();
            bd.tick(now, &mut list);
            let lines = list
                .commands()
                .iter()
                .filter(|c| matches!(c, DrawCommand::Line { .. }))
                .count();
            assert!(lines <= 1);
            seen |= lines == 1;
        }
        assert!(seen, "expected a comet within {}ms", now);
    }

    #[test]
    fn drift_style_draws_drift_field() {
        let mut bd = backdrop(BackdropConfig { style: BackdropStyle::Drift, ..Default::default() });
        assert!(bd.scene().is_none());
        let mut list = DrawList::new();
        bd.tick(16.0, &mut list);
        let Content::Drift(field) = bd.content() else {
            panic!("expected drift content");
        };
        assert_eq!(list.len(), 1 + field.len());
    }

    #[test]
    fn config_is_sanitized_on_construction() {
        let bd = backdrop(BackdropConfig { speed: -3.0, density: 50.0, ..Default::default() });
        assert_eq!(bd.config().speed, BackdropConfig::SPEED_RANGE.0);
        assert_eq!(bd.config().density, BackdropConfig::DENSITY_RANGE.1);
    }
}
