//! Entity renderers.
//!
//! Each function draws one kind of entity from its current state. None of
//! them mutate the scene; per-frame motion happens in `Scene::advance`
//! before drawing.

use glam::Vec2;

use crate::core::viewport::{wrap, PointerState};
use crate::renderer::color::Color;
use crate::renderer::surface::{BlendMode, ColorStop, Paint, Surface};
use crate::scene::{Comet, DriftField, NebulaBlob, Planet, StarLayer};

/// Deep-space vertical gradient behind everything else.
pub fn draw_space_gradient<S: Surface + ?Sized>(surface: &mut S, size: Vec2, hue: f32) {
    let paint = Paint::linear(
        Vec2::ZERO,
        Vec2::new(0.0, size.y),
        Color::hsl(hue, 60.0, 6.0),
        Color::hsl(hue + 60.0, 50.0, 3.0),
    );
    surface.fill_rect(Vec2::ZERO, size, &paint);
}

/// Additive radial glow. Leaves the surface in alpha blending.
pub fn draw_nebula<S: Surface + ?Sized>(surface: &mut S, blob: &NebulaBlob) {
    let paint = Paint::Radial {
        inner: blob.center,
        inner_radius: 0.0,
        outer: blob.center,
        outer_radius: blob.radius,
        stops: vec![
            ColorStop::new(0.0, Color::hsla(blob.hue, 90.0, 65.0, blob.alpha)),
            ColorStop::new(1.0, Color::hsla(blob.hue, 90.0, 50.0, 0.0)),
        ],
    };
    surface.set_blend(BlendMode::Additive);
    surface.fill_circle(blob.center, blob.radius, &paint);
    surface.set_blend(BlendMode::Alpha);
}

/// One parallax layer. With `twinkle` off every star holds its phase-only opacity.
pub fn draw_star_layer<S: Surface + ?Sized>(
    surface: &mut S,
    layer: &StarLayer,
    t: f64,
    pointer: &PointerState,
    size: Vec2,
    twinkle: bool,
) {
    let offset = layer.parallax(pointer.current.x);
    let twinkle_t = if twinkle { t } else { 0.0 };
    for star in &layer.stars {
        let x = wrap(star.pos.x + offset, size.x);
        let alpha = layer.spec.alpha * star.twinkle(twinkle_t);
        let paint = Paint::Solid(layer.spec.color.with_alpha(alpha));
        surface.fill_circle(Vec2::new(x, star.pos.y), star.radius, &paint);
    }
}

pub fn draw_planet<S: Surface + ?Sized>(surface: &mut S, planet: &Planet) {
    let c = planet.center;
    let r = planet.radius;

    let body = Paint::Radial {
        inner: c - Vec2::splat(r * 0.3),
        inner_radius: r * 0.2,
        outer: c,
        outer_radius: r,
        stops: vec![
            ColorStop::new(0.0, Color::hsl(planet.hue, 80.0, 70.0)),
            ColorStop::new(1.0, Color::hsl(planet.hue, 60.0, 20.0)),
        ],
    };
    surface.fill_circle(c, r, &body);

    // night side
    surface.fill_circle(c + Vec2::splat(r * 0.2), r, &Paint::Solid(Color::BLACK.with_alpha(0.3)));

    if planet.ring {
        // Local frame: 1.8 × 0.5 squash of a 1.6r circle, gradient spans ±2r before the squash.
        let span = r * 2.0 * 1.8;
        let ring = Paint::Linear {
            from: Vec2::new(-span, 0.0),
            to: Vec2::new(span, 0.0),
            stops: vec![
                ColorStop::new(0.0, Color::WHITE.with_alpha(0.0)),
                ColorStop::new(0.5, Color::WHITE.with_alpha(0.5)),
                ColorStop::new(1.0, Color::WHITE.with_alpha(0.0)),
            ],
        };
        let radii = Vec2::new(r * 1.6 * 1.8, r * 1.6 * 0.5);
        surface.fill_ellipse(c, radii, planet.tilt, &ring);
    }
}

/// Gradient trail from the head back along the direction of travel, then the head.
pub fn draw_comet<S: Surface + ?Sized>(surface: &mut S, comet: &Comet) {
    let tail = comet.tail();
    let trail = Paint::linear(
        comet.pos,
        tail,
        Color::hsla(comet.hue, 100.0, 85.0, 0.9),
        Color::hsla(comet.hue, 100.0, 85.0, 0.0),
    );
    surface.stroke_line(comet.pos, tail, Comet::TRAIL_WIDTH, &trail);
    surface.fill_circle(comet.pos, Comet::HEAD_RADIUS, &Paint::Solid(Color::hsl(comet.hue, 100.0, 90.0)));
}

pub fn draw_drift_field<S: Surface + ?Sized>(surface: &mut S, field: &DriftField, now_s: f64) {
    for star in &field.stars {
        let paint = Paint::Solid(DriftField::COLOR.with_alpha(star.alpha(now_s)));
        surface.fill_circle(star.pos, star.size, &paint);
    }
}
