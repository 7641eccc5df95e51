//! `Surface` implementation over a browser 2D canvas context.

use std::f64::consts::TAU;

use spacefield::{BlendMode, ColorStop, Paint, Surface, Vec2, Viewport};
use wasm_bindgen::JsCast;
use web_sys::{CanvasGradient, CanvasRenderingContext2d, HtmlCanvasElement};

use crate::env::MountError;

enum Style {
    Css(String),
    Gradient(CanvasGradient),
}

pub struct CanvasSurface {
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn new(ctx: CanvasRenderingContext2d) -> Self {
        Self { ctx }
    }

    pub fn from_canvas(canvas: &HtmlCanvasElement) -> Result<Self, MountError> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or(MountError::NoContext)?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| MountError::NoContext)?;
        Ok(Self::new(ctx))
    }

    /// Size the backing store to CSS size × DPR and scale drawing so scene
    /// coordinates stay in CSS pixels.
    pub fn configure(&self, canvas: &HtmlCanvasElement, viewport: &Viewport) -> Result<(), MountError> {
        let (width, height) = viewport.backing_size();
        canvas.set_width(width);
        canvas.set_height(height);
        // Pin the layout size, or it follows the backing attributes and grows by DPR on each resize.
        let (css_width, css_height) = css_size(viewport);
        let style = canvas.style();
        style.set_property("width", &css_width)?;
        style.set_property("height", &css_height)?;
        let dpr = viewport.dpr as f64;
        self.ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0)?;
        Ok(())
    }

    pub fn context(&self) -> &CanvasRenderingContext2d {
        &self.ctx
    }

    fn style(&self, paint: &Paint) -> Style {
        match paint {
            Paint::Solid(color) => Style::Css(color.to_string()),
            Paint::Linear { from, to, stops } => {
                let gradient = self.ctx.create_linear_gradient(
                    from.x as f64,
                    from.y as f64,
                    to.x as f64,
                    to.y as f64,
                );
                add_stops(&gradient, stops);
                Style::Gradient(gradient)
            }
            Paint::Radial { inner, inner_radius, outer, outer_radius, stops } => {
                // Rejects negative radii; fall back to the first stop's colour.
                match self.ctx.create_radial_gradient(
                    inner.x as f64,
                    inner.y as f64,
                    inner_radius.max(0.0) as f64,
                    outer.x as f64,
                    outer.y as f64,
                    outer_radius.max(0.0) as f64,
                ) {
                    Ok(gradient) => {
                        add_stops(&gradient, stops);
                        Style::Gradient(gradient)
                    }
                    Err(_) => Style::Css(
                        stops.first().map(|s| s.color.to_string()).unwrap_or_default(),
                    ),
                }
            }
        }
    }

    fn set_fill(&self, paint: &Paint) {
        match self.style(paint) {
            Style::Css(css) => self.ctx.set_fill_style_str(&css),
            Style::Gradient(gradient) => self.ctx.set_fill_style_canvas_gradient(&gradient),
        }
    }

    fn set_stroke(&self, paint: &Paint) {
        match self.style(paint) {
            Style::Css(css) => self.ctx.set_stroke_style_str(&css),
            Style::Gradient(gradient) => self.ctx.set_stroke_style_canvas_gradient(&gradient),
        }
    }
}

/// CSS `width` / `height` for the canvas element: the logical size, never the backing size.
pub fn css_size(viewport: &Viewport) -> (String, String) {
    (format!("{}px", viewport.width), format!("{}px", viewport.height))
}

fn add_stops(gradient: &CanvasGradient, stops: &[ColorStop]) {
    for stop in stops {
        let _ = gradient.add_color_stop(stop.offset.clamp(0.0, 1.0), &stop.color.to_string());
    }
}

impl Surface for CanvasSurface {
    fn clear(&mut self, width: f32, height: f32) {
        self.ctx.clear_rect(0.0, 0.0, width as f64, height as f64);
    }

    fn set_blend(&mut self, mode: BlendMode) {
        let op = match mode {
            BlendMode::Alpha => "source-over",
            BlendMode::Additive => "lighter",
        };
        let _ = self.ctx.set_global_composite_operation(op);
    }

    fn fill_rect(&mut self, origin: Vec2, size: Vec2, paint: &Paint) {
        self.set_fill(paint);
        self.ctx.fill_rect(origin.x as f64, origin.y as f64, size.x as f64, size.y as f64);
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, paint: &Paint) {
        if radius <= 0.0 {
            return;
        }
        self.set_fill(paint);
        self.ctx.begin_path();
        let _ = self.ctx.arc(center.x as f64, center.y as f64, radius as f64, 0.0, TAU);
        self.ctx.fill();
    }

    fn fill_ellipse(&mut self, center: Vec2, radii: Vec2, rotation: f32, paint: &Paint) {
        if radii.x <= 0.0 || radii.y <= 0.0 {
            return;
        }
        // Gradient coordinates are relative to the ellipse centre.
        self.ctx.save();
        let _ = self.ctx.translate(center.x as f64, center.y as f64);
        let _ = self.ctx.rotate(rotation as f64);
        self.set_fill(paint);
        self.ctx.begin_path();
        let _ = self.ctx.ellipse(0.0, 0.0, radii.x as f64, radii.y as f64, 0.0, 0.0, TAU);
        self.ctx.fill();
        self.ctx.restore();
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, paint: &Paint) {
        self.set_stroke(paint);
        self.ctx.set_line_width(width as f64);
        self.ctx.begin_path();
        self.ctx.move_to(from.x as f64, from.y as f64);
        self.ctx.line_to(to.x as f64, to.y as f64);
        self.ctx.stroke();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn css_size_is_logical_not_backing() {
        let viewport = Viewport::new(300.0, 150.0, 2.0);
        assert_eq!(viewport.backing_size(), (600, 300));
        assert_eq!(css_size(&viewport), ("300px".to_string(), "150px".to_string()));
    }

    #[test]
    fn css_size_is_stable_across_reconfigures() {
        // Re-measuring the pinned element must give back the same viewport.
        let mut viewport = Viewport::new(1280.0, 720.0, 2.0);
        for _ in 0..4 {
            let (w, h) = css_size(&viewport);
            let w: f32 = w.trim_end_matches("px").parse().unwrap();
            let h: f32 = h.trim_end_matches("px").parse().unwrap();
            viewport = Viewport::new(w, h, viewport.dpr);
        }
        assert_eq!(viewport, Viewport::new(1280.0, 720.0, 2.0));
    }
}
