//! The 2D raster contract the entity renderers draw through.
//!
//! The browser bridge implements [`Surface`] on top of a canvas 2D context.
//! [`DrawList`] records commands instead of rasterizing; tests use it to
//! check draw order and parameters, and hosts can replay it.

use glam::Vec2;

use super::color::Color;

/// A gradient color stop. `offset` is in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorStop {
    pub offset: f32,
    pub color: Color,
}

impl ColorStop {
    pub const fn new(offset: f32, color: Color) -> Self {
        Self { offset, color }
    }
}

/// Fill or stroke style.
#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    Solid(Color),
    Linear {
        from: Vec2,
        to: Vec2,
        stops: Vec<ColorStop>,
    },
    Radial {
        inner: Vec2,
        inner_radius: f32,
        outer: Vec2,
        outer_radius: f32,
        stops: Vec<ColorStop>,
    },
}

impl Paint {
    /// Two-stop linear gradient.
    pub fn linear(from: Vec2, to: Vec2, start: Color, end: Color) -> Self {
        Paint::Linear {
            from,
            to,
            stops: vec![ColorStop::new(0.0, start), ColorStop::new(1.0, end)],
        }
    }
}

/// Compositing mode for subsequent draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlendMode {
    /// Standard source-over alpha blending.
    #[default]
    Alpha,
    /// Additive ("lighter") blending for glow.
    Additive,
}

/// Primitive operations the renderers need. Coordinates are CSS pixels.
pub trait Surface {
    /// Clear the whole raster to transparent.
    fn clear(&mut self, width: f32, height: f32);

    fn set_blend(&mut self, mode: BlendMode);

    fn fill_rect(&mut self, origin: Vec2, size: Vec2, paint: &Paint);

    fn fill_circle(&mut self, center: Vec2, radius: f32, paint: &Paint);

    /// Fill an ellipse rotated by `rotation` radians about `center`.
    /// Gradient coordinates in `paint` are local to the ellipse: origin at
    /// `center`, axes rotated with it.
    fn fill_ellipse(&mut self, center: Vec2, radii: Vec2, rotation: f32, paint: &Paint);

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, paint: &Paint);
}

/// A recorded draw call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear { width: f32, height: f32 },
    Blend(BlendMode),
    Rect { origin: Vec2, size: Vec2, paint: Paint },
    Circle { center: Vec2, radius: f32, paint: Paint },
    Ellipse { center: Vec2, radii: Vec2, rotation: f32, paint: Paint },
    Line { from: Vec2, to: Vec2, width: f32, paint: Paint },
}

/// Surface that records commands instead of drawing them.
#[derive(Debug, Default)]
pub struct DrawList {
    commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Drop recorded commands, keeping the allocation.
    pub fn reset(&mut self) {
        self.commands.clear();
    }

    /// Replay every recorded command onto another surface.
    pub fn replay<S: Surface + ?Sized>(&self, target: &mut S) {
        for cmd in &self.commands {
            match cmd {
                DrawCommand::Clear { width, height } => target.clear(*width, *height),
                DrawCommand::Blend(mode) => target.set_blend(*mode),
                DrawCommand::Rect { origin, size, paint } => target.fill_rect(*origin, *size, paint),
                DrawCommand::Circle { center, radius, paint } => {
                    target.fill_circle(*center, *radius, paint)
                }
                DrawCommand::Ellipse { center, radii, rotation, paint } => {
                    target.fill_ellipse(*center, *radii, *rotation, paint)
                }
                DrawCommand::Line { from, to, width, paint } => {
                    target.stroke_line(*from, *to, *width, paint)
                }
            }
        }
    }
}

impl Surface for DrawList {
    fn clear(&mut self, width: f32, height: f32) {
        self.commands.push(DrawCommand::Clear { width, height });
    }

    fn set_blend(&mut self, mode: BlendMode) {
        self.commands.push(DrawCommand::Blend(mode));
    }

    fn fill_rect(&mut self, origin: Vec2, size: Vec2, paint: &Paint) {
        self.commands.push(DrawCommand::Rect { origin, size, paint: paint.clone() });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, paint: &Paint) {
        self.commands.push(DrawCommand::Circle { center, radius, paint: paint.clone() });
    }

    fn fill_ellipse(&mut self, center: Vec2, radii: Vec2, rotation: f32, paint: &Paint) {
        self.commands.push(DrawCommand::Ellipse {
            center,
            radii,
            rotation,
            paint: paint.clone(),
        });
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, paint: &Paint) {
        self.commands.push(DrawCommand::Line { from, to, width, paint: paint.clone() });
    }
}
