//! Rendering - Drawing backends for box trees
//!
//! Boxes paint themselves through the [`Canvas`] trait. The crate ships one
//! backend, [`Recorder`], which collects [`RenderPrimitive`]s; real pixel or
//! vector output is left to downstream canvases.
//!
//! Coordinates grow right and down. A box is drawn with its reference point on
//! the baseline at its left edge.

use crate::boxes::LayoutBox;
use crate::model::CharFont;
use serde::{Deserialize, Serialize};

// =============================================================================
// Geometry
// =============================================================================

/// A color in RGBA format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const BLUE: Color = Color::rgb(0, 0, 255);
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

/// A position in drawing coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn origin() -> Self {
        Self::default()
    }

    pub fn offset(&self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// An axis-aligned rectangle given by its top-left corner and size
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn translate(&self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.width, self.height)
    }
}

// =============================================================================
// Canvas Contract
// =============================================================================

/// A drawing surface boxes paint onto
pub trait Canvas {
    /// Current paint color
    fn color(&self) -> Color;

    fn set_color(&mut self, color: Color);

    /// Fill a rectangle in the current color
    fn fill_rect(&mut self, rect: Rect);

    /// Draw a glyph with its baseline origin at `position`, scaled by `scale`
    fn draw_glyph(&mut self, glyph: CharFont, position: Point, scale: f32);

    /// Move the origin of all following drawing operations
    fn translate(&mut self, dx: f32, dy: f32);
}

// =============================================================================
// Recording Backend
// =============================================================================

/// One drawing operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RenderPrimitive {
    /// A filled rectangle (rules and backgrounds)
    Rectangle { rect: Rect, fill: Color },
    /// A single glyph
    Glyph {
        glyph: CharFont,
        position: Point,
        size: f32,
        color: Color,
    },
}

/// Canvas that records primitives instead of painting them
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    color: Color,
    origin: Point,
    primitives: Vec<RenderPrimitive>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start recording in the given color
    pub fn with_color(color: Color) -> Self {
        Self {
            color,
            ..Self::default()
        }
    }

    pub fn primitives(&self) -> &[RenderPrimitive] {
        &self.primitives
    }

    pub fn into_primitives(self) -> Vec<RenderPrimitive> {
        self.primitives
    }

    /// The glyphs drawn so far, in drawing order
    pub fn glyphs(&self) -> impl Iterator<Item = (CharFont, Point)> + '_ {
        self.primitives.iter().filter_map(|p| match p {
            RenderPrimitive::Glyph {
                glyph, position, ..
            } => Some((*glyph, *position)),
            RenderPrimitive::Rectangle { .. } => None,
        })
    }
}

impl Canvas for Recorder {
    fn color(&self) -> Color {
        self.color
    }

    fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    fn fill_rect(&mut self, rect: Rect) {
        self.primitives.push(RenderPrimitive::Rectangle {
            rect: rect.translate(self.origin.x, self.origin.y),
            fill: self.color,
        });
    }

    fn draw_glyph(&mut self, glyph: CharFont, position: Point, scale: f32) {
        self.primitives.push(RenderPrimitive::Glyph {
            glyph,
            position: position.offset(self.origin.x, self.origin.y),
            size: scale,
            color: self.color,
        });
    }

    fn translate(&mut self, dx: f32, dy: f32) {
        self.origin = self.origin.offset(dx, dy);
    }
}

// =============================================================================
// Render Output
// =============================================================================

/// Recorded primitives for one box tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderOutput {
    pub primitives: Vec<RenderPrimitive>,
    /// Box extent: height above and depth below the baseline
    pub bounds: Rect,
    /// Baseline position (y coordinate)
    pub baseline: f32,
}

/// Configuration for the renderer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Color used where a box sets none
    pub color: Color,
    /// Multiplier applied to the whole tree
    pub scale: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            scale: 1.0,
        }
    }
}

/// Draws box trees onto a [`Recorder`]
#[derive(Debug, Clone, Default)]
pub struct Renderer {
    config: RenderConfig,
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: RenderConfig) -> Self {
        Self { config }
    }

    /// Record a box whose baseline starts at `origin`
    pub fn render(&self, layout: &LayoutBox, origin: Point) -> RenderOutput {
        let mut canvas = Recorder::with_color(self.config.color);
        canvas.translate(origin.x, origin.y);
        let scale = self.config.scale;
        layout.draw_scaled(&mut canvas, 0.0, 0.0, scale);

        let height = layout.height() * scale;
        let depth = layout.depth() * scale;
        RenderOutput {
            primitives: canvas.into_primitives(),
            bounds: Rect::new(origin.x, origin.y - height, layout.width() * scale, height + depth),
            baseline: origin.y,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_creation() {
        let c = Color::rgb(255, 128, 64);
        assert_eq!(c.r, 255);
        assert_eq!(c.g, 128);
        assert_eq!(c.b, 64);
        assert_eq!(c.a, 255);
        assert_eq!(Color::default(), Color::BLACK);
    }

    #[test]
    fn test_rect_translate() {
        let r = Rect::new(10.0, 20.0, 30.0, 40.0);
        assert_eq!(r.translate(1.0, -1.0), Rect::new(11.0, 19.0, 30.0, 40.0));
    }

    #[test]
    fn test_recorder_translates() {
        let mut canvas = Recorder::new();
        canvas.translate(5.0, 10.0);
        canvas.set_color(Color::RED);
        canvas.fill_rect(Rect::new(0.0, 0.0, 1.0, 1.0));
        canvas.draw_glyph(CharFont::new('x', 1), Point::new(2.0, 3.0), 0.7);

        assert_eq!(
            canvas.primitives()[0],
            RenderPrimitive::Rectangle {
                rect: Rect::new(5.0, 10.0, 1.0, 1.0),
                fill: Color::RED,
            }
        );
        let glyphs: Vec<_> = canvas.glyphs().collect();
        assert_eq!(glyphs, vec![(CharFont::new('x', 1), Point::new(7.0, 13.0))]);
    }

    #[test]
    fn test_render_strut_draws_nothing() {
        let strut = LayoutBox::strut(2.0, 1.0, 0.5, 0.0);
        let output = Renderer::new().render(&strut, Point::new(0.0, 10.0));
        assert!(output.primitives.is_empty());
        assert_eq!(output.bounds, Rect::new(0.0, 9.0, 2.0, 1.5));
        assert_eq!(output.baseline, 10.0);
    }

    #[test]
    fn test_render_scaled_rule() {
        let config = RenderConfig {
            color: Color::BLUE,
            scale: 2.0,
        };
        let rule = LayoutBox::rule(0.5, 3.0, 0.0);
        let output = Renderer::with_config(config).render(&rule, Point::origin());
        assert_eq!(
            output.primitives,
            vec![RenderPrimitive::Rectangle {
                rect: Rect::new(0.0, -1.0, 6.0, 1.0),
                fill: Color::BLUE,
            }]
        );
    }
}
