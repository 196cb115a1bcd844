//! Box model - measured layout output
//!
//! Every box has a width, a height above its baseline, a depth below it and
//! a shift. Inside a horizontal box the shift moves a child down (positive)
//! or up (negative); inside a vertical box it moves the child right.
//!
//! Leaf boxes (glyphs, rules, struts, glue) have no children. Horizontal and
//! vertical boxes keep their dimensions up to date as children are added.

use crate::font::Char;
use crate::model::{Alignment, FontId};
use crate::render::{Canvas, Color, Point, Rect};

/// The kind of a box, with kind-specific data
#[derive(Debug, Clone, PartialEq)]
pub enum BoxKind {
    /// A single glyph
    Char(Char),
    /// A filled rectangle as tall as the box height
    HorizontalRule,
    /// Invisible box with fixed dimensions
    Strut,
    /// Inter-atom spacing
    Glue,
    /// Children placed left to right on a common baseline
    Horizontal,
    /// Children stacked top to bottom; the baseline is that of the first child
    Vertical { leftmost: f32, rightmost: f32 },
}

/// A node of the layout tree
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutBox {
    kind: BoxKind,
    width: f32,
    height: f32,
    depth: f32,
    shift: f32,
    foreground: Option<Color>,
    background: Option<Color>,
    children: Vec<LayoutBox>,
}

impl LayoutBox {
    fn leaf(kind: BoxKind, width: f32, height: f32, depth: f32, shift: f32) -> Self {
        Self {
            kind,
            width,
            height,
            depth,
            shift,
            foreground: None,
            background: None,
            children: Vec::new(),
        }
    }

    // =========================================================================
    // Leaf Constructors
    // =========================================================================

    /// Box for one glyph, sized by its metrics (italic correction excluded)
    pub fn char_box(c: Char) -> Self {
        Self::leaf(BoxKind::Char(c), c.width(), c.height(), c.depth(), 0.0)
    }

    pub fn strut(width: f32, height: f32, depth: f32, shift: f32) -> Self {
        Self::leaf(BoxKind::Strut, width, height, depth, shift)
    }

    /// Horizontal-only strut, used for kerns
    pub fn kern(width: f32) -> Self {
        Self::strut(width, 0.0, 0.0, 0.0)
    }

    pub fn glue(width: f32) -> Self {
        Self::leaf(BoxKind::Glue, width, 0.0, 0.0, 0.0)
    }

    /// A rule `thickness` tall and `width` wide
    pub fn rule(thickness: f32, width: f32, shift: f32) -> Self {
        Self::leaf(BoxKind::HorizontalRule, width, thickness, 0.0, shift)
    }

    // =========================================================================
    // Composite Constructors
    // =========================================================================

    pub fn horizontal() -> Self {
        Self::leaf(BoxKind::Horizontal, 0.0, 0.0, 0.0, 0.0)
    }

    /// Horizontal box painted with the given colors
    pub fn horizontal_with(foreground: Option<Color>, background: Option<Color>) -> Self {
        Self {
            foreground,
            background,
            ..Self::horizontal()
        }
    }

    /// Horizontal box holding one child
    pub fn horizontal_of(child: LayoutBox) -> Self {
        let mut hbox = Self::horizontal();
        hbox.add(child);
        hbox
    }

    /// Horizontal box of width `width` with `child` aligned inside it
    pub fn aligned_horizontal(child: LayoutBox, width: f32, alignment: Alignment) -> Self {
        let rest = width - child.width;
        let mut hbox = Self::horizontal();
        match alignment {
            Alignment::Center => {
                let pad = Self::kern(rest / 2.0);
                hbox.add(pad.clone());
                hbox.add(child);
                hbox.add(pad);
            }
            Alignment::Left => {
                hbox.add(child);
                hbox.add(Self::kern(rest));
            }
            Alignment::Right => {
                hbox.add(Self::kern(rest));
                hbox.add(child);
            }
        }
        hbox
    }

    pub fn vertical() -> Self {
        Self::leaf(
            BoxKind::Vertical {
                leftmost: f32::INFINITY,
                rightmost: 0.0,
            },
            0.0,
            0.0,
            0.0,
            0.0,
        )
    }

    /// `content` under a rule, separated by `clearance`; the rule has
    /// `thickness` of extra space above it
    pub fn over_bar(content: LayoutBox, clearance: f32, thickness: f32) -> Self {
        let width = content.width;
        let mut vbox = Self::vertical();
        vbox.add(Self::strut(0.0, thickness, 0.0, 0.0));
        vbox.add(Self::rule(thickness, width, 0.0));
        vbox.add(Self::strut(0.0, clearance, 0.0, 0.0));
        vbox.add(content);
        vbox
    }

    // =========================================================================
    // Composition
    // =========================================================================

    /// Append a child to a horizontal or vertical box
    pub fn add(&mut self, child: LayoutBox) {
        match self.kind {
            BoxKind::Horizontal => {
                if self.children.is_empty() {
                    self.height = child.height - child.shift;
                    self.depth = child.depth + child.shift;
                } else {
                    self.height = self.height.max(child.height - child.shift);
                    self.depth = self.depth.max(child.depth + child.shift);
                }
                self.width += child.width;
            }
            BoxKind::Vertical { .. } => {
                if self.children.is_empty() {
                    self.height = child.height;
                    self.depth = child.depth;
                } else {
                    self.depth += child.height + child.depth;
                }
                self.extend_width(&child);
            }
            _ => {
                tracing::warn!(kind = ?self.kind, "ignoring child added to a leaf box");
                return;
            }
        }
        self.children.push(child);
    }

    /// Insert a child into a vertical box; inserting at the front moves the
    /// baseline to the new child
    pub fn insert(&mut self, index: usize, child: LayoutBox) {
        if !matches!(self.kind, BoxKind::Vertical { .. }) {
            self.add(child);
            return;
        }
        let index = index.min(self.children.len());
        if index == 0 {
            self.depth += child.depth + self.height;
            self.height = child.height;
        } else {
            self.depth += child.height + child.depth;
        }
        self.extend_width(&child);
        self.children.insert(index, child);
    }

    fn extend_width(&mut self, child: &LayoutBox) {
        if let BoxKind::Vertical {
            leftmost,
            rightmost,
        } = &mut self.kind
        {
            *leftmost = leftmost.min(child.shift);
            *rightmost = rightmost.max(child.shift + child.width.max(0.0));
            self.width = *rightmost - *leftmost;
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn kind(&self) -> &BoxKind {
        &self.kind
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn depth(&self) -> f32 {
        self.depth
    }

    pub fn shift(&self) -> f32 {
        self.shift
    }

    pub fn foreground(&self) -> Option<Color> {
        self.foreground
    }

    pub fn background(&self) -> Option<Color> {
        self.background
    }

    pub fn children(&self) -> &[LayoutBox] {
        &self.children
    }

    pub fn set_height(&mut self, height: f32) {
        self.height = height;
    }

    pub fn set_depth(&mut self, depth: f32) {
        self.depth = depth;
    }

    pub fn set_shift(&mut self, shift: f32) {
        self.shift = shift;
    }

    /// Font of the last glyph in this box; `None` for whitespace only
    pub fn last_font_id(&self) -> Option<FontId> {
        match &self.kind {
            BoxKind::Char(c) => Some(c.font_id),
            BoxKind::Horizontal | BoxKind::Vertical { .. } => {
                self.children.iter().rev().find_map(LayoutBox::last_font_id)
            }
            _ => None,
        }
    }

    /// Glyphs of this box in drawing order
    pub fn glyphs(&self) -> Vec<&Char> {
        let mut out = Vec::new();
        self.collect_glyphs(&mut out);
        out
    }

    fn collect_glyphs<'a>(&'a self, out: &mut Vec<&'a Char>) {
        if let BoxKind::Char(c) = &self.kind {
            out.push(c);
        }
        for child in &self.children {
            child.collect_glyphs(out);
        }
    }

    // =========================================================================
    // Drawing
    // =========================================================================

    /// Draw with the baseline reference point at (x, y)
    pub fn draw(&self, canvas: &mut dyn Canvas, x: f32, y: f32) {
        self.draw_scaled(canvas, x, y, 1.0);
    }

    /// Draw with every dimension multiplied by `scale`
    pub fn draw_scaled(&self, canvas: &mut dyn Canvas, x: f32, y: f32, scale: f32) {
        let previous = canvas.color();
        if let Some(background) = self.background {
            canvas.set_color(background);
            canvas.fill_rect(Rect::new(
                x,
                y - self.height * scale,
                self.width * scale,
                (self.height + self.depth) * scale,
            ));
        }
        canvas.set_color(self.foreground.unwrap_or(previous));

        match &self.kind {
            BoxKind::Char(c) => {
                canvas.draw_glyph(c.char_font(), Point::new(x, y), c.size() * scale);
            }
            BoxKind::HorizontalRule => {
                canvas.fill_rect(Rect::new(
                    x,
                    y - self.height * scale,
                    self.width * scale,
                    self.height * scale,
                ));
            }
            BoxKind::Strut | BoxKind::Glue => {}
            BoxKind::Horizontal => {
                let mut x_pos = x;
                for child in &self.children {
                    child.draw_scaled(canvas, x_pos, y + child.shift * scale, scale);
                    x_pos += child.width * scale;
                }
            }
            BoxKind::Vertical { leftmost, .. } => {
                let mut y_pos = y - self.height * scale;
                for child in &self.children {
                    y_pos += child.height * scale;
                    let x_pos = x + (child.shift - leftmost) * scale;
                    child.draw_scaled(canvas, x_pos, y_pos, scale);
                    y_pos += child.depth * scale;
                }
            }
        }

        canvas.set_color(previous);
    }
}

// =============================================================================
// Tests
// =============================================================================
