//! Layout environment - style, colors and font state
//!
//! An environment is a small `Copy` value. Changing context (numerator,
//! subscript, radicand, ...) produces a derived copy; the parent is never
//! modified. The only field that changes while a row is built is the last
//! font id, and that happens on the row's own copy.

use crate::font::TexFont;
use crate::glue::GlueTable;
use crate::model::FontId;
use crate::render::Color;
use crate::style::Style;
use std::fmt;

/// Style and font state for laying out one (sub)formula
#[derive(Clone, Copy)]
pub struct TexEnvironment<'a> {
    style: Style,
    font: &'a dyn TexFont,
    glue: &'a GlueTable,
    foreground: Option<Color>,
    background: Option<Color>,
    last_font_id: Option<FontId>,
}

impl<'a> TexEnvironment<'a> {
    /// Create an environment in the given style without colors
    pub fn new(style: Style, font: &'a dyn TexFont, glue: &'a GlueTable) -> Self {
        Self {
            style,
            font,
            glue,
            foreground: None,
            background: None,
            last_font_id: None,
        }
    }

    /// Create an environment in display style
    pub fn display(font: &'a dyn TexFont, glue: &'a GlueTable) -> Self {
        Self::new(Style::DISPLAY, font, glue)
    }

    /// Copy with another style; the last font id is not carried over
    pub fn with_style(&self, style: Style) -> Self {
        Self {
            style,
            last_font_id: None,
            ..*self
        }
    }

    /// Copy with the given colors set (unset colors keep their current value)
    pub fn with_colors(&self, foreground: Option<Color>, background: Option<Color>) -> Self {
        Self {
            foreground: foreground.or(self.foreground),
            background: background.or(self.background),
            last_font_id: None,
            ..*self
        }
    }

    /// Copy without colors, keeping the last font id
    pub fn without_colors(&self) -> Self {
        Self {
            foreground: None,
            background: None,
            ..*self
        }
    }

    pub fn cramp_style(&self) -> Self {
        self.with_style(self.style.cramp())
    }

    pub fn num_style(&self) -> Self {
        self.with_style(self.style.num())
    }

    pub fn denom_style(&self) -> Self {
        self.with_style(self.style.denom())
    }

    pub fn sub_style(&self) -> Self {
        self.with_style(self.style.sub())
    }

    pub fn sup_style(&self) -> Self {
        self.with_style(self.style.sup())
    }

    pub fn root_style(&self) -> Self {
        self.with_style(self.style.root())
    }

    pub fn style(&self) -> Style {
        self.style
    }

    pub fn font(&self) -> &'a dyn TexFont {
        self.font
    }

    pub fn glue(&self) -> &'a GlueTable {
        self.glue
    }

    pub fn foreground(&self) -> Option<Color> {
        self.foreground
    }

    pub fn background(&self) -> Option<Color> {
        self.background
    }

    pub fn point_size(&self) -> f32 {
        self.font.point_size()
    }

    /// Inter-word space in the current style
    pub fn space(&self) -> f32 {
        self.font.space(self.style)
    }

    pub fn set_last_font_id(&mut self, font_id: Option<FontId>) {
        self.last_font_id = font_id;
    }

    /// Last font used, falling back to the mu font after whitespace only
    pub fn last_font_id(&self) -> FontId {
        self.last_font_id.unwrap_or_else(|| self.font.mu_font_id())
    }
}

impl fmt::Debug for TexEnvironment<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TexEnvironment")
            .field("style", &self.style)
            .field("foreground", &self.foreground)
            .field("background", &self.background)
            .field("last_font_id", &self.last_font_id)
            .finish_non_exhaustive()
    }
}
