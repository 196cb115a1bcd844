//! Texbox - TeX box-and-glue layout for math formulas
//!
//! This crate turns a formula tree into measured boxes the way TeX does:
//! - An atom AST (characters, symbols, scripts, fractions, roots, fences)
//! - Eight TeX styles with cramped variants and script size factors
//! - A font metrics facade with an in-memory, serde-configured implementation
//! - Inter-atom glue, kerning and ligatures when composing rows
//! - Extensible delimiters and radicals
//! - Drawing of the finished boxes through a small canvas contract

pub mod boxes;
pub mod config;
pub mod delimiter;
pub mod environment;
pub mod error;
pub mod font;
pub mod glue;
pub mod layout;
pub mod model;
pub mod radical;
pub mod render;
mod scripts;
pub mod style;

#[cfg(test)]
mod test_support;

pub use boxes::{BoxKind, LayoutBox};
pub use config::{FontConfig, GlueConfig};
pub use delimiter::create_delimiter;
pub use environment::TexEnvironment;
pub use error::*;
pub use font::{Char, DefaultTexFont, Extension, Metrics, Param, SymbolInfo, TexFont, PREC};
pub use glue::{Glue, GlueTable};
pub use layout::demote_binary_operators;
pub use model::*;
pub use render::{
    Canvas, Color, Point, Recorder, Rect, RenderConfig, RenderOutput, RenderPrimitive, Renderer,
};
pub use style::Style;

use serde::{Deserialize, Serialize};

/// A complete formula ready for layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TexFormula {
    root: Atom,
}

impl TexFormula {
    pub fn new(root: Atom) -> Self {
        Self { root }
    }

    /// A formula made of a row of atoms; at least one is required
    pub fn from_atoms(atoms: Vec<Atom>) -> MathResult<Self> {
        Atom::non_empty_row(atoms).map(Self::new)
    }

    pub fn root(&self) -> &Atom {
        &self.root
    }

    /// Lay the formula out; this never fails once the formula is built
    pub fn create_box(&self, env: &TexEnvironment) -> LayoutBox {
        self.root.create_box(env)
    }

    /// Size of the laid out formula
    pub fn metrics(&self, env: &TexEnvironment) -> BoxMetrics {
        BoxMetrics::from(&self.create_box(env))
    }
}

impl From<Atom> for TexFormula {
    fn from(root: Atom) -> Self {
        Self::new(root)
    }
}

/// Outer dimensions of a box
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoxMetrics {
    pub width: f32,
    pub height: f32,
    pub depth: f32,
}

impl From<&LayoutBox> for BoxMetrics {
    fn from(b: &LayoutBox) -> Self {
        Self {
            width: b.width(),
            height: b.height(),
            depth: b.depth(),
        }
    }
}
