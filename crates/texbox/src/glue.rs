//! Glue - spacing between adjacent atoms
//!
//! The glue table maps (left class, right class, spacing bucket) to one of a
//! few named glue types. Spaces are measured in math units, 1/18 of the quad
//! of the mu font.

use crate::boxes::LayoutBox;
use crate::config::{config_error, GlueConfig};
use crate::environment::TexEnvironment;
use crate::error::MathResult;
use crate::model::AtomType;
use crate::style::Style;
use std::collections::HashMap;

/// One glue type: natural space, stretch and shrink in math units
#[derive(Debug, Clone, PartialEq)]
pub struct Glue {
    pub space: f32,
    pub stretch: f32,
    pub shrink: f32,
    pub name: String,
}

/// Number of atom classes with their own glue row and column
const CLASSES: usize = 8;
/// Number of spacing buckets (style / 2)
const BUCKETS: usize = 4;
/// Glue type used for pairs without a rule
pub const DEFAULT_GLUE: &str = "default";

/// Resolved glue table, built once and shared read-only
#[derive(Debug, Clone)]
pub struct GlueTable {
    types: Vec<Glue>,
    table: [[[usize; BUCKETS]; CLASSES]; CLASSES],
}

impl GlueTable {
    /// Build a table from configuration; a missing `default` type, unknown
    /// glue names and classes outside the table are configuration errors
    pub fn new(config: &GlueConfig) -> MathResult<Self> {
        if config.types.is_empty() {
            return Err(config_error("glue table defines no glue types".to_string()));
        }

        let mut index = HashMap::new();
        for (i, glue) in config.types.iter().enumerate() {
            if index.insert(glue.name.as_str(), i).is_some() {
                return Err(config_error(format!("duplicate glue type '{}'", glue.name)));
            }
        }
        let fallback = *index.get(DEFAULT_GLUE).ok_or_else(|| {
            config_error(format!("glue table has no '{}' glue type", DEFAULT_GLUE))
        })?;

        let mut table = [[[fallback; BUCKETS]; CLASSES]; CLASSES];
        for rule in &config.rules {
            for class in [rule.left, rule.right] {
                if class == AtomType::Accent {
                    return Err(config_error(format!(
                        "glue rule uses class {:?}, which has no glue entry",
                        class
                    )));
                }
            }
            let entry = &mut table[rule.left.glue_index()][rule.right.glue_index()];
            for (bucket, name) in rule.glue.iter().enumerate() {
                entry[bucket] = *index
                    .get(name.as_str())
                    .ok_or_else(|| config_error(format!("unknown glue type '{}'", name)))?;
            }
        }

        let types = config
            .types
            .iter()
            .map(|t| Glue {
                space: t.space,
                stretch: t.stretch,
                shrink: t.shrink,
                name: t.name.clone(),
            })
            .collect();

        tracing::debug!(
            types = config.types.len(),
            rules = config.rules.len(),
            "glue table initialized"
        );

        Ok(Self { types, table })
    }

    /// The standard TeX glue table
    pub fn tex_default() -> Self {
        let config = GlueConfig::tex_default();
        // The built-in rules only name the built-in glue types.
        match Self::new(&config) {
            Ok(table) => table,
            Err(err) => unreachable!("built-in glue table is invalid: {}", err),
        }
    }

    /// Glue type between two classes in a style
    pub fn lookup(&self, left: AtomType, right: AtomType, style: Style) -> &Glue {
        let i = self.table[left.glue_index()][right.glue_index()][style.half()];
        &self.types[i]
    }

    /// Spacing box between two classes in the environment's style
    pub fn glue(&self, left: AtomType, right: AtomType, env: &TexEnvironment) -> LayoutBox {
        let glue = self.lookup(left, right, env.style());
        let font = env.font();
        let quad = font.quad(env.style(), font.mu_font_id());
        LayoutBox::glue(glue.space / 18.0 * quad)
    }
}

impl Default for GlueTable {
    fn default() -> Self {
        Self::tex_default()
    }
}
