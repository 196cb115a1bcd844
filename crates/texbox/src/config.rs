//! Font, symbol and glue configuration
//!
//! These are plain serde documents. Reading them from disk is up to the
//! caller; this module only decodes and validates them so that a bad table
//! fails once, at construction, instead of during layout.

use crate::error::{MathError, MathResult};
use crate::model::{AtomType, CharFont, FontId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

// =============================================================================
// Font Configuration
// =============================================================================

/// Settings shared by all fonts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneralSettings {
    /// Font whose quad defines the math unit
    pub mu_font_id: FontId,
    /// Font whose space defines the blank space
    pub space_font_id: FontId,
    /// Size factor for script styles
    pub script_factor: f32,
    /// Size factor for script-script styles
    pub script_script_factor: f32,
    /// Pixels per point applied to every metric
    #[serde(default = "default_pixels_per_point")]
    pub pixels_per_point: f32,
}

fn default_pixels_per_point() -> f32 {
    1.0
}

/// Metrics of one glyph, unscaled: width, height, depth, italic correction
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GlyphMetrics {
    pub ch: char,
    pub metrics: [f32; 4],
}

/// Kern between two glyphs of one font
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KernPair {
    pub left: char,
    pub right: char,
    pub kern: f32,
}

/// Ligature replacing two glyphs of one font
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LigaturePair {
    pub left: char,
    pub right: char,
    pub ligature: char,
}

/// Larger variant of a glyph, possibly in another font
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NextLarger {
    pub ch: char,
    pub larger: char,
    pub font_id: FontId,
}

/// Parts used to build an arbitrarily tall glyph
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExtensionParts {
    pub ch: char,
    #[serde(default)]
    pub top: Option<char>,
    #[serde(default)]
    pub middle: Option<char>,
    #[serde(default)]
    pub repeat: Option<char>,
    #[serde(default)]
    pub bottom: Option<char>,
}

/// Description of one font
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontDescription {
    pub id: FontId,
    pub name: String,
    pub x_height: f32,
    pub space: f32,
    pub quad: f32,
    /// Char whose kern against a glyph gives the accent skew
    #[serde(default)]
    pub skew_char: Option<char>,
    #[serde(default)]
    pub metrics: Vec<GlyphMetrics>,
    #[serde(default)]
    pub kerns: Vec<KernPair>,
    #[serde(default)]
    pub ligatures: Vec<LigaturePair>,
    #[serde(default)]
    pub next_larger: Vec<NextLarger>,
    #[serde(default)]
    pub extensions: Vec<ExtensionParts>,
}

/// Start glyphs of the character ranges of a text style
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextStyleMapping {
    /// Glyph of '0'
    #[serde(default)]
    pub numbers: Option<crate::model::CharFont>,
    /// Glyph of 'A'
    #[serde(default)]
    pub capitals: Option<crate::model::CharFont>,
    /// Glyph of 'a'
    #[serde(default)]
    pub small: Option<crate::model::CharFont>,
    /// Font for characters outside the three ranges
    #[serde(default)]
    pub unicode: Option<FontId>,
}

/// Text styles used for characters without an explicit style
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefaultTextStyles {
    pub numbers: String,
    pub capitals: String,
    pub small: String,
}

/// A named symbol
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolDefinition {
    pub ch: char,
    pub font_id: FontId,
    #[serde(rename = "type")]
    pub kind: AtomType,
    #[serde(default)]
    pub delimiter: bool,
}

/// Everything the default font implementation needs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontConfig {
    pub general: GeneralSettings,
    /// TeX font parameters by name, unscaled
    #[serde(default)]
    pub parameters: BTreeMap<String, f32>,
    pub fonts: Vec<FontDescription>,
    #[serde(default)]
    pub text_styles: BTreeMap<String, TextStyleMapping>,
    pub default_text_styles: DefaultTextStyles,
    #[serde(default)]
    pub symbols: BTreeMap<String, SymbolDefinition>,
}

impl FontConfig {
    /// Decode and validate a JSON font configuration
    pub fn from_json(json: &str) -> MathResult<Self> {
        let config: FontConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every id and name the configuration references exists
    pub fn validate(&self) -> MathResult<()> {
        let mut ids = HashSet::new();
        for font in &self.fonts {
            if !ids.insert(font.id) {
                return Err(config_error(format!("duplicate font id {}", font.id)));
            }
        }
        let known = |id: FontId, what: &str| -> MathResult<()> {
            if ids.contains(&id) {
                Ok(())
            } else {
                Err(config_error(format!("{} refers to unknown font id {}", what, id)))
            }
        };

        let general = &self.general;
        known(general.mu_font_id, "mu_font_id")?;
        known(general.space_font_id, "space_font_id")?;
        if !(general.pixels_per_point > 0.0) {
            return Err(config_error("pixels_per_point must be positive".to_string()));
        }
        if !(general.script_factor > 0.0 && general.script_factor <= 1.0) {
            return Err(config_error("script_factor must be in (0, 1]".to_string()));
        }
        if !(general.script_script_factor > 0.0
            && general.script_script_factor <= general.script_factor)
        {
            return Err(config_error(
                "script_script_factor must be in (0, script_factor]".to_string(),
            ));
        }

        for font in &self.fonts {
            for larger in &font.next_larger {
                known(larger.font_id, &format!("next larger of '{}'", larger.ch))?;
            }
        }
        self.check_next_larger_chains()?;

        for (name, mapping) in &self.text_styles {
            let ranges = [mapping.numbers, mapping.capitals, mapping.small];
            for cf in ranges.iter().flatten() {
                known(cf.font_id, &format!("text style '{}'", name))?;
            }
            if let Some(id) = mapping.unicode {
                known(id, &format!("text style '{}'", name))?;
            }
        }

        let defaults = &self.default_text_styles;
        for name in [&defaults.numbers, &defaults.capitals, &defaults.small] {
            if !self.text_styles.contains_key(name) {
                return Err(config_error(format!(
                    "default text style '{}' is not defined",
                    name
                )));
            }
        }

        for (name, symbol) in &self.symbols {
            known(symbol.font_id, &format!("symbol '{}'", name))?;
        }

        Ok(())
    }

    /// Every chain of larger variants must end; a glyph may not reappear in
    /// its own chain, across fonts included
    fn check_next_larger_chains(&self) -> MathResult<()> {
        let links: HashMap<CharFont, CharFont> = self
            .fonts
            .iter()
            .flat_map(|font| {
                font.next_larger.iter().map(move |larger| {
                    (
                        CharFont::new(larger.ch, font.id),
                        CharFont::new(larger.larger, larger.font_id),
                    )
                })
            })
            .collect();

        for &start in links.keys() {
            let mut seen = HashSet::from([start]);
            let mut current = start;
            while let Some(&next) = links.get(&current) {
                if !seen.insert(next) {
                    return Err(config_error(format!(
                        "next larger chain of '{}' in font {} loops at '{}' in font {}",
                        start.c, start.font_id, next.c, next.font_id
                    )));
                }
                current = next;
            }
        }
        Ok(())
    }
}

// =============================================================================
// Glue Configuration
// =============================================================================

/// A named glue type in math units
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlueType {
    pub name: String,
    pub space: f32,
    #[serde(default)]
    pub stretch: f32,
    #[serde(default)]
    pub shrink: f32,
}

/// Glue between two atom classes, per spacing bucket
/// (display, text, script, script-script)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlueRule {
    pub left: AtomType,
    pub right: AtomType,
    pub glue: [String; 4],
}

/// Glue types plus the rules selecting them; pairs without a rule use the
/// type named `default`, which must exist
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlueConfig {
    pub types: Vec<GlueType>,
    pub rules: Vec<GlueRule>,
}

/// TeX's spacing table: 0 none, 1 thin, 2 medium, 3 thick; values above 3
/// mean the same glue restricted to display and text styles.
const TEX_SPACING: [[u8; 8]; 8] = [
    // ord op bin rel open close punct inner
    [0, 1, 6, 7, 0, 0, 0, 5], // ord
    [1, 1, 0, 7, 0, 0, 0, 5], // op
    [6, 6, 0, 0, 6, 0, 0, 6], // bin
    [7, 7, 0, 0, 7, 0, 0, 7], // rel
    [0, 0, 0, 0, 0, 0, 0, 0], // open
    [0, 1, 6, 7, 0, 0, 0, 5], // close
    [5, 5, 0, 5, 5, 5, 5, 5], // punct
    [5, 1, 6, 7, 5, 0, 5, 5], // inner
];

impl GlueConfig {
    /// The standard TeX thin/medium/thick glue table
    pub fn tex_default() -> Self {
        let names = [crate::glue::DEFAULT_GLUE, "thin", "med", "thick"];
        let types = vec![
            GlueType {
                name: names[0].to_string(),
                space: 0.0,
                stretch: 0.0,
                shrink: 0.0,
            },
            GlueType {
                name: names[1].to_string(),
                space: 3.0,
                stretch: 0.0,
                shrink: 0.0,
            },
            GlueType {
                name: names[2].to_string(),
                space: 4.0,
                stretch: 2.0,
                shrink: 4.0,
            },
            GlueType {
                name: names[3].to_string(),
                space: 5.0,
                stretch: 5.0,
                shrink: 0.0,
            },
        ];

        let mut rules = Vec::new();
        for (l, row) in TEX_SPACING.iter().enumerate() {
            for (r, &code) in row.iter().enumerate() {
                if code == 0 {
                    continue;
                }
                let glue = if code > 3 {
                    let name = names[(code - 4) as usize];
                    [name, name, names[0], names[0]]
                } else {
                    let name = names[code as usize];
                    [name; 4]
                };
                rules.push(GlueRule {
                    left: AtomType::GLUE_CLASSES[l],
                    right: AtomType::GLUE_CLASSES[r],
                    glue: glue.map(str::to_string),
                });
            }
        }

        Self { types, rules }
    }

    /// Decode a JSON glue configuration
    pub fn from_json(json: &str) -> MathResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

pub(crate) fn config_error(message: String) -> MathError {
    MathError::Config(message)
}

// =============================================================================
// Tests
// =============================================================================
