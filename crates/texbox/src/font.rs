//! Font metrics facade
//!
//! Layout talks to fonts only through [`TexFont`]. Every dimension it hands
//! out is already scaled by the style's size factor and the pixels-per-point
//! factor. [`DefaultTexFont`] is the in-memory implementation built from a
//! validated [`FontConfig`].

use crate::config::{FontConfig, FontDescription};
use crate::error::MathResult;
use crate::model::{AtomType, CharFont, FontId};
use crate::style::Style;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Differences below this are treated as zero
pub const PREC: f32 = 0.000_000_1;

// =============================================================================
// Glyph Types
// =============================================================================

/// Scaled metrics of one glyph
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Metrics {
    pub width: f32,
    pub height: f32,
    pub depth: f32,
    pub italic: f32,
    /// Size factor the glyph is drawn at
    pub size: f32,
}

impl Metrics {
    /// Scale raw [width, height, depth, italic] values by `factor`
    pub fn new(raw: [f32; 4], size: f32, factor: f32) -> Self {
        Self {
            width: raw[0] * factor,
            height: raw[1] * factor,
            depth: raw[2] * factor,
            italic: raw[3] * factor,
            size,
        }
    }
}

/// A glyph with its font and scaled metrics
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Char {
    pub c: char,
    pub font_id: FontId,
    pub metrics: Metrics,
}

impl Char {
    pub fn char_font(&self) -> CharFont {
        CharFont::new(self.c, self.font_id)
    }

    pub fn width(&self) -> f32 {
        self.metrics.width
    }

    pub fn height(&self) -> f32 {
        self.metrics.height
    }

    pub fn depth(&self) -> f32 {
        self.metrics.depth
    }

    pub fn italic(&self) -> f32 {
        self.metrics.italic
    }

    pub fn size(&self) -> f32 {
        self.metrics.size
    }
}

/// Parts of an extensible glyph; any part may be missing
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Extension {
    pub top: Option<Char>,
    pub middle: Option<Char>,
    pub repeat: Option<Char>,
    pub bottom: Option<Char>,
}

/// What the font knows about a named symbol
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SymbolInfo {
    pub char_font: CharFont,
    pub kind: AtomType,
    pub delimiter: bool,
}

/// The named TeX font parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Param {
    Num1,
    Num2,
    Num3,
    Denom1,
    Denom2,
    Sup1,
    Sup2,
    Sup3,
    Sub1,
    Sub2,
    SupDrop,
    SubDrop,
    AxisHeight,
    DefaultRuleThickness,
    BigOpSpacing1,
    BigOpSpacing2,
    BigOpSpacing3,
    BigOpSpacing4,
    BigOpSpacing5,
}

impl Param {
    pub const ALL: [Param; 19] = [
        Param::Num1,
        Param::Num2,
        Param::Num3,
        Param::Denom1,
        Param::Denom2,
        Param::Sup1,
        Param::Sup2,
        Param::Sup3,
        Param::Sub1,
        Param::Sub2,
        Param::SupDrop,
        Param::SubDrop,
        Param::AxisHeight,
        Param::DefaultRuleThickness,
        Param::BigOpSpacing1,
        Param::BigOpSpacing2,
        Param::BigOpSpacing3,
        Param::BigOpSpacing4,
        Param::BigOpSpacing5,
    ];

    /// Name of the parameter in font configuration
    pub fn name(self) -> &'static str {
        match self {
            Param::Num1 => "num1",
            Param::Num2 => "num2",
            Param::Num3 => "num3",
            Param::Denom1 => "denom1",
            Param::Denom2 => "denom2",
            Param::Sup1 => "sup1",
            Param::Sup2 => "sup2",
            Param::Sup3 => "sup3",
            Param::Sub1 => "sub1",
            Param::Sub2 => "sub2",
            Param::SupDrop => "supdrop",
            Param::SubDrop => "subdrop",
            Param::AxisHeight => "axisheight",
            Param::DefaultRuleThickness => "defaultrulethickness",
            Param::BigOpSpacing1 => "bigopspacing1",
            Param::BigOpSpacing2 => "bigopspacing2",
            Param::BigOpSpacing3 => "bigopspacing3",
            Param::BigOpSpacing4 => "bigopspacing4",
            Param::BigOpSpacing5 => "bigopspacing5",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }
}

// =============================================================================
// Metrics Facade
// =============================================================================

/// Read-only font queries used by layout
///
/// Missing entries are lenient: unknown glyphs have zero metrics, missing
/// kerns are zero and missing ligatures are `None`.
pub trait TexFont {
    /// Point size the formula is set in
    fn point_size(&self) -> f32;

    /// Pixels per point applied to every metric
    fn pixels_per_point(&self) -> f32;

    /// Font used for math-unit quads
    fn mu_font_id(&self) -> FontId;

    /// Size factor of a style: 1, script factor or script-script factor
    fn size_factor(&self, style: Style) -> f32;

    /// Glyph with metrics at the given style
    fn char(&self, cf: CharFont, style: Style) -> Char;

    /// Glyph of a character in a text style, or its default style
    fn resolve_char(&self, c: char, text_style: Option<&str>) -> CharFont;

    /// Whether a text style of this name exists
    fn has_text_style(&self, name: &str) -> bool;

    /// Symbol table entry
    fn symbol(&self, name: &str) -> Option<SymbolInfo>;

    /// Kern between two glyphs of the same font
    fn kern(&self, left: CharFont, right: CharFont, style: Style) -> f32;

    /// Ligature replacing two glyphs of the same font
    fn ligature(&self, left: CharFont, right: CharFont) -> Option<CharFont>;

    /// Extension parts of an extensible glyph
    fn extension(&self, c: &Char, style: Style) -> Option<Extension>;

    /// Next larger variant of a glyph
    fn next_larger(&self, c: &Char, style: Style) -> Option<Char>;

    /// Skew of a glyph, used to place accents
    fn skew(&self, cf: CharFont, style: Style) -> f32;

    /// Whether a font has a non-zero inter-word space
    fn has_space(&self, font_id: FontId) -> bool;

    /// Inter-word space of the space font
    fn space(&self, style: Style) -> f32;

    /// Quad width of a font
    fn quad(&self, style: Style, font_id: FontId) -> f32;

    /// x-height of a font
    fn x_height(&self, style: Style, font_id: FontId) -> f32;

    /// A named TeX parameter, scaled for the style
    fn param(&self, param: Param, style: Style) -> f32;

    /// Glyph of a named symbol at the given style
    fn symbol_char(&self, name: &str, style: Style) -> Option<Char> {
        self.symbol(name).map(|info| self.char(info.char_font, style))
    }

    /// The chain of ever larger variants after `c`, ending at the first glyph
    /// without a larger variant or at the first repeated glyph
    fn larger_variants(&self, c: &Char, style: Style) -> Vec<Char> {
        let mut seen = vec![c.char_font()];
        let mut chain: Vec<Char> = Vec::new();
        let mut current = *c;
        while let Some(larger) = self.next_larger(&current, style) {
            if seen.contains(&larger.char_font()) {
                tracing::warn!(c = %larger.c, font = larger.font_id, "next larger chain loops");
                break;
            }
            seen.push(larger.char_font());
            chain.push(larger);
            current = larger;
        }
        chain
    }

    /// Glyph of a character in a text style, with metrics
    fn styled_char(&self, c: char, text_style: Option<&str>, style: Style) -> Char {
        self.char(self.resolve_char(c, text_style), style)
    }

    fn axis_height(&self, style: Style) -> f32 {
        self.param(Param::AxisHeight, style)
    }

    fn default_rule_thickness(&self, style: Style) -> f32 {
        self.param(Param::DefaultRuleThickness, style)
    }
}

// =============================================================================
// Default Implementation
// =============================================================================

#[derive(Debug, Clone)]
struct FontInfo {
    x_height: f32,
    space: f32,
    quad: f32,
    skew_char: Option<char>,
    metrics: HashMap<char, [f32; 4]>,
    kerns: HashMap<(char, char), f32>,
    ligatures: HashMap<(char, char), char>,
    next_larger: HashMap<char, CharFont>,
    extensions: HashMap<char, [Option<char>; 4]>,
}

impl From<&FontDescription> for FontInfo {
    fn from(desc: &FontDescription) -> Self {
        Self {
            x_height: desc.x_height,
            space: desc.space,
            quad: desc.quad,
            skew_char: desc.skew_char,
            metrics: desc.metrics.iter().map(|g| (g.ch, g.metrics)).collect(),
            kerns: desc
                .kerns
                .iter()
                .map(|k| ((k.left, k.right), k.kern))
                .collect(),
            ligatures: desc
                .ligatures
                .iter()
                .map(|l| ((l.left, l.right), l.ligature))
                .collect(),
            next_larger: desc
                .next_larger
                .iter()
                .map(|n| (n.ch, CharFont::new(n.larger, n.font_id)))
                .collect(),
            extensions: desc
                .extensions
                .iter()
                .map(|e| (e.ch, [e.top, e.middle, e.repeat, e.bottom]))
                .collect(),
        }
    }
}

/// Character range of an alphanumeric character
enum CharRange {
    Numbers(u32),
    Capitals(u32),
    Small(u32),
    Other,
}

impl CharRange {
    fn of(c: char) -> Self {
        match c {
            '0'..='9' => CharRange::Numbers(c as u32 - '0' as u32),
            'A'..='Z' => CharRange::Capitals(c as u32 - 'A' as u32),
            'a'..='z' => CharRange::Small(c as u32 - 'a' as u32),
            _ => CharRange::Other,
        }
    }
}

/// In-memory font set built from a [`FontConfig`]
#[derive(Debug, Clone)]
pub struct DefaultTexFont {
    config: FontConfig,
    fonts: HashMap<FontId, FontInfo>,
    parameters: HashMap<Param, f32>,
    point_size: f32,
}

impl DefaultTexFont {
    /// Build the font set; fails if the configuration is inconsistent
    pub fn new(config: FontConfig, point_size: f32) -> MathResult<Self> {
        config.validate()?;
        if !(point_size > 0.0) {
            return Err(crate::config::config_error(format!(
                "point size must be positive, got {}",
                point_size
            )));
        }

        let fonts = config
            .fonts
            .iter()
            .map(|desc| (desc.id, FontInfo::from(desc)))
            .collect();

        let mut parameters = HashMap::new();
        for (name, &value) in &config.parameters {
            match Param::from_name(name) {
                Some(param) => {
                    parameters.insert(param, value);
                }
                None => tracing::warn!(parameter = %name, "ignoring unknown font parameter"),
            }
        }

        tracing::debug!(
            fonts = config.fonts.len(),
            symbols = config.symbols.len(),
            text_styles = config.text_styles.len(),
            point_size,
            "font set initialized"
        );

        Ok(Self {
            config,
            fonts,
            parameters,
            point_size,
        })
    }

    /// Build from a JSON configuration document
    pub fn from_json(json: &str, point_size: f32) -> MathResult<Self> {
        Self::new(FontConfig::from_json(json)?, point_size)
    }

    fn info(&self, font_id: FontId) -> Option<&FontInfo> {
        self.fonts.get(&font_id)
    }

    fn scaled_size_factor(&self, style: Style) -> f32 {
        self.size_factor(style) * self.config.general.pixels_per_point
    }

    fn metrics(&self, cf: CharFont, size: f32) -> Metrics {
        let raw = self
            .info(cf.font_id)
            .and_then(|info| info.metrics.get(&cf.c).copied())
            .unwrap_or_default();
        Metrics::new(raw, size, size * self.config.general.pixels_per_point)
    }

    fn char_with_size(&self, cf: CharFont, size: f32) -> Char {
        Char {
            c: cf.c,
            font_id: cf.font_id,
            metrics: self.metrics(cf, size),
        }
    }

    fn default_style_for(&self, range: &CharRange) -> &str {
        let defaults = &self.config.default_text_styles;
        match range {
            CharRange::Numbers(_) => &defaults.numbers,
            CharRange::Small(_) => &defaults.small,
            CharRange::Capitals(_) | CharRange::Other => &defaults.capitals,
        }
    }

    fn map_char(&self, c: char, style_name: &str) -> Option<CharFont> {
        let mapping = self.config.text_styles.get(style_name)?;
        let range = CharRange::of(c);
        let (start, offset) = match range {
            CharRange::Numbers(offset) => (mapping.numbers?, offset),
            CharRange::Capitals(offset) => (mapping.capitals?, offset),
            CharRange::Small(offset) => (mapping.small?, offset),
            CharRange::Other => {
                let font_id = mapping.unicode.or(mapping.capitals.map(|cf| cf.font_id))?;
                return Some(CharFont::new(c, font_id));
            }
        };
        let code = char::from_u32(start.c as u32 + offset)?;
        Some(CharFont::new(code, start.font_id))
    }
}

impl TexFont for DefaultTexFont {
    fn point_size(&self) -> f32 {
        self.point_size
    }

    fn pixels_per_point(&self) -> f32 {
        self.config.general.pixels_per_point
    }

    fn mu_font_id(&self) -> FontId {
        self.config.general.mu_font_id
    }

    fn size_factor(&self, style: Style) -> f32 {
        if style < Style::SCRIPT {
            1.0
        } else if style < Style::SCRIPT_SCRIPT {
            self.config.general.script_factor
        } else {
            self.config.general.script_script_factor
        }
    }

    fn char(&self, cf: CharFont, style: Style) -> Char {
        self.char_with_size(cf, self.size_factor(style))
    }

    fn resolve_char(&self, c: char, text_style: Option<&str>) -> CharFont {
        let styled = text_style.and_then(|name| self.map_char(c, name));
        styled
            .or_else(|| self.map_char(c, self.default_style_for(&CharRange::of(c))))
            .unwrap_or_else(|| CharFont::new(c, self.config.general.mu_font_id))
    }

    fn has_text_style(&self, name: &str) -> bool {
        self.config.text_styles.contains_key(name)
    }

    fn symbol(&self, name: &str) -> Option<SymbolInfo> {
        self.config.symbols.get(name).map(|def| SymbolInfo {
            char_font: CharFont::new(def.ch, def.font_id),
            kind: def.kind,
            delimiter: def.delimiter,
        })
    }

    fn kern(&self, left: CharFont, right: CharFont, style: Style) -> f32 {
        if left.font_id != right.font_id {
            return 0.0;
        }
        self.info(left.font_id)
            .and_then(|info| info.kerns.get(&(left.c, right.c)))
            .map_or(0.0, |k| k * self.scaled_size_factor(style))
    }

    fn ligature(&self, left: CharFont, right: CharFont) -> Option<CharFont> {
        if left.font_id != right.font_id {
            return None;
        }
        let info = self.info(left.font_id)?;
        let lig = info.ligatures.get(&(left.c, right.c))?;
        Some(CharFont::new(*lig, left.font_id))
    }

    fn extension(&self, c: &Char, style: Style) -> Option<Extension> {
        let parts = self.info(c.font_id)?.extensions.get(&c.c)?;
        let size = self.size_factor(style);
        let part = |code: Option<char>| {
            code.map(|code| self.char_with_size(CharFont::new(code, c.font_id), size))
        };
        Some(Extension {
            top: part(parts[0]),
            middle: part(parts[1]),
            repeat: part(parts[2]),
            bottom: part(parts[3]),
        })
    }

    fn next_larger(&self, c: &Char, style: Style) -> Option<Char> {
        let larger = *self.info(c.font_id)?.next_larger.get(&c.c)?;
        Some(self.char(larger, style))
    }

    fn skew(&self, cf: CharFont, style: Style) -> f32 {
        match self.info(cf.font_id).and_then(|info| info.skew_char) {
            Some(skew) => self.kern(cf, CharFont::new(skew, cf.font_id), style),
            None => 0.0,
        }
    }

    fn has_space(&self, font_id: FontId) -> bool {
        self.info(font_id).is_some_and(|info| info.space > PREC)
    }

    fn space(&self, style: Style) -> f32 {
        self.info(self.config.general.space_font_id)
            .map_or(0.0, |info| info.space * self.scaled_size_factor(style))
    }

    fn quad(&self, style: Style, font_id: FontId) -> f32 {
        self.info(font_id)
            .map_or(0.0, |info| info.quad * self.scaled_size_factor(style))
    }

    fn x_height(&self, style: Style, font_id: FontId) -> f32 {
        self.info(font_id)
            .map_or(0.0, |info| info.x_height * self.scaled_size_factor(style))
    }

    fn param(&self, param: Param, style: Style) -> f32 {
        let value = self.parameters.get(&param).copied().unwrap_or(0.0);
        value * self.size_factor(style) * self.config.general.pixels_per_point
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{test_config, test_font, EXTENSION, ITALIC, ROMAN, SYMBOLS};

    #[test]
    fn test_default_char_ranges() {
        let font = test_font();
        assert_eq!(font.resolve_char('x', None), CharFont::new('x', ITALIC));
        assert_eq!(font.resolve_char('A', None), CharFont::new('A', ITALIC));
        assert_eq!(font.resolve_char('7', None), CharFont::new('7', ROMAN));
        assert_eq!(font.resolve_char('f', Some("mathrm")), CharFont::new('f', ROMAN));
    }

    #[test]
    fn test_metrics_scaled_by_style() {
        let font = test_font();
        let cf = CharFont::new('x', ITALIC);
        let display = font.char(cf, Style::DISPLAY);
        let script = font.char(cf, Style::SCRIPT);
        let scriptscript = font.char(cf, Style::SCRIPT_SCRIPT);

        assert!((script.width() - display.width() * 0.7).abs() < 1e-6);
        assert!((scriptscript.width() - display.width() * 0.5).abs() < 1e-6);
        assert_eq!(script.size(), 0.7);
    }

    #[test]
    fn test_unknown_glyph_has_zero_metrics() {
        let font = test_font();
        let c = font.char(CharFont::new('\u{2603}', ROMAN), Style::TEXT);
        assert_eq!(c.width(), 0.0);
        assert_eq!(c.height(), 0.0);
    }

    #[test]
    fn test_kern_and_ligature() {
        let font = test_font();
        let f = CharFont::new('f', ROMAN);
        assert_eq!(font.ligature(f, f), Some(CharFont::new('\u{FB00}', ROMAN)));
        assert_eq!(font.ligature(f, CharFont::new('f', ITALIC)), None);

        let a = CharFont::new('A', ITALIC);
        let v = CharFont::new('V', ITALIC);
        assert!(font.kern(a, v, Style::DISPLAY) < 0.0);
        assert_eq!(font.kern(a, CharFont::new('V', ROMAN), Style::DISPLAY), 0.0);
    }

    #[test]
    fn test_next_larger_and_extension() {
        let font = test_font();
        let sqrt = font.symbol_char("sqrt", Style::TEXT).unwrap();
        let larger = font.next_larger(&sqrt, Style::TEXT).unwrap();
        assert_eq!(larger.font_id, EXTENSION);
        assert!(larger.height() + larger.depth() > sqrt.height() + sqrt.depth());

        assert!(font.extension(&sqrt, Style::TEXT).is_none());
        let largest = font.next_larger(&larger, Style::TEXT).unwrap();
        let ext = font.extension(&largest, Style::TEXT).unwrap();
        assert!(ext.repeat.is_some());
        assert!(ext.bottom.is_some());

        let chain: Vec<char> = font
            .larger_variants(&sqrt, Style::TEXT)
            .iter()
            .map(|c| c.c)
            .collect();
        assert_eq!(chain, vec!['p', 'q']);
    }

    #[test]
    fn test_larger_variants_stop_at_a_loop() {
        // validation rejects loops, so bypass it
        let mut font = test_font();
        font.fonts
            .get_mut(&EXTENSION)
            .unwrap()
            .next_larger
            .insert('q', CharFont::new('p', EXTENSION));
        let sqrt = font.symbol_char("sqrt", Style::TEXT).unwrap();
        let chain: Vec<char> = font
            .larger_variants(&sqrt, Style::TEXT)
            .iter()
            .map(|c| c.c)
            .collect();
        assert_eq!(chain, vec!['p', 'q']);
    }

    #[test]
    fn test_parameters_scale() {
        let font = test_font();
        let text = font.param(Param::Sup1, Style::TEXT);
        let script = font.param(Param::Sup1, Style::SCRIPT);
        assert!(text > 0.0);
        assert!((script - text * 0.7).abs() < 1e-6);
        assert!(font.quad(Style::TEXT, SYMBOLS) > 0.0);
        assert!(!font.has_space(ITALIC));
        assert!(font.has_space(ROMAN));
    }

    #[test]
    fn test_unknown_parameter_is_ignored() {
        let mut config = test_config();
        config.parameters.insert("notaparam".to_string(), 1.0);
        assert!(DefaultTexFont::new(config, 10.0).is_ok());
    }

    #[test]
    fn test_invalid_point_size() {
        assert!(DefaultTexFont::new(test_config(), 0.0).is_err());
    }
}
