//! Small font set shared by the unit tests
//!
//! Four fonts: a roman font for digits and upright text, an italic font for
//! letters, a symbol font that also serves as the mu font, and an extension
//! font with larger and extensible variants.

use crate::config::{
    DefaultTextStyles, ExtensionParts, FontConfig, FontDescription, GeneralSettings,
    GlyphMetrics, KernPair, LigaturePair, NextLarger, SymbolDefinition, TextStyleMapping,
};
use crate::font::DefaultTexFont;
use crate::model::{AtomType, CharFont, FontId};
use std::collections::BTreeMap;

pub const ROMAN: FontId = 0;
pub const ITALIC: FontId = 1;
pub const SYMBOLS: FontId = 2;
pub const EXTENSION: FontId = 3;

fn glyph(ch: char, width: f32, height: f32, depth: f32, italic: f32) -> GlyphMetrics {
    GlyphMetrics {
        ch,
        metrics: [width, height, depth, italic],
    }
}

fn larger(ch: char, larger: char, font_id: FontId) -> NextLarger {
    NextLarger { ch, larger, font_id }
}

fn font(id: FontId, name: &str, x_height: f32, space: f32) -> FontDescription {
    FontDescription {
        id,
        name: name.to_string(),
        x_height,
        space,
        quad: 1.0,
        skew_char: None,
        metrics: Vec::new(),
        kerns: Vec::new(),
        ligatures: Vec::new(),
        next_larger: Vec::new(),
        extensions: Vec::new(),
    }
}

fn roman() -> FontDescription {
    let mut f = font(ROMAN, "roman", 0.44, 0.333);
    f.metrics.extend(('0'..='9').map(|c| glyph(c, 0.5, 0.65, 0.0, 0.0)));
    f.metrics.extend(
        ('a'..='z')
            .filter(|&c| c != 'f')
            .map(|c| glyph(c, 0.5, 0.43, 0.0, 0.0)),
    );
    f.metrics.extend(('A'..='Z').map(|c| glyph(c, 0.7, 0.68, 0.0, 0.0)));
    f.metrics.push(glyph('f', 0.3, 0.7, 0.0, 0.08));
    f.metrics.push(glyph('\u{FB00}', 0.6, 0.7, 0.0, 0.08));
    f.metrics.push(glyph('=', 0.78, 0.37, 0.0, 0.0));
    f.metrics.push(glyph('[', 0.28, 0.75, 0.25, 0.0));
    f.metrics.push(glyph(']', 0.28, 0.75, 0.25, 0.0));
    f.metrics.push(glyph('^', 0.25, 0.7, 0.0, 0.0));
    f.metrics.push(glyph(',', 0.28, 0.1, 0.2, 0.0));
    f.ligatures.push(LigaturePair {
        left: 'f',
        right: 'f',
        ligature: '\u{FB00}',
    });
    f.next_larger.push(larger('[', 'h', EXTENSION));
    f.next_larger.push(larger(']', 'j', EXTENSION));
    f.next_larger.push(larger('^', 'w', EXTENSION));
    f
}

fn italic() -> FontDescription {
    let mut f = font(ITALIC, "italic", 0.43, 0.0);
    f.skew_char = Some('\u{7F}');
    f.metrics.extend(
        ('a'..='z')
            .filter(|&c| c != 'f')
            .map(|c| glyph(c, 0.5, 0.43, 0.0, 0.0)),
    );
    f.metrics.push(glyph('f', 0.5, 0.7, 0.2, 0.1));
    f.metrics.extend(('A'..='Z').map(|c| glyph(c, 0.75, 0.68, 0.0, 0.05)));
    f.kerns.push(KernPair {
        left: 'A',
        right: 'V',
        kern: -0.1,
    });
    f.kerns.extend(('a'..='z').map(|c| KernPair {
        left: c,
        right: '\u{7F}',
        kern: 0.05,
    }));
    f
}

fn symbols() -> FontDescription {
    let mut f = font(SYMBOLS, "symbols", 0.43, 0.0);
    f.metrics.push(glyph('+', 0.78, 0.58, 0.08, 0.0));
    f.metrics.push(glyph('\u{2212}', 0.78, 0.58, 0.08, 0.0));
    f.metrics.push(glyph('\u{221A}', 0.83, 0.04, 0.96, 0.0));
    f.metrics.push(glyph('\u{2211}', 1.05, 0.75, 0.25, 0.0));
    f.metrics.push(glyph('{', 0.5, 0.75, 0.25, 0.0));
    f.metrics.push(glyph('\u{23A7}', 0.9, 0.5, 0.0, 0.0));
    f.metrics.push(glyph('\u{23A8}', 0.9, 0.5, 0.0, 0.0));
    f.metrics.push(glyph('\u{23A9}', 0.9, 0.5, 0.0, 0.0));
    f.metrics.push(glyph('\u{23AA}', 0.9, 0.5, 0.0, 0.0));
    f.next_larger.push(larger('\u{221A}', 'p', EXTENSION));
    f.next_larger.push(larger('\u{2211}', 'P', EXTENSION));
    f.extensions.push(ExtensionParts {
        ch: '{',
        top: Some('\u{23A7}'),
        middle: Some('\u{23A8}'),
        repeat: Some('\u{23AA}'),
        bottom: Some('\u{23A9}'),
    });
    f
}

fn extension() -> FontDescription {
    let mut f = font(EXTENSION, "extension", 0.0, 0.0);
    // radical variants and pieces
    f.metrics.push(glyph('p', 1.0, 0.04, 1.16, 0.0));
    f.metrics.push(glyph('q', 1.0, 0.04, 1.76, 0.0));
    f.metrics.push(glyph('t', 1.05, 0.6, 0.0, 0.0));
    f.metrics.push(glyph('u', 0.6, 0.6, 0.0, 0.0));
    f.metrics.push(glyph('v', 1.0, 0.6, 0.0, 0.0));
    // bracket variants and pieces
    f.metrics.push(glyph('h', 0.4, 0.85, 0.35, 0.0));
    f.metrics.push(glyph('i', 0.47, 1.3, 0.5, 0.0));
    f.metrics.push(glyph('j', 0.4, 0.85, 0.35, 0.0));
    f.metrics.push(glyph('\u{23A1}', 0.67, 0.6, 0.0, 0.0));
    f.metrics.push(glyph('\u{23A2}', 0.67, 0.6, 0.0, 0.0));
    f.metrics.push(glyph('\u{23A3}', 0.67, 0.6, 0.0, 0.0));
    // summation
    f.metrics.push(glyph('P', 1.44, 1.0, 0.5, 0.0));
    // wide accent
    f.metrics.push(glyph('w', 0.56, 0.75, 0.0, 0.0));

    f.next_larger.push(larger('p', 'q', EXTENSION));
    f.next_larger.push(larger('h', 'i', EXTENSION));
    f.extensions.push(ExtensionParts {
        ch: 'q',
        top: Some('t'),
        middle: None,
        repeat: Some('u'),
        bottom: Some('v'),
    });
    f.extensions.push(ExtensionParts {
        ch: 'i',
        top: Some('\u{23A1}'),
        middle: None,
        repeat: Some('\u{23A2}'),
        bottom: Some('\u{23A3}'),
    });
    f
}

fn symbol(ch: char, font_id: FontId, kind: AtomType, delimiter: bool) -> SymbolDefinition {
    SymbolDefinition {
        ch,
        font_id,
        kind,
        delimiter,
    }
}

pub fn test_config() -> FontConfig {
    let parameters: BTreeMap<String, f32> = [
        ("num1", 0.676508),
        ("num2", 0.393732),
        ("num3", 0.443731),
        ("denom1", 0.685951),
        ("denom2", 0.344841),
        ("sup1", 0.412892),
        ("sup2", 0.362892),
        ("sup3", 0.288889),
        ("sub1", 0.15),
        ("sub2", 0.247217),
        ("supdrop", 0.386108),
        ("subdrop", 0.05),
        ("axisheight", 0.25),
        ("defaultrulethickness", 0.04),
        ("bigopspacing1", 0.111112),
        ("bigopspacing2", 0.166667),
        ("bigopspacing3", 0.2),
        ("bigopspacing4", 0.6),
        ("bigopspacing5", 0.1),
    ]
    .into_iter()
    .map(|(name, value)| (name.to_string(), value))
    .collect();

    let mut text_styles = BTreeMap::new();
    text_styles.insert(
        "mathnormal".to_string(),
        TextStyleMapping {
            numbers: Some(CharFont::new('0', ROMAN)),
            capitals: Some(CharFont::new('A', ITALIC)),
            small: Some(CharFont::new('a', ITALIC)),
            unicode: None,
        },
    );
    text_styles.insert(
        "mathrm".to_string(),
        TextStyleMapping {
            numbers: Some(CharFont::new('0', ROMAN)),
            capitals: Some(CharFont::new('A', ROMAN)),
            small: Some(CharFont::new('a', ROMAN)),
            unicode: Some(ROMAN),
        },
    );

    let mut symbols = BTreeMap::new();
    let mut define = |name: &str, def: SymbolDefinition| {
        symbols.insert(name.to_string(), def);
    };
    define("plus", symbol('+', SYMBOLS, AtomType::BinaryOperator, false));
    define("minus", symbol('\u{2212}', SYMBOLS, AtomType::BinaryOperator, false));
    define("equals", symbol('=', ROMAN, AtomType::Relation, false));
    define("comma", symbol(',', ROMAN, AtomType::Punctuation, false));
    define("lbrack", symbol('[', ROMAN, AtomType::Opening, true));
    define("rbrack", symbol(']', ROMAN, AtomType::Closing, true));
    define("lbrace", symbol('{', SYMBOLS, AtomType::Opening, true));
    define("sqrt", symbol('\u{221A}', SYMBOLS, AtomType::Ordinary, true));
    define("sum", symbol('\u{2211}', SYMBOLS, AtomType::BigOperator, false));
    define("widehat", symbol('^', ROMAN, AtomType::Accent, false));

    FontConfig {
        general: GeneralSettings {
            mu_font_id: SYMBOLS,
            space_font_id: ROMAN,
            script_factor: 0.7,
            script_script_factor: 0.5,
            pixels_per_point: 1.0,
        },
        parameters,
        fonts: vec![roman(), italic(), self::symbols(), extension()],
        text_styles,
        default_text_styles: DefaultTextStyles {
            numbers: "mathrm".to_string(),
            capitals: "mathnormal".to_string(),
            small: "mathnormal".to_string(),
        },
        symbols,
    }
}

pub fn test_font() -> DefaultTexFont {
    match DefaultTexFont::new(test_config(), 10.0) {
        Ok(font) => font,
        Err(err) => panic!("test font is invalid: {}", err),
    }
}
