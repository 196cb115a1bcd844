//! Formula AST - atoms consumed by the layout engine
//!
//! An [`Atom`] tree is built once and then only read. Constructors that
//! resolve names (symbols, text styles, units) check them against the font
//! up front, so layout itself cannot fail.

use crate::error::{MathError, MathResult};
use crate::font::TexFont;
use crate::render::Color;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

// =============================================================================
// Atom Types
// =============================================================================

/// Identifier of one font in the font set
pub type FontId = usize;

/// Atom class used for glue and kerning decisions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AtomType {
    #[serde(rename = "ord")]
    Ordinary,
    #[serde(rename = "op")]
    BigOperator,
    #[serde(rename = "bin")]
    BinaryOperator,
    #[serde(rename = "rel")]
    Relation,
    #[serde(rename = "open")]
    Opening,
    #[serde(rename = "close")]
    Closing,
    #[serde(rename = "punct")]
    Punctuation,
    #[serde(rename = "inner")]
    Inner,
    #[serde(rename = "acc")]
    Accent,
}

impl AtomType {
    /// Classes that have a row in the glue table, in table order
    pub const GLUE_CLASSES: [AtomType; 8] = [
        AtomType::Ordinary,
        AtomType::BigOperator,
        AtomType::BinaryOperator,
        AtomType::Relation,
        AtomType::Opening,
        AtomType::Closing,
        AtomType::Punctuation,
        AtomType::Inner,
    ];

    /// Index into the glue table; classes beyond inner count as ordinary
    pub fn glue_index(self) -> usize {
        match self {
            AtomType::Ordinary | AtomType::Accent => 0,
            AtomType::BigOperator => 1,
            AtomType::BinaryOperator => 2,
            AtomType::Relation => 3,
            AtomType::Opening => 4,
            AtomType::Closing => 5,
            AtomType::Punctuation => 6,
            AtomType::Inner => 7,
        }
    }

    /// Whether a preceding binary operator must become ordinary
    pub(crate) fn forces_ordinary_after(self) -> bool {
        matches!(
            self,
            AtomType::BinaryOperator
                | AtomType::BigOperator
                | AtomType::Relation
                | AtomType::Opening
                | AtomType::Punctuation
        )
    }

    /// Whether a char of this class takes part in ligatures and kerns
    pub(crate) fn is_kernable(self) -> bool {
        !matches!(self, AtomType::Inner | AtomType::Accent)
    }
}

// =============================================================================
// Char Fonts and Units
// =============================================================================

/// A character code together with the font it belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CharFont {
    pub c: char,
    pub font_id: FontId,
}

impl CharFont {
    pub fn new(c: char, font_id: FontId) -> Self {
        Self { c, font_id }
    }
}

/// Units for explicit dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    Em,
    Ex,
    #[serde(rename = "px")]
    Pixel,
    #[serde(rename = "pt")]
    Point,
    #[serde(rename = "pc")]
    Pica,
    Mu,
}

impl FromStr for Unit {
    type Err = MathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "em" => Ok(Unit::Em),
            "ex" => Ok(Unit::Ex),
            "px" | "pixel" => Ok(Unit::Pixel),
            "pt" | "point" => Ok(Unit::Point),
            "pc" | "pica" => Ok(Unit::Pica),
            "mu" => Ok(Unit::Mu),
            other => Err(MathError::InvalidUnit(other.to_string())),
        }
    }
}

/// A dimension expressed in some unit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimension {
    pub value: f32,
    pub unit: Unit,
}

impl Dimension {
    pub fn new(value: f32, unit: Unit) -> Self {
        Self { value, unit }
    }

    pub fn zero() -> Self {
        Self::new(0.0, Unit::Point)
    }
}

/// Horizontal alignment of a box inside a wider box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Alignment {
    Left,
    #[default]
    Center,
    Right,
}

// =============================================================================
// Atom Payloads
// =============================================================================

/// A single alphanumeric character in an optional named text style
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharAtom {
    pub c: char,
    /// `None` selects the default text style for the character's range
    pub text_style: Option<String>,
    /// Text symbols never receive italic correction before a superscript
    pub text_symbol: bool,
}

/// A named symbol resolved against the font's symbol table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolAtom {
    pub name: String,
    pub kind: AtomType,
    pub delimiter: bool,
}

impl SymbolAtom {
    /// Look up a symbol by name
    pub fn get(name: &str, font: &dyn TexFont) -> MathResult<Self> {
        let info = font
            .symbol(name)
            .ok_or_else(|| MathError::SymbolNotFound(name.to_string()))?;
        Ok(Self {
            name: name.to_string(),
            kind: info.kind,
            delimiter: info.delimiter,
        })
    }

    /// Look up a symbol that must be usable as a delimiter
    pub fn delimiter(name: &str, font: &dyn TexFont) -> MathResult<Self> {
        let symbol = Self::get(name, font)?;
        if !symbol.delimiter {
            return Err(MathError::InvalidSymbolType {
                name: name.to_string(),
                expected: "a delimiter",
            });
        }
        Ok(symbol)
    }
}

/// Explicit whitespace, or the font's blank space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SpaceAtom {
    /// Inter-word space of the space font
    Blank,
    /// Fixed dimensions, each in its own unit
    Sized {
        width: Dimension,
        height: Dimension,
        depth: Dimension,
    },
}

/// Thickness of a fraction rule
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RuleThickness {
    /// The font's default rule thickness
    Default,
    /// A multiple of the default rule thickness
    Factor(f32),
    /// An explicit thickness; zero gives a fraction without a rule
    Explicit(Dimension),
}

// =============================================================================
// Atom - Core AST
// =============================================================================

/// A node in the formula tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Atom {
    /// Nothing; lays out as a zero-size strut
    Empty,
    /// Horizontal sequence separated by glue
    Row(Vec<Atom>),
    /// An alphanumeric character
    Char(CharAtom),
    /// A named symbol
    Symbol(SymbolAtom),
    /// A glyph fixed to one font, as produced by ligatures
    FixedChar(CharFont),
    /// Whitespace
    Space(SpaceAtom),
    /// Base with optional subscript and superscript
    Scripts {
        base: Box<Atom>,
        sub: Option<Box<Atom>>,
        sup: Option<Box<Atom>>,
    },
    /// Base between delimiters that grow with it
    Fenced {
        base: Box<Atom>,
        left: Option<SymbolAtom>,
        right: Option<SymbolAtom>,
    },
    /// Square root or nth root
    NthRoot {
        base: Box<Atom>,
        index: Option<Box<Atom>>,
    },
    /// Numerator over denominator
    Fraction {
        numerator: Box<Atom>,
        denominator: Box<Atom>,
        rule: RuleThickness,
        num_align: Alignment,
        denom_align: Alignment,
    },
    /// Accent symbol placed over a base
    Accented { base: Box<Atom>, accent: SymbolAtom },
    /// Base with overridden atom classes
    Typed {
        base: Box<Atom>,
        left: AtomType,
        right: AtomType,
    },
    /// Base painted with explicit colors
    Colored {
        base: Box<Atom>,
        foreground: Option<Color>,
        background: Option<Color>,
    },
}

impl Atom {
    /// Create a row; a single nested row is flattened
    pub fn row(children: Vec<Atom>) -> Self {
        match <[Atom; 1]>::try_from(children) {
            Ok([Atom::Row(inner)]) => Atom::Row(inner),
            Ok([single]) => Atom::Row(vec![single]),
            Err(children) => Atom::Row(children),
        }
    }

    /// Create a row that must contain at least one atom
    pub fn non_empty_row(children: Vec<Atom>) -> MathResult<Self> {
        if children.is_empty() {
            return Err(MathError::EmptyFormula);
        }
        Ok(Self::row(children))
    }

    /// A character in its default text style
    pub fn char(c: char) -> Self {
        Atom::Char(CharAtom {
            c,
            text_style: None,
            text_symbol: false,
        })
    }

    /// A character in a named text style
    pub fn styled_char(c: char, text_style: &str, font: &dyn TexFont) -> MathResult<Self> {
        if !font.has_text_style(text_style) {
            return Err(MathError::TextStyleNotFound(text_style.to_string()));
        }
        Ok(Atom::Char(CharAtom {
            c,
            text_style: Some(text_style.to_string()),
            text_symbol: false,
        }))
    }

    /// A character set as text, exempt from italic correction
    pub fn text_char(c: char, text_style: &str, font: &dyn TexFont) -> MathResult<Self> {
        let mut atom = Self::styled_char(c, text_style, font)?;
        if let Atom::Char(ch) = &mut atom {
            ch.text_symbol = true;
        }
        Ok(atom)
    }

    /// Characters of a string as a row in their default styles
    pub fn chars(text: &str) -> Self {
        Self::row(text.chars().map(Self::char).collect())
    }

    /// A named symbol
    pub fn symbol(name: &str, font: &dyn TexFont) -> MathResult<Self> {
        Ok(Atom::Symbol(SymbolAtom::get(name, font)?))
    }

    /// A glyph fixed to one font
    pub fn fixed_char(c: char, font_id: FontId) -> Self {
        Atom::FixedChar(CharFont::new(c, font_id))
    }

    /// The font's inter-word space
    pub fn blank() -> Self {
        Atom::Space(SpaceAtom::Blank)
    }

    /// Whitespace with all dimensions in one unit
    pub fn space(unit: Unit, width: f32, height: f32, depth: f32) -> Self {
        Atom::Space(SpaceAtom::Sized {
            width: Dimension::new(width, unit),
            height: Dimension::new(height, unit),
            depth: Dimension::new(depth, unit),
        })
    }

    /// Whitespace with a unit given by name
    pub fn space_in(unit: &str, width: f32, height: f32, depth: f32) -> MathResult<Self> {
        Ok(Self::space(unit.parse()?, width, height, depth))
    }

    /// Base with optional scripts
    pub fn scripts(base: Atom, sub: Option<Atom>, sup: Option<Atom>) -> Self {
        Atom::Scripts {
            base: Box::new(base),
            sub: sub.map(Box::new),
            sup: sup.map(Box::new),
        }
    }

    /// Base with a subscript
    pub fn subscript(base: Atom, sub: Atom) -> Self {
        Self::scripts(base, Some(sub), None)
    }

    /// Base with a superscript
    pub fn superscript(base: Atom, sup: Atom) -> Self {
        Self::scripts(base, None, Some(sup))
    }

    /// Base between named delimiters
    pub fn fenced(
        base: Atom,
        left: Option<&str>,
        right: Option<&str>,
        font: &dyn TexFont,
    ) -> MathResult<Self> {
        let left = left.map(|name| SymbolAtom::delimiter(name, font)).transpose()?;
        let right = right.map(|name| SymbolAtom::delimiter(name, font)).transpose()?;
        Ok(Atom::Fenced {
            base: Box::new(base),
            left,
            right,
        })
    }

    /// Square root
    pub fn sqrt(base: Atom) -> Self {
        Atom::NthRoot {
            base: Box::new(base),
            index: None,
        }
    }

    /// Root with an index
    pub fn nth_root(base: Atom, index: Atom) -> Self {
        Atom::NthRoot {
            base: Box::new(base),
            index: Some(Box::new(index)),
        }
    }

    /// Fraction with the default rule
    pub fn fraction(numerator: Atom, denominator: Atom) -> Self {
        Self::fraction_with(numerator, denominator, RuleThickness::Default)
    }

    /// Fraction with a chosen rule thickness
    pub fn fraction_with(numerator: Atom, denominator: Atom, rule: RuleThickness) -> Self {
        Atom::Fraction {
            numerator: Box::new(numerator),
            denominator: Box::new(denominator),
            rule,
            num_align: Alignment::Center,
            denom_align: Alignment::Center,
        }
    }

    /// Base with an accent symbol over it
    pub fn accented(base: Atom, accent: &str, font: &dyn TexFont) -> MathResult<Self> {
        let accent = SymbolAtom::get(accent, font)?;
        if accent.kind != AtomType::Accent {
            return Err(MathError::InvalidSymbolType {
                name: accent.name,
                expected: "an accent",
            });
        }
        Ok(Atom::Accented {
            base: Box::new(base),
            accent,
        })
    }

    /// Base with overridden atom classes
    pub fn typed(base: Atom, left: AtomType, right: AtomType) -> Self {
        Atom::Typed {
            base: Box::new(base),
            left,
            right,
        }
    }

    /// Base painted in the given colors
    pub fn colored(base: Atom, foreground: Option<Color>, background: Option<Color>) -> Self {
        Atom::Colored {
            base: Box::new(base),
            foreground,
            background,
        }
    }

    /// Class of the atom as seen from its left neighbour
    pub fn left_type(&self) -> AtomType {
        match self {
            Atom::Row(children) => children
                .first()
                .map_or(AtomType::Ordinary, Atom::left_type),
            Atom::Symbol(symbol) => symbol.kind,
            Atom::Scripts { base, .. } | Atom::Colored { base, .. } => base.left_type(),
            Atom::Fenced { .. } => AtomType::Opening,
            Atom::Fraction { .. } => AtomType::Inner,
            Atom::Typed { left, .. } => *left,
            _ => AtomType::Ordinary,
        }
    }

    /// Class of the atom as seen from its right neighbour
    pub fn right_type(&self) -> AtomType {
        match self {
            Atom::Row(children) => children
                .last()
                .map_or(AtomType::Ordinary, Atom::right_type),
            Atom::Symbol(symbol) => symbol.kind,
            Atom::Scripts { base, .. } | Atom::Colored { base, .. } => base.right_type(),
            Atom::Fenced { .. } => AtomType::Closing,
            Atom::Fraction { .. } => AtomType::Inner,
            Atom::Typed { right, .. } => *right,
            _ => AtomType::Ordinary,
        }
    }

    /// Whether this atom is a single character or symbol
    pub fn is_char_symbol(&self) -> bool {
        matches!(self, Atom::Char(_) | Atom::Symbol(_) | Atom::FixedChar(_))
    }

    /// Whether this atom is whitespace (kerns do not take part in glue)
    pub fn is_space(&self) -> bool {
        matches!(self, Atom::Space(_))
    }

    /// The glyph of a character or symbol atom, independent of style
    pub fn char_font(&self, font: &dyn TexFont) -> Option<CharFont> {
        match self {
            Atom::Char(ch) => Some(font.resolve_char(ch.c, ch.text_style.as_deref())),
            Atom::Symbol(symbol) => font.symbol(&symbol.name).map(|info| info.char_font),
            Atom::FixedChar(cf) => Some(*cf),
            _ => None,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
