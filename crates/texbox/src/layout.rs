//! Math Layout - Turn atoms into measured boxes
//!
//! Layout is a pure function of the atom, the environment and the font: the
//! atom tree is only read, and every call builds a fresh box tree. Lookups
//! that fail at this point fall back to empty boxes instead of erroring, since
//! names were checked when the atoms were built.
//!
//! Scripts and radicals live in their own modules; everything else is here.

use crate::boxes::LayoutBox;
use crate::delimiter::create_delimiter;
use crate::environment::TexEnvironment;
use crate::font::{Param, PREC};
use crate::model::{
    Alignment, Atom, AtomType, CharFont, Dimension, RuleThickness, SpaceAtom, SymbolAtom, Unit,
};
use crate::radical::layout_root;
use crate::scripts::layout_scripts;
use std::borrow::Cow;

/// Delimiters cover at least 901/1000 of the fenced content
const DELIMITER_FACTOR: f32 = 901.0;
/// ...and fall short of it by at most this much
const DELIMITER_SHORTFALL: f32 = 0.5;
/// Space on both sides of a fraction, in em
const NULL_DELIMITER_SPACE: f32 = 0.12;

// =============================================================================
// Dispatch
// =============================================================================

impl Atom {
    /// Lay this atom out in the given environment
    pub fn create_box(&self, env: &TexEnvironment) -> LayoutBox {
        let b = match self {
            Atom::Empty => LayoutBox::strut(0.0, 0.0, 0.0, 0.0),
            Atom::Row(children) => layout_row(children, env, None),
            Atom::Char(ch) => {
                let c = env
                    .font()
                    .styled_char(ch.c, ch.text_style.as_deref(), env.style());
                LayoutBox::char_box(c)
            }
            Atom::Symbol(symbol) => layout_symbol(symbol, env),
            Atom::FixedChar(cf) => LayoutBox::char_box(env.font().char(*cf, env.style())),
            Atom::Space(space) => layout_space(space, env),
            Atom::Scripts { base, sub, sup } => {
                layout_scripts(base, sub.as_deref(), sup.as_deref(), env)
            }
            Atom::Fenced { base, left, right } => {
                layout_fenced(base, left.as_ref(), right.as_ref(), env)
            }
            Atom::NthRoot { base, index } => layout_root(base, index.as_deref(), env),
            Atom::Fraction {
                numerator,
                denominator,
                rule,
                num_align,
                denom_align,
            } => layout_fraction(numerator, denominator, *rule, *num_align, *denom_align, env),
            Atom::Accented { base, accent } => layout_accented(base, accent, env),
            Atom::Typed { base, .. } => base.create_box(env),
            Atom::Colored {
                base,
                foreground,
                background,
            } => {
                let env = env.with_colors(*foreground, *background);
                match base.as_ref() {
                    Atom::Row(children) => layout_row(children, &env, None),
                    other => layout_row(std::slice::from_ref(other), &env, None),
                }
            }
        };

        tracing::trace!(
            target: "texbox::layout",
            atom = kind_name(self),
            style = %env.style(),
            width = b.width(),
            height = b.height(),
            depth = b.depth(),
            "atom laid out"
        );
        b
    }
}

fn kind_name(atom: &Atom) -> &'static str {
    match atom {
        Atom::Empty => "empty",
        Atom::Row(_) => "row",
        Atom::Char(_) => "char",
        Atom::Symbol(_) => "symbol",
        Atom::FixedChar(_) => "fixed_char",
        Atom::Space(_) => "space",
        Atom::Scripts { .. } => "scripts",
        Atom::Fenced { .. } => "fenced",
        Atom::NthRoot { .. } => "nth_root",
        Atom::Fraction { .. } => "fraction",
        Atom::Accented { .. } => "accented",
        Atom::Typed { .. } => "typed",
        Atom::Colored { .. } => "colored",
    }
}

fn layout_symbol(symbol: &SymbolAtom, env: &TexEnvironment) -> LayoutBox {
    match env.font().symbol_char(&symbol.name, env.style()) {
        Some(c) => LayoutBox::char_box(c),
        None => {
            tracing::warn!(symbol = %symbol.name, "symbol missing from font, using an empty box");
            LayoutBox::strut(0.0, 0.0, 0.0, 0.0)
        }
    }
}

// =============================================================================
// Units and Spaces
// =============================================================================

impl Unit {
    /// Pixels per unit in the environment
    pub fn pixels(self, env: &TexEnvironment) -> f32 {
        let font = env.font();
        match self {
            Unit::Em | Unit::Ex => font.x_height(env.style(), env.last_font_id()),
            Unit::Pixel => 1.0 / env.point_size(),
            Unit::Point => font.pixels_per_point() / env.point_size(),
            Unit::Pica => 12.0 * font.pixels_per_point() / env.point_size(),
            Unit::Mu => font.quad(env.style(), font.mu_font_id()) / 18.0,
        }
    }
}

impl Dimension {
    /// Length of this dimension in pixels
    pub fn resolve(&self, env: &TexEnvironment) -> f32 {
        self.value * self.unit.pixels(env)
    }
}

fn layout_space(space: &SpaceAtom, env: &TexEnvironment) -> LayoutBox {
    match space {
        SpaceAtom::Blank => LayoutBox::kern(env.space()),
        SpaceAtom::Sized {
            width,
            height,
            depth,
        } => LayoutBox::strut(width.resolve(env), height.resolve(env), depth.resolve(env), 0.0),
    }
}

/// Horizontal space of `value` math units
pub(crate) fn mu_kern(value: f32, env: &TexEnvironment) -> LayoutBox {
    LayoutBox::kern(Dimension::new(value, Unit::Mu).resolve(env))
}

// =============================================================================
// Rows
// =============================================================================

/// An atom as seen while building a row: its class may be overridden and a
/// ligature may replace it, without touching the atom itself
#[derive(Debug, Clone)]
pub(crate) struct Dummy<'a> {
    atom: Cow<'a, Atom>,
    kind: Option<AtomType>,
}

impl<'a> Dummy<'a> {
    fn new(atom: &'a Atom) -> Self {
        Self {
            atom: Cow::Borrowed(atom),
            kind: None,
        }
    }

    fn left_type(&self) -> AtomType {
        self.kind.unwrap_or_else(|| self.atom.left_type())
    }

    fn right_type(&self) -> AtomType {
        self.kind.unwrap_or_else(|| self.atom.right_type())
    }

    fn is_space(&self) -> bool {
        self.atom.is_space()
    }

    /// Demote a binary operator that has no sensible left or right operand
    fn change_to_ord(&mut self, previous: Option<&Dummy>, next: Option<&Atom>) {
        if self.left_type() == AtomType::BinaryOperator
            && previous.map_or(true, |p| p.right_type().forces_ordinary_after())
        {
            self.kind = Some(AtomType::Ordinary);
        } else if let Some(next) = next {
            if self.right_type() == AtomType::BinaryOperator
                && matches!(
                    next.left_type(),
                    AtomType::Relation | AtomType::Closing | AtomType::Punctuation
                )
            {
                self.kind = Some(AtomType::Ordinary);
            }
        }
    }

    fn change_to_ligature(&mut self, ligature: CharFont) {
        self.atom = Cow::Owned(Atom::FixedChar(ligature));
        self.kind = None;
    }

    fn create_box(&self, env: &TexEnvironment, previous: Option<&Dummy<'a>>) -> LayoutBox {
        if let Cow::Borrowed(atom) = &self.atom {
            let atom: &'a Atom = *atom;
            if let Atom::Row(children) = atom {
                return layout_row(children, env, previous.cloned());
            }
        }
        self.atom.create_box(env)
    }
}

/// Lay out a row, continuing after `previous` when the row is nested
pub(crate) fn layout_row<'a>(
    elements: &'a [Atom],
    env: &TexEnvironment,
    mut previous: Option<Dummy<'a>>,
) -> LayoutBox {
    let font = env.font();
    let mut hbox = LayoutBox::horizontal_with(env.foreground(), env.background());
    let mut env = env.without_colors();

    let mut i = 0;
    while i < elements.len() {
        let mut atom = Dummy::new(&elements[i]);
        let next = elements.get(i + 1);
        atom.change_to_ord(previous.as_ref(), next);

        let mut kern = 0.0;
        if let Some(next) = next {
            if atom.right_type() == AtomType::Ordinary
                && atom.atom.is_char_symbol()
                && next.is_char_symbol()
                && next.left_type().is_kernable()
            {
                if let (Some(left), Some(right)) = (atom.atom.char_font(font), next.char_font(font))
                {
                    match font.ligature(left, right) {
                        Some(ligature) => {
                            atom.change_to_ligature(ligature);
                            i += 1;
                        }
                        None => kern = font.kern(left, right, env.style()),
                    }
                }
            }
        }

        // no glue before the first element or around explicit spaces
        if i != 0 {
            if let Some(prev) = &previous {
                if !prev.is_space() && !atom.is_space() {
                    hbox.add(env.glue().glue(prev.right_type(), atom.left_type(), &env));
                }
            }
        }

        let b = atom.create_box(&env, previous.as_ref());
        env.set_last_font_id(b.last_font_id());
        hbox.add(b);

        if kern.abs() > PREC {
            hbox.add(LayoutBox::kern(kern));
        }
        if !atom.is_space() {
            previous = Some(atom);
        }
        i += 1;
    }

    hbox
}

/// Pin the class of every binary operator that the row rules turn ordinary
///
/// The returned row lays out exactly like the input; applying this function
/// to its own output changes nothing.
pub fn demote_binary_operators(elements: &[Atom]) -> Vec<Atom> {
    let mut previous: Option<Dummy> = None;
    let mut out = Vec::with_capacity(elements.len());
    for (i, element) in elements.iter().enumerate() {
        let mut atom = Dummy::new(element);
        atom.change_to_ord(previous.as_ref(), elements.get(i + 1));
        out.push(match atom.kind {
            Some(kind) => Atom::typed(element.clone(), kind, kind),
            None => element.clone(),
        });
        if !atom.is_space() {
            previous = Some(atom);
        }
    }
    out
}

// =============================================================================
// Fractions
// =============================================================================

fn layout_fraction(
    numerator: &Atom,
    denominator: &Atom,
    rule: RuleThickness,
    num_align: Alignment,
    denom_align: Alignment,
    env: &TexEnvironment,
) -> LayoutBox {
    let font = env.font();
    let style = env.style();
    let drt = font.default_rule_thickness(style);
    let thickness = match rule {
        RuleThickness::Default => drt,
        RuleThickness::Factor(factor) => factor * drt,
        RuleThickness::Explicit(dimension) => dimension.resolve(env),
    };

    let mut num = numerator.create_box(&env.num_style());
    let mut denom = denominator.create_box(&env.denom_style());
    if num.width() < denom.width() {
        num = LayoutBox::aligned_horizontal(num, denom.width(), num_align);
    } else {
        denom = LayoutBox::aligned_horizontal(denom, num.width(), denom_align);
    }

    let (mut shift_up, mut shift_down) = if style.is_display() {
        (font.param(Param::Num1, style), font.param(Param::Denom1, style))
    } else if thickness > 0.0 {
        (font.param(Param::Num2, style), font.param(Param::Denom2, style))
    } else {
        (font.param(Param::Num3, style), font.param(Param::Denom2, style))
    };

    let (num_height, num_depth, num_width) = (num.height(), num.depth(), num.width());
    let mut vbox = LayoutBox::vertical();
    vbox.add(num);

    let axis = font.axis_height(style);
    if thickness > 0.0 {
        let clearance = if style.is_display() { 3.0 * thickness } else { thickness };
        let half = thickness / 2.0;
        let mut above = shift_up - num_depth - (axis + half);
        let mut below = axis - half - (denom.height() - shift_down);
        let short_above = clearance - above;
        let short_below = clearance - below;
        if short_above > 0.0 {
            shift_up += short_above;
            above += short_above;
        }
        if short_below > 0.0 {
            shift_down += short_below;
            below += short_below;
        }
        vbox.add(LayoutBox::strut(0.0, above, 0.0, 0.0));
        vbox.add(LayoutBox::rule(thickness, num_width, 0.0));
        vbox.add(LayoutBox::strut(0.0, below, 0.0, 0.0));
    } else {
        let clearance = if style.is_display() { 7.0 * drt } else { 3.0 * drt };
        let mut gap = shift_up - num_depth - (denom.height() - shift_down);
        let half_short = (clearance - gap) / 2.0;
        if half_short > 0.0 {
            shift_up += half_short;
            shift_down += half_short;
            gap += 2.0 * half_short;
        }
        vbox.add(LayoutBox::strut(0.0, gap, 0.0, 0.0));
    }

    let denom_depth = denom.depth();
    vbox.add(denom);
    vbox.set_height(shift_up + num_height);
    vbox.set_depth(shift_down + denom_depth);

    let space = Dimension::new(NULL_DELIMITER_SPACE, Unit::Em).resolve(env);
    let width = vbox.width() + 2.0 * space;
    LayoutBox::aligned_horizontal(vbox, width, Alignment::Center)
}

// =============================================================================
// Accents
// =============================================================================

fn layout_accented(base: &Atom, accent: &SymbolAtom, env: &TexEnvironment) -> LayoutBox {
    let font = env.font();
    let style = env.style();

    let mut b = base.create_box(&env.cramp_style());
    let u = b.width();
    let skew = base
        .char_font(font)
        .filter(|_| base.is_char_symbol())
        .map_or(0.0, |cf| font.skew(cf, style));

    let Some(mut ch) = font.symbol_char(&accent.name, style) else {
        tracing::warn!(symbol = %accent.name, "accent missing from font, using the bare base");
        return b;
    };
    for larger in font.larger_variants(&ch, style) {
        if larger.width() > u {
            break;
        }
        ch = larger;
    }

    let delta = b.height().min(font.x_height(style, ch.font_id));

    let mut y = if ch.italic() > PREC {
        let mut hbox = LayoutBox::horizontal_of(LayoutBox::char_box(ch));
        hbox.add(LayoutBox::kern(ch.italic()));
        hbox
    } else {
        LayoutBox::char_box(ch)
    };

    let diff = (u - y.width()) / 2.0;
    y.set_shift(skew + diff.max(0.0));
    if diff < 0.0 {
        b = LayoutBox::aligned_horizontal(b, y.width(), Alignment::Center);
    }

    let base_depth = b.depth();
    let mut vbox = LayoutBox::vertical();
    vbox.add(y);
    vbox.add(LayoutBox::strut(0.0, -delta, 0.0, 0.0));
    vbox.add(b);
    let total = vbox.height() + vbox.depth();
    vbox.set_depth(base_depth);
    vbox.set_height(total - base_depth);

    if diff < 0.0 {
        let mut hbox = LayoutBox::horizontal_of(LayoutBox::kern(diff));
        hbox.add(vbox);
        hbox.add(LayoutBox::kern(diff));
        return hbox;
    }
    vbox
}

// =============================================================================
// Fences
// =============================================================================

fn layout_fenced(
    base: &Atom,
    left: Option<&SymbolAtom>,
    right: Option<&SymbolAtom>,
    env: &TexEnvironment,
) -> LayoutBox {
    let font = env.font();
    let content = base.create_box(env);
    let axis = font.axis_height(env.style());
    let delta = (content.height() - axis).max(content.depth() + axis);
    let min_height = (delta / 500.0 * DELIMITER_FACTOR).max(2.0 * delta - DELIMITER_SHORTFALL);

    let mut hbox = LayoutBox::horizontal();
    if let Some(left) = left {
        hbox.add(centered_delimiter(&left.name, env, min_height, axis));
    }
    if !base.is_space() {
        hbox.add(env.glue().glue(AtomType::Opening, base.left_type(), env));
    }
    hbox.add(content);
    if !base.is_space() {
        hbox.add(env.glue().glue(base.right_type(), AtomType::Closing, env));
    }
    if let Some(right) = right {
        hbox.add(centered_delimiter(&right.name, env, min_height, axis));
    }
    hbox
}

fn centered_delimiter(name: &str, env: &TexEnvironment, min_height: f32, axis: f32) -> LayoutBox {
    let mut b = create_delimiter(name, env, min_height);
    let total = b.height() + b.depth();
    b.set_shift(-(total / 2.0 - b.height()) - axis);
    b
}

// =============================================================================
// Tests
// =============================================================================
