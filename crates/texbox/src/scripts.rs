//! Subscript and superscript placement
//!
//! TeX's rules 18a-18f: seed the shifts from the base, then raise or lower
//! each script to clear the font's minimum distances, and keep a gap of at
//! least four rule thicknesses between a superscript and a subscript.

use crate::boxes::LayoutBox;
use crate::environment::TexEnvironment;
use crate::font::{Param, PREC};
use crate::model::{Atom, AtomType, Dimension, Unit};
use crate::style::Style;

/// Space after every script, in points
const SCRIPT_SPACE: f32 = 0.5;

pub(crate) fn layout_scripts(
    base: &Atom,
    sub: Option<&Atom>,
    sup: Option<&Atom>,
    env: &TexEnvironment,
) -> LayoutBox {
    let b = base.create_box(env);
    if sub.is_none() && sup.is_none() {
        return b;
    }

    let font = env.font();
    let style = env.style();
    let last_font_id = b.last_font_id().unwrap_or_else(|| font.mu_font_id());
    let x_height = font.x_height(style, last_font_id).abs();

    let sub_env = env.sub_style();
    let sup_env = env.sup_style();
    let sup_drop = font.param(Param::SupDrop, sup_env.style());
    let sub_drop = font.param(Param::SubDrop, sub_env.style());

    let mut delta = 0.0;
    let mut shift_up;
    let mut shift_down;
    let mut hor;

    match base {
        Atom::Accented { base: inner, .. } => {
            let inner_box = inner.create_box(&env.cramp_style());
            shift_up = inner_box.height() - sup_drop;
            shift_down = inner_box.depth() + sub_drop;
            hor = LayoutBox::horizontal_of(b);
        }
        Atom::Symbol(symbol) if symbol.kind == AtomType::BigOperator => {
            hor = match font.symbol_char(&symbol.name, style) {
                Some(mut c) => {
                    if style.is_display() {
                        if let Some(larger) = font.next_larger(&c, style) {
                            c = larger;
                        }
                    }
                    let mut x = LayoutBox::char_box(c);
                    let total = x.height() + x.depth();
                    x.set_shift(-(total / 2.0 - x.height()) - font.axis_height(style));
                    let mut hor = LayoutBox::horizontal_of(x);

                    delta = c.italic();
                    if delta > PREC && sub.is_none() {
                        hor.add(LayoutBox::kern(delta));
                    }
                    hor
                }
                None => LayoutBox::horizontal_of(b),
            };
            shift_up = hor.height() - sup_drop;
            shift_down = hor.depth() + sub_drop;
        }
        Atom::Char(_) | Atom::Symbol(_) | Atom::FixedChar(_) => {
            hor = LayoutBox::horizontal_of(b);
            shift_up = 0.0;
            shift_down = 0.0;
            let text_symbol = matches!(base, Atom::Char(ch) if ch.text_symbol);
            if let Some(cf) = base.char_font(font) {
                if !text_symbol || !font.has_space(cf.font_id) {
                    delta = font.char(cf, style).italic();
                }
            }
            if delta > PREC && sub.is_none() {
                hor.add(LayoutBox::kern(delta));
                delta = 0.0;
            }
        }
        _ => {
            shift_up = b.height() - sup_drop;
            shift_down = b.depth() + sub_drop;
            hor = LayoutBox::horizontal_of(b);
        }
    }

    let script_space = || LayoutBox::kern(Dimension::new(SCRIPT_SPACE, Unit::Point).resolve(env));

    let Some(sup) = sup else {
        // subscript only
        if let Some(sub) = sub {
            let mut x = sub.create_box(&sub_env);
            let shift = shift_down
                .max(font.param(Param::Sub1, style))
                .max(x.height() - 4.0 * x_height / 5.0);
            x.set_shift(shift);
            hor.add(x);
            hor.add(script_space());
        }
        return hor;
    };

    let x = sup.create_box(&sup_env);
    let (x_height_box, x_depth) = (x.height(), x.depth());
    let mut sup_box = LayoutBox::horizontal_of(x);
    sup_box.add(script_space());

    let p = if style == Style::DISPLAY {
        font.param(Param::Sup1, style)
    } else if style.cramp() == style {
        font.param(Param::Sup3, style)
    } else {
        font.param(Param::Sup2, style)
    };
    shift_up = shift_up.max(p).max(x_depth + x_height / 4.0);

    let Some(sub) = sub else {
        sup_box.set_shift(-shift_up);
        hor.add(sup_box);
        return hor;
    };

    let y = sub.create_box(&sub_env);
    let (y_height, y_depth) = (y.height(), y.depth());
    let mut sub_box = LayoutBox::horizontal_of(y);
    sub_box.add(script_space());

    shift_down = shift_down.max(font.param(Param::Sub2, style));
    let drt = font.default_rule_thickness(style);
    let gap = shift_up - x_depth + shift_down - y_height;
    if gap < 4.0 * drt {
        shift_up += 4.0 * drt - gap;
        // bottom of the superscript at least 4/5 x-height above the baseline
        let psi = 4.0 * x_height / 5.0 - (shift_up - x_depth);
        if psi > 0.0 {
            shift_up += psi;
            shift_down -= psi;
        }
    }

    let mut vbox = LayoutBox::vertical();
    sup_box.set_shift(delta);
    vbox.add(sup_box);
    let gap = shift_up - x_depth + shift_down - y_height;
    vbox.add(LayoutBox::strut(0.0, gap, 0.0, 0.0));
    vbox.add(sub_box);
    vbox.set_height(shift_up + x_height_box);
    vbox.set_depth(shift_down + y_depth);
    hor.add(vbox);
    hor
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::TexFont;
    use crate::boxes::BoxKind;
    use crate::glue::GlueTable;
    use crate::model::CharFont;
    use crate::test_support::{test_font, EXTENSION, ITALIC};

    fn script_space(env: &TexEnvironment) -> f32 {
        Dimension::new(SCRIPT_SPACE, Unit::Point).resolve(env)
    }

    #[test]
    fn test_no_scripts_returns_base() {
        let font = test_font();
        let glue = GlueTable::tex_default();
        let env = TexEnvironment::display(&font, &glue);
        let b = Atom::scripts(Atom::char('a'), None, None).create_box(&env);
        assert!(matches!(b.kind(), BoxKind::Char(_)));
    }

    #[test]
    fn test_superscript_display() {
        let font = test_font();
        let glue = GlueTable::tex_default();
        let env = TexEnvironment::display(&font, &glue);
        let b = Atom::superscript(Atom::char('a'), Atom::char('2')).create_box(&env);
        let sup = b.children().last().unwrap();
        assert!(-sup.shift() >= font.param(Param::Sup1, Style::DISPLAY) - 1e-6);
        let glyph = sup.glyphs()[0];
        assert_eq!(glyph.c, '2');
        assert_eq!(glyph.size(), 0.7);
    }

    #[test]
    fn test_superscript_cramped_uses_sup3() {
        let font = test_font();
        let glue = GlueTable::tex_default();
        let env = TexEnvironment::new(Style::TEXT_CRAMPED, &font, &glue);
        let b = Atom::superscript(Atom::char('a'), Atom::char('2')).create_box(&env);
        let sup = b.children().last().unwrap();
        let sup3 = font.param(Param::Sup3, Style::TEXT_CRAMPED);
        let two = font.styled_char('2', None, Style::SCRIPT_CRAMPED);
        let x_height = font.x_height(Style::TEXT_CRAMPED, ITALIC);
        let expected = sup3.max(two.depth() + x_height / 4.0);
        assert!((-sup.shift() - expected).abs() < 1e-6);
    }

    #[test]
    fn test_subscript_only() {
        let font = test_font();
        let glue = GlueTable::tex_default();
        let env = TexEnvironment::new(Style::TEXT, &font, &glue);
        let b = Atom::subscript(Atom::char('x'), Atom::char('1')).create_box(&env);

        let sub = &b.children()[1];
        assert!(sub.shift() >= font.param(Param::Sub1, Style::TEXT) - 1e-6);

        let x = font.styled_char('x', None, Style::TEXT);
        let one = font.styled_char('1', None, Style::SCRIPT_CRAMPED);
        let expected = x.width() + one.width() + script_space(&env);
        assert!((b.width() - expected).abs() < 1e-6);
    }

    #[test]
    fn test_italic_correction_before_superscript() {
        let font = test_font();
        let glue = GlueTable::tex_default();
        let env = TexEnvironment::new(Style::TEXT, &font, &glue);
        let f = font.char(CharFont::new('f', ITALIC), Style::TEXT);
        assert!(f.italic() > 0.0);

        let b = Atom::superscript(Atom::char('f'), Atom::char('2')).create_box(&env);
        let kern = &b.children()[1];
        assert_eq!(kern.kind(), &BoxKind::Strut);
        assert!((kern.width() - f.italic()).abs() < 1e-6);
    }

    #[test]
    fn test_text_symbol_skips_italic_correction() {
        let font = test_font();
        let glue = GlueTable::tex_default();
        let env = TexEnvironment::new(Style::TEXT, &font, &glue);
        let base = Atom::text_char('f', "mathrm", &font).unwrap();
        let b = Atom::superscript(base, Atom::char('2')).create_box(&env);
        // base glyph then the raised superscript, no kern in between
        assert_eq!(b.children().len(), 2);
    }

    #[test]
    fn test_both_scripts_gap() {
        let font = test_font();
        let glue = GlueTable::tex_default();
        for style in Style::ALL {
            let env = TexEnvironment::new(style, &font, &glue);
            let atom = Atom::scripts(Atom::char('f'), Some(Atom::char('y')), Some(Atom::char('g')));
            let b = atom.create_box(&env);
            let vbox = b.children().last().unwrap();
            let [sup, strut, sub] = vbox.children() else {
                panic!("expected three children, got {}", vbox.children().len());
            };
            let drt = font.default_rule_thickness(style);
            let gap = strut.height();
            assert!(gap >= 4.0 * drt - 1e-5, "gap {} in style {}", gap, style);
            // italic correction moves the superscript right
            assert!(sup.shift() > 0.0);
            assert_eq!(sub.shift(), 0.0);
        }
    }

    #[test]
    fn test_big_operator_display_uses_larger_variant() {
        let font = test_font();
        let glue = GlueTable::tex_default();
        let env = TexEnvironment::display(&font, &glue);
        let sum = Atom::symbol("sum", &font).unwrap();
        let b = Atom::superscript(sum, Atom::char('n')).create_box(&env);
        let op = b.glyphs()[0];
        assert_eq!(op.font_id, EXTENSION);

        // centered on the axis
        let op_box = &b.children()[0];
        let axis = font.axis_height(Style::DISPLAY);
        let top = op_box.height() - op_box.shift();
        let bottom = op_box.depth() + op_box.shift();
        assert!(((top - bottom) / 2.0 - axis).abs() < 1e-5);
    }

    #[test]
    fn test_big_operator_text_keeps_glyph() {
        let font = test_font();
        let glue = GlueTable::tex_default();
        let env = TexEnvironment::new(Style::TEXT, &font, &glue);
        let sum = Atom::symbol("sum", &font).unwrap();
        let b = Atom::subscript(sum, Atom::char('i')).create_box(&env);
        let op = b.glyphs()[0];
        assert_ne!(op.font_id, EXTENSION);
    }

    #[test]
    fn test_accented_base_seeds_from_inner() {
        let font = test_font();
        let glue = GlueTable::tex_default();
        let env = TexEnvironment::display(&font, &glue);
        let hat = Atom::accented(Atom::char('a'), "widehat", &font).unwrap();
        let b = Atom::superscript(hat, Atom::char('2')).create_box(&env);
        let sup = b.children().last().unwrap();
        assert!(-sup.shift() >= font.param(Param::Sup1, Style::DISPLAY) - 1e-6);
    }
}
