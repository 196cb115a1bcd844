//! Square roots and nth roots

use crate::boxes::LayoutBox;
use crate::delimiter::create_delimiter;
use crate::environment::TexEnvironment;
use crate::layout::mu_kern;
use crate::model::Atom;

/// Name of the radical sign in the symbol table
pub const SQRT_SYMBOL: &str = "sqrt";

/// The index sits this fraction of the sign's total height above its bottom
const INDEX_RAISE: f32 = 0.55;
/// Overlap of the index with the sign, in math units
const INDEX_KERN: f32 = -10.0;

pub(crate) fn layout_root(base: &Atom, index: Option<&Atom>, env: &TexEnvironment) -> LayoutBox {
    let font = env.font();
    let style = env.style();
    let drt = font.default_rule_thickness(style);

    let clearance = if style.is_display() {
        let sign_font = font
            .symbol(SQRT_SYMBOL)
            .map_or_else(|| font.mu_font_id(), |info| info.char_font.font_id);
        font.x_height(style, sign_font)
    } else {
        drt
    };
    let mut clearance = drt + clearance.abs() / 4.0;

    let cramped = env.cramp_style();
    let mut radicand = LayoutBox::horizontal_of(base.create_box(&cramped));
    radicand.add(mu_kern(1.0, &cramped));

    let radicand_height = radicand.height();
    let total = radicand_height + radicand.depth();
    let mut sign = create_delimiter(SQRT_SYMBOL, env, total + clearance + drt);

    // split the excess between above and below the radicand
    clearance += (sign.depth() - (total + clearance)) / 2.0;

    sign.set_shift(-(radicand_height + clearance));
    let sign_height = sign.height();
    let mut bar = LayoutBox::over_bar(radicand, clearance, sign_height);
    bar.set_shift(-(radicand_height + clearance + drt));

    let mut square_root = LayoutBox::horizontal_of(sign);
    square_root.add(bar);

    let Some(index) = index else {
        return square_root;
    };

    let mut r = index.create_box(&env.root_style());
    let raise = INDEX_RAISE * (square_root.height() + square_root.depth());
    r.set_shift(square_root.depth() - r.depth() - raise);

    let kern = mu_kern(INDEX_KERN, env);
    let mut result = LayoutBox::horizontal();
    let overlap = r.width() + kern.width();
    if overlap < 0.0 {
        result.add(LayoutBox::kern(-overlap));
    }
    result.add(r);
    result.add(kern);
    result.add(square_root);
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::TexFont;
    use crate::boxes::BoxKind;
    use crate::glue::GlueTable;
    use crate::style::Style;
    use crate::test_support::test_font;

    #[test]
    fn test_sqrt_sign_covers_radicand() {
        let font = test_font();
        let glue = GlueTable::tex_default();
        for style in [Style::DISPLAY, Style::TEXT, Style::SCRIPT] {
            let env = TexEnvironment::new(style, &font, &glue);
            let b = Atom::sqrt(Atom::char('x')).create_box(&env);

            let sign = &b.children()[0];
            let radicand = Atom::char('x').create_box(&env.cramp_style());
            let drt = font.default_rule_thickness(style);
            let clearance = if style.is_display() {
                font.x_height(style, font.symbol(SQRT_SYMBOL).unwrap().char_font.font_id)
            } else {
                drt
            };
            let clearance = drt + clearance.abs() / 4.0;
            let needed = radicand.height() + radicand.depth() + clearance + drt;
            assert!(sign.height() + sign.depth() >= needed - 1e-6);
        }
    }

    #[test]
    fn test_sqrt_has_no_index_kern() {
        let font = test_font();
        let glue = GlueTable::tex_default();
        let env = TexEnvironment::display(&font, &glue);
        let b = Atom::sqrt(Atom::char('x')).create_box(&env);
        assert_eq!(b.children().len(), 2);
        assert!(matches!(b.children()[1].kind(), BoxKind::Vertical { .. }));
        assert!(b.children().iter().all(|c| c.kind() != &BoxKind::Strut));
    }

    #[test]
    fn test_sqrt_width() {
        let font = test_font();
        let glue = GlueTable::tex_default();
        let env = TexEnvironment::display(&font, &glue);
        let b = Atom::sqrt(Atom::char('x')).create_box(&env);
        let x = Atom::char('x').create_box(&env.cramp_style());
        let one_mu = mu_kern(1.0, &env).width();
        let sign = &b.children()[0];
        assert!((b.width() - (sign.width() + x.width() + one_mu)).abs() < 1e-6);
    }

    #[test]
    fn test_nth_root_index() {
        let font = test_font();
        let glue = GlueTable::tex_default();
        let env = TexEnvironment::display(&font, &glue);
        let b = Atom::nth_root(Atom::char('x'), Atom::char('3')).create_box(&env);
        let children = b.children();
        // a narrow index is padded so the overlap never leaves the box
        assert_eq!(children.len(), 4);
        let pad = &children[0];
        let index = &children[1];
        let kern = mu_kern(INDEX_KERN, &env).width();
        assert!((pad.width() + index.width() + kern).abs() < 1e-6);
        assert_eq!(index.glyphs()[0].size(), 0.5);
        // raised above the baseline
        assert!(index.shift() < 0.0);
    }
}
