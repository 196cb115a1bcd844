//! Delimiters and other glyphs that grow to a requested size

use crate::boxes::LayoutBox;
use crate::environment::TexEnvironment;
use crate::font::{Char, PREC};

/// Box for the named symbol at least `min_height` tall (height + depth)
///
/// Larger variants are tried first. When the largest one is still too small
/// and it is extensible, its parts are stacked with as many repeated pieces as
/// needed. Otherwise the largest variant is returned as is.
pub fn create_delimiter(name: &str, env: &TexEnvironment, min_height: f32) -> LayoutBox {
    let font = env.font();
    let style = env.style();
    let Some(mut c) = font.symbol_char(name, style) else {
        tracing::warn!(symbol = %name, "delimiter symbol missing from font");
        return LayoutBox::strut(0.0, 0.0, 0.0, 0.0);
    };

    if total(&c) < min_height {
        for larger in font.larger_variants(&c, style) {
            c = larger;
            if total(&c) >= min_height {
                break;
            }
        }
    }

    if total(&c) >= min_height {
        return LayoutBox::char_box(c);
    }

    let Some(ext) = font.extension(&c, style) else {
        return LayoutBox::char_box(c);
    };

    let mut vbox = LayoutBox::vertical();
    for part in [ext.top, ext.middle, ext.bottom].into_iter().flatten() {
        vbox.add(LayoutBox::char_box(part));
    }

    let Some(repeat) = ext.repeat.filter(|r| total(r) > PREC) else {
        tracing::warn!(symbol = %name, "extensible glyph has no usable repeat part");
        return vbox;
    };
    let piece = LayoutBox::char_box(repeat);
    let (top, middle, bottom) = (ext.top.is_some(), ext.middle.is_some(), ext.bottom.is_some());

    while vbox.height() + vbox.depth() <= min_height {
        if top && bottom {
            vbox.insert(1, piece.clone());
            if middle {
                let before_bottom = vbox.children().len() - 1;
                vbox.insert(before_bottom, piece.clone());
            }
        } else if bottom {
            vbox.insert(0, piece.clone());
        } else {
            vbox.add(piece.clone());
        }
    }

    vbox
}

fn total(c: &Char) -> f32 {
    c.height() + c.depth()
}
