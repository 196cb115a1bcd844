//! Math styles and the TeX style transition rules
//!
//! A style is one of display, text, script or script-script, each with a
//! cramped sibling. The eight styles are numbered 0..=7 with the cramped
//! variant on the odd index, and every transition is an integer formula over
//! that index.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the eight TeX math styles
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Style(u8);

impl Style {
    pub const DISPLAY: Style = Style(0);
    pub const DISPLAY_CRAMPED: Style = Style(1);
    pub const TEXT: Style = Style(2);
    pub const TEXT_CRAMPED: Style = Style(3);
    pub const SCRIPT: Style = Style(4);
    pub const SCRIPT_CRAMPED: Style = Style(5);
    pub const SCRIPT_SCRIPT: Style = Style(6);
    pub const SCRIPT_SCRIPT_CRAMPED: Style = Style(7);

    /// All styles, largest first
    pub const ALL: [Style; 8] = [
        Style::DISPLAY,
        Style::DISPLAY_CRAMPED,
        Style::TEXT,
        Style::TEXT_CRAMPED,
        Style::SCRIPT,
        Style::SCRIPT_CRAMPED,
        Style::SCRIPT_SCRIPT,
        Style::SCRIPT_SCRIPT_CRAMPED,
    ];

    /// Get the style with the given index, if it is in 0..=7
    pub fn from_index(index: u8) -> Option<Self> {
        (index < 8).then_some(Style(index))
    }

    /// The numeric index of this style
    pub fn index(self) -> u8 {
        self.0
    }

    /// Whether this is a cramped style
    pub fn is_cramped(self) -> bool {
        self.0 % 2 == 1
    }

    /// Spacing bucket: collapses each style with its cramped sibling
    pub fn half(self) -> usize {
        (self.0 / 2) as usize
    }

    /// The cramped sibling (cramped styles stay unchanged)
    pub fn cramp(self) -> Self {
        if self.is_cramped() {
            self
        } else {
            Style(self.0 + 1)
        }
    }

    /// Style of a fraction numerator
    pub fn num(self) -> Self {
        let s = self.0;
        Style(s + 2 - 2 * (s / 6))
    }

    /// Style of a fraction denominator
    pub fn denom(self) -> Self {
        let s = self.0;
        Style(2 * (s / 2) + 1 + 2 - 2 * (s / 6))
    }

    /// Style of a subscript
    pub fn sub(self) -> Self {
        Style(2 * (self.0 / 4) + 4 + 1)
    }

    /// Style of a superscript
    pub fn sup(self) -> Self {
        let s = self.0;
        Style(2 * (s / 4) + 4 + (s % 2))
    }

    /// Style of a root index, always script-script
    pub fn root(self) -> Self {
        Style::SCRIPT_SCRIPT
    }

    /// Whether this is display style or its cramped sibling
    pub fn is_display(self) -> bool {
        self < Style::TEXT
    }
}

impl Default for Style {
    fn default() -> Self {
        Style::DISPLAY
    }
}

impl TryFrom<u8> for Style {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Style::from_index(value).ok_or_else(|| format!("invalid style index {}", value))
    }
}

impl From<Style> for u8 {
    fn from(style: Style) -> Self {
        style.0
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self.0 / 2 {
            0 => "display",
            1 => "text",
            2 => "script",
            _ => "scriptscript",
        };
        if self.is_cramped() {
            write!(f, "{}'", name)
        } else {
            f.write_str(name)
        }
    }
}
