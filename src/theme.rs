// ── Dual light/dark colour theme ───────────────────────────────────────────────
//
// The theme is a persisted user preference (see `session::Config`).  The
// palettes are plain data; the display surface decides how to apply them.
//
// Colour conventions:
//   • All palette entries are in 0xRRGGBB form.
//   • Surfaces that need Win32 COLORREF (BGR) convert with `Rgb::to_bgr`.

use serde::{Deserialize, Serialize};

// ── Theme ─────────────────────────────────────────────────────────────────────

/// Display theme, stored in the configuration as `"light"` or `"dark"`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// The other theme.
    pub(crate) fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    pub(crate) fn is_dark(self) -> bool {
        self == Self::Dark
    }

    /// Colours used to paint the text view in this theme.
    pub(crate) fn palette(self) -> &'static Palette {
        match self {
            Self::Light => &LIGHT,
            Self::Dark => &DARK,
        }
    }
}

// ── Colour palette ────────────────────────────────────────────────────────────

/// A colour in 0xRRGGBB form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Rgb(pub(crate) u32);

impl Rgb {
    /// Convert 0xRRGGBB → BGR (Win32 COLORREF / Scintilla colour).
    pub(crate) fn to_bgr(self) -> u32 {
        let r = (self.0 >> 16) & 0xFF;
        let g = (self.0 >> 8) & 0xFF;
        let b = self.0 & 0xFF;
        (b << 16) | (g << 8) | r
    }
}

pub(crate) struct Palette {
    pub(crate) bg: Rgb,
    pub(crate) fg: Rgb,
    pub(crate) caret: Rgb,
    pub(crate) selection_bg: Rgb,
}

/// Black on white, the same look as a printed chord sheet.
const LIGHT: Palette = Palette {
    bg: Rgb(0xFFFFFF),
    fg: Rgb(0x000000),
    caret: Rgb(0x000000),
    selection_bg: Rgb(0xC0D8F0),
};

/// Low-glare palette for dim stages.
const DARK: Palette = Palette {
    bg: Rgb(0x1E1E1E),
    fg: Rgb(0xD4D4D4),
    caret: Rgb(0xAEAFAD),
    selection_bg: Rgb(0x264F78),
};

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_light() {
        assert_eq!(Theme::default(), Theme::Light);
    }

    #[test]
    fn toggled_flips_both_ways() {
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
        assert!(Theme::Dark.is_dark());
        assert!(!Theme::Light.is_dark());
    }

    #[test]
    fn serialises_as_lowercase_string() {
        assert_eq!(serde_json::to_string(&Theme::Dark).expect("serialize"), r#""dark""#);
        let t: Theme = serde_json::from_str(r#""light""#).expect("deserialize");
        assert_eq!(t, Theme::Light);
    }

    #[test]
    fn bgr_swaps_red_and_blue() {
        assert_eq!(Rgb(0x112233).to_bgr(), 0x332211);
        assert_eq!(Rgb(0xFFFFFF).to_bgr(), 0xFFFFFF);
    }

    #[test]
    fn palettes_differ_in_background() {
        assert_ne!(Theme::Light.palette().bg, Theme::Dark.palette().bg);
    }
}
