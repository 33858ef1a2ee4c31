//! The colours a freshly-reset grid starts from: the default background,
//! foreground, and cursor colour. Distinct from [`crate::sgr::PALETTE8`]
//! and [`crate::sgr::PALETTE8_BRIGHT`], which are the fixed 16 indexed
//! colours `ESC[30-37m`/`ESC[90-97m` resolve to and are not configurable
//! here, matching `original_source/config.h`'s `esc_palette_8` constants.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    pub colors: ThemeColors,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemeColors {
    pub background: RgbColor,
    pub foreground: RgbColor,
    pub cursor: RgbColor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RgbColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl RgbColor {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim_start_matches('#');
        if hex.len() != 6 {
            return None;
        }
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        Some(Self { r, g, b })
    }

    /// Packed `0xRRGGBB`, the form the host window system's colormap
    /// calls (e.g. `XSetForeground`) expect.
    pub fn to_rgb24(self) -> u32 {
        (self.r as u32) << 16 | (self.g as u32) << 8 | self.b as u32
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            colors: ThemeColors::default(),
        }
    }
}

impl Default for ThemeColors {
    fn default() -> Self {
        // original_source/config.h: FG_DEFAULT 0xffffff, BG_DEFAULT 0x000000.
        Self {
            background: RgbColor::new(0x00, 0x00, 0x00),
            foreground: RgbColor::new(0xff, 0xff, 0xff),
            cursor: RgbColor::new(0xff, 0xff, 0xff),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_hex_round_trips_to_rgb24() {
        let c = RgbColor::from_hex("#1a2b3c").unwrap();
        assert_eq!(c, RgbColor::new(0x1a, 0x2b, 0x3c));
        assert_eq!(c.to_rgb24(), 0x1a2b3c);
    }

    #[test]
    fn from_hex_rejects_wrong_length() {
        assert!(RgbColor::from_hex("#fff").is_none());
    }

    #[test]
    fn default_matches_source_fg_bg_constants() {
        let t = Theme::default();
        assert_eq!(t.colors.foreground, RgbColor::new(0xff, 0xff, 0xff));
        assert_eq!(t.colors.background, RgbColor::new(0x00, 0x00, 0x00));
    }
}
