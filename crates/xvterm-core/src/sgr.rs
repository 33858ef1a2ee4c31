//! SGR (Select Graphic Rendition) parameter reduction.
//!
//! Converts the parameter list of a CSI `m` call into a `(fg, bg, attrs)`
//! delta. Grounded in `esc_parse_gfx` (`original_source/esc.h`), with one
//! deliberate deviation from the source: SGR code `1` sets `BOLD` here
//! (the source's `esc_parse_gfx` has both `1` and `4` falling through to
//! `ESC_GFX_UNDERLINE`; bold and underline are kept distinct instead).

use crate::cell::TermAttrs;
use crate::config::theme::RgbColor;

/// A delta produced for one of the colour properties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Delta<T> {
    #[default]
    NoChange,
    Reset,
    Value(T),
}

/// The delta produced for the attribute bitset. Unlike colours, attribute
/// codes accumulate bit-by-bit rather than replacing the register
/// wholesale, so `Or` and `Replace` are distinguished: a plain `ESC[1m`
/// must OR `BOLD` into whatever attributes are already set, while
/// `ESC[0;1m` must first clear the register, then set `BOLD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AttrsDelta {
    #[default]
    NoChange,
    Or(TermAttrs),
    Replace(TermAttrs),
}

/// The standard 8 VT colours at half intensity, matching
/// `original_source/config.h`'s `esc_palette_8` exactly.
pub const PALETTE8: [RgbColor; 8] = [
    RgbColor::new(0x00, 0x00, 0x00), // black
    RgbColor::new(0x99, 0x00, 0x00), // red
    RgbColor::new(0x00, 0x99, 0x00), // green
    RgbColor::new(0x99, 0x99, 0x00), // yellow
    RgbColor::new(0x00, 0x00, 0x99), // blue
    RgbColor::new(0x99, 0x00, 0x99), // magenta
    RgbColor::new(0x00, 0x99, 0x99), // cyan
    RgbColor::new(0xff, 0xff, 0xff), // white
];

/// The same 8 colours at full intensity, matching `esc_palette_8_bright`.
pub const PALETTE8_BRIGHT: [RgbColor; 8] = [
    RgbColor::new(0x00, 0x00, 0x00), // black
    RgbColor::new(0xff, 0x00, 0x00), // red
    RgbColor::new(0x00, 0xff, 0x00), // green
    RgbColor::new(0xff, 0xff, 0x00), // yellow
    RgbColor::new(0x00, 0x00, 0xff), // blue
    RgbColor::new(0xff, 0x00, 0xff), // magenta
    RgbColor::new(0x00, 0xff, 0xff), // cyan
    RgbColor::new(0xff, 0xff, 0xff), // white
];

/// Resolve a 256-colour palette index to RGB24, following the xterm
/// convention (6×6×6 colour cube + 24-step greyscale ramp). The source's
/// `esc_palette_256` is a `{0,1,2,3}` placeholder; this fills it in with
/// the standard xterm table, the only deterministic convention available.
pub fn index_256_to_rgb(index: u8) -> RgbColor {
    const CUBE_STEPS: [u8; 6] = [0x00, 0x5F, 0x87, 0xAF, 0xD7, 0xFF];

    match index {
        0..=7 => PALETTE8[index as usize],
        8..=15 => PALETTE8_BRIGHT[(index - 8) as usize],
        16..=231 => {
            let i = index - 16;
            let r = i / 36;
            let g = (i % 36) / 6;
            let b = i % 6;
            RgbColor::new(
                CUBE_STEPS[r as usize],
                CUBE_STEPS[g as usize],
                CUBE_STEPS[b as usize],
            )
        }
        232..=255 => {
            let level = 8 + (index - 232) * 10;
            RgbColor::new(level, level, level)
        }
    }
}

/// The decoded effect of one SGR call: independent deltas for foreground,
/// background, and the text-attribute bitset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SgrOutcome {
    pub fg: Delta<RgbColor>,
    pub bg: Delta<RgbColor>,
    pub attrs: AttrsDelta,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Affects {
    Fg,
    Bg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColourMode {
    None,
    /// Expecting a single palette-256 index parameter.
    Indexed,
    /// Expecting `expect` more of R, G, B in that order.
    Truecolor { expect: u8, r: u8, g: u8 },
}

/// Reduces one SGR parameter list to a `(fg, bg, attrs)` delta.
///
/// Transient: a fresh instance is driven once per SGR call via
/// [`SgrInterpreter::run`]; it carries no state across calls.
#[derive(Debug, Default)]
pub struct SgrInterpreter;

impl SgrInterpreter {
    pub fn new() -> Self {
        Self
    }

    /// Interpret `params` (the parameter list of an `ESC[...m` call).
    pub fn run(&self, params: &[i32]) -> SgrOutcome {
        let mut out = SgrOutcome::default();

        if params.is_empty() {
            out.fg = Delta::Reset;
            out.bg = Delta::Reset;
            out.attrs = AttrsDelta::Replace(TermAttrs::empty());
            return out;
        }

        let mut affects = Affects::Fg;
        let mut mode = ColourMode::None;
        let mut attrs = TermAttrs::empty();
        let mut reset_seen = false;

        for &p in params {
            match mode {
                ColourMode::None => match p {
                    0 => {
                        out.fg = Delta::Reset;
                        out.bg = Delta::Reset;
                        reset_seen = true;
                        attrs = TermAttrs::empty();
                    }
                    1 => attrs |= TermAttrs::BOLD,
                    3 => attrs |= TermAttrs::ITALIC,
                    4 => attrs |= TermAttrs::UNDERLINE,
                    30..=37 => out.fg = Delta::Value(PALETTE8[(p - 30) as usize]),
                    40..=47 => out.bg = Delta::Value(PALETTE8[(p - 40) as usize]),
                    90..=97 => out.fg = Delta::Value(PALETTE8_BRIGHT[(p - 90) as usize]),
                    100..=107 => out.bg = Delta::Value(PALETTE8_BRIGHT[(p - 100) as usize]),
                    38 => affects = Affects::Fg,
                    48 => affects = Affects::Bg,
                    2 => {
                        mode = ColourMode::Truecolor {
                            expect: 3,
                            r: 0,
                            g: 0,
                        };
                    }
                    5 => mode = ColourMode::Indexed,
                    _ => { /* unknown SGR code: silently ignored */ }
                },
                ColourMode::Indexed => {
                    let rgb = index_256_to_rgb(p.clamp(0, 255) as u8);
                    match affects {
                        Affects::Fg => out.fg = Delta::Value(rgb),
                        Affects::Bg => out.bg = Delta::Value(rgb),
                    }
                    mode = ColourMode::None;
                }
                ColourMode::Truecolor { expect, r, g } => {
                    let channel = p.clamp(0, 255) as u8;
                    match expect {
                        3 => {
                            mode = ColourMode::Truecolor {
                                expect: 2,
                                r: channel,
                                g: 0,
                            };
                        }
                        2 => {
                            mode = ColourMode::Truecolor {
                                expect: 1,
                                r,
                                g: channel,
                            };
                        }
                        1 => {
                            let rgb = RgbColor::new(r, g, channel);
                            match affects {
                                Affects::Fg => out.fg = Delta::Value(rgb),
                                Affects::Bg => out.bg = Delta::Value(rgb),
                            }
                            mode = ColourMode::None;
                        }
                        _ => mode = ColourMode::None,
                    }
                }
            }
        }

        out.attrs = if reset_seen {
            AttrsDelta::Replace(attrs)
        } else if attrs.is_empty() {
            AttrsDelta::NoChange
        } else {
            AttrsDelta::Or(attrs)
        };

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_params_is_full_reset() {
        let out = SgrInterpreter::new().run(&[]);
        assert_eq!(out.fg, Delta::Reset);
        assert_eq!(out.bg, Delta::Reset);
        assert_eq!(out.attrs, AttrsDelta::Replace(TermAttrs::empty()));
    }

    #[test]
    fn basic_fg_colour() {
        let out = SgrInterpreter::new().run(&[31]);
        assert_eq!(out.fg, Delta::Value(RgbColor::new(0x99, 0x00, 0x00)));
        assert_eq!(out.bg, Delta::NoChange);
    }

    #[test]
    fn truecolor_fg() {
        let out = SgrInterpreter::new().run(&[38, 2, 10, 20, 30]);
        assert_eq!(out.fg, Delta::Value(RgbColor::new(10, 20, 30)));
    }

    #[test]
    fn indexed_256_bg() {
        let out = SgrInterpreter::new().run(&[48, 5, 196]);
        assert_eq!(out.bg, Delta::Value(index_256_to_rgb(196)));
    }

    #[test]
    fn bold_italic_underline_combine() {
        let out = SgrInterpreter::new().run(&[1, 3, 4]);
        match out.attrs {
            AttrsDelta::Or(bits) => {
                assert!(bits.contains(TermAttrs::BOLD));
                assert!(bits.contains(TermAttrs::ITALIC));
                assert!(bits.contains(TermAttrs::UNDERLINE));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn reset_then_bold_replaces_register() {
        let out = SgrInterpreter::new().run(&[0, 1]);
        assert_eq!(out.attrs, AttrsDelta::Replace(TermAttrs::BOLD));
    }

    #[test]
    fn unknown_code_is_ignored() {
        let out = SgrInterpreter::new().run(&[31, 999, 1]);
        assert_eq!(out.fg, Delta::Value(PALETTE8[1]));
        assert_eq!(out.attrs, AttrsDelta::Or(TermAttrs::BOLD));
    }

    #[test]
    fn is_pure_function_of_params() {
        let interp = SgrInterpreter::new();
        let a = interp.run(&[31, 1]);
        let b = interp.run(&[31, 1]);
        assert_eq!(a, b);
    }
}
