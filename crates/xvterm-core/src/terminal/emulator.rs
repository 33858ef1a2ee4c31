//! The `Terminal` aggregate: the explicit owner of the grid, the escape
//! parser, and the UTF-8 decoder that the source instead kept as
//! module-level globals. The event loop holds one `Terminal` and feeds it
//! PTY bytes as they arrive; all of its methods are pure transformations
//! over in-memory state — no I/O happens here.

use crate::config::theme::Theme;
use crate::error::ParserError;
use crate::grid::{EraseRegion, Grid};
use crate::parser::{self, Decision, EscParser};
use crate::sgr::SgrInterpreter;
use crate::utf8::{DecodeResult, Utf8Decoder};

fn default_param(params: &[i32], idx: usize, default: i32) -> i32 {
    params.get(idx).copied().unwrap_or(default)
}

/// Owns the grid, the (long-lived) escape parser, and the UTF-8 decoder.
/// A sequence may straddle two calls to [`Terminal::process`]; the
/// escape-parser and pending-bytes state persist across calls.
pub struct Terminal {
    pub grid: Grid,
    parser: EscParser,
    decoder: Utf8Decoder,
    sgr: SgrInterpreter,
    pending: Vec<u8>,
    in_escape: bool,
    in_csi: bool,
}

impl Terminal {
    pub fn new(cols: usize, rows: usize, theme: &Theme) -> Self {
        Self {
            grid: Grid::new(cols, rows, theme),
            parser: EscParser::new(),
            decoder: Utf8Decoder::new(),
            sgr: SgrInterpreter::new(),
            pending: Vec::new(),
            in_escape: false,
            in_csi: false,
        }
    }

    pub fn resize(&mut self, cols: usize, rows: usize) {
        self.grid.resize(cols, rows);
    }

    /// Feed a chunk of bytes read from the PTY. Byte order is preserved
    /// end-to-end; any trailing partial UTF-8 sequence is retained for
    /// the next call.
    pub fn process(&mut self, bytes: &[u8]) {
        self.pending.extend_from_slice(bytes);

        let mut i = 0;
        while i < self.pending.len() {
            if self.in_csi {
                let b = self.pending[i];
                i += 1;
                match self.parser.feed_byte(b) {
                    Decision::NeedMore => {}
                    Decision::Complete { func, params, .. } => {
                        self.in_csi = false;
                        self.dispatch_csi(func, &params);
                    }
                    Decision::Error(e) => {
                        self.in_csi = false;
                        self.warn_parser_error(e);
                    }
                }
                continue;
            }

            if self.in_escape {
                let b = self.pending[i];
                i += 1;
                self.in_escape = false;
                if b == b'[' {
                    self.in_csi = true;
                }
                // Any other byte following ESC (OSC, charset switches,
                // ...) is outside this core's scope and is dropped.
                continue;
            }

            let b = self.pending[i];
            match b {
                0x07 => {
                    if self.grid.bell() {
                        tracing::debug!("bell");
                    }
                    i += 1;
                }
                0x08 => {
                    self.grid.backspace();
                    i += 1;
                }
                0x09 => {
                    self.grid.tab();
                    i += 1;
                }
                0x0D => {
                    self.grid.carriage_return();
                    i += 1;
                }
                0x0A => {
                    self.grid.line_feed();
                    i += 1;
                }
                0x1B => {
                    self.in_escape = true;
                    i += 1;
                }
                _ => match self.decoder.decode_next(&self.pending[i..]) {
                    DecodeResult::NeedMore => break,
                    DecodeResult::Decoded {
                        codepoint,
                        bytes_consumed,
                    } => {
                        self.grid.putchar(codepoint);
                        i += bytes_consumed;
                    }
                },
            }
        }

        self.pending.drain(..i);
    }

    fn warn_parser_error(&self, e: ParserError) {
        tracing::warn!(error = %e, "malformed CSI sequence, discarded");
    }

    fn dispatch_csi(&mut self, func: u8, params: &[i32]) {
        match func {
            b'H' | b'f' => {
                let row = default_param(params, 0, 0).max(0) as usize;
                let col = default_param(params, 1, 0).max(0) as usize;
                self.grid.move_cursor_to(col, row);
            }
            b'A' => self.grid.move_cursor_by(0, -(default_param(params, 0, 1) as i64)),
            b'B' => self.grid.move_cursor_by(0, default_param(params, 0, 1) as i64),
            b'C' => self.grid.move_cursor_by(default_param(params, 0, 1) as i64, 0),
            b'D' => self.grid.move_cursor_by(-(default_param(params, 0, 1) as i64), 0),
            b'E' => self.grid.next_line(default_param(params, 0, 1) as i64),
            b'F' => self.grid.prev_line(default_param(params, 0, 1) as i64),
            b'G' => {
                // Missing parameter defaults to column 1, like the relative
                // cursor motions, not to 0 like `H`/`f`.
                let col = default_param(params, 0, 1).max(0) as usize;
                self.grid.set_column(col);
            }
            b'J' => self
                .grid
                .erase_screen(EraseRegion::from_param(default_param(params, 0, 0))),
            b'K' => self
                .grid
                .erase_line(EraseRegion::from_param(default_param(params, 0, 0))),
            b'm' => {
                let outcome = self.sgr.run(params);
                self.grid.apply_sgr(outcome);
            }
            b'h' | b'l' => {
                let visible = func == b'h';
                if params == [parser::QUESTION, 25] {
                    self.grid.set_cursor_visible(visible);
                }
                // [QUESTION, 2004] (bracketed paste) and anything else:
                // no-op, out of scope for this core.
            }
            b's' | b'u' => { /* save/restore cursor: no-op in this minimal core */ }
            b'R' => { /* cursor position report: ignored */ }
            0x7F => { /* delete: no-op placeholder */ }
            other => {
                tracing::warn!(func = %(other as char), "unknown CSI final byte, ignored");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn term(w: usize, h: usize) -> Terminal {
        Terminal::new(w, h, &Theme::default())
    }

    #[test]
    fn reset_and_coloured_text() {
        let mut t = term(10, 2);
        t.process(b"\x1b[0m\x1b[31mhi");
        assert_eq!(t.grid.cursor().x, 2);
        assert_eq!(t.grid.cursor().y, 0);
        assert_eq!(t.grid.cell(0, 0).codepoint, 'h' as u32);
        assert_eq!(t.grid.cell(1, 0).codepoint, 'i' as u32);
        assert_eq!(t.grid.cell(0, 0).fg, crate::sgr::PALETTE8[1]);
        assert_eq!(t.grid.cell(1, 0).fg, crate::sgr::PALETTE8[1]);
    }

    #[test]
    fn cursor_home() {
        let mut t = term(10, 2);
        t.process(b"abc\x1b[HX");
        assert_eq!(t.grid.cursor().x, 1);
        assert_eq!(t.grid.cursor().y, 0);
        assert_eq!(t.grid.cell(0, 0).codepoint, 'X' as u32);
        assert_eq!(t.grid.cell(1, 0).codepoint, 'b' as u32);
        assert_eq!(t.grid.cell(2, 0).codepoint, 'c' as u32);
    }

    #[test]
    fn truecolor_sets_exact_rgb() {
        let mut t = term(10, 2);
        t.process(b"\x1b[38;2;10;20;30mQ");
        assert_eq!(
            t.grid.cell(0, 0).fg,
            crate::config::theme::RgbColor::new(10, 20, 30)
        );
        assert_eq!(t.grid.cell(0, 0).codepoint, 'Q' as u32);
    }

    #[test]
    fn erase_to_end_of_line() {
        let mut t = term(10, 2);
        t.process(b"hello");
        t.grid.move_cursor_to(2, 0);
        t.process(b"\x1b[0K");
        assert_eq!(t.grid.cell(0, 0).codepoint, 'h' as u32);
        assert_eq!(t.grid.cell(1, 0).codepoint, 'e' as u32);
        assert!(t.grid.cell(2, 0).is_empty());
        assert!(t.grid.cell(3, 0).is_empty());
        assert!(t.grid.cell(4, 0).is_empty());
    }

    #[test]
    fn utf8_round_trip() {
        let mut t = term(10, 2);
        t.process(&[0xE2, 0x98, 0x83]);
        assert_eq!(t.grid.cell(0, 0).codepoint, 0x2603);
        assert_eq!(t.grid.cursor().x, 1);
    }

    #[test]
    fn sequence_straddling_two_reads_still_parses() {
        let mut t = term(10, 2);
        t.process(b"\x1b[3");
        t.process(b"1mX");
        assert_eq!(t.grid.cell(0, 0).fg, crate::sgr::PALETTE8[1]);
        assert_eq!(t.grid.cell(0, 0).codepoint, 'X' as u32);
    }

    #[test]
    fn misplaced_question_mark_does_not_mutate_grid() {
        let mut t = term(10, 2);
        t.process(b"\x1b[1;?25h");
        assert!(t.grid.cell(0, 0).is_empty());
        assert_eq!(t.grid.cursor().x, 0);
    }

    #[test]
    fn cursor_column_with_no_param_defaults_to_one() {
        let mut t = term(10, 2);
        t.process(b"abc\x1b[GX");
        assert_eq!(t.grid.cursor().x, 2);
        assert_eq!(t.grid.cell(0, 0).codepoint, 'a' as u32);
        assert_eq!(t.grid.cell(1, 0).codepoint, 'X' as u32);
    }

    #[test]
    fn cursor_visibility_toggle() {
        let mut t = term(10, 2);
        assert!(t.grid.cursor_visible());
        t.process(b"\x1b[?25l");
        assert!(!t.grid.cursor_visible());
        t.process(b"\x1b[?25h");
        assert!(t.grid.cursor_visible());
    }
}
