//! CSI byte-stream state machine.
//!
//! [`EscParser`] is entered only for the bytes that follow `ESC [`; the
//! caller (the [`crate::terminal::emulator::Terminal`] aggregate) is
//! responsible for recognising the `ESC [` prefix itself. The parser is
//! long-lived: a sequence may straddle two PTY reads, so its internal
//! accumulator is not reset except when a sequence completes or fails.
//!
//! Grounded in `esc_parse` (`original_source/esc.h`), reworked from a
//! whole-buffer `strtol` pass into an incremental `feed_byte` state
//! machine.

use crate::error::ParserError;

/// Pseudo-parameter emitted when a sequence opens with `?`.
pub const QUESTION: i32 = -20_200_905;
/// Pseudo-parameter emitted when a sequence opens with `=`.
pub const EQUAL: i32 = -20_200_906;

/// Hard cap on the raw byte accumulator, matching `ESC_MAX` in the source.
const MAX_RAW: usize = 256;
/// Hard cap on the number of parameters a single sequence may carry.
const MAX_PARAMS: usize = 16;

/// Outcome of feeding one byte to the parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// The sequence is not finished; feed another byte.
    NeedMore,
    /// The final byte was seen; `params` and `raw` describe the whole
    /// sequence (not including the `ESC [` prefix).
    Complete {
        func: u8,
        params: Vec<i32>,
        raw: Vec<u8>,
    },
    /// The sequence is malformed. The parser has already reset itself;
    /// the caller should discard the sequence and surface a warning.
    Error(ParserError),
}

fn is_final_byte(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == 0x7F
}

/// Incremental CSI body parser. Persists across PTY reads.
#[derive(Debug, Default, Clone)]
pub struct EscParser {
    raw: Vec<u8>,
    params: Vec<i32>,
    token: String,
    had_delimiter: bool,
}

impl EscParser {
    pub fn new() -> Self {
        Self::default()
    }

    fn reset(&mut self) {
        self.raw.clear();
        self.params.clear();
        self.token.clear();
        self.had_delimiter = false;
    }

    /// Flush the current numeric token as a completed parameter. An empty
    /// token at a `;` delimiter is simply not supplied, so `param_count`
    /// does not advance and no error is raised here.
    fn flush_token(&mut self) -> Result<(), ParserError> {
        if self.token.is_empty() {
            return Ok(());
        }
        let value: i32 = self.token.parse().map_err(|_| ParserError::IntConv)?;
        if self.params.len() >= MAX_PARAMS {
            return Err(ParserError::TooManyParams);
        }
        self.params.push(value);
        self.token.clear();
        Ok(())
    }

    fn finalize(&mut self, func: u8) -> Decision {
        if !self.token.is_empty() {
            match self.token.parse::<i32>() {
                Ok(value) => {
                    if self.params.len() >= MAX_PARAMS {
                        let err = ParserError::TooManyParams;
                        self.reset();
                        return Decision::Error(err);
                    }
                    self.params.push(value);
                }
                Err(_) => {
                    self.reset();
                    return Decision::Error(ParserError::IntConv);
                }
            }
        } else if self.had_delimiter {
            // A dangling trailing `;` right before the final byte is a
            // parameter slot whose parse fails, distinct from an internal
            // empty run between two `;`.
            self.reset();
            return Decision::Error(ParserError::IntConv);
        }

        let params = std::mem::take(&mut self.params);
        let raw = std::mem::take(&mut self.raw);
        self.reset();
        Decision::Complete { func, params, raw }
    }

    /// Feed one byte of a CSI body (everything after `ESC [`).
    pub fn feed_byte(&mut self, b: u8) -> Decision {
        if self.raw.len() >= MAX_RAW {
            self.reset();
            return Decision::Error(ParserError::BufferOverflow);
        }

        if is_final_byte(b) {
            self.raw.push(b);
            return self.finalize(b);
        }

        match b {
            b';' => {
                self.raw.push(b);
                if let Err(e) = self.flush_token() {
                    self.reset();
                    return Decision::Error(e);
                }
                self.had_delimiter = true;
                Decision::NeedMore
            }
            b'?' => {
                if self.raw.is_empty() {
                    self.raw.push(b);
                    if self.params.len() >= MAX_PARAMS {
                        self.reset();
                        return Decision::Error(ParserError::TooManyParams);
                    }
                    self.params.push(QUESTION);
                    Decision::NeedMore
                } else {
                    self.reset();
                    Decision::Error(ParserError::MisplacedQuestion)
                }
            }
            b'=' => {
                if self.raw.is_empty() {
                    self.raw.push(b);
                    if self.params.len() >= MAX_PARAMS {
                        self.reset();
                        return Decision::Error(ParserError::TooManyParams);
                    }
                    self.params.push(EQUAL);
                    Decision::NeedMore
                } else {
                    self.reset();
                    Decision::Error(ParserError::MisplacedEqual)
                }
            }
            _ => {
                self.raw.push(b);
                self.token.push(b as char);
                Decision::NeedMore
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(parser: &mut EscParser, body: &str) -> Decision {
        let mut last = Decision::NeedMore;
        for b in body.bytes() {
            last = parser.feed_byte(b);
        }
        last
    }

    #[test]
    fn empty_params_before_final() {
        let mut p = EscParser::new();
        match feed(&mut p, "H") {
            Decision::Complete { func, params, .. } => {
                assert_eq!(func, b'H');
                assert!(params.is_empty());
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn simple_params_split_on_semicolon() {
        let mut p = EscParser::new();
        match feed(&mut p, "5;15H") {
            Decision::Complete { func, params, .. } => {
                assert_eq!(func, b'H');
                assert_eq!(params, vec![5, 15]);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn internal_empty_run_is_skipped_not_error() {
        let mut p = EscParser::new();
        match feed(&mut p, "1;;3m") {
            Decision::Complete { params, .. } => assert_eq!(params, vec![1, 3]),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn trailing_semicolon_is_int_conv() {
        let mut p = EscParser::new();
        match feed(&mut p, "5;H") {
            Decision::Error(ParserError::IntConv) => {}
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn leading_question_mark_is_pseudo_param() {
        let mut p = EscParser::new();
        match feed(&mut p, "?25h") {
            Decision::Complete { func, params, .. } => {
                assert_eq!(func, b'h');
                assert_eq!(params, vec![QUESTION, 25]);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn misplaced_question_mark_fails() {
        let mut p = EscParser::new();
        match feed(&mut p, "1;?25h") {
            Decision::Error(ParserError::MisplacedQuestion) => {}
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn raw_round_trips_through_complete() {
        let mut p = EscParser::new();
        let body = "38;2;10;20;30m";
        match feed(&mut p, body) {
            Decision::Complete { raw, .. } => assert_eq!(raw, body.as_bytes()),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn parser_resets_after_error_and_accepts_next_sequence() {
        let mut p = EscParser::new();
        feed(&mut p, "1;?25h");
        match feed(&mut p, "31m") {
            Decision::Complete { func, params, .. } => {
                assert_eq!(func, b'm');
                assert_eq!(params, vec![31]);
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
