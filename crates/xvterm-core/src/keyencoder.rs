//! Maps symbolic keys to the byte sequences the shell expects on the PTY.

use crate::port::Key;

/// Translates an [`InputEvent::KeyPress`](crate::port::InputEvent::KeyPress)
/// into the bytes to write to the PTY.
#[derive(Debug, Default, Clone, Copy)]
pub struct KeyEncoder;

impl KeyEncoder {
    pub fn new() -> Self {
        Self
    }

    /// `key` is the symbolic key the input source recognised; `utf8` is
    /// the decoded character bytes it fell back to for anything else.
    pub fn encode(&self, key: Key, utf8: &[u8]) -> Vec<u8> {
        match key {
            Key::Left => b"\x1b[D".to_vec(),
            Key::Right => b"\x1b[C".to_vec(),
            Key::Up => b"\x1b[A".to_vec(),
            Key::Down => b"\x1b[B".to_vec(),
            Key::Other => utf8.to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrow_keys_map_to_csi_sequences() {
        let enc = KeyEncoder::new();
        assert_eq!(enc.encode(Key::Left, b""), b"\x1b[D");
        assert_eq!(enc.encode(Key::Right, b""), b"\x1b[C");
        assert_eq!(enc.encode(Key::Up, b""), b"\x1b[A");
        assert_eq!(enc.encode(Key::Down, b""), b"\x1b[B");
    }

    #[test]
    fn other_keys_pass_through_utf8() {
        let enc = KeyEncoder::new();
        assert_eq!(enc.encode(Key::Other, b"q"), b"q");
    }
}
