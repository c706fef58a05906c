//! Codepoint source with single-codepoint pushback
//!
//! Decodes a byte stream into unicode scalar values one at a time. The core
//! never needs more than one codepoint of lookahead, so the only rewind
//! mechanism is a single held-back codepoint slot.

use crate::error::{CsvError, Result};
use std::io::{BufReader, ErrorKind, Read};

/// Emitted in place of byte sequences that are not valid UTF-8
const REPLACEMENT: char = '\u{FFFD}';

/// UTF-8 decoder over any byte stream, with room to un-read exactly one
/// codepoint.
pub(crate) struct CodepointSource<R: Read> {
    reader: BufReader<R>,
    pending: Option<char>,
    /// A byte that turned out not to continue a multi-byte sequence; it
    /// starts the next one and is re-examined on the following read.
    pending_byte: Option<u8>,
}

impl<R: Read> CodepointSource<R> {
    pub(crate) fn new(reader: R) -> Self {
        CodepointSource {
            reader: BufReader::new(reader),
            pending: None,
            pending_byte: None,
        }
    }

    /// Read the next codepoint, or `None` at end of stream.
    ///
    /// Invalid UTF-8 decodes to U+FFFD instead of failing. A non-continuation
    /// byte found inside a multi-byte sequence is not swallowed: it is fed
    /// back as the start of the next sequence.
    pub(crate) fn next_codepoint(&mut self) -> Result<Option<char>> {
        if let Some(c) = self.pending.take() {
            return Ok(Some(c));
        }

        let mut buf = [0u8; 4];
        buf[0] = match self.next_byte()? {
            Some(b) => b,
            None => return Ok(None),
        };

        let len = match buf[0] {
            0x00..=0x7F => return Ok(Some(buf[0] as char)),
            0xC0..=0xDF => 2,
            0xE0..=0xEF => 3,
            0xF0..=0xF7 => 4,
            // Stray continuation byte or invalid lead byte
            _ => return Ok(Some(REPLACEMENT)),
        };

        for slot in buf.iter_mut().take(len).skip(1) {
            match self.next_byte()? {
                Some(b) if b & 0xC0 == 0x80 => *slot = b,
                Some(b) => {
                    self.pending_byte = Some(b);
                    return Ok(Some(REPLACEMENT));
                }
                // Stream ended in the middle of the sequence
                None => return Ok(Some(REPLACEMENT)),
            }
        }

        match std::str::from_utf8(&buf[..len]).ok().and_then(|s| s.chars().next()) {
            Some(c) => Ok(Some(c)),
            None => Ok(Some(REPLACEMENT)),
        }
    }

    /// Look at the next codepoint without consuming it.
    pub(crate) fn peek(&mut self) -> Result<Option<char>> {
        let next = self.next_codepoint()?;
        if let Some(c) = next {
            self.pending = Some(c);
        }
        Ok(next)
    }

    /// Un-read one codepoint. The slot holds at most one codepoint.
    pub(crate) fn push_back(&mut self, c: char) {
        debug_assert!(self.pending.is_none(), "pushback slot already occupied");
        self.pending = Some(c);
    }

    /// Read one byte, honoring the re-fed byte slot first. Returns `None` at
    /// end of stream.
    fn next_byte(&mut self) -> Result<Option<u8>> {
        if let Some(b) = self.pending_byte.take() {
            return Ok(Some(b));
        }
        let mut buf = [0u8; 1];
        loop {
            match self.reader.read(&mut buf) {
                Ok(0) => return Ok(None),
                Ok(_) => return Ok(Some(buf[0])),
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) => {
                    return Err(CsvError::ReadError(format!("failed to read input: {}", e)))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(bytes: &[u8]) -> CodepointSource<&[u8]> {
        CodepointSource::new(bytes)
    }

    fn drain(src: &mut CodepointSource<&[u8]>) -> String {
        let mut out = String::new();
        while let Some(c) = src.next_codepoint().unwrap() {
            out.push(c);
        }
        out
    }

    #[test]
    fn test_ascii() {
        let mut src = source(b"abc");
        assert_eq!(drain(&mut src), "abc");
        assert_eq!(src.next_codepoint().unwrap(), None);
    }

    #[test]
    fn test_multibyte() {
        let mut src = source("héllo\u{FEFF}日本".as_bytes());
        assert_eq!(drain(&mut src), "héllo\u{FEFF}日本");
    }

    #[test]
    fn test_pushback_restores_front() {
        let mut src = source(b"ab");
        let a = src.next_codepoint().unwrap().unwrap();
        assert_eq!(a, 'a');
        src.push_back('a');
        assert_eq!(src.next_codepoint().unwrap(), Some('a'));
        assert_eq!(src.next_codepoint().unwrap(), Some('b'));
    }

    #[test]
    fn test_peek_does_not_consume() {
        let mut src = source(b"xy");
        assert_eq!(src.peek().unwrap(), Some('x'));
        assert_eq!(src.peek().unwrap(), Some('x'));
        assert_eq!(src.next_codepoint().unwrap(), Some('x'));
        assert_eq!(src.next_codepoint().unwrap(), Some('y'));
    }

    #[test]
    fn test_peek_at_eof() {
        let mut src = source(b"");
        assert_eq!(src.peek().unwrap(), None);
        assert_eq!(src.next_codepoint().unwrap(), None);
    }

    #[test]
    fn test_invalid_utf8_replaced() {
        // Lone continuation byte, then a truncated two-byte sequence
        let mut src = source(&[0x80, b'a', 0xC3]);
        assert_eq!(src.next_codepoint().unwrap(), Some('\u{FFFD}'));
        assert_eq!(src.next_codepoint().unwrap(), Some('a'));
        assert_eq!(src.next_codepoint().unwrap(), Some('\u{FFFD}'));
        assert_eq!(src.next_codepoint().unwrap(), None);
    }

    #[test]
    fn test_bad_lead_does_not_swallow_next_codepoint() {
        // The byte after the bad lead is not a continuation byte; it must
        // come through as its own codepoint.
        let mut src = source(&[0xC3, b';', b'a']);
        assert_eq!(src.next_codepoint().unwrap(), Some('\u{FFFD}'));
        assert_eq!(src.next_codepoint().unwrap(), Some(';'));
        assert_eq!(src.next_codepoint().unwrap(), Some('a'));
        assert_eq!(src.next_codepoint().unwrap(), None);
    }

    #[test]
    fn test_truncated_three_byte_sequence_refeeds_ascii() {
        // Three-byte lead with one continuation byte, then ASCII
        let mut src = source(&[0xE2, 0x82, b'x']);
        assert_eq!(src.next_codepoint().unwrap(), Some('\u{FFFD}'));
        assert_eq!(src.next_codepoint().unwrap(), Some('x'));
        assert_eq!(src.next_codepoint().unwrap(), None);
    }
}
