//! Renders samples as hex text for the debug channel.
//!
//! # Wire format
//!
//! ```text
//! sctrace v1.01
//! 013AF01 0140F00 ... (10 groups per line, space separated)
//! ```
//!
//! Each group is `HHLLPPK`: timestamp high byte, timestamp low byte, port
//! state, then one flag digit (bit 0 of `kind`: `1` capture, `0` tick).
//! Hex digits are uppercase.

use crate::config::{ITEMS_PER_LINE, LINE_BUFFER_LEN};
use crate::sample::Sample;

/// Characters in one rendered group, separator excluded.
pub const GROUP_LEN: usize = 7;

/// Uppercase hex digit for the low nibble of `v`.
#[inline]
pub const fn hex_digit(v: u8) -> u8 {
    let v = v & 0x0F;
    if v < 10 { b'0' + v } else { b'A' + v - 10 }
}

/// Value of one uppercase hex digit.
const fn hex_value(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

// =============================================================================
// Line Buffer
// =============================================================================

/// Small text buffer drained one character at a time by the transmitter.
///
/// The text is always followed by a zero sentinel; the buffer counts as
/// drained when the cursor sits on it.
pub struct LineBuffer {
    buf: [u8; LINE_BUFFER_LEN],
    idx: usize,
}

impl LineBuffer {
    /// Empty (already drained) buffer.
    pub const fn new() -> Self {
        Self {
            buf: [0; LINE_BUFFER_LEN],
            idx: 0,
        }
    }

    /// Replace the contents with `text` and rewind the cursor.
    ///
    /// Text longer than the buffer is truncated to leave room for the
    /// sentinel; a zero byte in `text` ends it early.
    pub fn load(
        &mut self,
        text: &[u8],
    ) {
        let len = text.len().min(LINE_BUFFER_LEN - 1);
        self.buf[..len].copy_from_slice(&text[..len]);
        self.buf[len] = 0;
        self.idx = 0;
    }

    /// Next character to send, or `None` once drained.
    #[inline]
    pub fn peek(&self) -> Option<u8> {
        match self.buf[self.idx] {
            0 => None,
            c => Some(c),
        }
    }

    /// Step past the character returned by [`peek`](Self::peek).
    ///
    /// Never moves past the sentinel.
    #[inline]
    pub fn advance(&mut self) {
        if self.buf[self.idx] != 0 {
            self.idx += 1;
        }
    }

    /// True when every character has been consumed.
    #[inline]
    pub fn is_drained(&self) -> bool { self.buf[self.idx] == 0 }

    /// Characters not yet consumed.
    pub fn pending(&self) -> &[u8] {
        let end = self.buf[self.idx..].iter().position(|&c| c == 0).map_or(LINE_BUFFER_LEN, |p| self.idx + p);
        &self.buf[self.idx..end]
    }
}

impl Default for LineBuffer {
    fn default() -> Self { Self::new() }
}

// =============================================================================
// Formatter
// =============================================================================

/// Sample-to-text renderer with the line-break counter.
pub struct Formatter {
    remaining: u8,
}

impl Formatter {
    /// Formatter at the start of a line.
    pub const fn new() -> Self { Self { remaining: ITEMS_PER_LINE } }

    /// Render `sample` into `line`, replacing its contents.
    ///
    /// The separator is a space, except after every [`ITEMS_PER_LINE`]-th
    /// group where it is a newline and the line count restarts.
    pub fn render(
        &mut self,
        sample: &Sample,
        line: &mut LineBuffer,
    ) {
        let mut text = [0u8; GROUP_LEN + 1];
        text[0] = hex_digit(sample.time_hi >> 4);
        text[1] = hex_digit(sample.time_hi);
        text[2] = hex_digit(sample.time_lo >> 4);
        text[3] = hex_digit(sample.time_lo);
        text[4] = hex_digit(sample.port_state >> 4);
        text[5] = hex_digit(sample.port_state);
        text[6] = hex_digit(sample.kind & 0x01);

        self.remaining -= 1;
        text[GROUP_LEN] = if self.remaining == 0 {
            self.remaining = ITEMS_PER_LINE;
            b'\n'
        } else {
            b' '
        };

        line.load(&text);
    }

    /// Groups left before the next line break.
    #[inline]
    pub const fn remaining(&self) -> u8 { self.remaining }
}

impl Default for Formatter {
    fn default() -> Self { Self::new() }
}

/// One group parsed back from the text stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Group {
    pub timestamp: u16,
    pub port_state: u8,
    pub capture: bool,
}

/// Parse a rendered `HHLLPPK` group.
///
/// Returns `None` for anything that is not seven uppercase hex digits with
/// a `0`/`1` flag.
pub fn parse_group(text: &[u8]) -> Option<Group> {
    if text.len() != GROUP_LEN {
        return None;
    }

    let mut digits = [0u8; GROUP_LEN];
    for (digit, &c) in digits.iter_mut().zip(text) {
        *digit = hex_value(c)?;
    }

    let byte = |i: usize| (digits[i] << 4) | digits[i + 1];
    let capture = match digits[6] {
        0 => false,
        1 => true,
        _ => return None,
    };

    Some(Group {
        timestamp: u16::from_be_bytes([byte(0), byte(2)]),
        port_state: byte(4),
        capture,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::{KIND_CAPTURE, KIND_TICK};

    fn drain(line: &mut LineBuffer) -> String {
        let mut out = String::new();
        while let Some(c) = line.peek() {
            out.push(c as char);
            line.advance();
        }
        out
    }

    #[test]
    fn test_hex_digit() {
        assert_eq!(hex_digit(0), b'0');
        assert_eq!(hex_digit(9), b'9');
        assert_eq!(hex_digit(10), b'A');
        assert_eq!(hex_digit(15), b'F');
        assert_eq!(hex_digit(0xA7), b'7');
    }

    #[test]
    fn test_render_group() {
        let mut formatter = Formatter::new();
        let mut line = LineBuffer::new();

        let sample = Sample {
            time_lo: 0x3A,
            time_hi: 0x01,
            port_state: 0xF0,
            kind: KIND_CAPTURE,
        };
        formatter.render(&sample, &mut line);

        assert_eq!(drain(&mut line), "013AF01 ");
    }

    #[test]
    fn test_render_tick_flag() {
        let mut formatter = Formatter::new();
        let mut line = LineBuffer::new();

        formatter.render(&Sample::new(0xBEEF, 0x0C, KIND_TICK), &mut line);
        assert_eq!(drain(&mut line), "BEEF0C0 ");
    }

    #[test]
    fn test_line_break_cadence() {
        let mut formatter = Formatter::new();
        let mut line = LineBuffer::new();

        for round in 0..3 {
            for i in 1..=ITEMS_PER_LINE {
                formatter.render(&Sample::capture(u16::from(i), 0), &mut line);
                let text = drain(&mut line);
                let expected = if i == ITEMS_PER_LINE { '\n' } else { ' ' };
                assert_eq!(text.chars().last(), Some(expected), "round {round}, item {i}");
            }
            assert_eq!(formatter.remaining(), ITEMS_PER_LINE);
        }
    }

    #[test]
    fn test_line_buffer_sentinel() {
        let mut line = LineBuffer::new();
        assert!(line.is_drained());
        assert_eq!(line.peek(), None);

        line.load(b"ab");
        assert!(!line.is_drained());
        assert_eq!(line.pending(), b"ab");

        line.advance();
        line.advance();
        assert!(line.is_drained());

        // Advancing on the sentinel is a no-op
        line.advance();
        assert!(line.is_drained());
        assert_eq!(line.pending(), b"");
    }

    #[test]
    fn test_line_buffer_truncates() {
        let mut line = LineBuffer::new();
        line.load(&[b'x'; 40]);
        assert_eq!(line.pending().len(), LINE_BUFFER_LEN - 1);
    }

    #[test]
    fn test_parse_group() {
        assert_eq!(
            parse_group(b"013AF01"),
            Some(Group {
                timestamp: 0x013A,
                port_state: 0xF0,
                capture: true,
            })
        );
        assert_eq!(parse_group(b"0000FF0").map(|g| g.capture), Some(false));
        assert_eq!(parse_group(b"013AF02"), None);
        assert_eq!(parse_group(b"013af01"), None);
        assert_eq!(parse_group(b"013AF0"), None);
    }

    #[test]
    fn test_render_then_parse() {
        let mut formatter = Formatter::new();
        let mut line = LineBuffer::new();
        let sample = Sample::capture(0x8001, 0x5A);

        formatter.render(&sample, &mut line);
        let group = parse_group(&line.pending()[..GROUP_LEN]).unwrap();

        assert_eq!(group.timestamp, sample.timestamp());
        assert_eq!(group.port_state, sample.port_state);
        assert!(group.capture);
    }
}
