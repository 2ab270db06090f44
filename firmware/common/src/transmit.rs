//! The debug channel seam and the one-character transmit pump.
//!
//! The channel is whatever carries text to the host: a UART on the Pico 2,
//! stdout in the simulator. The tracer never waits on it. Each main-loop
//! pass sends at most one character, and only when the channel says it can
//! take one without blocking.

use crate::format::LineBuffer;

/// Character-oriented output channel with a readiness signal.
pub trait DebugChannel {
    /// Failure reported by [`put_char`](Self::put_char).
    type Error;

    /// True once the channel is usable. Polled at startup.
    fn is_configured(&mut self) -> bool { true }

    /// True if one character can be accepted without blocking.
    fn is_ready(&mut self) -> bool;

    /// Queue one character. Only called after [`is_ready`](Self::is_ready)
    /// returned true.
    fn put_char(
        &mut self,
        byte: u8,
    ) -> Result<(), Self::Error>;

    /// Cooperative hook, called once per main-loop pass so buffered output
    /// can flush without an interrupt of its own.
    fn service(&mut self) {}
}

/// Spin until `channel` reports configured, servicing it while waiting.
pub fn wait_configured<C: DebugChannel>(channel: &mut C) {
    while !channel.is_configured() {
        channel.service();
    }
}

/// Moves characters from the line buffer to the channel.
#[derive(Default)]
pub struct Transmitter {
    sent: u32,
    errors: u32,
}

impl Transmitter {
    /// Fresh transmitter with zeroed counters.
    pub const fn new() -> Self { Self { sent: 0, errors: 0 } }

    /// Send at most one character from `line`.
    ///
    /// Returns true if a character left the buffer. A rejected character
    /// stays in the buffer and is offered again on the next pass.
    pub fn pump<C: DebugChannel>(
        &mut self,
        line: &mut LineBuffer,
        channel: &mut C,
    ) -> bool {
        let Some(byte) = line.peek() else {
            return false;
        };

        if !channel.is_ready() {
            return false;
        }

        match channel.put_char(byte) {
            Ok(()) => {
                line.advance();
                self.sent = self.sent.wrapping_add(1);
                true
            }
            Err(_) => {
                self.errors = self.errors.wrapping_add(1);
                false
            }
        }
    }

    /// Characters sent since start.
    #[inline]
    pub const fn sent(&self) -> u32 { self.sent }

    /// Rejected `put_char` calls since start.
    #[inline]
    pub const fn errors(&self) -> u32 { self.errors }
}
