//! Port state tracking across edge re-arms.
//!
//! Arming an edge wait on RP2350 clears that line's edge flags. A transition
//! landing after the capture read but before the re-arm therefore raises
//! nothing. [`PortWatch`] remembers the state each capture recorded so the
//! edge task can compare it with a fresh read once the waits are armed, and
//! capture straight away when they differ.

use core::cell::Cell;

use sctrace_common::CapturePort;

/// Capture port wrapper recording the last state read by a capture.
pub struct PortWatch<P: CapturePort> {
    port: P,
    last: Cell<u8>,
}

impl<P: CapturePort> PortWatch<P> {
    /// Wrap `port`, taking its current state as the last captured one.
    pub fn new(port: P) -> Self {
        let last = Cell::new(port.read());
        Self { port, last }
    }

    /// State recorded by the most recent capture.
    #[inline]
    pub fn last(&self) -> u8 { self.last.get() }

    /// True when the lines moved since the last capture. Does not record.
    #[inline]
    pub fn changed(&self) -> bool { self.port.read() != self.last.get() }
}

impl<P: CapturePort> CapturePort for PortWatch<P> {
    #[inline(always)]
    fn clear_pending(&self) { self.port.clear_pending(); }

    #[inline(always)]
    fn read(&self) -> u8 {
        let state = self.port.read();
        self.last.set(state);
        state
    }
}
