//! The unit flowing through both queues: one timestamped snapshot of the
//! monitored port, either because a line changed or because the timebase
//! rolled over.
//!
//! Memory layout:
//! ```text
//! [time_lo:1][time_hi:1][port_state:1][kind:1] = 4 bytes
//! ```
//!
//! An input queue slot holds a sample as a single `u32`, so the producer
//! stores it in one step.

/// Size of one sample in bytes.
pub const SAMPLE_SIZE: usize = 4;

/// `kind` of a sample produced by a timebase rollover (no real transition).
pub const KIND_TICK: u8 = 0;

/// `kind` of a sample produced by a monitored line changing state.
pub const KIND_CAPTURE: u8 = 1;

/// One timestamped capture of the monitored port.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Sample {
    /// Low byte of the 16-bit timebase snapshot.
    pub time_lo: u8,
    /// High byte of the 16-bit timebase snapshot.
    pub time_hi: u8,
    /// Monitored port state at capture time.
    pub port_state: u8,
    /// [`KIND_TICK`] or [`KIND_CAPTURE`].
    pub kind: u8,
}

impl Sample {
    /// All-zero sample, used to initialize queue storage.
    pub const EMPTY: Self = Self {
        time_lo: 0,
        time_hi: 0,
        port_state: 0,
        kind: KIND_TICK,
    };

    /// A sample for a real transition on one of the monitored lines.
    pub const fn capture(
        time: u16,
        port_state: u8,
    ) -> Self {
        Self::new(time, port_state, KIND_CAPTURE)
    }

    /// A sample for a timebase rollover.
    pub const fn tick(
        time: u16,
        port_state: u8,
    ) -> Self {
        Self::new(time, port_state, KIND_TICK)
    }

    /// Build a sample from a full timestamp.
    pub const fn new(
        time: u16,
        port_state: u8,
        kind: u8,
    ) -> Self {
        let [time_lo, time_hi] = time.to_le_bytes();
        Self {
            time_lo,
            time_hi,
            port_state,
            kind,
        }
    }

    /// The 16-bit timestamp reassembled from its halves.
    #[inline]
    pub const fn timestamp(&self) -> u16 { u16::from_le_bytes([self.time_lo, self.time_hi]) }

    /// True for timebase rollover samples.
    #[inline]
    pub const fn is_tick(&self) -> bool { self.kind == KIND_TICK }

    /// Pack into one word (field order matches the memory layout above).
    #[inline]
    pub const fn to_bits(self) -> u32 { u32::from_le_bytes([self.time_lo, self.time_hi, self.port_state, self.kind]) }

    /// Inverse of [`Sample::to_bits`].
    #[inline]
    pub const fn from_bits(bits: u32) -> Self {
        let [time_lo, time_hi, port_state, kind] = bits.to_le_bytes();
        Self {
            time_lo,
            time_hi,
            port_state,
            kind,
        }
    }
}

impl Default for Sample {
    fn default() -> Self { Self::EMPTY }
}
