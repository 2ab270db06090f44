//! Lock-free single-producer/single-consumer hand-off out of interrupt context.
//!
//! # Architecture
//!
//! ```text
//! capture ISR ──write()──▶ [S0][S1]..[S63] ──pop()──▶ main loop
//!  (producer)               AtomicU32 slots            (consumer)
//!  owns write cursor                                   owns read cursor
//! ```
//!
//! The producer owns the write cursor and the consumer owns the read
//! cursor; neither ever stores to the other's. Each cursor is a single byte
//! and each slot a single word, so every update the other side can observe
//! is one indivisible store.
//!
//! # Overrun
//!
//! The producer never looks at the read cursor. If the main loop falls `N`
//! samples behind, the write cursor lands on the read cursor and the unread
//! samples are gone (the queue reads as empty). The output queue, by
//! contrast, refuses pushes when full.

use core::sync::atomic::{AtomicU8, AtomicU32, Ordering};

use crate::config::INPUT_QUEUE_LEN;
use crate::sample::Sample;

/// Fixed-capacity ring written from interrupt context and drained by the
/// main loop.
///
/// # Contract
///
/// - [`write`](Self::write) is called only from the capture interrupt class,
///   which never nests with itself.
/// - [`pop`](Self::pop) is called only from the main loop.
///
/// Breaking the contract loses samples but cannot cause undefined
/// behaviour: all storage is atomic.
pub struct InputQueue<const N: usize = INPUT_QUEUE_LEN> {
    slots: [AtomicU32; N],
    /// Next slot the producer writes (slot index, wraps via mask).
    head: AtomicU8,
    /// Next slot the consumer reads (slot index, wraps via mask).
    tail: AtomicU8,
}

impl<const N: usize> InputQueue<N> {
    /// Mask for wrapping a cursor to the buffer size.
    const MASK: u8 = (N - 1) as u8;

    /// Create an empty queue with both cursors at slot 0.
    ///
    /// # Panics
    ///
    /// Panics at compile time unless N is a power of two no larger than 256.
    pub const fn new() -> Self {
        assert!(N.is_power_of_two(), "Input queue size must be power of 2");
        assert!(N <= 256, "Input queue cursor is a single byte");

        Self {
            slots: [const { AtomicU32::new(0) }; N],
            head: AtomicU8::new(0),
            tail: AtomicU8::new(0),
        }
    }

    /// Append a sample. Producer side only.
    ///
    /// Never fails, never blocks, never reads the consumer's cursor.
    ///
    /// # Timing
    ///
    /// One relaxed load, two stores. Inlined into the capture routine.
    #[inline(always)]
    pub fn write(
        &self,
        sample: Sample,
    ) {
        // Only this side stores head, so a relaxed load sees our own last store
        let head = self.head.load(Ordering::Relaxed);
        self.slots[(head & Self::MASK) as usize].store(sample.to_bits(), Ordering::Relaxed);
        // Publish: the slot store above happens-before any Acquire load that sees this
        self.head.store(head.wrapping_add(1) & Self::MASK, Ordering::Release);
    }

    /// Remove the oldest sample. Consumer side only.
    ///
    /// Returns `None` when the queue is empty; in that case neither cursor is
    /// touched.
    #[inline]
    pub fn pop(&self) -> Option<Sample> {
        let tail = self.tail.load(Ordering::Relaxed);
        let head = self.head.load(Ordering::Acquire);

        if head == tail {
            return None;
        }

        let bits = self.slots[tail as usize].load(Ordering::Relaxed);
        self.tail.store(tail.wrapping_add(1) & Self::MASK, Ordering::Release);
        Some(Sample::from_bits(bits))
    }

    /// True when the consumer has caught up with the producer.
    #[inline]
    pub fn is_empty(&self) -> bool { self.head.load(Ordering::Acquire) == self.tail.load(Ordering::Relaxed) }

    /// Samples waiting to be popped, modulo an overrun lap.
    #[inline]
    pub fn len(&self) -> usize {
        let head = self.head.load(Ordering::Acquire);
        let tail = self.tail.load(Ordering::Relaxed);
        (head.wrapping_sub(tail) & Self::MASK) as usize
    }

    /// Samples that survive between drains: `N - 1`.
    ///
    /// The `N`th unread write completes a lap and the queue reads as empty.
    #[inline]
    pub const fn capacity(&self) -> usize { N - 1 }
}

impl<const N: usize> Default for InputQueue<N> {
    fn default() -> Self { Self::new() }
}
