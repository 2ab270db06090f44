//! Bounded sample queue between the dispatcher and the formatter.
//!
//! Only the main loop touches this queue, so it needs no atomics. When the
//! transport falls behind, pushes start failing here and the dispatcher
//! drops the sample.

use heapless::Deque;

use crate::sample::Sample;

/// Fixed-capacity FIFO of samples awaiting formatting.
///
/// Unlike [`InputQueue`](crate::InputQueue), a push into a full queue is
/// refused and leaves the contents intact.
pub struct OutputQueue<const N: usize> {
    samples: Deque<Sample, N>,
}

impl<const N: usize> OutputQueue<N> {
    /// Create an empty queue.
    pub const fn new() -> Self { Self { samples: Deque::new() } }

    /// Append a sample. Returns `false` (and drops nothing already queued)
    /// when the queue is full.
    #[inline]
    pub fn push(
        &mut self,
        sample: Sample,
    ) -> bool {
        self.samples.push_back(sample).is_ok()
    }

    /// Remove the oldest sample, or `None` if the queue is empty.
    #[inline]
    pub fn pop(&mut self) -> Option<Sample> { self.samples.pop_front() }

    /// Check if queue is empty.
    #[inline]
    pub fn is_empty(&self) -> bool { self.samples.is_empty() }

    /// Check if the next push will fail.
    #[inline]
    pub fn is_full(&self) -> bool { self.samples.is_full() }

    /// Number of queued samples.
    #[inline]
    pub fn len(&self) -> usize { self.samples.len() }

    /// Maximum number of queued samples.
    #[inline]
    pub const fn capacity(&self) -> usize { N }
}

impl<const N: usize> Default for OutputQueue<N> {
    fn default() -> Self { Self::new() }
}
