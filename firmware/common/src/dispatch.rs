//! Moves samples from the input queue to the output queue, throttling ticks.
//!
//! The transport can carry far fewer samples per second than the capture
//! path can produce. Rollover ticks exist only to keep a coarse timebase on
//! the host during idle stretches, so after each real transition at most
//! [`MAX_TIMER_EVENTS`] of them are forwarded; every real capture is
//! forwarded.

use crate::config::MAX_TIMER_EVENTS;
use crate::input_queue::InputQueue;
use crate::output_queue::OutputQueue;
use crate::sample::Sample;

/// Tick rate limiter: a run of ticks gets a fixed allowance, refilled by
/// the next real capture.
#[derive(Clone, Copy, Debug)]
pub struct TickThrottle {
    allowance: u8,
    max: u8,
}

impl TickThrottle {
    /// Throttle with the configured allowance.
    pub const fn new() -> Self { Self::with_allowance(MAX_TIMER_EVENTS) }

    /// Throttle letting `max` ticks through per idle stretch.
    pub const fn with_allowance(max: u8) -> Self { Self { allowance: max, max } }

    /// Decide whether `sample` is forwarded.
    ///
    /// Real captures always pass and refill the allowance; ticks pass while
    /// allowance remains, consuming one each.
    #[inline]
    pub fn admit(
        &mut self,
        sample: &Sample,
    ) -> bool {
        if !sample.is_tick() {
            self.allowance = self.max;
            return true;
        }

        if self.allowance > 0 {
            self.allowance -= 1;
            true
        } else {
            false
        }
    }

    /// Ticks that would still be admitted before the next capture.
    #[inline]
    pub const fn remaining(&self) -> u8 { self.allowance }
}

impl Default for TickThrottle {
    fn default() -> Self { Self::new() }
}

/// What one dispatch step did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Dispatch {
    /// Input queue was empty.
    Idle,
    /// Sample moved to the output queue.
    Forwarded,
    /// Tick dropped by the throttle.
    Throttled,
    /// Output queue full; sample dropped.
    Overrun,
}

/// Running totals of dispatch outcomes (diagnostics only).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DispatchStats {
    pub forwarded: u32,
    pub throttled: u32,
    pub overruns: u32,
}

/// The main-loop stage between the two queues.
pub struct Dispatcher {
    throttle: TickThrottle,
    stats: DispatchStats,
}

impl Dispatcher {
    /// Dispatcher with a full tick allowance.
    pub const fn new() -> Self {
        Self {
            throttle: TickThrottle::new(),
            stats: DispatchStats {
                forwarded: 0,
                throttled: 0,
                overruns: 0,
            },
        }
    }

    /// Drain at most one input sample into `output`.
    ///
    /// A full output queue drops the sample. The outcome is reported for
    /// diagnostics; callers carry on the same way whatever it is.
    pub fn step<const I: usize, const O: usize>(
        &mut self,
        input: &InputQueue<I>,
        output: &mut OutputQueue<O>,
    ) -> Dispatch {
        let Some(sample) = input.pop() else {
            return Dispatch::Idle;
        };

        if !self.throttle.admit(&sample) {
            self.stats.throttled = self.stats.throttled.wrapping_add(1);
            return Dispatch::Throttled;
        }

        if output.push(sample) {
            self.stats.forwarded = self.stats.forwarded.wrapping_add(1);
            Dispatch::Forwarded
        } else {
            self.stats.overruns = self.stats.overruns.wrapping_add(1);
            Dispatch::Overrun
        }
    }

    /// Totals since start.
    #[inline]
    pub const fn stats(&self) -> DispatchStats { self.stats }

    /// Current throttle state.
    #[inline]
    pub const fn throttle(&self) -> &TickThrottle { &self.throttle }
}

impl Default for Dispatcher {
    fn default() -> Self { Self::new() }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain<const I: usize, const O: usize>(
        dispatcher: &mut Dispatcher,
        input: &InputQueue<I>,
        output: &mut OutputQueue<O>,
    ) {
        while dispatcher.step(input, output) != Dispatch::Idle {}
    }

    fn collect<const O: usize>(output: &mut OutputQueue<O>) -> Vec<Sample> { core::iter::from_fn(|| output.pop()).collect() }

    #[test]
    fn test_tick_run_limited_to_allowance() {
        for run in 0..6u16 {
            let mut throttle = TickThrottle::new();
            let admitted = (0..run).filter(|&t| throttle.admit(&Sample::tick(t, 0))).count();
            assert_eq!(admitted, usize::from(run.min(u16::from(MAX_TIMER_EVENTS))));
        }
    }

    #[test]
    fn test_capture_refills_allowance() {
        let mut throttle = TickThrottle::new();

        assert!(throttle.admit(&Sample::tick(0, 0)));
        assert!(throttle.admit(&Sample::tick(1, 0)));
        assert!(!throttle.admit(&Sample::tick(2, 0)));
        assert_eq!(throttle.remaining(), 0);

        assert!(throttle.admit(&Sample::capture(3, 1)));
        assert_eq!(throttle.remaining(), MAX_TIMER_EVENTS);

        assert!(throttle.admit(&Sample::tick(4, 1)));
        assert!(throttle.admit(&Sample::tick(5, 1)));
        assert!(!throttle.admit(&Sample::tick(6, 1)));
    }

    #[test]
    fn test_partial_run_refilled_not_accumulated() {
        let mut throttle = TickThrottle::new();

        assert!(throttle.admit(&Sample::tick(0, 0)));
        assert!(throttle.admit(&Sample::capture(1, 1)));
        // Refilled to the maximum, not topped up beyond it
        assert_eq!(throttle.remaining(), MAX_TIMER_EVENTS);
    }

    #[test]
    fn test_dispatch_preserves_order_and_captures() {
        let input = InputQueue::<16>::new();
        let mut output = OutputQueue::<16>::new();
        let mut dispatcher = Dispatcher::new();

        let produced = [
            Sample::tick(0, 0xFF),
            Sample::tick(1, 0xFF),
            Sample::tick(2, 0xFF),
            Sample::capture(3, 0xFE),
            Sample::capture(4, 0xFF),
            Sample::tick(5, 0xFF),
            Sample::tick(6, 0xFF),
            Sample::tick(7, 0xFF),
            Sample::capture(8, 0xFE),
        ];
        for sample in produced {
            input.write(sample);
        }

        drain(&mut dispatcher, &input, &mut output);

        let times: Vec<u16> = collect(&mut output).iter().map(Sample::timestamp).collect();
        assert_eq!(times, [0, 1, 3, 4, 5, 6, 8]);

        let stats = dispatcher.stats();
        assert_eq!(stats.forwarded, 7);
        assert_eq!(stats.throttled, 2);
        assert_eq!(stats.overruns, 0);
    }

    #[test]
    fn test_one_entry_per_step() {
        let input = InputQueue::<8>::new();
        let mut output = OutputQueue::<8>::new();
        let mut dispatcher = Dispatcher::new();

        input.write(Sample::capture(1, 0));
        input.write(Sample::capture(2, 0));

        assert_eq!(dispatcher.step(&input, &mut output), Dispatch::Forwarded);
        assert_eq!(input.len(), 1);
        assert_eq!(output.len(), 1);
        assert_eq!(dispatcher.step(&input, &mut output), Dispatch::Forwarded);
        assert_eq!(dispatcher.step(&input, &mut output), Dispatch::Idle);
    }

    #[test]
    fn test_full_output_sheds_load() {
        let input = InputQueue::<8>::new();
        let mut output = OutputQueue::<2>::new();
        let mut dispatcher = Dispatcher::new();

        for t in 0..4 {
            input.write(Sample::capture(t, 0));
        }

        assert_eq!(dispatcher.step(&input, &mut output), Dispatch::Forwarded);
        assert_eq!(dispatcher.step(&input, &mut output), Dispatch::Forwarded);
        assert_eq!(dispatcher.step(&input, &mut output), Dispatch::Overrun);
        assert_eq!(dispatcher.step(&input, &mut output), Dispatch::Overrun);
        assert!(input.is_empty());

        // The first two are intact and in order
        let times: Vec<u16> = collect(&mut output).iter().map(Sample::timestamp).collect();
        assert_eq!(times, [0, 1]);
        assert_eq!(dispatcher.stats().overruns, 2);
    }

    #[test]
    fn test_throttled_tick_does_not_consume_output() {
        let input = InputQueue::<8>::new();
        let mut output = OutputQueue::<1>::new();
        let mut dispatcher = Dispatcher::new();

        input.write(Sample::tick(0, 0));
        input.write(Sample::tick(1, 0));
        input.write(Sample::tick(2, 0));

        assert_eq!(dispatcher.step(&input, &mut output), Dispatch::Forwarded);
        assert_eq!(dispatcher.step(&input, &mut output), Dispatch::Overrun);
        // Allowance was spent on the overrun tick too: the drop happens after admission
        assert_eq!(dispatcher.step(&input, &mut output), Dispatch::Throttled);
    }
}
