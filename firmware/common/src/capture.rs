//! Interrupt-context sample producer.
//!
//! Runs whenever a monitored line changes state or the timebase rolls over.
//! Its cost sets the shortest edge spacing the tracer can resolve, so the
//! routine is a fixed, branch-free sequence:
//!
//! 1. clear every other pending capture interrupt (collapses near-simultaneous
//!    transitions on several lines into one sample)
//! 2. read the port
//! 3. read the timebase
//! 4. write the sample into the [`InputQueue`]
//!
//! # Preconditions
//!
//! The caller runs with the tracer's own interrupt class masked for the
//! whole routine: edge and rollover handlers share one priority and never
//! nest. That is what makes the input queue single-producer.
//!
//! # Capture strategies
//!
//! The hardware offers two mutually exclusive ways to be told about a
//! change. The choice is made at build time with the `port-change` feature
//! and reaches the code as [`ActiveMode`]; there is no runtime dispatch.

use crate::input_queue::InputQueue;
use crate::sample::Sample;

/// Cycle budget for one capture on the reference 8-bit target.
///
/// Platforms measure their own capture cost against this with
/// [`CaptureBudget`]; exceeding it narrows the resolvable edge spacing but
/// does not change behaviour.
pub const CAPTURE_BUDGET_CYCLES: u32 = 25;

/// Clock the cycle budget is expressed in.
pub const BUDGET_CLOCK_HZ: u32 = 16_000_000;

/// [`CAPTURE_BUDGET_CYCLES`] converted to cycles of a `freq_hz` clock, so a
/// faster core is held to the same wall-clock budget.
pub const fn budget_cycles_at(freq_hz: u32) -> u32 {
    ((CAPTURE_BUDGET_CYCLES as u64 * freq_hz as u64) / BUDGET_CLOCK_HZ as u64) as u32
}

// =============================================================================
// Platform Seams
// =============================================================================

/// The monitored digital input port.
pub trait CapturePort {
    /// Clear pending capture interrupts for every monitored line.
    fn clear_pending(&self);

    /// Current state of the monitored lines.
    fn read(&self) -> u8;
}

/// Free-running 16-bit counter sampled at capture time.
pub trait Timebase {
    /// Counter snapshot. Implementations return an untorn 16-bit value.
    fn now(&self) -> u16;
}

// =============================================================================
// Capture Strategies
// =============================================================================

/// Build-time capture configuration.
pub trait CaptureMode {
    /// Short name for bring-up logs.
    const NAME: &'static str;

    /// Bit mask of the monitored lines within the port.
    const LINE_MASK: u8;

    /// Whether a spare port line is left for the reset pulse.
    const SUPPORTS_RESET_OUTPUT: bool;
}

/// Four lines, each with its own edge interrupt.
pub struct EdgeLines;

impl CaptureMode for EdgeLines {
    const NAME: &'static str = "edge-lines";
    const LINE_MASK: u8 = 0x0F;
    const SUPPORTS_RESET_OUTPUT: bool = true;
}

/// All eight lines through a single port-change interrupt.
pub struct PortChange;

impl CaptureMode for PortChange {
    const NAME: &'static str = "port-change";
    const LINE_MASK: u8 = 0xFF;
    const SUPPORTS_RESET_OUTPUT: bool = false;
}

/// Strategy selected for this build.
#[cfg(not(feature = "port-change"))]
pub type ActiveMode = EdgeLines;

/// Strategy selected for this build.
#[cfg(feature = "port-change")]
pub type ActiveMode = PortChange;

// =============================================================================
// Producer
// =============================================================================

/// Capture a real transition. Called from the edge interrupt handler(s).
#[inline(always)]
pub fn on_edge<P: CapturePort, T: Timebase, const N: usize>(
    port: &P,
    timebase: &T,
    queue: &InputQueue<N>,
) {
    port.clear_pending();
    let port_state = port.read();
    let time = timebase.now();
    queue.write(Sample::capture(time, port_state));
}

/// Capture a timebase rollover tick. Called from the rollover handler.
///
/// Ticks go through the same sequence as edges, pending-flag clear
/// included, so a transition racing the rollover collapses into the tick.
#[inline(always)]
pub fn on_rollover<P: CapturePort, T: Timebase, const N: usize>(
    port: &P,
    timebase: &T,
    queue: &InputQueue<N>,
) {
    port.clear_pending();
    let port_state = port.read();
    let time = timebase.now();
    queue.write(Sample::tick(time, port_state));
}

// =============================================================================
// Cost Accounting
// =============================================================================

/// Worst-case capture cost observed on the running platform.
#[derive(Clone, Copy, Debug, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CaptureBudget {
    worst_cycles: u32,
    runs: u32,
}

impl CaptureBudget {
    /// Nothing measured yet.
    pub const fn new() -> Self {
        Self {
            worst_cycles: 0,
            runs: 0,
        }
    }

    /// Record the cost of one capture.
    pub fn record(
        &mut self,
        cycles: u32,
    ) {
        self.worst_cycles = self.worst_cycles.max(cycles);
        self.runs = self.runs.saturating_add(1);
    }

    /// Highest recorded cost.
    #[inline]
    pub const fn worst_cycles(&self) -> u32 { self.worst_cycles }

    /// Number of recorded captures.
    #[inline]
    pub const fn runs(&self) -> u32 { self.runs }

    /// True if every recorded capture fit in `budget` cycles.
    #[inline]
    pub const fn within(
        &self,
        budget: u32,
    ) -> bool {
        self.worst_cycles <= budget
    }
}

#[cfg(test)]
mod tests {
    use core::cell::Cell;

    use super::*;
    use crate::sample::{KIND_CAPTURE, KIND_TICK};

    /// Port that records the order of operations performed on it.
    struct ScriptedPort {
        state: Cell<u8>,
        clears: Cell<u32>,
        reads: Cell<u32>,
        read_before_clear: Cell<bool>,
    }

    impl ScriptedPort {
        fn new(state: u8) -> Self {
            Self {
                state: Cell::new(state),
                clears: Cell::new(0),
                reads: Cell::new(0),
                read_before_clear: Cell::new(false),
            }
        }
    }

    impl CapturePort for ScriptedPort {
        fn clear_pending(&self) { self.clears.set(self.clears.get() + 1); }

        fn read(&self) -> u8 {
            if self.clears.get() <= self.reads.get() {
                self.read_before_clear.set(true);
            }
            self.reads.set(self.reads.get() + 1);
            self.state.get()
        }
    }

    struct FixedTime(u16);

    impl Timebase for FixedTime {
        fn now(&self) -> u16 { self.0 }
    }

    #[test]
    fn test_edge_capture_writes_sample() {
        let port = ScriptedPort::new(0xF0);
        let queue = InputQueue::<8>::new();

        on_edge(&port, &FixedTime(0x013A), &queue);

        let sample = queue.pop().unwrap();
        assert_eq!(sample.timestamp(), 0x013A);
        assert_eq!(sample.port_state, 0xF0);
        assert_eq!(sample.kind, KIND_CAPTURE);
    }

    #[test]
    fn test_rollover_writes_tick() {
        let port = ScriptedPort::new(0x0F);
        let queue = InputQueue::<8>::new();

        on_rollover(&port, &FixedTime(0), &queue);

        let sample = queue.pop().unwrap();
        assert_eq!(sample.kind, KIND_TICK);
        assert_eq!(sample.port_state, 0x0F);
    }

    #[test]
    fn test_pending_cleared_once_before_read() {
        let port = ScriptedPort::new(0);
        let queue = InputQueue::<8>::new();

        on_edge(&port, &FixedTime(1), &queue);
        on_rollover(&port, &FixedTime(2), &queue);
        on_edge(&port, &FixedTime(3), &queue);

        assert_eq!(port.clears.get(), 3);
        assert_eq!(port.reads.get(), 3);
        assert!(!port.read_before_clear.get());
    }

    #[test]
    fn test_captures_keep_temporal_order() {
        let port = ScriptedPort::new(0);
        let queue = InputQueue::<8>::new();

        for t in [10u16, 20, 30] {
            port.state.set(t as u8);
            on_edge(&port, &FixedTime(t), &queue);
        }

        let times: Vec<u16> = core::iter::from_fn(|| queue.pop()).map(|s| s.timestamp()).collect();
        assert_eq!(times, [10, 20, 30]);
    }

    #[test]
    fn test_mode_constants() {
        assert_eq!(EdgeLines::LINE_MASK.count_ones(), 4);
        assert_eq!(PortChange::LINE_MASK.count_ones(), 8);
        assert!(EdgeLines::SUPPORTS_RESET_OUTPUT);
        assert!(!PortChange::SUPPORTS_RESET_OUTPUT);
    }

    #[test]
    fn test_capture_budget() {
        let mut budget = CaptureBudget::new();
        assert!(budget.within(CAPTURE_BUDGET_CYCLES));

        budget.record(20);
        budget.record(24);
        budget.record(22);
        assert_eq!(budget.worst_cycles(), 24);
        assert_eq!(budget.runs(), 3);
        assert!(budget.within(CAPTURE_BUDGET_CYCLES));

        budget.record(40);
        assert!(!budget.within(CAPTURE_BUDGET_CYCLES));
    }

    #[test]
    fn test_budget_scales_with_clock() {
        assert_eq!(budget_cycles_at(BUDGET_CLOCK_HZ), CAPTURE_BUDGET_CYCLES);
        assert_eq!(budget_cycles_at(150_000_000), 234);
        assert_eq!(budget_cycles_at(8_000_000), 12);
    }
}
