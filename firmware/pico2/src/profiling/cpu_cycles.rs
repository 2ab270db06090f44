//! CPU cycle counter utilities using Cortex-M33 DWT.
//!
//! Used at bring-up to measure the capture routine against its cycle
//! budget, via the Data Watchpoint and Trace (DWT) cycle counter (CYCCNT).
//!
//! # Overflow Handling
//!
//! CYCCNT is a 32-bit counter; at 150 MHz it wraps every ~28.6 seconds
//! (2^32 / 150M). `wrapping_sub` handles a single wrap between two reads,
//! which is all a capture measurement ever spans.

use core::sync::atomic::{AtomicU32, Ordering};

/// CPU frequency in Hz, set by [`init`]. Defaults to the stock RP2350 clock.
static CPU_FREQ_HZ: AtomicU32 = AtomicU32::new(150_000_000);

/// Maximum valid cycle count for sanity checking.
/// A capture measurement above this is a wrap or a preempted run.
const MAX_SANE_CYCLES: u32 = 1_000_000;

/// Initialize DWT cycle counter.
///
/// Must be called after embassy_rp::init(). Safe to call multiple times.
pub fn init(freq_hz: u32) {
    CPU_FREQ_HZ.store(freq_hz.clamp(1_000_000, 500_000_000), Ordering::Relaxed);

    // DEMCR.TRCENA (bit 24) must be set first, then DWT.CTRL.CYCCNTENA (bit 0)
    #[cfg(target_arch = "arm")]
    unsafe {
        use core::ptr::{read_volatile, write_volatile};

        const DEMCR: *mut u32 = 0xE000_EDFC as *mut u32;
        write_volatile(DEMCR, read_volatile(DEMCR) | (1 << 24));

        const DWT_CTRL: *mut u32 = 0xE000_1000 as *mut u32;
        write_volatile(DWT_CTRL, read_volatile(DWT_CTRL) | 1);
    }
}

/// Read current cycle count (32-bit, wraps).
#[inline]
pub fn read() -> u32 {
    #[cfg(target_arch = "arm")]
    unsafe {
        // DWT CYCCNT register (0xE0001004)
        const DWT_CYCCNT: *const u32 = 0xE000_1004 as *const u32;
        core::ptr::read_volatile(DWT_CYCCNT)
    }
    #[cfg(not(target_arch = "arm"))]
    {
        0 // Placeholder for tests
    }
}

/// Calculate elapsed cycles with wrap handling and sanity check.
///
/// Returns 0 if elapsed cycles exceed the sanity threshold.
#[inline]
pub fn elapsed(
    start: u32,
    end: u32,
) -> u32 {
    let elapsed = end.wrapping_sub(start);
    if elapsed > MAX_SANE_CYCLES { 0 } else { elapsed }
}

/// Cycles spent running `f`, minus the cost of the two counter reads.
#[inline(always)]
pub fn measure<F: FnOnce()>(f: F) -> u32 {
    let overhead = {
        let a = read();
        elapsed(a, read())
    };
    let start = read();
    f();
    elapsed(start, read()).saturating_sub(overhead)
}

/// Get configured CPU frequency in Hz.
#[inline]
pub fn freq_hz() -> u32 { CPU_FREQ_HZ.load(Ordering::Relaxed) }

/// Convert a cycle count to nanoseconds at the configured frequency.
pub fn cycles_to_ns(cycles: u32) -> u32 {
    let freq = u64::from(freq_hz());
    ((u64::from(cycles) * 1_000_000_000) / freq).min(u64::from(u32::MAX)) as u32
}

// =============================================================================
// Unit Tests (run on host with: cargo test --lib --target <host-triple>)
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_elapsed_normal() {
        assert_eq!(elapsed(100, 200), 100);
        assert_eq!(elapsed(0, 1000), 1000);
    }

    #[test]
    fn test_elapsed_wrap() {
        assert_eq!(elapsed(u32::MAX - 100, 100), 201);
    }

    #[test]
    fn test_elapsed_sanity_check() {
        assert_eq!(elapsed(0, MAX_SANE_CYCLES + 1), 0);
    }

    #[test]
    fn test_measure_runs_closure() {
        let mut ran = false;
        let cycles = measure(|| ran = true);
        assert!(ran);
        // No cycle counter on the host
        assert_eq!(cycles, 0);
    }

    #[test]
    fn test_cycles_to_ns() {
        init(150_000_000);
        assert_eq!(cycles_to_ns(150), 1_000);
        assert_eq!(cycles_to_ns(0), 0);
        // 25 cycles of the 16 MHz AVR budget is ~1.56 us
        init(16_000_000);
        assert_eq!(cycles_to_ns(25), 1_562);
        init(150_000_000);
    }
}
