//! Clock, timebase and debug UART configuration.
//!
//! # Timebase
//!
//! The capture timestamp is the counter of one PWM slice running free with
//! `TOP = 0xFFFF`. At the stock 150 MHz system clock a divider of 9 gives a
//! ~16.7 MHz count, one wrap every ~3.9 ms.

use sctrace_common::config::output_queue_len;

/// System clock (stock RP2350, no overclock).
pub const CPU_FREQ_HZ: u32 = 150_000_000;

/// Integer PWM clock divider for the timebase slice (1..=255).
pub const TIMEBASE_DIVIDER: u8 = 9;

/// Resulting timebase count rate.
pub const TIMEBASE_FREQ_HZ: u32 = CPU_FREQ_HZ / TIMEBASE_DIVIDER as u32;

/// Debug UART baud rate. 8N1, no flow control.
pub const UART_BAUD: u32 = 115_200;

/// RAM handed to the tracer queues. The RP2350 has far more than the
/// tracer needs; this keeps the output queue a few seconds deep at full
/// UART rate.
pub const TRACE_RAM_BYTES: usize = 64 * 1024;

/// Output queue entries.
pub const OUTPUT_QUEUE_LEN: usize = output_queue_len(TRACE_RAM_BYTES);

/// Interval between defmt diagnostics lines.
pub const STATS_INTERVAL_MS: u64 = 5_000;
