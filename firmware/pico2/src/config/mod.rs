//! Firmware configuration.
//!
//! - `pins`: GPIO assignment for the monitored lines, reset output and UART
//! - `clocks`: system clock, timebase divider and debug UART settings
//!
//! Stream format, throttling and bring-up timing are shared with the
//! simulator and live in [`sctrace_common::config`].

pub mod clocks;
pub mod pins;

// Re-export at config level for convenience
pub use clocks::{
    CPU_FREQ_HZ,
    OUTPUT_QUEUE_LEN,
    STATS_INTERVAL_MS,
    TIMEBASE_DIVIDER,
    TIMEBASE_FREQ_HZ,
    TRACE_RAM_BYTES,
    UART_BAUD,
};
pub use pins::{FIRST_LINE_PIN, LINE_COUNT, LINE_MASK, RESET_PIN, UART_TX_PIN};
