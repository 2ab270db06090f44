//! Tracer configuration constants.
//!
//! Everything here is fixed at compile time. The capture strategy itself is
//! chosen with the `port-change` cargo feature (see [`crate::capture`]).

use crate::capture::{ActiveMode, CaptureMode};
use crate::sample::SAMPLE_SIZE;

// Per-line edge capture keeps the reset line free; port-change capture uses
// every line of the port, including the one the reset pulse would drive.
#[cfg(all(feature = "port-change", feature = "reset-output"))]
compile_error!("The reset output cannot be enabled while capturing with the port-change strategy");

// =============================================================================
// Stream Format
// =============================================================================

/// Startup banner, transmitted once before any sample text.
pub const BANNER: &str = "sctrace v1.01\n";

/// Rendered samples per output line. The last separator of a line is `\n`.
pub const ITEMS_PER_LINE: u8 = 10;

/// Size of the formatted text buffer, including the zero sentinel.
pub const LINE_BUFFER_LEN: usize = 16;

// =============================================================================
// Throttling
// =============================================================================

/// Timer ticks let through after each real capture before ticks are dropped.
pub const MAX_TIMER_EVENTS: u8 = 2;

// =============================================================================
// Queue Sizing
// =============================================================================

/// Input queue entries: one 256-byte page of 4-byte samples, so the write
/// cursor wraps with a mask.
pub const INPUT_QUEUE_LEN: usize = 256 / SAMPLE_SIZE;

/// RAM kept back from the output queue: the input queue page plus statics
/// and stack.
pub const RESERVED_RAM: usize = 512;

/// RAM budget of the original 8-bit target (2.5 KB); used by the simulator
/// so its drop behaviour matches the hardware.
pub const DEFAULT_RAM_BUDGET: usize = 2560;

/// Output queue entries that fit into `ram_bytes` after [`RESERVED_RAM`].
pub const fn output_queue_len(ram_bytes: usize) -> usize { ram_bytes.saturating_sub(RESERVED_RAM) / SAMPLE_SIZE }

// =============================================================================
// Bring-up Timing
// =============================================================================

/// Delay after the debug channel reports configured, before capture starts.
pub const STARTUP_DELAY_MS: u32 = 1000;

/// Length of the optional reset pulse (needed by some PC/XT keyboards).
pub const RESET_PULSE_MS: u32 = 500;

/// Whether the reset pulse is emitted before capture starts.
pub const RESET_OUTPUT_ENABLED: bool = cfg!(feature = "reset-output") && ActiveMode::SUPPORTS_RESET_OUTPUT;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_queue_fills_one_page() {
        assert_eq!(INPUT_QUEUE_LEN, 64);
        assert!(INPUT_QUEUE_LEN.is_power_of_two());
    }

    #[test]
    fn test_output_queue_len_from_budget() {
        assert_eq!(output_queue_len(DEFAULT_RAM_BUDGET), 512);
        assert_eq!(output_queue_len(RESERVED_RAM), 0);
        assert_eq!(output_queue_len(100), 0);
    }

    #[test]
    fn test_banner_fits_line_buffer() {
        // Banner plus sentinel must fit so it can be sent through the line buffer
        assert!(BANNER.len() < LINE_BUFFER_LEN);
    }
}
