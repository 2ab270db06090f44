//! GPIO assignment.
//!
//! The monitored lines occupy the bottom of bank 0 so the port state is the
//! low byte of `SIO.GPIO_IN` with no shifting:
//!
//! | Strategy      | Lines   | GP7           |
//! |---------------|---------|---------------|
//! | `edge-lines`  | GP0-GP3 | reset output  |
//! | `port-change` | GP0-GP7 | monitored     |

use sctrace_common::{ActiveMode, CaptureMode};

/// First monitored GPIO; line `n` of the port is GPIO `FIRST_LINE_PIN + n`.
pub const FIRST_LINE_PIN: u8 = 0;

/// Monitored lines within the 8-bit port.
pub const LINE_MASK: u8 = ActiveMode::LINE_MASK;

/// Number of monitored lines.
pub const LINE_COUNT: usize = LINE_MASK.count_ones() as usize;

/// Reset output (active low), only driven with the `reset-output` feature.
pub const RESET_PIN: u8 = 7;

/// Debug channel: UART1 TX. Wire to the host adapter's RX.
pub const UART_TX_PIN: u8 = 8;
