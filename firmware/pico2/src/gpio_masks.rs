//! Register masks derived from the monitored line mask.
//!
//! RP2350 IO_BANK0 packs four interrupt status bits per GPIO into the
//! `INTRx` registers, eight GPIOs per register:
//!
//! ```text
//! bit 4n+0  LEVEL_LOW
//! bit 4n+1  LEVEL_HIGH
//! bit 4n+2  EDGE_LOW   (write 1 to clear)
//! bit 4n+3  EDGE_HIGH  (write 1 to clear)
//! ```

use heapless::Vec;

use crate::config::{FIRST_LINE_PIN, LINE_MASK};

const EDGE_LOW: u32 = 1 << 2;
const EDGE_HIGH: u32 = 1 << 3;

/// `INTR0` value clearing both edge flags of every line in `line_mask`.
///
/// Writing it in one store collapses transitions that landed on several
/// lines while a capture was already in progress.
pub const fn edge_clear_mask(line_mask: u8) -> u32 {
    let mut mask = 0;
    let mut line = 0;
    while line < 8 {
        if line_mask & (1 << line) != 0 {
            mask |= (EDGE_LOW | EDGE_HIGH) << (4 * line);
        }
        line += 1;
    }
    mask
}

/// Clear mask for this build's lines.
pub const EDGE_CLEAR_MASK: u32 = edge_clear_mask(LINE_MASK);

/// Port state from a raw `SIO.GPIO_IN` read.
#[inline(always)]
pub const fn port_state(gpio_in: u32) -> u8 { (gpio_in >> FIRST_LINE_PIN) as u8 }

/// GPIO numbers of the lines in `line_mask`, for bring-up logs.
pub fn monitored_pins(line_mask: u8) -> Vec<u8, 8> {
    let mut pins = Vec::new();
    for line in (0..8).filter(|l| line_mask & (1 << l) != 0) {
        // At most eight bits, cannot overflow
        let _ = pins.push(FIRST_LINE_PIN + line);
    }
    pins
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_clear_mask_single_line() {
        assert_eq!(edge_clear_mask(0b0000_0001), 0x0000_000C);
        assert_eq!(edge_clear_mask(0b1000_0000), 0xC000_0000);
    }

    #[test]
    fn test_edge_clear_mask_strategies() {
        assert_eq!(edge_clear_mask(0x0F), 0x0000_CCCC);
        assert_eq!(edge_clear_mask(0xFF), 0xCCCC_CCCC);
        assert_eq!(edge_clear_mask(0), 0);
    }

    #[test]
    fn test_edge_clear_mask_never_touches_level_bits() {
        assert_eq!(edge_clear_mask(0xFF) & 0x3333_3333, 0);
    }

    #[test]
    fn test_port_state_low_byte() {
        assert_eq!(port_state(0xDEAD_BEEF), 0xEF);
        assert_eq!(port_state(0x0000_0100), 0x00);
    }

    #[test]
    fn test_monitored_pins() {
        assert_eq!(monitored_pins(0x0F).as_slice(), &[0, 1, 2, 3]);
        assert_eq!(monitored_pins(0b1010_0000).as_slice(), &[5, 7]);
        assert!(monitored_pins(0).is_empty());
    }
}
