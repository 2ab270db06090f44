//! Debug channel on UART1 TX.
//!
//! embassy-rp's blocking writer waits for FIFO space, which the tracer
//! main loop must never do. The driver is kept for pin and clock setup;
//! readiness and writes go straight to the PL011 registers.

use embassy_rp::pac;
use embassy_rp::uart::{Blocking, UartTx};
use sctrace_common::DebugChannel;

/// The TX FIFO filled between the readiness check and the write.
#[derive(Clone, Copy, Debug, defmt::Format)]
pub struct TxFifoFull;

/// UART1 transmit side as a non-blocking [`DebugChannel`].
pub struct UartChannel {
    _tx: UartTx<'static, Blocking>,
}

impl UartChannel {
    pub fn new(tx: UartTx<'static, Blocking>) -> Self { Self { _tx: tx } }

    #[inline]
    fn fifo_full() -> bool { pac::UART1.uartfr().read().txff() }
}

impl DebugChannel for UartChannel {
    type Error = TxFifoFull;

    fn is_ready(&mut self) -> bool { !Self::fifo_full() }

    fn put_char(
        &mut self,
        byte: u8,
    ) -> Result<(), TxFifoFull> {
        if Self::fifo_full() {
            return Err(TxFifoFull);
        }
        pac::UART1.uartdr().write(|w| w.set_data(byte));
        Ok(())
    }
}
