//! sctrace logic tracer firmware for Raspberry Pi Pico 2 (RP2350)
//!
//! Timestamps transitions on GP0-GP3 (GP0-GP7 with `port-change`) and
//! streams them as hex text on UART1 TX (GP8, 115200 8N1).
//!
//! # Architecture
//!
//! - Capture (NVIC P1): line edges and timebase wraps write 4-byte samples
//!   into the input queue. See `capture_hw`.
//! - Main loop (thread mode): one tracer pass at a time: dispatch, format,
//!   send at most one character. Never waits.
//!
//! # Bring-up Order
//!
//! 1. UART, then `STARTUP_DELAY_MS` so the host terminal can attach
//! 2. optional reset pulse on GP7 (`reset-output`)
//! 3. capture cost self-test
//! 4. banner queued, timebase and capture sources enabled
//! 5. main loop

#![no_std]
#![no_main]
// Crate-level lints (match lib.rs for consistency)
#![allow(clippy::cast_possible_truncation)]

// Modules only used in the binary (not testable on host)
mod capture_hw;
mod debug_uart;

// Re-export testable modules from library for local use
// (These are defined in lib.rs with host-testable code)
mod config {
    pub use sctrace_pico2::config::*;
}
mod cpu_cycles {
    pub use sctrace_pico2::cpu_cycles::*;
}
mod gpio_masks {
    pub use sctrace_pico2::gpio_masks::*;
}
mod port_watch {
    pub use sctrace_pico2::port_watch::*;
}

use defmt::{info, warn};
use embassy_executor::Spawner;
use embassy_rp::gpio::{Input, Pull};
use embassy_rp::uart::{self, UartTx};
use embassy_time::{Duration, Instant, Timer};
use sctrace_common::capture::budget_cycles_at;
use sctrace_common::config::{RESET_OUTPUT_ENABLED, STARTUP_DELAY_MS};
use sctrace_common::transmit::wait_configured;
use sctrace_common::{ActiveMode, CaptureMode, OutputQueue, Tracer};
use static_cell::ConstStaticCell;
use {defmt_rtt as _, panic_probe as _};

use crate::capture_hw::INPUT_QUEUE;
use crate::config::{
    CPU_FREQ_HZ,
    LINE_MASK,
    OUTPUT_QUEUE_LEN,
    STATS_INTERVAL_MS,
    TIMEBASE_FREQ_HZ,
    UART_BAUD,
    UART_TX_PIN,
};
use crate::debug_uart::UartChannel;

/// Main-loop side queue; large, so it lives in .bss rather than on the stack.
static OUTPUT_QUEUE: ConstStaticCell<OutputQueue<OUTPUT_QUEUE_LEN>> = ConstStaticCell::new(OutputQueue::new());

// Program metadata for `picotool info`
#[unsafe(link_section = ".bi_entries")]
#[used]
pub static PICOTOOL_ENTRIES: [embassy_rp::binary_info::EntryAddr; 4] = [
    embassy_rp::binary_info::rp_program_name!(c"sctrace"),
    embassy_rp::binary_info::rp_program_description!(c"Logic tracer: timestamped line transitions as hex over UART"),
    embassy_rp::binary_info::rp_cargo_version!(),
    embassy_rp::binary_info::rp_program_build_attribute!(),
];

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    info!("sctrace starting ({} capture)...", ActiveMode::NAME);

    let p = embassy_rp::init(Default::default());

    cpu_cycles::init(CPU_FREQ_HZ);
    info!("DWT cycle counter initialized at {} MHz", CPU_FREQ_HZ / 1_000_000);

    // Debug channel
    let mut uart_config = uart::Config::default();
    uart_config.baudrate = UART_BAUD;
    let mut channel = UartChannel::new(UartTx::new_blocking(p.UART1, p.PIN_8, uart_config));
    wait_configured(&mut channel);
    info!("Debug channel: UART1 TX on GP{} at {} baud", UART_TX_PIN, UART_BAUD);

    Timer::after_millis(u64::from(STARTUP_DELAY_MS)).await;

    #[cfg(feature = "reset-output")]
    let _reset = pulse_reset(p.PIN_7).await;
    info!("Reset output: {}", RESET_OUTPUT_ENABLED);

    // Monitored lines, pull-ups on (open-collector keyboard lines)
    #[cfg(not(feature = "port-change"))]
    let lines = [
        Input::new(p.PIN_0, Pull::Up),
        Input::new(p.PIN_1, Pull::Up),
        Input::new(p.PIN_2, Pull::Up),
        Input::new(p.PIN_3, Pull::Up),
    ];
    #[cfg(feature = "port-change")]
    let lines = [
        Input::new(p.PIN_0, Pull::Up),
        Input::new(p.PIN_1, Pull::Up),
        Input::new(p.PIN_2, Pull::Up),
        Input::new(p.PIN_3, Pull::Up),
        Input::new(p.PIN_4, Pull::Up),
        Input::new(p.PIN_5, Pull::Up),
        Input::new(p.PIN_6, Pull::Up),
        Input::new(p.PIN_7, Pull::Up),
    ];
    info!("Monitoring GP{}", gpio_masks::monitored_pins(LINE_MASK).as_slice());

    // Timebase must run before the self-test so it reads a live counter
    let _timebase = capture_hw::start_timebase(p.PWM_SLICE0);
    info!("Timebase: PWM slice 0 at {} Hz", TIMEBASE_FREQ_HZ);

    let budget = capture_hw::measure_capture_cost();
    let limit = budget_cycles_at(CPU_FREQ_HZ);
    if budget.within(limit) {
        info!("Capture cost: {} cycles worst (budget {})", budget.worst_cycles(), limit);
    } else {
        warn!(
            "Capture cost: {} cycles worst ({} ns), over budget {}",
            budget.worst_cycles(),
            cpu_cycles::cycles_to_ns(budget.worst_cycles()),
            limit
        );
    }

    let mut tracer = Tracer::new(&INPUT_QUEUE, OUTPUT_QUEUE.take(), channel);
    tracer.start();

    capture_hw::enable_ticks();
    capture_hw::enable_edges(lines);
    info!("Capture running, output queue {} samples", OUTPUT_QUEUE_LEN);

    let interval = Duration::from_millis(STATS_INTERVAL_MS);
    let mut next_report = Instant::now() + interval;
    loop {
        tracer.poll();

        if Instant::now() >= next_report {
            next_report += interval;
            info!("{} capture_worst={}", tracer.stats(), budget.worst_cycles());
        }
    }
}

/// Hold GP7 low for `RESET_PULSE_MS`, then release it to a pulled-up input.
///
/// The keyboard's reset line is open-collector and is never driven high.
/// The returned pin must stay alive to keep the pull-up.
#[cfg(feature = "reset-output")]
async fn pulse_reset(mut pin: embassy_rp::Peri<'static, embassy_rp::peripherals::PIN_7>) -> Input<'static> {
    use embassy_rp::gpio::{Level, Output};
    use sctrace_common::config::RESET_PULSE_MS;

    use crate::config::RESET_PIN;

    let reset = Output::new(pin.reborrow(), Level::Low);
    info!("Reset pulse on GP{}: {} ms", RESET_PIN, RESET_PULSE_MS);
    Timer::after_millis(u64::from(RESET_PULSE_MS)).await;
    drop(reset);
    Input::new(pin, Pull::Up)
}
