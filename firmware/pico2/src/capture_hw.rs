//! RP2350 capture hardware: GPIO port, PWM timebase and the two capture
//! sources feeding the input queue.
//!
//! # Interrupt Layout
//!
//! | Source                 | Runs in                                | Priority |
//! |------------------------|----------------------------------------|----------|
//! | Line edge              | `edge_task` on the `SWI_IRQ_1` executor | P1       |
//! | Timebase wrap (tick)   | `PWM_IRQ_WRAP_0` handler               | P1       |
//! | Tracer main loop       | thread mode                            | -        |
//!
//! Both capture sources share one NVIC priority, so a capture never
//! preempts another and the input queue has a single producer at a time.
//! The GPIO bank interrupt itself belongs to embassy-rp, which wakes
//! `edge_task`.

use core::pin::pin;

use embassy_executor::InterruptExecutor;
use embassy_futures::poll_once;
use embassy_futures::select::select_array;
use embassy_rp::Peri;
use embassy_rp::gpio::Input;
use embassy_rp::interrupt;
use embassy_rp::interrupt::{InterruptExt, Priority};
use embassy_rp::pac;
use embassy_rp::peripherals::PWM_SLICE0;
use embassy_rp::pwm::{self, Pwm};
use sctrace_common::capture::{self, CaptureBudget};
use sctrace_common::{CapturePort, InputQueue, Timebase};

use crate::config::{LINE_COUNT, TIMEBASE_DIVIDER};
use crate::cpu_cycles;
use crate::gpio_masks::{EDGE_CLEAR_MASK, port_state};
use crate::port_watch::PortWatch;

/// NVIC priority shared by every capture source.
pub const CAPTURE_PRIORITY: Priority = Priority::P1;

/// PWM slice index of the timebase (must match `PWM_SLICE0`).
const TIMEBASE_SLICE: usize = 0;

/// Captures measured by the startup self-test.
const SELF_TEST_RUNS: usize = 32;

/// Hand-off from the capture sources to the main loop.
pub static INPUT_QUEUE: InputQueue = InputQueue::new();

/// Executor running `edge_task` from `SWI_IRQ_1`.
static EXECUTOR_CAPTURE: InterruptExecutor = InterruptExecutor::new();

// =============================================================================
// Port and Timebase
// =============================================================================

/// GP0-GP7 read through SIO.
pub struct GpioPort;

impl CapturePort for GpioPort {
    #[inline(always)]
    fn clear_pending(&self) { pac::IO_BANK0.intr(0).write(|w| w.0 = EDGE_CLEAR_MASK); }

    #[inline(always)]
    fn read(&self) -> u8 { port_state(pac::SIO.gpio_in(0).read()) }
}

/// Counter of the timebase PWM slice. A single 16-bit register read, so
/// the snapshot cannot tear.
pub struct PwmTimebase;

impl Timebase for PwmTimebase {
    #[inline(always)]
    fn now(&self) -> u16 { pac::PWM.ch(TIMEBASE_SLICE).ctr().read().ctr() }
}

/// Start the timebase slice free-running with `TOP = 0xFFFF`.
///
/// The returned driver must stay alive; dropping it stops the counter.
pub fn start_timebase(slice: Peri<'static, PWM_SLICE0>) -> Pwm<'static> {
    let mut config = pwm::Config::default();
    config.top = u16::MAX;
    config.divider = TIMEBASE_DIVIDER.into();
    Pwm::new_free(slice, config)
}

// =============================================================================
// Capture Sources
// =============================================================================

/// Enable the timebase wrap interrupt. Each wrap produces one tick sample.
pub fn enable_ticks() {
    pac::PWM.intr().write(|w| w.set_ch(TIMEBASE_SLICE, true));
    pac::PWM.irq0_inte().modify(|w| w.set_ch(TIMEBASE_SLICE, true));

    interrupt::PWM_IRQ_WRAP_0.set_priority(CAPTURE_PRIORITY);
    // SAFETY: the handler below only touches the input queue and capture registers
    unsafe { interrupt::PWM_IRQ_WRAP_0.enable() };
}

/// Start the edge executor and spawn the edge task on it.
pub fn enable_edges(lines: [Input<'static>; LINE_COUNT]) {
    interrupt::SWI_IRQ_1.set_priority(CAPTURE_PRIORITY);
    let spawner = EXECUTOR_CAPTURE.start(interrupt::SWI_IRQ_1);
    spawner.spawn(edge_task(lines)).unwrap();
}

#[interrupt]
fn PWM_IRQ_WRAP_0() {
    pac::PWM.intr().write(|w| w.set_ch(TIMEBASE_SLICE, true));
    capture::on_rollover(&GpioPort, &PwmTimebase, &INPUT_QUEUE);
}

#[interrupt]
unsafe fn SWI_IRQ_1() {
    // SAFETY: SWI_IRQ_1 is reserved for this executor
    unsafe { EXECUTOR_CAPTURE.on_interrupt() }
}

/// Waits for a transition on any monitored line, then captures.
///
/// Arming a wait clears that line's edge flags, so a transition between
/// the capture read and the re-arm raises nothing. After arming, the port
/// is compared with the last captured state and captured at once if it
/// moved.
#[embassy_executor::task]
async fn edge_task(mut lines: [Input<'static>; LINE_COUNT]) {
    let watch = PortWatch::new(GpioPort);
    loop {
        let mut edge = pin!(select_array(lines.each_mut().map(|line| line.wait_for_any_edge())));
        if poll_once(edge.as_mut()).is_pending() && !watch.changed() {
            edge.await;
        }
        capture::on_edge(&watch, &PwmTimebase, &INPUT_QUEUE);
    }
}

// =============================================================================
// Self-test
// =============================================================================

/// Measure the capture routine with the cycle counter.
///
/// Runs against a scratch queue with interrupts masked, before any
/// capture source is enabled.
pub fn measure_capture_cost() -> CaptureBudget {
    let scratch = InputQueue::<8>::new();
    let mut budget = CaptureBudget::new();

    cortex_m::interrupt::free(|_| {
        for _ in 0..SELF_TEST_RUNS {
            budget.record(cpu_cycles::measure(|| capture::on_edge(&GpioPort, &PwmTimebase, &scratch)));
        }
    });

    budget
}
