//! Capture and queueing engine for the sctrace logic tracer.
//!
//! The tracer timestamps transitions on a handful of digital input lines and
//! streams the samples to a host over a slow, character-oriented debug
//! channel. This crate contains every platform-agnostic stage of that
//! pipeline; the Pico 2 firmware and the desktop simulator only supply the
//! port, the timebase and the channel.
//!
//! ```text
//! Timebase ─┐
//!           ├─▶ capture ─▶ InputQueue ─▶ Dispatcher ─▶ OutputQueue ─▶ Formatter ─▶ Transmitter ─▶ channel
//! Port ─────┘  (interrupt)  (SPSC)       (throttle)    (bounded)       (hex text)   (1 char/pass)
//! ```
//!
//! - [`sample`]: the 4-byte unit flowing through both queues
//! - [`input_queue`]: lock-free hand-off out of interrupt context
//! - [`output_queue`]: larger bounded queue owned by the main loop
//! - [`capture`]: the interrupt-context producer and capture strategies
//! - [`dispatch`]: tick throttling between the two queues
//! - [`format`]: hex rendering into the line buffer
//! - [`transmit`]: the debug channel seam and the one-character pump
//! - [`tracer`]: one main-loop pass tying the stages together
//! - [`config`]: compile-time constants and feature selection
//!
//! # no_std Compatibility
//!
//! The crate is `no_std` except when testing, so the whole pipeline can be
//! exercised on the host with `cargo test -p sctrace-common`.

#![cfg_attr(not(test), no_std)]
// Crate-level lints
#![allow(clippy::cast_possible_truncation)]

pub mod capture;
pub mod config;
pub mod dispatch;
pub mod format;
pub mod input_queue;
pub mod output_queue;
pub mod sample;
pub mod tracer;
pub mod transmit;

// Re-export commonly used items
pub use capture::{ActiveMode, CaptureMode, CapturePort, Timebase};
pub use dispatch::{Dispatch, DispatchStats, Dispatcher, TickThrottle};
pub use format::{Formatter, LineBuffer};
pub use input_queue::InputQueue;
pub use output_queue::OutputQueue;
pub use sample::Sample;
pub use tracer::{Tracer, TracerStats};
pub use transmit::{DebugChannel, Transmitter};
