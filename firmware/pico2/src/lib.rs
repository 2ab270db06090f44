//! sctrace firmware library - host-testable parts of the Pico 2 firmware.
//!
//! This library contains the logic that can be tested on the host machine.
//! The binary (`main.rs`) uses this library and adds the RP2350-specific
//! capture hardware and debug UART. The tracer pipeline itself lives in
//! `sctrace-common`.
//!
//! # Testing
//!
//! Run tests on host with:
//! ```bash
//! cargo test -p sctrace-pico2 --lib --target x86_64-unknown-linux-gnu  # Linux/macOS
//! cargo test -p sctrace-pico2 --lib --target x86_64-pc-windows-msvc    # Windows
//! ```
//!
//! Tests run with `std` enabled (via `cfg_attr`), allowing use of the standard
//! test framework while the actual firmware runs as `no_std`.

// Use no_std only when NOT testing (tests need std for the test harness)
#![cfg_attr(not(test), no_std)]
// Crate-level lints
#![allow(clippy::cast_possible_truncation)]

// Configuration
pub mod config;

// Register mask computation
pub mod gpio_masks;

// Edge re-arm tracking
pub mod port_watch;

mod profiling;

// Re-export at top level for existing imports
pub use profiling::cpu_cycles;
