//! Profiling utilities.
//!
//! - `cpu_cycles`: CPU cycle counter via DWT for capture cost measurement

pub mod cpu_cycles;
