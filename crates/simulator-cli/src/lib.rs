//! Host-side collaborators for the SRM-32 simulator.
//!
//! The core crate owns the decode/execute engine; this crate owns
//! everything that touches a disk or a terminal: the binary program-image
//! codec, machine state listings, and the interactive step debugger.

/// Binary program image parsing and dump writing.
pub mod image;
pub use image::{encode_image, parse_image, ImageError};

/// Human-readable listings of machine state.
pub mod print;
pub use print::{format_cpu, format_data, format_program};

/// Interactive step debugger for the simulation driver.
pub mod debug;
pub use debug::InteractiveDebugger;

#[cfg(test)]
use tempfile as _;
