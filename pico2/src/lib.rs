//! Watchface firmware library - testable modules for the Pico 2 build.
//!
//! The firmware binary (`main.rs`) owns the hardware: SPI display, buttons and
//! the embassy executor. Everything that can be expressed in plain
//! milliseconds lives here so it can be tested on the host.
//!
//! # Testing
//!
//! Run tests on host with:
//! ```bash
//! cargo test -p roundy-pico2 --lib --target x86_64-unknown-linux-gnu  # Linux/macOS
//! cargo test -p roundy-pico2 --lib --target x86_64-pc-windows-msvc    # Windows
//! ```
//!
//! Tests run with `std` enabled (via `cfg_attr`), allowing use of the standard
//! test framework while the actual firmware runs as `no_std`.

// Use no_std only when NOT testing (tests need std for the test harness)
#![cfg_attr(not(test), no_std)]
// Crate-level lints
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

pub mod button;
pub mod schedule;

pub use button::Debounce;
pub use schedule::{FrameDeadline, MinuteClock, RedrawFlag};
