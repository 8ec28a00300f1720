//! LED-matrix watchface engine.
//!
//! This crate contains the platform-agnostic part of the watchface, shared
//! between the desktop simulator and the Pico 2 firmware:
//!
//! - [`config`]: Grid, layout and animation constants
//! - [`glyphs`]: Digit and colon bitmaps
//! - [`clock`]: Clock time to display digits (12h / 24h)
//! - [`compositor`]: Active mask and distance map
//! - [`delay`]: Per-cell start delays
//! - [`ramp`]: Brightness ramp state machine
//! - [`halo`]: Halo sparkles around the glyph
//! - [`transition`]: Reveal scope and old-glyph fade-out
//! - [`session`]: Per-cell animation state
//! - [`driver`]: `Idle -> Running -> Idle` animation driver
//! - [`colors`]: Level colours and palettes
//! - [`render`]: Face layout, redraw tracking and drawing
//! - [`event_log`]: Driver event ring buffer (no time dependencies)
//!
//! # Host Integration
//!
//! Hosts implement [`FrameTimer`] and [`Surface`], create one
//! [`FaceAnimator`] and forward clock ticks and timer callbacks to it. After
//! every call that marked the surface dirty they draw with
//! [`render::draw_face`].
//!
//! # no_std Compatibility
//!
//! This crate is `no_std` compatible and never allocates. All per-cell
//! state lives in fixed-size arrays and randomness is injected through
//! [`rand::Rng`].

#![no_std]
// Crate-level lints
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::needless_range_loop)]

pub mod clock;
pub mod colors;
pub mod compositor;
pub mod config;
pub mod delay;
pub mod driver;
pub mod event_log;
pub mod glyphs;
pub mod halo;
pub mod ramp;
pub mod render;
pub mod session;
pub mod transition;

// Re-export commonly used items
pub use clock::{ClockTime, DisplayDigits, HourFormat};
pub use colors::Palette;
pub use config::*;
pub use driver::{FaceAnimator, FrameOutcome, FrameTimer, Phase, Surface, TickOutcome, TimerHandle};
pub use render::{CellStyle, FaceLayout, LayoutError, RenderState};
pub use session::Session;
pub use transition::RevealScope;
