//! LED-matrix watchface simulator for desktop platforms.
//!
//! Runs the watchface engine in an `embedded-graphics-simulator` window at
//! the native 144x168 face size. The simulator supplies the three host
//! services the animation driver needs: local time (with a minute offset),
//! a deadline timer and a redraw flag.
//!
//! # Keys
//!
//! | Key | Action |
//! |-----|--------|
//! | Space | Advance the clock by one minute |
//! | H | Toggle 12h / 24h |
//! | I | Invert the palette |
//! | S | Toggle square / diagonal cells |
//! | C | Toggle tick reveal scope (all digits / changed digits) |
//! | R | Replay the startup reveal |
//! | D | Toggle the debug page |
//! | Esc | Quit |

// Crate-level lints
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]

mod clock;
mod host;
mod popup;
mod screens;
mod timing;

use std::thread;
use std::time::Instant;

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics_simulator::sdl2::Keycode;
use embedded_graphics_simulator::{OutputSettingsBuilder, SimulatorDisplay, SimulatorEvent, Window};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use roundy_common::config::{CELL_SIZE, GRID_COLS, GRID_ROWS};
use roundy_common::event_log::EventLog;
use roundy_common::render::draw_face;
use roundy_common::{
    AnimationConfig,
    CellStyle,
    DisplayDigits,
    FaceAnimator,
    FaceLayout,
    HourFormat,
    Palette,
    RenderState,
    RevealScope,
    TickOutcome,
};

use crate::clock::WallClock;
use crate::host::{DeadlineTimer, DirtyFlag};
use roundy_common::Surface;
use crate::popup::Popup;
use crate::screens::{DebugInfo, draw_debug_page, draw_popup};
use crate::timing::{CLOCK_POLL, POLL_TIME};

/// Simulator window size: one face at the default cell size.
const FACE_SIZE: Size = FaceLayout::<GRID_COLS, GRID_ROWS>::face_size(CELL_SIZE);

fn main() {
    let mut display: SimulatorDisplay<Rgb565> = SimulatorDisplay::new(FACE_SIZE);
    let output_settings = OutputSettingsBuilder::new().scale(3).build();
    let mut window = Window::new("Roundy Watchface Sim", &output_settings);

    let layout: FaceLayout = match FaceLayout::fit(display.bounding_box(), CELL_SIZE) {
        Ok(layout) => layout,
        Err(e) => {
            eprintln!("layout: {e}");
            return;
        }
    };

    let config = AnimationConfig::new();
    if let Err(e) = config.validate() {
        eprintln!("config: {e}");
        return;
    }

    let mut animator: FaceAnimator<SmallRng> = FaceAnimator::new(config, SmallRng::from_rng(&mut rand::rng()));
    let mut timer = DeadlineTimer::new();
    let mut surface = DirtyFlag::new();
    let mut clock = WallClock::new();

    // UI state
    let mut palette = Palette::default();
    let mut cell_style = CellStyle::default();
    let mut active_popup: Option<Popup> = None;
    let mut show_debug = false;
    let mut render_state: RenderState = RenderState::new();
    let mut last_clock_poll = Instant::now();

    let mut event_log = EventLog::new();
    event_log.push("Simulator started");

    let now = clock.now();
    let outcome = animator.start(
        DisplayDigits::from_time(now, animator.config().hour_format),
        &mut timer,
        &mut surface,
    );
    event_log.push_tick(now, outcome);

    window.update(&display);

    loop {
        let mut poll_clock = last_clock_poll.elapsed() >= CLOCK_POLL;

        // Handle events
        for ev in window.events() {
            match ev {
                SimulatorEvent::Quit => {
                    animator.stop(&mut timer);
                    return;
                }
                SimulatorEvent::KeyDown { keycode, repeat, .. } => {
                    if repeat {
                        continue;
                    }
                    match keycode {
                        Keycode::Escape => {
                            animator.stop(&mut timer);
                            return;
                        }
                        Keycode::Space => {
                            clock.advance(1);
                            poll_clock = true;
                        }
                        Keycode::H => {
                            let format = animator.config().hour_format.toggle();
                            animator.set_hour_format(format);
                            active_popup = Some(Popup::Format(format, Instant::now()));
                            event_log.push(match format {
                                HourFormat::TwentyFour => "Format: 24h",
                                HourFormat::Twelve => "Format: 12h",
                            });
                            poll_clock = true;
                            surface.mark_dirty();
                        }
                        Keycode::I => {
                            palette = palette.toggle();
                            active_popup = Some(Popup::Palette(palette, Instant::now()));
                            surface.mark_dirty();
                        }
                        Keycode::S => {
                            cell_style = cell_style.toggle();
                            active_popup = Some(Popup::Style(cell_style, Instant::now()));
                            surface.mark_dirty();
                        }
                        Keycode::C => {
                            let scope = animator.config().tick_scope.toggle();
                            animator.set_tick_scope(scope);
                            active_popup = Some(Popup::Scope(scope, Instant::now()));
                            event_log.push(match scope {
                                RevealScope::AllDigits => "Scope: all digits",
                                RevealScope::ChangedDigits => "Scope: changed digits",
                            });
                            surface.mark_dirty();
                        }
                        Keycode::R => {
                            let digits = animator.session().digits();
                            animator.start(digits, &mut timer, &mut surface);
                            event_log.push("Replay");
                        }
                        Keycode::D => {
                            show_debug = !show_debug;
                            if !show_debug {
                                render_state.mark_display_cleared();
                            }
                            surface.mark_dirty();
                        }
                        _ => {}
                    }
                }
                _ => {}
            }
        }

        // Clock source
        if poll_clock {
            last_clock_poll = Instant::now();
            let now = clock.now();
            let outcome = animator.on_clock(now, &mut timer, &mut surface);
            if outcome != TickOutcome::Unchanged {
                event_log.push_tick(now, outcome);
            }
        }

        // Frame timer
        if timer.take_due(Instant::now()).is_some() {
            let outcome = animator.on_frame(&mut timer, &mut surface);
            event_log.push_frame(outcome);
        }

        // Check popup expiration
        if let Some(ref popup) = active_popup
            && popup.is_expired()
        {
            active_popup = None;
            render_state.mark_display_cleared();
            surface.mark_dirty();
        }

        if surface.take() {
            if show_debug {
                let config = animator.config();
                let info = DebugInfo {
                    phase: animator.phase(),
                    session: animator.session(),
                    offset_minutes: clock.offset_minutes(),
                    hour_format: match config.hour_format {
                        HourFormat::TwentyFour => "24H",
                        HourFormat::Twelve => "12H",
                    },
                    scope: match config.tick_scope {
                        RevealScope::AllDigits => "ALL",
                        RevealScope::ChangedDigits => "CHG",
                    },
                };
                draw_debug_page(&mut display, &info, &event_log);
            } else {
                draw_face(
                    &mut display,
                    animator.session(),
                    &layout,
                    palette,
                    cell_style,
                    &mut render_state,
                );
                if let Some(ref popup) = active_popup {
                    draw_popup(&mut display, popup.label(), palette);
                }
            }
            window.update(&display);
        }

        thread::sleep(POLL_TIME);
    }
}
