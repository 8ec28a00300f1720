//! LED-matrix watchface firmware for Raspberry Pi Pico 2 (RP2350)
//!
//! Shows the watchface on the Pimoroni PIM715 Display Pack 2.8".
//!
//! # Architecture
//!
//! - Main task: waits for the next frame deadline, minute tick or button
//!   poll, forwards it to the [`FaceAnimator`] and redraws the face when the
//!   animator marked it dirty
//! - Minute task: signals every minute boundary of uptime
//!
//! The face is drawn into one persistent framebuffer that is pushed to the
//! panel by DMA after every redraw.
//!
//! # Button Controls
//!
//! - **A**: Advance the clock by one minute
//! - **B**: Toggle 12h / 24h
//! - **X**: Cycle the look (dark / light palette, then square / diagonal cells)
//! - **Y**: Toggle tick reveal scope (all digits / changed digits)

#![no_std]
#![no_main]
// Crate-level lints (match lib.rs for consistency)
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

mod display;
mod st7789;
mod tasks;

use defmt::info;
use embassy_executor::Spawner;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::spi::Spi;
use embassy_time::{Instant, with_deadline};
use embedded_graphics::prelude::*;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use roundy_common::colors::BLACK;
use roundy_common::event_log::tick_label;
use roundy_common::render::draw_face;
use roundy_common::{
    AnimationConfig,
    CellStyle,
    ClockTime,
    DisplayDigits,
    FaceAnimator,
    FaceLayout,
    FrameOutcome,
    HourFormat,
    Palette,
    RenderState,
    RevealScope,
    TickOutcome,
};
use roundy_pico2::{Debounce, FrameDeadline, MinuteClock, RedrawFlag};
use static_cell::ConstStaticCell;
use {defmt_rtt as _, panic_probe as _};

use crate::display::display_spi_config;
use crate::st7789::{BUFFER_SIZE, Canvas, Panel};
use crate::tasks::{MINUTE_TICK, minute_task};

/// Time shown at boot (the board has no battery-backed clock).
const START_TIME: ClockTime = ClockTime { hour: 12, minute: 0 };

/// Upper bound on how long the main loop sleeps between button polls.
const BUTTON_POLL_MS: u64 = 20;

/// The single framebuffer (153,600 bytes), placed in static RAM.
static FRAMEBUFFER: ConstStaticCell<[u8; BUFFER_SIZE]> = ConstStaticCell::new([0; BUFFER_SIZE]);

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Watchface starting...");

    let p = embassy_rp::init(Default::default());

    // PIM715 pinout: CS=17, DC=16, CLK=18, MOSI=19, Backlight=20
    let cs = Output::new(p.PIN_17, Level::High);
    let dc = Output::new(p.PIN_16, Level::Low);
    let _backlight = Output::new(p.PIN_20, Level::High);

    // TX-only SPI with DMA, the panel has no MISO
    let spi = Spi::new_txonly(p.SPI0, p.PIN_18, p.PIN_19, p.DMA_CH0, display_spi_config());

    let mut panel = Panel::new(spi, dc, cs);
    panel.init().await;

    let mut canvas = Canvas::new(FRAMEBUFFER.take());
    canvas.clear(BLACK).ok();
    panel.flush(canvas.as_bytes()).await;
    info!("Display initialized");

    let layout: FaceLayout = match FaceLayout::fit_largest(canvas.bounding_box()) {
        Ok(layout) => layout,
        Err(_) => defmt::panic!("Face does not fit the panel"),
    };
    info!("Face cell size: {} px", layout.cell_size());

    // PIM715 buttons (active-low with internal pull-up): A=12, B=13, X=14, Y=15
    let btn_a = Input::new(p.PIN_12, Pull::Up);
    let btn_b = Input::new(p.PIN_13, Pull::Up);
    let btn_x = Input::new(p.PIN_14, Pull::Up);
    let btn_y = Input::new(p.PIN_15, Pull::Up);
    let mut btn_a_state = Debounce::new();
    let mut btn_b_state = Debounce::new();
    let mut btn_x_state = Debounce::new();
    let mut btn_y_state = Debounce::new();

    spawner.spawn(minute_task()).unwrap();
    info!("Minute task spawned");

    let rng = SmallRng::seed_from_u64(Instant::now().as_ticks());
    let mut animator: FaceAnimator<SmallRng> = FaceAnimator::new(AnimationConfig::new(), rng);
    let mut frames = FrameDeadline::new();
    let mut surface = RedrawFlag::new();
    let mut clock = MinuteClock::new(START_TIME);
    let mut palette = Palette::default();
    let mut cell_style = CellStyle::default();
    let mut render_state: RenderState = RenderState::new();

    let now = Instant::now().as_millis();
    frames.sync(now);
    let digits = DisplayDigits::from_time(clock.now(now), animator.config().hour_format);
    animator.start(digits, &mut frames, &mut surface);
    info!("Startup reveal");

    loop {
        // Sleep until the frame deadline, a minute tick or the next button poll
        let now = Instant::now().as_millis();
        let wake = frames
            .deadline_ms()
            .map_or(now + BUTTON_POLL_MS, |at| at.min(now + BUTTON_POLL_MS));
        let mut tick_time = None;
        if let Ok(boundary) = with_deadline(Instant::from_millis(wake), MINUTE_TICK.wait()).await {
            tick_time = Some(clock.now(boundary));
        }

        let now = Instant::now().as_millis();
        frames.sync(now);

        // Buttons
        if btn_a_state.update(btn_a.is_low(), now) {
            clock.advance(1);
            tick_time = Some(clock.now(now));
            info!("Clock +1 min");
        }

        if btn_b_state.update(btn_b.is_low(), now) {
            let format = animator.config().hour_format.toggle();
            animator.set_hour_format(format);
            tick_time = Some(clock.now(now));
            info!(
                "Format: {}",
                match format {
                    HourFormat::TwentyFour => "24h",
                    HourFormat::Twelve => "12h",
                }
            );
        }

        if btn_x_state.update(btn_x.is_low(), now) {
            palette = palette.toggle();
            if palette == Palette::Dark {
                cell_style = cell_style.toggle();
            }
            surface.mark_dirty();
            info!(
                "Look: {} {}",
                match palette {
                    Palette::Dark => "dark",
                    Palette::Light => "light",
                },
                match cell_style {
                    CellStyle::Square => "square",
                    CellStyle::Diagonal => "diagonal",
                }
            );
        }

        if btn_y_state.update(btn_y.is_low(), now) {
            let scope = animator.config().tick_scope.toggle();
            animator.set_tick_scope(scope);
            info!(
                "Scope: {}",
                match scope {
                    RevealScope::AllDigits => "all digits",
                    RevealScope::ChangedDigits => "changed digits",
                }
            );
        }

        // Clock source
        if let Some(time) = tick_time {
            let outcome = animator.on_clock(time, &mut frames, &mut surface);
            if outcome != TickOutcome::Unchanged {
                info!("Tick {}:{} {}", time.hour, time.minute, tick_label(outcome));
            }
        }

        // Frame timer
        if frames.take_due(now).is_some()
            && animator.on_frame(&mut frames, &mut surface) == FrameOutcome::Finished
        {
            info!("Reveal settled after {} frames", animator.session().current_frame());
        }

        if surface.take() {
            draw_face(
                &mut canvas,
                animator.session(),
                &layout,
                palette,
                cell_style,
                &mut render_state,
            );
            panel.flush(canvas.as_bytes()).await;
        }
    }
}
