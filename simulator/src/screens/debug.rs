//! Debug page rendering.
//!
//! Shows driver state and the event log in place of the face.

use core::fmt::Write;

use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Line, PrimitiveStyle};
use embedded_graphics::text::Text;
use embedded_graphics_simulator::SimulatorDisplay;
use heapless::String;
use profont::PROFONT_7_POINT;
use roundy_common::colors::{BLACK, LEVEL_LOW, LEVEL_MID, WHITE};
use roundy_common::config::{CELL_SIZE, GRID_COLS};
use roundy_common::event_log::{EventLog, LOG_LINE_LENGTH};
use roundy_common::{Phase, Session};

const LINE_HEIGHT: i32 = 10;
const MARGIN_X: i32 = 3;
const HEADER_Y: i32 = 9;
const STATS_Y: i32 = 24;
const LOG_Y: i32 = 84;
const LOG_TEXT_X: i32 = MARGIN_X + 8;

// A full log line must fit the page after the prompt.
const PAGE_WIDTH: u32 = GRID_COLS as u32 * CELL_SIZE;
const _: () = assert!(
    LOG_TEXT_X as u32 + LOG_LINE_LENGTH as u32 * PROFONT_7_POINT.character_size.width <= PAGE_WIDTH
);

const HEADER_COLOR: Rgb565 = WHITE;
const LABEL_COLOR: Rgb565 = LEVEL_MID;
const DIVIDER_COLOR: Rgb565 = LEVEL_LOW;

/// Settings shown on the debug page.
pub struct DebugInfo<'a> {
    pub phase: Phase,
    pub session: &'a Session,
    pub offset_minutes: u32,
    pub hour_format: &'static str,
    pub scope: &'static str,
}

pub fn draw_debug_page(
    display: &mut SimulatorDisplay<Rgb565>,
    info: &DebugInfo<'_>,
    log: &EventLog,
) {
    display.clear(BLACK).ok();

    let header_style = MonoTextStyle::new(&PROFONT_7_POINT, HEADER_COLOR);
    let label_style = MonoTextStyle::new(&PROFONT_7_POINT, LABEL_COLOR);
    let width = display.bounding_box().size.width as i32;

    Text::new("DEBUG VIEW", Point::new(MARGIN_X, HEADER_Y), header_style)
        .draw(display)
        .ok();
    draw_horizontal_line(display, HEADER_Y + 4, width);

    let phase = match info.phase {
        Phase::Idle => "IDLE",
        Phase::Running => "RUNNING",
    };

    let mut y = STATS_Y;
    let mut s: String<28> = String::new();
    let _ = write!(s, "Phase: {phase}");
    Text::new(&s, Point::new(MARGIN_X, y), label_style).draw(display).ok();
    y += LINE_HEIGHT;

    let mut s: String<28> = String::new();
    let _ = write!(
        s,
        "Frame: {}/{}",
        info.session.current_frame(),
        info.session.total_frames()
    );
    Text::new(&s, Point::new(MARGIN_X, y), label_style).draw(display).ok();
    y += LINE_HEIGHT;

    let mut s: String<28> = String::new();
    let _ = write!(s, "Lit:   {}", info.session.lit_cells());
    Text::new(&s, Point::new(MARGIN_X, y), label_style).draw(display).ok();
    y += LINE_HEIGHT;

    let mut s: String<28> = String::new();
    let _ = write!(s, "Mode:  {} {}", info.hour_format, info.scope);
    Text::new(&s, Point::new(MARGIN_X, y), label_style).draw(display).ok();
    y += LINE_HEIGHT;

    let mut s: String<28> = String::new();
    let _ = write!(s, "Offset:+{}min", info.offset_minutes);
    Text::new(&s, Point::new(MARGIN_X, y), label_style).draw(display).ok();

    draw_horizontal_line(display, LOG_Y - 10, width);
    draw_log(display, log);
}

fn draw_log(
    display: &mut SimulatorDisplay<Rgb565>,
    log: &EventLog,
) {
    let prompt_style = MonoTextStyle::new(&PROFONT_7_POINT, LABEL_COLOR);
    let text_style = MonoTextStyle::new(&PROFONT_7_POINT, WHITE);

    let mut y = LOG_Y;
    for line in log.iter() {
        Text::new(">", Point::new(MARGIN_X, y), prompt_style).draw(display).ok();
        Text::new(line, Point::new(LOG_TEXT_X, y), text_style)
            .draw(display)
            .ok();
        y += LINE_HEIGHT;
    }
}

fn draw_horizontal_line(
    display: &mut SimulatorDisplay<Rgb565>,
    y: i32,
    width: i32,
) {
    Line::new(Point::new(2, y), Point::new(width - 2, y))
        .into_styled(PrimitiveStyle::with_stroke(DIVIDER_COLOR, 1))
        .draw(display)
        .ok();
}
