//! Non-modal popup overlay for toggle announcements.

use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Alignment, Baseline, Text, TextStyleBuilder};
use profont::PROFONT_12_POINT;
use roundy_common::Palette;

const POPUP_WIDTH: u32 = 96;
const POPUP_HEIGHT: u32 = 28;
const BORDER: u32 = 2;

/// Draw a centered popup with `label`, coloured to contrast with `palette`.
pub fn draw_popup<D>(
    display: &mut D,
    label: &str,
    palette: Palette,
) where
    D: DrawTarget<Color = Rgb565>,
{
    let center = display.bounding_box().center();
    let fill = palette.level_color(0);
    let ink = palette.level_color(u8::MAX);

    let inner = Rectangle::with_center(center, Size::new(POPUP_WIDTH, POPUP_HEIGHT));
    let outer = Rectangle::with_center(center, Size::new(POPUP_WIDTH + 2 * BORDER, POPUP_HEIGHT + 2 * BORDER));

    outer.into_styled(PrimitiveStyle::with_fill(ink)).draw(display).ok();
    inner.into_styled(PrimitiveStyle::with_fill(fill)).draw(display).ok();

    let text_style = TextStyleBuilder::new()
        .alignment(Alignment::Center)
        .baseline(Baseline::Middle)
        .build();
    Text::with_text_style(label, center, MonoTextStyle::new(&PROFONT_12_POINT, ink), text_style)
        .draw(display)
        .ok();
}
