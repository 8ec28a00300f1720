//! Async ST7789 panel driver with a single persistent framebuffer.
//!
//! The watchface redraws only cells whose level changed, so the framebuffer
//! must keep the previous frame's pixels. One 320x240 RGB565 buffer
//! (153,600 bytes) is drawn into and then pushed to the panel with one DMA
//! transfer.
//!
//! - [`Canvas`]: `DrawTarget` over the framebuffer
//! - [`Panel`]: owns SPI and the control pins, sends init and frames

use embassy_rp::gpio::Output;
use embassy_rp::peripherals::SPI0;
use embassy_rp::spi::{Async, Spi};
use embassy_time::Timer;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::pixelcolor::raw::RawU16;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

/// Panel size in landscape orientation.
pub const WIDTH: usize = 320;
pub const HEIGHT: usize = 240;

/// Framebuffer length in bytes (big-endian RGB565).
pub const BUFFER_SIZE: usize = WIDTH * HEIGHT * 2;

// ST7789 commands
const SWRESET: u8 = 0x01;
const SLPOUT: u8 = 0x11;
const NORON: u8 = 0x13;
const INVON: u8 = 0x21;
const DISPON: u8 = 0x29;
const CASET: u8 = 0x2A;
const RASET: u8 = 0x2B;
const RAMWR: u8 = 0x2C;
const MADCTL: u8 = 0x36;
const COLMOD: u8 = 0x3A;

// MADCTL flags
const MADCTL_MX: u8 = 0x40;
const MADCTL_MV: u8 = 0x20;

// 16 bits per pixel
const COLMOD_RGB565: u8 = 0x55;

// =============================================================================
// Panel
// =============================================================================

/// ST7789 on SPI0 with manual chip select.
pub struct Panel<'d> {
    spi: Spi<'d, SPI0, Async>,
    dc: Output<'d>,
    cs: Output<'d>,
}

impl<'d> Panel<'d> {
    pub fn new(
        spi: Spi<'d, SPI0, Async>,
        dc: Output<'d>,
        cs: Output<'d>,
    ) -> Self {
        Self { spi, dc, cs }
    }

    /// Wake the panel, select RGB565 landscape and open a full-screen window.
    pub async fn init(&mut self) {
        self.command(SWRESET, &[]).await;
        Timer::after_millis(150).await;

        self.command(SLPOUT, &[]).await;
        Timer::after_millis(10).await;

        self.command(COLMOD, &[COLMOD_RGB565]).await;
        // Row/column exchange plus X mirror gives 320x240 landscape
        self.command(MADCTL, &[MADCTL_MV | MADCTL_MX]).await;
        // PIM715 panel needs inversion
        self.command(INVON, &[]).await;
        self.command(NORON, &[]).await;
        Timer::after_millis(10).await;

        self.command(DISPON, &[]).await;
        Timer::after_millis(10).await;

        let [x_hi, x_lo] = (WIDTH as u16 - 1).to_be_bytes();
        let [y_hi, y_lo] = (HEIGHT as u16 - 1).to_be_bytes();
        self.command(CASET, &[0, 0, x_hi, x_lo]).await;
        self.command(RASET, &[0, 0, y_hi, y_lo]).await;
    }

    /// Send a command byte followed by optional parameter bytes.
    async fn command(
        &mut self,
        cmd: u8,
        params: &[u8],
    ) {
        self.cs.set_low();
        self.dc.set_low();
        self.spi.write(&[cmd]).await.ok();
        if !params.is_empty() {
            self.dc.set_high();
            self.spi.write(params).await.ok();
        }
        self.cs.set_high();
    }

    /// Push the whole framebuffer to panel RAM.
    pub async fn flush(
        &mut self,
        buffer: &[u8],
    ) {
        self.cs.set_low();
        self.dc.set_low();
        self.spi.blocking_write(&[RAMWR]).ok();
        self.dc.set_high();
        self.spi.write(buffer).await.ok();
        self.cs.set_high();
    }
}

// =============================================================================
// Canvas
// =============================================================================

/// Framebuffer draw target.
pub struct Canvas<'a> {
    framebuffer: &'a mut [u8; BUFFER_SIZE],
}

impl<'a> Canvas<'a> {
    pub fn new(framebuffer: &'a mut [u8; BUFFER_SIZE]) -> Self { Self { framebuffer } }

    /// Raw bytes for [`Panel::flush`].
    #[inline]
    pub fn as_bytes(&self) -> &[u8] { self.framebuffer.as_slice() }

    #[inline]
    fn pixel_bytes(color: Rgb565) -> [u8; 2] { RawU16::from(color).into_inner().to_be_bytes() }

    /// Fill `width` pixels of row `y` starting at column `x`.
    fn fill_span(
        &mut self,
        x: usize,
        y: usize,
        width: usize,
        bytes: [u8; 2],
    ) {
        let start = (y * WIDTH + x) * 2;
        for pixel in self.framebuffer[start..start + width * 2].chunks_exact_mut(2) {
            pixel.copy_from_slice(&bytes);
        }
    }
}

impl OriginDimensions for Canvas<'_> {
    fn size(&self) -> Size { Size::new(WIDTH as u32, HEIGHT as u32) }
}

impl DrawTarget for Canvas<'_> {
    type Color = Rgb565;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(
        &mut self,
        pixels: I,
    ) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if point.x >= 0 && point.y >= 0 && (point.x as usize) < WIDTH && (point.y as usize) < HEIGHT {
                self.fill_span(point.x as usize, point.y as usize, 1, Self::pixel_bytes(color));
            }
        }
        Ok(())
    }

    fn fill_solid(
        &mut self,
        area: &Rectangle,
        color: Self::Color,
    ) -> Result<(), Self::Error> {
        let area = area.intersection(&self.bounding_box());
        if area.size == Size::zero() {
            return Ok(());
        }

        let bytes = Self::pixel_bytes(color);
        let x = area.top_left.x as usize;
        let width = area.size.width as usize;
        for y in area.rows() {
            self.fill_span(x, y as usize, width, bytes);
        }
        Ok(())
    }

    fn clear(
        &mut self,
        color: Self::Color,
    ) -> Result<(), Self::Error> {
        let bytes = Self::pixel_bytes(color);
        for pixel in self.framebuffer.chunks_exact_mut(2) {
            pixel.copy_from_slice(&bytes);
        }
        Ok(())
    }
}
