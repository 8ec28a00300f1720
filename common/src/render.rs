//! Face layout and drawing.
//!
//! This module provides:
//! - [`FaceLayout`] - pixel placement of the cell grid on a display
//! - [`RenderState`] - tracks what is on screen for conditional redraws
//! - [`CellStyle`] - how a single cell is drawn
//! - [`draw_face`] - draws a [`Session`] onto any Rgb565 `DrawTarget`
//!
//! # Cell Drawing
//!
//! Each cell is a square of `cell_size` pixels.
//!
//! - [`CellStyle::Square`]: a one pixel outline in the palette's grid colour
//!   and a filled inset in the colour of the cell's level.
//! - [`CellStyle::Diagonal`]: dark cells carry a `\` slash in the grid
//!   colour. Lit cells are filled completely and crossed by a `/` slash in
//!   the background colour.
//!
//! Cells smaller than 3 px are filled completely in either style.
//!
//! # Update Strategy
//!
//! | Element | Update Frequency | Strategy |
//! |---------|-----------------|----------|
//! | Background + outlines | First frame / palette change / external clear | Draw-once tracking |
//! | Cell fill | When the cell's level changes | Per-cell level cache |

use core::fmt;

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Line, PrimitiveStyle, PrimitiveStyleBuilder, Rectangle, StrokeAlignment};

use crate::colors::Palette;
use crate::compositor::CellGrid;
use crate::config::{GRID_COLS, GRID_ROWS};
use crate::session::Session;

// =============================================================================
// Layout
// =============================================================================

/// The display cannot hold the face.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum LayoutError {
    /// Cell size of zero pixels.
    ZeroCellSize,
    /// Grid at the requested cell size is larger than the display.
    TooSmall { needed: Size, available: Size },
}

impl fmt::Display for LayoutError {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Self::ZeroCellSize => f.write_str("cell size must be at least 1 px"),
            Self::TooSmall { needed, available } => write!(
                f,
                "face needs {}x{} px but display has {}x{} px",
                needed.width, needed.height, available.width, available.height
            ),
        }
    }
}

/// Pixel placement of a `W`x`H` cell grid, centered in the display bounds.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct FaceLayout<const W: usize = GRID_COLS, const H: usize = GRID_ROWS> {
    origin: Point,
    cell_size: u32,
}

impl<const W: usize, const H: usize> FaceLayout<W, H> {
    /// Pixel size of the whole grid at `cell_size`.
    pub const fn face_size(cell_size: u32) -> Size { Size::new(W as u32 * cell_size, H as u32 * cell_size) }

    /// Center the grid in `bounds` at `cell_size` pixels per cell.
    pub fn fit(
        bounds: Rectangle,
        cell_size: u32,
    ) -> Result<Self, LayoutError> {
        if cell_size == 0 {
            return Err(LayoutError::ZeroCellSize);
        }

        let needed = Self::face_size(cell_size);
        let available = bounds.size;
        if needed.width > available.width || needed.height > available.height {
            return Err(LayoutError::TooSmall { needed, available });
        }

        let offset = Point::new(
            ((available.width - needed.width) / 2) as i32,
            ((available.height - needed.height) / 2) as i32,
        );
        Ok(Self {
            origin: bounds.top_left + offset,
            cell_size,
        })
    }

    /// Largest cell size that fits in `bounds`.
    pub fn fit_largest(bounds: Rectangle) -> Result<Self, LayoutError> {
        let cell_size = (bounds.size.width / W as u32).min(bounds.size.height / H as u32);
        Self::fit(bounds, cell_size.max(1))
    }

    /// Pixel rectangle of the cell at (`row`, `col`).
    #[inline]
    pub const fn cell_rect(
        &self,
        row: usize,
        col: usize,
    ) -> Rectangle {
        Rectangle::new(
            Point::new(
                self.origin.x + (col as u32 * self.cell_size) as i32,
                self.origin.y + (row as u32 * self.cell_size) as i32,
            ),
            Size::new(self.cell_size, self.cell_size),
        )
    }

    /// Rectangle filled with the cell's level colour.
    #[inline]
    pub const fn cell_fill_rect(
        &self,
        row: usize,
        col: usize,
    ) -> Rectangle {
        let rect = self.cell_rect(row, col);
        if self.cell_size < 3 {
            return rect;
        }
        Rectangle::new(
            Point::new(rect.top_left.x + 1, rect.top_left.y + 1),
            Size::new(self.cell_size - 2, self.cell_size - 2),
        )
    }

    /// Top-left to bottom-right slash through the cell.
    pub const fn cell_backslash(
        &self,
        row: usize,
        col: usize,
    ) -> Line {
        let rect = self.cell_rect(row, col);
        let last = self.cell_size as i32 - 1;
        Line::new(
            rect.top_left,
            Point::new(rect.top_left.x + last, rect.top_left.y + last),
        )
    }

    /// Top-right to bottom-left slash through the cell.
    pub const fn cell_slash(
        &self,
        row: usize,
        col: usize,
    ) -> Line {
        let rect = self.cell_rect(row, col);
        let last = self.cell_size as i32 - 1;
        Line::new(
            Point::new(rect.top_left.x + last, rect.top_left.y),
            Point::new(rect.top_left.x, rect.top_left.y + last),
        )
    }

    /// Pixel rectangle of the whole grid.
    #[inline]
    pub const fn bounds(&self) -> Rectangle { Rectangle::new(self.origin, Self::face_size(self.cell_size)) }

    #[inline]
    pub const fn cell_size(&self) -> u32 { self.cell_size }
}

// =============================================================================
// Cell Style
// =============================================================================

/// Cell drawing style.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum CellStyle {
    /// Outlined square with an inset fill.
    #[default]
    Square,
    /// Diagonal slash cells.
    Diagonal,
}

impl CellStyle {
    /// Switch between square and diagonal cells.
    #[inline]
    pub const fn toggle(self) -> Self {
        match self {
            Self::Square => Self::Diagonal,
            Self::Diagonal => Self::Square,
        }
    }
}

// =============================================================================
// Render State Tracking
// =============================================================================

/// Level cache value meaning "not drawn since the last background redraw".
const LEVEL_UNKNOWN: u8 = u8::MAX;

/// Tracks what is on screen so each frame only redraws what changed.
pub struct RenderState<const W: usize = GRID_COLS, const H: usize = GRID_ROWS> {
    /// Level last drawn in each cell.
    drawn: CellGrid<u8, W, H>,

    /// Palette and cell style of the last background draw.
    prev_look: Option<(Palette, CellStyle)>,

    /// Whether this is the first frame (need full redraw).
    first_frame: bool,

    /// Whether the display was cleared externally (e.g. overlay closed).
    display_cleared: bool,
}

impl<const W: usize, const H: usize> RenderState<W, H> {
    /// Create a new render state for first frame.
    pub const fn new() -> Self {
        Self {
            drawn: [[LEVEL_UNKNOWN; W]; H],
            prev_look: None,
            first_frame: true,
            display_cleared: false,
        }
    }

    /// Check if the background needs drawing for `palette` and `style`.
    #[inline]
    pub fn need_background(
        &self,
        palette: Palette,
        style: CellStyle,
    ) -> bool {
        self.first_frame || self.display_cleared || self.prev_look != Some((palette, style))
    }

    /// Record a background draw. Every cell must be redrawn afterwards.
    pub fn mark_background_drawn(
        &mut self,
        palette: Palette,
        style: CellStyle,
    ) {
        self.prev_look = Some((palette, style));
        self.drawn = [[LEVEL_UNKNOWN; W]; H];
    }

    /// Record that the cell now shows `level`. Returns whether it changed.
    #[inline]
    pub fn update_cell(
        &mut self,
        row: usize,
        col: usize,
        level: u8,
    ) -> bool {
        let changed = self.drawn[row][col] != level;
        self.drawn[row][col] = level;
        changed
    }

    /// Check if this is the first frame.
    #[inline]
    pub const fn is_first_frame(&self) -> bool { self.first_frame }

    /// Mark that the display was cleared externally.
    pub fn mark_display_cleared(&mut self) { self.display_cleared = true; }

    /// Call at end of frame to reset per-frame state.
    pub fn end_frame(&mut self) {
        self.first_frame = false;
        self.display_cleared = false;
    }
}

impl<const W: usize, const H: usize> Default for RenderState<W, H> {
    fn default() -> Self { Self::new() }
}

// =============================================================================
// Drawing
// =============================================================================

/// Fill the face area with the background and mark every cell in `style`.
pub fn draw_background<D, const W: usize, const H: usize>(
    display: &mut D,
    layout: &FaceLayout<W, H>,
    palette: Palette,
    style: CellStyle,
) where
    D: DrawTarget<Color = Rgb565>,
{
    layout
        .bounds()
        .into_styled(PrimitiveStyle::with_fill(palette.background()))
        .draw(display)
        .ok();

    if layout.cell_size() < 3 {
        return;
    }

    match style {
        CellStyle::Square => {
            let outline = PrimitiveStyleBuilder::new()
                .stroke_color(palette.grid())
                .stroke_width(1)
                .stroke_alignment(StrokeAlignment::Inside)
                .build();
            for row in 0..H {
                for col in 0..W {
                    layout.cell_rect(row, col).into_styled(outline).draw(display).ok();
                }
            }
        }
        CellStyle::Diagonal => {
            let slash = PrimitiveStyle::with_stroke(palette.grid(), 1);
            for row in 0..H {
                for col in 0..W {
                    layout.cell_backslash(row, col).into_styled(slash).draw(display).ok();
                }
            }
        }
    }
}

/// Redraw one cell at `level`.
fn draw_cell<D, const W: usize, const H: usize>(
    display: &mut D,
    layout: &FaceLayout<W, H>,
    palette: Palette,
    style: CellStyle,
    row: usize,
    col: usize,
    level: u8,
) where
    D: DrawTarget<Color = Rgb565>,
{
    let fill = PrimitiveStyle::with_fill(palette.level_color(level));
    if style == CellStyle::Square || layout.cell_size() < 3 {
        layout.cell_fill_rect(row, col).into_styled(fill).draw(display).ok();
        return;
    }

    layout.cell_rect(row, col).into_styled(fill).draw(display).ok();
    let (line, color) = if level == 0 {
        (layout.cell_backslash(row, col), palette.grid())
    } else {
        (layout.cell_slash(row, col), palette.background())
    };
    line.into_styled(PrimitiveStyle::with_stroke(color, 1)).draw(display).ok();
}

/// Draw the session, redrawing only what changed since the last call.
///
/// Returns the number of cells filled.
pub fn draw_face<D, const W: usize, const H: usize>(
    display: &mut D,
    session: &Session<W, H>,
    layout: &FaceLayout<W, H>,
    palette: Palette,
    style: CellStyle,
    state: &mut RenderState<W, H>,
) -> u32
where
    D: DrawTarget<Color = Rgb565>,
{
    if state.need_background(palette, style) {
        draw_background(display, layout, palette, style);
        state.mark_background_drawn(palette, style);
    }

    let mut filled = 0;
    for row in 0..H {
        for col in 0..W {
            let level = session.level(row, col);
            if !state.update_cell(row, col, level) {
                continue;
            }
            draw_cell(display, layout, palette, style, row, col, level);
            filled += 1;
        }
    }

    state.end_frame();
    filled
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use embedded_graphics::mock_display::MockDisplay;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;
    use crate::clock::{ClockTime, DisplayDigits, HourFormat};
    use crate::colors::{BLACK, GRID_DARK, WHITE};
    use crate::compositor::Placement;
    use crate::glyphs::Symbol;
    use crate::transition::RevealScope;

    fn settled<const W: usize, const H: usize>(
        session: &mut Session<W, H>,
        digits: DisplayDigits,
    ) {
        let mut rng = SmallRng::seed_from_u64(0);
        session.begin(digits, RevealScope::AllDigits, 0, 0, &mut rng);
    }

    #[test]
    fn test_fit_centers_face() {
        let bounds = Rectangle::new(Point::zero(), Size::new(320, 240));
        let layout: FaceLayout = FaceLayout::fit(bounds, 5).unwrap();
        assert_eq!(layout.bounds().size, Size::new(180, 210));
        assert_eq!(layout.bounds().top_left, Point::new(70, 15));
    }

    #[test]
    fn test_fit_rejects_small_display() {
        let bounds = Rectangle::new(Point::zero(), Size::new(100, 100));
        let err = FaceLayout::<GRID_COLS, GRID_ROWS>::fit(bounds, 4).unwrap_err();
        assert_eq!(
            err,
            LayoutError::TooSmall {
                needed: Size::new(144, 168),
                available: Size::new(100, 100),
            }
        );
        assert_eq!(FaceLayout::<GRID_COLS, GRID_ROWS>::fit(bounds, 0), Err(LayoutError::ZeroCellSize));
    }

    #[test]
    fn test_fit_largest() {
        let panel = Rectangle::new(Point::zero(), Size::new(320, 240));
        assert_eq!(FaceLayout::<GRID_COLS, GRID_ROWS>::fit_largest(panel).unwrap().cell_size(), 5);

        let watch = Rectangle::new(Point::zero(), Size::new(144, 168));
        assert_eq!(FaceLayout::<GRID_COLS, GRID_ROWS>::fit_largest(watch).unwrap().cell_size(), 4);

        let tiny = Rectangle::new(Point::zero(), Size::new(10, 10));
        assert!(FaceLayout::<GRID_COLS, GRID_ROWS>::fit_largest(tiny).is_err());
    }

    #[test]
    fn test_cell_rects() {
        let layout: FaceLayout<8, 8> = FaceLayout::fit(Rectangle::new(Point::zero(), Size::new(32, 32)), 4).unwrap();
        assert_eq!(layout.cell_rect(1, 2), Rectangle::new(Point::new(8, 4), Size::new(4, 4)));
        assert_eq!(layout.cell_fill_rect(1, 2), Rectangle::new(Point::new(9, 5), Size::new(2, 2)));
    }

    #[test]
    fn test_draw_single_pixel_cells() {
        let mut session: Session = Session::new();
        settled(&mut session, DisplayDigits::from_time(ClockTime { hour: 12, minute: 34 }, HourFormat::TwentyFour));

        let mut display: MockDisplay<Rgb565> = MockDisplay::new();
        display.set_allow_overdraw(true);
        let layout: FaceLayout = FaceLayout::fit(display.bounding_box(), 1).unwrap();
        let origin = layout.bounds().top_left;
        let mut state = RenderState::new();

        draw_face(&mut display, &session, &layout, Palette::Dark, CellStyle::Square, &mut state);

        for row in 0..GRID_ROWS {
            for col in 0..GRID_COLS {
                let expected = if session.active()[row][col] { WHITE } else { BLACK };
                let pixel = display.get_pixel(origin + Point::new(col as i32, row as i32));
                assert_eq!(pixel, Some(expected), "cell ({row}, {col})");
            }
        }
    }

    #[test]
    fn test_draw_outlined_cells() {
        let mut session: Session<8, 8> = Session::with_placement(Placement { start_col: 0, start_row: 0 });
        settled(&mut session, DisplayDigits([Symbol::Digit(1), Symbol::Blank, Symbol::Blank, Symbol::Blank]));

        let mut display: MockDisplay<Rgb565> = MockDisplay::new();
        display.set_allow_overdraw(true);
        let layout: FaceLayout<8, 8> = FaceLayout::fit(Rectangle::new(Point::zero(), Size::new(32, 32)), 4).unwrap();
        let mut state = RenderState::new();

        draw_face(&mut display, &session, &layout, Palette::Dark, CellStyle::Square, &mut state);

        // "....##": cell (0, 4) lit, cell (0, 0) dark
        assert_eq!(display.get_pixel(Point::new(16, 0)), Some(GRID_DARK));
        assert_eq!(display.get_pixel(Point::new(17, 1)), Some(WHITE));
        assert_eq!(display.get_pixel(Point::new(0, 0)), Some(GRID_DARK));
        assert_eq!(display.get_pixel(Point::new(1, 1)), Some(BLACK));
    }

    #[test]
    fn test_draw_diagonal_cells() {
        let mut session: Session<8, 8> = Session::with_placement(Placement { start_col: 0, start_row: 0 });
        settled(&mut session, DisplayDigits([Symbol::Digit(1), Symbol::Blank, Symbol::Blank, Symbol::Blank]));

        let mut display: MockDisplay<Rgb565> = MockDisplay::new();
        display.set_allow_overdraw(true);
        let layout: FaceLayout<8, 8> = FaceLayout::fit(Rectangle::new(Point::zero(), Size::new(32, 32)), 4).unwrap();
        let mut state = RenderState::new();

        draw_face(&mut display, &session, &layout, Palette::Dark, CellStyle::Diagonal, &mut state);

        // Dark cell (0, 0): `\` in the grid colour, background elsewhere
        for i in 0..4 {
            assert_eq!(display.get_pixel(Point::new(i, i)), Some(GRID_DARK));
        }
        assert_eq!(display.get_pixel(Point::new(1, 0)), Some(BLACK));
        assert_eq!(display.get_pixel(Point::new(3, 0)), Some(BLACK));

        // Lit cell (0, 4) at x = 16..20: full fill crossed by `/` in the background colour
        for i in 0..4 {
            assert_eq!(display.get_pixel(Point::new(19 - i, i)), Some(BLACK));
        }
        assert_eq!(display.get_pixel(Point::new(16, 0)), Some(WHITE));
        assert_eq!(display.get_pixel(Point::new(17, 1)), Some(WHITE));
        assert_eq!(display.get_pixel(Point::new(19, 3)), Some(WHITE));
    }

    #[test]
    fn test_diagonal_cell_restores_background_slash() {
        let mut session: Session<8, 8> = Session::with_placement(Placement { start_col: 0, start_row: 0 });
        settled(&mut session, DisplayDigits([Symbol::Digit(1), Symbol::Blank, Symbol::Blank, Symbol::Blank]));

        let mut display: MockDisplay<Rgb565> = MockDisplay::new();
        display.set_allow_overdraw(true);
        let layout: FaceLayout<8, 8> = FaceLayout::fit(Rectangle::new(Point::zero(), Size::new(32, 32)), 4).unwrap();
        let mut state = RenderState::new();
        draw_face(&mut display, &session, &layout, Palette::Dark, CellStyle::Diagonal, &mut state);

        // Blank face: the lit cell goes dark and gets its `\` back
        settled(&mut session, DisplayDigits([Symbol::Blank; 4]));
        draw_face(&mut display, &session, &layout, Palette::Dark, CellStyle::Diagonal, &mut state);
        for i in 0..4 {
            assert_eq!(display.get_pixel(Point::new(16 + i, i)), Some(GRID_DARK));
        }
        assert_eq!(display.get_pixel(Point::new(19, 0)), Some(BLACK));
    }

    #[test]
    fn test_style_change_forces_full_redraw() {
        let session: Session<8, 8> = Session::with_placement(Placement { start_col: 0, start_row: 0 });
        let mut display: MockDisplay<Rgb565> = MockDisplay::new();
        display.set_allow_overdraw(true);
        let layout: FaceLayout<8, 8> = FaceLayout::fit(Rectangle::new(Point::zero(), Size::new(32, 32)), 4).unwrap();
        let mut state = RenderState::new();

        assert_eq!(draw_face(&mut display, &session, &layout, Palette::Dark, CellStyle::Square, &mut state), 64);
        assert_eq!(draw_face(&mut display, &session, &layout, Palette::Dark, CellStyle::Diagonal, &mut state), 64);
        assert_eq!(display.get_pixel(Point::new(1, 1)), Some(GRID_DARK));
    }

    #[test]
    fn test_cell_style_toggle() {
        assert_eq!(CellStyle::default(), CellStyle::Square);
        assert_eq!(CellStyle::Square.toggle(), CellStyle::Diagonal);
        assert_eq!(CellStyle::Diagonal.toggle(), CellStyle::Square);
    }

    #[test]
    fn test_redraw_only_changed_cells() {
        let mut session: Session<8, 8> = Session::with_placement(Placement { start_col: 0, start_row: 0 });
        let mut display: MockDisplay<Rgb565> = MockDisplay::new();
        display.set_allow_overdraw(true);
        let layout: FaceLayout<8, 8> = FaceLayout::fit(Rectangle::new(Point::zero(), Size::new(32, 32)), 4).unwrap();
        let mut state = RenderState::new();

        assert_eq!(draw_face(&mut display, &session, &layout, Palette::Dark, CellStyle::Square, &mut state), 64);
        assert_eq!(draw_face(&mut display, &session, &layout, Palette::Dark, CellStyle::Square, &mut state), 0);

        settled(&mut session, DisplayDigits([Symbol::Digit(1), Symbol::Blank, Symbol::Blank, Symbol::Blank]));
        let lit = session.lit_cells();
        assert_eq!(draw_face(&mut display, &session, &layout, Palette::Dark, CellStyle::Square, &mut state), lit);

        // Palette change forces a full redraw
        assert_eq!(draw_face(&mut display, &session, &layout, Palette::Light, CellStyle::Square, &mut state), 64);
        assert_eq!(display.get_pixel(Point::new(17, 1)), Some(BLACK));
    }

    #[test]
    fn test_render_state_flags() {
        let mut state: RenderState<2, 2> = RenderState::new();
        assert!(state.is_first_frame());
        assert!(state.need_background(Palette::Dark, CellStyle::Square));

        state.mark_background_drawn(Palette::Dark, CellStyle::Square);
        state.end_frame();
        assert!(!state.need_background(Palette::Dark, CellStyle::Square));
        assert!(state.need_background(Palette::Light, CellStyle::Square));
        assert!(state.need_background(Palette::Dark, CellStyle::Diagonal));

        state.mark_display_cleared();
        assert!(state.need_background(Palette::Dark, CellStyle::Square));
        state.end_frame();
        assert!(!state.need_background(Palette::Dark, CellStyle::Square));
    }

    #[test]
    fn test_update_cell_tracks_levels() {
        let mut state: RenderState<2, 2> = RenderState::new();
        assert!(state.update_cell(0, 0, 0));
        assert!(!state.update_cell(0, 0, 0));
        assert!(state.update_cell(0, 0, 2));
        state.mark_background_drawn(Palette::Dark, CellStyle::Square);
        assert!(state.update_cell(0, 0, 2));
    }

    #[test]
    fn test_layout_error_display() {
        use core::fmt::Write;

        let err = LayoutError::TooSmall {
            needed: Size::new(144, 168),
            available: Size::new(100, 100),
        };
        let mut s: heapless::String<64> = heapless::String::new();
        write!(s, "{err}").unwrap();
        assert_eq!(s.as_str(), "face needs 144x168 px but display has 100x100 px");
    }
}
