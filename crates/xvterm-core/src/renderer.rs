//! Paints [`Grid`] cells and the cursor onto a [`Surface`], driven by the
//! damage records `Grid` accumulates. Damage-driven: a single keystroke's
//! echo repaints one cell, not the whole screen.
//!
//! Grounded in `term_draw` (`original_source/term.c`): the per-cell loop
//! (fill background, then draw the glyph in the foreground colour) is the
//! same two `XFillRectangle`/`XDrawString` calls, generalized from a full
//! unconditional screen scan to the cells `Grid::take_damage` names.

use crate::grid::{Damage, Grid};
use crate::cell::CursorStyle;
use crate::port::Surface;

/// Pixel geometry of one cell, overridable via [`crate::config::Config`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    pub char_w: u32,
    pub char_h: u32,
    pub topmost: i32,
    pub leftmost: i32,
}

impl Default for Geometry {
    fn default() -> Self {
        // original_source/config.h: CHAR_W=6, CHAR_H=12, TOPMOST=10, LEFTMOST=2.
        Self {
            char_w: 6,
            char_h: 12,
            topmost: 10,
            leftmost: 2,
        }
    }
}

/// Drives a [`Surface`] from [`Grid`] damage. Holds no reference to the
/// surface itself — every call takes it as a parameter — so the event
/// loop is free to interleave PTY and input handling between flushes.
pub struct Renderer {
    geometry: Geometry,
    prev_cursor: Option<(usize, usize)>,
}

impl Renderer {
    pub fn new(geometry: Geometry) -> Self {
        Self {
            geometry,
            prev_cursor: None,
        }
    }

    fn cell_origin(&self, col: usize, row: usize) -> (i32, i32) {
        (
            col as i32 * self.geometry.char_w as i32 + self.geometry.leftmost,
            row as i32 * self.geometry.char_h as i32,
        )
    }

    /// Fill the cell's background, then draw its glyph (if any) on top.
    pub fn draw_cell<S: Surface>(&self, surface: &mut S, grid: &Grid, col: usize, row: usize) {
        let cell = grid.cell(col, row);
        let (px, py) = self.cell_origin(col, row);
        surface.fill_rect(px, py, self.geometry.char_w, self.geometry.char_h, cell.bg);
        if cell.codepoint != 0 {
            surface.draw_glyph(px, py + self.geometry.topmost, cell.codepoint, cell.fg);
        }
    }

    /// Redraw every cell of one row, bounded by the damage region.
    pub fn redraw_line<S: Surface>(&self, surface: &mut S, grid: &Grid, row: usize) {
        for col in 0..grid.width() {
            self.draw_cell(surface, grid, col, row);
        }
    }

    /// Redraw the entire grid.
    pub fn redraw_all<S: Surface>(&self, surface: &mut S, grid: &Grid) {
        surface.clear_all();
        for row in 0..grid.height() {
            self.redraw_line(surface, grid, row);
        }
    }

    /// Erase the previously-drawn cursor, then draw it at its current
    /// position (unless hidden). Maintains `(prev_x, prev_y)` so the old
    /// location is repainted even after the cursor has moved.
    pub fn draw_cursor<S: Surface>(&mut self, surface: &mut S, grid: &Grid) {
        if let Some((px, py)) = self.prev_cursor.take() {
            if px < grid.width() && py < grid.height() {
                self.draw_cell(surface, grid, px, py);
            }
        }

        let cursor = grid.cursor();
        if !cursor.visible || matches!(cursor.style, CursorStyle::None) {
            return;
        }

        let x = cursor.x.min(grid.width() - 1);
        let y = cursor.y.min(grid.height() - 1);
        let (px, py) = self.cell_origin(x, y);
        let fg = grid.current_fg();

        match cursor.style {
            CursorStyle::Block => {
                surface.fill_rect(px, py, self.geometry.char_w, self.geometry.char_h, fg);
            }
            CursorStyle::Line => {
                surface.fill_rect(px, py, 2, self.geometry.char_h, fg);
            }
            CursorStyle::None => unreachable!(),
        }
        self.prev_cursor = Some((x, y));
    }

    /// Drain `grid`'s damage, repaint accordingly, redraw the cursor on
    /// top, then flush the surface. A no-op if nothing is dirty.
    pub fn flush_damage<S: Surface>(&mut self, surface: &mut S, grid: &mut Grid) {
        let damage = grid.take_damage();
        if damage.is_empty() {
            return;
        }
        for d in damage {
            match d {
                Damage::Cell { col, row } => self.draw_cell(surface, grid, col, row),
                Damage::Row(row) => self.redraw_line(surface, grid, row),
                Damage::Full => self.redraw_all(surface, grid),
            }
        }
        self.draw_cursor(surface, grid);
        surface.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::theme::{RgbColor, Theme};

    #[derive(Default)]
    struct RecordingSurface {
        fills: Vec<(i32, i32, u32, u32, RgbColor)>,
        glyphs: Vec<(i32, i32, u32, RgbColor)>,
        flushes: usize,
        clears: usize,
    }

    impl Surface for RecordingSurface {
        fn fill_rect(&mut self, x: i32, y: i32, w: u32, h: u32, rgb: RgbColor) {
            self.fills.push((x, y, w, h, rgb));
        }
        fn draw_glyph(&mut self, x: i32, y: i32, codepoint: u32, rgb: RgbColor) {
            self.glyphs.push((x, y, codepoint, rgb));
        }
        fn clear_rect(&mut self, _x: i32, _y: i32, _w: u32, _h: u32) {}
        fn clear_all(&mut self) {
            self.clears += 1;
        }
        fn flush(&mut self) {
            self.flushes += 1;
        }
    }

    #[test]
    fn flush_damage_draws_touched_cell_and_cursor() {
        let mut grid = Grid::new(5, 3, &Theme::default());
        grid.putchar('Q' as u32);
        let mut surface = RecordingSurface::default();
        let mut renderer = Renderer::new(Geometry::default());

        renderer.flush_damage(&mut surface, &mut grid);

        assert_eq!(surface.glyphs.len(), 1);
        assert_eq!(surface.glyphs[0].2, 'Q' as u32);
        assert_eq!(surface.flushes, 1);
        // cursor draw paints a rect at the new cursor cell (1, 0).
        assert!(surface.fills.iter().any(|&(x, y, ..)| x == 1 * 6 + 2 && y == 0));
    }

    #[test]
    fn full_damage_clears_and_redraws_every_cell() {
        let mut grid = Grid::new(4, 2, &Theme::default());
        grid.mark_full_damage();
        let mut surface = RecordingSurface::default();
        let mut renderer = Renderer::new(Geometry::default());

        renderer.flush_damage(&mut surface, &mut grid);

        assert_eq!(surface.clears, 1);
        assert_eq!(surface.fills.len() >= 4 * 2, true);
    }

    #[test]
    fn no_damage_does_not_flush() {
        let mut grid = Grid::new(4, 2, &Theme::default());
        let mut surface = RecordingSurface::default();
        let mut renderer = Renderer::new(Geometry::default());

        renderer.flush_damage(&mut surface, &mut grid);

        assert_eq!(surface.flushes, 0);
    }
}
