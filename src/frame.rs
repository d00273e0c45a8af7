// Copyright (c) 2026 rezky_nightky

use crate::cell::Cell;
use crate::palette::{Rgb, Rgba};
use crate::surface::Surface;

/// A glyph whose color is this close to its background is erased.
const FADE_FLOOR: u8 = 6;

/// Terminal canvas. Each terminal cell covers a `cell_px` square of the pixel
/// surface the rain draws on. An overlay layer sits on top of the rain and
/// is never touched by the surface primitives.
#[derive(Clone, Debug)]
pub struct Frame {
    pub width: u16,
    pub height: u16,
    cell_px: u32,
    bg: Rgb,
    cells: Vec<Cell>,
    overlay: Vec<Option<Cell>>,
    dirty_all: bool,
    dirty_map: Vec<bool>,
    dirty: Vec<usize>,
}

impl Frame {
    pub fn new(width: u16, height: u16, cell_px: u32, bg: Rgb) -> Self {
        let len = width as usize * height as usize;
        Self {
            width,
            height,
            cell_px: cell_px.max(1),
            bg,
            cells: vec![Cell::blank(bg); len],
            overlay: vec![None; len],
            dirty_all: true,
            dirty_map: vec![false; len],
            dirty: Vec::new(),
        }
    }

    /// Pixel size of a `cols` x `rows` terminal.
    pub fn pixel_size(cols: u16, rows: u16, cell_px: u32) -> (u32, u32) {
        (
            (cols as u32).saturating_mul(cell_px),
            (rows as u32).saturating_mul(cell_px),
        )
    }

    pub fn is_dirty_all(&self) -> bool {
        self.dirty_all
    }

    pub fn dirty_indices(&self) -> &[usize] {
        &self.dirty
    }

    pub fn has_changes(&self) -> bool {
        self.dirty_all || !self.dirty.is_empty()
    }

    pub fn clear_dirty(&mut self) {
        if self.dirty_all {
            self.dirty_all = false;
            self.dirty_map.fill(false);
            self.dirty.clear();
            return;
        }

        for &i in &self.dirty {
            if let Some(v) = self.dirty_map.get_mut(i) {
                *v = false;
            }
        }
        self.dirty.clear();
    }

    pub fn index(&self, x: u16, y: u16) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    /// What the terminal should show at `i`: the overlay if present,
    /// otherwise the rain.
    pub fn cell_at_index(&self, i: usize) -> Cell {
        match self.overlay.get(i).copied().flatten() {
            Some(c) => c,
            None => self.cells.get(i).copied().unwrap_or(Cell::blank(self.bg)),
        }
    }

    #[cfg(test)]
    pub fn get(&self, x: u16, y: u16) -> Option<Cell> {
        self.index(x, y).map(|i| self.cell_at_index(i))
    }

    fn mark_dirty(&mut self, i: usize) {
        if !self.dirty_all && self.dirty_map.get(i).copied() == Some(false) {
            self.dirty_map[i] = true;
            self.dirty.push(i);
        }
    }

    fn set_index(&mut self, i: usize, cell: Cell) {
        if self.cells[i] == cell {
            return;
        }
        self.cells[i] = cell;
        self.mark_dirty(i);
    }

    /// Replaces the whole overlay layer. Cells outside the frame are dropped.
    pub fn set_overlay<I>(&mut self, cells: I)
    where
        I: IntoIterator<Item = (u16, u16, Cell)>,
    {
        let mut next: Vec<Option<Cell>> = vec![None; self.overlay.len()];
        for (x, y, cell) in cells {
            if let Some(i) = self.index(x, y) {
                next[i] = Some(cell);
            }
        }
        for i in 0..next.len() {
            if next[i] != self.overlay[i] {
                self.mark_dirty(i);
            }
        }
        self.overlay = next;
    }

    fn cell_span(&self, start: f32, len: f32, limit: u16) -> (u16, u16) {
        let px = self.cell_px as f32;
        let lo = (start / px).floor().max(0.0);
        let hi = ((start + len) / px).ceil().max(0.0);
        let clamp = |v: f32| v.min(limit as f32) as u16;
        (clamp(lo), clamp(hi))
    }
}

impl Surface for Frame {
    fn resize(&mut self, width: u32, height: u32) {
        let cols = width.div_ceil(self.cell_px).min(u16::MAX as u32) as u16;
        let rows = height.div_ceil(self.cell_px).min(u16::MAX as u32) as u16;
        if cols == self.width && rows == self.height {
            return;
        }
        let overlay = std::mem::take(&mut self.overlay);
        let (old_w, old_h) = (self.width, self.height);
        *self = Frame::new(cols, rows, self.cell_px, self.bg);

        // Keep whatever overlay cells still fit until the host lays it out again.
        let kept = (0..old_h)
            .flat_map(|y| (0..old_w).map(move |x| (x, y)))
            .zip(overlay)
            .filter_map(|((x, y), c)| c.map(|c| (x, y, c)));
        self.set_overlay(kept);
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgba) {
        let (x0, x1) = self.cell_span(x, w, self.width);
        let (y0, y1) = self.cell_span(y, h, self.height);
        for row in y0..y1 {
            for col in x0..x1 {
                let i = row as usize * self.width as usize + col as usize;
                let mut cell = self.cells[i];
                let fg = cell.fg.blend(color);
                // Rounding stalls the blend short of the target at low opacity.
                let stuck = fg == cell.fg;
                cell.bg = cell.bg.blend(color);
                cell.fg = fg;
                if cell.is_blank() || stuck || cell.fg.distance(cell.bg) <= FADE_FLOOR {
                    cell = Cell::blank(cell.bg);
                } else {
                    cell.bold = false;
                }
                self.set_index(i, cell);
            }
        }
    }

    fn draw_char(&mut self, x: f32, y: f32, ch: char, color: Rgba) {
        if x < 0.0 || y < 0.0 {
            return;
        }
        let px = self.cell_px as f32;
        let col = (x / px).floor();
        let row = (y / px).floor();
        if col >= self.width as f32 || row >= self.height as f32 {
            return;
        }
        let i = row as usize * self.width as usize + col as usize;
        let bg = self.cells[i].bg;
        self.set_index(
            i,
            Cell {
                ch,
                fg: bg.blend(color),
                bg,
                bold: color.a >= 1.0,
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BG: Rgb = Rgb::new(0, 0x2D, 0x72);
    const GLYPH: Rgb = Rgb::new(0x68, 0xAC, 0xE5);

    #[test]
    fn draw_char_maps_pixels_to_cells() {
        let mut f = Frame::new(4, 3, 16, BG);
        f.draw_char(33.0, 17.5, 'x', GLYPH.with_alpha(1.0));
        let c = f.get(2, 1).unwrap();
        assert_eq!(c.ch, 'x');
        assert_eq!(c.fg, GLYPH);
        assert!(c.bold);
        assert!(f.get(1, 1).unwrap().is_blank());
    }

    #[test]
    fn out_of_bounds_draws_are_clipped() {
        let mut f = Frame::new(2, 2, 16, BG);
        f.clear_dirty();
        f.draw_char(-1.0, 0.0, 'x', GLYPH.with_alpha(1.0));
        f.draw_char(0.0, 32.0, 'x', GLYPH.with_alpha(1.0));
        f.draw_char(40.0, 0.0, 'x', GLYPH.with_alpha(1.0));
        assert!(!f.has_changes());
    }

    #[test]
    fn repeated_fade_erases_glyphs() {
        let mut f = Frame::new(2, 2, 16, BG);
        f.draw_char(0.0, 0.0, 'x', GLYPH.with_alpha(1.0));
        let fade = BG.with_alpha(0.08);
        let mut prev = f.get(0, 0).unwrap().fg.distance(BG);
        for _ in 0..10 {
            f.fill_rect(0.0, 0.0, 32.0, 32.0, fade);
            let d = f.get(0, 0).unwrap().fg.distance(BG);
            assert!(d <= prev);
            prev = d;
        }
        for _ in 0..200 {
            f.fill_rect(0.0, 0.0, 32.0, 32.0, fade);
        }
        assert_eq!(f.get(0, 0).unwrap(), Cell::blank(BG));
    }

    #[test]
    fn overlay_hides_rain_and_marks_dirty() {
        let mut f = Frame::new(3, 1, 16, BG);
        f.clear_dirty();
        let label = Cell {
            ch: 'A',
            fg: GLYPH,
            bg: BG,
            bold: true,
        };
        f.set_overlay([(1, 0, label), (9, 9, label)]);
        assert_eq!(f.dirty_indices(), &[1]);
        f.draw_char(16.0, 0.0, 'z', GLYPH.with_alpha(1.0));
        assert_eq!(f.get(1, 0).unwrap().ch, 'A');

        f.clear_dirty();
        f.set_overlay(std::iter::empty());
        assert_eq!(f.get(1, 0).unwrap().ch, 'z');
        assert_eq!(f.dirty_indices(), &[1]);
    }

    #[test]
    fn resize_reallocates_in_cells() {
        let mut f = Frame::new(2, 2, 16, BG);
        f.resize(50, 20);
        assert_eq!((f.width, f.height), (4, 2));
        assert!(f.is_dirty_all());
        f.resize(1, 1);
        assert_eq!((f.width, f.height), (1, 1));
    }
}
