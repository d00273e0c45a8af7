// Copyright (c) 2026 rezky_nightky

//! The drawing primitives the rain needs from its host.
//!
//! Coordinates are pixels with the origin at the top-left corner. Anything
//! outside the surface is clipped by the implementation.

use crate::palette::Rgba;

pub trait Surface {
    fn resize(&mut self, width: u32, height: u32);

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgba);

    fn draw_char(&mut self, x: f32, y: f32, ch: char, color: Rgba);
}
