// Copyright (c) 2026 rezky_nightky

use rand::{
    distr::{Distribution, Uniform},
    rngs::StdRng,
    Rng, SeedableRng,
};
use tracing::{debug, info};

use crate::{
    charset::GlyphSet,
    config::{RainConfig, RainParams, MIN_SPEED_CELLS},
    error::ConfigError,
    surface::Surface,
};

/// Alpha of the head glyph and the highlighted glyphs behind it.
const TRAIL_ALPHA: [f32; 3] = [1.0, 0.55, 0.25];

/// One vertical lane of the rain.
#[derive(Clone, Debug, PartialEq)]
pub struct Column {
    pub x: f32,
    /// Top of the head in pixels. Negative while still above the surface.
    pub head_y: f32,
    /// Pixels per tick.
    pub speed: f32,
    glyph_countdown: u16,
    /// Head glyph first, then the glyphs it left behind.
    glyphs: [char; 3],
    row: i32,
}

#[cfg(test)]
impl Column {
    pub fn head_glyph(&self) -> char {
        self.glyphs[0]
    }

    pub fn row(&self) -> i32 {
        self.row
    }
}

/// Shared randomness and distributions for spawning columns.
struct Spawner {
    mt: StdRng,
    rand_speed: Uniform<f32>,
    rand_ticks: Uniform<u16>,
    glyphs: GlyphSet,
}

impl Spawner {
    fn new(params: &RainParams, glyphs: GlyphSet, seed: u64) -> Result<Self, ConfigError> {
        let speed = params.speed;
        let rand_speed = Uniform::new_inclusive(speed.low, speed.high).map_err(|_| {
            ConfigError::OutOfRange {
                name: "speed",
                value: format!("{},{}", speed.low, speed.high),
                min: "finite".to_string(),
                max: "low <= high".to_string(),
            }
        })?;
        let ticks = params.glyph_ticks;
        let rand_ticks = Uniform::new_inclusive(ticks.low.max(1), ticks.high.max(1)).map_err(
            |_| ConfigError::OutOfRange {
                name: "glyph ticks",
                value: format!("{},{}", ticks.low, ticks.high),
                min: "1".to_string(),
                max: "low <= high".to_string(),
            },
        )?;
        Ok(Self {
            mt: StdRng::seed_from_u64(seed),
            rand_speed,
            rand_ticks,
            glyphs,
        })
    }

    fn speed(&mut self, cell: f32) -> f32 {
        self.rand_speed.sample(&mut self.mt).max(MIN_SPEED_CELLS) * cell
    }

    fn offset(&mut self, margin: f32) -> f32 {
        if margin <= 0.0 {
            return 0.0;
        }
        -margin * self.mt.random::<f32>()
    }

    fn glyph(&mut self) -> char {
        self.glyphs.pick(&mut self.mt)
    }

    fn column(&mut self, lane: usize, cell: f32, margin: f32) -> Column {
        let head_y = self.offset(margin);
        Column {
            x: lane as f32 * cell,
            head_y,
            speed: self.speed(cell),
            glyph_countdown: self.rand_ticks.sample(&mut self.mt),
            glyphs: [self.glyph(), self.glyph(), self.glyph()],
            row: (head_y / cell).floor() as i32,
        }
    }

    fn recycle(&mut self, col: &mut Column, cell: f32, margin: f32) {
        col.head_y = self.offset(margin);
        col.speed = self.speed(cell);
        col.row = (col.head_y / cell).floor() as i32;
        col.glyphs = [self.glyph(), self.glyph(), self.glyph()];
    }
}

/// Falling glyph streaks over a full-surface fade.
///
/// The renderer never schedules itself: the host calls [`RainRenderer::tick`]
/// and then [`RainRenderer::render`] once per frame.
pub struct RainRenderer<S: Surface> {
    surface: S,
    config: RainConfig,
    params: RainParams,
    width: u32,
    height: u32,
    columns: Vec<Column>,
    spawner: Spawner,
    frame: u64,
}

impl<S: Surface> RainRenderer<S> {
    pub fn initialize(
        mut surface: S,
        width: u32,
        height: u32,
        config: RainConfig,
        params: RainParams,
        glyphs: GlyphSet,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        let config = config.validate()?;
        let width = width.max(1);
        let height = height.max(1);
        surface.resize(width, height);

        let mut rain = Self {
            surface,
            config,
            params,
            width,
            height,
            columns: Vec::new(),
            spawner: Spawner::new(&params, glyphs, seed)?,
            frame: 0,
        };
        rain.fit_columns();
        info!(
            width,
            height,
            cell_size = config.cell_size,
            columns = rain.columns.len(),
            "rain initialized"
        );
        Ok(rain)
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    fn cell(&self) -> f32 {
        self.config.cell_size as f32
    }

    /// How far a head may sit above the top edge or below the bottom edge.
    pub fn margin(&self) -> f32 {
        (self.height as f32 * self.params.recycle_spread).max(2.0 * self.cell())
    }

    fn lane_count(&self) -> usize {
        (self.width / self.config.cell_size) as usize
    }

    fn fit_columns(&mut self) {
        let lanes = self.lane_count();
        let cell = self.cell();
        let margin = self.margin();
        self.columns.truncate(lanes);
        for lane in self.columns.len()..lanes {
            let col = self.spawner.column(lane, cell, margin);
            self.columns.push(col);
        }
    }

    pub fn tick(&mut self) {
        let cell = self.cell();
        let margin = self.margin();
        let bottom = self.height as f32 + margin;

        for col in &mut self.columns {
            col.head_y += col.speed;
            if col.head_y > bottom {
                self.spawner.recycle(col, cell, margin);
            }

            let row = (col.head_y / cell).floor() as i32;
            if row != col.row {
                col.row = row;
                col.glyphs.rotate_right(1);
                col.glyphs[0] = self.spawner.glyph();
            }

            col.glyph_countdown = col.glyph_countdown.saturating_sub(1);
            if col.glyph_countdown == 0 {
                col.glyphs[0] = self.spawner.glyph();
                col.glyph_countdown = self.spawner.rand_ticks.sample(&mut self.spawner.mt);
            }
        }

        self.frame = self.frame.wrapping_add(1);
    }

    /// Draws one frame. Only the surface is written.
    pub fn render(&mut self) {
        let cell = self.cell();
        let (w, h) = (self.width as f32, self.height as f32);
        let glyph = self.config.glyph;

        self.surface.fill_rect(
            0.0,
            0.0,
            w,
            h,
            self.config.background.with_alpha(self.config.fade_opacity),
        );

        let shown = 1 + self.params.trail_highlight.min(2) as usize;
        for col in &self.columns {
            let head_top = col.row as f32 * cell;
            for (i, &ch) in col.glyphs.iter().take(shown).enumerate() {
                let y = head_top - i as f32 * cell;
                if y + cell <= 0.0 || y >= h {
                    continue;
                }
                self.surface
                    .draw_char(col.x, y, ch, glyph.with_alpha(TRAIL_ALPHA[i]));
            }
        }
    }

    pub fn on_resize(&mut self, width: i64, height: i64) {
        let width = width.clamp(1, u32::MAX as i64) as u32;
        let height = height.clamp(1, u32::MAX as i64) as u32;
        self.width = width;
        self.height = height;
        self.surface.resize(width, height);
        self.fit_columns();

        let cell = self.cell();
        let margin = self.margin();
        let bottom = height as f32 + margin;
        for col in &mut self.columns {
            if col.head_y < -margin || col.head_y > bottom {
                self.spawner.recycle(col, cell, margin);
            }
        }
        debug!(width, height, columns = self.columns.len(), "rain resized");
    }
}
