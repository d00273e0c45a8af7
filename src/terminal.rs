// Copyright (c) 2026 rezky_nightky

use std::io::{stdout, Result, Stdout, Write};

use crossterm::{
    cursor, event,
    style::{
        Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
    },
    terminal, ExecutableCommand, QueueableCommand,
};

use crate::cell::Cell;
use crate::frame::Frame;
use crate::runtime::ColorMode;

/// Attributes currently set on the terminal, to skip redundant escapes.
#[derive(Default)]
struct Pen {
    fg: Option<Option<Color>>,
    bg: Option<Option<Color>>,
    bold: bool,
}

pub struct Terminal {
    stdout: Stdout,
    color_mode: ColorMode,
    last: Option<(u16, u16, Vec<Cell>)>,
    run_buf: String,
}

impl Terminal {
    pub fn new(color_mode: ColorMode) -> Result<Self> {
        let mut out = stdout();
        terminal::enable_raw_mode()?;
        let init_res: Result<()> = (|| {
            out.execute(terminal::EnterAlternateScreen)?;
            out.execute(cursor::Hide)?;
            out.execute(event::EnableMouseCapture)?;
            let _ = out.execute(terminal::DisableLineWrap);
            out.execute(SetAttribute(Attribute::Reset))?;
            out.execute(ResetColor)?;
            out.execute(terminal::Clear(terminal::ClearType::All))?;
            out.flush()?;
            Ok(())
        })();
        if let Err(e) = init_res {
            restore_terminal_best_effort();
            return Err(e);
        }
        Ok(Self {
            stdout: out,
            color_mode,
            last: None,
            run_buf: String::with_capacity(64),
        })
    }

    pub fn size(&self) -> Result<(u16, u16)> {
        terminal::size()
    }

    pub fn poll_event(timeout: std::time::Duration) -> Result<bool> {
        event::poll(timeout)
    }

    pub fn read_event() -> Result<event::Event> {
        event::read()
    }

    fn pen_to(&mut self, pen: &mut Pen, cell: &Cell) -> Result<()> {
        let fg = cell.fg.to_term(self.color_mode);
        let bg = cell.bg.to_term(self.color_mode);
        if pen.fg != Some(fg) {
            self.stdout
                .queue(SetForegroundColor(fg.unwrap_or(Color::Reset)))?;
            pen.fg = Some(fg);
        }
        if pen.bg != Some(bg) {
            self.stdout
                .queue(SetBackgroundColor(bg.unwrap_or(Color::Reset)))?;
            pen.bg = Some(bg);
        }
        if cell.bold != pen.bold {
            self.stdout.queue(SetAttribute(if cell.bold {
                Attribute::Bold
            } else {
                Attribute::NormalIntensity
            }))?;
            pen.bold = cell.bold;
        }
        Ok(())
    }

    fn finish(&mut self, frame: &mut Frame) -> Result<()> {
        self.stdout.queue(SetAttribute(Attribute::Reset))?;
        self.stdout.queue(ResetColor)?;
        self.stdout.flush()?;
        frame.clear_dirty();
        Ok(())
    }

    pub fn draw(&mut self, frame: &mut Frame) -> Result<()> {
        let mut pen = Pen::default();
        let (w, h) = (frame.width, frame.height);

        let same_size = matches!(&self.last, Some((lw, lh, _)) if *lw == w && *lh == h);
        let total = w as usize * h as usize;
        let dirty_is_large = total > 0 && frame.dirty_indices().len() >= total / 3;

        if !same_size || frame.is_dirty_all() || dirty_is_large {
            if !same_size {
                self.stdout
                    .queue(terminal::Clear(terminal::ClearType::All))?;
            }
            let mut last = Vec::with_capacity(total);
            for y in 0..h {
                self.stdout.queue(cursor::MoveTo(0, y))?;
                for x in 0..w {
                    let cell = frame.cell_at_index(y as usize * w as usize + x as usize);
                    self.pen_to(&mut pen, &cell)?;
                    self.stdout.queue(Print(cell.ch))?;
                    last.push(cell);
                }
            }
            self.last = Some((w, h, last));
            return self.finish(frame);
        }

        let mut dirty = frame.dirty_indices().to_vec();
        dirty.sort_unstable();
        let width = w as usize;
        let mut last = match self.last.take() {
            Some((_, _, cells)) => cells,
            None => return self.finish(frame),
        };
        let mut cur_pos: Option<(u16, u16)> = None;

        let mut i = 0usize;
        while i < dirty.len() {
            let idx0 = dirty[i];
            let cell0 = frame.cell_at_index(idx0);
            if last.get(idx0) == Some(&cell0) {
                i += 1;
                continue;
            }
            last[idx0] = cell0;

            // Extend the run over adjacent changed cells on the same row with
            // the same attributes.
            self.run_buf.clear();
            self.run_buf.push(cell0.ch);
            let mut end = idx0;
            let mut j = i + 1;
            while j < dirty.len() {
                let idx1 = dirty[j];
                if idx1 != end + 1 || idx1 % width == 0 {
                    break;
                }
                let cell1 = frame.cell_at_index(idx1);
                if last.get(idx1) == Some(&cell1)
                    || cell1.fg != cell0.fg
                    || cell1.bg != cell0.bg
                    || cell1.bold != cell0.bold
                {
                    break;
                }
                self.run_buf.push(cell1.ch);
                last[idx1] = cell1;
                end = idx1;
                j += 1;
            }

            let x0 = (idx0 % width) as u16;
            let y0 = (idx0 / width) as u16;
            if cur_pos != Some((x0, y0)) {
                self.stdout.queue(cursor::MoveTo(x0, y0))?;
            }
            self.pen_to(&mut pen, &cell0)?;
            self.stdout.queue(Print(self.run_buf.as_str()))?;

            let next_x = x0.saturating_add((end - idx0 + 1) as u16);
            cur_pos = (next_x < w).then_some((next_x, y0));
            i = j;
        }

        self.last = Some((w, h, last));
        self.finish(frame)
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        let _ = self.stdout.execute(SetAttribute(Attribute::Reset));
        let _ = self.stdout.execute(ResetColor);
        let _ = self.stdout.execute(event::DisableMouseCapture);
        let _ = self.stdout.execute(cursor::Show);
        let _ = self.stdout.execute(terminal::EnableLineWrap);
        let _ = self.stdout.execute(terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
        let _ = self.stdout.flush();
    }
}

pub fn restore_terminal_best_effort() {
    let mut out = stdout();
    let _ = out.execute(SetAttribute(Attribute::Reset));
    let _ = out.execute(ResetColor);
    let _ = out.execute(event::DisableMouseCapture);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::EnableLineWrap);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();
    let _ = out.flush();
}
