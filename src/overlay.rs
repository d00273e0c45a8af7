// Copyright (c) 2026 rezky_nightky

//! Host-side presentation: the nav row and the box holding the visible
//! panel's text, composited over the rain as overlay cells.

use crate::cell::Cell;
use crate::config::PanelContent;
use crate::error::ConfigError;
use crate::nav::NavBar;
use crate::palette::Rgb;
use crate::view::{ViewController, PANEL_COUNT};

const PAD_X: u16 = 2;
const PAD_Y: u16 = 1;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Theme {
    pub bg: Rgb,
    pub accent: Rgb,
    pub text: Rgb,
}

impl Theme {
    pub fn new(bg: Rgb, accent: Rgb) -> Self {
        Self {
            bg,
            accent,
            text: Rgb::new(0xF2, 0xF6, 0xFB),
        }
    }

    fn cell(&self, ch: char, fg: Rgb, bold: bool) -> Cell {
        Cell {
            ch,
            fg,
            bg: self.bg,
            bold,
        }
    }
}

/// Text for each panel, in registration order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PanelTexts {
    texts: [String; PANEL_COUNT],
}

impl PanelTexts {
    pub fn new(view: &ViewController, contents: &[PanelContent]) -> Result<Self, ConfigError> {
        let mut texts: [String; PANEL_COUNT] = std::array::from_fn(|i| {
            format!(
                "Nothing here yet.\nPass --content {}=TEXT to fill this panel.",
                view.panels()[i]
            )
        });
        for c in contents {
            let i = view
                .panels()
                .iter()
                .position(|p| p == c.panel.as_str())
                .ok_or_else(|| ConfigError::UnknownContentPanel(c.panel.clone()))?;
            texts[i] = c.text.clone();
        }
        Ok(Self { texts })
    }

    pub fn get(&self, index: usize) -> &str {
        self.texts.get(index).map(String::as_str).unwrap_or("")
    }
}

/// Word wraps `text` to `width` columns, splitting words longer than a line.
fn wrap(text: &str, width: usize) -> Vec<Vec<char>> {
    let width = width.max(1);
    let mut lines = Vec::new();
    for raw in text.split('\n') {
        let mut line: Vec<char> = Vec::new();
        for word in raw.split_whitespace() {
            let word: Vec<char> = word.chars().collect();
            if !line.is_empty() && line.len() + 1 + word.len() > width {
                lines.push(std::mem::take(&mut line));
            }
            if !line.is_empty() {
                line.push(' ');
            }
            for chunk in word.chunks(width) {
                if line.len() + chunk.len() > width {
                    lines.push(std::mem::take(&mut line));
                }
                line.extend_from_slice(chunk);
            }
        }
        lines.push(line);
    }
    lines
}

/// The nav row: every trigger label, the active one inverted and the hovered
/// one bold.
pub fn nav_cells(nav: &NavBar, view: &ViewController, theme: &Theme) -> Vec<(u16, u16, Cell)> {
    let hovered = nav.hovered().map(|t| t.id.as_str());
    let mut out = Vec::new();
    for t in nav.triggers() {
        let active = view.is_visible(&t.panel);
        let hover = hovered == Some(t.id.as_str());
        for (i, ch) in t.label.chars().take(t.width as usize).enumerate() {
            let cell = if active {
                Cell {
                    ch,
                    fg: theme.bg,
                    bg: theme.accent,
                    bold: true,
                }
            } else {
                theme.cell(ch, theme.accent, hover)
            };
            out.push((t.col + i as u16, 0, cell));
        }
    }
    out
}

/// A centered box below the nav row holding the panel title and text.
/// Content that does not fit is clipped; nothing is drawn when even an empty
/// box would not fit.
pub fn panel_cells(
    title: &str,
    text: &str,
    cols: u16,
    lines: u16,
    border: bool,
    theme: &Theme,
) -> Vec<(u16, u16, Cell)> {
    let top: u16 = 1;
    let avail_h = lines.saturating_sub(top);
    let border: u16 = if border { 1 } else { 0 };
    let frame_w = 2 * border + 2 * PAD_X;
    let frame_h = 2 * border + 2 * PAD_Y;
    if cols <= frame_w || avail_h <= frame_h {
        return Vec::new();
    }

    let max_w = (cols - frame_w).min(72) as usize;
    let max_h = (avail_h - frame_h) as usize;

    let mut content: Vec<(Vec<char>, bool)> = wrap(&title.to_uppercase(), max_w)
        .into_iter()
        .map(|l| (l, true))
        .collect();
    content.push((Vec::new(), false));
    content.extend(wrap(text, max_w).into_iter().map(|l| (l, false)));
    content.truncate(max_h);

    let content_w = content.iter().map(|(l, _)| l.len()).max().unwrap_or(0).max(1) as u16;
    let content_h = content.len() as u16;
    let box_w = content_w + frame_w;
    let box_h = content_h + frame_h;
    let start_col = cols / 2 - box_w / 2;
    let start_line = top + avail_h / 2 - box_h / 2;

    let mut out = Vec::with_capacity(box_w as usize * box_h as usize);
    for y in 0..box_h {
        for x in 0..box_w {
            let mut cell = theme.cell(' ', theme.text, false);
            if border == 1 {
                let edge_y = y == 0 || y + 1 == box_h;
                let edge_x = x == 0 || x + 1 == box_w;
                let ch = match (edge_x, edge_y) {
                    (true, true) => '+',
                    (false, true) => '-',
                    (true, false) => '|',
                    (false, false) => ' ',
                };
                if ch != ' ' {
                    cell = theme.cell(ch, theme.accent, false);
                }
            }

            let (cy, cx) = (border + PAD_Y, border + PAD_X);
            if y >= cy && y < cy + content_h && x >= cx && x < cx + content_w {
                let (line, is_title) = &content[(y - cy) as usize];
                let left = (content_w as usize - line.len()) / 2;
                let ix = (x - cx) as usize;
                if ix >= left && ix < left + line.len() {
                    cell = if *is_title {
                        theme.cell(line[ix - left], theme.accent, true)
                    } else {
                        theme.cell(line[ix - left], theme.text, false)
                    };
                }
            }

            out.push((start_col + x, start_line + y, cell));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_PANELS;
    use crate::nav::default_bindings;

    fn theme() -> Theme {
        Theme::new(Rgb::new(0, 0x2D, 0x72), Rgb::new(0x68, 0xAC, 0xE5))
    }

    fn text_of(cells: &[(u16, u16, Cell)]) -> String {
        let mut sorted = cells.to_vec();
        sorted.sort_by_key(|(x, y, _)| (*y, *x));
        sorted.iter().map(|(_, _, c)| c.ch).collect()
    }

    #[test]
    fn wrap_breaks_on_words_and_splits_long_ones() {
        let lines = wrap("hello big world\nabcdefghij", 5);
        let lines: Vec<String> = lines.into_iter().map(|l| l.into_iter().collect()).collect();
        assert_eq!(lines, vec!["hello", "big", "world", "abcde", "fghij"]);
    }

    #[test]
    fn panel_box_is_centered_and_bordered() {
        let cells = panel_cells("about", "hi", 40, 20, true, &theme());
        assert!(!cells.is_empty());
        let min_x = cells.iter().map(|c| c.0).min().unwrap();
        let max_x = cells.iter().map(|c| c.0).max().unwrap();
        let box_w = max_x - min_x + 1;
        assert_eq!(min_x, 40 / 2 - box_w / 2);
        assert!(cells.iter().all(|c| c.1 >= 1 && c.1 < 20));
        let corners = cells.iter().filter(|c| c.2.ch == '+').count();
        assert_eq!(corners, 4);
        let s = text_of(&cells);
        assert!(s.contains("ABOUT"));
        assert!(s.contains("hi"));
    }

    #[test]
    fn panel_box_clips_to_tiny_terminals() {
        assert!(panel_cells("about", "hi", 6, 20, true, &theme()).is_empty());
        assert!(panel_cells("about", "hi", 40, 4, true, &theme()).is_empty());
        let cells = panel_cells("about", "a\nb\nc\nd\ne\nf", 40, 8, true, &theme());
        assert!(cells.iter().all(|c| c.1 < 8));
    }

    #[test]
    fn unknown_content_panel_is_rejected() {
        let view = ViewController::new(&DEFAULT_PANELS, "about").unwrap();
        let bad = vec![PanelContent {
            panel: "blog".to_string(),
            text: "x".to_string(),
        }];
        assert_eq!(
            PanelTexts::new(&view, &bad).unwrap_err(),
            ConfigError::UnknownContentPanel("blog".to_string())
        );
        let good = vec![PanelContent {
            panel: "contact".to_string(),
            text: "mail me".to_string(),
        }];
        assert_eq!(PanelTexts::new(&view, &good).unwrap().get(3), "mail me");
    }

    #[test]
    fn nav_row_highlights_active_panel() {
        let view = ViewController::new(&DEFAULT_PANELS, "updates").unwrap();
        let mut nav = NavBar::new(&default_bindings(&view), &view).unwrap();
        nav.layout(80);
        let cells = nav_cells(&nav, &view, &theme());
        assert!(cells.iter().all(|c| c.1 == 0));
        let updates = &nav.triggers()[1];
        let (_, _, first) = cells
            .iter()
            .find(|c| c.0 == updates.col)
            .copied()
            .unwrap();
        assert_eq!(first.bg, theme().accent);
        let about = &nav.triggers()[0];
        let (_, _, other) = cells.iter().find(|c| c.0 == about.col).copied().unwrap();
        assert_eq!(other.bg, theme().bg);
    }
}
