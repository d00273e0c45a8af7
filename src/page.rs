// Copyright (c) 2026 rezky_nightky

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

use crate::cell::Cell;
use crate::nav::NavBar;
use crate::overlay::{nav_cells, panel_cells, PanelTexts, Theme};
use crate::view::ViewController;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Quit,
    TogglePause,
    Redraw,
    Ignore,
}

/// Binds terminal input to the navigation triggers and lays out what the
/// visible panel shows.
pub struct Page {
    pub view: ViewController,
    pub nav: NavBar,
    texts: PanelTexts,
    theme: Theme,
    border: bool,
}

impl Page {
    pub fn new(
        view: ViewController,
        nav: NavBar,
        texts: PanelTexts,
        theme: Theme,
        border: bool,
    ) -> Self {
        Self {
            view,
            nav,
            texts,
            theme,
            border,
        }
    }

    pub fn layout(&mut self, cols: u16) {
        self.nav.layout(cols);
    }

    pub fn overlay(&self, cols: u16, lines: u16) -> Vec<(u16, u16, Cell)> {
        let shown = self.view.visibility().shown();
        let mut cells = panel_cells(
            self.view.active().as_str(),
            self.texts.get(shown),
            cols,
            lines,
            self.border,
            &self.theme,
        );
        cells.extend(nav_cells(&self.nav, &self.view, &self.theme));
        cells
    }

    fn redraw_if(changed: bool) -> Action {
        if changed {
            Action::Redraw
        } else {
            Action::Ignore
        }
    }

    pub fn handle_key(&mut self, k: KeyEvent) -> Action {
        match (k.code, k.modifiers) {
            (KeyCode::Esc, _) | (KeyCode::Char('q'), _) => Action::Quit,
            (KeyCode::Char('c'), m) if m.contains(KeyModifiers::CONTROL) => Action::Quit,
            (KeyCode::Char('p'), _) => Action::TogglePause,
            (KeyCode::Char(c @ '1'..='9'), _) => {
                let n = c as usize - '0' as usize;
                Self::redraw_if(self.nav.trigger_nth(n, &mut self.view))
            }
            (KeyCode::Tab, _) | (KeyCode::Right, _) => {
                Self::redraw_if(self.nav.cycle(true, &mut self.view))
            }
            (KeyCode::BackTab, _) | (KeyCode::Left, _) => {
                Self::redraw_if(self.nav.cycle(false, &mut self.view))
            }
            _ => Action::Ignore,
        }
    }

    pub fn handle_mouse(&mut self, m: MouseEvent) -> Action {
        match m.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                Self::redraw_if(self.nav.click(m.column, m.row, &mut self.view))
            }
            MouseEventKind::Moved => Self::redraw_if(self.nav.set_hover(m.column, m.row)),
            _ => Action::Ignore,
        }
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyEventKind;

    use super::*;
    use crate::config::{DEFAULT_BACKGROUND, DEFAULT_GLYPH, DEFAULT_PANELS};
    use crate::nav::default_bindings;

    fn page() -> Page {
        let view = ViewController::new(&DEFAULT_PANELS, "about").unwrap();
        let nav = NavBar::new(&default_bindings(&view), &view).unwrap();
        let texts = PanelTexts::new(&view, &[]).unwrap();
        let mut page = Page::new(
            view,
            nav,
            texts,
            Theme::new(DEFAULT_BACKGROUND, DEFAULT_GLYPH),
            true,
        );
        page.layout(80);
        page
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new_with_kind(code, KeyModifiers::NONE, KeyEventKind::Press)
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn number_keys_press_triggers() {
        let mut page = page();
        assert_eq!(page.handle_key(key(KeyCode::Char('4'))), Action::Redraw);
        assert!(page.view.is_visible("contact"));
        assert_eq!(page.handle_key(key(KeyCode::Char('7'))), Action::Ignore);
        assert!(page.view.is_visible("contact"));
    }

    #[test]
    fn quit_and_pause_keys() {
        let mut page = page();
        assert_eq!(page.handle_key(key(KeyCode::Esc)), Action::Quit);
        assert_eq!(page.handle_key(key(KeyCode::Char('q'))), Action::Quit);
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(page.handle_key(ctrl_c), Action::Quit);
        assert_eq!(page.handle_key(key(KeyCode::Char('p'))), Action::TogglePause);
    }

    #[test]
    fn clicking_a_tab_switches_panel() {
        let mut page = page();
        let col = page.nav.triggers()[2].col;
        let click = mouse(MouseEventKind::Down(MouseButton::Left), col, 0);
        assert_eq!(page.handle_mouse(click), Action::Redraw);
        assert!(page.view.is_visible("experience"));

        let miss = mouse(MouseEventKind::Down(MouseButton::Left), col, 10);
        assert_eq!(page.handle_mouse(miss), Action::Ignore);
        assert!(page.view.is_visible("experience"));
    }

    #[test]
    fn overlay_shows_only_the_active_panel() {
        let mut page = page();
        page.handle_key(key(KeyCode::Tab));
        let text: String = page.overlay(80, 24).iter().map(|c| c.2.ch).collect();
        assert!(text.contains("UPDATES"));
        assert!(!text.contains("ABOUT"));
    }
}
