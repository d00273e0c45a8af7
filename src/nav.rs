// Copyright (c) 2026 rezky_nightky

use tracing::debug;

use crate::error::ConfigError;
use crate::view::{ViewController, PANEL_COUNT};

/// A clickable trigger bound to exactly one panel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NavTrigger {
    pub id: String,
    pub panel: String,
    pub label: String,
    /// Left column and width on the nav row, set by [`NavBar::layout`].
    pub col: u16,
    pub width: u16,
}

/// The four navigation triggers. Hover is presentation state only; it never
/// reaches the [`ViewController`].
#[derive(Clone, Debug)]
pub struct NavBar {
    triggers: Vec<NavTrigger>,
    hover: Option<usize>,
}

/// Default binding: `nav-<panel>` for every panel, in panel order.
pub fn default_bindings(view: &ViewController) -> Vec<(String, String)> {
    view.panels()
        .iter()
        .map(|p| (format!("nav-{}", p), p.to_string()))
        .collect()
}

impl NavBar {
    pub fn new(bindings: &[(String, String)], view: &ViewController) -> Result<Self, ConfigError> {
        if bindings.len() != PANEL_COUNT {
            return Err(ConfigError::BindingCount {
                expected: PANEL_COUNT,
                got: bindings.len(),
            });
        }

        let mut triggers: Vec<NavTrigger> = Vec::with_capacity(PANEL_COUNT);
        for (trigger, panel) in bindings {
            if triggers.iter().any(|t| &t.id == trigger) {
                return Err(ConfigError::DuplicateTrigger(trigger.clone()));
            }
            if triggers.iter().any(|t| &t.panel == panel) {
                return Err(ConfigError::PanelBoundTwice(panel.clone()));
            }
            if !view.is_registered(panel) {
                return Err(ConfigError::UnregisteredPanel {
                    trigger: trigger.clone(),
                    panel: panel.clone(),
                });
            }
            triggers.push(NavTrigger {
                id: trigger.clone(),
                panel: panel.clone(),
                label: format!(" {} {} ", triggers.len() + 1, panel),
                col: 0,
                width: 0,
            });
        }

        Ok(Self {
            triggers,
            hover: None,
        })
    }

    pub fn triggers(&self) -> &[NavTrigger] {
        &self.triggers
    }

    pub fn hovered(&self) -> Option<&NavTrigger> {
        self.hover.and_then(|i| self.triggers.get(i))
    }

    /// Places the labels left to right on the nav row, one space apart,
    /// clipping whatever does not fit in `width` columns.
    pub fn layout(&mut self, width: u16) {
        let mut col: u16 = 1;
        for t in &mut self.triggers {
            let label_w = t.label.chars().count().min(u16::MAX as usize) as u16;
            t.col = col.min(width);
            t.width = label_w.min(width.saturating_sub(t.col));
            col = col.saturating_add(label_w).saturating_add(1);
        }
    }

    /// The trigger under a terminal cell, if any. Only row 0 holds triggers.
    pub fn hit(&self, x: u16, y: u16) -> Option<&NavTrigger> {
        if y != 0 {
            return None;
        }
        self.triggers
            .iter()
            .find(|t| t.width > 0 && x >= t.col && x < t.col + t.width)
    }

    pub fn set_hover(&mut self, x: u16, y: u16) -> bool {
        let idx = self
            .hit(x, y)
            .and_then(|t| self.triggers.iter().position(|o| o.id == t.id));
        let changed = idx != self.hover;
        self.hover = idx;
        changed
    }

    /// Activates the panel bound to `trigger_id`. Unknown triggers do nothing.
    pub fn trigger(&self, trigger_id: &str, view: &mut ViewController) -> bool {
        match self.triggers.iter().find(|t| t.id == trigger_id) {
            Some(t) => view.activate(&t.panel),
            None => {
                debug!(trigger = trigger_id, "ignoring unknown trigger");
                false
            }
        }
    }

    /// Keyboard shortcut: the n-th trigger, counting from 1.
    pub fn trigger_nth(&self, n: usize, view: &mut ViewController) -> bool {
        match n.checked_sub(1).and_then(|i| self.triggers.get(i)) {
            Some(t) => view.activate(&t.panel),
            None => false,
        }
    }

    pub fn click(&self, x: u16, y: u16, view: &mut ViewController) -> bool {
        match self.hit(x, y) {
            Some(t) => self.trigger(&t.id, view),
            None => false,
        }
    }

    /// Moves to the next (or previous) trigger after the active panel.
    pub fn cycle(&self, forward: bool, view: &mut ViewController) -> bool {
        let n = self.triggers.len();
        let cur = self
            .triggers
            .iter()
            .position(|t| view.is_visible(&t.panel))
            .unwrap_or(0);
        let next = if forward {
            (cur + 1) % n
        } else {
            (cur + n - 1) % n
        };
        view.activate(&self.triggers[next].panel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_PANELS;

    fn view() -> ViewController {
        ViewController::new(&DEFAULT_PANELS, "about").unwrap()
    }

    fn pairs(list: &[(&str, &str)]) -> Vec<(String, String)> {
        list.iter()
            .map(|(t, p)| (t.to_string(), p.to_string()))
            .collect()
    }

    #[test]
    fn default_bindings_cover_every_panel() {
        let view = view();
        let nav = NavBar::new(&default_bindings(&view), &view).unwrap();
        let ids: Vec<&str> = nav.triggers().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["nav-about", "nav-updates", "nav-experience", "nav-contact"]
        );
    }

    #[test]
    fn trigger_activates_bound_panel() {
        let mut view = view();
        let nav = NavBar::new(&default_bindings(&view), &view).unwrap();
        assert!(nav.trigger("nav-experience", &mut view));
        assert!(view.is_visible("experience"));
        assert!(!nav.trigger("nav-blog", &mut view));
        assert!(view.is_visible("experience"));
    }

    #[test]
    fn rejects_malformed_bindings() {
        let view = view();
        let three = pairs(&[("a", "about"), ("b", "updates"), ("c", "contact")]);
        assert!(matches!(
            NavBar::new(&three, &view),
            Err(ConfigError::BindingCount { got: 3, .. })
        ));

        let dup_trigger = pairs(&[
            ("a", "about"),
            ("a", "updates"),
            ("c", "experience"),
            ("d", "contact"),
        ]);
        assert_eq!(
            NavBar::new(&dup_trigger, &view).unwrap_err(),
            ConfigError::DuplicateTrigger("a".to_string())
        );

        let twice = pairs(&[
            ("a", "about"),
            ("b", "about"),
            ("c", "experience"),
            ("d", "contact"),
        ]);
        assert_eq!(
            NavBar::new(&twice, &view).unwrap_err(),
            ConfigError::PanelBoundTwice("about".to_string())
        );

        let stray = pairs(&[
            ("a", "about"),
            ("b", "blog"),
            ("c", "experience"),
            ("d", "contact"),
        ]);
        assert!(matches!(
            NavBar::new(&stray, &view),
            Err(ConfigError::UnregisteredPanel { .. })
        ));
    }

    #[test]
    fn click_hits_laid_out_labels() {
        let mut view = view();
        let mut nav = NavBar::new(&default_bindings(&view), &view).unwrap();
        nav.layout(80);

        let contact = nav.triggers()[3].clone();
        assert!(nav.click(contact.col, 0, &mut view));
        assert!(view.is_visible("contact"));

        assert!(!nav.click(contact.col, 1, &mut view));
        assert!(!nav.click(0, 0, &mut view));
        assert!(view.is_visible("contact"));
    }

    #[test]
    fn narrow_layout_clips_labels() {
        let view = view();
        let mut nav = NavBar::new(&default_bindings(&view), &view).unwrap();
        nav.layout(12);
        assert!(nav.triggers().iter().all(|t| t.col + t.width <= 12));
        assert_eq!(nav.triggers()[3].width, 0);
        assert!(nav.hit(11, 0).is_some_and(|t| t.panel != "contact"));
    }

    #[test]
    fn hover_tracks_pointer_without_touching_view() {
        let view = view();
        let mut nav = NavBar::new(&default_bindings(&view), &view).unwrap();
        nav.layout(80);
        let col = nav.triggers()[1].col;
        assert!(nav.set_hover(col, 0));
        assert_eq!(nav.hovered().map(|t| t.panel.as_str()), Some("updates"));
        assert!(!nav.set_hover(col + 1, 0));
        assert!(nav.set_hover(col, 5));
        assert!(nav.hovered().is_none());
        assert!(view.is_visible("about"));
    }

    #[test]
    fn keys_and_cycling() {
        let mut view = view();
        let nav = NavBar::new(&default_bindings(&view), &view).unwrap();
        assert!(nav.trigger_nth(3, &mut view));
        assert!(view.is_visible("experience"));
        assert!(!nav.trigger_nth(0, &mut view));
        assert!(!nav.trigger_nth(5, &mut view));

        assert!(nav.cycle(true, &mut view));
        assert!(view.is_visible("contact"));
        assert!(nav.cycle(true, &mut view));
        assert!(view.is_visible("about"));
        assert!(nav.cycle(false, &mut view));
        assert!(view.is_visible("contact"));
    }
}
