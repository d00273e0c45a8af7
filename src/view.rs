// Copyright (c) 2026 rezky_nightky

//! Which content panel is on screen.
//!
//! Exactly one panel is visible at any time after construction. The state is
//! the index of that panel, so no update can ever expose zero or two panels.

use std::fmt;

use tracing::debug;

use crate::error::ConfigError;

pub const PANEL_COUNT: usize = 4;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PanelId(String);

impl PanelId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PanelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<str> for PanelId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

/// Visibility of every registered panel, in registration order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Visibility {
    shown: usize,
}

impl Visibility {
    fn only(shown: usize) -> Self {
        Self { shown }
    }

    pub fn shown(self) -> usize {
        self.shown
    }

    pub fn is_visible(self, index: usize) -> bool {
        index == self.shown
    }

    pub fn as_flags(self) -> [bool; PANEL_COUNT] {
        std::array::from_fn(|i| i == self.shown)
    }
}

/// Panel ids are compared with surrounding whitespace removed, the same way
/// they are stored.
fn position(panels: &[PanelId], id: &str) -> Option<usize> {
    let id = id.trim();
    panels.iter().position(|p| p == id)
}

/// The state machine step: `id` becomes the only visible panel. Unknown ids
/// leave `current` untouched.
pub fn transition(panels: &[PanelId; PANEL_COUNT], current: Visibility, id: &str) -> Visibility {
    match position(panels, id) {
        Some(i) => Visibility::only(i),
        None => current,
    }
}

#[derive(Clone, Debug)]
pub struct ViewController {
    panels: [PanelId; PANEL_COUNT],
    visibility: Visibility,
}

impl ViewController {
    pub fn new<S: AsRef<str>>(panel_ids: &[S], default_panel: &str) -> Result<Self, ConfigError> {
        if panel_ids.len() != PANEL_COUNT {
            return Err(ConfigError::PanelCount {
                expected: PANEL_COUNT,
                got: panel_ids.len(),
            });
        }

        let mut panels: Vec<PanelId> = Vec::with_capacity(PANEL_COUNT);
        for (i, id) in panel_ids.iter().enumerate() {
            let id = id.as_ref().trim();
            if id.is_empty() {
                return Err(ConfigError::EmptyPanelId(i));
            }
            if panels.iter().any(|p| p == id) {
                return Err(ConfigError::DuplicatePanel(id.to_string()));
            }
            panels.push(PanelId(id.to_string()));
        }

        let shown = position(&panels, default_panel)
            .ok_or_else(|| ConfigError::UnknownDefaultPanel(default_panel.to_string()))?;

        let panels: [PanelId; PANEL_COUNT] = panels
            .try_into()
            .map_err(|v: Vec<PanelId>| ConfigError::PanelCount {
                expected: PANEL_COUNT,
                got: v.len(),
            })?;

        Ok(Self {
            panels,
            visibility: Visibility::only(shown),
        })
    }

    /// Shows `id` and hides the others. Returns `false`, changing nothing, if
    /// `id` is not registered.
    pub fn activate(&mut self, id: &str) -> bool {
        let next = transition(&self.panels, self.visibility, id);
        let known = self.is_registered(id);
        if !known {
            debug!(panel = id, "ignoring unknown panel");
        }
        self.visibility = next;
        known
    }

    pub fn panels(&self) -> &[PanelId; PANEL_COUNT] {
        &self.panels
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn active(&self) -> &PanelId {
        &self.panels[self.visibility.shown()]
    }

    pub fn is_registered(&self, id: &str) -> bool {
        position(&self.panels, id).is_some()
    }

    pub fn is_visible(&self, id: &str) -> bool {
        position(&self.panels, id).is_some_and(|i| self.visibility.is_visible(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const IDS: [&str; 4] = ["about", "updates", "experience", "contact"];

    fn visible(view: &ViewController) -> Vec<&str> {
        view.panels()
            .iter()
            .filter(|p| view.is_visible(p.as_str()))
            .map(|p| p.as_str())
            .collect()
    }

    #[test]
    fn default_panel_is_the_only_one_shown() {
        let view = ViewController::new(&IDS, "about").unwrap();
        assert_eq!(visible(&view), vec!["about"]);
        assert_eq!(view.visibility().as_flags(), [true, false, false, false]);
    }

    #[test]
    fn last_activation_wins() {
        let mut view = ViewController::new(&IDS, "about").unwrap();
        assert!(view.activate("experience"));
        assert!(view.activate("contact"));
        assert_eq!(visible(&view), vec!["contact"]);
        assert_eq!(view.active().as_str(), "contact");
    }

    #[test]
    fn unknown_panel_is_a_no_op() {
        let mut view = ViewController::new(&IDS, "updates").unwrap();
        let before = view.visibility();
        assert!(!view.activate("blog"));
        assert!(!view.activate(""));
        assert_eq!(view.visibility(), before);
        assert_eq!(visible(&view), vec!["updates"]);
    }

    #[test]
    fn exactly_one_visible_after_every_activation() {
        let mut view = ViewController::new(&IDS, "about").unwrap();
        let script = [
            "contact", "contact", "nope", "about", "updates", "", "experience", "ABOUT",
        ];
        for id in script {
            view.activate(id);
            let flags = view.visibility().as_flags();
            assert_eq!(flags.iter().filter(|v| **v).count(), 1);
        }
        assert_eq!(visible(&view), vec!["experience"]);
    }

    #[test]
    fn transition_is_pure() {
        let view = ViewController::new(&IDS, "about").unwrap();
        let start = view.visibility();
        let next = transition(view.panels(), start, "updates");
        assert_eq!(next.as_flags(), [false, true, false, false]);
        assert_eq!(transition(view.panels(), next, "missing"), next);
        assert_eq!(view.visibility(), start);
    }

    #[test]
    fn rejects_wrong_panel_count() {
        let err = ViewController::new(&IDS[..3], "about").unwrap_err();
        assert_eq!(
            err,
            ConfigError::PanelCount {
                expected: 4,
                got: 3
            }
        );
        let five = ["a", "b", "c", "d", "e"];
        assert!(ViewController::new(&five, "a").is_err());
    }

    #[test]
    fn rejects_duplicates_and_unknown_default() {
        let dup = ["about", "updates", "about", "contact"];
        assert_eq!(
            ViewController::new(&dup, "about").unwrap_err(),
            ConfigError::DuplicatePanel("about".to_string())
        );
        assert_eq!(
            ViewController::new(&IDS, "blog").unwrap_err(),
            ConfigError::UnknownDefaultPanel("blog".to_string())
        );
        let blank = ["about", " ", "experience", "contact"];
        assert_eq!(
            ViewController::new(&blank, "about").unwrap_err(),
            ConfigError::EmptyPanelId(1)
        );
    }

    #[test]
    fn padded_ids_match_their_trimmed_form() {
        let padded = [" about", "updates ", "experience", "contact"];
        let mut view = ViewController::new(&padded, " about").unwrap();
        assert_eq!(view.active().as_str(), "about");
        assert!(view.is_visible("about"));

        assert!(view.activate("updates"));
        assert!(view.activate(" about"));
        assert!(view.is_visible(" about "));
        assert!(view.is_registered("updates "));
        assert_eq!(view.visibility().as_flags(), [true, false, false, false]);
    }
}
