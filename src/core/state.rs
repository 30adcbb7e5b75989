//! # Page State
//!
//! Everything a handler may touch while it runs.
//!
//! ```text
//! PageState
//! ├── document: Document          // the live page
//! ├── location: Location          // current path, reloads, navigations
//! ├── gate: ConfirmationGate      // armed destructive controls
//! ├── toggle: PostTypeToggle      // remembered required-ness of #link
//! └── expand_all: bool            // Shift+X was used on this page
//! ```
//!
//! Per-element state is keyed by `ElementKey` and dropped when the element
//! leaves the document or the page is replaced by a transition.

use log::info;

use super::confirm::ConfirmationGate;
use super::dom::Document;
use super::outcome::Transition;
use super::toggle::PostTypeToggle;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub path: String,
    pub reloads: usize,
    pub navigations: Vec<String>,
}

impl Location {
    pub fn new(path: &str) -> Self {
        Self {
            path: path.to_string(),
            reloads: 0,
            navigations: Vec::new(),
        }
    }

    pub fn reload(&mut self) {
        self.reloads += 1;
    }

    pub fn navigate(&mut self, path: &str) {
        self.path = path.to_string();
        self.navigations.push(path.to_string());
    }

    /// Total number of terminal transitions applied to this page.
    pub fn transitions(&self) -> usize {
        self.reloads + self.navigations.len()
    }
}

#[derive(Debug)]
pub struct PageState {
    pub document: Document,
    pub location: Location,
    pub gate: ConfirmationGate,
    pub toggle: PostTypeToggle,
    pub expand_all: bool,
}

impl PageState {
    pub fn new(document: Document, path: &str) -> Self {
        Self {
            document,
            location: Location::new(path),
            gate: ConfirmationGate::default(),
            toggle: PostTypeToggle::default(),
            expand_all: false,
        }
    }

    pub fn with_confirm_label(mut self, label: &str) -> Self {
        self.gate = ConfirmationGate::new(label);
        self
    }

    /// Applies a terminal transition. The old page's transient state goes with it.
    pub fn apply(&mut self, transition: &Transition) {
        match transition {
            Transition::Reload => {
                info!("Reloading {}", self.location.path);
                self.location.reload();
            }
            Transition::Navigate(path) => {
                info!("Navigating {} -> {}", self.location.path, path);
                self.location.navigate(path);
            }
        }
        self.gate.forget_all();
        self.toggle.forget_all();
        self.expand_all = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_counts_each_transition_once() {
        let mut state = PageState::new(Document::new(), "/s/news/mods");
        state.apply(&Transition::Reload);
        assert_eq!(state.location.reloads, 1);
        assert_eq!(state.location.path, "/s/news/mods");

        state.apply(&Transition::Navigate("/s/news".to_string()));
        assert_eq!(state.location.path, "/s/news");
        assert_eq!(state.location.navigations, vec!["/s/news".to_string()]);
        assert_eq!(state.location.transitions(), 2);
    }

    #[test]
    fn test_apply_drops_transient_state() {
        let mut state = PageState::new(Document::new(), "/");
        state.expand_all = true;
        state.apply(&Transition::Reload);
        assert!(!state.expand_all);
    }
}
