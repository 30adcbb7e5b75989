//! # Confirmation Gate
//!
//! Destructive controls need two clicks. The first relabels the control
//! and arms it; the second restores the label and lets the action fire.
//!
//! ```text
//! Idle ──trigger──▶ Armed ──trigger──▶ (fire) ──▶ Idle
//! ```
//!
//! There is no timeout and clicking elsewhere does not disarm. State is
//! keyed by `ElementKey`, so a removed or replaced element starts over.

use std::collections::HashMap;

use log::debug;

use super::dom::{Document, ElementKey};
use super::registry::HandlerError;

pub const DEFAULT_CONFIRM_LABEL: &str = "Are you sure?";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmState {
    Idle,
    Armed { original_label: String },
}

/// What the caller should do after a trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    /// First trigger: the control now asks for confirmation. Do nothing else.
    Armed,
    /// Confirmed: run the wrapped action.
    Fire,
}

#[derive(Debug)]
pub struct ConfirmationGate {
    label: String,
    armed: HashMap<ElementKey, String>,
}

impl Default for ConfirmationGate {
    fn default() -> Self {
        Self::new(DEFAULT_CONFIRM_LABEL)
    }
}

impl ConfirmationGate {
    pub fn new(label: &str) -> Self {
        Self {
            label: label.to_string(),
            armed: HashMap::new(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn state(&self, key: ElementKey) -> ConfirmState {
        match self.armed.get(&key) {
            Some(original_label) => ConfirmState::Armed {
                original_label: original_label.clone(),
            },
            None => ConfirmState::Idle,
        }
    }

    pub fn trigger(&mut self, doc: &mut Document, key: ElementKey) -> Result<GateDecision, HandlerError> {
        self.purge(doc);
        let element = doc
            .get_mut(key)
            .ok_or_else(|| HandlerError::MissingElement("confirmation control".to_string()))?;

        match self.armed.remove(&key) {
            Some(original_label) => {
                element.label = original_label;
                debug!("Confirmation received, firing");
                Ok(GateDecision::Fire)
            }
            None => {
                let original_label = std::mem::replace(&mut element.label, self.label.clone());
                self.armed.insert(key, original_label);
                debug!("Confirmation requested");
                Ok(GateDecision::Armed)
            }
        }
    }

    pub fn armed_count(&self) -> usize {
        self.armed.len()
    }

    /// Drops state for elements no longer in the document.
    pub fn purge(&mut self, doc: &Document) {
        self.armed.retain(|key, _| doc.contains(*key));
    }

    pub fn forget_all(&mut self) {
        self.armed.clear();
    }
}
