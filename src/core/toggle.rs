//! # Post-Type Toggle
//!
//! The submit form switches between a text post and a link post without
//! a round trip. One control (`#ptoggle`) flips the hidden `#ptypeval`
//! field and swaps two element groups:
//!
//! - `.txcont`: shown only for text posts
//! - `.lncont`: shown only for link posts
//!
//! The control's label always names the *other* type ("Change to text
//! post"). The `required` state `#link` had before the first toggle is
//! remembered and put back whenever the form returns to that mode.

use std::collections::HashMap;

use log::debug;

use super::dom::{Display, Document, ElementKey};
use super::registry::HandlerError;
use super::selector::SelectorList;

pub const VALUE_FIELD_ID: &str = "ptypeval";
pub const TYPE_LABEL_ID: &str = "ptype";
pub const LINK_INPUT_ID: &str = "link";
pub const TEXT_GROUP: &str = ".txcont";
pub const LINK_GROUP: &str = ".lncont";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostType {
    Text,
    Link,
}

impl PostType {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "text" => Some(PostType::Text),
            "link" => Some(PostType::Link),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PostType::Text => "text",
            PostType::Link => "link",
        }
    }

    pub fn other(self) -> Self {
        match self {
            PostType::Text => PostType::Link,
            PostType::Link => PostType::Text,
        }
    }
}

/// Whether `#link` carries `required` in each mode, as first observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequiredByMode {
    pub text: bool,
    pub link: bool,
}

impl RequiredByMode {
    /// The mode not observed gets the default: required for link, optional for text.
    fn observe(mode: PostType, required: bool) -> Self {
        match mode {
            PostType::Text => Self { text: required, link: true },
            PostType::Link => Self { text: false, link: required },
        }
    }

    fn get(self, mode: PostType) -> bool {
        match mode {
            PostType::Text => self.text,
            PostType::Link => self.link,
        }
    }
}

/// Remembers, per link input, the `required` state it had before the first toggle.
#[derive(Debug, Default)]
pub struct PostTypeToggle {
    required: HashMap<ElementKey, RequiredByMode>,
}

impl PostTypeToggle {
    /// Flips the form to the other post type and returns the new type.
    ///
    /// `control` is the toggle button being relabelled.
    pub fn toggle(&mut self, doc: &mut Document, control: ElementKey) -> Result<PostType, HandlerError> {
        self.required.retain(|key, _| doc.contains(*key));

        let field = doc
            .by_id(VALUE_FIELD_ID)
            .ok_or_else(|| HandlerError::MissingElement(format!("#{VALUE_FIELD_ID}")))?;
        let current = doc
            .get(field)
            .and_then(|e| PostType::parse(&e.value))
            .unwrap_or(PostType::Link);
        let next = current.other();

        if let Some(element) = doc.get_mut(field) {
            element.value = next.as_str().to_string();
        }
        if let Some(element) = doc.get_mut(control) {
            element.label = format!("Change to {} post", current.as_str());
        }
        if let Some(label) = doc.by_id(TYPE_LABEL_ID).and_then(|k| doc.get_mut(k)) {
            label.label = next.as_str().to_string();
        }

        self.apply_required(doc, current, next);
        set_group_visible(doc, TEXT_GROUP, next == PostType::Text);
        set_group_visible(doc, LINK_GROUP, next == PostType::Link);

        debug!("Post type {} -> {}", current.as_str(), next.as_str());
        Ok(next)
    }

    fn apply_required(&mut self, doc: &mut Document, from: PostType, to: PostType) {
        let Some(link) = doc.by_id(LINK_INPUT_ID) else {
            return;
        };
        let Some(element) = doc.get_mut(link) else {
            return;
        };
        let remembered = *self
            .required
            .entry(link)
            .or_insert_with(|| RequiredByMode::observe(from, element.is_required()));
        element.set_required(remembered.get(to));
    }

    /// The remembered `required` state of `link`, once it has been observed.
    pub fn remembered_required(&self, link: ElementKey) -> Option<RequiredByMode> {
        self.required.get(&link).copied()
    }

    pub fn forget_all(&mut self) {
        self.required.clear();
    }
}

fn set_group_visible(doc: &mut Document, group: &str, visible: bool) {
    let Ok(selector) = SelectorList::parse(group) else {
        return;
    };
    for key in doc.query_all(&selector) {
        if let Some(element) = doc.get_mut(key) {
            element.display = if visible {
                Display::shown_for(element)
            } else {
                Display::None
            };
        }
    }
}
