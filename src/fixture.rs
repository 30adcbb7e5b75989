//! # Page Fixtures
//!
//! The `modpanel` binary drives a page described in TOML instead of a live
//! browser document:
//!
//! ```toml
//! path = "/s/news/mods"
//!
//! [[element]]
//! name = "mods"
//! tag = "ul"
//!
//! [[element]]
//! parent = "mods"
//! tag = "a"
//! class = ["revoke-mod2"]
//! label = "remove"
//! data = { user = "bob", sub = "news" }
//! ```
//!
//! Elements without `parent` go under `<body>`; a parent must be declared
//! before its children. Events are given as `KIND:SELECTOR[=VALUE]`.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;

use crate::core::dom::{Display, Document, Element};
use crate::core::event::{Event, EventKind, KeyPress, Target};
use crate::core::selector::SelectorList;
use crate::core::state::PageState;

#[derive(Debug)]
pub enum FixtureError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    UnknownParent(String),
    BadEvent(String),
    NoMatch(String),
}

impl fmt::Display for FixtureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FixtureError::Io(e) => write!(f, "fixture I/O error: {e}"),
            FixtureError::Parse(e) => write!(f, "fixture parse error: {e}"),
            FixtureError::UnknownParent(name) => write!(f, "unknown parent element: {name}"),
            FixtureError::BadEvent(spec) => write!(f, "bad event spec: {spec}"),
            FixtureError::NoMatch(selector) => write!(f, "no element matches {selector}"),
        }
    }
}

impl std::error::Error for FixtureError {}

#[derive(Debug, Deserialize)]
struct Fixture {
    path: Option<String>,
    #[serde(default, rename = "element")]
    elements: Vec<FixtureElement>,
}

#[derive(Debug, Deserialize)]
struct FixtureElement {
    name: Option<String>,
    parent: Option<String>,
    tag: String,
    id: Option<String>,
    #[serde(default)]
    class: Vec<String>,
    #[serde(default)]
    data: BTreeMap<String, String>,
    #[serde(default)]
    attrs: BTreeMap<String, String>,
    #[serde(default)]
    label: String,
    #[serde(default)]
    value: String,
    #[serde(default)]
    hidden: bool,
}

impl FixtureElement {
    fn to_element(&self) -> Element {
        let mut element = Element::new(&self.tag)
            .with_label(&self.label)
            .with_value(&self.value);
        if let Some(id) = &self.id {
            element = element.with_id(id);
        }
        for class in &self.class {
            element = element.with_class(class);
        }
        for (name, value) in &self.attrs {
            element = element.with_attr(name, value);
        }
        for (name, value) in &self.data {
            element = element.with_data(name, value);
        }
        if self.hidden {
            element = element.with_display(Display::None);
        }
        element
    }
}

pub fn parse_fixture(contents: &str) -> Result<PageState, FixtureError> {
    let fixture: Fixture = toml::from_str(contents).map_err(FixtureError::Parse)?;
    let mut doc = Document::new();
    let mut named = HashMap::new();

    for spec in &fixture.elements {
        let parent = match &spec.parent {
            Some(name) => *named
                .get(name.as_str())
                .ok_or_else(|| FixtureError::UnknownParent(name.clone()))?,
            None => doc.root(),
        };
        let key = doc
            .append(parent, spec.to_element())
            .ok_or_else(|| FixtureError::UnknownParent(spec.parent.clone().unwrap_or_default()))?;
        if let Some(name) = &spec.name {
            named.insert(name.as_str(), key);
        }
    }

    Ok(PageState::new(doc, fixture.path.as_deref().unwrap_or("/")))
}

pub fn load_fixture(path: &Path) -> Result<PageState, FixtureError> {
    let contents = fs::read_to_string(path).map_err(FixtureError::Io)?;
    parse_fixture(&contents)
}

/// A scripted user event: `click:#ptoggle`, `input:#ban_expires=2024-01-01T00:00`,
/// `keydown:window=shift+x`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventSpec {
    pub kind: EventKind,
    pub selector: String,
    pub value: Option<String>,
}

impl FromStr for EventSpec {
    type Err = FixtureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || FixtureError::BadEvent(s.to_string());
        let (kind, rest) = s.split_once(':').ok_or_else(bad)?;
        let kind = kind.parse::<EventKind>().map_err(|_| bad())?;

        // `=` inside `[attr=value]` belongs to the selector.
        let mut depth = 0usize;
        let split = rest.char_indices().find(|(_, ch)| match ch {
            '[' => {
                depth += 1;
                false
            }
            ']' => {
                depth = depth.saturating_sub(1);
                false
            }
            '=' => depth == 0,
            _ => false,
        });
        let (selector, value) = match split {
            Some((pos, _)) => (&rest[..pos], Some(rest[pos + 1..].to_string())),
            None => (rest, None),
        };
        if selector.trim().is_empty() {
            return Err(bad());
        }
        Ok(EventSpec {
            kind,
            selector: selector.trim().to_string(),
            value,
        })
    }
}

impl EventSpec {
    /// Resolves the target on `state`'s page, applying `value` to form fields first.
    pub fn resolve(&self, state: &mut PageState) -> Result<Event, FixtureError> {
        if self.kind == EventKind::KeyDown {
            let key = self
                .value
                .as_deref()
                .and_then(KeyPress::parse)
                .ok_or_else(|| FixtureError::BadEvent(format!("{}: missing key", self.selector)))?;
            let target = if self.selector == "window" {
                Target::Window
            } else {
                Target::Element(self.find(state)?)
            };
            return Ok(Event::key_down(target, key));
        }

        let key = self.find(state)?;
        if let (Some(value), Some(element)) = (&self.value, state.document.get_mut(key)) {
            element.value = value.clone();
        }
        Ok(Event::new(self.kind, Target::Element(key)))
    }

    fn find(&self, state: &PageState) -> Result<crate::core::dom::ElementKey, FixtureError> {
        let selector = SelectorList::parse(&self.selector)
            .map_err(|e| FixtureError::BadEvent(format!("{}: {e}", self.selector)))?;
        state
            .document
            .query(&selector)
            .ok_or_else(|| FixtureError::NoMatch(self.selector.clone()))
    }
}
