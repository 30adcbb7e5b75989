//! # Headless Document
//!
//! A small arena-backed stand-in for the browser page. Handlers read and
//! patch it exactly the way the page script would patch the live DOM:
//! labels, form values, `display` styles and attributes.
//!
//! ```text
//! Document
//! ├── slots: Vec<Slot>        // arena; index + generation = ElementKey
//! └── root: ElementKey        // <body>, never removed
//! ```
//!
//! Removing an element bumps the generation of its slot, so any
//! `ElementKey` held elsewhere (confirmation state, toggle memory) stops
//! resolving instead of keeping the element alive.

use std::collections::BTreeMap;

use super::selector::SelectorList;

/// Stable handle to an element. Compares unequal once the element is removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementKey {
    index: usize,
    generation: u32,
}

/// The subset of CSS `display` the panel toggles between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Display {
    /// No inline style set; the stylesheet decides.
    #[default]
    Unset,
    Block,
    InlineBlock,
    None,
}

impl Display {
    /// The style a shown element gets: buttons stay inline, everything else is a block.
    pub fn shown_for(element: &Element) -> Display {
        if element.attr("type") == Some("button") {
            Display::InlineBlock
        } else {
            Display::Block
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Element {
    pub tag: String,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub attributes: BTreeMap<String, String>,
    /// Form value (`input.value`, `select.value`).
    pub value: String,
    /// Text content (`innerHTML` for the plain-text controls the panel relabels).
    pub label: String,
    pub display: Display,
    parent: Option<ElementKey>,
    children: Vec<ElementKey>,
}

impl Element {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            ..Default::default()
        }
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    pub fn with_class(mut self, class: &str) -> Self {
        self.classes.push(class.to_string());
        self
    }

    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.attributes.insert(name.to_string(), value.to_string());
        self
    }

    /// Shorthand for a `data-*` attribute.
    pub fn with_data(self, name: &str, value: &str) -> Self {
        self.with_attr(&format!("data-{name}"), value)
    }

    pub fn with_label(mut self, label: &str) -> Self {
        self.label = label.to_string();
        self
    }

    pub fn with_value(mut self, value: &str) -> Self {
        self.value = value.to_string();
        self
    }

    pub fn with_display(mut self, display: Display) -> Self {
        self.display = display;
        self
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn data(&self, name: &str) -> Option<&str> {
        self.attr(&format!("data-{name}"))
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn is_required(&self) -> bool {
        self.attributes.contains_key("required")
    }

    pub fn set_required(&mut self, required: bool) {
        if required {
            self.attributes.insert("required".to_string(), String::new());
        } else {
            self.attributes.remove("required");
        }
    }

    pub fn parent(&self) -> Option<ElementKey> {
        self.parent
    }

    pub fn children(&self) -> &[ElementKey] {
        &self.children
    }
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    element: Option<Element>,
}

#[derive(Debug)]
pub struct Document {
    slots: Vec<Slot>,
    root: ElementKey,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Creates a document holding only an empty `<body>`.
    pub fn new() -> Self {
        let root = ElementKey {
            index: 0,
            generation: 0,
        };
        Self {
            slots: vec![Slot {
                generation: 0,
                element: Some(Element::new("body")),
            }],
            root,
        }
    }

    pub fn root(&self) -> ElementKey {
        self.root
    }

    /// Appends `element` as the last child of `parent`.
    ///
    /// Returns `None` if `parent` is no longer in the document.
    pub fn append(&mut self, parent: ElementKey, mut element: Element) -> Option<ElementKey> {
        if !self.contains(parent) {
            return None;
        }
        element.parent = Some(parent);
        element.children.clear();

        let key = match self.slots.iter().position(|slot| slot.element.is_none()) {
            Some(index) => {
                let slot = &mut self.slots[index];
                slot.element = Some(element);
                ElementKey {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    element: Some(element),
                });
                ElementKey {
                    index: self.slots.len() - 1,
                    generation: 0,
                }
            }
        };

        if let Some(parent) = self.get_mut(parent) {
            parent.children.push(key);
        }
        Some(key)
    }

    /// Removes an element and its subtree. The root cannot be removed.
    pub fn remove(&mut self, key: ElementKey) -> bool {
        if key == self.root || !self.contains(key) {
            return false;
        }
        if let Some(parent) = self.get(key).and_then(Element::parent) {
            if let Some(parent) = self.get_mut(parent) {
                parent.children.retain(|child| *child != key);
            }
        }

        let mut stack = vec![key];
        while let Some(next) = stack.pop() {
            let slot = &mut self.slots[next.index];
            if let Some(element) = slot.element.take() {
                stack.extend(element.children);
            }
            slot.generation = slot.generation.wrapping_add(1);
        }
        true
    }

    pub fn contains(&self, key: ElementKey) -> bool {
        self.slots
            .get(key.index)
            .is_some_and(|slot| slot.generation == key.generation && slot.element.is_some())
    }

    pub fn get(&self, key: ElementKey) -> Option<&Element> {
        self.slots
            .get(key.index)
            .filter(|slot| slot.generation == key.generation)
            .and_then(|slot| slot.element.as_ref())
    }

    pub fn get_mut(&mut self, key: ElementKey) -> Option<&mut Element> {
        self.slots
            .get_mut(key.index)
            .filter(|slot| slot.generation == key.generation)
            .and_then(|slot| slot.element.as_mut())
    }

    pub fn parent(&self, key: ElementKey) -> Option<ElementKey> {
        self.get(key).and_then(Element::parent)
    }

    /// `key` followed by each ancestor up to the root.
    pub fn ancestors_or_self(&self, key: ElementKey) -> impl Iterator<Item = ElementKey> + '_ {
        std::iter::successors(self.contains(key).then_some(key), move |k| self.parent(*k))
    }

    /// Descendants of `scope` in document order, excluding `scope` itself.
    pub fn descendants(&self, scope: ElementKey) -> Vec<ElementKey> {
        let mut out = Vec::new();
        let mut stack: Vec<ElementKey> = match self.get(scope) {
            Some(element) => element.children.iter().rev().copied().collect(),
            None => return out,
        };
        while let Some(key) = stack.pop() {
            if let Some(element) = self.get(key) {
                out.push(key);
                stack.extend(element.children.iter().rev().copied());
            }
        }
        out
    }

    /// First element with the given id, in document order.
    pub fn by_id(&self, id: &str) -> Option<ElementKey> {
        std::iter::once(self.root)
            .chain(self.descendants(self.root))
            .find(|key| self.get(*key).and_then(|e| e.id.as_deref()) == Some(id))
    }

    /// All elements under `scope` matching `selector`, in document order.
    pub fn query_within(&self, scope: ElementKey, selector: &SelectorList) -> Vec<ElementKey> {
        self.descendants(scope)
            .into_iter()
            .filter(|key| selector.matches(self, *key))
            .collect()
    }

    pub fn query_all(&self, selector: &SelectorList) -> Vec<ElementKey> {
        std::iter::once(self.root)
            .chain(self.descendants(self.root))
            .filter(|key| selector.matches(self, *key))
            .collect()
    }

    pub fn query(&self, selector: &SelectorList) -> Option<ElementKey> {
        self.query_all(selector).into_iter().next()
    }

    /// Reads a `data-*` attribute of `key`.
    pub fn data(&self, key: ElementKey, name: &str) -> Option<&str> {
        self.get(key).and_then(|element| element.data(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (Document, ElementKey, ElementKey) {
        let mut doc = Document::new();
        let root = doc.root();
        let list = doc
            .append(root, Element::new("ul").with_id("mods"))
            .unwrap();
        let item = doc
            .append(list, Element::new("li").with_class("mod").with_data("user", "bob"))
            .unwrap();
        (doc, list, item)
    }

    #[test]
    fn test_append_and_lookup() {
        let (doc, list, item) = sample();
        assert_eq!(doc.by_id("mods"), Some(list));
        assert_eq!(doc.parent(item), Some(list));
        assert_eq!(doc.data(item, "user"), Some("bob"));
        assert_eq!(doc.descendants(doc.root()), vec![list, item]);
    }

    #[test]
    fn test_removed_keys_stop_resolving() {
        let (mut doc, list, item) = sample();
        assert!(doc.remove(list));
        assert!(!doc.contains(list));
        assert!(!doc.contains(item));
        assert!(doc.get(item).is_none());

        // Slot reuse must not resurrect the old key.
        let fresh = doc.append(doc.root(), Element::new("div")).unwrap();
        assert_ne!(fresh, list);
        assert_ne!(fresh, item);
        assert!(!doc.contains(list));
    }

    #[test]
    fn test_root_cannot_be_removed() {
        let mut doc = Document::new();
        assert!(!doc.remove(doc.root()));
        assert!(doc.contains(doc.root()));
    }

    #[test]
    fn test_ancestors_or_self_walks_to_root() {
        let (doc, list, item) = sample();
        let chain: Vec<_> = doc.ancestors_or_self(item).collect();
        assert_eq!(chain, vec![item, list, doc.root()]);
    }

    #[test]
    fn test_required_flag() {
        let mut input = Element::new("input");
        assert!(!input.is_required());
        input.set_required(true);
        assert!(input.is_required());
        input.set_required(false);
        assert!(!input.is_required());
    }

    #[test]
    fn test_shown_display_depends_on_type() {
        let button = Element::new("input").with_attr("type", "button");
        let div = Element::new("div");
        assert_eq!(Display::shown_for(&button), Display::InlineBlock);
        assert_eq!(Display::shown_for(&div), Display::Block);
    }
}
