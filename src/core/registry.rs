//! # Delegated Dispatch
//!
//! One `Dispatcher` per page. Handlers are registered against a selector
//! and an event kind; elements do not need to exist yet. On each native
//! event the dispatcher walks the registrations for that kind in insertion
//! order, finds the nearest ancestor-or-self of the target matching each
//! selector, and runs the first handler that matched. Later registrations
//! are not consulted.
//!
//! Handlers are synchronous. Anything that needs the network is returned as
//! an [`Effect`] and performed by the page runtime afterwards.

use std::fmt;

use log::{debug, warn};

use super::action::Effect;
use super::dom::ElementKey;
use super::event::{Event, EventKind, Target};
use super::selector::{SelectorError, SelectorList};
use super::state::PageState;

/// Why a handler gave up. Logged by the dispatcher; never propagated further.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlerError {
    /// A required element (by id or relation) is not in the document.
    MissingElement(String),
    /// The bound element lacks an attribute the handler reads.
    MissingAttribute { element: String, attribute: String },
}

impl fmt::Display for HandlerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandlerError::MissingElement(what) => write!(f, "missing element: {what}"),
            HandlerError::MissingAttribute { element, attribute } => {
                write!(f, "{element} has no {attribute} attribute")
            }
        }
    }
}

impl std::error::Error for HandlerError {}

/// The element a handler is bound to for one invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Element(ElementKey),
    Window,
}

/// What a handler receives: the matched element (not the original target) and the event.
#[derive(Debug)]
pub struct Trigger<'a> {
    pub bound: Bound,
    pub event: &'a Event,
}

impl Trigger<'_> {
    /// The matched element, for handlers registered against a selector.
    pub fn element(&self) -> Result<ElementKey, HandlerError> {
        match self.bound {
            Bound::Element(key) => Ok(key),
            Bound::Window => Err(HandlerError::MissingElement("bound element".to_string())),
        }
    }
}

pub type HandlerResult = Result<Option<Effect>, HandlerError>;
pub type Handler = Box<dyn Fn(&mut PageState, &Trigger<'_>) -> HandlerResult>;

enum Matcher {
    Selector(SelectorList),
    Window,
}

struct Registration {
    matcher: Matcher,
    kind: EventKind,
    handler: Handler,
}

/// Outcome of dispatching one event.
#[derive(Debug)]
pub enum Dispatch {
    /// No registration matched.
    Unmatched,
    Handled(Option<Effect>),
    /// The handler bailed out; the page is left as the handler found it.
    Failed(HandlerError),
}

impl Dispatch {
    pub fn into_effect(self) -> Option<Effect> {
        match self {
            Dispatch::Handled(effect) => effect,
            Dispatch::Unmatched | Dispatch::Failed(_) => None,
        }
    }
}

#[derive(Default)]
pub struct Dispatcher {
    registrations: Vec<Registration>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F>(&mut self, selector: &str, kind: EventKind, handler: F) -> Result<(), SelectorError>
    where
        F: Fn(&mut PageState, &Trigger<'_>) -> HandlerResult + 'static,
    {
        let selector = SelectorList::parse(selector)?;
        debug!("Registered {} handler for {}", kind, selector);
        self.registrations.push(Registration {
            matcher: Matcher::Selector(selector),
            kind,
            handler: Box::new(handler),
        });
        Ok(())
    }

    /// Registers a window-level listener. Every event of `kind` reaches it.
    pub fn register_window<F>(&mut self, kind: EventKind, handler: F)
    where
        F: Fn(&mut PageState, &Trigger<'_>) -> HandlerResult + 'static,
    {
        debug!("Registered window {} handler", kind);
        self.registrations.push(Registration {
            matcher: Matcher::Window,
            kind,
            handler: Box::new(handler),
        });
    }

    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    pub fn dispatch(&self, state: &mut PageState, event: &Event) -> Dispatch {
        let Some((registration, bound)) = self.find(state, event) else {
            debug!("No {} handler matched {:?}", event.kind, event.target);
            return Dispatch::Unmatched;
        };

        let trigger = Trigger { bound, event };
        match (registration.handler)(state, &trigger) {
            Ok(effect) => Dispatch::Handled(effect),
            Err(e) => {
                warn!("{} handler failed: {}", event.kind, e);
                Dispatch::Failed(e)
            }
        }
    }

    fn find(&self, state: &PageState, event: &Event) -> Option<(&Registration, Bound)> {
        self.registrations
            .iter()
            .filter(|registration| registration.kind == event.kind)
            .find_map(|registration| {
                let bound = match (&registration.matcher, event.target) {
                    (Matcher::Window, _) => Bound::Window,
                    (Matcher::Selector(selector), Target::Element(target)) => {
                        Bound::Element(selector.closest(&state.document, target)?)
                    }
                    (Matcher::Selector(_), Target::Window) => return None,
                };
                Some((registration, bound))
            })
    }
}
