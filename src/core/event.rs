//! Native page events as the dispatcher sees them.

use std::fmt;
use std::str::FromStr;

use super::dom::ElementKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Click,
    Input,
    Change,
    KeyDown,
}

impl EventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::Click => "click",
            EventKind::Input => "input",
            EventKind::Change => "change",
            EventKind::KeyDown => "keydown",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "click" => Ok(EventKind::Click),
            "input" => Ok(EventKind::Input),
            "change" => Ok(EventKind::Change),
            "keydown" => Ok(EventKind::KeyDown),
            other => Err(format!("unknown event kind: {other}")),
        }
    }
}

/// Where the event originated. Key events typed with nothing focused land on the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Element(ElementKey),
    Window,
}

/// A key press, using legacy `which` key codes (`X` is 88).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    pub code: u32,
    pub shift: bool,
}

impl KeyPress {
    /// Parses `shift+x`, `x`, `shift+88`.
    pub fn parse(spec: &str) -> Option<Self> {
        let mut shift = false;
        let mut key = None;
        for part in spec.split('+').map(str::trim) {
            if part.eq_ignore_ascii_case("shift") {
                shift = true;
            } else if let Ok(code) = part.parse::<u32>() {
                key = Some(code);
            } else {
                let mut chars = part.chars();
                match (chars.next(), chars.next()) {
                    (Some(ch), None) if ch.is_ascii_alphanumeric() => {
                        key = Some(ch.to_ascii_uppercase() as u32);
                    }
                    _ => return None,
                }
            }
        }
        key.map(|code| KeyPress { code, shift })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub kind: EventKind,
    pub target: Target,
    pub key: Option<KeyPress>,
}

impl Event {
    pub fn new(kind: EventKind, target: Target) -> Self {
        Self {
            kind,
            target,
            key: None,
        }
    }

    pub fn click(element: ElementKey) -> Self {
        Self::new(EventKind::Click, Target::Element(element))
    }

    pub fn input(element: ElementKey) -> Self {
        Self::new(EventKind::Input, Target::Element(element))
    }

    pub fn change(element: ElementKey) -> Self {
        Self::new(EventKind::Change, Target::Element(element))
    }

    pub fn key_down(target: Target, key: KeyPress) -> Self {
        Self {
            kind: EventKind::KeyDown,
            target,
            key: Some(key),
        }
    }
}
