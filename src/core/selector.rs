//! # Selectors
//!
//! The CSS subset the panel binds handlers with:
//!
//! - type, `#id`, `.class`, `[attr]`, `[attr=value]` and `*`
//! - compound selectors (`button.blk`)
//! - descendant (`div.post .expando-btn`) and child (`ul > li`) combinators
//! - selector lists (`button.sub, button.unsub`)
//!
//! Selectors are parsed once at registration; matching is infallible.

use std::fmt;

use super::dom::{Document, ElementKey};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectorError {
    Empty,
    UnexpectedChar { ch: char, pos: usize },
    UnexpectedEnd,
}

impl fmt::Display for SelectorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectorError::Empty => write!(f, "empty selector"),
            SelectorError::UnexpectedChar { ch, pos } => {
                write!(f, "unexpected character {ch:?} at offset {pos}")
            }
            SelectorError::UnexpectedEnd => write!(f, "selector ended unexpectedly"),
        }
    }
}

impl std::error::Error for SelectorError {}

#[derive(Debug, Clone, PartialEq, Eq)]
struct AttrMatch {
    name: String,
    value: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<AttrMatch>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Combinator {
    Descendant,
    Child,
}

/// One comma-separated branch. `parts[0]` is leftmost; its combinator is unused.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Complex {
    parts: Vec<(Combinator, Compound)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorList {
    source: String,
    branches: Vec<Complex>,
}

impl SelectorList {
    pub fn parse(input: &str) -> Result<Self, SelectorError> {
        let branches = Parser::new(input).parse_list()?;
        Ok(Self {
            source: input.trim().to_string(),
            branches,
        })
    }

    /// The selector text as registered.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Whether `key` itself matches any branch.
    pub fn matches(&self, doc: &Document, key: ElementKey) -> bool {
        self.branches
            .iter()
            .any(|branch| branch.matches_at(doc, key, branch.parts.len() - 1))
    }

    /// Nearest ancestor-or-self of `key` that matches.
    pub fn closest(&self, doc: &Document, key: ElementKey) -> Option<ElementKey> {
        doc.ancestors_or_self(key).find(|k| self.matches(doc, *k))
    }
}

impl fmt::Display for SelectorList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl Complex {
    fn matches_at(&self, doc: &Document, key: ElementKey, idx: usize) -> bool {
        let (_, compound) = &self.parts[idx];
        if !compound.matches(doc, key) {
            return false;
        }
        if idx == 0 {
            return true;
        }
        match self.parts[idx].0 {
            Combinator::Child => doc
                .parent(key)
                .is_some_and(|parent| self.matches_at(doc, parent, idx - 1)),
            Combinator::Descendant => doc
                .ancestors_or_self(key)
                .skip(1)
                .any(|ancestor| self.matches_at(doc, ancestor, idx - 1)),
        }
    }
}

impl Compound {
    fn is_empty(&self) -> bool {
        self.tag.is_none() && self.id.is_none() && self.classes.is_empty() && self.attrs.is_empty()
    }

    fn matches(&self, doc: &Document, key: ElementKey) -> bool {
        let Some(element) = doc.get(key) else {
            return false;
        };
        if let Some(tag) = &self.tag {
            if tag != "*" && !element.tag.eq_ignore_ascii_case(tag) {
                return false;
            }
        }
        if let Some(id) = &self.id {
            if element.id.as_deref() != Some(id.as_str()) {
                return false;
            }
        }
        if !self.classes.iter().all(|class| element.has_class(class)) {
            return false;
        }
        self.attrs.iter().all(|attr| match (&attr.value, element.attr(&attr.name)) {
            (_, None) => false,
            (None, Some(_)) => true,
            (Some(expected), Some(actual)) => expected == actual,
        })
    }
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
}

impl Parser {
    fn new(input: &str) -> Self {
        Self {
            chars: input.chars().collect(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek();
        if ch.is_some() {
            self.pos += 1;
        }
        ch
    }

    fn skip_ws(&mut self) -> bool {
        let start = self.pos;
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
        self.pos > start
    }

    fn unexpected(&self) -> SelectorError {
        match self.peek() {
            Some(ch) => SelectorError::UnexpectedChar { ch, pos: self.pos },
            None => SelectorError::UnexpectedEnd,
        }
    }

    fn parse_list(&mut self) -> Result<Vec<Complex>, SelectorError> {
        self.skip_ws();
        if self.peek().is_none() {
            return Err(SelectorError::Empty);
        }
        let mut branches = vec![self.parse_complex()?];
        while self.peek() == Some(',') {
            self.bump();
            self.skip_ws();
            branches.push(self.parse_complex()?);
        }
        match self.peek() {
            None => Ok(branches),
            Some(_) => Err(self.unexpected()),
        }
    }

    fn parse_complex(&mut self) -> Result<Complex, SelectorError> {
        let mut parts = vec![(Combinator::Descendant, self.parse_compound()?)];
        loop {
            let had_ws = self.skip_ws();
            let combinator = match self.peek() {
                Some('>') => {
                    self.bump();
                    self.skip_ws();
                    Combinator::Child
                }
                Some(',') | None => break,
                Some(_) if had_ws => Combinator::Descendant,
                Some(_) => return Err(self.unexpected()),
            };
            parts.push((combinator, self.parse_compound()?));
        }
        Ok(Complex { parts })
    }

    fn parse_compound(&mut self) -> Result<Compound, SelectorError> {
        let mut compound = Compound::default();
        if self.peek() == Some('*') {
            self.bump();
            compound.tag = Some("*".to_string());
        } else if self.peek().is_some_and(is_ident_char) {
            compound.tag = Some(self.parse_ident()?.to_ascii_lowercase());
        }

        loop {
            match self.peek() {
                Some('#') => {
                    self.bump();
                    compound.id = Some(self.parse_ident()?);
                }
                Some('.') => {
                    self.bump();
                    compound.classes.push(self.parse_ident()?);
                }
                Some('[') => {
                    self.bump();
                    compound.attrs.push(self.parse_attr()?);
                }
                _ => break,
            }
        }

        if compound.is_empty() {
            return Err(self.unexpected());
        }
        Ok(compound)
    }

    fn parse_ident(&mut self) -> Result<String, SelectorError> {
        let start = self.pos;
        while self.peek().is_some_and(is_ident_char) {
            self.pos += 1;
        }
        if self.pos == start {
            return Err(self.unexpected());
        }
        Ok(self.chars[start..self.pos].iter().collect())
    }

    fn parse_attr(&mut self) -> Result<AttrMatch, SelectorError> {
        self.skip_ws();
        let name = self.parse_ident()?;
        self.skip_ws();
        let value = match self.peek() {
            Some('=') => {
                self.bump();
                self.skip_ws();
                Some(self.parse_attr_value()?)
            }
            _ => None,
        };
        self.skip_ws();
        match self.bump() {
            Some(']') => Ok(AttrMatch { name, value }),
            Some(ch) => Err(SelectorError::UnexpectedChar {
                ch,
                pos: self.pos - 1,
            }),
            None => Err(SelectorError::UnexpectedEnd),
        }
    }

    fn parse_attr_value(&mut self) -> Result<String, SelectorError> {
        match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                self.bump();
                let start = self.pos;
                while let Some(ch) = self.bump() {
                    if ch == quote {
                        return Ok(self.chars[start..self.pos - 1].iter().collect());
                    }
                }
                Err(SelectorError::UnexpectedEnd)
            }
            _ => self.parse_ident(),
        }
    }
}

fn is_ident_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '-' || ch == '_'
}
