//! # Moderation Actions
//!
//! Every moderation control becomes an `ActionDescriptor`: a verb plus the
//! identifiers read from the control's `data-*` attributes, in the order the
//! endpoint expects them. Descriptors are built synchronously while the
//! event is being handled, so nothing read from the page crosses an await.
//!
//! ```text
//! element ──describe()──▶ ActionDescriptor ──request()──▶ ActionRequest
//!                           verb + args                    /do/verb/a/b
//! ```
//!
//! Handlers hand the request back as an [`Effect`]; the page runtime sends
//! it and interprets the result with the attached [`ResultPolicy`].

use std::collections::BTreeMap;

use serde::Serialize;

use super::dom::{Document, ElementKey};
use super::event::Event;
use super::outcome::ResultPolicy;
use super::registry::HandlerError;

pub const DEFAULT_ACTION_PREFIX: &str = "/do";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionDescriptor {
    pub verb: String,
    pub args: Vec<String>,
}

impl ActionDescriptor {
    /// `{prefix}/{verb}/{arg}/...`
    pub fn path(&self, prefix: &str) -> String {
        let mut path = format!("{}/{}", prefix.trim_end_matches('/'), self.verb);
        for arg in &self.args {
            path.push('/');
            path.push_str(arg);
        }
        path
    }

    pub fn request(&self, prefix: &str) -> ActionRequest {
        ActionRequest {
            path: self.path(prefix),
            payload: BTreeMap::new(),
        }
    }
}

/// A mutation ready to send. Owns its data; holds no page references.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ActionRequest {
    pub path: String,
    pub payload: BTreeMap<String, String>,
}

/// The moderation verbs the panel knows how to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModAction {
    /// Withdraw a pending moderator invitation.
    RevokeModInvite,
    AcceptModInvite,
    RefuseModInvite,
    /// Remove a moderator, possibly oneself.
    RemoveMod,
    /// Lift a community ban.
    RemoveSubBan,
    /// Block, unblock, subscribe or unsubscribe. The verb comes from the page.
    Subscription,
}

impl ModAction {
    /// The fixed verb, if this action has one.
    pub fn verb(self) -> Option<&'static str> {
        match self {
            ModAction::RevokeModInvite => Some("revoke_mod2inv"),
            ModAction::AcceptModInvite => Some("accept_modinv"),
            ModAction::RefuseModInvite => Some("refuse_mod2inv"),
            ModAction::RemoveMod => Some("remove_mod2"),
            ModAction::RemoveSubBan => Some("remove_sub_ban"),
            ModAction::Subscription => None,
        }
    }

    /// Builds the descriptor from the bound element's attributes.
    pub fn describe(self, doc: &Document, element: ElementKey) -> Result<ActionDescriptor, HandlerError> {
        let (verb, args) = match self {
            ModAction::RefuseModInvite => (self.fixed_verb(), vec![required_data(doc, element, "sub")?]),
            ModAction::Subscription => {
                let verb = required_data(doc, element, "ac")?;
                let parent = doc
                    .parent(element)
                    .ok_or_else(|| HandlerError::MissingElement("subscription row".to_string()))?;
                (verb, vec![required_data(doc, parent, "sid")?])
            }
            _ => (
                self.fixed_verb(),
                vec![
                    required_data(doc, element, "sub")?,
                    required_data(doc, element, "user")?,
                ],
            ),
        };
        Ok(ActionDescriptor { verb, args })
    }

    /// How a successful result is turned into a page transition.
    pub fn policy(self, doc: &Document, element: ElementKey) -> Result<ResultPolicy, HandlerError> {
        match self {
            ModAction::RemoveMod => Ok(ResultPolicy::ResignRedirect {
                sub: required_data(doc, element, "sub")?,
            }),
            _ => Ok(ResultPolicy::Reload),
        }
    }

    fn fixed_verb(self) -> String {
        self.verb().unwrap_or_default().to_string()
    }
}

fn required_data(doc: &Document, element: ElementKey, name: &str) -> Result<String, HandlerError> {
    doc.data(element, name)
        .map(str::to_string)
        .ok_or_else(|| HandlerError::MissingAttribute {
            element: describe_element(doc, element),
            attribute: format!("data-{name}"),
        })
}

fn describe_element(doc: &Document, element: ElementKey) -> String {
    match doc.get(element) {
        Some(e) => match (&e.id, e.classes.first()) {
            (Some(id), _) => format!("{}#{}", e.tag, id),
            (None, Some(class)) => format!("{}.{}", e.tag, class),
            (None, None) => e.tag.clone(),
        },
        None => "detached element".to_string(),
    }
}

/// Work a handler asks the page runtime to do once it returns.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Send the request and apply the policy to its result.
    Post {
        request: ActionRequest,
        policy: ResultPolicy,
    },
    /// Dispatch these events next, as if the user had produced them.
    Emit(Vec<Event>),
}

impl Effect {
    pub fn post(action: ModAction, doc: &Document, element: ElementKey, prefix: &str) -> Result<Self, HandlerError> {
        let descriptor = action.describe(doc, element)?;
        Ok(Effect::Post {
            request: descriptor.request(prefix),
            policy: action.policy(doc, element)?,
        })
    }
}
