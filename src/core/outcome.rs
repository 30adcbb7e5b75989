//! # Results and Transitions
//!
//! The server answers every moderation request with a small JSON object.
//! Only `status` is guaranteed; anything else is action-specific.
//!
//! | result                              | policy          | transition        |
//! |-------------------------------------|-----------------|-------------------|
//! | `status == "ok"`                    | any             | reload            |
//! | `status == "ok"`, `resign` falsy    | resign-redirect | reload            |
//! | `status == "ok"`, `resign` truthy   | resign-redirect | navigate `/s/sub` |
//! | `status != "ok"`                    | any             | none              |

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const STATUS_OK: &str = "ok";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ActionResult {
    pub status: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ActionResult {
    pub fn ok() -> Self {
        Self::with_status(STATUS_OK)
    }

    pub fn with_status(status: &str) -> Self {
        Self {
            status: status.to_string(),
            extra: Map::new(),
        }
    }

    pub fn with_extra(mut self, name: &str, value: Value) -> Self {
        self.extra.insert(name.to_string(), value);
        self
    }

    pub fn is_ok(&self) -> bool {
        self.status == STATUS_OK
    }

    /// Truthiness of an extra field, the way the page script tests it.
    /// Absent, `null`, `false`, `0` and `""` are all false.
    pub fn flag(&self, name: &str) -> bool {
        match self.extra.get(name) {
            None | Some(Value::Null) => false,
            Some(Value::Bool(b)) => *b,
            Some(Value::Number(n)) => n.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
            Some(Value::String(s)) => !s.is_empty(),
            Some(Value::Array(_)) | Some(Value::Object(_)) => true,
        }
    }
}

/// How an action reads a successful result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultPolicy {
    /// Reload on success.
    Reload,
    /// Reload on success, unless the caller removed themselves
    /// (`resign`), in which case go to the community page.
    ResignRedirect { sub: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    Reload,
    Navigate(String),
}

/// Path of a community's front page.
pub fn community_path(sub: &str) -> String {
    format!("/s/{sub}")
}

/// Decides the next page state. Every ok result yields exactly one transition.
pub fn interpret(policy: &ResultPolicy, result: &ActionResult) -> Option<Transition> {
    if !result.is_ok() {
        return None;
    }
    match policy {
        ResultPolicy::Reload => Some(Transition::Reload),
        ResultPolicy::ResignRedirect { sub } => {
            if result.flag("resign") {
                Some(Transition::Navigate(community_path(sub)))
            } else {
                Some(Transition::Reload)
            }
        }
    }
}
