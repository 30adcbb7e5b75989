//! # Panel Runtime
//!
//! Owns the page for its lifetime and runs the event → request → transition
//! loop:
//!
//! ```text
//! Event ──dispatch──▶ handler ──Effect──▶ trigger() ──Pending──▶ settle()
//!                        ▲                   │ Emit                │ Transport::post
//!                        └───────────────────┘                     ▼
//!                                                         interpret() ──▶ PageState::apply
//! ```
//!
//! Dispatch is synchronous and runs to completion; network calls are the
//! only suspension points. Requests settled together are sent concurrently,
//! and nothing stops the same control from being posted twice.

use std::collections::VecDeque;
use std::sync::Arc;

use futures::future::join_all;
use log::{debug, info, warn};

use crate::core::action::{ActionRequest, Effect};
use crate::core::event::Event;
use crate::core::handlers;
use crate::core::outcome::{ResultPolicy, Transition, interpret};
use crate::core::registry::Dispatcher;
use crate::core::selector::SelectorError;
use crate::core::state::PageState;
use crate::transport::{Transport, TransportError};

/// Upper bound on events handled for one native event, synthesized ones included.
const MAX_EVENTS_PER_TRIGGER: usize = 256;

/// A request produced by a handler and not yet sent.
#[derive(Debug, Clone, PartialEq)]
pub struct Pending {
    pub request: ActionRequest,
    pub policy: ResultPolicy,
}

/// What became of one request.
#[derive(Debug, Clone, PartialEq)]
pub enum Settled {
    Transitioned { path: String, transition: Transition },
    /// The server answered with a status other than `ok`. Nothing changes.
    Rejected { path: String, status: String },
    Failed { path: String, error: TransportError },
}

pub struct Panel {
    state: PageState,
    dispatcher: Dispatcher,
    transport: Arc<dyn Transport>,
}

impl Panel {
    pub fn new(state: PageState, dispatcher: Dispatcher, transport: Arc<dyn Transport>) -> Self {
        Self {
            state,
            dispatcher,
            transport,
        }
    }

    /// A panel with every moderation binding registered.
    pub fn moderation(state: PageState, prefix: &str, transport: Arc<dyn Transport>) -> Result<Self, SelectorError> {
        let mut dispatcher = Dispatcher::new();
        handlers::register_all(&mut dispatcher, prefix)?;
        info!(
            "Panel ready: {} bindings, transport={}",
            dispatcher.len(),
            transport.name()
        );
        Ok(Self::new(state, dispatcher, transport))
    }

    pub fn state(&self) -> &PageState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut PageState {
        &mut self.state
    }

    pub fn dispatcher_mut(&mut self) -> &mut Dispatcher {
        &mut self.dispatcher
    }

    /// Dispatches `event` and any events its handlers synthesize.
    /// Returns the requests to send; the page has already been patched locally.
    pub fn trigger(&mut self, event: Event) -> Vec<Pending> {
        let mut queue = VecDeque::from([event]);
        let mut pending = Vec::new();
        let mut handled = 0usize;

        while let Some(event) = queue.pop_front() {
            if handled == MAX_EVENTS_PER_TRIGGER {
                warn!("Dropping {} synthesized events past the limit", queue.len() + 1);
                break;
            }
            handled += 1;

            match self.dispatcher.dispatch(&mut self.state, &event).into_effect() {
                Some(Effect::Post { request, policy }) => {
                    debug!("Pending POST {}", request.path);
                    pending.push(Pending { request, policy });
                }
                Some(Effect::Emit(events)) => queue.extend(events),
                None => {}
            }
        }
        pending
    }

    /// Sends the requests and applies one transition per accepted result.
    pub async fn settle(&mut self, pending: Vec<Pending>) -> Vec<Settled> {
        if pending.is_empty() {
            return Vec::new();
        }
        let transport = Arc::clone(&self.transport);
        let results = join_all(pending.iter().map(|p| transport.post(&p.request))).await;

        pending
            .into_iter()
            .zip(results)
            .map(|(Pending { request, policy }, result)| match result {
                Ok(result) => match interpret(&policy, &result) {
                    Some(transition) => {
                        self.state.apply(&transition);
                        Settled::Transitioned {
                            path: request.path,
                            transition,
                        }
                    }
                    None => {
                        info!("{} rejected with status {:?}", request.path, result.status);
                        Settled::Rejected {
                            path: request.path,
                            status: result.status,
                        }
                    }
                },
                Err(error) => {
                    warn!("{} failed: {}", request.path, error);
                    Settled::Failed {
                        path: request.path,
                        error,
                    }
                }
            })
            .collect()
    }

    /// `trigger` followed by `settle`.
    pub async fn fire(&mut self, event: Event) -> Vec<Settled> {
        let pending = self.trigger(event);
        self.settle(pending).await
    }
}
