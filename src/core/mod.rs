//! # Core Panel Logic
//!
//! This module contains the moderation panel's page logic.
//! It performs no I/O: handlers patch the page and describe network work
//! as effects.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • Dispatcher (events)  │
//!                    │  • PageState (page)     │
//!                    │  • Effect (requests)    │
//!                    │                         │
//!                    │  No I/O. Synchronous.   │
//!                    └───────────┬─────────────┘
//!                                │
//!            ┌───────────────────┼───────────────────┐
//!            ▼                   ▼                   ▼
//!     ┌────────────┐      ┌────────────┐      ┌────────────┐
//!     │   Panel    │      │ Transport  │      │  Fixture   │
//!     │  runtime   │      │ (reqwest)  │      │  (toml)    │
//!     └────────────┘      └────────────┘      └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`dom`], [`selector`], [`event`]: the page and how events address it
//! - [`registry`]: delegated dispatch
//! - [`confirm`], [`toggle`], [`ban`], [`expand`]: page-local behaviour
//! - [`action`], [`outcome`]: building requests and reading results
//! - [`handlers`]: the panel's bindings

pub mod action;
pub mod ban;
pub mod config;
pub mod confirm;
pub mod dom;
pub mod event;
pub mod expand;
pub mod handlers;
pub mod outcome;
pub mod registry;
pub mod selector;
pub mod state;
pub mod toggle;
