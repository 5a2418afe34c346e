//! Terminal client for the lmnotes notes service.
//!
//! The interesting part lives in [`domain::services::ConversationController`]:
//! the multi-turn question-answering session with optimistic updates, server
//! history reconciliation and a return-to-conversation snapshot. The rest of
//! the crate wires it to a line-oriented terminal front end.

pub mod application;
pub mod configuration;
pub mod domain;
pub mod infrastructure;
pub use configuration::{Config, ConfigKey};
pub use domain::models::{Action, Event, Message, Role, StateChange, View};
pub use domain::services::{AppState, AppStateProps, ConversationController, Notifier};
