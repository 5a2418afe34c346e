//! Core domain logic for the terminal client.
//!
//! Models and state machines here know nothing about stdin, stdout or HTTP;
//! network access goes through [`lmnotes_client::NotesApi`].

pub mod models;
pub mod services;
