//! Configuration management for the terminal client.
//!
//! Values come from built-in defaults, an optional `config.toml` and command
//! line flags, in that order of precedence.

mod config;

pub use config::*;
