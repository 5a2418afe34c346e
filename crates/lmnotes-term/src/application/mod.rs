//! Application layer orchestrating the terminal client.
//!
//! This module handles command-line parsing and the interactive loop. It
//! coordinates between the domain logic and infrastructure components.

pub mod cli;
pub mod ui;
