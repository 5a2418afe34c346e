//! Infrastructure layer providing external integrations.
//!
//! This module builds the notes service client from the loaded configuration.

pub mod clients;
