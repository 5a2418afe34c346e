//! Wire types for the lmnotes notes API.
//!
//! These mirror the JSON bodies exchanged with the `/api/v1/notes` service:
//! note CRUD, similarity search and the conversational ask endpoint. They are
//! kept free of any HTTP client so that both the client crate and test doubles
//! can share them.
//!
//! ## Example
//!
//! ```rust
//! use lmnotes_api_types::AskRequest;
//!
//! let request = AskRequest::new("What is X?".to_string(), None);
//! let json = serde_json::to_value(&request).unwrap();
//!
//! assert_eq!(json["session_id"], serde_json::Value::Null);
//! ```

pub mod ask;
pub mod error;
pub mod notes;

pub use ask::*;
pub use error::*;
pub use notes::*;
