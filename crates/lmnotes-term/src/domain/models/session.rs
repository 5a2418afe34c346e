use lmnotes_api_types::Source;

use super::Message;

/// The conversation as the client knows it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConversationSession {
    /// Issued by the server on the first successful answer.
    pub session_id: Option<String>,
    pub messages: Vec<Message>,
    pub is_follow_up: bool,
}

/// Q&A view state saved when the user leaves to inspect a cited source.
#[derive(Clone, Debug, PartialEq)]
pub struct NavigationSnapshot {
    pub has_asked: bool,
    pub answer: String,
    pub sources: Vec<Source>,
    pub messages: Vec<Message>,
    pub session_id: Option<String>,
    pub is_follow_up: bool,
}
