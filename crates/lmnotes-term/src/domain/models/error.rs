use thiserror::Error;

/// Rejections from the conversation controller. None of them change state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConversationError {
    #[error("Please enter a question")]
    EmptyQuestion,
    #[error("A question is already being answered")]
    AskInFlight,
    #[error("There is no conversation to return to")]
    NothingToReturnTo,
    #[error("No cited source number {0}")]
    UnknownSource(usize),
}

/// Local validation failures of the note and search panels.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PanelError {
    #[error("Title cannot be empty")]
    EmptyTitle,
    #[error("No note selected")]
    NoNoteSelected,
    #[error("Please enter a search query")]
    EmptyQuery,
    #[error("No note number {0}")]
    UnknownNote(usize),
    #[error("No search result number {0}")]
    UnknownResult(usize),
    #[error("{0} already in progress")]
    Busy(&'static str),
}
