#[cfg(test)]
#[path = "slash_command_test.rs"]
mod tests;

/// Commands typed at the prompt. Anything not starting with `/` is a question.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SlashCommand {
    NewConversation,
    Conversation,
    Source(usize),
    Back,
    Notes,
    Open(NoteSelector),
    Draft,
    Title(String),
    Body(String),
    Save,
    Delete,
    Search(String),
    Result(usize),
    Help,
    Quit,
    Invalid(String),
}

/// `/open` accepts a position in the note list or a note id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NoteSelector {
    Position(usize),
    Id(String),
}

fn position(command: &str, arg: &str) -> Result<usize, String> {
    match arg.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(format!("{command} expects a number starting at 1")),
    }
}

impl SlashCommand {
    pub fn parse(text: &str) -> Option<SlashCommand> {
        let text = text.trim();
        if !text.starts_with('/') {
            return None;
        }

        let (name, arg) = match text.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (text, ""),
        };

        let command = match name {
            "/new" | "/n" => SlashCommand::NewConversation,
            "/ask" => SlashCommand::Conversation,
            "/back" | "/b" => SlashCommand::Back,
            "/notes" | "/ls" => SlashCommand::Notes,
            "/draft" => SlashCommand::Draft,
            "/save" | "/s" => SlashCommand::Save,
            "/delete" | "/rm" => SlashCommand::Delete,
            "/help" | "/h" => SlashCommand::Help,
            "/quit" | "/exit" | "/q" => SlashCommand::Quit,
            "/title" => SlashCommand::Title(arg.to_string()),
            "/body" => SlashCommand::Body(arg.to_string()),
            "/source" => match position("/source", arg) {
                Ok(n) => SlashCommand::Source(n),
                Err(msg) => SlashCommand::Invalid(msg),
            },
            "/result" => match position("/result", arg) {
                Ok(n) => SlashCommand::Result(n),
                Err(msg) => SlashCommand::Invalid(msg),
            },
            "/open" | "/o" => {
                if arg.is_empty() {
                    SlashCommand::Invalid("/open expects a list number or a note id".to_string())
                } else if let Ok(n) = arg.parse::<usize>() {
                    match n {
                        0 => SlashCommand::Invalid(
                            "/open expects a number starting at 1".to_string(),
                        ),
                        n => SlashCommand::Open(NoteSelector::Position(n)),
                    }
                } else {
                    SlashCommand::Open(NoteSelector::Id(arg.to_string()))
                }
            }
            "/search" | "/find" => SlashCommand::Search(arg.to_string()),
            other => SlashCommand::Invalid(format!("Unknown command {other}, try /help")),
        };

        Some(command)
    }
}

pub fn help_text() -> String {
    let text = r#"
Type a question and press enter to ask your notes.

CONVERSATION:
- /new (/n) - Start a new conversation.
- /ask - Show the conversation.
- /source [N] - Open cited source N of the last answer in the editor.
- /back (/b) - Return to the conversation after opening a source.

NOTES:
- /notes (/ls) - Reload and list notes, newest first.
- /open (/o) [N|ID] - Open note N of the list, or the note with the given id.
- /draft - Start a new, empty note.
- /title [TEXT] - Set the title of the note being edited.
- /body [TEXT] - Set the body of the note being edited.
- /save (/s) - Create or update the note being edited.
- /delete (/rm) - Delete the note being edited.

SEARCH:
- /search (/find) [QUERY] - Similarity search over notes.
- /result [N] - Open search result N in the editor.

- /help (/h) - This help.
- /quit /exit (/q) - Exit.
"#;

    text.trim().to_string()
}
