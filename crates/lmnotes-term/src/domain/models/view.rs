use strum_macros::Display;

/// The panel currently in front of the user.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum View {
    #[default]
    Editor,
    Search,
    Conversation,
}
