/// Published whenever a piece of client state changes. Renderers subscribe
/// and re-read whatever the change names.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StateChange {
    Messages,
    Answer,
    Session,
    Input,
    Busy,
    View,
    ReturnPoint,
    Notes,
    Draft,
    Search,
    Notice,
}

impl StateChange {
    pub const ALL: [StateChange; 11] = [
        StateChange::Messages,
        StateChange::Answer,
        StateChange::Session,
        StateChange::Input,
        StateChange::Busy,
        StateChange::View,
        StateChange::ReturnPoint,
        StateChange::Notes,
        StateChange::Draft,
        StateChange::Search,
        StateChange::Notice,
    ];
}
