mod actions;
mod app_state;
mod conversation;
mod events;
mod notes_panel;
mod notifier;
mod search_panel;
#[cfg(test)]
pub(crate) mod test_support;

pub use actions::*;
pub use app_state::*;
pub use conversation::*;
pub use events::*;
pub use notes_panel::*;
pub use notifier::*;
pub use search_panel::*;
