mod action;
mod change;
mod error;
mod event;
mod message;
mod note;
mod notice;
mod session;
mod slash_command;
mod view;

pub use action::*;
pub use change::*;
pub use error::*;
pub use event::*;
pub use message::*;
pub use note::*;
pub use notice::*;
pub use session::*;
pub use slash_command::*;
pub use view::*;
