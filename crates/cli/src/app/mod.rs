//! Application state and the messages that drive it.

mod messages;
mod state;

pub use messages::Message;
pub use state::{UvGui, RUN_START_PREFIX, SELECT_DEPENDENCY_WARNING};
