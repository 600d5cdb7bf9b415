//! Terminal rendering of the application state.

mod panel;

pub use panel::{render_numbered, TerminalPanel};
