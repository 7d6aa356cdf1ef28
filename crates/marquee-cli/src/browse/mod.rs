//! Browsing front end state.
//!
//! Holds the home rows and the in-memory session (simulated login,
//! my list, search and trailer view). Nothing here is persisted.

/// Interactive command parsing.
pub mod command;
/// Session and row state types.
pub mod state;

pub use command::{BrowseCommand, HELP};
pub use state::{BrowseSession, HomeRows, Section};
