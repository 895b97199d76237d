//! Command interpreter
//!
//! Pure classification of a finalized utterance into a single intent:
//! - navigation (or its denial when the route is private)
//! - explicit search ("search for ...", "find ...")
//! - help
//! - direct lookup of anything else
//!
//! Precedence is data, see [`PRECEDENCE`].

mod commands;
mod rules;

pub use commands::{NavigationCommand, HELP_PHRASES, HELP_TEXT, NAVIGATION_COMMANDS, SEARCH_MARKERS};
pub use rules::{normalize, CommandInterpreter, Intent, Rule, PRECEDENCE};
