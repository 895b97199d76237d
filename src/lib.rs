//! book-voice-search: voice and text command interpreter for the book
//! catalog storefront
//!
//! Turns a spoken or typed utterance into one action:
//! - site navigation, gated by the signed-in state
//! - a book lookup that opens the matching title or a filtered listing
//! - the command listing
//!
//! Scope:
//! - Capture session lifecycle over an injected speech recognizer
//! - Rotating example hints for the search placeholder
//! - Explicit, ordered command classification
//! - NO catalog mutation, auth protocol or view rendering

pub mod capture;
pub mod catalog;
pub mod config;
pub mod events;
pub mod hints;
pub mod interpreter;
pub mod lifecycle;
pub mod navigation;
pub mod notify;
pub mod search;

#[cfg(test)]
mod testing;

pub use config::Config;
pub use search::{CaptureProgress, CommandOutcome, SearchPorts, SmartSearch};
