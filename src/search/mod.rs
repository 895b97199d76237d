//! The search component
//!
//! Owns the live search text, the capture session and the hint rotator,
//! and routes every finalized utterance through the interpreter, resolver
//! and navigation gate.

mod component;

pub use component::{CaptureProgress, CommandOutcome, SearchPorts, SmartSearch};
