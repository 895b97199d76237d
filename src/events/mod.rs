//! Events module for the search component
//!
//! Structured events broadcast to the view layer so it can mirror the
//! capture status, the live search field and the hint placeholder.

use serde::{Deserialize, Serialize};

/// Events emitted by the search component as its transient state changes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SearchEvent {
    /// A recognition stream started listening
    CaptureStarted {
        /// Monotonic id of the capture session
        session: u64,
    },

    /// The recognition stream ended naturally
    CaptureEnded {
        session: u64,
        /// Duration in milliseconds the session was listening
        duration_ms: u64,
    },

    /// The recognition stream failed or could not start
    CaptureFailed {
        session: u64,
        /// Platform error code, e.g. `no-speech`
        code: String,
    },

    /// The visible search text changed (typing or live transcript)
    SearchTextChanged { text: String },

    /// The rotating hint moved to a new entry
    HintChanged { index: usize, text: String },

    /// An utterance was classified and acted upon
    CommandHandled {
        utterance: String,
        /// Short outcome label, e.g. `navigated`
        outcome: String,
    },
}

impl std::fmt::Display for SearchEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchEvent::CaptureStarted { session } => {
                write!(f, "CAPTURE_STARTED (#{})", session)
            }
            SearchEvent::CaptureEnded {
                session,
                duration_ms,
            } => write!(f, "CAPTURE_ENDED (#{}, {}ms)", session, duration_ms),
            SearchEvent::CaptureFailed { session, code } => {
                write!(f, "CAPTURE_FAILED (#{}, {})", session, code)
            }
            SearchEvent::SearchTextChanged { text } => {
                write!(f, "SEARCH_TEXT_CHANGED ({:?})", text)
            }
            SearchEvent::HintChanged { index, .. } => write!(f, "HINT_CHANGED ({})", index),
            SearchEvent::CommandHandled { outcome, .. } => {
                write!(f, "COMMAND_HANDLED ({})", outcome)
            }
        }
    }
}
