//! Capture module for speech-to-text sessions
//!
//! The platform recognizer is injected as a [`SpeechRecognizer`]; the
//! [`CaptureManager`] keeps at most one stream of it open at a time.

mod recognizer;
mod session;

pub use recognizer::{
    ActiveRecognition, CaptureError, RecognitionErrorCode, RecognitionEvent, RecognitionFeed,
    RecognitionOptions, SpeechRecognizer, StopMode,
};
pub use session::{CaptureManager, CaptureSession, CaptureStatus, CaptureUpdate};
