//! Speech recognition port
//!
//! A platform recognizer hands back an [`ActiveRecognition`]: the receiving
//! end of the session's event stream plus a stop control. The platform keeps
//! the matching [`RecognitionFeed`]. Dropping the active side signals an
//! abort and closes the stream, so no event is observed after teardown.

use tokio::sync::{mpsc, oneshot};
use tracing::debug;

/// Events emitted by a platform recognition session, in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognitionEvent {
    /// The platform started listening
    Started,
    /// Current hypothesis for the whole utterance
    Transcript { text: String, is_final: bool },
    /// The session failed; an `End` may or may not follow
    Error { code: RecognitionErrorCode },
    /// The session finished
    End,
}

/// Platform error codes, named after the Web Speech API codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognitionErrorCode {
    NoSpeech,
    Aborted,
    AudioCapture,
    Network,
    NotAllowed,
    ServiceNotAllowed,
    LanguageNotSupported,
    Other(String),
}

impl From<&str> for RecognitionErrorCode {
    fn from(code: &str) -> Self {
        match code {
            "no-speech" => Self::NoSpeech,
            "aborted" => Self::Aborted,
            "audio-capture" => Self::AudioCapture,
            "network" => Self::Network,
            "not-allowed" => Self::NotAllowed,
            "service-not-allowed" => Self::ServiceNotAllowed,
            "language-not-supported" => Self::LanguageNotSupported,
            other => Self::Other(other.to_string()),
        }
    }
}

impl std::fmt::Display for RecognitionErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let code = match self {
            Self::NoSpeech => "no-speech",
            Self::Aborted => "aborted",
            Self::AudioCapture => "audio-capture",
            Self::Network => "network",
            Self::NotAllowed => "not-allowed",
            Self::ServiceNotAllowed => "service-not-allowed",
            Self::LanguageNotSupported => "language-not-supported",
            Self::Other(code) => code,
        };
        f.write_str(code)
    }
}

/// Errors surfaced by the capture session manager
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CaptureError {
    #[error("speech recognition is not supported on this device")]
    CapabilityUnavailable,

    #[error("failed to start speech recognition: {0}")]
    StartFailed(String),

    #[error("speech recognition error: {0}")]
    Recognition(RecognitionErrorCode),
}

impl CaptureError {
    /// Code reported in events and logs
    pub fn code(&self) -> String {
        match self {
            CaptureError::CapabilityUnavailable => "unsupported".to_string(),
            CaptureError::StartFailed(_) => "start-failed".to_string(),
            CaptureError::Recognition(code) => code.to_string(),
        }
    }
}

/// Session options handed to the platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecognitionOptions {
    pub language: String,
    pub interim_results: bool,
    /// Keep listening after the first utterance
    pub continuous: bool,
}

impl Default for RecognitionOptions {
    fn default() -> Self {
        Self {
            language: "en-US".to_string(),
            interim_results: true,
            continuous: false,
        }
    }
}

/// How the component asked the platform to stop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopMode {
    /// Finish the utterance and deliver the final transcript
    Graceful,
    /// Tear down immediately; results are discarded
    Abort,
}

/// Component side of a running recognition session
#[derive(Debug)]
pub struct ActiveRecognition {
    events: mpsc::Receiver<RecognitionEvent>,
    control: Option<oneshot::Sender<StopMode>>,
}

impl ActiveRecognition {
    /// Create a connected pair for a new session
    pub fn channel(buffer: usize) -> (Self, RecognitionFeed) {
        let (event_tx, event_rx) = mpsc::channel(buffer);
        let (control_tx, control_rx) = oneshot::channel();
        (
            Self {
                events: event_rx,
                control: Some(control_tx),
            },
            RecognitionFeed {
                events: event_tx,
                control: control_rx,
            },
        )
    }

    /// Next platform event, `None` once the platform side is gone
    pub async fn next_event(&mut self) -> Option<RecognitionEvent> {
        self.events.recv().await
    }

    /// Ask the platform to finish the current utterance
    pub fn stop(&mut self) {
        self.signal(StopMode::Graceful);
    }

    /// Ask the platform to drop the session
    pub fn abort(&mut self) {
        self.signal(StopMode::Abort);
        self.events.close();
    }

    fn signal(&mut self, mode: StopMode) {
        if let Some(control) = self.control.take() {
            debug!(?mode, "signalling recognizer");
            let _ = control.send(mode);
        }
    }
}

impl Drop for ActiveRecognition {
    fn drop(&mut self) {
        self.abort();
    }
}

/// Platform side of a running recognition session
#[derive(Debug)]
pub struct RecognitionFeed {
    events: mpsc::Sender<RecognitionEvent>,
    control: oneshot::Receiver<StopMode>,
}

impl RecognitionFeed {
    /// Deliver an event; `false` once the component has released the session
    pub async fn send(&self, event: RecognitionEvent) -> bool {
        self.events.send(event).await.is_ok()
    }

    /// Deliver an event without waiting for buffer space
    pub fn try_send(&self, event: RecognitionEvent) -> bool {
        self.events.try_send(event).is_ok()
    }

    /// Stop request from the component, if one arrived.
    /// A released session reads as [`StopMode::Abort`].
    pub fn stop_requested(&mut self) -> Option<StopMode> {
        match self.control.try_recv() {
            Ok(mode) => Some(mode),
            Err(oneshot::error::TryRecvError::Empty) => None,
            Err(oneshot::error::TryRecvError::Closed) => Some(StopMode::Abort),
        }
    }

    /// Whether the component side has been dropped or aborted
    pub fn is_released(&self) -> bool {
        self.events.is_closed()
    }
}

/// Platform speech-to-text capability
pub trait SpeechRecognizer: Send + Sync {
    /// Begin a new recognition session
    fn start(&self, options: &RecognitionOptions) -> Result<ActiveRecognition, CaptureError>;
}
