//! Capture session state machine
//!
//! Owns at most one recognition stream. Transitions:
//! - Idle/Error -> Listening on `start`
//! - Listening -> Finalizing on graceful `stop`
//! - Listening/Finalizing -> Idle on natural end
//! - Listening/Finalizing -> Error on a platform error

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use super::recognizer::{
    ActiveRecognition, CaptureError, RecognitionEvent, RecognitionOptions, SpeechRecognizer,
};

/// Observable status of the capture affordance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaptureStatus {
    #[default]
    Idle,
    Listening,
    Finalizing,
    Error,
}

impl std::fmt::Display for CaptureStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CaptureStatus::Idle => write!(f, "Idle"),
            CaptureStatus::Listening => write!(f, "Listening"),
            CaptureStatus::Finalizing => write!(f, "Finalizing"),
            CaptureStatus::Error => write!(f, "Error"),
        }
    }
}

/// Transient state of the current (or last) session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaptureSession {
    pub id: u64,
    pub status: CaptureStatus,
    /// Latest full hypothesis
    pub accumulated_transcript: String,
    /// Latest hypothesis not yet marked final
    pub interim_transcript: String,
}

impl CaptureSession {
    fn clear_transcripts(&mut self) {
        self.accumulated_transcript.clear();
        self.interim_transcript.clear();
    }
}

/// What a processed recognition event means for the component
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureUpdate {
    /// Hypothesis changed; mirror it into the search field
    Interim { session: u64, text: String },
    /// Session ended; `transcript` is the utterance, if one was heard
    Finalized {
        session: u64,
        transcript: Option<String>,
        duration_ms: u64,
    },
    /// Session failed
    Failed { session: u64, error: CaptureError },
}

/// Capture session manager
pub struct CaptureManager {
    recognizer: Option<Arc<dyn SpeechRecognizer>>,
    options: RecognitionOptions,
    session: CaptureSession,
    active: Option<ActiveRecognition>,
    started_at: Option<Instant>,
    next_id: u64,
}

impl CaptureManager {
    /// `recognizer` is `None` when the platform has no speech support;
    /// capture then stays unavailable for the manager's lifetime.
    pub fn new(recognizer: Option<Arc<dyn SpeechRecognizer>>, options: RecognitionOptions) -> Self {
        if recognizer.is_none() {
            warn!("speech recognition unavailable, text input only");
        }
        Self {
            recognizer,
            options,
            session: CaptureSession::default(),
            active: None,
            started_at: None,
            next_id: 1,
        }
    }

    pub fn is_supported(&self) -> bool {
        self.recognizer.is_some()
    }

    pub fn status(&self) -> CaptureStatus {
        self.session.status
    }

    pub fn session(&self) -> &CaptureSession {
        &self.session
    }

    /// Whether a recognition stream is open
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Start a new session, replacing any open one. Returns the session id.
    pub fn start(&mut self) -> Result<u64, CaptureError> {
        let recognizer = self
            .recognizer
            .clone()
            .ok_or(CaptureError::CapabilityUnavailable)?;

        if self.active.is_some() {
            info!(session = self.session.id, "replacing active capture session");
            self.release();
        }

        let id = self.next_id;
        self.next_id += 1;
        self.session = CaptureSession {
            id,
            ..CaptureSession::default()
        };

        match recognizer.start(&self.options) {
            Ok(active) => {
                self.active = Some(active);
                self.started_at = Some(Instant::now());
                self.transition_to(CaptureStatus::Listening);
                Ok(id)
            }
            Err(e) => {
                warn!(session = id, error = %e, "recognizer refused to start");
                self.transition_to(CaptureStatus::Error);
                Err(e)
            }
        }
    }

    /// Ask the platform to finish; the final transcript still arrives
    pub fn stop(&mut self) {
        if let Some(active) = self.active.as_mut() {
            active.stop();
            self.transition_to(CaptureStatus::Finalizing);
        }
    }

    /// Drop the open session without interpreting anything
    pub fn cancel(&mut self) {
        if self.active.is_some() {
            info!(session = self.session.id, "capture session cancelled");
            self.release();
            self.session.clear_transcripts();
            self.transition_to(CaptureStatus::Idle);
        }
    }

    /// Wait for the next meaningful event of the open session.
    /// Returns `None` immediately when no session is open.
    pub async fn next_update(&mut self) -> Option<CaptureUpdate> {
        loop {
            let active = self.active.as_mut()?;
            let event = active.next_event().await;
            let session = self.session.id;

            match event {
                Some(RecognitionEvent::Started) => {
                    debug!(session, "recognizer listening");
                }
                Some(RecognitionEvent::Transcript { text, is_final }) => {
                    self.session.accumulated_transcript = text.clone();
                    if is_final {
                        self.session.interim_transcript.clear();
                    } else {
                        self.session.interim_transcript = text.clone();
                    }
                    return Some(CaptureUpdate::Interim { session, text });
                }
                Some(RecognitionEvent::Error { code }) => {
                    warn!(session, %code, "speech recognition error");
                    self.release();
                    self.session.clear_transcripts();
                    self.transition_to(CaptureStatus::Error);
                    return Some(CaptureUpdate::Failed {
                        session,
                        error: CaptureError::Recognition(code),
                    });
                }
                Some(RecognitionEvent::End) | None => {
                    let duration_ms = self.elapsed_ms();
                    let transcript = std::mem::take(&mut self.session.accumulated_transcript);
                    let transcript = Some(transcript.trim().to_string()).filter(|t| !t.is_empty());
                    self.release();
                    self.session.clear_transcripts();
                    self.transition_to(CaptureStatus::Idle);
                    return Some(CaptureUpdate::Finalized {
                        session,
                        transcript,
                        duration_ms,
                    });
                }
            }
        }
    }

    fn release(&mut self) {
        // Dropping the stream aborts the platform session
        self.active = None;
        self.started_at = None;
    }

    fn elapsed_ms(&self) -> u64 {
        self.started_at
            .map(|t| t.elapsed().as_millis() as u64)
            .unwrap_or(0)
    }

    fn transition_to(&mut self, new_status: CaptureStatus) {
        let old_status = self.session.status;
        if old_status == new_status {
            return;
        }
        info!(
            session = self.session.id,
            from = %old_status,
            to = %new_status,
            "capture transition"
        );
        self.session.status = new_status;
    }
}
