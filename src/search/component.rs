//! SmartSearch component implementation

use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::{debug, info};

use crate::capture::{
    CaptureError, CaptureManager, CaptureStatus, CaptureUpdate, RecognitionOptions, SpeechRecognizer,
};
use crate::catalog::{BookResolver, Catalog};
use crate::config::Config;
use crate::events::SearchEvent;
use crate::hints::{HintRotator, HintState, SEARCH_HINTS};
use crate::interpreter::{CommandInterpreter, Intent, HELP_TEXT, NAVIGATION_COMMANDS};
use crate::navigation::{AuthState, NavigationGate, Navigator, RouteTable};
use crate::notify::{Notice, Notifier, HELP_AUTO_CLOSE};

const SIGN_IN_REQUIRED: &str = "Please log in to access this page";

/// External collaborators of the component
pub struct SearchPorts {
    pub catalog: Arc<dyn Catalog>,
    pub navigator: Arc<dyn Navigator>,
    pub auth: Arc<dyn AuthState>,
    pub notifier: Arc<dyn Notifier>,
    /// `None` when the platform cannot capture speech
    pub recognizer: Option<Arc<dyn SpeechRecognizer>>,
}

/// What handling one utterance did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    Navigated { path: String },
    Denied { path: String },
    Help,
    Unrecognized { utterance: String },
    /// Nothing to act on; no notification was raised
    Discarded,
}

impl CommandOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            CommandOutcome::Navigated { .. } => "navigated",
            CommandOutcome::Denied { .. } => "denied",
            CommandOutcome::Help => "help",
            CommandOutcome::Unrecognized { .. } => "unrecognized",
            CommandOutcome::Discarded => "discarded",
        }
    }
}

/// Result of processing one capture update
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureProgress {
    /// Live transcript, already mirrored into the search text
    Interim(String),
    /// Session finalized and its transcript was interpreted
    Handled(CommandOutcome),
    /// Session ended without any speech
    Silent,
    Failed(CaptureError),
}

/// Voice and text search box
///
/// Build it inside a tokio runtime so the hint timer can be spawned. Built
/// elsewhere, every method still works but the placeholder stays on the
/// first hint.
pub struct SmartSearch {
    interpreter: CommandInterpreter,
    resolver: BookResolver,
    gate: NavigationGate,
    capture: CaptureManager,
    hints: HintRotator,
    auth: Arc<dyn AuthState>,
    notifier: Arc<dyn Notifier>,
    event_tx: broadcast::Sender<SearchEvent>,
    search_text: String,
}

impl SmartSearch {
    pub fn new(ports: SearchPorts, config: &Config, event_tx: broadcast::Sender<SearchEvent>) -> Self {
        let routes = RouteTable::default();
        let options = RecognitionOptions {
            language: config.language.clone(),
            ..RecognitionOptions::default()
        };

        Self {
            interpreter: CommandInterpreter::new(NAVIGATION_COMMANDS, routes),
            resolver: BookResolver::new(ports.catalog, config.lookup_timeout),
            gate: NavigationGate::new(routes, Arc::clone(&ports.auth), ports.navigator),
            capture: CaptureManager::new(ports.recognizer, options),
            hints: HintRotator::new(SEARCH_HINTS, config.hint_interval).with_events(event_tx.clone()),
            auth: ports.auth,
            notifier: ports.notifier,
            event_tx,
            search_text: String::new(),
        }
    }

    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    /// Placeholder text: the current hint
    pub fn placeholder(&self) -> &'static str {
        self.hints.current()
    }

    pub fn hint_state(&self) -> HintState {
        self.hints.state()
    }

    pub fn capture_status(&self) -> CaptureStatus {
        self.capture.status()
    }

    pub fn voice_supported(&self) -> bool {
        self.capture.is_supported()
    }

    pub fn is_listening(&self) -> bool {
        self.capture.is_active()
    }

    pub fn focus(&mut self) {
        self.hints.show();
    }

    pub fn blur(&mut self) {
        self.hints.hide();
    }

    /// Pointer entered or left the capture button
    pub fn hover(&mut self, hovering: bool) {
        if hovering {
            self.hints.show();
        } else {
            self.hints.hide();
        }
    }

    /// Typing into the search field
    pub fn set_search_text(&mut self, text: &str) {
        if self.search_text != text {
            self.search_text = text.to_string();
            self.emit(SearchEvent::SearchTextChanged {
                text: self.search_text.clone(),
            });
        }
    }

    pub fn clear_search(&mut self) {
        self.set_search_text("");
    }

    /// Submit the typed text. Blank input is ignored.
    pub async fn submit(&mut self) -> Option<CommandOutcome> {
        let utterance = self.search_text.trim().to_string();
        if utterance.is_empty() {
            return None;
        }
        Some(self.handle_command(&utterance).await)
    }

    /// Start listening, replacing a session that is already open
    pub fn start_capture(&mut self) -> Result<u64, CaptureError> {
        match self.capture.start() {
            Ok(session) => {
                self.set_search_text("");
                self.hints.show();
                self.emit(SearchEvent::CaptureStarted { session });
                Ok(session)
            }
            Err(CaptureError::CapabilityUnavailable) => {
                self.notifier.notify(Notice::error(
                    "Speech recognition is not supported on this device",
                ));
                Err(CaptureError::CapabilityUnavailable)
            }
            Err(error) => {
                self.report_capture_failure(&error);
                Err(error)
            }
        }
    }

    /// Finish the current utterance early; its transcript is still handled
    pub fn stop_capture(&mut self) {
        self.capture.stop();
    }

    /// Process the next event of the open capture session.
    /// Returns `None` when nothing is being captured.
    pub async fn next_capture_update(&mut self) -> Option<CaptureProgress> {
        let update = self.capture.next_update().await?;

        let progress = match update {
            CaptureUpdate::Interim { text, .. } => {
                self.set_search_text(&text);
                CaptureProgress::Interim(text)
            }
            CaptureUpdate::Finalized {
                session,
                transcript,
                duration_ms,
            } => {
                self.emit(SearchEvent::CaptureEnded {
                    session,
                    duration_ms,
                });
                self.hints.hide();
                match transcript {
                    Some(transcript) => CaptureProgress::Handled(self.handle_command(&transcript).await),
                    None => {
                        debug!(session, "capture ended without speech");
                        CaptureProgress::Silent
                    }
                }
            }
            CaptureUpdate::Failed { error, .. } => {
                self.report_capture_failure(&error);
                CaptureProgress::Failed(error)
            }
        };

        Some(progress)
    }

    /// Drive the open session until it ends or fails
    pub async fn run_capture(&mut self) -> Option<CaptureProgress> {
        while let Some(progress) = self.next_capture_update().await {
            if !matches!(progress, CaptureProgress::Interim(_)) {
                return Some(progress);
            }
        }
        None
    }

    /// Interpret an utterance and act on it
    pub async fn handle_command(&mut self, utterance: &str) -> CommandOutcome {
        let signed_in = self.auth.is_signed_in();

        let outcome = match self.interpreter.interpret(utterance, signed_in) {
            None => CommandOutcome::Discarded,
            Some(Intent::Navigate(command)) => {
                self.navigate(command.target_path, format!("Navigating to {}", command.phrase))
            }
            Some(Intent::NavigationDenied(command)) => self.deny(command.target_path),
            Some(Intent::Lookup { query }) => self.lookup(&query).await,
            Some(Intent::Help) => {
                self.notifier
                    .notify(Notice::info(HELP_TEXT).with_auto_close(HELP_AUTO_CLOSE));
                CommandOutcome::Help
            }
            Some(Intent::Unrecognized { utterance }) => {
                self.notifier.notify(Notice::info(format!(
                    "Command not recognized: \"{}\". Say \"help\" for assistance.",
                    utterance
                )));
                CommandOutcome::Unrecognized { utterance }
            }
        };

        self.set_search_text("");
        info!(utterance, outcome = outcome.label(), "command handled");
        self.emit(SearchEvent::CommandHandled {
            utterance: utterance.to_string(),
            outcome: outcome.label().to_string(),
        });
        outcome
    }

    /// Stop any capture and timers; nothing fires afterwards
    pub fn teardown(&mut self) {
        self.capture.cancel();
        self.hints.hide();
        debug!("search component torn down");
    }

    async fn lookup(&self, query: &str) -> CommandOutcome {
        let outcome = self.resolver.resolve(query).await;
        let Some(path) = outcome.target_path() else {
            return CommandOutcome::Discarded;
        };
        let message = match outcome.book() {
            Some(book) => format!("Found book: {}", book.title),
            None => format!("Searching for: {}", query),
        };
        self.navigate(&path, message)
    }

    fn navigate(&self, path: &str, success: String) -> CommandOutcome {
        match self.gate.commit(path) {
            Ok(()) => {
                self.notifier.notify(Notice::success(success));
                CommandOutcome::Navigated {
                    path: path.to_string(),
                }
            }
            Err(denied) => self.deny(&denied.path),
        }
    }

    fn deny(&self, path: &str) -> CommandOutcome {
        self.notifier.notify(Notice::warning(SIGN_IN_REQUIRED));
        CommandOutcome::Denied {
            path: path.to_string(),
        }
    }

    fn report_capture_failure(&mut self, error: &CaptureError) {
        let message = match error {
            CaptureError::Recognition(code) => format!("Speech recognition error: {}", code),
            _ => "Failed to start voice recognition".to_string(),
        };
        self.notifier.notify(Notice::error(message));
        self.set_search_text("");
        self.hints.hide();
        self.emit(SearchEvent::CaptureFailed {
            session: self.capture.session().id,
            code: error.code(),
        });
    }

    fn emit(&self, event: SearchEvent) {
        debug!(%event, "search event");
        let _ = self.event_tx.send(event);
    }
}

impl Drop for SmartSearch {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::{RecognitionErrorCode, RecognitionEvent, StopMode};
    use crate::catalog::BookSummary;
    use crate::navigation::{HistoryNavigator, StaticAuth};
    use crate::notify::Severity;
    use crate::testing::{FakeCatalog, RecordingNotifier, ScriptedRecognizer};

    struct Harness {
        search: SmartSearch,
        navigator: Arc<HistoryNavigator>,
        notifier: Arc<RecordingNotifier>,
        recognizer: Arc<ScriptedRecognizer>,
        catalog: Arc<FakeCatalog>,
    }

    fn harness_with(catalog: FakeCatalog, auth: StaticAuth, voice: bool) -> Harness {
        let navigator = Arc::new(HistoryNavigator::new());
        let notifier = Arc::new(RecordingNotifier::default());
        let recognizer = Arc::new(ScriptedRecognizer::new());
        let catalog = Arc::new(catalog);
        let recognizer_port: Option<Arc<dyn SpeechRecognizer>> = if voice {
            Some(recognizer.clone())
        } else {
            None
        };

        let (event_tx, _) = broadcast::channel(64);
        let search = SmartSearch::new(
            SearchPorts {
                catalog: catalog.clone(),
                navigator: navigator.clone(),
                auth: Arc::new(auth),
                notifier: notifier.clone(),
                recognizer: recognizer_port,
            },
            &Config::default(),
            event_tx,
        );

        Harness {
            search,
            navigator,
            notifier,
            recognizer,
            catalog,
        }
    }

    fn harness() -> Harness {
        harness_with(
            FakeCatalog::with_books(vec![
                BookSummary::new("1", "Dune Messiah"),
                BookSummary::new("2", "Dune"),
            ]),
            StaticAuth::signed_out(),
            true,
        )
    }

    fn say(h: &Harness, session: usize, text: &str) {
        assert!(h.recognizer.push(
            session,
            RecognitionEvent::Transcript {
                text: text.to_string(),
                is_final: true,
            }
        ));
        assert!(h.recognizer.push(session, RecognitionEvent::End));
    }

    #[tokio::test]
    async fn test_typed_navigation_is_case_insensitive() {
        let mut h = harness();
        h.search.set_search_text("Go To HOME please");
        h.navigator.navigate("/all-books");

        let outcome = h.search.submit().await;
        assert_eq!(
            outcome,
            Some(CommandOutcome::Navigated {
                path: "/".to_string()
            })
        );
        assert_eq!(h.navigator.current_path(), "/");
        assert_eq!(h.search.search_text(), "");

        let notices = h.notifier.notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0], Notice::success("Navigating to go to home"));
    }

    #[tokio::test]
    async fn test_private_route_denied_with_one_warning() {
        let mut h = harness();
        let outcome = h.search.handle_command("add book").await;

        assert_eq!(
            outcome,
            CommandOutcome::Denied {
                path: "/add-book".to_string()
            }
        );
        assert_eq!(h.navigator.history(), vec!["/"]);
        let notices = h.notifier.notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].severity, Severity::Warning);
    }

    #[tokio::test]
    async fn test_private_route_allowed_when_signed_in() {
        let mut h = harness_with(FakeCatalog::with_books(vec![]), StaticAuth::signed_in("reader"), false);
        let outcome = h.search.handle_command("show my borrowed books").await;
        assert_eq!(
            outcome,
            CommandOutcome::Navigated {
                path: "/borrowed-books".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_search_for_exact_title_opens_book() {
        let mut h = harness();
        let outcome = h.search.handle_command("search for dune").await;

        assert_eq!(
            outcome,
            CommandOutcome::Navigated {
                path: "/book/2".to_string()
            }
        );
        assert_eq!(h.catalog.queries(), vec!["dune"]);
        assert_eq!(h.notifier.notices(), vec![Notice::success("Found book: Dune")]);
    }

    #[tokio::test]
    async fn test_fallback_listing_when_catalog_fails() {
        let mut h = harness_with(FakeCatalog::failing(), StaticAuth::signed_out(), true);
        let outcome = h.search.handle_command("search for zzzznomatch").await;

        assert_eq!(
            outcome,
            CommandOutcome::Navigated {
                path: "/all-books?search=zzzznomatch".to_string()
            }
        );
        assert_eq!(
            h.notifier.notices(),
            vec![Notice::success("Searching for: zzzznomatch")]
        );
    }

    #[tokio::test]
    async fn test_fallback_listing_when_no_results() {
        let mut h = harness_with(FakeCatalog::with_books(vec![]), StaticAuth::signed_out(), true);
        let outcome = h.search.handle_command("zzzznomatch").await;
        assert_eq!(
            outcome,
            CommandOutcome::Navigated {
                path: "/all-books?search=zzzznomatch".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_help_shows_listing() {
        let mut h = harness();
        assert_eq!(h.search.handle_command("What can I say").await, CommandOutcome::Help);

        let notices = h.notifier.notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].severity, Severity::Info);
        assert_eq!(notices[0].auto_close, HELP_AUTO_CLOSE);
        assert!(h.catalog.queries().is_empty());
    }

    #[tokio::test]
    async fn test_unrecognized_names_utterance() {
        let mut h = harness();
        let outcome = h.search.handle_command("   ").await;
        assert_eq!(
            outcome,
            CommandOutcome::Unrecognized {
                utterance: String::new()
            }
        );
        assert_eq!(h.notifier.notices()[0].severity, Severity::Info);
    }

    #[tokio::test]
    async fn test_discarded_search_raises_nothing() {
        let mut h = harness();
        h.search.set_search_text("search for");
        assert_eq!(h.search.submit().await, Some(CommandOutcome::Discarded));
        assert!(h.notifier.notices().is_empty());
        assert_eq!(h.search.search_text(), "");
    }

    #[tokio::test]
    async fn test_blank_submit_is_ignored() {
        let mut h = harness();
        h.search.set_search_text("   ");
        assert_eq!(h.search.submit().await, None);
        assert!(h.notifier.notices().is_empty());
    }

    #[tokio::test]
    async fn test_voice_command_flow() {
        let mut h = harness();
        h.search.set_search_text("stale text");
        h.search.start_capture().unwrap();
        assert_eq!(h.search.search_text(), "");
        assert!(h.search.hint_state().visible);

        h.recognizer.push(
            0,
            RecognitionEvent::Transcript {
                text: "show all".to_string(),
                is_final: false,
            },
        );
        assert_eq!(
            h.search.next_capture_update().await,
            Some(CaptureProgress::Interim("show all".to_string()))
        );
        assert_eq!(h.search.search_text(), "show all");

        say(&h, 0, "show all books");
        let progress = h.search.run_capture().await;
        assert_eq!(
            progress,
            Some(CaptureProgress::Handled(CommandOutcome::Navigated {
                path: "/all-books".to_string()
            }))
        );
        assert_eq!(h.search.search_text(), "");
        assert!(!h.search.hint_state().visible);
        assert!(!h.search.is_listening());
        assert_eq!(h.notifier.notices().len(), 1);
    }

    #[tokio::test]
    async fn test_silent_session_is_not_interpreted() {
        let mut h = harness();
        h.search.start_capture().unwrap();
        h.recognizer.push(0, RecognitionEvent::End);
        assert_eq!(h.search.run_capture().await, Some(CaptureProgress::Silent));
        assert!(h.notifier.notices().is_empty());
    }

    #[tokio::test]
    async fn test_voice_unavailable_falls_back_to_text() {
        let mut h = harness_with(FakeCatalog::with_books(vec![]), StaticAuth::signed_out(), false);
        assert!(!h.search.voice_supported());
        assert_eq!(h.search.start_capture(), Err(CaptureError::CapabilityUnavailable));

        let notices = h.notifier.notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].severity, Severity::Error);

        h.search.set_search_text("browse books");
        assert!(matches!(
            h.search.submit().await,
            Some(CommandOutcome::Navigated { .. })
        ));
    }

    #[tokio::test]
    async fn test_recognition_error_reports_code() {
        let mut h = harness();
        h.search.focus();
        h.search.start_capture().unwrap();
        h.recognizer.push(
            0,
            RecognitionEvent::Transcript {
                text: "dun".to_string(),
                is_final: false,
            },
        );
        h.recognizer.push(
            0,
            RecognitionEvent::Error {
                code: RecognitionErrorCode::NoSpeech,
            },
        );

        let progress = h.search.run_capture().await;
        assert_eq!(
            progress,
            Some(CaptureProgress::Failed(CaptureError::Recognition(
                RecognitionErrorCode::NoSpeech
            )))
        );
        assert_eq!(h.search.search_text(), "");
        assert_eq!(h.search.capture_status(), CaptureStatus::Error);
        assert!(!h.search.hint_state().visible);
        assert_eq!(
            h.notifier.notices(),
            vec![Notice::error("Speech recognition error: no-speech")]
        );
        assert_eq!(h.recognizer.started(), 1);
    }

    #[tokio::test]
    async fn test_start_failure_is_reported() {
        let mut h = harness();
        h.recognizer.fail_next_start("microphone busy");
        assert!(h.search.start_capture().is_err());
        assert_eq!(
            h.notifier.notices(),
            vec![Notice::error("Failed to start voice recognition")]
        );
    }

    #[tokio::test]
    async fn test_restart_never_finalizes_twice() {
        let mut h = harness();
        h.search.start_capture().unwrap();
        h.search.start_capture().unwrap();

        // The first stream was released when the second started
        assert!(!h.recognizer.push(0, RecognitionEvent::End));
        say(&h, 1, "go home");

        let mut handled = 0;
        while let Some(progress) = h.search.next_capture_update().await {
            if matches!(progress, CaptureProgress::Handled(_)) {
                handled += 1;
            }
        }
        assert_eq!(handled, 1);
        assert_eq!(h.notifier.notices().len(), 1);
    }

    #[tokio::test]
    async fn test_same_transcript_same_outcome() {
        let mut h = harness();
        let mut outcomes = Vec::new();
        for session in 0..2 {
            h.search.start_capture().unwrap();
            say(&h, session, "search for dune");
            outcomes.push(h.search.run_capture().await);
        }
        assert_eq!(outcomes[0], outcomes[1]);
        assert_eq!(h.navigator.history(), vec!["/", "/book/2", "/book/2"]);
    }

    #[tokio::test]
    async fn test_teardown_silences_capture() {
        let mut h = harness();
        h.search.focus();
        h.search.start_capture().unwrap();
        h.search.teardown();

        assert!(!h.recognizer.push(0, RecognitionEvent::End));
        assert_eq!(h.search.next_capture_update().await, None);
        assert!(!h.search.hint_state().visible);
        assert!(h.notifier.notices().is_empty());
    }

    #[tokio::test]
    async fn test_hover_and_focus_drive_hints() {
        let mut h = harness();
        assert!(!h.search.hint_state().visible);
        h.search.hover(true);
        assert!(h.search.hint_state().visible);
        assert_eq!(h.search.placeholder(), "Say a book name");
        h.search.hover(false);
        assert!(!h.search.hint_state().visible);
        h.search.focus();
        assert!(h.search.hint_state().visible);
        h.search.blur();
        assert!(!h.search.hint_state().visible);
    }

    #[test]
    fn test_hints_without_runtime() {
        let mut h = harness();
        h.search.focus();
        assert!(h.search.hint_state().visible);
        assert_eq!(h.search.placeholder(), "Say a book name");
        h.search.hover(false);
        assert!(!h.search.hint_state().visible);
    }

    #[tokio::test]
    async fn test_stop_capture_still_handles_transcript() {
        let mut h = harness();
        h.search.start_capture().unwrap();
        h.recognizer.push(
            0,
            RecognitionEvent::Transcript {
                text: "go home".to_string(),
                is_final: true,
            },
        );
        h.search.stop_capture();
        assert_eq!(h.recognizer.stop_request(0), Some(StopMode::Graceful));
        assert_eq!(h.search.capture_status(), CaptureStatus::Finalizing);

        assert!(h.recognizer.push(0, RecognitionEvent::End));
        assert_eq!(
            h.search.run_capture().await,
            Some(CaptureProgress::Handled(CommandOutcome::Navigated {
                path: "/".to_string()
            }))
        );
        assert_eq!(h.search.capture_status(), CaptureStatus::Idle);
    }

    #[tokio::test]
    async fn test_clear_search_empties_field() {
        let (tx, mut rx) = broadcast::channel(16);
        let mut h = harness();
        h.search.event_tx = tx;
        h.search.set_search_text("dune");
        h.search.clear_search();
        assert_eq!(h.search.search_text(), "");
        assert_eq!(
            rx.recv().await.unwrap(),
            SearchEvent::SearchTextChanged {
                text: "dune".to_string()
            }
        );
        assert_eq!(
            rx.recv().await.unwrap(),
            SearchEvent::SearchTextChanged {
                text: String::new()
            }
        );

        // Already empty: no further event
        h.search.clear_search();
        assert!(rx.try_recv().is_err());
    }
}
