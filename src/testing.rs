//! In-crate fakes for the component's collaborators

use std::sync::Mutex;

use async_trait::async_trait;

use crate::capture::{
    ActiveRecognition, CaptureError, RecognitionEvent, RecognitionFeed, RecognitionOptions,
    SpeechRecognizer, StopMode,
};
use crate::catalog::{BookSummary, Catalog, CatalogError};
use crate::notify::{Notice, Notifier};

enum CatalogBehavior {
    Books(Vec<BookSummary>),
    Fail,
    Hang,
}

/// Catalog answering from a fixed result set
pub struct FakeCatalog {
    behavior: CatalogBehavior,
    queries: Mutex<Vec<String>>,
}

impl FakeCatalog {
    pub fn with_books(books: Vec<BookSummary>) -> Self {
        Self::new(CatalogBehavior::Books(books))
    }

    pub fn failing() -> Self {
        Self::new(CatalogBehavior::Fail)
    }

    pub fn hanging() -> Self {
        Self::new(CatalogBehavior::Hang)
    }

    fn new(behavior: CatalogBehavior) -> Self {
        Self {
            behavior,
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl Catalog for FakeCatalog {
    async fn search(&self, query: &str) -> Result<Vec<BookSummary>, CatalogError> {
        self.queries.lock().unwrap().push(query.to_string());
        match &self.behavior {
            CatalogBehavior::Books(books) => Ok(books.clone()),
            CatalogBehavior::Fail => Err(CatalogError::Unavailable("connection reset".to_string())),
            CatalogBehavior::Hang => std::future::pending().await,
        }
    }
}

/// Notifier that keeps every notice
#[derive(Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        self.notices.lock().unwrap().push(notice);
    }
}

/// Recognizer whose sessions are fed by the test, one feed per `start`
#[derive(Default)]
pub struct ScriptedRecognizer {
    feeds: Mutex<Vec<RecognitionFeed>>,
    fail_next: Mutex<Option<String>>,
}

impl ScriptedRecognizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of sessions started so far
    pub fn started(&self) -> usize {
        self.feeds.lock().unwrap().len()
    }

    /// Push an event into the `session`-th started session (0-based).
    /// `false` when that session has been released.
    pub fn push(&self, session: usize, event: RecognitionEvent) -> bool {
        self.feeds.lock().unwrap()[session].try_send(event)
    }

    pub fn stop_request(&self, session: usize) -> Option<StopMode> {
        self.feeds.lock().unwrap()[session].stop_requested()
    }

    pub fn fail_next_start(&self, reason: &str) {
        *self.fail_next.lock().unwrap() = Some(reason.to_string());
    }
}

impl SpeechRecognizer for ScriptedRecognizer {
    fn start(&self, _options: &RecognitionOptions) -> Result<ActiveRecognition, CaptureError> {
        if let Some(reason) = self.fail_next.lock().unwrap().take() {
            return Err(CaptureError::StartFailed(reason));
        }
        let (active, feed) = ActiveRecognition::channel(32);
        self.feeds.lock().unwrap().push(feed);
        Ok(active)
    }
}
