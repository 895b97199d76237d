//! Transient user notifications
//!
//! Fire-and-forget sink for the toasts the component raises after every
//! handled command or capture failure.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default auto-close for success and info notices
pub const DEFAULT_AUTO_CLOSE: Duration = Duration::from_millis(5_000);

/// Auto-close for the help listing, which is longer to read
pub const HELP_AUTO_CLOSE: Duration = Duration::from_millis(10_000);

/// Notice severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Success,
    Warning,
    Info,
    Error,
}

impl Severity {
    /// Short label for console output
    pub fn label(&self) -> &'static str {
        match self {
            Self::Success => "OK",
            Self::Warning => "WARN",
            Self::Info => "INFO",
            Self::Error => "ERR",
        }
    }
}

/// A single transient message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
    pub severity: Severity,
    pub auto_close: Duration,
}

impl Notice {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity,
            auto_close: DEFAULT_AUTO_CLOSE,
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(Severity::Success, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(Severity::Info, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    pub fn with_auto_close(mut self, auto_close: Duration) -> Self {
        self.auto_close = auto_close;
        self
    }
}

/// Notification sink
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Prints notices to stdout with a severity label
#[derive(Debug, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notice: Notice) {
        println!("[{}] {}", notice.severity.label(), notice.message.trim());
    }
}
