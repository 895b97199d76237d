//! Auth and routing collaborators

use std::sync::Mutex;

use tracing::info;

/// Signed-in user as issued by the auth provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub uid: String,
    pub display_name: String,
}

/// Read-only view of the auth provider
pub trait AuthState: Send + Sync {
    /// The current user, `None` when signed out
    fn current_user(&self) -> Option<User>;

    fn is_signed_in(&self) -> bool {
        self.current_user().is_some()
    }
}

/// Routing service that owns the displayed view
pub trait Navigator: Send + Sync {
    /// Transition the displayed view to `path`
    fn navigate(&self, path: &str);

    /// Path of the displayed view
    fn current_path(&self) -> String;
}

/// Auth state fixed at construction
#[derive(Debug, Clone, Default)]
pub struct StaticAuth {
    user: Option<User>,
}

impl StaticAuth {
    pub fn signed_out() -> Self {
        Self { user: None }
    }

    pub fn signed_in(display_name: impl Into<String>) -> Self {
        let display_name = display_name.into();
        Self {
            user: Some(User {
                uid: display_name.to_lowercase().replace(' ', "-"),
                display_name,
            }),
        }
    }
}

impl AuthState for StaticAuth {
    fn current_user(&self) -> Option<User> {
        self.user.clone()
    }
}

/// In-memory navigator that records every committed route
#[derive(Debug)]
pub struct HistoryNavigator {
    history: Mutex<Vec<String>>,
}

impl Default for HistoryNavigator {
    fn default() -> Self {
        Self {
            history: Mutex::new(vec!["/".to_string()]),
        }
    }
}

impl HistoryNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// All visited paths, oldest first
    pub fn history(&self) -> Vec<String> {
        self.history
            .lock()
            .map(|history| history.clone())
            .unwrap_or_default()
    }
}

impl Navigator for HistoryNavigator {
    fn navigate(&self, path: &str) {
        info!(path, "route change");
        if let Ok(mut history) = self.history.lock() {
            history.push(path.to_string());
        }
    }

    fn current_path(&self) -> String {
        self.history
            .lock()
            .ok()
            .and_then(|history| history.last().cloned())
            .unwrap_or_else(|| "/".to_string())
    }
}
