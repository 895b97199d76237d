//! Authorization check in front of the routing service

use std::sync::Arc;

use tracing::{debug, warn};

use super::ports::{AuthState, Navigator};
use super::routes::RouteTable;

/// A private route was requested without a signed-in user
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("route {path} requires a signed-in user")]
pub struct NavigationDenied {
    pub path: String,
}

/// Applies the route table's auth policy before committing a route change
pub struct NavigationGate {
    routes: RouteTable,
    auth: Arc<dyn AuthState>,
    navigator: Arc<dyn Navigator>,
}

impl NavigationGate {
    pub fn new(routes: RouteTable, auth: Arc<dyn AuthState>, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            routes,
            auth,
            navigator,
        }
    }

    /// Check whether the caller may navigate to `path` right now
    pub fn check(&self, path: &str) -> Result<(), NavigationDenied> {
        if self.routes.requires_auth(path) && !self.auth.is_signed_in() {
            warn!(path, "navigation blocked: sign-in required");
            return Err(NavigationDenied {
                path: path.to_string(),
            });
        }
        Ok(())
    }

    /// Check, then commit the route change
    pub fn commit(&self, path: &str) -> Result<(), NavigationDenied> {
        self.check(path)?;
        debug!(path, "navigation allowed");
        self.navigator.navigate(path);
        Ok(())
    }
}
