//! Book resolution: exact title, then first result, then listing fallback

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};
use url::form_urlencoded;

use super::{BookSummary, Catalog, CatalogError};

/// Listing view that accepts a `search` filter
pub const LISTING_PATH: &str = "/all-books";

/// Coarse classification of a [`SearchOutcome`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeKind {
    Exact,
    Closest,
    Fallback,
    None,
}

/// Result of resolving one lookup query. Not retained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// A book whose title equals the query, ignoring case
    Exact(BookSummary),
    /// No exact title; the catalog's first result
    Closest(BookSummary),
    /// Nothing resolved; show the listing filtered by the query
    Fallback { query: String },
    /// Blank query, nothing to look up
    None,
}

impl SearchOutcome {
    pub fn kind(&self) -> OutcomeKind {
        match self {
            SearchOutcome::Exact(_) => OutcomeKind::Exact,
            SearchOutcome::Closest(_) => OutcomeKind::Closest,
            SearchOutcome::Fallback { .. } => OutcomeKind::Fallback,
            SearchOutcome::None => OutcomeKind::None,
        }
    }

    /// The resolved book, if any
    pub fn book(&self) -> Option<&BookSummary> {
        match self {
            SearchOutcome::Exact(book) | SearchOutcome::Closest(book) => Some(book),
            _ => None,
        }
    }

    /// Route to display for this outcome
    pub fn target_path(&self) -> Option<String> {
        match self {
            SearchOutcome::Exact(book) | SearchOutcome::Closest(book) => Some(book_path(&book.id)),
            SearchOutcome::Fallback { query } => Some(listing_path(query)),
            SearchOutcome::None => None,
        }
    }
}

/// Detail route of a single book
pub fn book_path(id: &str) -> String {
    format!("/book/{}", id)
}

/// Listing route filtered by `query`, form-encoded (space becomes `+`)
pub fn listing_path(query: &str) -> String {
    let filter = form_urlencoded::Serializer::new(String::new())
        .append_pair("search", query)
        .finish();
    format!("{}?{}", LISTING_PATH, filter)
}

/// Picks a navigation target for a lookup query
pub struct BookResolver {
    catalog: Arc<dyn Catalog>,
    timeout: Duration,
}

impl BookResolver {
    pub fn new(catalog: Arc<dyn Catalog>, timeout: Duration) -> Self {
        Self { catalog, timeout }
    }

    /// Resolve `query` against the catalog. Never fails: transport errors and
    /// timeouts degrade to [`SearchOutcome::Fallback`].
    pub async fn resolve(&self, query: &str) -> SearchOutcome {
        let query = query.trim();
        if query.is_empty() {
            return SearchOutcome::None;
        }

        let books = match self.search(query).await {
            Ok(books) => books,
            Err(e) => {
                warn!(error = %e, query, "catalog lookup failed, using listing fallback");
                return SearchOutcome::Fallback {
                    query: query.to_string(),
                };
            }
        };

        let outcome = pick(query, books);
        info!(query, kind = ?outcome.kind(), "lookup resolved");
        outcome
    }

    async fn search(&self, query: &str) -> Result<Vec<BookSummary>, CatalogError> {
        match tokio::time::timeout(self.timeout, self.catalog.search(query)).await {
            Ok(result) => result,
            Err(_) => Err(CatalogError::Timeout(self.timeout.as_millis() as u64)),
        }
    }
}

fn pick(query: &str, books: Vec<BookSummary>) -> SearchOutcome {
    let wanted = query.to_lowercase();
    debug!(candidates = books.len(), "choosing lookup result");

    let mut books = books.into_iter();
    let Some(first) = books.next() else {
        return SearchOutcome::Fallback {
            query: query.to_string(),
        };
    };

    if first.title.to_lowercase() == wanted {
        return SearchOutcome::Exact(first);
    }
    match books.find(|book| book.title.to_lowercase() == wanted) {
        Some(exact) => SearchOutcome::Exact(exact),
        None => SearchOutcome::Closest(first),
    }
}
