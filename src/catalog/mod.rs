//! Catalog module: the book search port, its HTTP adapter and the resolver
//! that turns a lookup query into a navigation target.

mod http;
mod resolver;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use http::HttpCatalog;
pub use resolver::{book_path, listing_path, BookResolver, OutcomeKind, SearchOutcome};

/// The fields of a catalog record this crate needs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookSummary {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub title: String,
}

impl BookSummary {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
        }
    }
}

/// Errors from the catalog transport
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("catalog request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("catalog returned HTTP {0}")]
    Status(u16),

    #[error("catalog did not answer within {0}ms")]
    Timeout(u64),

    #[error("catalog unavailable: {0}")]
    Unavailable(String),
}

/// Free-text search over the book collection
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Books matching `query`, in the catalog's own order
    async fn search(&self, query: &str) -> Result<Vec<BookSummary>, CatalogError>;
}
