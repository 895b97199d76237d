//! HTTP adapter for the storefront's catalog API

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use super::{BookSummary, Catalog, CatalogError};

/// Catalog backed by `GET {base_url}/books?search=<query>`
pub struct HttpCatalog {
    client: Client,
    base_url: String,
}

impl HttpCatalog {
    /// Create a catalog client for the given API root
    pub fn new(base_url: impl Into<String>) -> Result<Self, CatalogError> {
        let client = Client::builder()
            .user_agent(concat!("book-voice-search/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::with_client(client, base_url))
    }

    /// Create a catalog with a preconfigured client
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }
}

#[async_trait]
impl Catalog for HttpCatalog {
    async fn search(&self, query: &str) -> Result<Vec<BookSummary>, CatalogError> {
        let url = format!("{}/books", self.base_url);
        debug!(%url, query, "catalog search");

        let response = self
            .client
            .get(&url)
            .query(&[("search", query)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Status(status.as_u16()));
        }

        let books: Vec<BookSummary> = response.json().await?;
        debug!(results = books.len(), "catalog search complete");
        Ok(books)
    }
}
