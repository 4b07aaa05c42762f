//! Remote source client for the artwork listing endpoint.
//!
//! One HTTP GET per page, no retry. Callers decide what a failure means
//! for their own state (the page cache is never touched from here).

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;
use tracing::debug;

use crate::artwork::{ApiListing, Artwork, API_FIELDS};

pub const DEFAULT_BASE_URL: &str = "https://api.artic.edu/api/v1/artworks";

/// Records of one page plus the total the source reported with them.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedPage {
    pub records: Vec<Artwork>,
    pub total: u64,
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected status: {status} body={body}")]
    UnexpectedStatus {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("could not decode listing: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("source unavailable: {0}")]
    Unavailable(String),
}

/// Anything that can hand out pages of artworks by zero-based offset.
#[async_trait]
pub trait RecordSource: Send + Sync {
    async fn fetch(&self, offset: u64) -> Result<FetchedPage, FetchError>;
}

#[derive(Clone)]
pub struct ArticClient {
    http: Client,
    base_url: String,
    page_size: u64,
}

impl ArticClient {
    pub fn new(base_url: impl Into<String>, page_size: u64) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into(),
            page_size: page_size.max(1),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The endpoint pages from 1; offsets are mapped onto it.
    pub fn page_param(&self, offset: u64) -> u64 {
        offset / self.page_size + 1
    }
}

#[async_trait]
impl RecordSource for ArticClient {
    async fn fetch(&self, offset: u64) -> Result<FetchedPage, FetchError> {
        let page = self.page_param(offset);
        debug!(offset, page, "fetching artworks");

        let res = self
            .http
            .get(&self.base_url)
            .query(&[
                ("page", page.to_string()),
                ("limit", self.page_size.to_string()),
                ("fields", API_FIELDS.to_string()),
            ])
            .send()
            .await?;

        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(FetchError::UnexpectedStatus { status, body });
        }

        let bytes = res.bytes().await?;
        let listing: ApiListing = serde_json::from_slice(&bytes)?;
        Ok(FetchedPage {
            total: listing.pagination.total,
            records: listing.data.into_iter().map(Artwork::from).collect(),
        })
    }
}
