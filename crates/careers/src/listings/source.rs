use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info};

use super::domain::JobPosting;
use crate::config::ListingSourceConfig;

/// Read side of the external job board.
#[async_trait]
pub trait JobListingSource: Send + Sync {
    async fn fetch(&self) -> Result<Vec<JobPosting>, ListingError>;
}

/// Failure to obtain a usable snapshot from the job board.
#[derive(Debug, thiserror::Error)]
pub enum ListingError {
    #[error("job board request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("job board returned malformed JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Unauthenticated GET against the spreadsheet-backed endpoint. Redirects are
/// followed; no retry or timeout is configured beyond the client defaults.
#[derive(Debug, Clone)]
pub struct HttpJobListingSource {
    client: Client,
    url: String,
}

impl HttpJobListingSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), url)
    }

    pub fn with_client(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    pub fn from_config(config: &ListingSourceConfig) -> Self {
        Self::new(config.url.clone())
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl JobListingSource for HttpJobListingSource {
    async fn fetch(&self) -> Result<Vec<JobPosting>, ListingError> {
        debug!(url = %self.url, "fetching job listings");
        let response = self.client.get(&self.url).send().await?.error_for_status()?;
        let body = response.bytes().await?;
        let postings: Vec<JobPosting> = serde_json::from_slice(&body)?;
        info!(count = postings.len(), "job listings fetched");
        Ok(postings)
    }
}
