use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use super::domain::{ApplicationSubmission, SubmissionResult};
use super::modal::{ApplicationModal, ModalError};
use crate::config::RelayConfig;

/// Failures on the applicant's side of the relay call.
#[derive(Debug, thiserror::Error)]
pub enum ClientSubmissionError {
    #[error("unable to read resume '{path}': {source}")]
    ResumeRead {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("relay request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("relay returned an unreadable response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error(transparent)]
    Modal(#[from] ModalError),
}

/// Caller side of the relay endpoint.
#[async_trait]
pub trait RelayClient: Send + Sync {
    async fn submit(
        &self,
        payload: &ApplicationSubmission,
    ) -> Result<SubmissionResult, ClientSubmissionError>;
}

/// Posts the payload as JSON and reads the result body whatever the status;
/// 400 and 500 responses carry `success: false` bodies the modal relies on.
#[derive(Debug, Clone)]
pub struct HttpRelayClient {
    client: Client,
    endpoint: String,
}

impl HttpRelayClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
        }
    }

    pub fn from_config(config: &RelayConfig) -> Self {
        Self::new(config.endpoint.clone())
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl RelayClient for HttpRelayClient {
    async fn submit(
        &self,
        payload: &ApplicationSubmission,
    ) -> Result<SubmissionResult, ClientSubmissionError> {
        let response = self.client.post(&self.endpoint).json(payload).send().await?;
        let status = response.status();
        let body = response.bytes().await?;
        debug!(%status, endpoint = %self.endpoint, "relay responded");
        Ok(serde_json::from_slice(&body)?)
    }
}

/// Drive one submit: `Idle -> Submitting -> Success | Idle`.
pub async fn submit_application<C>(
    modal: ApplicationModal,
    client: &C,
) -> Result<ApplicationModal, ModalError>
where
    C: RelayClient + ?Sized,
{
    let (submitting, payload) = modal.begin_submit()?;
    let outcome = client.submit(&payload).await;
    Ok(submitting.finish(outcome))
}
