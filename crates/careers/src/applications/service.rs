use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use super::domain::ApplicationSubmission;
use super::notification::NotificationEmail;
use super::resume::{self, ResumeError};
use super::transport::{MailTransport, TransportError};

/// Stateless relay turning a validated submission into one outbound email.
pub struct ApplicationRelayService<T> {
    transport: Arc<T>,
}

/// What was handed to the transport, for logging and callers that care.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayReceipt {
    pub subject: String,
    pub attachment: Option<String>,
}

impl<T> ApplicationRelayService<T>
where
    T: MailTransport + 'static,
{
    pub fn new(transport: Arc<T>) -> Self {
        Self { transport }
    }

    /// Validate, compose and send. Nothing is retried or queued; a transport
    /// failure is returned to the caller and the submission is dropped.
    pub async fn relay(
        &self,
        submission: ApplicationSubmission,
    ) -> Result<RelayReceipt, RelayError> {
        let (full_name, email) = submission
            .applicant()
            .ok_or(ValidationError::MissingRequiredFields)?;

        let attachment = submission
            .resume_payload()
            .map(|raw| {
                resume::attachment_from_data_url(raw, submission.resume_file_name.as_deref())
            })
            .transpose()?;

        let notification =
            NotificationEmail::compose(full_name, email, &submission, attachment, Utc::now());
        let receipt = RelayReceipt {
            subject: notification.subject.clone(),
            attachment: notification
                .attachment
                .as_ref()
                .map(|attachment| attachment.file_name.clone()),
        };

        self.transport.send(notification).await?;

        info!(
            has_resume = receipt.attachment.is_some(),
            job_title = submission.job_title().unwrap_or("unspecified"),
            "job application relayed"
        );
        Ok(receipt)
    }
}

/// Client-side mistakes in the submitted payload.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("full name and email are required")]
    MissingRequiredFields,
}

/// Error raised by the relay service.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Resume(#[from] ResumeError),
    #[error(transparent)]
    Transport(#[from] TransportError),
}
