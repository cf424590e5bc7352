//! Job application pipeline: the modal that builds the payload, the relay
//! endpoint that validates it, and the mail transport that delivers it.

pub mod client;
pub mod domain;
pub mod modal;
pub mod notification;
pub mod resume;
pub mod router;
pub mod service;
pub mod transport;

#[cfg(test)]
mod tests;

pub use client::{submit_application, ClientSubmissionError, HttpRelayClient, RelayClient};
pub use domain::{ApplicationSubmission, SubmissionResult};
pub use modal::{ApplicationForm, ApplicationModal, ModalError, ModalPhase, ResumeFile};
pub use notification::NotificationEmail;
pub use resume::{ResumeAttachment, ResumeError};
pub use router::{application_router, APPLY_PATH};
pub use service::{ApplicationRelayService, RelayError, RelayReceipt, ValidationError};
pub use transport::{MailTransport, SmtpMailTransport, TransportError};
