use async_trait::async_trait;
use lettre::address::AddressError;
use lettre::message::header::{ContentType, ContentTypeErr};
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::debug;

use super::notification::NotificationEmail;
use crate::config::MailConfig;

/// Outbound hook delivering a composed notification.
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, email: NotificationEmail) -> Result<(), TransportError>;
}

/// Anything that stops a notification from leaving the process.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("SMTP credentials are not configured")]
    MissingCredentials,
    #[error("invalid mailbox '{address}': {source}")]
    Address {
        address: String,
        #[source]
        source: AddressError,
    },
    #[error("invalid attachment content type: {0}")]
    ContentType(#[from] ContentTypeErr),
    #[error("failed to build message: {0}")]
    Build(#[from] lettre::error::Error),
    #[error("SMTP delivery failed: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
}

/// How the SMTP session is protected before credentials are sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Security {
    /// SMTPS, TLS from the first byte (port 465).
    ImplicitTls,
    /// Plain connect, then a mandatory STARTTLS upgrade (port 587).
    StartTls,
}

/// SMTP delivery through `lettre`. A fresh connection is opened per message;
/// nothing is pooled between requests.
#[derive(Debug, Clone)]
pub struct SmtpMailTransport {
    config: MailConfig,
}

impl SmtpMailTransport {
    pub fn new(config: MailConfig) -> Self {
        Self { config }
    }

    /// Render the notification into a MIME message from the configured sender
    /// to the fixed careers mailbox.
    pub fn build_message(&self, email: NotificationEmail) -> Result<Message, TransportError> {
        let user = self
            .config
            .user
            .as_deref()
            .ok_or(TransportError::MissingCredentials)?;

        let from = Mailbox::new(Some(self.config.sender_name.clone()), parse_address(user)?);
        let to = Mailbox::new(None, parse_address(&self.config.recipient)?);

        let builder = Message::builder().from(from).to(to).subject(email.subject);
        let html = SinglePart::html(email.html_body);

        let message = match email.attachment {
            Some(attachment) => {
                let content_type = ContentType::parse(attachment.content_type.as_ref())?;
                let part =
                    Attachment::new(attachment.file_name).body(attachment.bytes, content_type);
                builder.multipart(MultiPart::mixed().singlepart(html).singlepart(part))?
            }
            None => builder.singlepart(html)?,
        };

        Ok(message)
    }

    fn security(&self) -> Security {
        if self.config.secure {
            Security::ImplicitTls
        } else {
            Security::StartTls
        }
    }

    fn transport(&self) -> Result<AsyncSmtpTransport<Tokio1Executor>, TransportError> {
        let (Some(user), Some(password)) = (&self.config.user, &self.config.password) else {
            return Err(TransportError::MissingCredentials);
        };
        let credentials = Credentials::new(user.clone(), password.clone());

        let builder = match self.security() {
            Security::ImplicitTls => {
                AsyncSmtpTransport::<Tokio1Executor>::relay(&self.config.host)?
            }
            Security::StartTls => {
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.host)?
            }
        };

        Ok(builder
            .port(self.config.port)
            .credentials(credentials)
            .build())
    }
}

#[async_trait]
impl MailTransport for SmtpMailTransport {
    async fn send(&self, email: NotificationEmail) -> Result<(), TransportError> {
        let transport = self.transport()?;
        let message = self.build_message(email)?;
        debug!(
            host = %self.config.host,
            port = self.config.port,
            "handing application email to SMTP relay"
        );
        transport.send(message).await?;
        Ok(())
    }
}

fn parse_address(raw: &str) -> Result<Address, TransportError> {
    raw.parse::<Address>()
        .map_err(|source| TransportError::Address {
            address: raw.to_string(),
            source,
        })
}
