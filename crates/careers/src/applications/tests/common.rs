use std::io;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Request, Response};
use serde_json::Value;

use crate::applications::domain::ApplicationSubmission;
use crate::applications::notification::NotificationEmail;
use crate::applications::resume::encode_data_url;
use crate::applications::service::ApplicationRelayService;
use crate::applications::transport::{MailTransport, TransportError};

#[derive(Default, Clone)]
pub(super) struct RecordingTransport {
    sent: Arc<Mutex<Vec<NotificationEmail>>>,
}

impl RecordingTransport {
    pub(super) fn sent(&self) -> Vec<NotificationEmail> {
        self.sent.lock().expect("lock").clone()
    }
}

#[async_trait]
impl MailTransport for RecordingTransport {
    async fn send(&self, email: NotificationEmail) -> Result<(), TransportError> {
        self.sent.lock().expect("lock").push(email);
        Ok(())
    }
}

/// Always fails the way an SMTP relay without valid credentials would.
#[derive(Default, Clone)]
pub(super) struct RejectingTransport;

#[async_trait]
impl MailTransport for RejectingTransport {
    async fn send(&self, _email: NotificationEmail) -> Result<(), TransportError> {
        Err(TransportError::MissingCredentials)
    }
}

pub(super) fn recording_service() -> (
    ApplicationRelayService<RecordingTransport>,
    Arc<RecordingTransport>,
) {
    let transport = Arc::new(RecordingTransport::default());
    (ApplicationRelayService::new(transport.clone()), transport)
}

pub(super) fn submission() -> ApplicationSubmission {
    ApplicationSubmission {
        full_name: Some("Jane Doe".to_string()),
        email: Some("jane@x.com".to_string()),
        message: Some("I would love to join.".to_string()),
        job_title: Some("Backend Engineer".to_string()),
        country: Some("Qatar".to_string()),
        salary: Some("QAR 9000".to_string()),
        experience: Some("3".to_string()),
        job_type: Some("Full-time".to_string()),
        ..ApplicationSubmission::default()
    }
}

pub(super) fn resume_bytes() -> Vec<u8> {
    b"%PDF-1.4\n%\xe2\xe3\xcf\xd3\nresume body".to_vec()
}

pub(super) fn with_resume(mut submission: ApplicationSubmission) -> ApplicationSubmission {
    submission.resume_base64 = Some(encode_data_url("application/pdf", &resume_bytes()));
    submission
}

pub(super) fn json_request(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/apply")
        .header("content-type", "application/json")
        .body(Body::from(
            serde_json::to_vec(&body).expect("serialize request"),
        ))
        .expect("request")
}

pub(super) async fn json_body(response: Response<Body>) -> Value {
    let body = to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("body");
    serde_json::from_slice(&body).expect("json")
}

/// Collects formatted tracing output for assertions on log lines.
#[derive(Default, Clone)]
pub(super) struct CapturedLogs {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl CapturedLogs {
    pub(super) fn subscriber(&self) -> impl tracing::Subscriber + Send + Sync {
        let logs = self.clone();
        tracing_subscriber::fmt()
            .with_writer(move || logs.clone())
            .with_ansi(false)
            .finish()
    }

    pub(super) fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buffer.lock().expect("lock")).into_owned()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.lock().expect("lock").extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
