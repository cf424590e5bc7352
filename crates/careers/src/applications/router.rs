use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use tracing::{error, info, warn};

use super::domain::{
    ApplicationSubmission, SubmissionResult, INVALID_BODY_ERROR, MISSING_FIELDS_ERROR,
    PAYLOAD_TOO_LARGE_ERROR, SEND_FAILED_ERROR, UNDECODABLE_RESUME_ERROR,
};
use super::service::{ApplicationRelayService, RelayError};
use super::transport::MailTransport;

pub const APPLY_PATH: &str = "/api/apply";

/// Router builder exposing the mail relay endpoint.
pub fn application_router<T>(service: Arc<ApplicationRelayService<T>>) -> Router
where
    T: MailTransport + 'static,
{
    Router::new()
        .route(APPLY_PATH, post(apply_handler::<T>))
        .with_state(service)
}

pub(crate) async fn apply_handler<T>(
    State(service): State<Arc<ApplicationRelayService<T>>>,
    payload: Result<Json<ApplicationSubmission>, JsonRejection>,
) -> Response
where
    T: MailTransport + 'static,
{
    let submission = match payload {
        Ok(Json(submission)) => submission,
        Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            warn!("application payload exceeded the body limit");
            return reply(
                StatusCode::PAYLOAD_TOO_LARGE,
                SubmissionResult::failed(PAYLOAD_TOO_LARGE_ERROR),
            );
        }
        Err(rejection) => {
            warn!(reason = %rejection.body_text(), "rejected malformed application payload");
            return reply(
                StatusCode::BAD_REQUEST,
                SubmissionResult::failed(INVALID_BODY_ERROR),
            );
        }
    };

    match service.relay(submission).await {
        Ok(receipt) => {
            info!(attachment = ?receipt.attachment, "application email sent");
            reply(StatusCode::OK, SubmissionResult::sent())
        }
        Err(RelayError::Validation(err)) => {
            warn!(error = %err, "application rejected");
            reply(
                StatusCode::BAD_REQUEST,
                SubmissionResult::failed(MISSING_FIELDS_ERROR),
            )
        }
        Err(RelayError::Resume(err)) => {
            warn!(error = %err, "application resume rejected");
            reply(
                StatusCode::BAD_REQUEST,
                SubmissionResult::failed(UNDECODABLE_RESUME_ERROR),
            )
        }
        Err(RelayError::Transport(err)) => {
            error!(error = %err, "error sending job application email");
            reply(
                StatusCode::INTERNAL_SERVER_ERROR,
                SubmissionResult::failed(SEND_FAILED_ERROR),
            )
        }
    }
}

fn reply(status: StatusCode, result: SubmissionResult) -> Response {
    (status, Json(result)).into_response()
}
