use crate::infra::AppState;
use axum::extract::DefaultBodyLimit;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use careers::applications::{application_router, ApplicationRelayService, MailTransport};
use serde_json::json;
use std::sync::Arc;

/// Mount the relay endpoint under the configured body limit, then the
/// operational endpoints, which keep axum's default limit.
pub(crate) fn with_application_routes<T>(
    service: Arc<ApplicationRelayService<T>>,
    max_body_bytes: usize,
) -> axum::Router
where
    T: MailTransport + 'static,
{
    application_router(service)
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use careers::applications::{NotificationEmail, TransportError};
    use metrics_exporter_prometheus::PrometheusBuilder;
    use std::sync::atomic::AtomicBool;
    use std::sync::Mutex;
    use tower::ServiceExt;

    #[derive(Default)]
    struct RecordingTransport {
        sent: Mutex<Vec<NotificationEmail>>,
    }

    #[async_trait]
    impl MailTransport for RecordingTransport {
        async fn send(&self, email: NotificationEmail) -> Result<(), TransportError> {
            self.sent.lock().expect("lock").push(email);
            Ok(())
        }
    }

    fn app(max_body_bytes: usize, ready: bool) -> (axum::Router, Arc<RecordingTransport>) {
        let transport = Arc::new(RecordingTransport::default());
        let service = Arc::new(ApplicationRelayService::new(transport.clone()));
        let state = AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
        };
        let router = with_application_routes(service, max_body_bytes).layer(Extension(state));
        (router, transport)
    }

    fn apply_request(body: String) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/apply")
            .header("content-type", "application/json")
            .body(Body::from(body))
            .expect("request")
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        serde_json::from_slice(&bytes).expect("json")
    }

    #[tokio::test]
    async fn healthcheck_reports_ok() {
        let Json(body) = healthcheck().await;
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn readiness_reflects_flag() {
        let (router, _) = app(1024, false);
        let response = router
            .oneshot(Request::get("/ready").body(Body::empty()).expect("request"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(json_body(response).await["status"], "initializing");

        let (router, _) = app(1024, true);
        let response = router
            .oneshot(Request::get("/ready").body(Body::empty()).expect("request"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn apply_route_is_mounted() {
        let (router, transport) = app(64 * 1024, true);
        let body = json!({ "fullName": "Jane Doe", "email": "jane@x.com" }).to_string();

        let response = router.oneshot(apply_request(body)).await.expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["success"], true);
        assert_eq!(transport.sent.lock().expect("lock").len(), 1);
    }

    #[tokio::test]
    async fn oversized_application_is_rejected() {
        let (router, transport) = app(256, true);
        let body = json!({
            "fullName": "Jane Doe",
            "email": "jane@x.com",
            "resumeBase64": format!("data:application/pdf;base64,{}", "A".repeat(1024)),
        })
        .to_string();

        let response = router.oneshot(apply_request(body)).await.expect("response");

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        let body = json_body(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Application payload is too large.");
        assert!(transport.sent.lock().expect("lock").is_empty());
    }
}
