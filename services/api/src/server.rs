use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::with_application_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use careers::applications::{ApplicationRelayService, SmtpMailTransport};
use careers::config::AppConfig;
use careers::error::AppError;
use careers::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    if config.mail.user.is_none() || config.mail.password.is_none() {
        warn!("SMTP_USER or SMTP_PASSWORD is not set; application emails will fail to send");
    }

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let transport = Arc::new(SmtpMailTransport::new(config.mail.clone()));
    let relay_service = Arc::new(ApplicationRelayService::new(transport));

    let app = with_application_routes(relay_service, config.relay.max_body_bytes)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        recipient = %config.mail.recipient,
        "careers mail relay ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
