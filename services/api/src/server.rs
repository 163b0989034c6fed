use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryCompanionRepository};
use crate::routes::with_companion_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use safeyatri::config::AppConfig;
use safeyatri::error::AppError;
use safeyatri::http::CompanionService;
use safeyatri::simulate::Latency;
use safeyatri::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let repository = Arc::new(InMemoryCompanionRepository::new(
        config.server.session_idle,
    ));
    let latency = Latency::from(&config.simulation);
    let companion_service = Arc::new(CompanionService::new(repository, latency));

    let app = with_companion_routes(companion_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        latency_scale = config.simulation.latency_scale,
        "travel-safety companion ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
