use crate::cli::ServeArgs;
use crate::infra::{load_snapshot, AppState};
use crate::routes::router;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use trucker_advisor::config::AppConfig;
use trucker_advisor::error::AppError;
use trucker_advisor::telemetry;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    if let Some(data_dir) = args.snapshot.data_dir.take() {
        config.advisor.data_dir = data_dir;
    }

    telemetry::init(&config.telemetry)?;

    let (index, snapshot) = load_snapshot(&config.advisor.data_dir)?;
    info!(
        source = %snapshot.source.display(),
        locations = snapshot.locations,
        trailers = snapshot.trailers,
        "reference index built"
    );

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        index,
        snapshot: Arc::new(snapshot),
        defaults: config.advisor.defaults,
    };

    let app = router()
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "trucker advisor ready");

    axum::serve(listener, app).await?;
    Ok(())
}
