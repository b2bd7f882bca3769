use crate::cli::ServeArgs;
use crate::infra::{load_seed, AppState, InMemoryReviewRepository};
use crate::routes::with_review_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use dlist::config::AppConfig;
use dlist::error::AppError;
use dlist::telemetry;
use dlist::workflows::reviews::ReviewPresentationService;
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
    if let Some(seed) = args.seed.take() {
        config.reviews.seed_path = Some(seed);
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let repository = match config.reviews.seed_path.as_deref() {
        Some(path) => load_seed(path)?,
        None => InMemoryReviewRepository::default(),
    };
    let review_service = Arc::new(ReviewPresentationService::new(
        Arc::new(repository),
        &config.reviews,
    ));

    let app = with_review_routes(review_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        unknown_subject = ?config.reviews.unknown_subject,
        "review service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
