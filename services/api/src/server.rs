use crate::cli::ServeArgs;
use crate::infra::{
    seed_demo_marketplace, AppState, InMemoryProfileRepository, InMemoryReviewRepository,
    InMemoryScoreRecordRepository,
};
use crate::routes::with_trust_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use provider_trust::config::AppConfig;
use provider_trust::error::AppError;
use provider_trust::telemetry;
use provider_trust::trust::{TrustScoreService, TrustServiceError};
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

    let lexicon = Arc::new(config.sentiment.lexicon()?);
    info!(
        entries = lexicon.len(),
        source = ?config.sentiment.lexicon_path,
        "sentiment lexicon loaded"
    );

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let profiles = Arc::new(InMemoryProfileRepository::default());
    let reviews = Arc::new(InMemoryReviewRepository::default());
    let records = Arc::new(InMemoryScoreRecordRepository::default());
    if args.seed_demo {
        let seeded = seed_demo_marketplace(profiles.as_ref(), reviews.as_ref())
            .map_err(TrustServiceError::from)?;
        info!(profiles = seeded.len(), "demo marketplace seeded");
    }
    let trust_service = Arc::new(TrustScoreService::new(profiles, reviews, records, lexicon));

    let app = with_trust_routes(trust_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "provider trust service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
