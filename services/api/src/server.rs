use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryPerformanceStore};
use crate::routes::with_performance_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use callboard::config::{AppConfig, ArchiveConfig};
use callboard::error::AppError;
use callboard::telemetry;
use callboard::workflows::performance::{
    ArchiveFanout, CsvArchivePublisher, PerformanceService, PerformanceStore, PhraseBook,
    RandomPhrasePicker, RollupEngine, ScoreEngine, SubmissionError, WebhookArchivePublisher,
};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let scoring = Arc::new(ScoreEngine::new(
        config.team.thresholds,
        PhraseBook::standard(),
        Arc::new(RandomPhrasePicker),
    ));

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        scoring: scoring.clone(),
    };

    let store = Arc::new(InMemoryPerformanceStore::default());
    store
        .subscribe(Box::new(|record| {
            debug!(
                participant = %record.name,
                calls_daily = record.calls_daily,
                calls_monthly = record.calls_monthly,
                "performance record updated"
            );
        }))
        .map_err(SubmissionError::from)?;

    let archive = Arc::new(archive_sinks(&config.archive)?);
    let performance_service = Arc::new(PerformanceService::new(
        store,
        archive,
        RollupEngine::new(config.team.calendar),
        scoring,
        config.team.submission_settings(),
    ));

    let app = with_performance_routes(performance_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        roster = config.team.roster.len(),
        calendar = %config.team.calendar,
        "performance dashboard service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}

pub(crate) fn archive_sinks(config: &ArchiveConfig) -> Result<ArchiveFanout, AppError> {
    if config.webhook_url.is_none() {
        warn!("APP_ARCHIVE_WEBHOOK_URL is not set; spreadsheet export disabled");
    }
    let mut fanout = ArchiveFanout::new().with_sink(WebhookArchivePublisher::new(
        config.webhook_url.clone(),
        config.timeout,
    )?);
    if let Some(path) = &config.csv_path {
        info!(path = %path.display(), "mirroring archive rows to csv ledger");
        fanout = fanout.with_sink(CsvArchivePublisher::new(path));
    }
    Ok(fanout)
}
