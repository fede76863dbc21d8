use crate::cli::ServeArgs;
use crate::infra::{demo_roster, load_roster, AppState, InMemoryScoreRepository};
use crate::routes::with_scoring_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use hackjury::config::AppConfig;
use hackjury::error::AppError;
use hackjury::judging::scoring::ScoringService;
use hackjury::telemetry;
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

    let roster = match &config.roster_path {
        Some(path) => load_roster(path)?,
        None => {
            warn!("APP_ROSTER_PATH not set, serving the demo roster");
            demo_roster()
        }
    };
    info!(
        event = roster
            .event
            .as_ref()
            .map(|event| event.name.as_str())
            .unwrap_or("unnamed"),
        teams = roster.teams.len(),
        juries = roster.juries.len(),
        criteria = roster.criteria.len(),
        policy = config.scoring.policy.label(),
        "event roster loaded"
    );

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let repository = Arc::new(InMemoryScoreRepository::default());
    let scoring_service = Arc::new(ScoringService::new(roster, repository, config.scoring));

    let app = with_scoring_routes(scoring_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "hackathon judging service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
