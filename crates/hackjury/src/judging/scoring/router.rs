use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::super::domain::{JuryId, TeamId};
use super::repository::{RepositoryError, ScoreRepository, ScoreSubmission, ScorecardView};
use super::service::{ScoringService, ScoringServiceError};

/// Router builder exposing scorecard entry and the derived standings.
pub fn scoring_router<R>(service: Arc<ScoringService<R>>) -> Router
where
    R: ScoreRepository + 'static,
{
    Router::new()
        .route("/api/v1/scores", post(save_handler::<R>))
        .route(
            "/api/v1/scores/:jury_id/:team_id",
            get(scorecard_handler::<R>),
        )
        .route(
            "/api/v1/scores/:jury_id/:team_id/lock",
            post(lock_handler::<R>),
        )
        .route("/api/v1/results", get(results_handler::<R>))
        .route("/api/v1/results/public", get(public_results_handler::<R>))
        .route("/api/v1/results/export", get(export_handler::<R>))
        .route("/api/v1/results/comments", get(comments_handler::<R>))
        .route("/api/v1/completion", get(completion_handler::<R>))
        .route(
            "/api/v1/juries/:jury_id/progress",
            get(progress_handler::<R>),
        )
        .route("/api/v1/queue", get(queue_handler::<R>))
        .with_state(service)
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RevealQuery {
    #[serde(default)]
    pub(crate) reveal: bool,
}

pub(crate) fn error_response(error: ScoringServiceError) -> Response {
    let status = match &error {
        ScoringServiceError::UnknownTeam(_)
        | ScoringServiceError::UnknownJury(_)
        | ScoringServiceError::NotFound
        | ScoringServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        ScoringServiceError::UnknownCriterion(_)
        | ScoringServiceError::UnassignedCriterion { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        ScoringServiceError::Locked { .. }
        | ScoringServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        ScoringServiceError::RosterUnavailable
        | ScoringServiceError::Repository(_)
        | ScoringServiceError::Export(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}

pub(crate) async fn save_handler<R>(
    State(service): State<Arc<ScoringService<R>>>,
    axum::Json(submission): axum::Json<ScoreSubmission>,
) -> Response
where
    R: ScoreRepository + 'static,
{
    match service.save(submission) {
        Ok(record) => (StatusCode::OK, axum::Json(ScorecardView::from(&record))).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn scorecard_handler<R>(
    State(service): State<Arc<ScoringService<R>>>,
    Path((jury_id, team_id)): Path<(String, String)>,
) -> Response
where
    R: ScoreRepository + 'static,
{
    match service.scorecard(&JuryId(jury_id), &TeamId(team_id)) {
        Ok(record) => (StatusCode::OK, axum::Json(ScorecardView::from(&record))).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn lock_handler<R>(
    State(service): State<Arc<ScoringService<R>>>,
    Path((jury_id, team_id)): Path<(String, String)>,
) -> Response
where
    R: ScoreRepository + 'static,
{
    match service.lock(&JuryId(jury_id), &TeamId(team_id)) {
        Ok(record) => (StatusCode::OK, axum::Json(ScorecardView::from(&record))).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn results_handler<R>(State(service): State<Arc<ScoringService<R>>>) -> Response
where
    R: ScoreRepository + 'static,
{
    match service.results() {
        Ok(results) => (StatusCode::OK, axum::Json(results)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn public_results_handler<R>(
    State(service): State<Arc<ScoringService<R>>>,
    Query(query): Query<RevealQuery>,
) -> Response
where
    R: ScoreRepository + 'static,
{
    match service.public_results(query.reveal) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn export_handler<R>(State(service): State<Arc<ScoringService<R>>>) -> Response
where
    R: ScoreRepository + 'static,
{
    match service.export_results() {
        Ok(csv) => csv_response(csv),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn comments_handler<R>(State(service): State<Arc<ScoringService<R>>>) -> Response
where
    R: ScoreRepository + 'static,
{
    match service.export_comments() {
        Ok(csv) => csv_response(csv),
        Err(error) => error_response(error),
    }
}

fn csv_response(csv: String) -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, mime::TEXT_CSV_UTF_8.to_string())],
        csv,
    )
        .into_response()
}

pub(crate) async fn completion_handler<R>(
    State(service): State<Arc<ScoringService<R>>>,
) -> Response
where
    R: ScoreRepository + 'static,
{
    match service.completion() {
        Ok(status) => (StatusCode::OK, axum::Json(status)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn progress_handler<R>(
    State(service): State<Arc<ScoringService<R>>>,
    Path(jury_id): Path<String>,
) -> Response
where
    R: ScoreRepository + 'static,
{
    match service.progress(&JuryId(jury_id)) {
        Ok(progress) => (StatusCode::OK, axum::Json(progress)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn queue_handler<R>(State(service): State<Arc<ScoringService<R>>>) -> Response
where
    R: ScoreRepository + 'static,
{
    match service.queue() {
        Ok(queue) => (StatusCode::OK, axum::Json(queue)).into_response(),
        Err(error) => error_response(error),
    }
}
