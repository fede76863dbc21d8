use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use hackjury::error::AppError;
use hackjury::judging::roster::{ColumnMapping, ImportedTeam, RosterImporter, RosterPreview};
use hackjury::judging::scoring::{scoring_router, ScoreRepository, ScoringService};
use hackjury::judging::{EventSnapshot, RankedResult, ScoringPolicy};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::io::Cursor;
use std::sync::Arc;

/// Stateless ranking over a snapshot supplied by the caller.
#[derive(Debug, Deserialize)]
pub(crate) struct CalculateRequest {
    #[serde(flatten)]
    pub(crate) snapshot: EventSnapshot,
    #[serde(default)]
    pub(crate) policy: Option<ScoringPolicy>,
    #[serde(default)]
    pub(crate) include_drafts: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct CalculateResponse {
    pub(crate) policy: ScoringPolicy,
    pub(crate) all_teams_scored: bool,
    pub(crate) results: Vec<RankedResult>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TeamImportRequest {
    pub(crate) csv: String,
    pub(crate) mapping: ColumnMapping,
}

#[derive(Debug, Serialize)]
pub(crate) struct TeamImportResponse {
    pub(crate) preview: RosterPreview,
    pub(crate) teams: Vec<ImportedTeam>,
}

pub(crate) fn with_scoring_routes<R>(service: Arc<ScoringService<R>>) -> axum::Router
where
    R: ScoreRepository + 'static,
{
    scoring_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/results/calculate",
            axum::routing::post(calculate_endpoint),
        )
        .route(
            "/api/v1/teams/import",
            axum::routing::post(team_import_endpoint),
        )
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

pub(crate) async fn calculate_endpoint(
    Json(payload): Json<CalculateRequest>,
) -> Json<CalculateResponse> {
    let CalculateRequest {
        snapshot,
        policy,
        include_drafts,
    } = payload;

    let snapshot = if include_drafts {
        snapshot
    } else {
        snapshot.locked_only()
    };
    let policy = policy.unwrap_or_default();

    Json(CalculateResponse {
        policy,
        all_teams_scored: snapshot.all_teams_scored(),
        results: snapshot.results(policy),
    })
}

pub(crate) async fn team_import_endpoint(
    Json(payload): Json<TeamImportRequest>,
) -> Result<Json<TeamImportResponse>, AppError> {
    let TeamImportRequest { csv, mapping } = payload;
    let bytes = csv.into_bytes();

    let preview = RosterImporter::preview(Cursor::new(bytes.as_slice()))?;
    let teams = RosterImporter::extract_teams(Cursor::new(bytes.as_slice()), &mapping)?;

    Ok(Json(TeamImportResponse { preview, teams }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::{demo_roster, InMemoryScoreRepository};
    use axum::body::Body;
    use axum::http::Request;
    use hackjury::judging::domain::{Criterion, CriterionId, Jury, JuryId, Team, TeamId, TeamScore};
    use hackjury::judging::ScoringConfig;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use std::sync::atomic::AtomicBool;
    use tower::ServiceExt;

    fn locked(jury: &str, team: &str, value: f64) -> TeamScore {
        let mut record = TeamScore::new(JuryId::new(jury), TeamId::new(team));
        record.scores.insert(CriterionId::new("c1"), value);
        record.locked = true;
        record
    }

    fn two_team_snapshot() -> EventSnapshot {
        EventSnapshot {
            teams: vec![Team::new("t1", "Team One"), Team::new("t2", "Team Two")],
            juries: vec![Jury::new("j1", "alice"), Jury::new("j2", "bob")],
            criteria: vec![Criterion {
                id: CriterionId::new("c1"),
                name: "Impact".to_string(),
                max_score: 10.0,
                weight: 1.0,
                priority_order: 1,
            }],
            team_scores: vec![
                locked("j1", "t1", 8.0),
                locked("j1", "t2", 8.0),
                locked("j2", "t1", 6.0),
                locked("j2", "t2", 9.0),
            ],
        }
    }

    #[tokio::test]
    async fn calculate_endpoint_ranks_locked_scorecards() {
        let request = CalculateRequest {
            snapshot: two_team_snapshot(),
            policy: None,
            include_drafts: false,
        };

        let Json(body) = calculate_endpoint(Json(request)).await;

        assert_eq!(body.policy, ScoringPolicy::RawSum);
        assert!(body.all_teams_scored);
        assert_eq!(body.results[0].team_id, TeamId::new("t2"));
        assert_eq!(body.results[0].total_score, 17.0);
        assert_eq!(body.results[1].total_score, 14.0);
    }

    #[tokio::test]
    async fn calculate_endpoint_ignores_drafts_by_default() {
        let mut snapshot = two_team_snapshot();
        snapshot.team_scores[3].locked = false;
        let request = CalculateRequest {
            snapshot,
            policy: None,
            include_drafts: false,
        };

        let Json(body) = calculate_endpoint(Json(request)).await;

        assert!(!body.all_teams_scored);
        assert_eq!(body.results[0].team_id, TeamId::new("t1"));
        assert_eq!(body.results[1].total_score, 8.0);
    }

    #[tokio::test]
    async fn team_import_endpoint_rejects_unknown_column() {
        let request = TeamImportRequest {
            csv: "Project,Contact\nByte Club,crew@byte.club\n".to_string(),
            mapping: ColumnMapping::new("Team"),
        };

        let response = team_import_endpoint(Json(request)).await.into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn team_import_endpoint_returns_preview_and_teams() {
        let request = TeamImportRequest {
            csv: "Project,Contact\nByte Club,crew@byte.club\n,\nNull Pointers,\n".to_string(),
            mapping: ColumnMapping {
                name: "Project".to_string(),
                description: None,
                email: Some("Contact".to_string()),
            },
        };

        let Json(body) = team_import_endpoint(Json(request))
            .await
            .expect("import succeeds");

        assert_eq!(body.preview.total_rows, 2);
        assert_eq!(body.teams.len(), 2);
        assert_eq!(body.teams[0].email.as_deref(), Some("crew@byte.club"));
        assert_eq!(body.teams[1].email, None);
    }

    #[tokio::test]
    async fn readiness_reports_initializing_until_bound() {
        let service = Arc::new(ScoringService::new(
            demo_roster(),
            Arc::new(InMemoryScoreRepository::default()),
            ScoringConfig::default(),
        ));
        let state = AppState {
            readiness: Arc::new(AtomicBool::new(false)),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
        };
        let app = with_scoring_routes(service).layer(Extension(state));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/ready")
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
