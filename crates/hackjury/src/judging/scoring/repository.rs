use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::super::domain::{CriterionId, JuryId, TeamId, TeamScore};

/// Storage abstraction for scorecards. At most one record per (jury, team).
pub trait ScoreRepository: Send + Sync {
    /// Insert or replace the record for the pair.
    fn upsert(&self, record: TeamScore) -> Result<TeamScore, RepositoryError>;
    /// Same as `upsert`, but refuses with `Conflict` when the stored record is
    /// already locked. The check and the write happen under one guard.
    fn upsert_unlocked(&self, record: TeamScore) -> Result<TeamScore, RepositoryError>;
    fn fetch(&self, jury: &JuryId, team: &TeamId) -> Result<Option<TeamScore>, RepositoryError>;
    fn list(&self) -> Result<Vec<TeamScore>, RepositoryError>;
    /// Cascade delete every card for a team, returning how many were dropped.
    fn remove_team(&self, team: &TeamId) -> Result<usize, RepositoryError>;
    fn remove_jury(&self, jury: &JuryId) -> Result<usize, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,
    #[error("stored record is locked")]
    Conflict,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Payload a jury sends when saving a scorecard draft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreSubmission {
    pub jury: JuryId,
    pub team: TeamId,
    #[serde(default)]
    pub scores: BTreeMap<CriterionId, f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global_comments: Option<String>,
    #[serde(default)]
    pub criterion_comments: BTreeMap<CriterionId, String>,
}

/// Public view of a stored scorecard.
#[derive(Debug, Clone, Serialize)]
pub struct ScorecardView {
    pub jury: JuryId,
    pub team: TeamId,
    pub scores: BTreeMap<CriterionId, f64>,
    pub global_comments: String,
    pub criterion_comments: BTreeMap<CriterionId, String>,
    pub total: f64,
    pub locked: bool,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl From<&TeamScore> for ScorecardView {
    fn from(record: &TeamScore) -> Self {
        Self {
            jury: record.jury.clone(),
            team: record.team.clone(),
            scores: record.scores.clone(),
            global_comments: record.global_comments.clone(),
            criterion_comments: record.criterion_comments.clone(),
            total: record.total(),
            locked: record.locked,
            status: if record.locked { "locked" } else { "draft" },
            submitted_at: record.submitted_at,
        }
    }
}
