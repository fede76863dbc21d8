use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;
use tracing::{debug, info, warn};

use super::super::completion::CompletionStatus;
use super::super::config::ScoringConfig;
use super::super::domain::{CriterionId, JuryId, TeamId, TeamScore};
use super::super::export::{comments_to_csv, results_to_csv, ExportError};
use super::super::progress::ProgressInfo;
use super::super::public::{public_results, PublicResults};
use super::super::queue::LiveQueue;
use super::super::results::RankedResult;
use super::super::snapshot::{EventRoster, EventSnapshot};
use super::repository::{RepositoryError, ScoreRepository, ScoreSubmission};

/// Service composing the event roster, the scorecard repository and the
/// aggregation core.
pub struct ScoringService<R> {
    roster: RwLock<EventRoster>,
    repository: Arc<R>,
    config: ScoringConfig,
}

impl<R> ScoringService<R>
where
    R: ScoreRepository + 'static,
{
    pub fn new(roster: EventRoster, repository: Arc<R>, config: ScoringConfig) -> Self {
        Self {
            roster: RwLock::new(roster),
            repository,
            config,
        }
    }

    pub fn config(&self) -> ScoringConfig {
        self.config
    }

    pub fn roster(&self) -> Result<EventRoster, ScoringServiceError> {
        Ok(self.read_roster()?.clone())
    }

    /// Save a draft, creating the zero-filled card on the first save.
    pub fn save(&self, submission: ScoreSubmission) -> Result<TeamScore, ScoringServiceError> {
        let roster = self.read_roster()?;
        let jury = roster
            .jury(&submission.jury)
            .ok_or_else(|| ScoringServiceError::UnknownJury(submission.jury.clone()))?;
        if roster.team(&submission.team).is_none() {
            return Err(ScoringServiceError::UnknownTeam(submission.team.clone()));
        }

        let criteria_touched = submission
            .scores
            .keys()
            .chain(submission.criterion_comments.keys());
        for criterion_id in criteria_touched {
            if roster.criterion(criterion_id).is_none() {
                warn!(jury = %jury.id, criterion = %criterion_id, "score references unknown criterion");
                return Err(ScoringServiceError::UnknownCriterion(criterion_id.clone()));
            }
            if !jury.is_assigned(criterion_id) {
                warn!(jury = %jury.id, criterion = %criterion_id, "jury is not assigned to criterion");
                return Err(ScoringServiceError::UnassignedCriterion {
                    jury: jury.id.clone(),
                    criterion: criterion_id.clone(),
                });
            }
        }

        let mut record = match self.repository.fetch(&submission.jury, &submission.team)? {
            Some(existing) if existing.locked => {
                return Err(ScoringServiceError::Locked {
                    jury: existing.jury,
                    team: existing.team,
                });
            }
            Some(existing) => existing,
            None => {
                let mut fresh = TeamScore::new(submission.jury.clone(), submission.team.clone());
                for criterion in roster.criteria.iter().filter(|c| jury.is_assigned(&c.id)) {
                    fresh.scores.insert(criterion.id.clone(), 0.0);
                }
                fresh
            }
        };

        for (criterion_id, value) in submission.scores {
            if let Some(criterion) = roster.criterion(&criterion_id) {
                record.scores.insert(criterion_id, criterion.clamp(value));
            }
        }
        if let Some(global) = submission.global_comments {
            record.global_comments = global;
        }
        record.criterion_comments.extend(submission.criterion_comments);

        // The roster guard stays held until the write lands so a concurrent
        // withdrawal cannot leave an orphan card behind.
        let stored = self.write_unlocked(record)?;
        drop(roster);
        debug!(jury = %stored.jury, team = %stored.team, total = stored.total(), "scorecard saved");
        Ok(stored)
    }

    /// Freeze a scorecard. Locked cards are the only ones that count officially.
    pub fn lock(&self, jury: &JuryId, team: &TeamId) -> Result<TeamScore, ScoringServiceError> {
        let mut record = self
            .repository
            .fetch(jury, team)?
            .ok_or(ScoringServiceError::NotFound)?;

        if record.locked {
            return Err(ScoringServiceError::Locked {
                jury: record.jury,
                team: record.team,
            });
        }

        record.locked = true;
        record.submitted_at = Some(Utc::now());
        let stored = self.write_unlocked(record)?;
        info!(jury = %stored.jury, team = %stored.team, "scorecard locked");
        Ok(stored)
    }

    pub fn scorecard(
        &self,
        jury: &JuryId,
        team: &TeamId,
    ) -> Result<TeamScore, ScoringServiceError> {
        self.repository
            .fetch(jury, team)?
            .ok_or(ScoringServiceError::NotFound)
    }

    /// Copy of the current state; `official` drops unlocked drafts.
    pub fn snapshot(&self, official: bool) -> Result<EventSnapshot, ScoringServiceError> {
        let records = self.repository.list()?;
        let snapshot = self.read_roster()?.snapshot(records);
        Ok(if official {
            snapshot.locked_only()
        } else {
            snapshot
        })
    }

    pub fn results(&self) -> Result<Vec<RankedResult>, ScoringServiceError> {
        Ok(self.snapshot(true)?.results(self.config.policy))
    }

    pub fn completion(&self) -> Result<CompletionStatus, ScoringServiceError> {
        Ok(self.snapshot(true)?.completion())
    }

    pub fn progress(&self, jury: &JuryId) -> Result<ProgressInfo, ScoringServiceError> {
        if self.read_roster()?.jury(jury).is_none() {
            return Err(ScoringServiceError::UnknownJury(jury.clone()));
        }
        Ok(self
            .snapshot(true)?
            .jury_progress(self.config.progress_scope, jury))
    }

    pub fn queue(&self) -> Result<LiveQueue, ScoringServiceError> {
        Ok(self.snapshot(true)?.live_queue())
    }

    pub fn public_results(&self, reveal: bool) -> Result<PublicResults, ScoringServiceError> {
        let snapshot = self.snapshot(false)?;
        Ok(public_results(&snapshot, self.config.policy, reveal))
    }

    pub fn export_results(&self) -> Result<String, ScoringServiceError> {
        let snapshot = self.snapshot(true)?;
        let results = snapshot.results(self.config.policy);
        Ok(results_to_csv(&results, &snapshot.criteria, &snapshot.juries)?)
    }

    /// Every non-empty comment on locked cards.
    pub fn export_comments(&self) -> Result<String, ScoringServiceError> {
        let snapshot = self.snapshot(true)?;
        Ok(comments_to_csv(
            &snapshot.team_scores,
            &snapshot.teams,
            &snapshot.juries,
            &snapshot.criteria,
        )?)
    }

    /// Drop a team from the event along with its scorecards.
    pub fn withdraw_team(&self, team: &TeamId) -> Result<usize, ScoringServiceError> {
        let mut roster = self.write_roster()?;
        let before = roster.teams.len();
        roster.teams.retain(|candidate| &candidate.id != team);
        if roster.teams.len() == before {
            return Err(ScoringServiceError::UnknownTeam(team.clone()));
        }
        let removed = self.repository.remove_team(team)?;
        info!(team = %team, removed, "team withdrawn");
        Ok(removed)
    }

    pub fn withdraw_jury(&self, jury: &JuryId) -> Result<usize, ScoringServiceError> {
        let mut roster = self.write_roster()?;
        let before = roster.juries.len();
        roster.juries.retain(|candidate| &candidate.id != jury);
        if roster.juries.len() == before {
            return Err(ScoringServiceError::UnknownJury(jury.clone()));
        }
        let removed = self.repository.remove_jury(jury)?;
        info!(jury = %jury, removed, "jury withdrawn");
        Ok(removed)
    }

    fn write_unlocked(&self, record: TeamScore) -> Result<TeamScore, ScoringServiceError> {
        let (jury, team) = (record.jury.clone(), record.team.clone());
        match self.repository.upsert_unlocked(record) {
            Err(RepositoryError::Conflict) => {
                warn!(jury = %jury, team = %team, "scorecard locked before the write landed");
                Err(ScoringServiceError::Locked { jury, team })
            }
            other => Ok(other?),
        }
    }

    fn read_roster(&self) -> Result<RwLockReadGuard<'_, EventRoster>, ScoringServiceError> {
        self.roster
            .read()
            .map_err(|_| ScoringServiceError::RosterUnavailable)
    }

    fn write_roster(&self) -> Result<RwLockWriteGuard<'_, EventRoster>, ScoringServiceError> {
        self.roster
            .write()
            .map_err(|_| ScoringServiceError::RosterUnavailable)
    }
}

/// Error raised by the scoring service.
#[derive(Debug, thiserror::Error)]
pub enum ScoringServiceError {
    #[error("unknown team {0}")]
    UnknownTeam(TeamId),
    #[error("unknown jury {0}")]
    UnknownJury(JuryId),
    #[error("unknown criterion {0}")]
    UnknownCriterion(CriterionId),
    #[error("jury {jury} is not assigned to criterion {criterion}")]
    UnassignedCriterion { jury: JuryId, criterion: CriterionId },
    #[error("scorecard from {jury} for {team} is locked")]
    Locked { jury: JuryId, team: TeamId },
    #[error("scorecard not found")]
    NotFound,
    #[error("event roster unavailable")]
    RosterUnavailable,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Export(#[from] ExportError),
}
