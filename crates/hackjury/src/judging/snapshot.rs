use serde::{Deserialize, Serialize};

use super::completion::{are_all_teams_scored, completion_status, CompletionStatus};
use super::domain::{Criterion, CriterionId, Event, Jury, JuryId, Team, TeamId, TeamScore};
use super::progress::{get_jury_progress_with, ProgressInfo, ProgressScope};
use super::queue::{live_queue, LiveQueue};
use super::results::{RankedResult, ResultsCalculator, ScoringPolicy};

/// Teams, juries and criteria of one event, without any scorecards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventRoster {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event: Option<Event>,
    #[serde(default)]
    pub teams: Vec<Team>,
    #[serde(default)]
    pub juries: Vec<Jury>,
    #[serde(default)]
    pub criteria: Vec<Criterion>,
}

impl EventRoster {
    pub fn team(&self, id: &TeamId) -> Option<&Team> {
        self.teams.iter().find(|team| &team.id == id)
    }

    pub fn jury(&self, id: &JuryId) -> Option<&Jury> {
        self.juries.iter().find(|jury| &jury.id == id)
    }

    pub fn criterion(&self, id: &CriterionId) -> Option<&Criterion> {
        self.criteria.iter().find(|criterion| &criterion.id == id)
    }

    pub fn snapshot(&self, team_scores: Vec<TeamScore>) -> EventSnapshot {
        EventSnapshot {
            teams: self.teams.clone(),
            juries: self.juries.clone(),
            criteria: self.criteria.clone(),
            team_scores,
        }
    }
}

/// Read-only copy of an event's judging data.
///
/// The data-fetch layer materializes one of these and every computation runs
/// against it without touching the source collections.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventSnapshot {
    #[serde(default)]
    pub teams: Vec<Team>,
    #[serde(default)]
    pub juries: Vec<Jury>,
    #[serde(default)]
    pub criteria: Vec<Criterion>,
    #[serde(default)]
    pub team_scores: Vec<TeamScore>,
}

impl EventSnapshot {
    /// Same snapshot with drafts removed, the basis for official standings.
    pub fn locked_only(&self) -> Self {
        Self {
            teams: self.teams.clone(),
            juries: self.juries.clone(),
            criteria: self.criteria.clone(),
            team_scores: self
                .team_scores
                .iter()
                .filter(|record| record.locked)
                .cloned()
                .collect(),
        }
    }

    pub fn results(&self, policy: ScoringPolicy) -> Vec<RankedResult> {
        ResultsCalculator::new(policy).calculate(
            &self.teams,
            &self.team_scores,
            &self.juries,
            &self.criteria,
        )
    }

    pub fn all_teams_scored(&self) -> bool {
        are_all_teams_scored(&self.teams, &self.juries, &self.team_scores)
    }

    pub fn completion(&self) -> CompletionStatus {
        completion_status(&self.teams, &self.juries, &self.team_scores)
    }

    pub fn jury_progress(&self, scope: ProgressScope, jury: &JuryId) -> ProgressInfo {
        get_jury_progress_with(scope, jury, &self.teams, &self.team_scores)
    }

    pub fn live_queue(&self) -> LiveQueue {
        live_queue(&self.teams, &self.juries, &self.team_scores)
    }
}
