mod aggregate;
mod config;
mod ranking;

pub use config::ScoringPolicy;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::domain::{by_priority, Criterion, CriterionId, Jury, JuryId, Team, TeamId, TeamScore};
use aggregate::{aggregate_team, Weights};

/// One jury's contribution to a team's result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JuryBreakdown {
    pub jury_id: JuryId,
    pub jury_name: String,
    pub scores: BTreeMap<CriterionId, f64>,
    pub total: f64,
}

/// Aggregated, ranked standing of a single team.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedResult {
    pub rank: usize,
    pub team_id: TeamId,
    pub team_name: String,
    pub platform_name: String,
    pub total_score: f64,
    pub average_score: f64,
    pub criterion_scores: BTreeMap<CriterionId, f64>,
    pub jury_scores: Vec<JuryBreakdown>,
    pub perfect_scores_count: usize,
    pub standard_deviation: f64,
}

impl RankedResult {
    pub fn criterion_score(&self, criterion: &CriterionId) -> f64 {
        self.criterion_scores.get(criterion).copied().unwrap_or(0.0)
    }
}

/// Stateless calculator applying a scoring policy to a data snapshot.
///
/// Callers decide which scorecards are passed in; official standings should
/// only be computed from locked records.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResultsCalculator {
    policy: ScoringPolicy,
}

impl ResultsCalculator {
    pub fn new(policy: ScoringPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> ScoringPolicy {
        self.policy
    }

    pub fn calculate(
        &self,
        teams: &[Team],
        team_scores: &[TeamScore],
        juries: &[Jury],
        criteria: &[Criterion],
    ) -> Vec<RankedResult> {
        let weights = Weights::new(self.policy, criteria);
        let prioritized = by_priority(criteria);

        let mut results: Vec<RankedResult> = teams
            .iter()
            .map(|team| aggregate_team(team, team_scores, juries, criteria, &weights))
            .collect();

        ranking::rank(&mut results, &prioritized);
        results
    }
}

/// Leaderboard under the canonical raw-sum policy.
pub fn calculate_results(
    teams: &[Team],
    team_scores: &[TeamScore],
    juries: &[Jury],
    criteria: &[Criterion],
) -> Vec<RankedResult> {
    ResultsCalculator::default().calculate(teams, team_scores, juries, criteria)
}

pub fn calculate_results_with(
    policy: ScoringPolicy,
    teams: &[Team],
    team_scores: &[TeamScore],
    juries: &[Jury],
    criteria: &[Criterion],
) -> Vec<RankedResult> {
    ResultsCalculator::new(policy).calculate(teams, team_scores, juries, criteria)
}
