use std::collections::{BTreeMap, HashMap};

use super::super::domain::{Criterion, CriterionId, Jury, Team, TeamScore};
use super::config::ScoringPolicy;
use super::{JuryBreakdown, RankedResult};

/// Per-criterion multiplier lookup for the active policy.
pub(super) struct Weights<'a> {
    policy: ScoringPolicy,
    by_criterion: HashMap<&'a CriterionId, f64>,
}

impl<'a> Weights<'a> {
    pub(super) fn new(policy: ScoringPolicy, criteria: &'a [Criterion]) -> Self {
        let by_criterion = match policy {
            ScoringPolicy::RawSum => HashMap::new(),
            ScoringPolicy::Weighted => criteria
                .iter()
                .map(|criterion| (&criterion.id, criterion.weight))
                .collect(),
        };
        Self {
            policy,
            by_criterion,
        }
    }

    fn apply(&self, criterion: &CriterionId, value: f64) -> f64 {
        match self.policy {
            ScoringPolicy::RawSum => value,
            ScoringPolicy::Weighted => {
                value * self.by_criterion.get(criterion).copied().unwrap_or(1.0)
            }
        }
    }

    fn total(&self, scores: &BTreeMap<CriterionId, f64>) -> f64 {
        scores
            .iter()
            .fold(0.0, |acc, (criterion, value)| acc + self.apply(criterion, *value))
    }
}

pub(super) fn aggregate_team(
    team: &Team,
    team_scores: &[TeamScore],
    juries: &[Jury],
    criteria: &[Criterion],
    weights: &Weights<'_>,
) -> RankedResult {
    let jury_scores: Vec<JuryBreakdown> = juries
        .iter()
        .map(|jury| {
            let scores = team_scores
                .iter()
                .find(|record| record.matches(&jury.id, &team.id))
                .map(|record| record.scores.clone())
                .unwrap_or_default();
            let total = weights.total(&scores);

            JuryBreakdown {
                jury_id: jury.id.clone(),
                jury_name: jury.username.clone(),
                scores,
                total,
            }
        })
        .collect();

    let total_score = jury_scores
        .iter()
        .fold(0.0, |acc, breakdown| acc + breakdown.total);
    let jury_count = jury_scores.len();
    let average_score = if jury_count > 0 {
        total_score / jury_count as f64
    } else {
        0.0
    };

    let criterion_scores = criteria
        .iter()
        .map(|criterion| {
            let sum = jury_scores.iter().fold(0.0, |acc, breakdown| {
                let value = breakdown.scores.get(&criterion.id).copied().unwrap_or(0.0);
                acc + weights.apply(&criterion.id, value)
            });
            (criterion.id.clone(), sum)
        })
        .collect();

    // Perfect marks compare raw values regardless of the weighting policy.
    let perfect_scores_count = criteria
        .iter()
        .map(|criterion| {
            jury_scores
                .iter()
                .filter(|breakdown| breakdown.scores.get(&criterion.id) == Some(&criterion.max_score))
                .count()
        })
        .sum();

    let standard_deviation = if jury_count > 0 {
        let variance = jury_scores.iter().fold(0.0, |acc, breakdown| {
            acc + (breakdown.total - average_score).powi(2)
        }) / jury_count as f64;
        variance.sqrt()
    } else {
        0.0
    };

    RankedResult {
        rank: 0,
        team_id: team.id.clone(),
        team_name: team.name.clone(),
        platform_name: team.platform_name(),
        total_score,
        average_score,
        criterion_scores,
        jury_scores,
        perfect_scores_count,
        standard_deviation,
    }
}
