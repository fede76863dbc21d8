use serde::Serialize;

use super::domain::{Jury, JuryId, Team, TeamId, TeamScore};

fn has_locked(team_scores: &[TeamScore], jury: &JuryId, team: &TeamId) -> bool {
    team_scores
        .iter()
        .any(|record| record.locked && record.matches(jury, team))
}

/// True once every (team, jury) pair holds a locked scorecard.
///
/// An event with no teams or no juries is never complete.
pub fn are_all_teams_scored(teams: &[Team], juries: &[Jury], team_scores: &[TeamScore]) -> bool {
    if teams.is_empty() || juries.is_empty() {
        return false;
    }

    teams.iter().all(|team| {
        juries
            .iter()
            .all(|jury| has_locked(team_scores, &jury.id, &team.id))
    })
}

/// Number of listed juries holding a locked scorecard for `team`.
pub fn team_locked_count(team: &TeamId, juries: &[Jury], team_scores: &[TeamScore]) -> usize {
    juries
        .iter()
        .filter(|jury| has_locked(team_scores, &jury.id, team))
        .count()
}

#[derive(Debug, Clone, Serialize)]
pub struct MissingScorecard {
    pub team_id: TeamId,
    pub jury_id: JuryId,
}

/// Detailed completion breakdown for dashboards.
#[derive(Debug, Clone, Serialize)]
pub struct CompletionStatus {
    pub complete: bool,
    pub locked_pairs: usize,
    pub expected_pairs: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub missing: Vec<MissingScorecard>,
}

pub fn completion_status(
    teams: &[Team],
    juries: &[Jury],
    team_scores: &[TeamScore],
) -> CompletionStatus {
    let mut missing = Vec::new();
    for team in teams {
        for jury in juries {
            if !has_locked(team_scores, &jury.id, &team.id) {
                missing.push(MissingScorecard {
                    team_id: team.id.clone(),
                    jury_id: jury.id.clone(),
                });
            }
        }
    }

    let expected_pairs = teams.len() * juries.len();
    CompletionStatus {
        complete: are_all_teams_scored(teams, juries, team_scores),
        locked_pairs: expected_pairs - missing.len(),
        expected_pairs,
        missing,
    }
}
