use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::domain::{JuryId, Team, TeamId, TeamScore};

/// Which locked scorecards count toward a jury's progress.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressScope {
    /// Only scorecards for teams still on the roster, one per team.
    #[default]
    CurrentTeams,
    /// Every locked scorecard attributed to the jury, including orphans.
    AllLocked,
}

impl ProgressScope {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "current_teams" | "current" => Some(Self::CurrentTeams),
            "all_locked" | "all" => Some(Self::AllLocked),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressInfo {
    pub scored: usize,
    pub total: usize,
    pub percentage: u8,
}

/// Progress with the default scope.
pub fn get_jury_progress(jury_id: &JuryId, teams: &[Team], team_scores: &[TeamScore]) -> ProgressInfo {
    get_jury_progress_with(ProgressScope::default(), jury_id, teams, team_scores)
}

pub fn get_jury_progress_with(
    scope: ProgressScope,
    jury_id: &JuryId,
    teams: &[Team],
    team_scores: &[TeamScore],
) -> ProgressInfo {
    let total = teams.len();
    let locked = team_scores
        .iter()
        .filter(|record| record.locked && &record.jury == jury_id);

    let scored = match scope {
        ProgressScope::AllLocked => locked.count(),
        ProgressScope::CurrentTeams => {
            let current: HashSet<&TeamId> = teams.iter().map(|team| &team.id).collect();
            locked
                .filter(|record| current.contains(&record.team))
                .map(|record| &record.team)
                .collect::<HashSet<_>>()
                .len()
        }
    };

    ProgressInfo {
        scored,
        total,
        percentage: percentage(scored, total),
    }
}

fn percentage(scored: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let ratio = (scored as f64 / total as f64) * 100.0;
    ratio.round().clamp(0.0, 100.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(jury: &str, team: &str, locked: bool) -> TeamScore {
        let mut record = TeamScore::new(JuryId::new(jury), TeamId::new(team));
        record.locked = locked;
        record
    }

    fn teams(count: usize) -> Vec<Team> {
        (1..=count)
            .map(|index| Team::new(format!("t{index}"), format!("Team {index}")))
            .collect()
    }

    #[test]
    fn counts_only_locked_cards_for_the_jury() {
        let scores = vec![
            card("j1", "t1", true),
            card("j1", "t2", false),
            card("j2", "t3", true),
        ];

        let progress = get_jury_progress(&JuryId::new("j1"), &teams(3), &scores);

        assert_eq!(
            progress,
            ProgressInfo {
                scored: 1,
                total: 3,
                percentage: 33
            }
        );
    }

    #[test]
    fn percentage_rounds_half_up() {
        let scores = vec![card("j1", "t1", true)];
        let progress = get_jury_progress(&JuryId::new("j1"), &teams(8), &scores);
        // 12.5% rounds to 13
        assert_eq!(progress.percentage, 13);

        let scores = vec![card("j1", "t1", true), card("j1", "t2", true)];
        let progress = get_jury_progress(&JuryId::new("j1"), &teams(3), &scores);
        assert_eq!(progress.percentage, 67);
    }

    #[test]
    fn empty_roster_reports_zero_percent() {
        let scores = vec![card("j1", "gone", true)];
        let progress = get_jury_progress(&JuryId::new("j1"), &[], &scores);
        assert_eq!(progress.total, 0);
        assert_eq!(progress.percentage, 0);
    }

    #[test]
    fn current_scope_ignores_orphaned_cards() {
        let scores = vec![card("j1", "t1", true), card("j1", "deleted", true)];

        let current = get_jury_progress(&JuryId::new("j1"), &teams(1), &scores);
        assert_eq!(current.scored, 1);
        assert_eq!(current.percentage, 100);

        let all = get_jury_progress_with(
            ProgressScope::AllLocked,
            &JuryId::new("j1"),
            &teams(1),
            &scores,
        );
        assert_eq!(all.scored, 2);
        assert_eq!(all.percentage, 100);
    }

    #[test]
    fn scope_parses_config_values() {
        assert_eq!(ProgressScope::parse("all_locked"), Some(ProgressScope::AllLocked));
        assert_eq!(ProgressScope::parse(" Current "), Some(ProgressScope::CurrentTeams));
        assert_eq!(ProgressScope::parse("nope"), None);
    }
}
