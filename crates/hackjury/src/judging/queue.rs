use std::cmp::Reverse;

use serde::Serialize;

use super::completion::team_locked_count;
use super::domain::{Jury, Team, TeamId, TeamScore};

const UPCOMING_WINDOW: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueueEntry {
    pub team_id: TeamId,
    pub team_name: String,
    pub passage_order: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub passage_time: Option<String>,
    pub locked_count: usize,
    pub jury_count: usize,
}

/// Stage view of the pitch order: who is on, who is next, who is done.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LiveQueue {
    pub current: Option<QueueEntry>,
    pub upcoming: Vec<QueueEntry>,
    pub completed: Vec<QueueEntry>,
}

pub fn live_queue(teams: &[Team], juries: &[Jury], team_scores: &[TeamScore]) -> LiveQueue {
    let jury_count = juries.len();

    let mut ordered: Vec<QueueEntry> = teams
        .iter()
        .filter_map(|team| {
            // order 0 marks a team without a pitch slot
            team.passage_order.filter(|order| *order > 0).map(|passage_order| QueueEntry {
                team_id: team.id.clone(),
                team_name: team.name.clone(),
                passage_order,
                passage_time: team.passage_time.clone(),
                locked_count: team_locked_count(&team.id, juries, team_scores),
                jury_count,
            })
        })
        .collect();
    ordered.sort_by_key(|entry| entry.passage_order);

    let current = ordered
        .iter()
        .find(|entry| entry.locked_count < jury_count)
        .cloned();

    let upcoming = ordered
        .iter()
        .filter(|entry| match &current {
            Some(current) => entry.passage_order > current.passage_order,
            None => true,
        })
        .take(UPCOMING_WINDOW)
        .cloned()
        .collect();

    let mut completed: Vec<QueueEntry> = ordered
        .into_iter()
        .filter(|entry| entry.locked_count >= jury_count)
        .collect();
    completed.sort_by_key(|entry| Reverse(entry.passage_order));

    LiveQueue {
        current,
        upcoming,
        completed,
    }
}
